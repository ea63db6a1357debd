use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Message type carried by every invoice payload (`nachrichtentyp`).
pub const BATCH_MESSAGE_TYPE: &str = "ADL";

/// Salutations accepted for a person receiving an invoice (`anrede`).
pub const RECIPIENT_SALUTATIONS: &[&str] = &[
    "Ohne Anrede",
    "Frau",
    "Herr",
    "Herr / Frau",
    "Familie",
    "An die Angehörigen von",
];

/// `rechnungen`: the invoice batch, root of a `*_padx.xml` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceBatch {
    /// `hinweistext`: free notice for the billing service.
    pub notice: Option<String>,
    /// `rechnungsersteller`: the party issuing all invoices of the batch.
    pub issuer: Issuer,
    /// `leistungserbringer`: providers referenced by cases and items.
    pub providers: Vec<Provider>,
    /// `rechnung`: invoices (`@anzahl` is derived from this list).
    pub invoices: Vec<Invoice>,
}

impl InvoiceBatch {
    /// Look up a declared provider by its `@id`.
    pub fn provider(&self, id: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// Total number of billing cases across all invoices.
    pub fn case_count(&self) -> usize {
        self.invoices.iter().map(|i| i.cases.len()).sum()
    }
}

/// `hausadresse` inside an `anschrift`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// `land`: country code, omitted for Germany.
    pub country: Option<String>,
    /// `zusatz`: additional address line.
    pub extra: Option<String>,
    /// `plz`
    pub postal_code: String,
    /// `ort`
    pub city: String,
    /// `strasse`
    pub street: Option<String>,
    /// `hausnr`
    pub house_number: Option<String>,
}

/// `kontakt @art`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    Phone,
    Mobile,
    Fax,
    Email,
}

impl ContactKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Phone => "telefonnr",
            Self::Mobile => "mobilnr",
            Self::Fax => "faxnr",
            Self::Email => "email",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "telefonnr" => Some(Self::Phone),
            "mobilnr" => Some(Self::Mobile),
            "faxnr" => Some(Self::Fax),
            "email" => Some(Self::Email),
            _ => None,
        }
    }
}

/// `kontakt`: phone number, e-mail address etc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub kind: Option<ContactKind>,
    pub value: String,
}

/// `geschlecht`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
    Unknown,
}

impl Sex {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Male => "m",
            Self::Female => "w",
            Self::Unknown => "u",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "m" => Some(Self::Male),
            "w" => Some(Self::Female),
            "u" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// Natural person fields shared by patients, insured persons, recipients and providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// `anrede`
    pub salutation: Option<String>,
    /// `titel`
    pub title: Option<String>,
    /// `vorname`
    pub first_name: Option<String>,
    /// `name`
    pub last_name: String,
    /// `namezusatz`
    pub name_suffix: Option<String>,
    /// `gebdatum`: required for patients.
    pub birth_date: Option<NaiveDate>,
    /// `geschlecht`: required for patients.
    pub sex: Option<Sex>,
}

/// `rechnungsersteller`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    /// `name` (max 40 characters).
    pub name: String,
    /// `namezusatz` lines.
    pub name_suffixes: Vec<String>,
    /// `kundennr` at the billing service.
    pub customer_number: u64,
    /// `anschrift`
    pub address: Address,
    /// `iknr` (institution code, max 9 digits).
    pub ik_number: Option<u32>,
    /// `kontakt`
    pub contacts: Vec<Contact>,
    /// `ustidnr`
    pub vat_id: Option<String>,
    /// `glaeubigerid` (SEPA creditor id).
    pub creditor_id: Option<String>,
}

/// `leistungserbringer`: physician or dentist who rendered services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// `@id`, referenced by `leistungserbringerid`.
    pub id: String,
    pub person: Person,
    pub address: Option<Address>,
    /// `kundennr`
    pub customer_number: Option<u64>,
    /// `lanr`: lifelong physician numbers.
    pub lanr: Vec<u32>,
    /// `ustidnr`
    pub vat_id: Option<String>,
    /// `iknr`
    pub ik_number: Option<u32>,
    /// `@aisid`: id in the practice system.
    pub ais_id: Option<String>,
}

/// `organisation` receiving an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organisation {
    /// `name` (1..120 characters).
    pub name: String,
    pub address: Address,
}

/// `rechnungsempfaenger`: closed union of person or organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    Person { person: Person, address: Address },
    Organisation(Organisation),
}

impl Recipient {
    pub fn address(&self) -> &Address {
        match self {
            Recipient::Person { address, .. } => address,
            Recipient::Organisation(org) => &org.address,
        }
    }
}

/// `zahlung @art`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    DirectDebit,
}

impl PaymentMethod {
    pub fn code(&self) -> &'static str {
        match self {
            Self::DirectDebit => "Lastschrift",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Lastschrift" => Some(Self::DirectDebit),
            _ => None,
        }
    }
}

/// `kontoverbindung`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub holder: Option<String>,
    pub bank: Option<String>,
    pub bic: Option<String>,
    pub iban: String,
    pub mandate_reference: Option<String>,
}

/// `zahlung`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTerms {
    pub account: Option<BankAccount>,
    pub method: Option<PaymentMethod>,
}

/// `nachlass`: discount as absolute amount and/or percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub amount: Option<Decimal>,
    pub percent: Option<Decimal>,
}

/// `zuzahlungsbetrag @kennzeichen`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Copayment {
    pub amount: Decimal,
    /// One-character code.
    pub code: String,
}

/// `rechnungsvorgaben`: invoice-level adjustments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceAdjustments {
    /// `direktzahlungsbetrag`: amount already paid.
    pub prepaid: Option<Decimal>,
    pub discount: Option<Discount>,
    pub copayment: Option<Copayment>,
}

/// `rechnung`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// `@id` (max 40 characters).
    pub id: String,
    pub recipient: Recipient,
    pub payment: Option<PaymentTerms>,
    pub adjustments: Option<InvoiceAdjustments>,
    /// `abrechnungsfall` (at least one).
    pub cases: Vec<BillingCase>,
    /// `anfangstext`
    pub intro_text: Option<String>,
    /// `endetext`
    pub closing_text: Option<String>,
    /// `@druckkennzeichen` (default true).
    pub print: bool,
    /// `@eabgabe`: electronic delivery.
    pub electronic_delivery: Option<bool>,
    /// `@aisrechnungsnr` (max 14 characters).
    pub ais_invoice_number: Option<String>,
    /// `@aisaktenzeichen`
    pub ais_file_reference: Option<String>,
    /// `@aisendbetrag`: total as computed by the practice system.
    pub ais_total: Option<Decimal>,
}

/// `behandlungsart` (0..5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreatmentKind {
    Outpatient,
    Inpatient,
    PreInpatient,
    PostInpatient,
    PartialInpatient,
    Other,
}

impl TreatmentKind {
    pub fn code(&self) -> u8 {
        match self {
            Self::Outpatient => 0,
            Self::Inpatient => 1,
            Self::PreInpatient => 2,
            Self::PostInpatient => 3,
            Self::PartialInpatient => 4,
            Self::Other => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Outpatient),
            1 => Some(Self::Inpatient),
            2 => Some(Self::PreInpatient),
            3 => Some(Self::PostInpatient),
            4 => Some(Self::PartialInpatient),
            5 => Some(Self::Other),
            _ => None,
        }
    }
}

/// `minderungssatz`: statutory fee reduction (§6a GOÄ).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReductionRate {
    None,
    Fifteen,
    TwentyFive,
}

impl ReductionRate {
    pub fn percent(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Fifteen => 15,
            Self::TwentyFive => 25,
        }
    }

    pub fn from_percent(percent: u8) -> Option<Self> {
        match percent {
            0 => Some(Self::None),
            15 => Some(Self::Fifteen),
            25 => Some(Self::TwentyFive),
            _ => None,
        }
    }
}

/// `zeitraum`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// `diagnose`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub text: String,
    /// ICD code.
    pub code: Option<String>,
}

/// `versicherter`: the insured person if different from the patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insured {
    pub person: Person,
    pub address: Option<Address>,
}

/// `kvkartendaten`: statutory health card data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCard {
    /// `kassenname`
    pub insurer_name: String,
    /// `kassennr` (max 9 digits).
    pub insurer_number: Option<u32>,
    /// `versichertennr`
    pub insured_number: Option<String>,
}

/// `summenblock`: case totals, derived from the line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumBlock {
    /// `honorar`: sum of billable fee lines.
    pub fees: Decimal,
    /// `auslagen`: sum of expense lines.
    pub expenses: Option<Decimal>,
    /// `entschaedigung`: sum of travel compensation lines.
    pub travel: Option<Decimal>,
    /// `rechnungsbetrag`: declared case total.
    pub total: Decimal,
    /// `vorauszahlung`
    pub prepayment: Option<Decimal>,
    /// `minderungsbetrag`
    pub reduction: Option<Decimal>,
    /// `zahlbetrag` = total - prepayment - reduction.
    pub payable: Decimal,
}

impl Default for SumBlock {
    fn default() -> Self {
        Self {
            fees: Decimal::ZERO,
            expenses: None,
            travel: None,
            total: Decimal::ZERO,
            prepayment: None,
            reduction: None,
            payable: Decimal::ZERO,
        }
    }
}

/// Fields every billing case carries, whatever its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseCore {
    /// `leistungserbringerid`
    pub provider_id: Option<String>,
    /// `behandelter`: the patient.
    pub patient: Person,
    pub insured: Option<Insured>,
    pub period: Option<Period>,
    pub treatment_kind: Option<TreatmentKind>,
    pub diagnoses: Vec<Diagnosis>,
    /// `positionen` (`@posanzahl` is derived from this list).
    pub items: Vec<LineItem>,
    pub sums: SumBlock,
}

/// `abrechnungsfall`: closed union of the five case kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BillingCase {
    /// `bema`: statutory dental billing.
    Statutory {
        core: CaseCore,
        health_card: Option<HealthCard>,
    },
    /// `bmgnormprivat`: private dental billing.
    Private {
        core: CaseCore,
        reduction_rate: Option<ReductionRate>,
    },
    /// `bmgnormkfoprivat`: private orthodontic billing.
    OrthodonticPrivate {
        core: CaseCore,
        reduction_rate: Option<ReductionRate>,
    },
    /// `eigenanteilsrechnung`: patient copay invoice.
    PatientCopay {
        core: CaseCore,
        reduction_rate: Option<ReductionRate>,
    },
    /// `humanmedizin`: physician billing (GOÄ, UV-GOÄ, EBM).
    HumanMedicine {
        core: CaseCore,
        /// `mwstsatz`
        vat_rate: Option<Decimal>,
        reduction_rate: Option<ReductionRate>,
        /// `vertragsart` (max 3 digits).
        contract_type: u16,
        /// `beschreibung` (max 60 characters).
        description: Option<String>,
        /// `aktenzeichen` (max 40 characters).
        file_reference: Option<String>,
    },
}

impl BillingCase {
    /// XML element name of this case kind.
    pub fn element_name(&self) -> &'static str {
        match self {
            BillingCase::Statutory { .. } => "bema",
            BillingCase::Private { .. } => "bmgnormprivat",
            BillingCase::OrthodonticPrivate { .. } => "bmgnormkfoprivat",
            BillingCase::PatientCopay { .. } => "eigenanteilsrechnung",
            BillingCase::HumanMedicine { .. } => "humanmedizin",
        }
    }

    pub fn core(&self) -> &CaseCore {
        match self {
            BillingCase::Statutory { core, .. }
            | BillingCase::Private { core, .. }
            | BillingCase::OrthodonticPrivate { core, .. }
            | BillingCase::PatientCopay { core, .. }
            | BillingCase::HumanMedicine { core, .. } => core,
        }
    }

    pub fn core_mut(&mut self) -> &mut CaseCore {
        match self {
            BillingCase::Statutory { core, .. }
            | BillingCase::Private { core, .. }
            | BillingCase::OrthodonticPrivate { core, .. }
            | BillingCase::PatientCopay { core, .. }
            | BillingCase::HumanMedicine { core, .. } => core,
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.core().items
    }

    pub fn sums(&self) -> &SumBlock {
        &self.core().sums
    }
}

/// `@go`: fee schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeSchedule {
    Goae,
    UvGoae,
    Ebm,
    Goz,
    Bema,
    Gebueh,
    Bel,
    Beb,
}

impl FeeSchedule {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Goae => "GOAE",
            Self::UvGoae => "UVGOAE",
            Self::Ebm => "EBM",
            Self::Goz => "GOZ",
            Self::Bema => "BEMA",
            Self::Gebueh => "GEBUEH",
            Self::Bel => "BEL",
            Self::Beb => "BEB",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "GOAE" => Some(Self::Goae),
            "UVGOAE" => Some(Self::UvGoae),
            "EBM" => Some(Self::Ebm),
            "GOZ" => Some(Self::Goz),
            "BEMA" => Some(Self::Bema),
            "GEBUEH" => Some(Self::Gebueh),
            "BEL" => Some(Self::Bel),
            "BEB" => Some(Self::Beb),
            _ => None,
        }
    }
}

/// Billing code: schedule, schedule version, code and optional analog substitute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeCode {
    /// `@go`
    pub schedule: FeeSchedule,
    /// `@goversion` (max 10 characters).
    pub version: Option<String>,
    /// `@ziffer` (1..8 characters).
    pub code: String,
    /// `@analog`: code this one is billed analogously to.
    pub analog: Option<String>,
}

impl FeeCode {
    pub fn new(schedule: FeeSchedule, code: impl Into<String>) -> Self {
        Self {
            schedule,
            version: None,
            code: code.into(),
            analog: None,
        }
    }
}

/// `@berechnung`: how a fee line enters the invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillingMode {
    /// `K`: listed but not billed.
    NotBilled,
    /// `H`: fee only.
    FeeOnly,
    /// `B`: costs only.
    CostsOnly,
}

impl BillingMode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotBilled => "K",
            Self::FeeOnly => "H",
            Self::CostsOnly => "B",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "K" => Some(Self::NotBilled),
            "H" => Some(Self::FeeOnly),
            "B" => Some(Self::CostsOnly),
            _ => None,
        }
    }
}

/// Common shape of every position (`LeistungspositionTyp`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionCore {
    /// `@positionsnr`
    pub position_number: Option<u32>,
    /// `leistungserbringerid`
    pub provider_id: Option<String>,
    /// `datum`
    pub date: NaiveDate,
    /// `uhrzeit`
    pub time: Option<NaiveTime>,
    /// `anzahl` (1..9999).
    pub quantity: u32,
    /// `text` (1..4000 characters).
    pub text: String,
    /// `zusatztext`
    pub extra_text: Option<String>,
    /// `@id`
    pub id: Option<String>,
    /// `@idref`
    pub idref: Option<String>,
}

/// `goziffer`: fee line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeLine {
    pub position: PositionCore,
    pub code: FeeCode,
    /// `faktor`: multiplier applied to the unit price (defaults to 1).
    pub factor: Option<Decimal>,
    pub reduction_rate: Option<ReductionRate>,
    /// `punktwert`
    pub point_value: Option<Decimal>,
    /// `punktzahl` (max 5 digits).
    pub points: Option<u32>,
    /// `einzelbetrag`
    pub unit_price: Option<Decimal>,
    /// `gesamtbetrag`
    pub total: Decimal,
    /// `mwstsatz`
    pub vat_rate: Option<Decimal>,
    /// `begruendungstext`: justification for an elevated factor.
    pub justification: Option<String>,
    pub billing: Option<BillingMode>,
}

/// `auslagen @kennzeichen`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseKind {
    /// `M`: material.
    Material,
    /// `L`: laboratory.
    Laboratory,
    /// `P`: postage.
    Postage,
}

impl ExpenseKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Material => "M",
            Self::Laboratory => "L",
            Self::Postage => "P",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" => Some(Self::Material),
            "L" => Some(Self::Laboratory),
            "P" => Some(Self::Postage),
            _ => None,
        }
    }
}

/// `auslagen`: expense line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseLine {
    pub position: PositionCore,
    pub vat_rate: Option<Decimal>,
    /// `einzelbetrag` (required).
    pub unit_price: Decimal,
    /// `gesamtbetrag`: derived from price and quantity if absent.
    pub total: Option<Decimal>,
    pub kind: Option<ExpenseKind>,
    /// `@berechnung="K"`: listed but not billed.
    pub not_billed: bool,
}

impl ExpenseLine {
    /// Declared total, or price times quantity.
    ///
    /// `None` when the product leaves the `Decimal` range.
    pub fn effective_total(&self) -> Option<Decimal> {
        match self.total {
            Some(total) => Some(total),
            None => super::money::line_amount(self.unit_price, self.position.quantity),
        }
    }
}

/// `wegegeld`: flat travel fee by radius and time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MileageAllowance {
    /// `radius` in km: 2, 5, 10 or 25.
    pub radius_km: u8,
    /// `@tageszeit`: `N` when at night.
    pub at_night: bool,
}

/// `reisekosten`: travel cost by distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelCosts {
    /// `wegstrecke` in km (max 4 digits).
    pub distance_km: u32,
    /// `uebernachtungskosten`
    pub overnight_costs: Option<Decimal>,
    /// `@abwesenheit`: 0 = up to 8 hours, 1 = more.
    pub long_absence: bool,
}

/// Closed union inside `entschaedigung`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelCompensation {
    Mileage(MileageAllowance),
    Costs(TravelCosts),
}

/// `entschaedigung`: travel compensation line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelLine {
    pub position: PositionCore,
    pub compensation: TravelCompensation,
    /// `anteil @teiler`: cost shared among this many patients.
    pub share_divisor: Option<u8>,
    /// `einzelbetrag`
    pub unit_price: Option<Decimal>,
    /// `gesamtbetrag`
    pub total: Decimal,
    /// `@go`: GOAE or GOZ.
    pub schedule: Option<FeeSchedule>,
}

/// `text`: free-text line without an amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLine {
    pub position_number: Option<u32>,
    pub text: String,
    pub id: Option<String>,
    pub idref: Option<String>,
}

impl TextLine {
    pub fn new(position_number: u32, text: impl Into<String>) -> Self {
        Self {
            position_number: Some(position_number),
            text: text.into(),
            id: None,
            idref: None,
        }
    }
}

/// A position inside `positionen`: closed union of the four line kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineItem {
    Fee(FeeLine),
    Expense(ExpenseLine),
    Travel(TravelLine),
    Text(TextLine),
}

impl LineItem {
    pub fn element_name(&self) -> &'static str {
        match self {
            LineItem::Fee(_) => "goziffer",
            LineItem::Expense(_) => "auslagen",
            LineItem::Travel(_) => "entschaedigung",
            LineItem::Text(_) => "text",
        }
    }

    pub fn position(&self) -> Option<&PositionCore> {
        match self {
            LineItem::Fee(l) => Some(&l.position),
            LineItem::Expense(l) => Some(&l.position),
            LineItem::Travel(l) => Some(&l.position),
            LineItem::Text(_) => None,
        }
    }

    /// Whether the line contributes to the case sums.
    pub fn is_billable(&self) -> bool {
        match self {
            LineItem::Fee(l) => l.billing != Some(BillingMode::NotBilled),
            LineItem::Expense(l) => !l.not_billed,
            LineItem::Travel(_) => true,
            LineItem::Text(_) => false,
        }
    }

    /// Amount this line contributes to the case total (zero if not billable).
    ///
    /// `None` when an undeclared expense total cannot be computed.
    pub fn billed_amount(&self) -> Option<Decimal> {
        if !self.is_billable() {
            return Some(Decimal::ZERO);
        }
        match self {
            LineItem::Fee(l) => Some(l.total),
            LineItem::Expense(l) => l.effective_total(),
            LineItem::Travel(l) => Some(l.total),
            LineItem::Text(_) => Some(Decimal::ZERO),
        }
    }
}
