use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use super::error::{PadnextError, ValidationError};
use super::manifest::*;
use super::money;
use super::types::*;
use super::validation;

/// Builder for an invoice batch (`rechnungen`).
///
/// ```
/// use padnext::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
/// let address = AddressBuilder::new("10115", "Berlin").street("Hauptstr.").house_number("1").build();
/// let doctor = ProviderBuilder::new("LE1", PersonBuilder::new("Meyer").first_name("Anna").build()).build();
/// let patient = PersonBuilder::new("Schulz")
///     .birth_date(NaiveDate::from_ymd_opt(1980, 5, 17).unwrap())
///     .sex(Sex::Male)
///     .build();
///
/// let case = CaseBuilder::human_medicine(patient, 1)
///     .provider_id("LE1")
///     .add_item(
///         FeeLineBuilder::new(1, day, FeeCode::new(FeeSchedule::Goae, "1"), "Beratung", 3)
///             .unit_price(dec!(23.00))
///             .build(),
///     )
///     .build()
///     .unwrap();
///
/// let invoice = InvoiceBuilder::new(
///     "R-1",
///     Recipient::Person {
///         person: PersonBuilder::new("Schulz").salutation("Herr").build(),
///         address: address.clone(),
///     },
/// )
/// .add_case(case)
/// .build()
/// .unwrap();
///
/// let batch = InvoiceBatchBuilder::new(IssuerBuilder::new("Praxis Meyer", 4711, address).build())
///     .add_provider(doctor)
///     .add_invoice(invoice)
///     .build()
///     .unwrap();
///
/// assert_eq!(batch.invoices[0].cases[0].sums().total, dec!(69.00));
/// ```
pub struct InvoiceBatchBuilder {
    notice: Option<String>,
    issuer: Issuer,
    providers: Vec<Provider>,
    invoices: Vec<Invoice>,
}

impl InvoiceBatchBuilder {
    pub fn new(issuer: Issuer) -> Self {
        Self {
            notice: None,
            issuer,
            providers: Vec::new(),
            invoices: Vec::new(),
        }
    }

    pub fn notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    pub fn add_provider(mut self, provider: Provider) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn add_invoice(mut self, invoice: Invoice) -> Self {
        self.invoices.push(invoice);
        self
    }

    /// Build the batch and run full model validation.
    /// Returns all validation errors (not just the first).
    pub fn build(self) -> Result<InvoiceBatch, PadnextError> {
        let batch = self.build_unchecked();
        let errors = validation::validate_batch(&batch);
        if !errors.is_empty() {
            return Err(PadnextError::ModelConstraint(errors));
        }
        Ok(batch)
    }

    /// Build without validation, e.g. to inspect a batch that is known to be broken.
    pub fn build_unchecked(self) -> InvoiceBatch {
        InvoiceBatch {
            notice: self.notice,
            issuer: self.issuer,
            providers: self.providers,
            invoices: self.invoices,
        }
    }
}

/// Builder for the invoice issuer (`rechnungsersteller`).
pub struct IssuerBuilder {
    name: String,
    name_suffixes: Vec<String>,
    customer_number: u64,
    address: Address,
    ik_number: Option<u32>,
    contacts: Vec<Contact>,
    vat_id: Option<String>,
    creditor_id: Option<String>,
}

impl IssuerBuilder {
    pub fn new(name: impl Into<String>, customer_number: u64, address: Address) -> Self {
        Self {
            name: name.into(),
            name_suffixes: Vec::new(),
            customer_number,
            address,
            ik_number: None,
            contacts: Vec::new(),
            vat_id: None,
            creditor_id: None,
        }
    }

    pub fn name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.name_suffixes.push(suffix.into());
        self
    }

    pub fn ik_number(mut self, ik: u32) -> Self {
        self.ik_number = Some(ik);
        self
    }

    pub fn contact(mut self, kind: ContactKind, value: impl Into<String>) -> Self {
        self.contacts.push(Contact {
            kind: Some(kind),
            value: value.into(),
        });
        self
    }

    pub fn vat_id(mut self, id: impl Into<String>) -> Self {
        self.vat_id = Some(id.into());
        self
    }

    pub fn creditor_id(mut self, id: impl Into<String>) -> Self {
        self.creditor_id = Some(id.into());
        self
    }

    pub fn build(self) -> Issuer {
        Issuer {
            name: self.name,
            name_suffixes: self.name_suffixes,
            customer_number: self.customer_number,
            address: self.address,
            ik_number: self.ik_number,
            contacts: self.contacts,
            vat_id: self.vat_id,
            creditor_id: self.creditor_id,
        }
    }
}

/// Builder for a house address.
pub struct AddressBuilder {
    country: Option<String>,
    extra: Option<String>,
    postal_code: String,
    city: String,
    street: Option<String>,
    house_number: Option<String>,
}

impl AddressBuilder {
    pub fn new(postal_code: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            country: None,
            extra: None,
            postal_code: postal_code.into(),
            city: city.into(),
            street: None,
            house_number: None,
        }
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    pub fn house_number(mut self, number: impl Into<String>) -> Self {
        self.house_number = Some(number.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    pub fn build(self) -> Address {
        Address {
            country: self.country,
            extra: self.extra,
            postal_code: self.postal_code,
            city: self.city,
            street: self.street,
            house_number: self.house_number,
        }
    }
}

/// Builder for a natural person.
pub struct PersonBuilder {
    person: Person,
}

impl PersonBuilder {
    pub fn new(last_name: impl Into<String>) -> Self {
        Self {
            person: Person {
                salutation: None,
                title: None,
                first_name: None,
                last_name: last_name.into(),
                name_suffix: None,
                birth_date: None,
                sex: None,
            },
        }
    }

    pub fn salutation(mut self, salutation: impl Into<String>) -> Self {
        self.person.salutation = Some(salutation.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.person.title = Some(title.into());
        self
    }

    pub fn first_name(mut self, name: impl Into<String>) -> Self {
        self.person.first_name = Some(name.into());
        self
    }

    pub fn name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.person.name_suffix = Some(suffix.into());
        self
    }

    pub fn birth_date(mut self, date: NaiveDate) -> Self {
        self.person.birth_date = Some(date);
        self
    }

    pub fn sex(mut self, sex: Sex) -> Self {
        self.person.sex = Some(sex);
        self
    }

    pub fn build(self) -> Person {
        self.person
    }
}

/// Builder for a service provider (`leistungserbringer`).
pub struct ProviderBuilder {
    provider: Provider,
}

impl ProviderBuilder {
    pub fn new(id: impl Into<String>, person: Person) -> Self {
        Self {
            provider: Provider {
                id: id.into(),
                person,
                address: None,
                customer_number: None,
                lanr: Vec::new(),
                vat_id: None,
                ik_number: None,
                ais_id: None,
            },
        }
    }

    pub fn address(mut self, address: Address) -> Self {
        self.provider.address = Some(address);
        self
    }

    pub fn customer_number(mut self, number: u64) -> Self {
        self.provider.customer_number = Some(number);
        self
    }

    pub fn lanr(mut self, lanr: u32) -> Self {
        self.provider.lanr.push(lanr);
        self
    }

    pub fn vat_id(mut self, id: impl Into<String>) -> Self {
        self.provider.vat_id = Some(id.into());
        self
    }

    pub fn ik_number(mut self, ik: u32) -> Self {
        self.provider.ik_number = Some(ik);
        self
    }

    pub fn ais_id(mut self, id: impl Into<String>) -> Self {
        self.provider.ais_id = Some(id.into());
        self
    }

    pub fn build(self) -> Provider {
        self.provider
    }
}

/// Builder for a single invoice (`rechnung`).
pub struct InvoiceBuilder {
    id: String,
    recipient: Recipient,
    payment: Option<PaymentTerms>,
    adjustments: Option<InvoiceAdjustments>,
    cases: Vec<BillingCase>,
    intro_text: Option<String>,
    closing_text: Option<String>,
    print: bool,
    electronic_delivery: Option<bool>,
    ais_invoice_number: Option<String>,
    ais_file_reference: Option<String>,
    ais_total: Option<Decimal>,
}

impl InvoiceBuilder {
    pub fn new(id: impl Into<String>, recipient: Recipient) -> Self {
        Self {
            id: id.into(),
            recipient,
            payment: None,
            adjustments: None,
            cases: Vec::new(),
            intro_text: None,
            closing_text: None,
            print: true,
            electronic_delivery: None,
            ais_invoice_number: None,
            ais_file_reference: None,
            ais_total: None,
        }
    }

    pub fn payment(mut self, payment: PaymentTerms) -> Self {
        self.payment = Some(payment);
        self
    }

    pub fn adjustments(mut self, adjustments: InvoiceAdjustments) -> Self {
        self.adjustments = Some(adjustments);
        self
    }

    pub fn add_case(mut self, case: BillingCase) -> Self {
        self.cases.push(case);
        self
    }

    pub fn intro_text(mut self, text: impl Into<String>) -> Self {
        self.intro_text = Some(text.into());
        self
    }

    pub fn closing_text(mut self, text: impl Into<String>) -> Self {
        self.closing_text = Some(text.into());
        self
    }

    pub fn print(mut self, print: bool) -> Self {
        self.print = print;
        self
    }

    pub fn electronic_delivery(mut self, flag: bool) -> Self {
        self.electronic_delivery = Some(flag);
        self
    }

    pub fn ais_invoice_number(mut self, number: impl Into<String>) -> Self {
        self.ais_invoice_number = Some(number.into());
        self
    }

    pub fn ais_file_reference(mut self, reference: impl Into<String>) -> Self {
        self.ais_file_reference = Some(reference.into());
        self
    }

    pub fn ais_total(mut self, total: Decimal) -> Self {
        self.ais_total = Some(total);
        self
    }

    pub fn build(self) -> Result<Invoice, PadnextError> {
        if self.cases.is_empty() {
            return Err(PadnextError::Builder(
                "at least one billing case is required".into(),
            ));
        }
        if self.id.trim().is_empty() {
            return Err(PadnextError::Builder("invoice id must not be empty".into()));
        }
        Ok(Invoice {
            id: self.id,
            recipient: self.recipient,
            payment: self.payment,
            adjustments: self.adjustments,
            cases: self.cases,
            intro_text: self.intro_text,
            closing_text: self.closing_text,
            print: self.print,
            electronic_delivery: self.electronic_delivery,
            ais_invoice_number: self.ais_invoice_number,
            ais_file_reference: self.ais_file_reference,
            ais_total: self.ais_total,
        })
    }
}

/// Which `abrechnungsfall` variant a [`CaseBuilder`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseKind {
    Statutory,
    Private,
    OrthodonticPrivate,
    PatientCopay,
    HumanMedicine,
}

/// Builder for a billing case. The sum block is derived from the items on `build()`.
pub struct CaseBuilder {
    kind: CaseKind,
    provider_id: Option<String>,
    patient: Person,
    insured: Option<Insured>,
    period: Option<Period>,
    treatment_kind: Option<TreatmentKind>,
    diagnoses: Vec<Diagnosis>,
    items: Vec<LineItem>,
    prepayment: Option<Decimal>,
    reduction: Option<Decimal>,
    reduction_rate: Option<ReductionRate>,
    health_card: Option<HealthCard>,
    vat_rate: Option<Decimal>,
    contract_type: Option<u16>,
    description: Option<String>,
    file_reference: Option<String>,
}

impl CaseBuilder {
    pub fn new(kind: CaseKind, patient: Person) -> Self {
        Self {
            kind,
            provider_id: None,
            patient,
            insured: None,
            period: None,
            treatment_kind: None,
            diagnoses: Vec::new(),
            items: Vec::new(),
            prepayment: None,
            reduction: None,
            reduction_rate: None,
            health_card: None,
            vat_rate: None,
            contract_type: None,
            description: None,
            file_reference: None,
        }
    }

    /// Shortcut for a `humanmedizin` case with the given contract type.
    pub fn human_medicine(patient: Person, contract_type: u16) -> Self {
        Self::new(CaseKind::HumanMedicine, patient).contract_type(contract_type)
    }

    pub fn provider_id(mut self, id: impl Into<String>) -> Self {
        self.provider_id = Some(id.into());
        self
    }

    pub fn insured(mut self, person: Person, address: Option<Address>) -> Self {
        self.insured = Some(Insured { person, address });
        self
    }

    pub fn period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.period = Some(Period { start, end });
        self
    }

    pub fn treatment_kind(mut self, kind: TreatmentKind) -> Self {
        self.treatment_kind = Some(kind);
        self
    }

    pub fn diagnosis(mut self, text: impl Into<String>, code: Option<&str>) -> Self {
        self.diagnoses.push(Diagnosis {
            text: text.into(),
            code: code.map(str::to_string),
        });
        self
    }

    pub fn add_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn prepayment(mut self, amount: Decimal) -> Self {
        self.prepayment = Some(amount);
        self
    }

    pub fn reduction(mut self, amount: Decimal) -> Self {
        self.reduction = Some(amount);
        self
    }

    pub fn reduction_rate(mut self, rate: ReductionRate) -> Self {
        self.reduction_rate = Some(rate);
        self
    }

    pub fn health_card(mut self, card: HealthCard) -> Self {
        self.health_card = Some(card);
        self
    }

    pub fn vat_rate(mut self, rate: Decimal) -> Self {
        self.vat_rate = Some(rate);
        self
    }

    pub fn contract_type(mut self, contract_type: u16) -> Self {
        self.contract_type = Some(contract_type);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn file_reference(mut self, reference: impl Into<String>) -> Self {
        self.file_reference = Some(reference.into());
        self
    }

    pub fn build(self) -> Result<BillingCase, PadnextError> {
        if self.items.len() > 9999 {
            return Err(PadnextError::Builder(
                "a case cannot have more than 9999 line items".into(),
            ));
        }
        let sums = money::compute_sums(&self.items, self.prepayment, self.reduction)
            .map_err(|e| {
                PadnextError::ModelConstraint(vec![ValidationError::with_rule(
                    "sums",
                    format!("line totals cannot be summed: {e}"),
                    validation::AMOUNT_OVERFLOW_RULE,
                )])
            })?;
        let core = CaseCore {
            provider_id: self.provider_id,
            patient: self.patient,
            insured: self.insured,
            period: self.period,
            treatment_kind: self.treatment_kind,
            diagnoses: self.diagnoses,
            items: self.items,
            sums,
        };
        let case = match self.kind {
            CaseKind::Statutory => BillingCase::Statutory {
                core,
                health_card: self.health_card,
            },
            CaseKind::Private => BillingCase::Private {
                core,
                reduction_rate: self.reduction_rate,
            },
            CaseKind::OrthodonticPrivate => BillingCase::OrthodonticPrivate {
                core,
                reduction_rate: self.reduction_rate,
            },
            CaseKind::PatientCopay => BillingCase::PatientCopay {
                core,
                reduction_rate: self.reduction_rate,
            },
            CaseKind::HumanMedicine => BillingCase::HumanMedicine {
                core,
                vat_rate: self.vat_rate,
                reduction_rate: self.reduction_rate,
                contract_type: self.contract_type.ok_or_else(|| {
                    PadnextError::Builder(
                        "contract type (vertragsart) is required for human medicine cases".into(),
                    )
                })?,
                description: self.description,
                file_reference: self.file_reference,
            },
        };
        Ok(case)
    }
}

fn position(position_number: u32, date: NaiveDate, text: String, quantity: u32) -> PositionCore {
    PositionCore {
        position_number: Some(position_number),
        provider_id: None,
        date,
        time: None,
        quantity,
        text,
        extra_text: None,
        id: None,
        idref: None,
    }
}

/// Builder for a fee line (`goziffer`).
///
/// Without an explicit total, `build()` derives it from unit price (or points
/// times point value), factor and quantity.
pub struct FeeLineBuilder {
    line: FeeLine,
    explicit_total: Option<Decimal>,
}

impl FeeLineBuilder {
    pub fn new(
        position_number: u32,
        date: NaiveDate,
        code: FeeCode,
        text: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            line: FeeLine {
                position: position(position_number, date, text.into(), quantity),
                code,
                factor: None,
                reduction_rate: None,
                point_value: None,
                points: None,
                unit_price: None,
                total: Decimal::ZERO,
                vat_rate: None,
                justification: None,
                billing: None,
            },
            explicit_total: None,
        }
    }

    pub fn factor(mut self, factor: Decimal) -> Self {
        self.line.factor = Some(factor);
        self
    }

    pub fn unit_price(mut self, price: Decimal) -> Self {
        self.line.unit_price = Some(price);
        self
    }

    pub fn points(mut self, points: u32, point_value: Decimal) -> Self {
        self.line.points = Some(points);
        self.line.point_value = Some(point_value);
        self
    }

    pub fn total(mut self, total: Decimal) -> Self {
        self.explicit_total = Some(total);
        self
    }

    pub fn billing(mut self, mode: BillingMode) -> Self {
        self.line.billing = Some(mode);
        self
    }

    pub fn reduction_rate(mut self, rate: ReductionRate) -> Self {
        self.line.reduction_rate = Some(rate);
        self
    }

    pub fn vat_rate(mut self, rate: Decimal) -> Self {
        self.line.vat_rate = Some(rate);
        self
    }

    pub fn justification(mut self, text: impl Into<String>) -> Self {
        self.line.justification = Some(text.into());
        self
    }

    pub fn extra_text(mut self, text: impl Into<String>) -> Self {
        self.line.position.extra_text = Some(text.into());
        self
    }

    pub fn provider_id(mut self, id: impl Into<String>) -> Self {
        self.line.position.provider_id = Some(id.into());
        self
    }

    pub fn time(mut self, time: NaiveTime) -> Self {
        self.line.position.time = Some(time);
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.line.position.id = Some(id.into());
        self
    }

    pub fn build(mut self) -> LineItem {
        self.line.total = self
            .explicit_total
            .or_else(|| money::fee_total(&self.line))
            .unwrap_or(Decimal::ZERO);
        LineItem::Fee(self.line)
    }
}

/// Builder for an expense line (`auslagen`).
pub struct ExpenseLineBuilder {
    line: ExpenseLine,
}

impl ExpenseLineBuilder {
    pub fn new(
        position_number: u32,
        date: NaiveDate,
        text: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Self {
        Self {
            line: ExpenseLine {
                position: position(position_number, date, text.into(), quantity),
                vat_rate: None,
                unit_price,
                total: None,
                kind: None,
                not_billed: false,
            },
        }
    }

    pub fn kind(mut self, kind: ExpenseKind) -> Self {
        self.line.kind = Some(kind);
        self
    }

    pub fn vat_rate(mut self, rate: Decimal) -> Self {
        self.line.vat_rate = Some(rate);
        self
    }

    pub fn not_billed(mut self) -> Self {
        self.line.not_billed = true;
        self
    }

    pub fn provider_id(mut self, id: impl Into<String>) -> Self {
        self.line.position.provider_id = Some(id.into());
        self
    }

    pub fn build(mut self) -> LineItem {
        self.line.total = money::line_amount(self.line.unit_price, self.line.position.quantity);
        LineItem::Expense(self.line)
    }
}

/// Builder for a travel compensation line (`entschaedigung`).
pub struct TravelLineBuilder {
    line: TravelLine,
    explicit_total: Option<Decimal>,
}

impl TravelLineBuilder {
    pub fn new(
        position_number: u32,
        date: NaiveDate,
        text: impl Into<String>,
        compensation: TravelCompensation,
    ) -> Self {
        Self {
            line: TravelLine {
                position: position(position_number, date, text.into(), 1),
                compensation,
                share_divisor: None,
                unit_price: None,
                total: Decimal::ZERO,
                schedule: Some(FeeSchedule::Goae),
            },
            explicit_total: None,
        }
    }

    pub fn unit_price(mut self, price: Decimal) -> Self {
        self.line.unit_price = Some(price);
        self
    }

    pub fn share_divisor(mut self, divisor: u8) -> Self {
        self.line.share_divisor = Some(divisor);
        self
    }

    pub fn total(mut self, total: Decimal) -> Self {
        self.explicit_total = Some(total);
        self
    }

    pub fn schedule(mut self, schedule: FeeSchedule) -> Self {
        self.line.schedule = Some(schedule);
        self
    }

    pub fn build(mut self) -> LineItem {
        self.line.total = self
            .explicit_total
            .or_else(|| money::expected_travel_total(&self.line).ok().flatten())
            .unwrap_or(Decimal::ZERO);
        LineItem::Travel(self.line)
    }
}

/// Builder for an order manifest (`auftrag`).
pub struct OrderManifestBuilder {
    sender: Participant,
    receiver: Participant,
    created_at: NaiveDateTime,
    message_type: MessageType,
    system: SystemInfo,
    encryption: EncryptionDescriptor,
    receipt: ReceiptRequest,
    files: Vec<FileEntry>,
    transfer_number: u32,
    real_data: bool,
}

impl OrderManifestBuilder {
    pub fn new(sender: Participant, receiver: Participant, created_at: NaiveDateTime) -> Self {
        Self {
            sender,
            receiver,
            created_at,
            message_type: MessageType {
                kind: MessageKind::Delivery,
                version: "2.12".into(),
            },
            system: SystemInfo {
                product: env!("CARGO_PKG_NAME").into(),
                version: env!("CARGO_PKG_VERSION").into(),
                manufacturer: "padnext".into(),
                certification_number: None,
            },
            encryption: EncryptionDescriptor::none(),
            receipt: ReceiptRequest {
                requested: false,
                email: None,
            },
            files: Vec::new(),
            transfer_number: 1,
            real_data: false,
        }
    }

    pub fn message_type(mut self, kind: MessageKind, version: impl Into<String>) -> Self {
        self.message_type = MessageType {
            kind,
            version: version.into(),
        };
        self
    }

    pub fn system(mut self, system: SystemInfo) -> Self {
        self.system = system;
        self
    }

    pub fn encryption(mut self, encryption: EncryptionDescriptor) -> Self {
        self.encryption = encryption;
        self
    }

    pub fn receipt(mut self, requested: bool, email: Option<&str>) -> Self {
        self.receipt = ReceiptRequest {
            requested,
            email: email.map(str::to_string),
        };
        self
    }

    pub fn add_file(mut self, file: FileEntry) -> Self {
        self.files.push(file);
        self
    }

    pub fn files(mut self, files: Vec<FileEntry>) -> Self {
        self.files = files;
        self
    }

    pub fn transfer_number(mut self, number: u32) -> Self {
        self.transfer_number = number;
        self
    }

    pub fn real_data(mut self, real: bool) -> Self {
        self.real_data = real;
        self
    }

    /// Build the manifest with `file_count` set from the entries, then validate.
    pub fn build(self) -> Result<OrderManifest, PadnextError> {
        let manifest = self.build_unchecked();
        let errors = validation::validate_manifest(&manifest);
        if !errors.is_empty() {
            return Err(PadnextError::ModelConstraint(errors));
        }
        Ok(manifest)
    }

    pub fn build_unchecked(self) -> OrderManifest {
        OrderManifest {
            receiver: self.receiver,
            sender: self.sender,
            message_type: self.message_type,
            system: self.system,
            encryption: self.encryption,
            receipt: self.receipt,
            file_count: self.files.len() as u32,
            files: self.files,
            created_at: self.created_at,
            transfer_number: self.transfer_number,
            real_data: self.real_data,
        }
    }
}
