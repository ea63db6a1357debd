use rust_decimal::Decimal;

use crate::core::*;

use super::tree::Element;
use super::writer::{XmlWriter, format_bool, format_date, format_decimal, format_time};
use super::{
    PAD_NAMESPACE, PadDocument, opt, parse_bool, parse_date, parse_decimal, parse_num, parse_time,
};

impl PadDocument for InvoiceBatch {
    const ROOT: &'static str = "rechnungen";
    const KIND: DocumentKind = DocumentKind::Payload;

    fn write_xml(&self, w: &mut XmlWriter) -> Result<(), PadnextError> {
        let count = self.invoices.len().to_string();
        w.start_element_with_attrs("rechnungen", &[("xmlns", PAD_NAMESPACE), ("anzahl", &count)])?;

        w.opt_text_element("hinweistext", self.notice.as_deref())?;
        w.text_element("nachrichtentyp", BATCH_MESSAGE_TYPE)?;
        write_issuer(w, &self.issuer)?;
        for provider in &self.providers {
            write_provider(w, provider)?;
        }
        for invoice in &self.invoices {
            write_invoice(w, invoice)?;
        }

        w.end_element("rechnungen")?;
        Ok(())
    }

    fn from_element(root: &Element) -> Result<Self, PadnextError> {
        let message = root.req_text("nachrichtentyp")?;
        if message.trim() != BATCH_MESSAGE_TYPE {
            return Err(PadnextError::Xml(format!(
                "payload nachrichtentyp must be {BATCH_MESSAGE_TYPE}, found '{message}'"
            )));
        }

        Ok(InvoiceBatch {
            notice: root.child_text("hinweistext").map(str::to_string),
            issuer: read_issuer(root.req_child("rechnungsersteller")?)?,
            providers: root
                .children_named("leistungserbringer")
                .map(read_provider)
                .collect::<Result<_, _>>()?,
            invoices: root
                .children_named("rechnung")
                .map(read_invoice)
                .collect::<Result<_, _>>()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Parties
// ---------------------------------------------------------------------------

fn write_address(w: &mut XmlWriter, address: &Address) -> Result<(), PadnextError> {
    w.start_element("anschrift")?;
    w.start_element("hausadresse")?;
    w.opt_text_element("land", address.country.as_deref())?;
    w.opt_text_element("zusatz", address.extra.as_deref())?;
    w.text_element("plz", &address.postal_code)?;
    w.text_element("ort", &address.city)?;
    w.opt_text_element("strasse", address.street.as_deref())?;
    w.opt_text_element("hausnr", address.house_number.as_deref())?;
    w.end_element("hausadresse")?;
    w.end_element("anschrift")?;
    Ok(())
}

fn read_address(elem: &Element) -> Result<Address, PadnextError> {
    let house = elem.req_child("hausadresse")?;
    Ok(Address {
        country: text(house, "land"),
        extra: text(house, "zusatz"),
        postal_code: house.req_text("plz")?.to_string(),
        city: house.req_text("ort")?.to_string(),
        street: text(house, "strasse"),
        house_number: text(house, "hausnr"),
    })
}

fn write_person_fields(w: &mut XmlWriter, person: &Person) -> Result<(), PadnextError> {
    w.opt_text_element("anrede", person.salutation.as_deref())?;
    w.opt_text_element("titel", person.title.as_deref())?;
    w.opt_text_element("vorname", person.first_name.as_deref())?;
    w.text_element("name", &person.last_name)?;
    w.opt_text_element("namezusatz", person.name_suffix.as_deref())?;
    if let Some(date) = person.birth_date {
        w.text_element("gebdatum", &format_date(date))?;
    }
    if let Some(sex) = person.sex {
        w.text_element("geschlecht", sex.code())?;
    }
    Ok(())
}

fn read_person_fields(elem: &Element) -> Result<Person, PadnextError> {
    Ok(Person {
        salutation: text(elem, "anrede"),
        title: text(elem, "titel"),
        first_name: text(elem, "vorname"),
        last_name: elem.req_text("name")?.to_string(),
        name_suffix: text(elem, "namezusatz"),
        birth_date: opt(elem.child_text("gebdatum"), |v| parse_date(v, "gebdatum"))?,
        sex: opt(elem.child_text("geschlecht"), |v| {
            Sex::from_code(v.trim())
                .ok_or_else(|| PadnextError::Xml(format!("unknown geschlecht '{v}'")))
        })?,
    })
}

fn write_issuer(w: &mut XmlWriter, issuer: &Issuer) -> Result<(), PadnextError> {
    w.start_element("rechnungsersteller")?;
    w.text_element("name", &issuer.name)?;
    for suffix in &issuer.name_suffixes {
        w.text_element("namezusatz", suffix)?;
    }
    w.text_element("kundennr", &issuer.customer_number.to_string())?;
    write_address(w, &issuer.address)?;
    if let Some(ik) = issuer.ik_number {
        w.text_element("iknr", &ik.to_string())?;
    }
    for contact in &issuer.contacts {
        match contact.kind {
            Some(kind) => w.text_element_with_attrs("kontakt", &contact.value, &[("art", kind.code())])?,
            None => w.text_element("kontakt", &contact.value)?,
        };
    }
    w.opt_text_element("ustidnr", issuer.vat_id.as_deref())?;
    w.opt_text_element("glaeubigerid", issuer.creditor_id.as_deref())?;
    w.end_element("rechnungsersteller")?;
    Ok(())
}

fn read_issuer(elem: &Element) -> Result<Issuer, PadnextError> {
    Ok(Issuer {
        name: elem.req_text("name")?.to_string(),
        name_suffixes: elem
            .children_named("namezusatz")
            .map(|e| e.text.clone())
            .collect(),
        customer_number: parse_num(elem.req_text("kundennr")?, "rechnungsersteller/kundennr")?,
        address: read_address(elem.req_child("anschrift")?)?,
        ik_number: opt(elem.child_text("iknr"), |v| parse_num(v, "rechnungsersteller/iknr"))?,
        contacts: elem
            .children_named("kontakt")
            .map(|e| {
                Ok(Contact {
                    kind: opt(e.attr("art"), |v| {
                        ContactKind::from_code(v.trim())
                            .ok_or_else(|| PadnextError::Xml(format!("unknown kontakt art '{v}'")))
                    })?,
                    value: e.text.clone(),
                })
            })
            .collect::<Result<_, PadnextError>>()?,
        vat_id: text(elem, "ustidnr"),
        creditor_id: text(elem, "glaeubigerid"),
    })
}

fn write_provider(w: &mut XmlWriter, provider: &Provider) -> Result<(), PadnextError> {
    let mut attrs: Vec<(&str, &str)> = vec![("id", provider.id.as_str())];
    if let Some(ais) = &provider.ais_id {
        attrs.push(("aisid", ais.as_str()));
    }
    w.start_element_with_attrs("leistungserbringer", &attrs)?;
    write_person_fields(w, &provider.person)?;
    if let Some(address) = &provider.address {
        write_address(w, address)?;
    }
    if let Some(number) = provider.customer_number {
        w.text_element("kundennr", &number.to_string())?;
    }
    for lanr in &provider.lanr {
        w.text_element("lanr", &format!("{lanr:09}"))?;
    }
    w.opt_text_element("ustidnr", provider.vat_id.as_deref())?;
    if let Some(ik) = provider.ik_number {
        w.text_element("iknr", &ik.to_string())?;
    }
    w.end_element("leistungserbringer")?;
    Ok(())
}

fn read_provider(elem: &Element) -> Result<Provider, PadnextError> {
    Ok(Provider {
        id: elem.req_attr("id")?.to_string(),
        person: read_person_fields(elem)?,
        address: elem.child("anschrift").map(read_address).transpose()?,
        customer_number: opt(elem.child_text("kundennr"), |v| {
            parse_num(v, "leistungserbringer/kundennr")
        })?,
        lanr: elem
            .children_named("lanr")
            .map(|e| parse_num(&e.text, "lanr"))
            .collect::<Result<_, _>>()?,
        vat_id: text(elem, "ustidnr"),
        ik_number: opt(elem.child_text("iknr"), |v| parse_num(v, "leistungserbringer/iknr"))?,
        ais_id: elem.attr("aisid").map(str::to_string),
    })
}

// ---------------------------------------------------------------------------
// Invoice
// ---------------------------------------------------------------------------

fn write_invoice(w: &mut XmlWriter, invoice: &Invoice) -> Result<(), PadnextError> {
    let ais_total = invoice.ais_total.map(format_decimal);
    let mut attrs: Vec<(&str, &str)> = vec![
        ("id", invoice.id.as_str()),
        ("druckkennzeichen", format_bool(invoice.print)),
    ];
    if let Some(flag) = invoice.electronic_delivery {
        attrs.push(("eabgabe", format_bool(flag)));
    }
    if let Some(number) = &invoice.ais_invoice_number {
        attrs.push(("aisrechnungsnr", number.as_str()));
    }
    if let Some(reference) = &invoice.ais_file_reference {
        attrs.push(("aisaktenzeichen", reference.as_str()));
    }
    if let Some(total) = &ais_total {
        attrs.push(("aisendbetrag", total.as_str()));
    }
    w.start_element_with_attrs("rechnung", &attrs)?;

    w.start_element("rechnungsempfaenger")?;
    match &invoice.recipient {
        Recipient::Person { person, address } => {
            w.start_element("person")?;
            write_person_fields(w, person)?;
            write_address(w, address)?;
            w.end_element("person")?;
        }
        Recipient::Organisation(org) => {
            w.start_element("organisation")?;
            w.text_element("name", &org.name)?;
            write_address(w, &org.address)?;
            w.end_element("organisation")?;
        }
    }
    w.end_element("rechnungsempfaenger")?;

    if let Some(payment) = &invoice.payment {
        write_payment(w, payment)?;
    }
    if let Some(adjustments) = &invoice.adjustments {
        write_adjustments(w, adjustments)?;
    }
    for case in &invoice.cases {
        write_case(w, case)?;
    }
    w.opt_text_element("anfangstext", invoice.intro_text.as_deref())?;
    w.opt_text_element("endetext", invoice.closing_text.as_deref())?;

    w.end_element("rechnung")?;
    Ok(())
}

fn read_invoice(elem: &Element) -> Result<Invoice, PadnextError> {
    let recipient_elem = elem.req_child("rechnungsempfaenger")?;
    let recipient = if let Some(p) = recipient_elem.child("person") {
        Recipient::Person {
            person: read_person_fields(p)?,
            address: read_address(p.req_child("anschrift")?)?,
        }
    } else if let Some(o) = recipient_elem.child("organisation") {
        Recipient::Organisation(Organisation {
            name: o.req_text("name")?.to_string(),
            address: read_address(o.req_child("anschrift")?)?,
        })
    } else {
        return Err(PadnextError::Xml(
            "rechnungsempfaenger must contain person or organisation".into(),
        ));
    };

    Ok(Invoice {
        id: elem.req_attr("id")?.to_string(),
        recipient,
        payment: elem.child("zahlung").map(read_payment).transpose()?,
        adjustments: elem
            .child("rechnungsvorgaben")
            .map(read_adjustments)
            .transpose()?,
        cases: elem
            .children_named("abrechnungsfall")
            .map(read_case)
            .collect::<Result<_, _>>()?,
        intro_text: text(elem, "anfangstext"),
        closing_text: text(elem, "endetext"),
        print: opt(elem.attr("druckkennzeichen"), |v| parse_bool(v, "druckkennzeichen"))?
            .unwrap_or(true),
        electronic_delivery: opt(elem.attr("eabgabe"), |v| parse_bool(v, "eabgabe"))?,
        ais_invoice_number: elem.attr("aisrechnungsnr").map(str::to_string),
        ais_file_reference: elem.attr("aisaktenzeichen").map(str::to_string),
        ais_total: opt(elem.attr("aisendbetrag"), |v| parse_decimal(v, "aisendbetrag"))?,
    })
}

fn write_payment(w: &mut XmlWriter, payment: &PaymentTerms) -> Result<(), PadnextError> {
    match payment.method {
        Some(method) => w.start_element_with_attrs("zahlung", &[("art", method.code())])?,
        None => w.start_element("zahlung")?,
    };
    if let Some(account) = &payment.account {
        w.start_element("kontoverbindung")?;
        w.opt_text_element("inhaber", account.holder.as_deref())?;
        w.opt_text_element("bank", account.bank.as_deref())?;
        w.opt_text_element("bic", account.bic.as_deref())?;
        w.text_element("iban", &account.iban)?;
        w.opt_text_element("mandatsreferenz", account.mandate_reference.as_deref())?;
        w.end_element("kontoverbindung")?;
    }
    w.end_element("zahlung")?;
    Ok(())
}

fn read_payment(elem: &Element) -> Result<PaymentTerms, PadnextError> {
    let account = match elem.child("kontoverbindung") {
        Some(k) => Some(BankAccount {
            holder: text(k, "inhaber"),
            bank: text(k, "bank"),
            bic: text(k, "bic"),
            iban: k.req_text("iban")?.to_string(),
            mandate_reference: text(k, "mandatsreferenz"),
        }),
        None => None,
    };
    Ok(PaymentTerms {
        account,
        method: opt(elem.attr("art"), |v| {
            PaymentMethod::from_code(v.trim())
                .ok_or_else(|| PadnextError::Xml(format!("unknown zahlung art '{v}'")))
        })?,
    })
}

fn write_adjustments(w: &mut XmlWriter, adj: &InvoiceAdjustments) -> Result<(), PadnextError> {
    w.start_element("rechnungsvorgaben")?;
    w.opt_decimal_element("direktzahlungsbetrag", adj.prepaid)?;
    if let Some(discount) = &adj.discount {
        w.start_element("nachlass")?;
        w.opt_decimal_element("betrag", discount.amount)?;
        w.opt_decimal_element("prozent", discount.percent)?;
        w.end_element("nachlass")?;
    }
    if let Some(copay) = &adj.copayment {
        w.text_element_with_attrs(
            "zuzahlungsbetrag",
            &format_decimal(copay.amount),
            &[("kennzeichen", &copay.code)],
        )?;
    }
    w.end_element("rechnungsvorgaben")?;
    Ok(())
}

fn read_adjustments(elem: &Element) -> Result<InvoiceAdjustments, PadnextError> {
    let discount = match elem.child("nachlass") {
        Some(n) => Some(Discount {
            amount: dec_child(n, "betrag")?,
            percent: dec_child(n, "prozent")?,
        }),
        None => None,
    };
    let copayment = match elem.child("zuzahlungsbetrag") {
        Some(z) => Some(Copayment {
            amount: parse_decimal(&z.text, "zuzahlungsbetrag")?,
            code: z.req_attr("kennzeichen")?.to_string(),
        }),
        None => None,
    };
    Ok(InvoiceAdjustments {
        prepaid: dec_child(elem, "direktzahlungsbetrag")?,
        discount,
        copayment,
    })
}

// ---------------------------------------------------------------------------
// Billing cases
// ---------------------------------------------------------------------------

const CASE_KINDS: &[&str] = &[
    "bema",
    "bmgnormprivat",
    "bmgnormkfoprivat",
    "eigenanteilsrechnung",
    "humanmedizin",
];

fn write_case(w: &mut XmlWriter, case: &BillingCase) -> Result<(), PadnextError> {
    w.start_element("abrechnungsfall")?;
    let name = case.element_name();
    w.start_element(name)?;

    let core = case.core();
    w.opt_text_element("leistungserbringerid", core.provider_id.as_deref())?;
    w.start_element("behandelter")?;
    write_person_fields(w, &core.patient)?;
    w.end_element("behandelter")?;
    if let Some(insured) = &core.insured {
        w.start_element("versicherter")?;
        write_person_fields(w, &insured.person)?;
        if let Some(address) = &insured.address {
            write_address(w, address)?;
        }
        w.end_element("versicherter")?;
    }
    if let Some(period) = &core.period {
        w.start_element("zeitraum")?;
        w.text_element("startdatum", &format_date(period.start))?;
        w.text_element("endedatum", &format_date(period.end))?;
        w.end_element("zeitraum")?;
    }

    match case {
        BillingCase::HumanMedicine {
            vat_rate,
            reduction_rate,
            contract_type,
            description,
            file_reference,
            ..
        } => {
            w.opt_decimal_element("mwstsatz", *vat_rate)?;
            write_reduction(w, *reduction_rate)?;
            write_treatment(w, core.treatment_kind)?;
            w.text_element("vertragsart", &contract_type.to_string())?;
            w.opt_text_element("beschreibung", description.as_deref())?;
            w.opt_text_element("aktenzeichen", file_reference.as_deref())?;
        }
        BillingCase::Statutory { health_card, .. } => {
            write_treatment(w, core.treatment_kind)?;
            if let Some(card) = health_card {
                w.start_element("kvkartendaten")?;
                w.text_element("kassenname", &card.insurer_name)?;
                if let Some(number) = card.insurer_number {
                    w.text_element("kassennr", &number.to_string())?;
                }
                w.opt_text_element("versichertennr", card.insured_number.as_deref())?;
                w.end_element("kvkartendaten")?;
            }
        }
        BillingCase::Private { reduction_rate, .. }
        | BillingCase::OrthodonticPrivate { reduction_rate, .. }
        | BillingCase::PatientCopay { reduction_rate, .. } => {
            write_reduction(w, *reduction_rate)?;
            write_treatment(w, core.treatment_kind)?;
        }
    }

    for diagnosis in &core.diagnoses {
        w.start_element("diagnose")?;
        w.text_element("text", &diagnosis.text)?;
        w.opt_text_element("code", diagnosis.code.as_deref())?;
        w.end_element("diagnose")?;
    }

    let count = core.items.len().to_string();
    w.start_element_with_attrs("positionen", &[("posanzahl", &count)])?;
    for item in &core.items {
        write_item(w, item)?;
    }
    w.end_element("positionen")?;

    let sums = &core.sums;
    w.start_element("summenblock")?;
    w.decimal_element("honorar", sums.fees)?;
    w.opt_decimal_element("auslagen", sums.expenses)?;
    w.opt_decimal_element("entschaedigung", sums.travel)?;
    w.decimal_element("rechnungsbetrag", sums.total)?;
    w.opt_decimal_element("vorauszahlung", sums.prepayment)?;
    w.opt_decimal_element("minderungsbetrag", sums.reduction)?;
    w.decimal_element("zahlbetrag", sums.payable)?;
    w.end_element("summenblock")?;

    w.end_element(name)?;
    w.end_element("abrechnungsfall")?;
    Ok(())
}

fn write_reduction(w: &mut XmlWriter, rate: Option<ReductionRate>) -> Result<(), PadnextError> {
    if let Some(rate) = rate {
        w.text_element("minderungssatz", &rate.percent().to_string())?;
    }
    Ok(())
}

fn write_treatment(w: &mut XmlWriter, kind: Option<TreatmentKind>) -> Result<(), PadnextError> {
    if let Some(kind) = kind {
        w.text_element("behandlungsart", &kind.code().to_string())?;
    }
    Ok(())
}

fn read_case(elem: &Element) -> Result<BillingCase, PadnextError> {
    let inner = elem
        .children
        .first()
        .ok_or_else(|| PadnextError::Xml("abrechnungsfall is empty".into()))?;
    if !CASE_KINDS.contains(&inner.name.as_str()) {
        return Err(PadnextError::Xml(format!(
            "unknown billing case kind <{}>",
            inner.name
        )));
    }

    let core = read_case_core(inner)?;
    let reduction_rate = read_reduction(inner)?;

    let case = match inner.name.as_str() {
        "bema" => BillingCase::Statutory {
            core,
            health_card: match inner.child("kvkartendaten") {
                Some(k) => Some(HealthCard {
                    insurer_name: k.req_text("kassenname")?.to_string(),
                    insurer_number: opt(k.child_text("kassennr"), |v| parse_num(v, "kassennr"))?,
                    insured_number: text(k, "versichertennr"),
                }),
                None => None,
            },
        },
        "bmgnormprivat" => BillingCase::Private {
            core,
            reduction_rate,
        },
        "bmgnormkfoprivat" => BillingCase::OrthodonticPrivate {
            core,
            reduction_rate,
        },
        "eigenanteilsrechnung" => BillingCase::PatientCopay {
            core,
            reduction_rate,
        },
        _ => BillingCase::HumanMedicine {
            core,
            vat_rate: dec_child(inner, "mwstsatz")?,
            reduction_rate,
            contract_type: parse_num(inner.req_text("vertragsart")?, "vertragsart")?,
            description: text(inner, "beschreibung"),
            file_reference: text(inner, "aktenzeichen"),
        },
    };
    Ok(case)
}

fn read_reduction(elem: &Element) -> Result<Option<ReductionRate>, PadnextError> {
    opt(elem.child_text("minderungssatz"), |v| {
        let percent: u8 = parse_num(v, "minderungssatz")?;
        ReductionRate::from_percent(percent)
            .ok_or_else(|| PadnextError::Xml(format!("unsupported minderungssatz '{v}'")))
    })
}

fn read_case_core(elem: &Element) -> Result<CaseCore, PadnextError> {
    let insured = match elem.child("versicherter") {
        Some(v) => Some(Insured {
            person: read_person_fields(v)?,
            address: v.child("anschrift").map(read_address).transpose()?,
        }),
        None => None,
    };
    let period = match elem.child("zeitraum") {
        Some(z) => Some(Period {
            start: parse_date(z.req_text("startdatum")?, "startdatum")?,
            end: parse_date(z.req_text("endedatum")?, "endedatum")?,
        }),
        None => None,
    };
    let treatment_kind = opt(elem.child_text("behandlungsart"), |v| {
        let code: u8 = parse_num(v, "behandlungsart")?;
        TreatmentKind::from_code(code)
            .ok_or_else(|| PadnextError::Xml(format!("unknown behandlungsart '{v}'")))
    })?;
    let diagnoses = elem
        .children_named("diagnose")
        .map(|d| {
            Ok(Diagnosis {
                text: d.req_text("text")?.to_string(),
                code: text(d, "code"),
            })
        })
        .collect::<Result<_, PadnextError>>()?;
    let items = elem
        .req_child("positionen")?
        .children
        .iter()
        .map(read_item)
        .collect::<Result<_, _>>()?;

    let s = elem.req_child("summenblock")?;
    let sums = SumBlock {
        fees: parse_decimal(s.req_text("honorar")?, "honorar")?,
        expenses: dec_child(s, "auslagen")?,
        travel: dec_child(s, "entschaedigung")?,
        total: parse_decimal(s.req_text("rechnungsbetrag")?, "rechnungsbetrag")?,
        prepayment: dec_child(s, "vorauszahlung")?,
        reduction: dec_child(s, "minderungsbetrag")?,
        payable: parse_decimal(s.req_text("zahlbetrag")?, "zahlbetrag")?,
    };

    Ok(CaseCore {
        provider_id: text(elem, "leistungserbringerid"),
        patient: read_person_fields(elem.req_child("behandelter")?)?,
        insured,
        period,
        treatment_kind,
        diagnoses,
        items,
        sums,
    })
}

// ---------------------------------------------------------------------------
// Line items
// ---------------------------------------------------------------------------

fn position_attrs<'a>(
    position_number: &'a Option<String>,
    id: &'a Option<String>,
    idref: &'a Option<String>,
) -> Vec<(&'a str, &'a str)> {
    let mut attrs = Vec::new();
    if let Some(n) = position_number {
        attrs.push(("positionsnr", n.as_str()));
    }
    if let Some(id) = id {
        attrs.push(("id", id.as_str()));
    }
    if let Some(idref) = idref {
        attrs.push(("idref", idref.as_str()));
    }
    attrs
}

fn write_position_core(w: &mut XmlWriter, p: &PositionCore) -> Result<(), PadnextError> {
    w.opt_text_element("leistungserbringerid", p.provider_id.as_deref())?;
    w.text_element("datum", &format_date(p.date))?;
    if let Some(time) = p.time {
        w.text_element("uhrzeit", &format_time(time))?;
    }
    w.text_element("anzahl", &p.quantity.to_string())?;
    w.text_element("text", &p.text)?;
    w.opt_text_element("zusatztext", p.extra_text.as_deref())?;
    Ok(())
}

fn read_position_core(elem: &Element) -> Result<PositionCore, PadnextError> {
    Ok(PositionCore {
        position_number: opt(elem.attr("positionsnr"), |v| parse_num(v, "positionsnr"))?,
        provider_id: text(elem, "leistungserbringerid"),
        date: parse_date(elem.req_text("datum")?, "datum")?,
        time: opt(elem.child_text("uhrzeit"), |v| parse_time(v, "uhrzeit"))?,
        quantity: parse_num(elem.req_text("anzahl")?, "anzahl")?,
        text: elem.req_text("text")?.to_string(),
        extra_text: text(elem, "zusatztext"),
        id: elem.attr("id").map(str::to_string),
        idref: elem.attr("idref").map(str::to_string),
    })
}

fn write_item(w: &mut XmlWriter, item: &LineItem) -> Result<(), PadnextError> {
    match item {
        LineItem::Fee(line) => write_fee(w, line),
        LineItem::Expense(line) => write_expense(w, line),
        LineItem::Travel(line) => write_travel(w, line),
        LineItem::Text(line) => {
            let number = line.position_number.map(|n| n.to_string());
            let attrs = position_attrs(&number, &line.id, &line.idref);
            w.start_element_with_attrs("text", &attrs)?;
            w.text_element("text", &line.text)?;
            w.end_element("text")?;
            Ok(())
        }
    }
}

fn read_item(elem: &Element) -> Result<LineItem, PadnextError> {
    match elem.name.as_str() {
        "goziffer" => read_fee(elem).map(LineItem::Fee),
        "auslagen" => read_expense(elem).map(LineItem::Expense),
        "entschaedigung" => read_travel(elem).map(LineItem::Travel),
        "text" => Ok(LineItem::Text(TextLine {
            position_number: opt(elem.attr("positionsnr"), |v| parse_num(v, "positionsnr"))?,
            text: elem.req_text("text")?.to_string(),
            id: elem.attr("id").map(str::to_string),
            idref: elem.attr("idref").map(str::to_string),
        })),
        other => Err(PadnextError::Xml(format!("unknown position kind <{other}>"))),
    }
}

fn write_fee(w: &mut XmlWriter, line: &FeeLine) -> Result<(), PadnextError> {
    let p = &line.position;
    let number = p.position_number.map(|n| n.to_string());
    let mut attrs = position_attrs(&number, &p.id, &p.idref);
    if let Some(mode) = line.billing {
        attrs.push(("berechnung", mode.code()));
    }
    attrs.push(("go", line.code.schedule.code()));
    if let Some(version) = &line.code.version {
        attrs.push(("goversion", version.as_str()));
    }
    if let Some(analog) = &line.code.analog {
        attrs.push(("analog", analog.as_str()));
    }
    attrs.push(("ziffer", line.code.code.as_str()));
    w.start_element_with_attrs("goziffer", &attrs)?;

    write_position_core(w, p)?;
    w.opt_decimal_element("faktor", line.factor)?;
    write_reduction(w, line.reduction_rate)?;
    w.opt_decimal_element("punktwert", line.point_value)?;
    if let Some(points) = line.points {
        w.text_element("punktzahl", &points.to_string())?;
    }
    w.opt_decimal_element("einzelbetrag", line.unit_price)?;
    w.decimal_element("gesamtbetrag", line.total)?;
    w.opt_decimal_element("mwstsatz", line.vat_rate)?;
    w.opt_text_element("begruendungstext", line.justification.as_deref())?;

    w.end_element("goziffer")?;
    Ok(())
}

fn read_fee(elem: &Element) -> Result<FeeLine, PadnextError> {
    let schedule_code = elem.req_attr("go")?;
    let schedule = FeeSchedule::from_code(schedule_code.trim())
        .ok_or_else(|| PadnextError::Xml(format!("unknown fee schedule '{schedule_code}'")))?;
    Ok(FeeLine {
        position: read_position_core(elem)?,
        code: FeeCode {
            schedule,
            version: elem.attr("goversion").map(str::to_string),
            code: elem.req_attr("ziffer")?.to_string(),
            analog: elem.attr("analog").map(str::to_string),
        },
        factor: dec_child(elem, "faktor")?,
        reduction_rate: read_reduction(elem)?,
        point_value: dec_child(elem, "punktwert")?,
        points: opt(elem.child_text("punktzahl"), |v| parse_num(v, "punktzahl"))?,
        unit_price: dec_child(elem, "einzelbetrag")?,
        total: parse_decimal(elem.req_text("gesamtbetrag")?, "gesamtbetrag")?,
        vat_rate: dec_child(elem, "mwstsatz")?,
        justification: text(elem, "begruendungstext"),
        billing: opt(elem.attr("berechnung"), |v| {
            BillingMode::from_code(v.trim())
                .ok_or_else(|| PadnextError::Xml(format!("unknown berechnung '{v}'")))
        })?,
    })
}

fn write_expense(w: &mut XmlWriter, line: &ExpenseLine) -> Result<(), PadnextError> {
    let p = &line.position;
    let number = p.position_number.map(|n| n.to_string());
    let mut attrs = position_attrs(&number, &p.id, &p.idref);
    if let Some(kind) = line.kind {
        attrs.push(("kennzeichen", kind.code()));
    }
    if line.not_billed {
        attrs.push(("berechnung", BillingMode::NotBilled.code()));
    }
    w.start_element_with_attrs("auslagen", &attrs)?;

    write_position_core(w, p)?;
    w.opt_decimal_element("mwstsatz", line.vat_rate)?;
    w.decimal_element("einzelbetrag", line.unit_price)?;
    w.opt_decimal_element("gesamtbetrag", line.total)?;

    w.end_element("auslagen")?;
    Ok(())
}

fn read_expense(elem: &Element) -> Result<ExpenseLine, PadnextError> {
    let not_billed = match elem.attr("berechnung").map(str::trim) {
        None => false,
        Some("K") => true,
        Some(other) => {
            return Err(PadnextError::Xml(format!(
                "auslagen berechnung must be K, found '{other}'"
            )));
        }
    };
    Ok(ExpenseLine {
        position: read_position_core(elem)?,
        vat_rate: dec_child(elem, "mwstsatz")?,
        unit_price: parse_decimal(elem.req_text("einzelbetrag")?, "einzelbetrag")?,
        total: dec_child(elem, "gesamtbetrag")?,
        kind: opt(elem.attr("kennzeichen"), |v| {
            ExpenseKind::from_code(v.trim())
                .ok_or_else(|| PadnextError::Xml(format!("unknown auslagen kennzeichen '{v}'")))
        })?,
        not_billed,
    })
}

fn write_travel(w: &mut XmlWriter, line: &TravelLine) -> Result<(), PadnextError> {
    let p = &line.position;
    let number = p.position_number.map(|n| n.to_string());
    let mut attrs = position_attrs(&number, &p.id, &p.idref);
    if let Some(schedule) = line.schedule {
        attrs.push(("go", schedule.code()));
    }
    w.start_element_with_attrs("entschaedigung", &attrs)?;

    write_position_core(w, p)?;
    match &line.compensation {
        TravelCompensation::Mileage(m) => {
            let time_of_day = if m.at_night { "N" } else { "T" };
            w.start_element_with_attrs("wegegeld", &[("tageszeit", time_of_day)])?;
            w.text_element("radius", &m.radius_km.to_string())?;
            w.end_element("wegegeld")?;
        }
        TravelCompensation::Costs(c) => {
            let absence = if c.long_absence { "1" } else { "0" };
            w.start_element_with_attrs("reisekosten", &[("abwesenheit", absence)])?;
            w.text_element("wegstrecke", &c.distance_km.to_string())?;
            w.opt_decimal_element("uebernachtungskosten", c.overnight_costs)?;
            w.end_element("reisekosten")?;
        }
    }
    if let Some(divisor) = line.share_divisor {
        w.empty_element_with_attrs("anteil", &[("teiler", &divisor.to_string())])?;
    }
    w.opt_decimal_element("einzelbetrag", line.unit_price)?;
    w.decimal_element("gesamtbetrag", line.total)?;

    w.end_element("entschaedigung")?;
    Ok(())
}

fn read_travel(elem: &Element) -> Result<TravelLine, PadnextError> {
    let compensation = if let Some(m) = elem.child("wegegeld") {
        let at_night = match m.attr("tageszeit").map(str::trim) {
            Some("N") => true,
            Some("T") | None => false,
            Some(other) => {
                return Err(PadnextError::Xml(format!("unknown tageszeit '{other}'")));
            }
        };
        TravelCompensation::Mileage(MileageAllowance {
            radius_km: parse_num(m.req_text("radius")?, "radius")?,
            at_night,
        })
    } else if let Some(r) = elem.child("reisekosten") {
        TravelCompensation::Costs(TravelCosts {
            distance_km: parse_num(r.req_text("wegstrecke")?, "wegstrecke")?,
            overnight_costs: dec_child(r, "uebernachtungskosten")?,
            long_absence: opt(r.attr("abwesenheit"), |v| parse_bool(v, "abwesenheit"))?
                .unwrap_or(false),
        })
    } else {
        return Err(PadnextError::Xml(
            "entschaedigung must contain wegegeld or reisekosten".into(),
        ));
    };

    Ok(TravelLine {
        position: read_position_core(elem)?,
        compensation,
        share_divisor: opt(elem.child("anteil").map(|a| a.req_attr("teiler")).transpose()?, |v| {
            parse_num(v, "anteil/@teiler")
        })?,
        unit_price: dec_child(elem, "einzelbetrag")?,
        total: parse_decimal(elem.req_text("gesamtbetrag")?, "gesamtbetrag")?,
        schedule: opt(elem.attr("go"), |v| {
            FeeSchedule::from_code(v.trim())
                .ok_or_else(|| PadnextError::Xml(format!("unknown fee schedule '{v}'")))
        })?,
    })
}

fn text(elem: &Element, name: &str) -> Option<String> {
    elem.child_text(name).map(str::to_string)
}

fn dec_child(elem: &Element, name: &str) -> Result<Option<Decimal>, PadnextError> {
    opt(elem.child_text(name), |v| parse_decimal(v, name))
}
