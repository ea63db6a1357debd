use std::collections::HashSet;

use rust_decimal::Decimal;

use super::error::ValidationError;
use super::manifest::*;
use super::money::{self, AmountOverflow, fraction_digits, total_digits, within_tolerance};
use super::types::*;

const MAX_LINE_ITEMS: usize = 9999;
const MAX_FILES: usize = 9999;
const MAX_TRANSFER_NUMBER: u32 = 999_999;

/// Validate an invoice batch: field facets, provider references, line totals and sums.
/// Returns all validation errors found (not just the first).
pub fn validate_batch(batch: &InvoiceBatch) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(notice) = &batch.notice {
        check_len(notice, "notice", 1, 4000, &mut errors);
    }

    validate_issuer(&batch.issuer, &mut errors);

    if batch.providers.is_empty() {
        errors.push(ValidationError::with_rule(
            "providers",
            "at least one provider (leistungserbringer) is required",
            "min-occurs",
        ));
    }
    let mut provider_ids = HashSet::new();
    for (i, provider) in batch.providers.iter().enumerate() {
        let path = format!("providers[{i}]");
        validate_provider(provider, &path, &mut errors);
        if !provider_ids.insert(provider.id.as_str()) {
            errors.push(ValidationError::with_rule(
                format!("{path}.id"),
                format!("provider id '{}' is declared twice", provider.id),
                "unique-id",
            ));
        }
    }

    if batch.invoices.is_empty() {
        errors.push(ValidationError::with_rule(
            "invoices",
            "at least one invoice is required",
            "min-occurs",
        ));
    }
    for (i, invoice) in batch.invoices.iter().enumerate() {
        validate_invoice(invoice, &format!("invoices[{i}]"), &provider_ids, &mut errors);
    }

    errors
}

fn validate_issuer(issuer: &Issuer, errors: &mut Vec<ValidationError>) {
    check_len(&issuer.name, "issuer.name", 1, 40, errors);
    for (i, suffix) in issuer.name_suffixes.iter().enumerate() {
        check_len(suffix, &format!("issuer.name_suffixes[{i}]"), 1, 40, errors);
    }
    check_digits_u64(issuer.customer_number, "issuer.customer_number", 20, errors);
    validate_address(&issuer.address, "issuer.address", errors);
    if let Some(ik) = issuer.ik_number {
        check_digits_u64(ik.into(), "issuer.ik_number", 9, errors);
    }
    for (i, contact) in issuer.contacts.iter().enumerate() {
        check_len(&contact.value, &format!("issuer.contacts[{i}].value"), 1, 100, errors);
    }
    if let Some(vat_id) = &issuer.vat_id {
        check_len(vat_id, "issuer.vat_id", 1, 15, errors);
    }
    if let Some(creditor_id) = &issuer.creditor_id {
        check_len(creditor_id, "issuer.creditor_id", 1, 40, errors);
    }
}

fn validate_provider(provider: &Provider, path: &str, errors: &mut Vec<ValidationError>) {
    check_len(&provider.id, &format!("{path}.id"), 1, 40, errors);
    validate_person(&provider.person, &format!("{path}.person"), errors);
    if let Some(address) = &provider.address {
        validate_address(address, &format!("{path}.address"), errors);
    }
    if let Some(number) = provider.customer_number {
        check_digits_u64(number, &format!("{path}.customer_number"), 20, errors);
    }
    for (i, lanr) in provider.lanr.iter().enumerate() {
        check_digits_u64((*lanr).into(), &format!("{path}.lanr[{i}]"), 9, errors);
    }
    if let Some(vat_id) = &provider.vat_id {
        check_len(vat_id, &format!("{path}.vat_id"), 1, 15, errors);
    }
    if let Some(ik) = provider.ik_number {
        check_digits_u64(ik.into(), &format!("{path}.ik_number"), 9, errors);
    }
    if let Some(ais_id) = &provider.ais_id {
        check_len(ais_id, &format!("{path}.ais_id"), 1, 40, errors);
    }
}

fn validate_address(address: &Address, path: &str, errors: &mut Vec<ValidationError>) {
    check_len(&address.postal_code, &format!("{path}.postal_code"), 1, 10, errors);
    check_len(&address.city, &format!("{path}.city"), 1, 40, errors);
    if let Some(street) = &address.street {
        check_len(street, &format!("{path}.street"), 1, 46, errors);
    }
    if let Some(number) = &address.house_number {
        check_len(number, &format!("{path}.house_number"), 1, 9, errors);
    }
    if let Some(extra) = &address.extra {
        check_len(extra, &format!("{path}.extra"), 1, 40, errors);
    }
    if let Some(country) = &address.country {
        check_len(country, &format!("{path}.country"), 1, 3, errors);
    }
}

fn validate_person(person: &Person, path: &str, errors: &mut Vec<ValidationError>) {
    check_len(&person.last_name, &format!("{path}.last_name"), 1, 40, errors);
    if let Some(first) = &person.first_name {
        check_len(first, &format!("{path}.first_name"), 1, 40, errors);
    }
    if let Some(title) = &person.title {
        check_len(title, &format!("{path}.title"), 1, 20, errors);
    }
    if let Some(suffix) = &person.name_suffix {
        check_len(suffix, &format!("{path}.name_suffix"), 1, 20, errors);
    }
    if let Some(salutation) = &person.salutation {
        check_len(salutation, &format!("{path}.salutation"), 1, 40, errors);
    }
}

fn validate_recipient(recipient: &Recipient, path: &str, errors: &mut Vec<ValidationError>) {
    match recipient {
        Recipient::Person { person, address } => {
            let person_path = format!("{path}.person");
            validate_person(person, &person_path, errors);
            match &person.salutation {
                None => errors.push(ValidationError::with_rule(
                    format!("{person_path}.salutation"),
                    "salutation is required for a person recipient",
                    "required",
                )),
                Some(s) if !RECIPIENT_SALUTATIONS.contains(&s.as_str()) => {
                    errors.push(ValidationError::with_rule(
                        format!("{person_path}.salutation"),
                        format!("'{s}' is not an accepted salutation"),
                        "enumeration",
                    ))
                }
                Some(_) => {}
            }
            validate_address(address, &format!("{path}.address"), errors);
        }
        Recipient::Organisation(org) => {
            check_len(&org.name, &format!("{path}.organisation.name"), 1, 120, errors);
            if org.name.trim().is_empty() {
                errors.push(ValidationError::with_rule(
                    format!("{path}.organisation.name"),
                    "organisation name must contain a non-blank character",
                    "pattern",
                ));
            }
            validate_address(&org.address, &format!("{path}.organisation.address"), errors);
        }
    }
}

fn validate_invoice(
    invoice: &Invoice,
    path: &str,
    provider_ids: &HashSet<&str>,
    errors: &mut Vec<ValidationError>,
) {
    check_len(&invoice.id, &format!("{path}.id"), 1, 40, errors);
    validate_recipient(&invoice.recipient, &format!("{path}.recipient"), errors);

    if let Some(account) = invoice.payment.as_ref().and_then(|p| p.account.as_ref()) {
        check_len(&account.iban, &format!("{path}.payment.account.iban"), 15, 34, errors);
        if let Some(bic) = &account.bic {
            check_len(bic, &format!("{path}.payment.account.bic"), 8, 11, errors);
        }
    }

    if let Some(adj) = &invoice.adjustments {
        let adj_path = format!("{path}.adjustments");
        if let Some(prepaid) = adj.prepaid {
            check_amount(prepaid, &format!("{adj_path}.prepaid"), errors);
        }
        if let Some(discount) = &adj.discount {
            if discount.amount.is_none() && discount.percent.is_none() {
                errors.push(ValidationError::with_rule(
                    format!("{adj_path}.discount"),
                    "discount needs an amount or a percentage",
                    "required",
                ));
            }
            if let Some(amount) = discount.amount {
                check_amount(amount, &format!("{adj_path}.discount.amount"), errors);
            }
            if let Some(percent) = discount.percent {
                check_decimal(percent, &format!("{adj_path}.discount.percent"), 5, 2, errors);
                if percent > Decimal::ONE_HUNDRED {
                    errors.push(ValidationError::with_rule(
                        format!("{adj_path}.discount.percent"),
                        "percentage must not exceed 100",
                        "max-inclusive",
                    ));
                }
            }
        }
        if let Some(copay) = &adj.copayment {
            check_amount(copay.amount, &format!("{adj_path}.copayment.amount"), errors);
            if copay.code.chars().count() != 1 {
                errors.push(ValidationError::with_rule(
                    format!("{adj_path}.copayment.code"),
                    "copayment code must be exactly one character",
                    "length",
                ));
            }
        }
    }

    for (field, text) in [
        ("intro_text", &invoice.intro_text),
        ("closing_text", &invoice.closing_text),
    ] {
        if let Some(text) = text {
            check_len(text, &format!("{path}.{field}"), 1, 4000, errors);
        }
    }
    if let Some(number) = &invoice.ais_invoice_number {
        check_len(number, &format!("{path}.ais_invoice_number"), 1, 14, errors);
    }
    if let Some(reference) = &invoice.ais_file_reference {
        check_len(reference, &format!("{path}.ais_file_reference"), 1, 40, errors);
    }
    if let Some(total) = invoice.ais_total {
        check_decimal(total, &format!("{path}.ais_total"), 9, 2, errors);
    }

    if invoice.cases.is_empty() {
        errors.push(ValidationError::with_rule(
            format!("{path}.cases"),
            "invoice must have at least one billing case",
            "min-occurs",
        ));
    }
    for (i, case) in invoice.cases.iter().enumerate() {
        validate_case(case, &format!("{path}.cases[{i}]"), provider_ids, errors);
    }
}

/// Validate a single billing case: patient data, items, references and sums.
pub fn validate_case(
    case: &BillingCase,
    path: &str,
    provider_ids: &HashSet<&str>,
    errors: &mut Vec<ValidationError>,
) {
    let core = case.core();

    if let Some(id) = &core.provider_id {
        check_provider_ref(id, &format!("{path}.provider_id"), provider_ids, errors);
    }

    let patient_path = format!("{path}.patient");
    validate_person(&core.patient, &patient_path, errors);
    if core.patient.birth_date.is_none() {
        errors.push(ValidationError::with_rule(
            format!("{patient_path}.birth_date"),
            "patient birth date is required",
            "required",
        ));
    }
    if core.patient.sex.is_none() {
        errors.push(ValidationError::with_rule(
            format!("{patient_path}.sex"),
            "patient sex is required",
            "required",
        ));
    }
    if let Some(insured) = &core.insured {
        validate_person(&insured.person, &format!("{path}.insured.person"), errors);
        if let Some(address) = &insured.address {
            validate_address(address, &format!("{path}.insured.address"), errors);
        }
    }
    if let Some(period) = &core.period {
        if period.end < period.start {
            errors.push(ValidationError::with_rule(
                format!("{path}.period"),
                "period ends before it starts",
                "date-order",
            ));
        }
    }
    for (i, diagnosis) in core.diagnoses.iter().enumerate() {
        check_len(&diagnosis.text, &format!("{path}.diagnoses[{i}].text"), 1, 4000, errors);
        if let Some(code) = &diagnosis.code {
            check_len(code, &format!("{path}.diagnoses[{i}].code"), 1, 12, errors);
        }
    }

    match case {
        BillingCase::HumanMedicine {
            vat_rate,
            contract_type,
            description,
            file_reference,
            ..
        } => {
            if *contract_type > 999 {
                errors.push(ValidationError::with_rule(
                    format!("{path}.contract_type"),
                    format!("contract type {contract_type} exceeds 3 digits"),
                    "total-digits",
                ));
            }
            if let Some(rate) = vat_rate {
                check_decimal(*rate, &format!("{path}.vat_rate"), 4, 2, errors);
            }
            if let Some(description) = description {
                check_len(description, &format!("{path}.description"), 1, 60, errors);
            }
            if let Some(reference) = file_reference {
                check_len(reference, &format!("{path}.file_reference"), 1, 40, errors);
            }
        }
        BillingCase::Statutory {
            health_card: Some(card),
            ..
        } => {
            check_len(&card.insurer_name, &format!("{path}.health_card.insurer_name"), 1, 28, errors);
            if let Some(number) = card.insurer_number {
                check_digits_u64(number.into(), &format!("{path}.health_card.insurer_number"), 9, errors);
            }
            if let Some(insured_number) = &card.insured_number {
                check_len(insured_number, &format!("{path}.health_card.insured_number"), 1, 12, errors);
            }
        }
        _ => {}
    }

    if core.items.len() > MAX_LINE_ITEMS {
        errors.push(ValidationError::with_rule(
            format!("{path}.items"),
            format!("case has {} items, at most {MAX_LINE_ITEMS} allowed", core.items.len()),
            "max-occurs",
        ));
    }
    for (i, item) in core.items.iter().enumerate() {
        validate_item(item, &format!("{path}.items[{i}]"), provider_ids, errors);
    }

    errors.extend(validate_sums(core, path));
}

fn validate_position(
    position: &PositionCore,
    path: &str,
    provider_ids: &HashSet<&str>,
    errors: &mut Vec<ValidationError>,
) {
    if position.quantity == 0 || position.quantity > 9999 {
        errors.push(ValidationError::with_rule(
            format!("{path}.quantity"),
            format!("quantity {} must be between 1 and 9999", position.quantity),
            "range",
        ));
    }
    check_len(&position.text, &format!("{path}.text"), 1, 4000, errors);
    if let Some(extra) = &position.extra_text {
        check_len(extra, &format!("{path}.extra_text"), 1, 4000, errors);
    }
    if let Some(id) = &position.provider_id {
        check_provider_ref(id, &format!("{path}.provider_id"), provider_ids, errors);
    }
    for (field, value) in [("id", &position.id), ("idref", &position.idref)] {
        if let Some(value) = value {
            check_len(value, &format!("{path}.{field}"), 1, 40, errors);
        }
    }
}

fn validate_item(
    item: &LineItem,
    path: &str,
    provider_ids: &HashSet<&str>,
    errors: &mut Vec<ValidationError>,
) {
    match item {
        LineItem::Fee(line) => {
            validate_position(&line.position, path, provider_ids, errors);
            check_len(&line.code.code, &format!("{path}.code.code"), 1, 8, errors);
            if let Some(version) = &line.code.version {
                check_len(version, &format!("{path}.code.version"), 1, 10, errors);
            }
            if let Some(analog) = &line.code.analog {
                check_len(analog, &format!("{path}.code.analog"), 1, 8, errors);
            }
            if let Some(factor) = line.factor {
                check_decimal(factor, &format!("{path}.factor"), 8, 6, errors);
            }
            if let Some(value) = line.point_value {
                check_decimal(value, &format!("{path}.point_value"), 9, 7, errors);
            }
            if let Some(points) = line.points {
                check_digits_u64(points.into(), &format!("{path}.points"), 5, errors);
            }
            if let Some(price) = line.unit_price {
                check_amount(price, &format!("{path}.unit_price"), errors);
            }
            check_amount(line.total, &format!("{path}.total"), errors);
            if let Some(rate) = line.vat_rate {
                check_decimal(rate, &format!("{path}.vat_rate"), 4, 2, errors);
            }
            if let Some(text) = &line.justification {
                check_len(text, &format!("{path}.justification"), 1, 4000, errors);
            }

            if line.billing != Some(BillingMode::NotBilled) {
                match money::expected_fee_totals(line) {
                    Ok(expected) => {
                        if let Some(first) = expected.first() {
                            if !expected.contains(&line.total) {
                                errors.push(ValidationError::with_rule(
                                    format!("{path}.total"),
                                    format!(
                                        "fee total {} does not match unit price x factor x quantity = {first}",
                                        line.total
                                    ),
                                    "line-total",
                                ));
                            }
                        }
                    }
                    Err(e) => errors.push(out_of_range(&format!("{path}.total"), e)),
                }
            }
        }
        LineItem::Expense(line) => {
            validate_position(&line.position, path, provider_ids, errors);
            check_amount(line.unit_price, &format!("{path}.unit_price"), errors);
            if let Some(total) = line.total {
                check_amount(total, &format!("{path}.total"), errors);
                match money::line_amount(line.unit_price, line.position.quantity) {
                    Some(expected) if !line.not_billed && total != expected => {
                        errors.push(ValidationError::with_rule(
                            format!("{path}.total"),
                            format!("expense total {total} does not match unit price x quantity = {expected}"),
                            "line-total",
                        ));
                    }
                    Some(_) => {}
                    None => errors.push(out_of_range(&format!("{path}.total"), AmountOverflow)),
                }
            }
            if let Some(rate) = line.vat_rate {
                check_decimal(rate, &format!("{path}.vat_rate"), 4, 2, errors);
            }
        }
        LineItem::Travel(line) => {
            validate_position(&line.position, path, provider_ids, errors);
            match &line.compensation {
                TravelCompensation::Mileage(m) => {
                    if ![2, 5, 10, 25].contains(&m.radius_km) {
                        errors.push(ValidationError::with_rule(
                            format!("{path}.compensation.radius_km"),
                            format!("radius {} km is not one of 2, 5, 10, 25", m.radius_km),
                            "enumeration",
                        ));
                    }
                }
                TravelCompensation::Costs(c) => {
                    check_digits_u64(c.distance_km.into(), &format!("{path}.compensation.distance_km"), 4, errors);
                    if let Some(costs) = c.overnight_costs {
                        check_amount(costs, &format!("{path}.compensation.overnight_costs"), errors);
                    }
                }
            }
            if let Some(divisor) = line.share_divisor {
                if divisor == 0 || divisor > 99 {
                    errors.push(ValidationError::with_rule(
                        format!("{path}.share_divisor"),
                        "share divisor must be between 1 and 99",
                        "range",
                    ));
                }
            }
            if let Some(schedule) = line.schedule {
                if !matches!(schedule, FeeSchedule::Goae | FeeSchedule::Goz) {
                    errors.push(ValidationError::with_rule(
                        format!("{path}.schedule"),
                        "travel compensation is billed under GOAE or GOZ only",
                        "enumeration",
                    ));
                }
            }
            check_amount(line.total, &format!("{path}.total"), errors);
            match money::expected_travel_total(line) {
                Ok(Some(expected)) if expected != line.total => {
                    errors.push(ValidationError::with_rule(
                        format!("{path}.total"),
                        format!("travel total {} does not match {expected}", line.total),
                        "line-total",
                    ));
                }
                Ok(_) => {}
                Err(e) => errors.push(out_of_range(&format!("{path}.total"), e)),
            }
        }
        LineItem::Text(line) => {
            check_len(&line.text, &format!("{path}.text"), 1, 4000, errors);
        }
    }
}

/// Reconcile a case's sum block with its line items (tolerance 0.01).
pub fn validate_sums(core: &CaseCore, path: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let sums = &core.sums;
    let sums_path = format!("{path}.sums");
    let derived = match money::compute_sums(&core.items, sums.prepayment, sums.reduction) {
        Ok(derived) => derived,
        Err(e) => {
            errors.push(out_of_range(&sums_path, e));
            return errors;
        }
    };

    let components = [
        ("fees", Some(sums.fees), Some(derived.fees)),
        ("expenses", sums.expenses, derived.expenses),
        ("travel", sums.travel, derived.travel),
    ];
    for (field, declared, expected) in components {
        let declared = declared.unwrap_or_default();
        let expected = expected.unwrap_or_default();
        if !within_tolerance(declared, expected) {
            errors.push(ValidationError::with_rule(
                format!("{sums_path}.{field}"),
                format!("declared {declared} but line items sum to {expected}"),
                "sum-reconciliation",
            ));
        }
    }

    if !within_tolerance(sums.total, derived.total) {
        errors.push(ValidationError::with_rule(
            format!("{sums_path}.total"),
            format!(
                "case total {} does not match billable line totals {}",
                sums.total, derived.total
            ),
            "sum-reconciliation",
        ));
    }

    match money::payable_amount(sums.total, sums.prepayment, sums.reduction) {
        Ok(payable) if !within_tolerance(sums.payable, payable) => {
            errors.push(ValidationError::with_rule(
                format!("{sums_path}.payable"),
                format!(
                    "payable {} does not match total - prepayment - reduction = {payable}",
                    sums.payable
                ),
                "sum-reconciliation",
            ));
        }
        Ok(_) => {}
        Err(e) => errors.push(out_of_range(&format!("{sums_path}.payable"), e)),
    }

    for (field, value) in [
        ("fees", Some(sums.fees)),
        ("total", Some(sums.total)),
        ("payable", Some(sums.payable)),
        ("prepayment", sums.prepayment),
        ("reduction", sums.reduction),
    ] {
        if let Some(value) = value {
            check_decimal(value, &format!("{sums_path}.{field}"), 9, 2, &mut errors);
        }
    }

    errors
}

/// Validate an order manifest against its field constraints.
pub fn validate_manifest(manifest: &OrderManifest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_participant(&manifest.receiver, "receiver", &mut errors);
    validate_participant(&manifest.sender, "sender", &mut errors);

    check_len(&manifest.message_type.version, "message_type.version", 1, 5, &mut errors);

    check_len(&manifest.system.product, "system.product", 1, 40, &mut errors);
    check_len(&manifest.system.version, "system.version", 1, 20, &mut errors);
    check_len(&manifest.system.manufacturer, "system.manufacturer", 1, 40, &mut errors);
    if let Some(number) = &manifest.system.certification_number {
        check_len(number, "system.certification_number", 1, 20, &mut errors);
    }

    let cert = manifest.encryption.certificate_id.trim();
    check_len(&manifest.encryption.certificate_id, "encryption.certificate_id", 1, 128, &mut errors);
    if manifest.encryption.procedure == EncryptionProcedure::Pkcs7 && (cert.is_empty() || cert == "0") {
        errors.push(ValidationError::with_rule(
            "encryption.certificate_id",
            "procedure 1 requires a certificate id",
            "required-if",
        ));
    }

    if let Some(email) = &manifest.receipt.email {
        check_len(email, "receipt.email", 1, 100, &mut errors);
    }

    if manifest.files.is_empty() || manifest.files.len() > MAX_FILES {
        errors.push(ValidationError::with_rule(
            "files",
            format!("manifest must list 1..{MAX_FILES} files, has {}", manifest.files.len()),
            "occurs",
        ));
    }
    if manifest.file_count as usize != manifest.files.len() {
        errors.push(ValidationError::with_rule(
            "file_count",
            format!(
                "declared file count {} does not match {} entries",
                manifest.file_count,
                manifest.files.len()
            ),
            "file-count",
        ));
    }
    let mut names = HashSet::new();
    for (i, file) in manifest.files.iter().enumerate() {
        let path = format!("files[{i}]");
        validate_file_entry(file, &path, &mut errors);
        if !names.insert(file.name.as_str()) {
            errors.push(ValidationError::with_rule(
                format!("{path}.name"),
                format!("file '{}' is listed twice", file.name),
                "unique-name",
            ));
        }
    }

    if manifest.transfer_number > MAX_TRANSFER_NUMBER {
        errors.push(ValidationError::with_rule(
            "transfer_number",
            format!("transfer number {} exceeds 6 digits", manifest.transfer_number),
            "total-digits",
        ));
    }

    errors
}

fn validate_participant(participant: &Participant, path: &str, errors: &mut Vec<ValidationError>) {
    for (role, id) in [("logical", &participant.logical), ("physical", &participant.physical)] {
        let id_path = format!("{path}.{role}");
        check_len(&id.name, &format!("{id_path}.name"), 1, 40, errors);
        if let Some(number) = id.customer_number {
            check_digits_u64(number, &format!("{id_path}.customer_number"), 20, errors);
        }
        if let Some(rz) = id.rz_id {
            check_digits_u64(rz.into(), &format!("{id_path}.rz_id"), 4, errors);
        }
        if let Some(ik) = id.ik_number {
            check_digits_u64(ik.into(), &format!("{id_path}.ik_number"), 9, errors);
        }
    }
}

fn validate_file_entry(file: &FileEntry, path: &str, errors: &mut Vec<ValidationError>) {
    check_len(&file.name, &format!("{path}.name"), 1, 40, errors);
    if file.name.contains(['/', '\\']) || file.name == "." || file.name == ".." {
        errors.push(ValidationError::with_rule(
            format!("{path}.name"),
            format!("'{}' must be a bare file name", file.name),
            "pattern",
        ));
    }
    if let Some(description) = &file.description {
        check_len(description, &format!("{path}.description"), 1, 60, errors);
    }
    if !is_sha1_hex(&file.checksum) {
        errors.push(ValidationError::with_rule(
            format!("{path}.checksum"),
            "checksum must be 40 hexadecimal characters",
            "checksum-format",
        ));
    }
    if let Some(id) = &file.id {
        check_len(id, &format!("{path}.id"), 1, 40, errors);
    }
}

/// True for a 40-character hexadecimal SHA-1 digest.
pub fn is_sha1_hex(value: &str) -> bool {
    value.len() == 40 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

fn check_provider_ref(
    id: &str,
    path: &str,
    provider_ids: &HashSet<&str>,
    errors: &mut Vec<ValidationError>,
) {
    if !provider_ids.contains(id) {
        errors.push(ValidationError::with_rule(
            path,
            format!("provider '{id}' is not declared in the batch"),
            "provider-ref",
        ));
    }
}

fn check_len(value: &str, path: &str, min: usize, max: usize, errors: &mut Vec<ValidationError>) {
    let len = value.chars().count();
    if len < min {
        errors.push(ValidationError::with_rule(
            path,
            if min == 1 {
                "must not be empty".to_string()
            } else {
                format!("must have at least {min} characters, has {len}")
            },
            "min-length",
        ));
    } else if len > max {
        errors.push(ValidationError::with_rule(
            path,
            format!("must have at most {max} characters, has {len}"),
            "max-length",
        ));
    }
}

fn check_digits_u64(value: u64, path: &str, max_digits: u32, errors: &mut Vec<ValidationError>) {
    if value.checked_ilog10().unwrap_or(0) + 1 > max_digits {
        errors.push(ValidationError::with_rule(
            path,
            format!("{value} exceeds {max_digits} digits"),
            "total-digits",
        ));
    }
}

fn check_decimal(
    value: Decimal,
    path: &str,
    max_total: u32,
    max_fraction: u32,
    errors: &mut Vec<ValidationError>,
) {
    if fraction_digits(value) > max_fraction {
        errors.push(ValidationError::with_rule(
            path,
            format!("{value} has more than {max_fraction} fraction digits"),
            "fraction-digits",
        ));
    }
    if total_digits(value) > max_total {
        errors.push(ValidationError::with_rule(
            path,
            format!("{value} has more than {max_total} digits"),
            "total-digits",
        ));
    }
}

fn check_amount(value: Decimal, path: &str, errors: &mut Vec<ValidationError>) {
    check_decimal(value, path, 9, 2, errors);
    if value.is_sign_negative() && !value.is_zero() {
        errors.push(ValidationError::with_rule(
            path,
            format!("amount {value} must not be negative"),
            "min-inclusive",
        ));
    }
}

/// Rule id of amounts whose arithmetic leaves the `Decimal` range.
pub const AMOUNT_OVERFLOW_RULE: &str = "amount-overflow";

fn out_of_range(field: &str, err: AmountOverflow) -> ValidationError {
    ValidationError::with_rule(field, format!("amount cannot be computed: {err}"), AMOUNT_OVERFLOW_RULE)
}
