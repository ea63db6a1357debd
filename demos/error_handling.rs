use std::fs;

use chrono::NaiveDate;
use padnext::config::PadnextConfig;
use padnext::core::*;
use padnext::envelope::{InMemoryKeys, NoKeys, compress_files, extract_zip};
use padnext::packager::{PackRequest, Packager};
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn report(label: &str, err: &PadnextError) {
    println!("  {label}: {err}");
    println!("    fatal: {}, operator text: {}", err.is_fatal(), err.public_message());
    for issue in err.issues() {
        println!("    - {issue}");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let day = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
    let address = AddressBuilder::new("10115", "Berlin").build();

    // ── 1. Builder error: human medicine case without contract type ───
    println!("=== Builder Error ===");
    let patient = PersonBuilder::new("Schulz").build();
    if let Err(e) = CaseBuilder::new(CaseKind::HumanMedicine, patient.clone()).build() {
        report("case", &e);
    }

    // ── 2. Model errors: all violations at once ───────────────────────
    println!("\n=== Model Errors ===");
    let mut case = CaseBuilder::human_medicine(patient, 1)
        .provider_id("LE7")
        .add_item(
            FeeLineBuilder::new(1, day, FeeCode::new(FeeSchedule::Goae, "1"), "Beratung", 1)
                .unit_price(dec!(10.72))
                .factor(dec!(2.3))
                .total(dec!(25.00))
                .build(),
        )
        .build()
        .unwrap();
    case.core_mut().sums.total = dec!(99.99);
    let invoice = InvoiceBuilder::new(
        "R-1",
        Recipient::Person {
            person: PersonBuilder::new("Schulz").salutation("Hallo").build(),
            address: address.clone(),
        },
    )
    .add_case(case)
    .build()
    .unwrap();
    let result = InvoiceBatchBuilder::new(IssuerBuilder::new("Praxis", 4711, address).build())
        .add_provider(ProviderBuilder::new("LE1", PersonBuilder::new("Meyer").build()).build())
        .add_invoice(invoice)
        .build();
    let batch = match result {
        Ok(_) => unreachable!("batch has known defects"),
        Err(e) => {
            report("batch", &e);
            repaired_batch(day)
        }
    };

    // ── 3. Transfer errors ────────────────────────────────────────────
    println!("\n=== Transfer Errors ===");
    let work = tempfile::tempdir().unwrap();
    let plain = Packager::new(NoKeys, PadnextConfig::default());
    let request = PackRequest::new(
        batch,
        Participant::same(ParticipantId::new("Praxis").customer_number(4711)),
        Participant::same(ParticipantId::new("AZH")),
        work.path(),
    );

    if let Err(e) = plain.pack(request.clone().encrypt(true)) {
        report("encrypt without certificate", &e);
    }
    if let Err(e) = plain.pack(request.clone().transfer_number(0)) {
        report("transfer number 0", &e);
    }

    let packed = plain.pack(request).unwrap();
    tamper(&packed.archive);
    match plain.receive(&packed.archive, day.and_hms_opt(12, 0, 0).unwrap()) {
        Ok(delivery) => {
            for error in &delivery.receipt.errors {
                println!("  receipt error {}: {}", error.code, error.text);
            }
        }
        Err(e) => report("receive", &e),
    }

    let sealed = Packager::new(InMemoryKeys::generate("AZH-1", 2048).unwrap(), PadnextConfig::default());
    let foreign = sealed
        .pack(
            PackRequest::new(
                repaired_batch(day),
                Participant::same(ParticipantId::new("Praxis").customer_number(4711)),
                Participant::same(ParticipantId::new("AZH")),
                work.path().join("foreign"),
            )
            .encrypt(true),
        )
        .unwrap();
    if let Err(e) = plain.unpack(&foreign.archive) {
        report("unpack without private key", &e);
    }
}

fn repaired_batch(day: NaiveDate) -> InvoiceBatch {
    let address = AddressBuilder::new("10115", "Berlin").build();
    let patient = PersonBuilder::new("Schulz")
        .birth_date(NaiveDate::from_ymd_opt(1980, 5, 17).unwrap())
        .sex(Sex::Male)
        .build();
    let case = CaseBuilder::human_medicine(patient, 1)
        .provider_id("LE1")
        .add_item(
            FeeLineBuilder::new(1, day, FeeCode::new(FeeSchedule::Goae, "1"), "Beratung", 1)
                .unit_price(dec!(10.72))
                .factor(dec!(2.3))
                .build(),
        )
        .build()
        .unwrap();
    let invoice = InvoiceBuilder::new(
        "R-1",
        Recipient::Person {
            person: PersonBuilder::new("Schulz").salutation("Herr").build(),
            address: address.clone(),
        },
    )
    .add_case(case)
    .build()
    .unwrap();
    InvoiceBatchBuilder::new(IssuerBuilder::new("Praxis", 4711, address).build())
        .add_provider(ProviderBuilder::new("LE1", PersonBuilder::new("Meyer").build()).build())
        .add_invoice(invoice)
        .build()
        .unwrap()
}

/// Change one character of the payload inside a plain transfer archive.
fn tamper(archive: &std::path::Path) {
    let work = tempfile::tempdir().unwrap();
    let outer = work.path().join("outer");
    let inner = work.path().join("inner");
    let names = extract_zip(archive, &outer).unwrap();
    let inner_name = names.iter().find(|n| n.ends_with(INNER_ARCHIVE_SUFFIX)).unwrap();
    let payload_names = extract_zip(&outer.join(inner_name), &inner).unwrap();

    let payload = inner.join(&payload_names[0]);
    let text = String::from_utf8_lossy(&fs::read(&payload).unwrap()).replace("Beratung", "Beratunq");
    fs::write(&payload, text).unwrap();

    compress_files(&[payload], &outer.join(inner_name)).unwrap();
    let outer_files: Vec<_> = names.iter().map(|n| outer.join(n)).collect();
    compress_files(&outer_files, archive).unwrap();
}
