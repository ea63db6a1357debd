use chrono::{Local, NaiveDate};
use padnext::config::PadnextConfig;
use padnext::core::*;
use padnext::envelope::generate_key_pair;
use padnext::packager::{PackRequest, Packager};
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn batch() -> Result<InvoiceBatch, PadnextError> {
    let day = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
    let address = AddressBuilder::new("10115", "Berlin")
        .street("Hauptstr.")
        .house_number("1")
        .build();
    let patient = PersonBuilder::new("Schulz")
        .birth_date(NaiveDate::from_ymd_opt(1980, 5, 17).unwrap())
        .sex(Sex::Male)
        .build();
    let case = CaseBuilder::human_medicine(patient, 1)
        .provider_id("LE1")
        .add_item(
            FeeLineBuilder::new(1, day, FeeCode::new(FeeSchedule::Goae, "1"), "Beratung", 3)
                .unit_price(dec!(23.00))
                .build(),
        )
        .build()?;
    let invoice = InvoiceBuilder::new(
        "R-2026-0001",
        Recipient::Person {
            person: PersonBuilder::new("Schulz").salutation("Herr").build(),
            address: address.clone(),
        },
    )
    .add_case(case)
    .build()?;
    InvoiceBatchBuilder::new(IssuerBuilder::new("Praxis Meyer", 4711, address).build())
        .add_provider(ProviderBuilder::new("LE1", PersonBuilder::new("Meyer").build()).build())
        .add_invoice(invoice)
        .build()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let work = tempfile::tempdir()?;
    let keys_dir = work.path().join("keys");
    let outbox = work.path().join("outbox");
    generate_key_pair(&keys_dir, 2048)?;

    let config = PadnextConfig::from_toml_str(&format!(
        r#"
[keys]
dir = {:?}
certificate_id = "AZH-2026-01"

[packaging]
encrypt = true
request_receipt = true
"#,
        keys_dir.display().to_string()
    ))?;
    let packager = Packager::from_config(config)?;

    // ── Sender side ───────────────────────────────────────────────────
    let request = PackRequest::new(
        batch()?,
        Participant::same(ParticipantId::new("Praxis Meyer").customer_number(4711)),
        Participant::same(ParticipantId::new("Abrechnungszentrum").rz_id(42)),
        &outbox,
    )
    .transfer_number(1);
    let packed = packager.pack(request)?;
    println!("Packed {}", packed.archive.display());
    for file in &packed.manifest.files {
        println!("  {} ({} bytes, sha1 {})", file.name, file.length, file.checksum);
    }

    // ── Receiver side ─────────────────────────────────────────────────
    let delivery = packager.receive(&packed.archive, Local::now().naive_local())?;
    println!(
        "\nReceipt for transfer {}: {}",
        delivery.receipt.transfer_number,
        if delivery.receipt.is_accepted() { "accepted" } else { "rejected" }
    );
    if let Some(unpacked) = &delivery.batch {
        let sums = unpacked.batch.invoices[0].cases[0].sums();
        println!("  Batch {}: case total {}", unpacked.stem, sums.total);
    }

    let receipt_xml = padnext::xml::serialize(&delivery.receipt)?;
    println!("\n{}", padnext::xml::charset::decode(&receipt_xml)?);
    Ok(())
}
