use chrono::NaiveDate;
use padnext::core::*;
use rust_decimal_macros::dec;

fn main() {
    let day = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
    let address = AddressBuilder::new("10115", "Berlin")
        .street("Hauptstr.")
        .house_number("1")
        .build();

    // ── 1. Line items ─────────────────────────────────────────────────
    let consultation = FeeLineBuilder::new(1, day, FeeCode::new(FeeSchedule::Goae, "1"), "Beratung", 1)
        .unit_price(dec!(4.66))
        .factor(dec!(2.3))
        .build();
    let examination =
        FeeLineBuilder::new(2, day, FeeCode::new(FeeSchedule::Goae, "5"), "Symptombezogene Untersuchung", 1)
            .unit_price(dec!(4.66))
            .factor(dec!(2.3))
            .build();
    let postage = ExpenseLineBuilder::new(3, day, "Porto", 1, dec!(0.95))
        .kind(ExpenseKind::Postage)
        .build();
    let house_call = TravelLineBuilder::new(
        4,
        day,
        "Wegegeld bis 5 km",
        TravelCompensation::Mileage(MileageAllowance {
            radius_km: 5,
            at_night: false,
        }),
    )
    .total(dec!(8.00))
    .build();

    // ── 2. Case, invoice, batch ───────────────────────────────────────
    let patient = PersonBuilder::new("Schulz")
        .first_name("Jonas")
        .birth_date(NaiveDate::from_ymd_opt(1980, 5, 17).unwrap())
        .sex(Sex::Male)
        .build();
    let case = CaseBuilder::human_medicine(patient, 1)
        .provider_id("LE1")
        .diagnosis("Akute Bronchitis", Some("J20.9"))
        .add_item(consultation)
        .add_item(examination)
        .add_item(postage)
        .add_item(house_call)
        .build()
        .unwrap();

    let sums = case.sums();
    println!("=== Case Sums ===");
    println!("  Fees:     {}", sums.fees);
    println!("  Expenses: {}", sums.expenses.unwrap_or_default());
    println!("  Travel:   {}", sums.travel.unwrap_or_default());
    println!("  Total:    {}", sums.total);

    let invoice = InvoiceBuilder::new(
        "R-2026-0042",
        Recipient::Person {
            person: PersonBuilder::new("Schulz").salutation("Herr").first_name("Jonas").build(),
            address: address.clone(),
        },
    )
    .add_case(case)
    .build()
    .unwrap();

    let doctor = PersonBuilder::new("Meyer").title("Dr. med.").first_name("Anna").build();
    let batch = InvoiceBatchBuilder::new(IssuerBuilder::new("Praxis Dr. Meyer", 4711, address).build())
        .add_provider(ProviderBuilder::new("LE1", doctor).lanr(123456701).build())
        .add_invoice(invoice)
        .build();

    match batch {
        Ok(batch) => println!("\nBatch with {} invoice(s) and {} case(s) is valid", batch.invoices.len(), batch.case_count()),
        Err(e) => {
            println!("\nBatch rejected: {e}");
            for issue in e.issues() {
                println!("  {issue}");
            }
        }
    }

    // ── 3. File names ─────────────────────────────────────────────────
    let mut numbers = TransferNumberSequence::new().starting_at("Abrechnungszentrum", 17);
    let name = BatchName::new(
        4711,
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        MessageKind::Delivery,
        numbers.next_number("Abrechnungszentrum").unwrap(),
    );
    println!("\n=== Transfer Files ===");
    println!("  {}", name.manifest_file());
    println!("  {}", name.payload_file());
    println!("  {}", name.transfer_archive());
}
