use chrono::NaiveDate;
use padnext::core::*;
use padnext::xml;
use rust_decimal_macros::dec;

fn main() -> Result<(), PadnextError> {
    let day = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
    let address = AddressBuilder::new("80331", "München")
        .street("Sendlinger Straße")
        .house_number("7")
        .build();

    let patient = PersonBuilder::new("Kaiser")
        .first_name("Eva")
        .birth_date(NaiveDate::from_ymd_opt(1975, 11, 3).unwrap())
        .sex(Sex::Female)
        .build();
    let case = CaseBuilder::new(CaseKind::Private, patient)
        .add_item(
            FeeLineBuilder::new(1, day, FeeCode::new(FeeSchedule::Goz, "0010"), "Eingehende Untersuchung – Befund", 1)
                .points(100, dec!(0.0562421))
                .factor(dec!(2.3))
                .build(),
        )
        .build()?;
    let invoice = InvoiceBuilder::new(
        "Z-2026-0003",
        Recipient::Person {
            person: PersonBuilder::new("Kaiser").salutation("Frau").build(),
            address: address.clone(),
        },
    )
    .add_case(case)
    .build()?;
    let batch = InvoiceBatchBuilder::new(IssuerBuilder::new("Zahnarztpraxis Hofer", 998877, address).build())
        .add_provider(ProviderBuilder::new("Z1", PersonBuilder::new("Hofer").build()).build())
        .add_invoice(invoice)
        .build()?;

    // The en dash is not in Latin-9 and is written as '-'
    let bytes = xml::serialize(&batch)?;
    println!("=== Payload ({} bytes, ISO-8859-15) ===", bytes.len());
    println!("{}", xml::charset::decode(&bytes)?);

    let back: InvoiceBatch = xml::deserialize(&bytes)?;
    let text = &back.invoices[0].cases[0].items()[0].position().map(|p| p.text.as_str()).unwrap_or("");
    println!("\nItem text after roundtrip: {text}");
    println!("Case total after roundtrip: {}", back.invoices[0].cases[0].sums().total);
    Ok(())
}
