#![cfg(feature = "schema")]

use chrono::{NaiveDate, NaiveDateTime};
use padnext::core::*;
use padnext::schema::{self, SchemaId};
use padnext::xml;
use rust_decimal_macros::dec;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 2)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn address() -> Address {
    AddressBuilder::new("80331", "München")
        .street("Sendlinger Straße")
        .house_number("7a")
        .build()
}

fn patient(last: &str) -> Person {
    PersonBuilder::new(last)
        .first_name("Eva")
        .birth_date(NaiveDate::from_ymd_opt(1975, 11, 3).unwrap())
        .sex(Sex::Female)
        .build()
}

fn fee(pos: u32, schedule: FeeSchedule, code: &str, price: rust_decimal::Decimal) -> LineItem {
    FeeLineBuilder::new(pos, date(), FeeCode::new(schedule, code), "Leistung", 1)
        .unit_price(price)
        .build()
}

fn dental_batch() -> InvoiceBatch {
    let statutory = CaseBuilder::new(CaseKind::Statutory, patient("Kaiser"))
        .health_card(HealthCard {
            insurer_name: "AOK Bayern".into(),
            insurer_number: Some(108310400),
            insured_number: Some("A123456789".into()),
        })
        .add_item(fee(1, FeeSchedule::Bema, "01", dec!(18.50)))
        .build()
        .unwrap();
    let private = CaseBuilder::new(CaseKind::Private, patient("Wolf"))
        .reduction_rate(ReductionRate::Fifteen)
        .add_item(
            FeeLineBuilder::new(1, date(), FeeCode::new(FeeSchedule::Goz, "2197"), "Adhäsive Befestigung", 2)
                .points(130, dec!(0.0562421))
                .factor(dec!(2.3))
                .build(),
        )
        .build()
        .unwrap();
    let orthodontic = CaseBuilder::new(CaseKind::OrthodonticPrivate, patient("Berg"))
        .add_item(fee(1, FeeSchedule::Goz, "6030", dec!(120.00)))
        .build()
        .unwrap();
    let copay = CaseBuilder::new(CaseKind::PatientCopay, patient("Lang"))
        .add_item(fee(1, FeeSchedule::Bel, "0010", dec!(9.90)))
        .prepayment(dec!(5.00))
        .build()
        .unwrap();

    let person_invoice = InvoiceBuilder::new(
        "Z-2026-17",
        Recipient::Person {
            person: PersonBuilder::new("Kaiser").salutation("Frau").build(),
            address: address(),
        },
    )
    .add_case(statutory)
    .add_case(private)
    .build()
    .unwrap();
    let org_invoice = InvoiceBuilder::new(
        "Z-2026-18",
        Recipient::Organisation(Organisation {
            name: "Beihilfestelle Oberbayern".into(),
            address: address(),
        }),
    )
    .add_case(orthodontic)
    .add_case(copay)
    .build()
    .unwrap();

    InvoiceBatchBuilder::new(IssuerBuilder::new("Zahnarztpraxis Hofer", 998877, address()).build())
        .add_provider(ProviderBuilder::new("Z1", PersonBuilder::new("Hofer").build()).build())
        .add_invoice(person_invoice)
        .add_invoice(org_invoice)
        .build()
        .unwrap()
}

// --- Payload ---

#[test]
fn every_case_kind_roundtrips() {
    let batch = dental_batch();
    let bytes = xml::serialize(&batch).unwrap();
    let back: InvoiceBatch = xml::deserialize(&bytes).unwrap();
    assert_eq!(batch, back);
    assert_eq!(back.case_count(), 4);
}

#[test]
fn serialized_payload_satisfies_schema() {
    let bytes = xml::serialize(&dental_batch()).unwrap();
    schema::check(&bytes, SchemaId::Payload).unwrap();
}

#[test]
fn payload_is_latin9_on_the_wire() {
    let bytes = xml::serialize(&dental_batch()).unwrap();
    // "München" as ISO-8859-15, not UTF-8
    assert!(bytes.windows(7).any(|w| w == b"M\xFCnchen"));
    assert!(!bytes.windows(2).any(|w| w == b"\xC3\xBC"));
}

#[test]
fn typographic_text_is_substituted() {
    let mut batch = dental_batch();
    if let LineItem::Fee(line) = &mut batch.invoices[0].cases[0].core_mut().items[0] {
        line.position.text = "Füllung – „zweiflächig“ …".into();
    }
    let bytes = xml::serialize(&batch).unwrap();
    let back: InvoiceBatch = xml::deserialize(&bytes).unwrap();
    let text = &back.invoices[0].cases[0].items()[0].position().unwrap().text;
    assert_eq!(text, "Füllung - \"zweiflächig\" ...");
}

#[test]
fn typographic_quotes_in_attributes_stay_well_formed() {
    let mut batch = dental_batch();
    batch.invoices[0].id = "Z-2026-\u{201E}17\u{201C}".into();
    assert!(validate_batch(&batch).is_empty());

    let bytes = xml::serialize(&batch).unwrap();
    schema::check(&bytes, SchemaId::Payload).unwrap();
    let back: InvoiceBatch = xml::deserialize(&bytes).unwrap();
    assert_eq!(back.invoices[0].id, "Z-2026-\"17\"");
}

#[test]
fn edge_whitespace_in_texts_survives_roundtrip() {
    let mut batch = dental_batch();
    if let LineItem::Fee(line) = &mut batch.invoices[0].cases[0].core_mut().items[0] {
        line.position.text = "Beratung ".into();
        line.position.extra_text = Some("  auch telefonisch".into());
    }
    let bytes = xml::serialize(&batch).unwrap();
    schema::check(&bytes, SchemaId::Payload).unwrap();
    let back: InvoiceBatch = xml::deserialize(&bytes).unwrap();
    assert_eq!(back, batch);
}

#[test]
fn wrong_root_is_an_xml_error() {
    let receipt_bytes = xml::serialize(&Receipt {
        received_at: at(8, 0),
        status: ReceiptStatus::Accepted,
        errors: Vec::new(),
        transfer_number: 1,
        file_count: 1,
        invoice_count: 1,
    })
    .unwrap();
    let err = xml::deserialize::<InvoiceBatch>(&receipt_bytes).unwrap_err();
    assert!(matches!(err, PadnextError::Xml(_)));
}

// --- Manifest ---

#[test]
fn manifest_with_attachment_roundtrips_and_validates() {
    let manifest = OrderManifestBuilder::new(
        Participant::same(ParticipantId::new("Zahnarztpraxis Hofer").customer_number(998877)),
        Participant::same(ParticipantId::new("ZA eG").rz_id(7)),
        at(9, 15),
    )
    .add_file(FileEntry {
        document_type: DocumentType::PadNext,
        format: None,
        name: "00998877_20260302_ADL_000002_padx.xml".into(),
        description: None,
        length: 5120,
        checksum: "3ca25ae354e192b26879f651a51d92aa8a34d8d3".into(),
        id: Some("1".into()),
        created_at: Some(at(9, 15)),
    })
    .add_file(FileEntry {
        document_type: DocumentType::Attachment,
        format: Some(AttachmentFormat::Pdf),
        name: "roentgen.pdf".into(),
        description: Some("Röntgenbefund".into()),
        length: 88_000,
        checksum: "A9993E364706816ABA3E25717850C26C9CD0D89D".into(),
        id: Some("2".into()),
        created_at: None,
    })
    .transfer_number(2)
    .real_data(true)
    .build()
    .unwrap();

    let bytes = xml::serialize(&manifest).unwrap();
    schema::check(&bytes, SchemaId::Manifest).unwrap();
    let back: OrderManifest = xml::deserialize(&bytes).unwrap();
    assert_eq!(back, manifest);
    assert_eq!(back.file_count, 2);
    assert!(!back.is_encrypted());
}

// --- Receipt ---

#[test]
fn rejection_receipt_roundtrips_and_validates() {
    let receipt = Receipt {
        received_at: at(10, 5),
        status: ReceiptStatus::Rejected,
        errors: vec![ReceiptError {
            code: codes::FILE_SET,
            text: "checksum mismatch for roentgen.pdf".into(),
            hint: Some("roentgen.pdf".into()),
        }],
        transfer_number: 2,
        file_count: 2,
        invoice_count: 0,
    };
    let bytes = xml::serialize(&receipt).unwrap();
    schema::check(&bytes, SchemaId::Receipt).unwrap();
    let back: Receipt = xml::deserialize(&bytes).unwrap();
    assert_eq!(back, receipt);
}
