use std::sync::LazyLock;

use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use padnext::checksum::checksum_bytes;
use padnext::config::PadnextConfig;
use padnext::core::*;
use padnext::envelope::{InMemoryKeys, KeyProvider, RsaPublicKey, decrypt, encrypt};
use padnext::packager::{PackRequest, Packager};
use padnext::schema::{self, SchemaId};
use padnext::xml;

static KEYS: LazyLock<InMemoryKeys> =
    LazyLock::new(|| InMemoryKeys::generate("BENCH-1", 2048).unwrap());

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()
}

fn build_batch(cases: usize, items_per_case: u32) -> InvoiceBatch {
    let address = AddressBuilder::new("10115", "Berlin")
        .street("Hauptstr.")
        .house_number("1")
        .build();

    let mut invoice = InvoiceBuilder::new(
        "BENCH-001",
        Recipient::Person {
            person: PersonBuilder::new("Schulz").salutation("Herr").build(),
            address: address.clone(),
        },
    );
    for case_no in 0..cases {
        let patient = PersonBuilder::new(format!("Patient {case_no}"))
            .birth_date(NaiveDate::from_ymd_opt(1980, 5, 17).unwrap())
            .sex(Sex::Female)
            .build();
        let mut case = CaseBuilder::human_medicine(patient, 1).provider_id("LE1");
        for pos in 1..=items_per_case {
            case = case.add_item(
                FeeLineBuilder::new(pos, test_date(), FeeCode::new(FeeSchedule::Goae, "1"), "Beratung", 1)
                    .unit_price(dec!(4.66))
                    .factor(dec!(2.3))
                    .build(),
            );
        }
        invoice = invoice.add_case(case.build().unwrap());
    }

    InvoiceBatchBuilder::new(IssuerBuilder::new("Benchmark Praxis", 4711, address).build())
        .add_provider(ProviderBuilder::new("LE1", PersonBuilder::new("Meyer").build()).build())
        .add_invoice(invoice.build().unwrap())
        .build()
        .unwrap()
}

fn bench_build_batch(c: &mut Criterion) {
    c.bench_function("build_batch_10_items", |b| {
        b.iter(|| black_box(build_batch(1, 10)));
    });
}

fn bench_payload_serialize(c: &mut Criterion) {
    let batch = build_batch(1, 10);
    c.bench_function("payload_serialize", |b| {
        b.iter(|| black_box(xml::serialize(black_box(&batch))));
    });
}

fn bench_payload_parse(c: &mut Criterion) {
    let bytes = xml::serialize(&build_batch(1, 10)).unwrap();
    c.bench_function("payload_parse", |b| {
        b.iter(|| black_box(xml::deserialize::<InvoiceBatch>(black_box(&bytes))));
    });
}

fn bench_payload_schema(c: &mut Criterion) {
    let bytes = xml::serialize(&build_batch(1, 10)).unwrap();
    c.bench_function("payload_schema_validate", |b| {
        b.iter(|| black_box(schema::validate(black_box(&bytes), SchemaId::Payload)));
    });
}

fn bench_large_payload(c: &mut Criterion) {
    let batch = build_batch(100, 10);
    c.bench_function("payload_serialize_1000_items", |b| {
        b.iter(|| black_box(xml::serialize(black_box(&batch))));
    });

    let bytes = xml::serialize(&batch).unwrap();
    c.bench_function("payload_parse_1000_items", |b| {
        b.iter(|| black_box(xml::deserialize::<InvoiceBatch>(black_box(&bytes))));
    });
}

fn bench_checksum(c: &mut Criterion) {
    let data = vec![0x5au8; 1 << 20];
    c.bench_function("sha1_1mib", |b| {
        b.iter(|| black_box(checksum_bytes(black_box(&data))));
    });
}

fn bench_crypto(c: &mut Criterion) {
    let data = xml::serialize(&build_batch(10, 10)).unwrap();
    let private = KEYS.private_key("BENCH-1").unwrap();
    let public = RsaPublicKey::from(private);

    c.bench_function("encrypt_payload", |b| {
        b.iter(|| black_box(encrypt(black_box(&data), &public)));
    });

    let sealed = encrypt(&data, &public).unwrap();
    c.bench_function("decrypt_payload", |b| {
        b.iter(|| black_box(decrypt(black_box(&sealed), private)));
    });
}

fn bench_pack_unpack(c: &mut Criterion) {
    let packager = Packager::new(&*KEYS, PadnextConfig::default());
    let batch = build_batch(10, 10);
    let work = tempfile::tempdir().unwrap();
    let request = |out: &str| {
        PackRequest::new(
            batch.clone(),
            Participant::same(ParticipantId::new("Benchmark Praxis").customer_number(4711)),
            Participant::same(ParticipantId::new("AZH")),
            work.path().join(out),
        )
        .encrypt(true)
    };

    c.bench_function("pack_encrypted", |b| {
        b.iter(|| black_box(packager.pack(request("pack")).unwrap()));
    });

    let packed = packager.pack(request("unpack")).unwrap();
    c.bench_function("unpack_encrypted", |b| {
        b.iter(|| black_box(packager.unpack(black_box(&packed.archive)).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_build_batch,
    bench_payload_serialize,
    bench_payload_parse,
    bench_payload_schema,
    bench_large_payload,
    bench_checksum,
    bench_crypto,
    bench_pack_unpack,
);
criterion_main!(benches);
