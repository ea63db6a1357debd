#![cfg(feature = "packager")]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use padnext::config::PadnextConfig;
use padnext::core::*;
use padnext::envelope::*;
use padnext::packager::{PackRequest, Packager, RepackOptions};
use padnext::schema::PayloadValidation;
use rust_decimal_macros::dec;

static KEY: LazyLock<RsaPrivateKey> =
    LazyLock::new(|| RsaPrivateKey::new(&mut rand::rngs::OsRng, 1024).unwrap());

fn keys() -> InMemoryKeys {
    InMemoryKeys::from_private_key("AZH-2026-01", KEY.clone())
}

fn created() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 2)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn address() -> Address {
    AddressBuilder::new("10115", "Berlin")
        .street("Hauptstr.")
        .house_number("1")
        .build()
}

fn batch() -> InvoiceBatch {
    let patient = PersonBuilder::new("Schulz")
        .first_name("Jonas")
        .birth_date(NaiveDate::from_ymd_opt(1980, 5, 17).unwrap())
        .sex(Sex::Male)
        .build();
    let case = CaseBuilder::human_medicine(patient, 1)
        .provider_id("LE1")
        .add_item(
            FeeLineBuilder::new(
                1,
                NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
                FeeCode::new(FeeSchedule::Goae, "1"),
                "Beratung",
                3,
            )
            .unit_price(dec!(23.00))
            .build(),
        )
        .build()
        .unwrap();
    let invoice = InvoiceBuilder::new(
        "R-2026-0001",
        Recipient::Person {
            person: PersonBuilder::new("Schulz").salutation("Herr").build(),
            address: address(),
        },
    )
    .add_case(case)
    .build()
    .unwrap();
    InvoiceBatchBuilder::new(IssuerBuilder::new("Praxis Meyer", 4711, address()).build())
        .add_provider(ProviderBuilder::new("LE1", PersonBuilder::new("Meyer").first_name("Anna").build()).build())
        .add_invoice(invoice)
        .build()
        .unwrap()
}

fn request(output_dir: &Path) -> PackRequest {
    PackRequest::new(
        batch(),
        Participant::same(ParticipantId::new("Praxis Meyer").customer_number(4711)),
        Participant::same(ParticipantId::new("Abrechnungszentrum").rz_id(42)),
        output_dir,
    )
    .created_at(created())
    .transfer_number(3)
}

fn plain_packager() -> Packager<NoKeys> {
    Packager::new(NoKeys, PadnextConfig::default())
}

fn sealing_packager() -> Packager<InMemoryKeys> {
    let mut config = PadnextConfig::default();
    config.keys.certificate_id = Some("AZH-2026-01".into());
    config.packaging.encrypt = true;
    Packager::new(keys(), config)
}

fn is_empty_or_missing(dir: &Path) -> bool {
    fs::read_dir(dir).map(|mut d| d.next().is_none()).unwrap_or(true)
}

/// Open a plain transfer archive, let `edit` change the manifest and payload
/// directories, then zip everything back in place.
fn rewrite_plain(archive: &Path, edit: impl FnOnce(&Path, &Path)) {
    let work = tempfile::tempdir().unwrap();
    let outer = work.path().join("outer");
    let inner = work.path().join("inner");

    let names = extract_zip(archive, &outer).unwrap();
    let inner_name = names.iter().find(|n| n.ends_with(INNER_ARCHIVE_SUFFIX)).unwrap();
    let inner_zip = outer.join(inner_name);
    extract_zip(&inner_zip, &inner).unwrap();

    edit(&outer, &inner);

    let payload_files: Vec<PathBuf> = sorted_files(&inner);
    compress_files(&payload_files, &inner_zip).unwrap();
    let outer_files: Vec<PathBuf> = sorted_files(&outer);
    compress_files(&outer_files, archive).unwrap();
}

fn sorted_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    files.sort();
    files
}

fn attachment(dir: &Path) -> PathBuf {
    let path = dir.join("befund.pdf");
    fs::write(&path, b"%PDF-1.4 Befundbericht").unwrap();
    path
}

// --- Outbound ---

#[test]
fn plain_batch_packs_and_unpacks() {
    let out = tempfile::tempdir().unwrap();
    let packager = plain_packager();
    let packed = packager.pack(request(out.path())).unwrap();

    assert_eq!(
        packed.archive.file_name().unwrap(),
        "00004711_20260302_ADL_000003_padx.zip"
    );
    assert!(packed.payload.is_file());
    assert_eq!(packed.manifest.encryption.procedure, EncryptionProcedure::None);
    assert_eq!(packed.manifest.file_count, 1);
    assert_eq!(packed.manifest.transfer_number, 3);

    let unpacked = packager.unpack(&packed.archive).unwrap();
    assert_eq!(unpacked.stem, "00004711_20260302_ADL_000003");
    assert_eq!(unpacked.batch, batch());
    assert_eq!(unpacked.batch.invoices[0].cases[0].sums().total, dec!(69.00));
    assert_eq!(
        fs::read(unpacked.payload_path()).unwrap(),
        fs::read(&packed.payload).unwrap()
    );
}

#[test]
fn plain_inner_archive_is_readable() {
    let out = tempfile::tempdir().unwrap();
    let packed = plain_packager().pack(request(out.path())).unwrap();

    let work = tempfile::tempdir().unwrap();
    let mut names = extract_zip(&packed.archive, work.path()).unwrap();
    names.sort();
    assert_eq!(
        names,
        vec![
            "00004711_20260302_ADL_000003_auf.xml",
            "00004711_20260302_ADL_000003_dat_padx.zip",
        ]
    );
    let inner = work.path().join("inner");
    extract_zip(&work.path().join(&names[1]), &inner).unwrap();
    let payload = fs::read(inner.join("00004711_20260302_ADL_000003_padx.xml")).unwrap();
    assert!(payload.starts_with(b"<?xml"));
}

#[test]
fn encrypted_batch_is_opaque_and_unpacks() {
    let out = tempfile::tempdir().unwrap();
    let packager = sealing_packager();
    let packed = packager.pack(request(out.path())).unwrap();
    assert!(packed.manifest.is_encrypted());
    assert_eq!(packed.manifest.encryption.certificate_id, "AZH-2026-01");

    let work = tempfile::tempdir().unwrap();
    let names = extract_zip(&packed.archive, work.path()).unwrap();
    let sealed = names
        .iter()
        .find(|n| n.ends_with("_dat_padx.zip.p7m"))
        .expect("sealed inner archive");
    assert!(!names.iter().any(|n| n.ends_with(INNER_ARCHIVE_SUFFIX)));
    let sealed = fs::read(work.path().join(sealed)).unwrap();
    assert!(!sealed.starts_with(b"PK"));
    let payload_name = b"00004711_20260302_ADL_000003_padx.xml";
    assert!(!sealed.windows(payload_name.len()).any(|w| w == payload_name));

    let unpacked = packager.unpack(&packed.archive).unwrap();
    assert_eq!(unpacked.batch, batch());
}

#[test]
fn encrypted_batch_needs_matching_key() {
    let out = tempfile::tempdir().unwrap();
    let packed = sealing_packager().pack(request(out.path())).unwrap();

    let stranger = Packager::new(
        InMemoryKeys::generate("AZH-2026-01", 1024).unwrap(),
        PadnextConfig::default(),
    );
    let err = stranger.unpack(&packed.archive).unwrap_err();
    assert!(matches!(err, PadnextError::Crypto(CryptoError::KeyUnwrap)));

    let err = plain_packager().unpack(&packed.archive).unwrap_err();
    assert!(matches!(
        err,
        PadnextError::Crypto(CryptoError::KeyUnavailable(_))
    ));
}

#[test]
fn encryption_without_certificate_fails_cleanly() {
    let out = tempfile::tempdir().unwrap();
    let err = plain_packager()
        .pack(request(out.path()).encrypt(true))
        .unwrap_err();
    assert!(matches!(
        err,
        PadnextError::Crypto(CryptoError::MissingCertificate)
    ));
    assert!(is_empty_or_missing(out.path()));
}

#[test]
fn three_factored_consultations_pack_and_unpack() {
    let patient = PersonBuilder::new("Schulz")
        .birth_date(NaiveDate::from_ymd_opt(1980, 5, 17).unwrap())
        .sex(Sex::Male)
        .build();
    let mut case = CaseBuilder::human_medicine(patient, 1).provider_id("LE1");
    for pos in 1..=3 {
        case = case.add_item(
            FeeLineBuilder::new(
                pos,
                NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
                FeeCode::new(FeeSchedule::Goae, "1"),
                "Beratung",
                1,
            )
            .unit_price(dec!(10.00))
            .factor(dec!(2.3))
            .build(),
        );
    }
    let out = tempfile::tempdir().unwrap();
    let mut req = request(out.path());
    req.batch.invoices[0].cases[0] = case.build().unwrap();

    let plain = plain_packager();
    let sealing = sealing_packager();
    let unpacked = [
        plain.unpack(&plain.pack(req.clone()).unwrap().archive).unwrap(),
        sealing.unpack(&sealing.pack(req).unwrap().archive).unwrap(),
    ];
    for batch in unpacked.iter().map(|u| &u.batch) {
        let case = &batch.invoices[0].cases[0];
        assert_eq!(case.sums().total, dec!(69.00));
        assert_eq!(case.sums().payable, dec!(69.00));
        assert_eq!(case.items().len(), 3);
        for (expected, item) in (1..=3).zip(case.items()) {
            let LineItem::Fee(line) = item else {
                panic!("expected a fee line, got {}", item.element_name());
            };
            assert_eq!(line.position.position_number, Some(expected));
            assert_eq!(line.total, dec!(23.00));
        }
    }
}

#[test]
fn blocked_payload_copy_leaves_no_archive() {
    let out = tempfile::tempdir().unwrap();
    let name = BatchName::new(4711, created().date(), MessageKind::Delivery, 3);
    fs::create_dir(out.path().join(name.payload_file())).unwrap();

    let err = plain_packager().pack(request(out.path())).unwrap_err();
    assert!(matches!(err, PadnextError::Io(_)));
    assert!(!out.path().join(name.transfer_archive()).exists());
    let left: Vec<PathBuf> = sorted_files(out.path());
    assert_eq!(left, vec![out.path().join(name.payload_file())]);
}

#[test]
fn attachments_travel_with_the_payload() {
    let out = tempfile::tempdir().unwrap();
    let src = tempfile::tempdir().unwrap();
    let packager = plain_packager();
    let packed = packager
        .pack(request(out.path()).attachment(attachment(src.path())))
        .unwrap();

    assert_eq!(packed.manifest.file_count, 2);
    let entry = packed.manifest.file("befund.pdf").unwrap();
    assert_eq!(entry.document_type, DocumentType::Attachment);
    assert_eq!(entry.format, Some(AttachmentFormat::Pdf));

    let unpacked = packager.unpack(&packed.archive).unwrap();
    assert_eq!(unpacked.attachments(), vec![unpacked.dir().join("befund.pdf")]);
    assert_eq!(unpacked.files.len(), 2);
}

#[test]
fn missing_attachment_aborts_pack() {
    let out = tempfile::tempdir().unwrap();
    let err = plain_packager()
        .pack(request(out.path()).attachment(out.path().join("nowhere.pdf")))
        .unwrap_err();
    assert!(matches!(
        err,
        PadnextError::FileSet(FileSetError::MissingFile { .. })
    ));
    assert!(is_empty_or_missing(out.path()));
}

#[test]
fn invalid_batch_leaves_no_output() {
    let out = tempfile::tempdir().unwrap();
    let mut req = request(out.path());
    req.batch.invoices[0].cases[0].core_mut().sums.total = dec!(1.00);

    let err = plain_packager().pack(req).unwrap_err();
    assert!(matches!(err, PadnextError::ModelConstraint(_)));
    assert!(!err.is_fatal());
    assert!(is_empty_or_missing(out.path()));
}

#[test]
fn transfer_number_range_is_enforced() {
    let out = tempfile::tempdir().unwrap();
    for number in [0, 1_000_000] {
        let err = plain_packager()
            .pack(request(out.path()).transfer_number(number))
            .unwrap_err();
        assert!(matches!(err, PadnextError::Numbering(_)));
    }
}

// --- Inbound failures ---

#[test]
fn renamed_manifest_is_a_name_mismatch() {
    let out = tempfile::tempdir().unwrap();
    let packager = plain_packager();
    let packed = packager.pack(request(out.path())).unwrap();

    rewrite_plain(&packed.archive, |outer, _| {
        fs::rename(
            outer.join("00004711_20260302_ADL_000003_auf.xml"),
            outer.join("00004711_20260302_ADL_000004_auf.xml"),
        )
        .unwrap();
    });

    let err = packager.unpack(&packed.archive).unwrap_err();
    assert!(matches!(
        err,
        PadnextError::FileSet(FileSetError::NameMismatch { .. })
    ));
}

#[test]
fn missing_listed_file_is_reported() {
    let out = tempfile::tempdir().unwrap();
    let src = tempfile::tempdir().unwrap();
    let packager = plain_packager();
    let packed = packager
        .pack(request(out.path()).attachment(attachment(src.path())))
        .unwrap();

    rewrite_plain(&packed.archive, |_, inner| {
        fs::remove_file(inner.join("befund.pdf")).unwrap();
    });

    let err = packager.unpack(&packed.archive).unwrap_err();
    assert!(matches!(
        err,
        PadnextError::FileSet(FileSetError::MissingFile { ref name }) if name == "befund.pdf"
    ));
}

#[test]
fn tampered_attachment_fails_checksum() {
    let out = tempfile::tempdir().unwrap();
    let src = tempfile::tempdir().unwrap();
    let packager = plain_packager();
    let packed = packager
        .pack(request(out.path()).attachment(attachment(src.path())))
        .unwrap();

    rewrite_plain(&packed.archive, |_, inner| {
        fs::write(inner.join("befund.pdf"), b"%PDF-1.4 Befundbericht".to_ascii_uppercase()).unwrap();
    });

    let err = packager.unpack(&packed.archive).unwrap_err();
    assert!(matches!(
        err,
        PadnextError::FileSet(FileSetError::ChecksumMismatch { ref name, .. }) if name == "befund.pdf"
    ));
}

#[test]
fn lenient_unpack_rejects_amounts_out_of_range() {
    let out = tempfile::tempdir().unwrap();
    let packed = plain_packager().pack(request(out.path())).unwrap();

    rewrite_plain(&packed.archive, |_, inner| {
        let payload = inner.join("00004711_20260302_ADL_000003_padx.xml");
        let xml = fs::read(&payload).unwrap();
        let xml = String::from_utf8_lossy(&xml).replace(
            "<einzelbetrag>23.00</einzelbetrag>",
            "<einzelbetrag>79228162514264337593543950335</einzelbetrag>",
        );
        assert!(xml.contains("79228162514264337593543950335"));
        fs::write(&payload, xml.as_bytes()).unwrap();
    });

    let mut config = PadnextConfig::default();
    config.packaging.payload_validation = PayloadValidation::Lenient;
    let err = Packager::new(NoKeys, config).unpack(&packed.archive).unwrap_err();
    let PadnextError::ModelConstraint(issues) = err else {
        panic!("expected a model constraint error, got {err}");
    };
    assert!(!issues.is_empty());
    assert!(issues.iter().all(|i| i.rule.as_deref() == Some(AMOUNT_OVERFLOW_RULE)));
    assert!(issues.iter().any(|i| i.field.ends_with("items[0].total")));
}

#[test]
fn unknown_procedure_is_rejected() {
    let out = tempfile::tempdir().unwrap();
    let packager = plain_packager();
    let packed = packager.pack(request(out.path())).unwrap();

    rewrite_plain(&packed.archive, |outer, _| {
        let path = outer.join("00004711_20260302_ADL_000003_auf.xml");
        let xml = fs::read(&path).unwrap();
        let xml = String::from_utf8_lossy(&xml).replace(r#"verfahren="0""#, r#"verfahren="2""#);
        fs::write(&path, xml).unwrap();
    });

    let err = packager.unpack(&packed.archive).unwrap_err();
    assert!(matches!(
        err,
        PadnextError::Crypto(CryptoError::UnsupportedProcedure(ref code)) if code == "2"
    ));
}

#[test]
fn archive_without_manifest_is_incomplete() {
    let out = tempfile::tempdir().unwrap();
    let packager = plain_packager();
    let packed = packager.pack(request(out.path())).unwrap();

    rewrite_plain(&packed.archive, |outer, _| {
        fs::remove_file(outer.join("00004711_20260302_ADL_000003_auf.xml")).unwrap();
    });

    let err = packager.unpack(&packed.archive).unwrap_err();
    assert!(matches!(
        err,
        PadnextError::FileSet(FileSetError::MissingEntry { ref suffix }) if suffix == MANIFEST_SUFFIX
    ));
}

// --- Receipts ---

#[test]
fn receive_accepts_a_clean_delivery() {
    let out = tempfile::tempdir().unwrap();
    let packager = plain_packager();
    let packed = packager.pack(request(out.path())).unwrap();

    let delivery = packager.receive(&packed.archive, created()).unwrap();
    assert!(delivery.receipt.is_accepted());
    assert_eq!(delivery.receipt.transfer_number, 3);
    assert_eq!(delivery.receipt.invoice_count, 1);
    assert!(delivery.batch.is_some());
}

#[test]
fn receive_rejects_a_tampered_delivery() {
    let out = tempfile::tempdir().unwrap();
    let src = tempfile::tempdir().unwrap();
    let packager = plain_packager();
    let packed = packager
        .pack(request(out.path()).attachment(attachment(src.path())))
        .unwrap();
    rewrite_plain(&packed.archive, |_, inner| {
        fs::write(inner.join("befund.pdf"), b"short").unwrap();
    });

    let delivery = packager.receive(&packed.archive, created()).unwrap();
    assert!(!delivery.receipt.is_accepted());
    assert!(delivery.batch.is_none());
    assert_eq!(delivery.receipt.errors[0].code, codes::FILE_SET);
    assert_eq!(delivery.receipt.file_count, 2);
}

#[test]
fn read_manifest_only() {
    let out = tempfile::tempdir().unwrap();
    let packager = sealing_packager();
    let packed = packager.pack(request(out.path())).unwrap();

    let manifest = plain_packager().read_manifest(&packed.archive).unwrap();
    assert_eq!(manifest, packed.manifest);
}

// --- Scratch handling ---

#[test]
fn unpack_into_replaces_directory_content() {
    let out = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    fs::write(work.path().join("leftover.txt"), b"old run").unwrap();

    let packager = plain_packager();
    let packed = packager.pack(request(out.path())).unwrap();
    let unpacked = packager.unpack_into(&packed.archive, work.path()).unwrap();

    assert!(!work.path().join("leftover.txt").exists());
    assert!(unpacked.payload_path().starts_with(work.path()));
    assert!(unpacked.payload_path().is_file());
}

#[test]
fn failed_unpack_into_leaves_directory_empty() {
    let out = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let packed = sealing_packager().pack(request(out.path())).unwrap();

    assert!(plain_packager().unpack_into(&packed.archive, work.path()).is_err());
    assert!(is_empty_or_missing(work.path()));
}

// --- Repack ---

#[test]
fn repack_replaces_first_case_items() {
    let out = tempfile::tempdir().unwrap();
    let packager = sealing_packager();
    let packed = packager.pack(request(out.path())).unwrap();
    let unpacked = packager.unpack(&packed.archive).unwrap();

    let rows = vec![
        LineItemRow {
            go: Some("GOAE".into()),
            code: Some("5".into()),
            quantity: Some(1),
            text: Some("Symptombezogene Untersuchung".into()),
            total: Some(dec!(10.72)),
            factor: Some(dec!(2.3)),
            unit_price: Some(dec!(4.66)),
        },
        LineItemRow {
            go: Some("GOAE".into()),
            code: Some("1".into()),
            quantity: Some(1),
            text: Some("Beratung".into()),
            total: Some(dec!(23.00)),
            factor: None,
            unit_price: Some(dec!(23.00)),
        },
    ];
    let again = packager
        .repack(&unpacked, &rows, RepackOptions::new(out.path(), 4))
        .unwrap();
    assert_eq!(again.manifest.transfer_number, 4);
    assert!(again.manifest.is_encrypted());
    assert_eq!(again.manifest.receiver, packed.manifest.receiver);

    let reread = packager.unpack(&again.archive).unwrap();
    let case = &reread.batch.invoices[0].cases[0];
    assert_eq!(case.items().len(), 2);
    assert_eq!(case.sums().total, dec!(33.72));
    assert_eq!(
        case.items()[0].position().unwrap().date,
        NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()
    );
}

#[test]
fn repack_reports_every_bad_row() {
    let out = tempfile::tempdir().unwrap();
    let packager = plain_packager();
    let packed = packager.pack(request(out.path())).unwrap();
    let unpacked = packager.unpack(&packed.archive).unwrap();

    let rows = vec![LineItemRow::default(), LineItemRow::default()];
    let err = packager
        .repack(&unpacked, &rows, RepackOptions::new(out.path(), 5))
        .unwrap_err();
    let fields: Vec<_> = err.issues().iter().map(|e| e.field.as_str()).collect();
    assert!(fields.contains(&"rows[0].go"));
    assert!(fields.contains(&"rows[1].total"));
}

// --- Configuration ---

#[test]
fn packager_from_config_uses_pem_keys() {
    let keys_dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    generate_key_pair(keys_dir.path(), 1024).unwrap();

    let config_path = keys_dir.path().join("padnext.toml");
    fs::write(
        &config_path,
        format!(
            "[keys]\ndir = {:?}\ncertificate_id = \"PEM-01\"\n\n[packaging]\nencrypt = true\nreal_data = true\n",
            keys_dir.path().display().to_string()
        ),
    )
    .unwrap();

    let packager = Packager::from_config(PadnextConfig::load(&config_path).unwrap()).unwrap();
    let packed = packager.pack(request(out.path())).unwrap();
    assert!(packed.manifest.real_data);
    assert_eq!(packed.manifest.encryption.certificate_id, "PEM-01");
    assert_eq!(packager.unpack(&packed.archive).unwrap().batch, batch());
}
