#![cfg(feature = "envelope")]

use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

use chrono::NaiveDate;
use padnext::checksum::*;
use padnext::core::*;
use padnext::envelope::*;

static KEYS: LazyLock<InMemoryKeys> =
    LazyLock::new(|| InMemoryKeys::generate("AZH-TEST", 1024).unwrap());

fn write(dir: &std::path::Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

// --- Hybrid encryption ---

#[test]
fn encrypt_decrypt_with_provider_keys() {
    let public = KEYS.public_key("AZH-TEST").unwrap();
    let private = KEYS.private_key("AZH-TEST").unwrap();
    let plaintext = b"<rechnungen>...</rechnungen>".repeat(200);

    let sealed = encrypt(&plaintext, public).unwrap();
    assert!(!sealed.windows(12).any(|w| w == b"<rechnungen>"));
    assert_eq!(decrypt(&sealed, private).unwrap(), plaintext);
}

#[test]
fn two_encryptions_differ() {
    let public = KEYS.public_key("AZH-TEST").unwrap();
    let a = encrypt(b"same input", public).unwrap();
    let b = encrypt(b"same input", public).unwrap();
    assert_ne!(a, b);
}

#[test]
fn wrong_private_key_cannot_unwrap() {
    let other = InMemoryKeys::generate("OTHER", 1024).unwrap();
    let sealed = encrypt(b"payload", KEYS.public_key("AZH-TEST").unwrap()).unwrap();
    let err = decrypt(&sealed, other.private_key("OTHER").unwrap()).unwrap_err();
    assert!(matches!(err, PadnextError::Crypto(CryptoError::KeyUnwrap)));
    assert!(err.is_fatal());
}

#[test]
fn short_input_is_malformed() {
    let err = decrypt(&[0, 0], KEYS.private_key("AZH-TEST").unwrap()).unwrap_err();
    assert!(matches!(
        err,
        PadnextError::Crypto(CryptoError::MalformedLengthPrefix { .. })
    ));
}

#[test]
fn file_encryption_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "inner.zip", b"PK\x03\x04 not really a zip");
    let sealed = dir.path().join("inner.zip.p7m");
    let opened = dir.path().join("opened.zip");

    encrypt_file(&input, &sealed, KEYS.public_key("AZH-TEST").unwrap()).unwrap();
    decrypt_file(&sealed, &opened, KEYS.private_key("AZH-TEST").unwrap()).unwrap();
    assert_eq!(fs::read(opened).unwrap(), fs::read(input).unwrap());
}

// --- Key providers ---

#[test]
fn public_only_provider_cannot_decrypt() {
    let public = KEYS.public_key("AZH-TEST").unwrap().clone();
    let sender = InMemoryKeys::public_only("AZH-TEST", public);
    assert!(sender.public_key("AZH-TEST").is_ok());
    assert!(matches!(
        sender.private_key("AZH-TEST"),
        Err(PadnextError::Crypto(CryptoError::KeyUnavailable(_)))
    ));
}

#[test]
fn lookup_by_unknown_certificate_fails() {
    assert!(KEYS.public_key("NOPE").is_err());
    assert!(NoKeys.private_key("0").is_err());
    assert_eq!(NoKeys.certificate_id(), "0");
}

#[test]
fn generated_pem_pair_loads() {
    let dir = tempfile::tempdir().unwrap();
    let private = generate_key_pair(dir.path(), 1024).unwrap();
    let store = PemKeyStore::open(dir.path(), "PEM-1").unwrap();

    assert_eq!(store.certificate_id(), "PEM-1");
    assert_eq!(store.dir(), dir.path());
    assert_eq!(store.public_key("PEM-1").unwrap(), &RsaPublicKey::from(&private));

    let sealed = encrypt(b"hello", store.public_key("PEM-1").unwrap()).unwrap();
    assert_eq!(decrypt(&sealed, store.private_key("PEM-1").unwrap()).unwrap(), b"hello");
}

#[test]
fn public_key_is_derived_from_private_pem() {
    let dir = tempfile::tempdir().unwrap();
    generate_key_pair(dir.path(), 1024).unwrap();
    fs::remove_file(dir.path().join(PUBLIC_KEY_FILE)).unwrap();

    let store = PemKeyStore::open(dir.path(), "PEM-2").unwrap();
    assert!(store.public_key("PEM-2").is_ok());
}

#[test]
fn sender_store_has_no_private_key() {
    let dir = tempfile::tempdir().unwrap();
    generate_key_pair(dir.path(), 1024).unwrap();
    fs::remove_file(dir.path().join(PRIVATE_KEY_FILE)).unwrap();

    let store = PemKeyStore::open(dir.path(), "PEM-3").unwrap();
    assert!(store.private_key("PEM-3").is_err());
    assert!(!format!("{store:?}").contains("BEGIN"));
}

#[test]
fn empty_key_dir_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    assert!(PemKeyStore::open(dir.path(), "X").is_err());
}

#[test]
fn garbage_pem_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), PUBLIC_KEY_FILE, b"-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----\n");
    let err = PemKeyStore::open(dir.path(), "X").unwrap_err();
    assert!(matches!(err, PadnextError::Crypto(CryptoError::KeyUnavailable(_))));
}

// --- Zip containers ---

#[test]
fn compress_and_extract_flat_archive() {
    let src = tempfile::tempdir().unwrap();
    let nested = src.path().join("deep").join("er");
    fs::create_dir_all(&nested).unwrap();
    let files = vec![
        write(src.path(), "a_padx.xml", b"<rechnungen/>"),
        write(&nested, "scan.pdf", b"%PDF-1.7"),
    ];
    let archive = src.path().join("out.zip");
    compress_files(&files, &archive).unwrap();

    let dest = tempfile::tempdir().unwrap();
    let names = extract_zip(&archive, dest.path()).unwrap();
    assert_eq!(names, vec!["a_padx.xml", "scan.pdf"]);
    assert_eq!(fs::read(dest.path().join("scan.pdf")).unwrap(), b"%PDF-1.7");
}

#[test]
fn truncated_archive_is_an_archive_error() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![write(dir.path(), "a.xml", &[b'x'; 4096])];
    let archive = dir.path().join("out.zip");
    compress_files(&files, &archive).unwrap();
    let bytes = fs::read(&archive).unwrap();
    fs::write(&archive, &bytes[..bytes.len() / 2]).unwrap();

    let err = extract_zip(&archive, &dir.path().join("x")).unwrap_err();
    assert!(matches!(err, PadnextError::Archive(_)));
}

// --- Checksums and file sets ---

fn manifest_for(files: &[PathBuf]) -> OrderManifest {
    let created = NaiveDate::from_ymd_opt(2026, 3, 2)
        .unwrap()
        .and_hms_opt(11, 0, 0)
        .unwrap();
    OrderManifestBuilder::new(
        Participant::same(ParticipantId::new("Praxis").customer_number(4711)),
        Participant::same(ParticipantId::new("AZH")),
        created,
    )
    .files(build_manifest_entries(files, created).unwrap())
    .build()
    .unwrap()
}

#[test]
fn manifest_entries_describe_files() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![
        write(dir.path(), "00004711_20260302_ADL_000001_padx.xml", b"abc"),
        write(dir.path(), "befund.JPG", b"\xFF\xD8\xFF"),
    ];
    let manifest = manifest_for(&files);

    let payload = &manifest.files[0];
    assert_eq!(payload.document_type, DocumentType::PadNext);
    assert_eq!(payload.length, 3);
    assert_eq!(payload.checksum, "a9993e364706816aba3e25717850c26c9cd0d89d");
    assert_eq!(payload.id.as_deref(), Some("1"));

    let image = &manifest.files[1];
    assert_eq!(image.document_type, DocumentType::Attachment);
    assert_eq!(image.format, Some(AttachmentFormat::Jpeg));
    assert_eq!(image.checksum, checksum_bytes(b"\xFF\xD8\xFF"));
}

#[test]
fn verified_file_set_passes() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![write(dir.path(), "x_padx.xml", b"payload")];
    verify_file_set(&manifest_for(&files), dir.path()).unwrap();
}

#[test]
fn missing_file_wins_over_count() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![write(dir.path(), "x_padx.xml", b"payload")];
    let mut manifest = manifest_for(&files);
    manifest.file_count = 5;
    fs::remove_file(&files[0]).unwrap();

    let err = verify_file_set(&manifest, dir.path()).unwrap_err();
    assert!(matches!(
        err,
        PadnextError::FileSet(FileSetError::MissingFile { ref name }) if name == "x_padx.xml"
    ));
}

#[test]
fn declared_count_must_match() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![write(dir.path(), "x_padx.xml", b"payload")];
    let mut manifest = manifest_for(&files);
    manifest.file_count = 2;

    let err = verify_file_set(&manifest, dir.path()).unwrap_err();
    assert!(matches!(
        err,
        PadnextError::FileSet(FileSetError::CountMismatch { declared: 2, actual: 1 })
    ));
}

#[test]
fn tampered_content_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![write(dir.path(), "x_padx.xml", b"payload")];
    let manifest = manifest_for(&files);

    fs::write(&files[0], b"PAYLOAD").unwrap();
    let err = verify_file_set(&manifest, dir.path()).unwrap_err();
    assert!(matches!(
        err,
        PadnextError::FileSet(FileSetError::ChecksumMismatch { .. })
    ));

    fs::write(&files[0], b"payload!").unwrap();
    let err = verify_file_set(&manifest, dir.path()).unwrap_err();
    assert!(matches!(
        err,
        PadnextError::FileSet(FileSetError::LengthMismatch { expected: 7, actual: 8, .. })
    ));
}

#[test]
fn refresh_repairs_entries() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![write(dir.path(), "x_padx.xml", b"payload")];
    let mut manifest = manifest_for(&files);
    fs::write(&files[0], b"new payload").unwrap();

    refresh_manifest_entries(&mut manifest, dir.path()).unwrap();
    assert_eq!(manifest.files[0].length, 11);
    verify_file_set(&manifest, dir.path()).unwrap();
}

#[test]
fn payload_is_renamed_to_batch_name() {
    let dir = tempfile::tempdir().unwrap();
    let draft = write(dir.path(), "draft.xml", b"<rechnungen/>");
    let name = BatchName::new(4711, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), MessageKind::Delivery, 9);

    let canonical = canonicalize_payload_name(&draft, &name).unwrap();
    assert_eq!(
        canonical.file_name().unwrap(),
        "00004711_20260302_ADL_000009_padx.xml"
    );
    assert!(!draft.exists());
    assert_eq!(canonicalize_payload_name(&canonical, &name).unwrap(), canonical);
}
