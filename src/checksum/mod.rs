//! File checksums and manifest file entries.
//!
//! Every file listed in an order manifest carries its byte length and the
//! lowercase hex SHA-1 of its content. This module computes those values,
//! renames the payload to its canonical name, and verifies a materialized
//! file set against a manifest.

use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use sha1::{Digest, Sha1};

use crate::core::{
    AttachmentFormat, BatchName, DocumentType, FileEntry, FileSetError, OrderManifest,
    PAYLOAD_SUFFIX, PadnextError,
};

const CHUNK_SIZE: usize = 64 * 1024;

/// SHA-1 of a file, read in 64 KiB chunks, as 40 lowercase hex characters.
pub fn compute_checksum(path: &Path) -> Result<String, PadnextError> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut hasher = Sha1::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// SHA-1 of an in-memory buffer, same format as [`compute_checksum`].
pub fn checksum_bytes(data: &[u8]) -> String {
    hex::encode(Sha1::digest(data))
}

/// Rename a payload XML to `{batch}_padx.xml` in its directory.
///
/// A file that already carries the canonical name is left untouched.
pub fn canonicalize_payload_name(path: &Path, name: &BatchName) -> Result<PathBuf, PadnextError> {
    let target = path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(name.payload_file());
    if path == target {
        return Ok(target);
    }
    if !path.exists() {
        return Err(FileSetError::MissingFile {
            name: file_name(path),
        }
        .into());
    }
    fs::rename(path, &target)?;
    tracing::debug!(from = %path.display(), to = %target.display(), "payload renamed to canonical name");
    Ok(target)
}

/// Document type and attachment format implied by a file name.
pub fn classify(file_name: &str) -> (DocumentType, Option<AttachmentFormat>) {
    if file_name.ends_with(PAYLOAD_SUFFIX) {
        return (DocumentType::PadNext, None);
    }
    let format = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(AttachmentFormat::from_extension);
    (DocumentType::Attachment, format)
}

/// One manifest entry per file, with fresh length and checksum.
pub fn build_manifest_entries(
    files: &[PathBuf],
    created_at: NaiveDateTime,
) -> Result<Vec<FileEntry>, PadnextError> {
    files
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let name = file_name(path);
            let (document_type, format) = classify(&name);
            Ok(FileEntry {
                document_type,
                format,
                length: file_length(path)?,
                checksum: compute_checksum(path)?,
                name,
                description: None,
                id: Some((i + 1).to_string()),
                created_at: Some(created_at),
            })
        })
        .collect()
}

/// Recompute length and checksum of every listed file from `dir`,
/// keeping ids, types and descriptions.
pub fn refresh_manifest_entries(manifest: &mut OrderManifest, dir: &Path) -> Result<(), PadnextError> {
    for entry in &mut manifest.files {
        let path = dir.join(&entry.name);
        entry.length = file_length(&path)?;
        entry.checksum = compute_checksum(&path)?;
    }
    manifest.file_count = manifest.files.len() as u32;
    Ok(())
}

/// Check that `dir` holds exactly the files the manifest promises.
///
/// Fails on the first missing file, then on a wrong declared count, then on
/// the first length or checksum mismatch.
pub fn verify_file_set(manifest: &OrderManifest, dir: &Path) -> Result<(), PadnextError> {
    for entry in &manifest.files {
        if !dir.join(&entry.name).is_file() {
            return Err(FileSetError::MissingFile {
                name: entry.name.clone(),
            }
            .into());
        }
    }

    if manifest.file_count as usize != manifest.files.len() {
        return Err(FileSetError::CountMismatch {
            declared: manifest.file_count,
            actual: manifest.files.len(),
        }
        .into());
    }

    for entry in &manifest.files {
        let path = dir.join(&entry.name);
        let length = file_length(&path)?;
        if length != entry.length {
            return Err(FileSetError::LengthMismatch {
                name: entry.name.clone(),
                expected: entry.length,
                actual: length,
            }
            .into());
        }
        let checksum = compute_checksum(&path)?;
        if !checksum.eq_ignore_ascii_case(&entry.checksum) {
            return Err(FileSetError::ChecksumMismatch {
                name: entry.name.clone(),
                expected: entry.checksum.clone(),
                actual: checksum,
            }
            .into());
        }
    }
    Ok(())
}

fn file_length(path: &Path) -> Result<u64, PadnextError> {
    Ok(fs::metadata(path).map_err(|e| open_error(path, e))?.len())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn open_error(path: &Path, e: std::io::Error) -> PadnextError {
    if e.kind() == ErrorKind::NotFound {
        FileSetError::MissingFile {
            name: file_name(path),
        }
        .into()
    } else {
        PadnextError::Io(format!("{}: {e}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MessageKind;
    use chrono::NaiveDate;

    fn created() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn known_digests() {
        assert_eq!(checksum_bytes(b""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(checksum_bytes(b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn file_checksum_matches_buffer_checksum_across_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &data).unwrap();
        assert_eq!(compute_checksum(&path).unwrap(), checksum_bytes(&data));
    }

    #[test]
    fn missing_file_is_a_file_set_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = compute_checksum(&dir.path().join("nope.xml")).unwrap_err();
        assert!(matches!(
            err,
            PadnextError::FileSet(FileSetError::MissingFile { ref name }) if name == "nope.xml"
        ));
    }

    #[test]
    fn canonical_rename_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("export.xml");
        fs::write(&original, b"<rechnungen/>").unwrap();
        let name = BatchName::new(4711, created().date(), MessageKind::Delivery, 3);

        let renamed = canonicalize_payload_name(&original, &name).unwrap();
        assert_eq!(
            renamed.file_name().unwrap(),
            "00004711_20260302_ADL_000003_padx.xml"
        );
        assert!(!original.exists());

        let again = canonicalize_payload_name(&renamed, &name).unwrap();
        assert_eq!(again, renamed);
        assert!(canonicalize_payload_name(&original, &name).is_err());
    }

    #[test]
    fn entries_classify_payload_and_attachments() {
        let dir = tempfile::tempdir().unwrap();
        let payload = dir.path().join("00004711_20260302_ADL_000003_padx.xml");
        let scan = dir.path().join("Befund.PDF");
        fs::write(&payload, b"<rechnungen/>").unwrap();
        fs::write(&scan, b"%PDF-1.7").unwrap();

        let entries = build_manifest_entries(&[payload, scan], created()).unwrap();
        assert_eq!(entries[0].document_type, DocumentType::PadNext);
        assert_eq!(entries[0].length, 13);
        assert_eq!(entries[1].document_type, DocumentType::Attachment);
        assert_eq!(entries[1].format, Some(AttachmentFormat::Pdf));
        assert_eq!(entries[1].checksum, checksum_bytes(b"%PDF-1.7"));
    }
}
