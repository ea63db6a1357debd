use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::checksum::verify_file_set;
use crate::core::{
    AMOUNT_OVERFLOW_RULE, DocumentType, ENCRYPTED_SUFFIX, EncryptionProcedure, FileSetError,
    INNER_ARCHIVE_SUFFIX, InvoiceBatch, MANIFEST_SUFFIX, OrderManifest, PAYLOAD_SUFFIX,
    PadnextError, Receipt, batch_stem, names_match, validate_batch,
};
use crate::envelope::{KeyProvider, decrypt_file, extract_zip};
use crate::schema::{self, PayloadValidation, SchemaId};
use crate::xml;

use super::Packager;
use super::scratch::Scratch;

const TRANSFER_DIR: &str = "transfer";
const PAYLOAD_DIR: &str = "payload";

/// A verified inbound transfer.
///
/// The payload files stay in the run's scratch directory for as long as this
/// value lives.
#[derive(Debug)]
pub struct UnpackedBatch {
    /// Batch stem shared by manifest and payload, e.g. `00004711_20260302_ADL_000003`.
    pub stem: String,
    pub manifest: OrderManifest,
    pub batch: InvoiceBatch,
    /// Materialized files in manifest order.
    pub files: Vec<PathBuf>,
    scratch: Scratch,
}

impl UnpackedBatch {
    /// Directory holding the materialized files.
    pub fn dir(&self) -> PathBuf {
        self.scratch.path().join(PAYLOAD_DIR)
    }

    pub fn payload_path(&self) -> PathBuf {
        self.dir().join(format!("{}{PAYLOAD_SUFFIX}", self.stem))
    }

    /// Files other than the invoice payload, in manifest order.
    pub fn attachments(&self) -> Vec<PathBuf> {
        self.manifest
            .files
            .iter()
            .filter(|f| f.document_type != DocumentType::PadNext)
            .map(|f| self.dir().join(&f.name))
            .collect()
    }
}

/// Outcome of [`Packager::receive`]: the receipt to send back and, when
/// accepted, the unpacked batch.
#[derive(Debug)]
pub struct Delivery {
    pub receipt: Receipt,
    pub batch: Option<UnpackedBatch>,
}

struct Unpacked {
    stem: String,
    manifest: OrderManifest,
    batch: InvoiceBatch,
    files: Vec<PathBuf>,
}

impl<K: KeyProvider> Packager<K> {
    /// Unpack and verify a transfer archive in a fresh scratch directory.
    pub fn unpack(&self, archive: &Path) -> Result<UnpackedBatch, PadnextError> {
        let scratch = Scratch::fresh(self.config.packaging.scratch_root.as_deref())?;
        self.unpack_in(archive, scratch)
    }

    /// Like [`unpack`](Self::unpack), but works in `dir`, which is emptied first.
    pub fn unpack_into(&self, archive: &Path, dir: &Path) -> Result<UnpackedBatch, PadnextError> {
        let scratch = Scratch::reuse(dir)?;
        self.unpack_in(archive, scratch)
    }

    /// Read only the order manifest of a transfer archive.
    pub fn read_manifest(&self, archive: &Path) -> Result<OrderManifest, PadnextError> {
        let scratch = Scratch::fresh(self.config.packaging.scratch_root.as_deref())?;
        let dir = scratch.path().join(TRANSFER_DIR);
        let entries = extract_zip(archive, &dir)?;
        let manifest_file = find_entry(&entries, MANIFEST_SUFFIX)?;
        read_manifest_file(&dir.join(manifest_file))
    }

    /// Unpack an archive and produce the receipt for it.
    ///
    /// Fails only when not even the manifest can be read, since a receipt
    /// needs the transfer number.
    pub fn receive(
        &self,
        archive: &Path,
        received_at: NaiveDateTime,
    ) -> Result<Delivery, PadnextError> {
        match self.unpack(archive) {
            Ok(unpacked) => Ok(Delivery {
                receipt: Receipt::accepted(&unpacked.manifest, &unpacked.batch, received_at),
                batch: Some(unpacked),
            }),
            Err(error) => match self.read_manifest(archive) {
                Ok(manifest) => Ok(Delivery {
                    receipt: Receipt::rejected(&manifest, &error, received_at),
                    batch: None,
                }),
                Err(_) => Err(error),
            },
        }
    }

    fn unpack_in(&self, archive: &Path, scratch: Scratch) -> Result<UnpackedBatch, PadnextError> {
        let span = tracing::info_span!("unpack", archive = %archive.display());
        let _enter = span.enter();

        match self.run_unpack(archive, scratch.path()) {
            Ok(done) => {
                tracing::info!(stage = "done", stem = %done.stem, files = done.files.len(), "transfer unpacked");
                Ok(UnpackedBatch {
                    stem: done.stem,
                    manifest: done.manifest,
                    batch: done.batch,
                    files: done.files,
                    scratch,
                })
            }
            Err(error) => {
                tracing::error!(error = %error, fatal = error.is_fatal(), "unpack failed");
                scratch.discard();
                Err(error)
            }
        }
    }

    fn run_unpack(&self, archive: &Path, dir: &Path) -> Result<Unpacked, PadnextError> {
        let transfer_dir = dir.join(TRANSFER_DIR);
        let payload_dir = dir.join(PAYLOAD_DIR);

        tracing::info!(stage = "read_manifest");
        let entries = extract_zip(archive, &transfer_dir)?;
        let manifest_file = find_entry(&entries, MANIFEST_SUFFIX)?;
        let manifest = read_manifest_file(&transfer_dir.join(&manifest_file))?;

        tracing::info!(
            stage = "determine_encryption",
            procedure = manifest.encryption.procedure.code(),
            transfer_number = manifest.transfer_number
        );
        let inner = match manifest.encryption.procedure {
            EncryptionProcedure::None => {
                tracing::info!(stage = "unpack_plain");
                transfer_dir.join(find_entry(&entries, INNER_ARCHIVE_SUFFIX)?)
            }
            EncryptionProcedure::Pkcs7 => {
                tracing::info!(
                    stage = "decrypt_then_unpack",
                    certificate_id = %manifest.encryption.certificate_id
                );
                let sealed = find_entry(&entries, &format!("{INNER_ARCHIVE_SUFFIX}{ENCRYPTED_SUFFIX}"))?;
                let opened = sealed.strip_suffix(ENCRYPTED_SUFFIX).unwrap_or(&sealed);
                let opened = transfer_dir.join(opened);
                let key = self.keys.private_key(&manifest.encryption.certificate_id)?;
                decrypt_file(&transfer_dir.join(&sealed), &opened, key)?;
                opened
            }
        };
        let names = extract_zip(&inner, &payload_dir)?;

        tracing::info!(stage = "validate_payload");
        let mode = self.config.packaging.payload_validation;
        let payload_file = find_entry(&names, PAYLOAD_SUFFIX)?;
        let bytes = fs::read(payload_dir.join(&payload_file))?;
        schema::check_payload(&bytes, mode)?;
        let batch: InvoiceBatch = xml::deserialize(&bytes)?;
        let issues = validate_batch(&batch);
        if !issues.is_empty() {
            match mode {
                PayloadValidation::Strict => return Err(PadnextError::ModelConstraint(issues)),
                PayloadValidation::Lenient => {
                    for issue in &issues {
                        tracing::warn!(field = %issue.field, rule = ?issue.rule, "payload model violation: {}", issue.message);
                    }
                    // Amounts that cannot be computed are never materialized.
                    let overflow: Vec<_> = issues
                        .into_iter()
                        .filter(|i| i.rule.as_deref() == Some(AMOUNT_OVERFLOW_RULE))
                        .collect();
                    if !overflow.is_empty() {
                        return Err(PadnextError::ModelConstraint(overflow));
                    }
                }
            }
        }

        tracing::info!(stage = "match_filenames");
        if !names_match(&manifest_file, &payload_file) {
            return Err(FileSetError::NameMismatch {
                manifest: manifest_file,
                payload: payload_file,
            }
            .into());
        }

        tracing::info!(stage = "verify_file_list", files = manifest.files.len());
        verify_file_set(&manifest, &payload_dir)?;

        tracing::info!(stage = "materialize");
        let files = manifest
            .files
            .iter()
            .map(|f| payload_dir.join(&f.name))
            .collect();
        Ok(Unpacked {
            stem: batch_stem(&manifest_file).to_string(),
            manifest,
            batch,
            files,
        })
    }
}

/// Manifest XML is always validated strictly before it is deserialized.
fn read_manifest_file(path: &Path) -> Result<OrderManifest, PadnextError> {
    let bytes = fs::read(path)?;
    schema::check(&bytes, SchemaId::Manifest)?;
    xml::deserialize(&bytes)
}

fn find_entry(names: &[String], suffix: &str) -> Result<String, PadnextError> {
    names
        .iter()
        .find(|n| n.ends_with(suffix))
        .cloned()
        .ok_or_else(|| {
            FileSetError::MissingEntry {
                suffix: suffix.to_string(),
            }
            .into()
        })
}
