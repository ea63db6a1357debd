use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

use crate::checksum::{build_manifest_entries, canonicalize_payload_name};
use crate::core::{
    BatchName, CryptoError, EncryptionDescriptor, FileSetError, InvoiceBatch, LineItemRow,
    MessageKind, OrderManifest, OrderManifestBuilder, Participant, PadnextError,
    replace_first_case_items, rows_to_fee_lines, validate_batch,
};
use crate::envelope::{KeyProvider, compress_files, encrypt_file};
use crate::schema::{self, SchemaId};
use crate::xml;

use super::Packager;
use super::scratch::Scratch;
use super::unpack::UnpackedBatch;

const MAX_TRANSFER_NUMBER: u32 = 999_999;

/// Everything needed to produce one outbound transfer archive.
#[derive(Debug, Clone)]
pub struct PackRequest {
    pub batch: InvoiceBatch,
    pub sender: Participant,
    pub receiver: Participant,
    pub transfer_number: u32,
    pub created_at: NaiveDateTime,
    /// Extra files (PDF, JPEG, TIFF) shipped next to the payload.
    pub attachments: Vec<PathBuf>,
    pub output_dir: PathBuf,
    /// Overrides `packaging.encrypt` when set.
    pub encrypt: Option<bool>,
}

impl PackRequest {
    pub fn new(
        batch: InvoiceBatch,
        sender: Participant,
        receiver: Participant,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        let now = Local::now().naive_local();
        Self {
            batch,
            sender,
            receiver,
            transfer_number: 1,
            created_at: now.with_nanosecond(0).unwrap_or(now),
            attachments: Vec::new(),
            output_dir: output_dir.into(),
            encrypt: None,
        }
    }

    pub fn transfer_number(mut self, number: u32) -> Self {
        self.transfer_number = number;
        self
    }

    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn attachment(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachments.push(path.into());
        self
    }

    pub fn encrypt(mut self, encrypt: bool) -> Self {
        self.encrypt = Some(encrypt);
        self
    }
}

/// Files written by a successful [`Packager::pack`].
#[derive(Debug, Clone)]
pub struct PackedArchive {
    pub name: BatchName,
    /// `{name}_padx.zip`
    pub archive: PathBuf,
    /// `{name}_padx.xml`, the payload as shipped.
    pub payload: PathBuf,
    pub manifest: OrderManifest,
}

/// Settings for [`Packager::repack`].
#[derive(Debug, Clone)]
pub struct RepackOptions {
    pub output_dir: PathBuf,
    pub transfer_number: u32,
    pub created_at: Option<NaiveDateTime>,
    /// Date for the new fee lines. Defaults to the date of the first
    /// replaced item, then to the creation date.
    pub service_date: Option<NaiveDate>,
    /// Defaults to the procedure of the inbound manifest.
    pub encrypt: Option<bool>,
}

impl RepackOptions {
    pub fn new(output_dir: impl Into<PathBuf>, transfer_number: u32) -> Self {
        Self {
            output_dir: output_dir.into(),
            transfer_number,
            created_at: None,
            service_date: None,
            encrypt: None,
        }
    }
}

impl<K: KeyProvider> Packager<K> {
    /// Build, checksum, compress, optionally encrypt and archive a batch.
    ///
    /// Outputs appear in `output_dir` only when every step succeeded.
    pub fn pack(&self, request: PackRequest) -> Result<PackedArchive, PadnextError> {
        let span = tracing::info_span!(
            "pack",
            transfer_number = request.transfer_number,
            output_dir = %request.output_dir.display()
        );
        let _enter = span.enter();

        let scratch = Scratch::fresh(self.config.packaging.scratch_root.as_deref())?;
        let result = self.run_pack(request, scratch.path());
        match &result {
            Ok(packed) => {
                tracing::info!(stage = "cleanup", archive = %packed.archive.display(), "transfer packed")
            }
            Err(error) => tracing::error!(error = %error, fatal = error.is_fatal(), "pack failed"),
        }
        scratch.discard();
        result
    }

    /// Replace the first case's items with fee lines built from `rows` and
    /// pack the result, using the inbound manifest as template.
    pub fn repack(
        &self,
        unpacked: &UnpackedBatch,
        rows: &[LineItemRow],
        options: RepackOptions,
    ) -> Result<PackedArchive, PadnextError> {
        let template = &unpacked.manifest;
        let created_at = options.created_at.unwrap_or_else(|| {
            let now = Local::now().naive_local();
            now.with_nanosecond(0).unwrap_or(now)
        });
        let service_date = options
            .service_date
            .or_else(|| first_item_date(&unpacked.batch))
            .unwrap_or(created_at.date());

        let mut batch = unpacked.batch.clone();
        let items = rows_to_fee_lines(rows, service_date)?;
        replace_first_case_items(&mut batch, items)?;
        tracing::info!(stem = %unpacked.stem, rows = rows.len(), "first case items replaced");

        self.pack(PackRequest {
            batch,
            sender: template.sender.clone(),
            receiver: template.receiver.clone(),
            transfer_number: options.transfer_number,
            created_at,
            attachments: unpacked.attachments(),
            output_dir: options.output_dir,
            encrypt: Some(options.encrypt.unwrap_or(template.is_encrypted())),
        })
    }

    fn run_pack(&self, request: PackRequest, dir: &Path) -> Result<PackedArchive, PadnextError> {
        let packaging = &self.config.packaging;

        tracing::info!(stage = "build_model");
        let issues = validate_batch(&request.batch);
        if !issues.is_empty() {
            return Err(PadnextError::ModelConstraint(issues));
        }
        if request.transfer_number == 0 || request.transfer_number > MAX_TRANSFER_NUMBER {
            return Err(PadnextError::Numbering(format!(
                "transfer number {} is outside 1..={MAX_TRANSFER_NUMBER}",
                request.transfer_number
            )));
        }
        let customer_number = request.sender.logical.customer_number.ok_or_else(|| {
            PadnextError::Builder("sender has no customer number (kundennr)".into())
        })?;
        let name = BatchName::new(
            customer_number,
            request.created_at.date(),
            MessageKind::Delivery,
            request.transfer_number,
        );

        let (encryption, public_key) = if request.encrypt.unwrap_or(packaging.encrypt) {
            let id = self.keys.certificate_id();
            if id.trim().is_empty() || id == "0" {
                return Err(CryptoError::MissingCertificate.into());
            }
            (EncryptionDescriptor::pkcs7(id), Some(self.keys.public_key(id)?))
        } else {
            (EncryptionDescriptor::none(), None)
        };

        tracing::info!(stage = "serialize", invoices = request.batch.invoices.len());
        let payload_bytes = xml::serialize(&request.batch)?;
        schema::check_payload(&payload_bytes, packaging.payload_validation)?;
        let draft = dir.join("payload.xml");
        fs::write(&draft, &payload_bytes)?;
        let payload = canonicalize_payload_name(&draft, &name)?;

        let mut files = vec![payload];
        for attachment in &request.attachments {
            files.push(copy_attachment(attachment, dir, &name)?);
        }

        tracing::info!(stage = "checksum_files", files = files.len());
        let entries = build_manifest_entries(&files, request.created_at)?;

        tracing::info!(stage = "compress_files");
        let inner = dir.join(name.inner_archive());
        compress_files(&files, &inner)?;

        let inner = match public_key {
            Some(key) => {
                tracing::info!(stage = "encrypt_payload", certificate_id = %encryption.certificate_id);
                let sealed = dir.join(name.encrypted_inner_archive());
                encrypt_file(&inner, &sealed, key)?;
                sealed
            }
            None => {
                tracing::info!(stage = "skip_encryption");
                inner
            }
        };

        tracing::info!(stage = "write_manifest");
        let manifest = OrderManifestBuilder::new(request.sender, request.receiver, request.created_at)
            .message_type(MessageKind::Delivery, packaging.message_version.as_str())
            .system(self.config.system_info())
            .encryption(encryption)
            .receipt(packaging.request_receipt, packaging.receipt_email.as_deref())
            .files(entries)
            .transfer_number(request.transfer_number)
            .real_data(packaging.real_data)
            .build()?;
        let manifest_bytes = xml::serialize(&manifest)?;
        schema::check(&manifest_bytes, SchemaId::Manifest)?;
        let manifest_path = dir.join(name.manifest_file());
        fs::write(&manifest_path, &manifest_bytes)?;

        tracing::info!(stage = "assemble_archive");
        fs::create_dir_all(&request.output_dir)?;
        let archive_tmp = temp_in(&request.output_dir)?;
        compress_files(&[manifest_path, inner], archive_tmp.path())?;
        let mut payload_tmp = temp_in(&request.output_dir)?;
        payload_tmp.write_all(&payload_bytes)?;
        payload_tmp.flush()?;

        let archive = request.output_dir.join(name.transfer_archive());
        let payload = request.output_dir.join(name.payload_file());
        archive_tmp
            .persist(&archive)
            .map_err(|e| PadnextError::Io(format!("{}: {}", archive.display(), e.error)))?;
        if let Err(e) = payload_tmp.persist(&payload) {
            // No archive without its payload copy.
            let _ = fs::remove_file(&archive);
            return Err(PadnextError::Io(format!("{}: {}", payload.display(), e.error)));
        }

        Ok(PackedArchive {
            name,
            archive,
            payload,
            manifest,
        })
    }
}

fn temp_in(dir: &Path) -> Result<tempfile::NamedTempFile, PadnextError> {
    Ok(tempfile::Builder::new()
        .prefix(".padnext-")
        .suffix(".part")
        .tempfile_in(dir)?)
}

fn copy_attachment(source: &Path, dir: &Path, name: &BatchName) -> Result<PathBuf, PadnextError> {
    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PadnextError::Builder(format!("invalid attachment path {}", source.display())))?;
    if file_name == name.payload_file() || file_name == name.manifest_file() {
        return Err(PadnextError::Builder(format!(
            "attachment '{file_name}' collides with a transfer file name"
        )));
    }
    let target = dir.join(file_name);
    if target.exists() {
        return Err(PadnextError::Builder(format!(
            "attachment '{file_name}' is given twice"
        )));
    }
    fs::copy(source, &target).map_err(|e| match e.kind() {
        ErrorKind::NotFound => PadnextError::from(FileSetError::MissingFile {
            name: file_name.to_string(),
        }),
        _ => PadnextError::Io(format!("{}: {e}", source.display())),
    })?;
    Ok(target)
}

fn first_item_date(batch: &InvoiceBatch) -> Option<NaiveDate> {
    batch
        .invoices
        .first()?
        .cases
        .first()?
        .items()
        .iter()
        .find_map(|item| item.position().map(|p| p.date))
}
