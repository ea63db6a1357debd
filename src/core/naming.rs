use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};

use super::error::PadnextError;
use super::manifest::{MessageKind, OrderManifest};

/// Suffix of the order manifest inside the transfer archive.
pub const MANIFEST_SUFFIX: &str = "_auf.xml";
/// Suffix of the invoice payload XML.
pub const PAYLOAD_SUFFIX: &str = "_padx.xml";
/// Suffix of the inner payload archive.
pub const INNER_ARCHIVE_SUFFIX: &str = "_dat_padx.zip";
/// Suffix appended to the inner archive once encrypted.
pub const ENCRYPTED_SUFFIX: &str = ".p7m";
/// Suffix of the outer transfer archive.
pub const TRANSFER_ARCHIVE_SUFFIX: &str = "_padx.zip";

const MAX_TRANSFER_NUMBER: u32 = 999_999;

/// Canonical batch stem: `{customer:08}_{YYYYMMDD}_{messageType}_{transfer:06}`.
///
/// ```
/// use chrono::NaiveDate;
/// use padnext::core::{BatchName, MessageKind};
///
/// let name = BatchName::new(4711, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), MessageKind::Delivery, 12);
/// assert_eq!(name.to_string(), "00004711_20240304_ADL_000012");
/// assert_eq!(name.manifest_file(), "00004711_20240304_ADL_000012_auf.xml");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchName {
    pub customer_number: u64,
    pub date: NaiveDate,
    pub message_type: MessageKind,
    pub transfer_number: u32,
}

impl BatchName {
    pub fn new(
        customer_number: u64,
        date: NaiveDate,
        message_type: MessageKind,
        transfer_number: u32,
    ) -> Self {
        Self {
            customer_number,
            date,
            message_type,
            transfer_number,
        }
    }

    /// Derive the name from a manifest: sender's logical customer number,
    /// creation date, message type and transfer number.
    pub fn from_manifest(manifest: &OrderManifest) -> Result<Self, PadnextError> {
        let customer_number = manifest.sender.logical.customer_number.ok_or_else(|| {
            PadnextError::Builder("sender has no customer number (kundennr)".into())
        })?;
        Ok(Self::new(
            customer_number,
            manifest.created_at.date(),
            manifest.message_type.kind,
            manifest.transfer_number,
        ))
    }

    pub fn manifest_file(&self) -> String {
        format!("{self}{MANIFEST_SUFFIX}")
    }

    pub fn payload_file(&self) -> String {
        format!("{self}{PAYLOAD_SUFFIX}")
    }

    pub fn inner_archive(&self) -> String {
        format!("{self}{INNER_ARCHIVE_SUFFIX}")
    }

    pub fn encrypted_inner_archive(&self) -> String {
        format!("{self}{INNER_ARCHIVE_SUFFIX}{ENCRYPTED_SUFFIX}")
    }

    pub fn transfer_archive(&self) -> String {
        format!("{self}{TRANSFER_ARCHIVE_SUFFIX}")
    }
}

impl fmt::Display for BatchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08}_{:04}{:02}{:02}_{}_{:06}",
            self.customer_number,
            self.date.year(),
            self.date.month(),
            self.date.day(),
            self.message_type.code(),
            self.transfer_number
        )
    }
}

/// Strip the manifest or payload suffix from a file name, leaving the batch stem.
///
/// Names carrying neither suffix are returned without their extension.
pub fn batch_stem(file_name: &str) -> &str {
    for suffix in [MANIFEST_SUFFIX, PAYLOAD_SUFFIX] {
        if let Some(stem) = file_name.strip_suffix(suffix) {
            return stem;
        }
    }
    file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name)
}

/// True if manifest and payload file names refer to the same batch.
pub fn names_match(manifest_file: &str, payload_file: &str) -> bool {
    batch_stem(manifest_file) == batch_stem(payload_file)
}

/// Transfer numbers, counted separately for every receiver.
///
/// Numbers run from 1 to 999999; the sequence refuses to wrap.
#[derive(Debug, Clone, Default)]
pub struct TransferNumberSequence {
    next: BTreeMap<String, u32>,
}

impl TransferNumberSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue a receiver's sequence from a given number.
    pub fn starting_at(mut self, receiver: impl Into<String>, next_number: u32) -> Self {
        self.next.insert(receiver.into(), next_number.max(1));
        self
    }

    /// Issue the next transfer number for a receiver.
    pub fn next_number(&mut self, receiver: &str) -> Result<u32, PadnextError> {
        let number = self.peek(receiver);
        if number > MAX_TRANSFER_NUMBER {
            return Err(PadnextError::Numbering(format!(
                "transfer numbers for '{receiver}' are exhausted"
            )));
        }
        self.next.insert(receiver.to_string(), number + 1);
        Ok(number)
    }

    /// Preview the next number without consuming it.
    pub fn peek(&self, receiver: &str) -> u32 {
        self.next.get(receiver).copied().unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name() -> BatchName {
        BatchName::new(
            123,
            NaiveDate::from_ymd_opt(2025, 1, 9).unwrap(),
            MessageKind::Delivery,
            7,
        )
    }

    #[test]
    fn stem_layout() {
        assert_eq!(name().to_string(), "00000123_20250109_ADL_000007");
        assert_eq!(name().payload_file(), "00000123_20250109_ADL_000007_padx.xml");
        assert_eq!(
            name().encrypted_inner_archive(),
            "00000123_20250109_ADL_000007_dat_padx.zip.p7m"
        );
        assert_eq!(name().transfer_archive(), "00000123_20250109_ADL_000007_padx.zip");
    }

    #[test]
    fn stems_match_across_suffixes() {
        let n = name();
        assert!(names_match(&n.manifest_file(), &n.payload_file()));
        assert!(!names_match(&n.manifest_file(), "00000123_20250109_ADL_000008_padx.xml"));
        assert_eq!(batch_stem("rechnung.xml"), "rechnung");
    }

    #[test]
    fn sequence_per_receiver() {
        let mut seq = TransferNumberSequence::new().starting_at("rz-nord", 41);
        assert_eq!(seq.next_number("rz-nord").unwrap(), 41);
        assert_eq!(seq.next_number("rz-nord").unwrap(), 42);
        assert_eq!(seq.next_number("rz-sued").unwrap(), 1);
        assert_eq!(seq.peek("rz-nord"), 43);
    }

    #[test]
    fn sequence_refuses_to_wrap() {
        let mut seq = TransferNumberSequence::new().starting_at("rz", 999_999);
        assert_eq!(seq.next_number("rz").unwrap(), 999_999);
        assert!(seq.next_number("rz").is_err());
    }
}
