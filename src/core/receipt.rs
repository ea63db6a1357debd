use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::error::PadnextError;
use super::manifest::OrderManifest;
use super::types::InvoiceBatch;

/// `status` of a processed delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptStatus {
    Accepted,
    Rejected,
}

impl ReceiptStatus {
    pub fn code(&self) -> u8 {
        match self {
            Self::Accepted => 0,
            Self::Rejected => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Accepted),
            1 => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// `fehler`: a problem reported back to the sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptError {
    pub code: u32,
    pub text: String,
    pub hint: Option<String>,
}

/// `quittung`: acknowledgement (`QADL`) of an invoice delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// `eingangsdatum`
    pub received_at: NaiveDateTime,
    pub status: ReceiptStatus,
    pub errors: Vec<ReceiptError>,
    /// `@datenlieferung`: transfer number being acknowledged.
    pub transfer_number: u32,
    /// `@dateianzahl`
    pub file_count: u32,
    /// `@rechnungsanzahl`
    pub invoice_count: u32,
}

/// Error codes reported in receipts.
pub mod codes {
    pub const SCHEMA: u32 = 100;
    pub const MODEL: u32 = 110;
    pub const FILE_SET: u32 = 200;
    pub const CRYPTO: u32 = 300;
    pub const OTHER: u32 = 900;
}

impl Receipt {
    /// Acknowledge a delivery that unpacked and validated cleanly.
    pub fn accepted(manifest: &OrderManifest, batch: &InvoiceBatch, received_at: NaiveDateTime) -> Self {
        Self {
            received_at,
            status: ReceiptStatus::Accepted,
            errors: Vec::new(),
            transfer_number: manifest.transfer_number,
            file_count: manifest.file_count,
            invoice_count: batch.invoices.len() as u32,
        }
    }

    /// Reject a delivery. Only operator-safe text is placed in the receipt.
    pub fn rejected(manifest: &OrderManifest, error: &PadnextError, received_at: NaiveDateTime) -> Self {
        let code = match error {
            PadnextError::SchemaViolation { .. } => codes::SCHEMA,
            PadnextError::ModelConstraint(_) => codes::MODEL,
            PadnextError::FileSet(_) => codes::FILE_SET,
            PadnextError::Crypto(_) => codes::CRYPTO,
            _ => codes::OTHER,
        };
        let hint = error.issues().first().map(|issue| issue.field.clone());
        Self {
            received_at,
            status: ReceiptStatus::Rejected,
            errors: vec![ReceiptError {
                code,
                text: error.public_message(),
                hint,
            }],
            transfer_number: manifest.transfer_number,
            file_count: manifest.file_count,
            invoice_count: 0,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == ReceiptStatus::Accepted
    }
}
