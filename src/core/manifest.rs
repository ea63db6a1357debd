use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// `auftrag`: the order manifest (`*_auf.xml`) describing a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderManifest {
    /// `empfaenger`
    pub receiver: Participant,
    /// `absender`
    pub sender: Participant,
    /// `nachrichtentyp @version`
    pub message_type: MessageType,
    /// `system`: the sending software.
    pub system: SystemInfo,
    /// `verschluesselung`
    pub encryption: EncryptionDescriptor,
    /// `empfangsquittung`
    pub receipt: ReceiptRequest,
    /// `datei` entries (1..9999).
    pub files: Vec<FileEntry>,
    /// `@erstellungsdatum`
    pub created_at: NaiveDateTime,
    /// `@transfernr` (max 6 digits).
    pub transfer_number: u32,
    /// `@echtdaten`: false for test transfers.
    pub real_data: bool,
    /// `@dateianzahl`: must equal `files.len()`.
    pub file_count: u32,
}

impl OrderManifest {
    pub fn is_encrypted(&self) -> bool {
        self.encryption.procedure == EncryptionProcedure::Pkcs7
    }

    pub fn file(&self, name: &str) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.name == name)
    }
}

/// Logical and physical address of a sender or receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// `logisch`: the party on whose behalf data is exchanged.
    pub logical: ParticipantId,
    /// `physikalisch`: the party technically transmitting the data.
    pub physical: ParticipantId,
}

impl Participant {
    /// Same id for the logical and the physical role.
    pub fn same(id: ParticipantId) -> Self {
        Self {
            logical: id.clone(),
            physical: id,
        }
    }
}

/// `TeilnehmerTyp` value with its optional numeric identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantId {
    /// Display name (1..40 characters).
    pub name: String,
    /// `@kundennr` (max 20 digits).
    pub customer_number: Option<u64>,
    /// `@rzid`: billing-service id (max 4 digits).
    pub rz_id: Option<u16>,
    /// `@iknr` (max 9 digits).
    pub ik_number: Option<u32>,
}

impl ParticipantId {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            customer_number: None,
            rz_id: None,
            ik_number: None,
        }
    }

    pub fn customer_number(mut self, number: u64) -> Self {
        self.customer_number = Some(number);
        self
    }

    pub fn rz_id(mut self, id: u16) -> Self {
        self.rz_id = Some(id);
        self
    }

    pub fn ik_number(mut self, number: u32) -> Self {
        self.ik_number = Some(number);
        self
    }
}

/// `nachrichtentyp` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// `ADL`: invoice delivery.
    Delivery,
    /// `QADL`: receipt for an invoice delivery.
    Receipt,
}

impl MessageKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Delivery => "ADL",
            Self::Receipt => "QADL",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ADL" => Some(Self::Delivery),
            "QADL" => Some(Self::Receipt),
            _ => None,
        }
    }
}

/// `nachrichtentyp` with its format version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageType {
    pub kind: MessageKind,
    /// `@version` (max 5 characters), e.g. "2.12".
    pub version: String,
}

/// `system`: product information of the sending software.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// `produkt` (max 40).
    pub product: String,
    /// `version` (max 20).
    pub version: String,
    /// `hersteller` (max 40).
    pub manufacturer: String,
    /// `zertifizierungsnr` (max 20).
    pub certification_number: Option<String>,
}

/// `@verfahren`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncryptionProcedure {
    /// `0`: payload archive is stored in the clear.
    None,
    /// `1`: payload archive is hybrid-encrypted (`.p7m`).
    Pkcs7,
}

impl EncryptionProcedure {
    pub fn code(&self) -> &'static str {
        match self {
            Self::None => "0",
            Self::Pkcs7 => "1",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Self::None),
            "1" => Some(Self::Pkcs7),
            _ => None,
        }
    }
}

/// `verschluesselung`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionDescriptor {
    pub procedure: EncryptionProcedure,
    /// `@idcert` (max 128). `"0"` when unencrypted.
    pub certificate_id: String,
}

impl EncryptionDescriptor {
    pub fn none() -> Self {
        Self {
            procedure: EncryptionProcedure::None,
            certificate_id: "0".into(),
        }
    }

    pub fn pkcs7(certificate_id: impl Into<String>) -> Self {
        Self {
            procedure: EncryptionProcedure::Pkcs7,
            certificate_id: certificate_id.into(),
        }
    }
}

/// `empfangsquittung`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptRequest {
    pub requested: bool,
    /// `@email` (max 100).
    pub email: Option<String>,
}

/// `dokumententyp` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    PadNext,
    Pad,
    Attachment,
    PadDent,
}

impl DocumentType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::PadNext => "PADneXt",
            Self::Pad => "PAD",
            Self::Attachment => "Anhang",
            Self::PadDent => "PADdent",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PADneXt" => Some(Self::PadNext),
            "PAD" => Some(Self::Pad),
            "Anhang" => Some(Self::Attachment),
            "PADdent" => Some(Self::PadDent),
            _ => None,
        }
    }
}

/// `dokumententyp @format`: attachment format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentFormat {
    Pdf,
    Jpeg,
    Tiff,
}

impl AttachmentFormat {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Jpeg => "jpeg",
            Self::Tiff => "tiff",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pdf" => Some(Self::Pdf),
            "jpeg" => Some(Self::Jpeg),
            "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Guess the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }
}

/// `datei`: one file of the payload, with integrity data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub document_type: DocumentType,
    pub format: Option<AttachmentFormat>,
    /// `name`: bare file name (1..40 characters, no directories).
    pub name: String,
    /// `beschreibung` (max 60).
    pub description: Option<String>,
    /// `dateilaenge @laenge`: byte length.
    pub length: u64,
    /// `dateilaenge @pruefsumme`: 40 lowercase hex characters of SHA-1.
    pub checksum: String,
    /// `@id` (max 40).
    pub id: Option<String>,
    /// `@erstellungsdatum`
    pub created_at: Option<NaiveDateTime>,
}
