use thiserror::Error;

/// Errors that can occur while building, validating or transporting a PADnext batch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PadnextError {
    /// Serialized bytes do not conform to the document schema.
    #[error("{document} failed schema validation: {}", join_errors(.issues))]
    SchemaViolation {
        document: DocumentKind,
        issues: Vec<ValidationError>,
    },

    /// In-memory model violates a field, cross-reference or sum constraint.
    #[error("model constraints violated: {}", join_errors(.0))]
    ModelConstraint(Vec<ValidationError>),

    /// The files on disk disagree with the order manifest.
    #[error("file set mismatch: {0}")]
    FileSet(#[from] FileSetError),

    /// Encryption, decryption or key handling failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Builder encountered invalid or missing configuration.
    #[error("builder error: {0}")]
    Builder(String),

    /// Transfer number sequencing error.
    #[error("numbering error: {0}")]
    Numbering(String),

    /// XML generation or parsing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// Zip container could not be read or written.
    #[error("archive error: {0}")]
    Archive(String),

    /// Configuration file could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for PadnextError {
    fn from(e: std::io::Error) -> Self {
        PadnextError::Io(e.to_string())
    }
}

impl PadnextError {
    /// Validation failures can be fixed by the caller and retried.
    /// Everything else aborts the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            PadnextError::SchemaViolation { .. } | PadnextError::ModelConstraint(_)
        )
    }

    /// Text that is safe to show an operator. Crypto and I/O details stay in the log.
    pub fn public_message(&self) -> String {
        match self {
            PadnextError::Crypto(CryptoError::UnsupportedProcedure(code)) => {
                format!("unsupported encryption procedure '{code}'")
            }
            PadnextError::Crypto(_) => "the transfer archive could not be decrypted".into(),
            PadnextError::Io(_) | PadnextError::Archive(_) => {
                "the transfer archive could not be read or written".into()
            }
            other => other.to_string(),
        }
    }

    /// Validation issues carried by this error, if any.
    pub fn issues(&self) -> &[ValidationError] {
        match self {
            PadnextError::SchemaViolation { issues, .. } => issues,
            PadnextError::ModelConstraint(issues) => issues,
            _ => &[],
        }
    }
}

/// Mismatch between an order manifest and the files actually delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FileSetError {
    /// A file listed in the manifest is not present in the payload.
    #[error("file '{name}' is listed in the manifest but missing from the payload")]
    MissingFile { name: String },

    /// The declared file count differs from the number of entries.
    #[error("manifest declares {declared} files but lists {actual}")]
    CountMismatch { declared: u32, actual: usize },

    /// Manifest and payload file names do not share the same batch stem.
    #[error("manifest '{manifest}' does not match payload '{payload}'")]
    NameMismatch { manifest: String, payload: String },

    /// Content hash differs from the manifest entry.
    #[error("checksum of '{name}' is {actual}, manifest says {expected}")]
    ChecksumMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// Byte length differs from the manifest entry.
    #[error("length of '{name}' is {actual}, manifest says {expected}")]
    LengthMismatch {
        name: String,
        expected: u64,
        actual: u64,
    },

    /// A mandatory member of the transfer archive is absent.
    #[error("archive has no '*{suffix}' entry")]
    MissingEntry { suffix: String },
}

/// Hybrid-encryption failures. Messages never contain key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CryptoError {
    /// The key length prefix is missing or points beyond the input.
    #[error("malformed key length prefix: declared {declared} bytes, {available} available")]
    MalformedLengthPrefix { declared: usize, available: usize },

    /// The wrapped content key could not be unwrapped with the private key.
    #[error("content key could not be unwrapped")]
    KeyUnwrap,

    /// Input ends before the initialization vector is complete.
    #[error("ciphertext truncated before the initialization vector")]
    Truncated,

    /// The manifest names an encryption procedure other than 0 or 1.
    #[error("unsupported encryption procedure '{0}'")]
    UnsupportedProcedure(String),

    /// Procedure 1 was requested without a certificate id.
    #[error("encryption requested but no certificate id is set")]
    MissingCertificate,

    /// No usable key for the given certificate id.
    #[error("no key available for certificate '{0}'")]
    KeyUnavailable(String),

    /// Encryption of the payload failed.
    #[error("encryption failed: {0}")]
    Encrypt(String),
}

/// Which of the three XML documents a validation result refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// `*_auf.xml` order manifest.
    Manifest,
    /// `*_padx.xml` invoice batch.
    Payload,
    /// Delivery receipt (`QADL`).
    Receipt,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Manifest => f.write_str("order manifest"),
            DocumentKind::Payload => f.write_str("invoice payload"),
            DocumentKind::Receipt => f.write_str("receipt"),
        }
    }
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "invoices[0].cases[1].items[3].total").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Rule identifier if applicable (e.g. "max-length", "sum-reconciliation").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without a rule ID.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error with a rule ID.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_and_without_rule() {
        let plain = ValidationError::new("issuer.name", "must not be empty");
        assert_eq!(plain.to_string(), "issuer.name: must not be empty");

        let ruled = ValidationError::with_rule("files", "too many", "max-occurs");
        assert_eq!(ruled.to_string(), "[max-occurs] files: too many");
    }

    #[test]
    fn validation_failures_are_recoverable() {
        let err = PadnextError::ModelConstraint(vec![ValidationError::new("a", "b")]);
        assert!(!err.is_fatal());
        assert_eq!(err.issues().len(), 1);

        let err = PadnextError::from(FileSetError::MissingFile { name: "x.pdf".into() });
        assert!(err.is_fatal());
        assert!(err.issues().is_empty());
    }

    #[test]
    fn public_message_hides_crypto_detail() {
        let err = PadnextError::from(CryptoError::MalformedLengthPrefix {
            declared: 70000,
            available: 12,
        });
        assert_eq!(err.public_message(), "the transfer archive could not be decrypted");
        assert!(err.to_string().contains("70000"));

        let err = PadnextError::from(CryptoError::UnsupportedProcedure("7".into()));
        assert!(err.public_message().contains("'7'"));
    }
}
