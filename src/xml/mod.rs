//! PADnext XML serialization and parsing.
//!
//! Documents are written in the PAD namespace with ISO-8859-15 encoding and
//! read back through a namespace-resolving element tree.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use padnext::core::{Receipt, ReceiptStatus};
//! use padnext::xml;
//!
//! let receipt = Receipt {
//!     received_at: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap().and_hms_opt(8, 0, 0).unwrap(),
//!     status: ReceiptStatus::Accepted,
//!     errors: Vec::new(),
//!     transfer_number: 12,
//!     file_count: 1,
//!     invoice_count: 3,
//! };
//! let bytes = xml::serialize(&receipt).unwrap();
//! assert!(bytes.starts_with(b"<?xml version=\"1.0\" encoding=\"ISO-8859-15\"?>"));
//! let back: Receipt = xml::deserialize(&bytes).unwrap();
//! assert_eq!(receipt, back);
//! ```

mod auftrag;
pub mod charset;
mod quittung;
mod rechnung;
pub mod tree;
pub(crate) mod writer;

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::core::{DocumentKind, PadnextError};
use tree::Element;
use writer::XmlWriter;

/// PADnext namespace URI shared by all three documents.
pub const PAD_NAMESPACE: &str = "http://padinfo.de/ns/pad";

/// A top-level PADnext document with a fixed root element.
pub trait PadDocument: Sized {
    /// Local name of the root element.
    const ROOT: &'static str;
    /// Which document this is, for error reporting.
    const KIND: DocumentKind;

    /// Write the root element and its content.
    fn write_xml(&self, w: &mut XmlWriter) -> Result<(), PadnextError>;

    /// Build the document from a parsed root element.
    fn from_element(root: &Element) -> Result<Self, PadnextError>;
}

/// Serialize a document to ISO-8859-15 XML bytes.
pub fn serialize<T: PadDocument>(doc: &T) -> Result<Vec<u8>, PadnextError> {
    let mut w = XmlWriter::new()?;
    doc.write_xml(&mut w)?;
    w.into_bytes()
}

/// Parse XML bytes (encoding taken from the declaration) into a document.
pub fn deserialize<T: PadDocument>(bytes: &[u8]) -> Result<T, PadnextError> {
    let text = charset::decode(bytes)?;
    let root = tree::parse(&text)?;
    if root.name != T::ROOT {
        return Err(PadnextError::Xml(format!(
            "expected <{}> as {} root, found <{}>",
            T::ROOT,
            T::KIND,
            root.name
        )));
    }
    T::from_element(&root)
}

pub(crate) fn parse_num<T: FromStr>(value: &str, what: &str) -> Result<T, PadnextError> {
    value
        .trim()
        .parse()
        .map_err(|_| PadnextError::Xml(format!("{what}: '{value}' is not a valid number")))
}

pub(crate) fn parse_decimal(value: &str, what: &str) -> Result<Decimal, PadnextError> {
    Decimal::from_str(value.trim())
        .map_err(|e| PadnextError::Xml(format!("{what}: '{value}' is not a decimal: {e}")))
}

pub(crate) fn parse_date(value: &str, what: &str) -> Result<NaiveDate, PadnextError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| PadnextError::Xml(format!("{what}: '{value}' is not a date: {e}")))
}

pub(crate) fn parse_datetime(value: &str, what: &str) -> Result<NaiveDateTime, PadnextError> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| {
            // offsets are accepted and dropped; timestamps are local practice time
            chrono::DateTime::parse_from_rfc3339(value).map(|dt| dt.naive_local())
        })
        .map_err(|e| PadnextError::Xml(format!("{what}: '{value}' is not a date-time: {e}")))
}

pub(crate) fn parse_time(value: &str, what: &str) -> Result<NaiveTime, PadnextError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M:%S%.f")
        .map_err(|e| PadnextError::Xml(format!("{what}: '{value}' is not a time: {e}")))
}

pub(crate) fn parse_bool(value: &str, what: &str) -> Result<bool, PadnextError> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(PadnextError::Xml(format!("{what}: '{other}' is not a boolean"))),
    }
}

pub(crate) fn opt<T>(
    value: Option<&str>,
    parse: impl Fn(&str) -> Result<T, PadnextError>,
) -> Result<Option<T>, PadnextError> {
    value.map(parse).transpose()
}
