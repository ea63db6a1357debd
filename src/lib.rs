//! # padnext
//!
//! PADnext billing exchange for German medical and dental invoicing: the
//! invoice batch model (`rechnungen`), the order manifest (`auftrag`),
//! delivery receipts, and the checksummed, optionally hybrid-encrypted
//! transfer archives that carry them.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use padnext::core::*;
//! use rust_decimal_macros::dec;
//!
//! let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
//! let item = FeeLineBuilder::new(1, day, FeeCode::new(FeeSchedule::Goae, "1"), "Beratung", 1)
//!     .factor(dec!(2.3))
//!     .unit_price(dec!(10.72))
//!     .build();
//! assert_eq!(item.billed_amount(), Some(dec!(24.66)));
//!
//! let name = BatchName::new(4711, day, MessageKind::Delivery, 3);
//! assert_eq!(name.transfer_archive(), "00004711_20260302_ADL_000003_padx.zip");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Document model, builders, validation, sums, file naming |
//! | `xml` | ISO-8859-15 XML serialization and parsing |
//! | `schema` | Structural validation of manifest, payload and receipt XML |
//! | `envelope` | SHA-1 checksums, hybrid RSA/AES encryption, zip containers, keys |
//! | `packager` | Inbound and outbound transfer pipelines, TOML configuration |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "xml")]
pub mod xml;

#[cfg(feature = "schema")]
pub mod schema;

#[cfg(feature = "envelope")]
pub mod checksum;

#[cfg(feature = "envelope")]
pub mod envelope;

#[cfg(feature = "packager")]
pub mod config;

#[cfg(feature = "packager")]
pub mod packager;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
