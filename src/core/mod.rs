//! Document model: invoice batch, order manifest and receipt, with validation.
//!
//! All amounts are [`rust_decimal::Decimal`] and are rounded half-up to cents.
//! Line items and billing cases are closed unions; shared fields live in
//! [`PositionCore`] and [`CaseCore`] embedded by value.

mod builder;
mod error;
mod manifest;
pub mod money;
mod naming;
mod receipt;
mod rows;
mod types;
mod validation;

pub use builder::*;
pub use error::*;
pub use manifest::*;
pub use money::{AmountOverflow, compute_sums, recalculate_sums, round2};
pub use naming::*;
pub use receipt::*;
pub use rows::*;
pub use types::*;
pub use validation::*;
