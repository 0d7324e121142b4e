//! Dataset Module - Tabular data handles
//!
//! In-memory datasets whose cells are either values or the suppression
//! sentinel, plus `;`-delimited CSV import/export.
//!
//! Anonymized outputs produced by an engine are exposed through the same
//! `DataHandle` trait as the untransformed input.

pub mod cell;
pub mod handle;
pub mod loader;

#[cfg(test)]
mod tests;

pub use cell::Cell;
pub use handle::{DataHandle, Dataset, FrequencyDistribution};
pub use loader::{load_csv, read_csv, write_csv, CsvOptions};
