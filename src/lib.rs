//! Suppression Bench
//!
//! Measures how much analytical utility survives cell suppression: risk
//! thresholds as class sizes, suppressed-cell utility, random count queries
//! answered on anonymized data, and risk-utility trade-off curves.

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod logic;

pub use error::{BenchError, BenchResult};
