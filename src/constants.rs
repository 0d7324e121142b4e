//! Central Configuration Constants
//!
//! Single source of truth for all evaluation defaults.
//! `BenchConfig::from_env` falls back to these values.

/// Default directory holding `<dataset>.csv` files
pub const DEFAULT_DATA_DIR: &str = "./data/";

/// Default CSV field delimiter
pub const DEFAULT_DELIMITER: u8 = b';';

/// Text representation of a suppressed cell in dataset files
pub const DEFAULT_SUPPRESSION_MARKER: &str = "*";

/// Random queries per attribute subset and query type
pub const DEFAULT_ITERATIONS: usize = 1000;

/// Percentile reported for relative errors (median)
pub const DEFAULT_PERCENTILE: f64 = 50.0;

/// Number of leading input columns used as the query attribute universe
pub const DEFAULT_MAX_ATTRIBUTES: usize = 8;

/// Maximum fraction of suppressed records the engine may produce
pub const DEFAULT_SUPPRESSION_LIMIT: f64 = 0.99;

/// Steepness of the sigmoid that weights partial matches
pub const SIGMOID_STEEPNESS: f64 = 5.0;

/// Relative tolerance used when rounding a risk threshold to a class size
pub const RISK_ROUNDING_TOLERANCE: f64 = 0.01;

/// Risk thresholds are evaluated at `1 / i` for these `i`
pub const FRONTIER_DENOMINATORS: [u32; 18] =
    [2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 20, 25, 50, 100];

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "suppression-bench";
