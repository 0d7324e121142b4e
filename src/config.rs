//! Configuration module

use std::env;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_DATA_DIR, DEFAULT_DELIMITER, DEFAULT_ITERATIONS, DEFAULT_MAX_ATTRIBUTES,
    DEFAULT_SUPPRESSION_LIMIT, DEFAULT_SUPPRESSION_MARKER,
};

/// Evaluation configuration
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Directory containing `<dataset>.csv` files
    pub data_dir: PathBuf,

    /// CSV field delimiter
    pub delimiter: u8,

    /// Marker string for suppressed cells in output files
    pub suppression_marker: String,

    /// Random queries per attribute subset
    pub iterations: usize,

    /// Seed for query generation (None = entropy)
    pub seed: Option<u64>,

    /// Size of the default attribute universe
    pub max_attributes: usize,

    /// Maximum fraction of suppressed records
    pub suppression_limit: f64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            delimiter: DEFAULT_DELIMITER,
            suppression_marker: DEFAULT_SUPPRESSION_MARKER.to_string(),
            iterations: DEFAULT_ITERATIONS,
            seed: None,
            max_attributes: DEFAULT_MAX_ATTRIBUTES,
            suppression_limit: DEFAULT_SUPPRESSION_LIMIT,
        }
    }
}

impl BenchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: env::var("BENCH_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),

            delimiter: env::var("BENCH_DELIMITER")
                .ok()
                .and_then(|d| d.bytes().next())
                .unwrap_or(defaults.delimiter),

            suppression_marker: env::var("BENCH_SUPPRESSION_MARKER")
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or(defaults.suppression_marker),

            iterations: env::var("BENCH_ITERATIONS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.iterations),

            seed: env::var("BENCH_SEED").ok().and_then(|s| s.parse().ok()),

            max_attributes: env::var("BENCH_MAX_ATTRIBUTES")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.max_attributes),

            suppression_limit: env::var("BENCH_SUPPRESSION_LIMIT")
                .ok()
                .and_then(|l| l.parse().ok())
                .unwrap_or(defaults.suppression_limit),
        }
    }

    /// Resolve a dataset argument: an existing path is used as-is,
    /// anything else is looked up as `<data_dir>/<name>.csv`.
    pub fn resolve_dataset(&self, name: &str) -> PathBuf {
        let direct = Path::new(name);
        if direct.is_file() {
            return direct.to_path_buf();
        }
        self.data_dir.join(format!("{}.csv", name))
    }
}

/// Quasi-identifier orderings of the reference datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetPreset {
    Adult,
    Ihis,
}

impl DatasetPreset {
    pub fn from_name(name: &str) -> Option<Self> {
        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name);
        match stem.to_lowercase().as_str() {
            "adult" => Some(DatasetPreset::Adult),
            "ihis" => Some(DatasetPreset::Ihis),
            _ => None,
        }
    }

    /// All quasi-identifiers, in the order QIs are added during sweeps
    pub fn quasi_identifiers(&self) -> &'static [&'static str] {
        match self {
            DatasetPreset::Adult => &[
                "sex", "age", "race", "marital-status", "education",
                "native-country", "workclass", "occupation", "salary-class",
            ],
            DatasetPreset::Ihis => &[
                "YEAR", "QUARTER", "REGION", "PERNUM", "AGE",
                "MARSTAT", "SEX", "RACEA", "EDUC",
            ],
        }
    }
}
