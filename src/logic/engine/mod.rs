//! Engine Module - Anonymization engine seam
//!
//! The analytical layer only needs a transformed dataset. Whatever produces
//! it (generalization search, iterative cell suppression, a file written by
//! another tool) sits behind `AnonymizationEngine`.
//!
//! `OutlierSuppressionEngine` is the reference implementation used by the
//! CLI: it suppresses the quasi-identifiers of every record in an
//! equivalence class that violates the configured privacy models.

pub mod suppression;


use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SUPPRESSION_LIMIT;
use crate::error::{BenchError, BenchResult};
use crate::logic::dataset::{Cell, DataHandle, Dataset};
use crate::logic::risk::Risks;

pub use suppression::OutlierSuppressionEngine;

// ============================================================================
// PRIVACY MODELS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum PrivacyModel {
    /// Average reidentification risk over all retained records
    AverageRisk { threshold: f64 },

    /// Every equivalence class has at least `k` records
    KAnonymity { k: usize },

    /// Every equivalence class has at least `l` distinct sensitive values
    DistinctLDiversity { attribute: String, l: usize },

    /// At most `records` of the retained records may exceed `highest`,
    /// and the average risk stays below `average`
    RecordsAtRisk { average: f64, highest: f64, records: f64 },
}

// ============================================================================
// ENGINE CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub quasi_identifiers: Vec<String>,
    pub privacy_models: Vec<PrivacyModel>,
    /// Maximum fraction of records that may be suppressed
    pub suppression_limit: f64,
}

impl EngineConfig {
    pub fn new<S: AsRef<str>>(quasi_identifiers: &[S]) -> Self {
        Self {
            quasi_identifiers: quasi_identifiers.iter().map(|q| q.as_ref().to_string()).collect(),
            privacy_models: Vec::new(),
            suppression_limit: DEFAULT_SUPPRESSION_LIMIT,
        }
    }

    pub fn from_risks<S: AsRef<str>>(quasi_identifiers: &[S], risks: &Risks) -> Self {
        Self {
            privacy_models: risks.privacy_models(),
            ..Self::new(quasi_identifiers)
        }
    }

    pub fn with_model(mut self, model: PrivacyModel) -> Self {
        self.privacy_models.push(model);
        self
    }

    pub fn with_suppression_limit(mut self, limit: f64) -> Self {
        self.suppression_limit = limit;
        self
    }

    pub fn validate(&self) -> BenchResult<()> {
        if !(0.0..=1.0).contains(&self.suppression_limit) {
            return Err(BenchError::invalid(format!(
                "suppression limit must be in [0, 1], got {}",
                self.suppression_limit
            )));
        }
        for model in &self.privacy_models {
            match model {
                PrivacyModel::KAnonymity { k: 0 } | PrivacyModel::DistinctLDiversity { l: 0, .. } => {
                    return Err(BenchError::invalid(format!("degenerate privacy model {:?}", model)));
                }
                PrivacyModel::AverageRisk { threshold } if *threshold <= 0.0 => {
                    return Err(BenchError::invalid(format!("degenerate privacy model {:?}", model)));
                }
                PrivacyModel::RecordsAtRisk { highest, .. } if *highest <= 0.0 => {
                    return Err(BenchError::invalid(format!("degenerate privacy model {:?}", model)));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Produces an anonymized copy of a dataset
pub trait AnonymizationEngine {
    fn anonymize(&self, input: &Dataset, config: &EngineConfig) -> BenchResult<Dataset>;
}

// ============================================================================
// RISK MEASUREMENT
// ============================================================================

/// Average prosecutor risk: number of equivalence classes over records.
///
/// Suppressed cells group like any other value.
pub fn average_risk<S: AsRef<str>>(handle: &impl DataHandle, quasi_identifiers: &[S]) -> BenchResult<f64> {
    let columns = quasi_identifiers
        .iter()
        .map(|q| handle.column_index(q.as_ref()))
        .collect::<BenchResult<Vec<_>>>()?;
    if handle.num_rows() == 0 {
        return Err(BenchError::empty("cannot measure risk of an empty dataset"));
    }

    let mut classes: HashMap<Vec<&Cell>, usize> = HashMap::new();
    for row in handle.rows() {
        let key = columns.iter().map(|&c| &row[c]).collect();
        *classes.entry(key).or_insert(0) += 1;
    }
    Ok(classes.len() as f64 / handle.num_rows() as f64)
}
