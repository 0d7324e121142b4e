//! Risk thresholds and the privacy models derived from them

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::RISK_ROUNDING_TOLERANCE;
use crate::error::{BenchError, BenchResult};
use crate::logic::engine::PrivacyModel;

/// Minimal equivalence-class size keeping the per-record risk at or below
/// `risk_threshold`.
///
/// Precondition: `0 < risk_threshold <= 1`. A threshold of zero has no
/// finite class size; validate with [`Risks::new`] first.
pub fn size_threshold(risk_threshold: f64) -> usize {
    debug_assert!(
        risk_threshold > 0.0 && risk_threshold <= 1.0,
        "risk threshold out of range: {}",
        risk_threshold
    );
    let size = 1.0 / risk_threshold;
    let mut floor = size.trunc();
    // 1/floor overshoots the threshold by more than rounding noise
    if (1.0 / floor) - (1.0 / size) >= RISK_ROUNDING_TOLERANCE * risk_threshold {
        floor += 1.0;
    }
    floor as usize
}

/// Thresholds for average risk, highest risk and records at risk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Risks {
    average_risk: f64,
    highest_risk: f64,
    records_at_risk: f64,
}

impl Risks {
    pub fn new(average_risk: f64, highest_risk: f64, records_at_risk: f64) -> BenchResult<Self> {
        check_threshold("average risk", average_risk)?;
        check_threshold("highest risk", highest_risk)?;
        if !(0.0..=1.0).contains(&records_at_risk) {
            return Err(BenchError::invalid(format!(
                "records at risk must be in [0, 1], got {}",
                records_at_risk
            )));
        }
        Ok(Self {
            average_risk,
            highest_risk,
            records_at_risk,
        })
    }

    pub fn average_risk(&self) -> f64 {
        self.average_risk
    }

    pub fn highest_risk(&self) -> f64 {
        self.highest_risk
    }

    pub fn records_at_risk(&self) -> f64 {
        self.records_at_risk
    }

    /// Privacy models enforcing these thresholds.
    ///
    /// Without a records-at-risk budget the highest risk becomes a
    /// k-anonymity requirement; trivial models (average risk 1, k = 1) are
    /// left out.
    pub fn privacy_models(&self) -> Vec<PrivacyModel> {
        let mut models = Vec::new();
        if self.records_at_risk == 0.0 {
            if self.average_risk != 1.0 {
                models.push(PrivacyModel::AverageRisk {
                    threshold: self.average_risk,
                });
            }
            let k = size_threshold(self.highest_risk);
            if k != 1 {
                models.push(PrivacyModel::KAnonymity { k });
            }
        } else {
            models.push(PrivacyModel::RecordsAtRisk {
                average: self.average_risk,
                highest: self.highest_risk,
                records: self.records_at_risk,
            });
        }
        models
    }
}

impl fmt::Display for Risks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Risks [averageRisk={}, highestRisk={}, recordsAtRisk={}]",
            self.average_risk, self.highest_risk, self.records_at_risk
        )
    }
}

fn check_threshold(name: &str, value: f64) -> BenchResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(BenchError::invalid(format!("{} must be in (0, 1], got {}", name, value)))
    }
}
