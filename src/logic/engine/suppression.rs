use std::collections::{HashMap, HashSet};

use crate::error::{BenchError, BenchResult};
use crate::logic::dataset::{Cell, DataHandle, Dataset};
use crate::logic::risk::size_threshold;
use super::{AnonymizationEngine, EngineConfig, PrivacyModel};

/// Suppresses all quasi-identifier cells of records whose equivalence class
/// violates a privacy model. Global models (average risk, records at risk)
/// suppress the smallest retained classes first.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlierSuppressionEngine;

#[derive(Debug)]
struct EquivalenceClass {
    rows: Vec<usize>,
    distinct_sensitive: HashMap<usize, usize>,
    suppressed: bool,
}

struct Partition {
    classes: Vec<EquivalenceClass>,
}

impl Partition {
    fn build(input: &Dataset, qi_columns: &[usize], sensitive_columns: &[usize]) -> Self {
        let mut lookup: HashMap<Vec<&Cell>, usize> = HashMap::new();
        let mut classes: Vec<EquivalenceClass> = Vec::new();
        let mut sensitive_seen: Vec<HashMap<usize, HashSet<&Cell>>> = Vec::new();

        for (index, row) in input.rows().enumerate() {
            let key: Vec<&Cell> = qi_columns.iter().map(|&c| &row[c]).collect();
            let id = *lookup.entry(key).or_insert_with(|| {
                classes.push(EquivalenceClass {
                    rows: Vec::new(),
                    distinct_sensitive: HashMap::new(),
                    suppressed: false,
                });
                sensitive_seen.push(HashMap::new());
                classes.len() - 1
            });
            classes[id].rows.push(index);
            for &s in sensitive_columns {
                sensitive_seen[id].entry(s).or_default().insert(&row[s]);
            }
        }

        for (class, seen) in classes.iter_mut().zip(sensitive_seen) {
            class.distinct_sensitive = seen.into_iter().map(|(c, v)| (c, v.len())).collect();
        }
        Self { classes }
    }

    fn retained_rows(&self) -> usize {
        self.classes.iter().filter(|c| !c.suppressed).map(|c| c.rows.len()).sum()
    }

    fn suppressed_rows(&self) -> usize {
        self.classes.iter().filter(|c| c.suppressed).map(|c| c.rows.len()).sum()
    }

    fn average_risk(&self) -> f64 {
        let retained = self.retained_rows();
        if retained == 0 {
            return 0.0;
        }
        let classes = self.classes.iter().filter(|c| !c.suppressed).count();
        classes as f64 / retained as f64
    }

    fn records_at_risk(&self, k: usize) -> f64 {
        let retained = self.retained_rows();
        if retained == 0 {
            return 0.0;
        }
        let at_risk: usize = self
            .classes
            .iter()
            .filter(|c| !c.suppressed && c.rows.len() < k)
            .map(|c| c.rows.len())
            .sum();
        at_risk as f64 / retained as f64
    }

    /// Suppress the smallest retained class; false if none is left
    fn suppress_smallest(&mut self) -> bool {
        let smallest = self
            .classes
            .iter_mut()
            .filter(|c| !c.suppressed)
            .min_by_key(|c| c.rows.len());
        match smallest {
            Some(class) => {
                class.suppressed = true;
                true
            }
            None => false,
        }
    }

    fn enforce_average_risk(&mut self, threshold: f64) {
        while self.average_risk() > threshold && self.suppress_smallest() {}
    }

    fn enforce_records_at_risk(&mut self, k: usize, records: f64) {
        while self.records_at_risk(k) > records && self.suppress_smallest() {}
    }
}

impl AnonymizationEngine for OutlierSuppressionEngine {
    fn anonymize(&self, input: &Dataset, config: &EngineConfig) -> BenchResult<Dataset> {
        config.validate()?;

        let qi_columns = config
            .quasi_identifiers
            .iter()
            .map(|q| input.column_index(q))
            .collect::<BenchResult<Vec<_>>>()?;

        let mut sensitive_columns = Vec::new();
        for model in &config.privacy_models {
            if let PrivacyModel::DistinctLDiversity { attribute, .. } = model {
                sensitive_columns.push(input.column_index(attribute)?);
            }
        }

        if config.privacy_models.is_empty() || qi_columns.is_empty() || input.num_rows() == 0 {
            log::debug!("Nothing to enforce, returning input unchanged");
            return Ok(input.clone());
        }

        let mut partition = Partition::build(input, &qi_columns, &sensitive_columns);

        // Class-local models first
        for class in partition.classes.iter_mut() {
            for model in &config.privacy_models {
                let violated = match model {
                    PrivacyModel::KAnonymity { k } => class.rows.len() < *k,
                    PrivacyModel::DistinctLDiversity { attribute, l } => {
                        let column = input.column_index(attribute)?;
                        class.distinct_sensitive.get(&column).copied().unwrap_or(0) < *l
                    }
                    _ => false,
                };
                if violated {
                    class.suppressed = true;
                    break;
                }
            }
        }

        for model in &config.privacy_models {
            match model {
                PrivacyModel::AverageRisk { threshold } => partition.enforce_average_risk(*threshold),
                PrivacyModel::RecordsAtRisk { average, highest, records } => {
                    partition.enforce_records_at_risk(size_threshold(*highest), *records);
                    partition.enforce_average_risk(*average);
                }
                _ => {}
            }
        }

        let suppressed = partition.suppressed_rows();
        let fraction = suppressed as f64 / input.num_rows() as f64;
        if fraction > config.suppression_limit {
            return Err(BenchError::NoSolution(format!(
                "{:.2}% of records would be suppressed, limit is {:.2}%",
                fraction * 100.0,
                config.suppression_limit * 100.0
            )));
        }

        let mut rows = input.clone().into_rows();
        for class in partition.classes.iter().filter(|c| c.suppressed) {
            for &r in &class.rows {
                for &c in &qi_columns {
                    rows[r][c] = Cell::Suppressed;
                }
            }
        }

        log::info!(
            "Suppressed {} of {} records ({} of {} classes)",
            suppressed,
            input.num_rows(),
            partition.classes.iter().filter(|c| c.suppressed).count(),
            partition.classes.len()
        );

        Dataset::new(input.columns().to_vec(), rows)
    }
}
