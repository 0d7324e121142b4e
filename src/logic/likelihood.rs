//! Posterior likelihoods of an anonymized dataset
//!
//! A snapshot of every column's frequency distribution, used to estimate
//! how likely a suppressed cell is to hide one of a predicate's targets.

use std::collections::HashMap;

use crate::logic::dataset::{Cell, DataHandle};
use crate::logic::query::Predicate;

#[derive(Debug, Clone, Default)]
pub struct LikelihoodTable {
    columns: Vec<HashMap<Cell, f64>>,
}

impl LikelihoodTable {
    pub fn from_handle(handle: &impl DataHandle) -> Self {
        let columns = (0..handle.num_columns())
            .map(|column| {
                handle
                    .frequency_distribution(column)
                    .iter()
                    .map(|(value, frequency)| (value.clone(), frequency))
                    .collect()
            })
            .collect();
        Self { columns }
    }

    /// Frequency of `value` in `column`; 0 if never observed
    pub fn frequency(&self, column: usize, value: &Cell) -> f64 {
        self.columns
            .get(column)
            .and_then(|values| values.get(value))
            .copied()
            .unwrap_or(0.0)
    }

    /// Summed frequency of all of the predicate's targets
    pub fn aggregate(&self, column: usize, predicate: &Predicate) -> f64 {
        predicate.targets().map(|t| self.frequency(column, t)).sum()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}
