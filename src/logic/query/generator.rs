//! Random Query Generation
//!
//! Queries are drawn against the untransformed input so that every target
//! value exists in the ground truth.
//!
//! Range queries treat positions in the distinct-value list as a proxy for
//! a value range. The list is in first-occurrence order, not the attribute's
//! natural order, so a "range" is a contiguous span of that list only.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult};
use crate::logic::dataset::{Cell, DataHandle};
use super::types::{Predicate, Query};

/// How point-query targets are chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointMode {
    /// Independent uniform draw per attribute from its distinct values
    #[default]
    Draw,
    /// All targets taken from one randomly selected record
    Record,
}

impl FromStr for PointMode {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draw" => Ok(PointMode::Draw),
            "record" => Ok(PointMode::Record),
            other => Err(BenchError::invalid(format!("unknown point mode '{}'", other))),
        }
    }
}

impl fmt::Display for PointMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointMode::Draw => f.write_str("draw"),
            PointMode::Record => f.write_str("record"),
        }
    }
}

pub struct QueryGenerator<'a, H: DataHandle, R: Rng> {
    handle: &'a H,
    rng: R,
}

impl<'a, H: DataHandle, R: Rng> QueryGenerator<'a, H, R> {
    pub fn new(handle: &'a H, rng: R) -> Self {
        Self { handle, rng }
    }

    pub fn into_rng(self) -> R {
        self.rng
    }

    /// One target value per attribute
    pub fn point_query<S: AsRef<str>>(&mut self, attributes: &[S], mode: PointMode) -> BenchResult<Query> {
        let handle = self.handle;
        let columns = self.resolve(attributes)?;
        let mut query = Query::new();

        match mode {
            PointMode::Draw => {
                for column in columns {
                    let mut values: Vec<&Cell> = handle.distinct_values(column).iter().collect();
                    values.shuffle(&mut self.rng);
                    let target = values
                        .first()
                        .ok_or_else(|| empty_column(handle, column))?;
                    query.insert(column, Predicate::single((*target).clone()));
                }
            }
            PointMode::Record => {
                let rows = handle.num_rows();
                if rows == 0 {
                    return Err(BenchError::empty("cannot select a record from an empty dataset"));
                }
                // round(u * rows) reaches `rows` for u close to 1
                let record = self.random_index(rows).min(rows - 1);
                for column in columns {
                    query.insert(column, Predicate::single(handle.value(record, column).clone()));
                }
            }
        }

        Ok(query)
    }

    /// A span of the distinct-value list per attribute
    pub fn range_query<S: AsRef<str>>(&mut self, attributes: &[S]) -> BenchResult<Query> {
        let handle = self.handle;
        let columns = self.resolve(attributes)?;
        let mut query = Query::new();

        for column in columns {
            let values = handle.distinct_values(column);
            if values.is_empty() {
                return Err(empty_column(handle, column));
            }
            let last = values.len() - 1;
            let mut lower = self.random_index(last);
            let mut upper = self.random_index(last);
            if lower > upper {
                std::mem::swap(&mut lower, &mut upper);
            }
            query.insert(column, Predicate::new(values[lower..=upper].iter().cloned())?);
        }

        Ok(query)
    }

    fn resolve<S: AsRef<str>>(&self, attributes: &[S]) -> BenchResult<Vec<usize>> {
        attributes
            .iter()
            .map(|a| self.handle.column_index(a.as_ref()))
            .collect()
    }

    /// `round(u * max)` for a uniform `u` in [0, 1)
    fn random_index(&mut self, max: usize) -> usize {
        let u: f64 = self.rng.gen();
        ((u * max as f64).round() as usize).min(max)
    }
}

fn empty_column(handle: &impl DataHandle, column: usize) -> BenchError {
    BenchError::empty(format!(
        "column '{}' has no values",
        handle.attribute_name(column).unwrap_or("?")
    ))
}
