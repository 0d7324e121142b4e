//! Descriptive statistics over relative errors

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// `|exact - approx| / exact`, with 0 when both are 0 and +inf when only
/// the reference is 0
pub fn relative_error(exact: f64, approx: f64) -> f64 {
    if exact == 0.0 && approx == 0.0 {
        0.0
    } else if exact == 0.0 {
        f64::INFINITY
    } else {
        (exact - approx).abs() / exact
    }
}

/// Sample accumulator owned by a single evaluation run.
///
/// Values are kept in insertion order; order statistics sort a copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Samples {
    values: Vec<f64>,
}

impl Samples {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    /// Combine two runs
    pub fn merge(mut self, other: Samples) -> Samples {
        self.values.extend(other.values);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    /// Percentile `p` in (0, 100].
    ///
    /// Estimated at position `p * (n + 1) / 100` with linear interpolation
    /// between neighbours, clamped to the minimum and maximum.
    pub fn percentile(&self, p: f64) -> Option<f64> {
        if self.values.is_empty() || !(p > 0.0 && p <= 100.0) {
            return None;
        }

        let mut sorted = self.values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let n = sorted.len();
        if n == 1 {
            return Some(sorted[0]);
        }

        let position = p * (n as f64 + 1.0) / 100.0;
        if position < 1.0 {
            return Some(sorted[0]);
        }
        if position >= n as f64 {
            return Some(sorted[n - 1]);
        }

        let floor = position.floor();
        let fraction = position - floor;
        let lower = sorted[floor as usize - 1];
        let upper = sorted[floor as usize];
        // inf - inf would poison the interpolation
        if fraction == 0.0 || lower == upper {
            return Some(lower);
        }
        Some(lower + fraction * (upper - lower))
    }

    pub fn median(&self) -> Option<f64> {
        self.percentile(50.0)
    }
}

impl FromIterator<f64> for Samples {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Extend<f64> for Samples {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        self.values.extend(iter);
    }
}
