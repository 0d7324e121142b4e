//! Cube Evaluation - accuracy of count estimates on anonymized data
//!
//! For every non-empty subset of the attribute universe, random point and
//! range queries are answered exactly on the input and estimated on the
//! output. Relative errors are summarized by a percentile; information
//! loss is averaged over the same subsets.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::BenchConfig;
use crate::constants::{DEFAULT_ITERATIONS, DEFAULT_MAX_ATTRIBUTES, DEFAULT_PERCENTILE};
use crate::error::{BenchError, BenchResult};
use crate::logic::dataset::DataHandle;
use crate::logic::estimator::{count, exact_count};
use crate::logic::likelihood::LikelihoodTable;
use crate::logic::powerset::power_set;
use crate::logic::query::{PointMode, QueryGenerator};
use crate::logic::stats::{relative_error, Samples};
use crate::logic::utility::information_loss;

/// How point queries are answered on the output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointEstimation {
    /// Suppressed cells contribute through the likelihood table
    #[default]
    Likelihood,
    /// Suppressed cells never match
    Exact,
}

impl FromStr for PointEstimation {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "likelihood" => Ok(PointEstimation::Likelihood),
            "exact" => Ok(PointEstimation::Exact),
            other => Err(BenchError::invalid(format!("unknown point estimation '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeSettings {
    /// Attribute universe; empty means the first `max_attributes` columns
    pub attributes: Vec<String>,
    pub max_attributes: usize,
    /// Queries of each type per attribute subset
    pub iterations: usize,
    pub percentile: f64,
    pub point_mode: PointMode,
    pub point_estimation: PointEstimation,
}

impl Default for CubeSettings {
    fn default() -> Self {
        Self {
            attributes: Vec::new(),
            max_attributes: DEFAULT_MAX_ATTRIBUTES,
            iterations: DEFAULT_ITERATIONS,
            percentile: DEFAULT_PERCENTILE,
            point_mode: PointMode::default(),
            point_estimation: PointEstimation::default(),
        }
    }
}

impl CubeSettings {
    pub fn from_config(config: &BenchConfig) -> Self {
        Self {
            max_attributes: config.max_attributes,
            iterations: config.iterations,
            ..Self::default()
        }
    }

    fn validate(&self) -> BenchResult<()> {
        if self.iterations == 0 {
            return Err(BenchError::invalid("iterations must be positive"));
        }
        if !(self.percentile > 0.0 && self.percentile <= 100.0) {
            return Err(BenchError::invalid(format!(
                "percentile must be in (0, 100], got {}",
                self.percentile
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CubeReport {
    pub generated_at: DateTime<Utc>,
    pub attributes: Vec<String>,
    pub subsets: usize,
    pub queries_per_subset: usize,
    pub point_mode: PointMode,
    pub point_estimation: PointEstimation,
    pub percentile: f64,
    /// Mean information loss (1 - granularity) over all subsets
    pub information_loss: f64,
    /// Relative-error percentile of point queries (+inf serializes as null)
    pub point_error: f64,
    pub range_error: f64,
    #[serde(skip)]
    pub point_errors: Samples,
    #[serde(skip)]
    pub range_errors: Samples,
}

impl fmt::Display for CubeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " - Final results")?;
        writeln!(f, " - LM: {}", self.information_loss)?;
        writeln!(
            f,
            " - P{} relative error (point queries): {}",
            self.percentile, self.point_error
        )?;
        write!(
            f,
            " - P{} relative error (range queries): {}",
            self.percentile, self.range_error
        )
    }
}

/// Run the accuracy experiment.
///
/// `input` is the ground truth, `output` its anonymized counterpart with
/// the same columns. All queries are drawn from `input` with `rng`.
pub fn evaluate_cube<I, O, R>(input: &I, output: &O, settings: &CubeSettings, rng: R) -> BenchResult<CubeReport>
where
    I: DataHandle,
    O: DataHandle,
    R: Rng,
{
    settings.validate()?;

    if input.attribute_names() != output.attribute_names() {
        return Err(BenchError::invalid("input and output have different columns"));
    }
    if input.num_rows() == 0 {
        return Err(BenchError::empty("input dataset has no rows"));
    }

    let attributes: Vec<String> = if settings.attributes.is_empty() {
        input
            .attribute_names()
            .into_iter()
            .take(settings.max_attributes)
            .map(String::from)
            .collect()
    } else {
        settings.attributes.clone()
    };
    let columns = attributes
        .iter()
        .map(|a| input.column_index(a))
        .collect::<BenchResult<Vec<_>>>()?;
    if attributes.is_empty() {
        return Err(BenchError::empty("no attributes to query"));
    }

    let likelihoods = LikelihoodTable::from_handle(output);
    let point_likelihoods = match settings.point_estimation {
        PointEstimation::Likelihood => Some(&likelihoods),
        PointEstimation::Exact => None,
    };

    let mut generator = QueryGenerator::new(input, rng);
    let mut point_errors = Samples::new();
    let mut range_errors = Samples::new();
    let mut losses = Samples::new();
    let mut subsets = 0;

    for subset in power_set(&(0..attributes.len()).collect::<Vec<_>>())? {
        if subset.is_empty() {
            continue;
        }
        let names: Vec<&str> = subset.iter().map(|&i| attributes[i].as_str()).collect();
        let subset_columns: Vec<usize> = subset.iter().map(|&i| columns[i]).collect();

        losses.push(information_loss(output, &subset_columns)?);

        for _ in 0..settings.iterations {
            let point = generator.point_query(&names, settings.point_mode)?;
            let range = generator.range_query(&names)?;

            point_errors.push(relative_error(
                exact_count(&point, input),
                count(&point, output, point_likelihoods),
            ));
            range_errors.push(relative_error(
                exact_count(&range, input),
                count(&range, output, Some(&likelihoods)),
            ));
        }

        subsets += 1;
        log::debug!("Evaluated subset {:?}", names);
    }

    let report = CubeReport {
        generated_at: Utc::now(),
        attributes,
        subsets,
        queries_per_subset: settings.iterations,
        point_mode: settings.point_mode,
        point_estimation: settings.point_estimation,
        percentile: settings.percentile,
        information_loss: losses.mean().unwrap_or(0.0),
        point_error: point_errors.percentile(settings.percentile).unwrap_or(0.0),
        range_error: range_errors.percentile(settings.percentile).unwrap_or(0.0),
        point_errors,
        range_errors,
    };

    log::info!(
        "Cube evaluation: {} subsets x {} queries, LM {:.4}, point P{} {:.4}, range P{} {:.4}",
        report.subsets,
        report.queries_per_subset,
        report.information_loss,
        report.percentile,
        report.point_error,
        report.percentile,
        report.range_error
    );

    Ok(report)
}
