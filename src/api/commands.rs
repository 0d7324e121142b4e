//! CLI Commands - experiment entry points
//!
//! Datasets are named either by path or by `<data_dir>/<name>.csv`. Input
//! files are read verbatim; output files treat the configured marker as a
//! suppressed cell.

use std::fmt;
use std::fs::File;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::config::{BenchConfig, DatasetPreset};
use crate::constants::FRONTIER_DENOMINATORS;
use crate::error::{BenchError, BenchResult};
use crate::logic::dataset::{load_csv, write_csv, CsvOptions, DataHandle, Dataset};
use crate::logic::engine::{
    average_risk, AnonymizationEngine, EngineConfig, OutlierSuppressionEngine, PrivacyModel,
};
use crate::logic::evaluation::{evaluate_cube, CubeReport, CubeSettings};
use crate::logic::frontier::{
    quasi_identifier_sweep, risk_utility_frontier, FrontierMode, FrontierReport, SweepReport,
};
use crate::logic::risk::{size_threshold, Risks};
use crate::logic::utility::{information_loss, suppressed_cell_fraction};

// ============================================================================
// REQUESTS
// ============================================================================

#[derive(Debug, Clone)]
pub struct AnonymizeRequest {
    pub dataset: String,
    pub out: PathBuf,
    /// Empty means the dataset preset, or the first `max_attributes` columns
    pub quasi_identifiers: Vec<String>,
    pub risks: Risks,
}

#[derive(Debug, Clone)]
pub struct CubeRequest {
    pub dataset: String,
    /// Previously anonymized file; `None` runs the reference engine
    pub output: Option<String>,
    pub k: usize,
    pub l: usize,
    pub sensitive: Option<String>,
    pub settings: CubeSettings,
    pub seed: Option<u64>,
}

// ============================================================================
// REPORTS
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SizeThresholdReport {
    pub risk: f64,
    pub size: usize,
}

impl fmt::Display for SizeThresholdReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Risk threshold {} -> minimal class size {}", self.risk, self.size)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SuppressionReport {
    pub file: PathBuf,
    pub rows: usize,
    pub columns: Vec<String>,
    pub suppressed_fraction: f64,
}

impl fmt::Display for SuppressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} rows, {} columns, suppressed cells {}",
            self.file.display(),
            self.rows,
            self.columns.len(),
            self.suppressed_fraction
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnonymizeReport {
    pub generated_at: DateTime<Utc>,
    pub output: PathBuf,
    pub quasi_identifiers: Vec<String>,
    pub privacy_models: Vec<PrivacyModel>,
    pub rows: usize,
    pub suppressed_records: usize,
    pub suppressed_cells: f64,
    pub average_risk: f64,
}

impl fmt::Display for AnonymizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Wrote {}", self.output.display())?;
        writeln!(f, " - QIs: {}", self.quasi_identifiers.join(", "))?;
        writeln!(f, " - Suppressed records: {} of {}", self.suppressed_records, self.rows)?;
        writeln!(f, " - Suppressed cells: {}", self.suppressed_cells)?;
        write!(f, " - Average risk: {}", self.average_risk)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepSummary {
    pub generated_at: DateTime<Utc>,
    pub dataset: String,
    pub quasi_identifiers: Vec<String>,
    pub sweeps: Vec<SweepReport>,
}

impl fmt::Display for SweepSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset: {}", self.dataset)?;
        for sweep in &self.sweeps {
            write!(f, "\n\n{}", sweep)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FrontierSummary {
    pub generated_at: DateTime<Utc>,
    pub dataset: String,
    pub quasi_identifiers: Vec<String>,
    pub frontiers: Vec<FrontierReport>,
}

impl fmt::Display for FrontierSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset: {}", self.dataset)?;
        for frontier in &self.frontiers {
            write!(f, "\n\n{:?} risk\n{}", frontier.mode, frontier)?;
        }
        Ok(())
    }
}

// ============================================================================
// COMMANDS
// ============================================================================

pub fn size_threshold_command(risk: f64) -> BenchResult<SizeThresholdReport> {
    if !(risk > 0.0 && risk <= 1.0) {
        return Err(BenchError::invalid(format!("risk threshold must be in (0, 1], got {}", risk)));
    }
    Ok(SizeThresholdReport {
        risk,
        size: size_threshold(risk),
    })
}

/// Suppressed-cell fraction of an anonymized file, over all or some columns
pub fn suppressed_command(config: &BenchConfig, file: &str, columns: &[String]) -> BenchResult<SuppressionReport> {
    let path = config.resolve_dataset(file);
    let dataset = load_output(config, file)?;

    let (columns, suppressed_fraction) = if columns.is_empty() {
        (
            dataset.columns().to_vec(),
            suppressed_cell_fraction(dataset.rows())?,
        )
    } else {
        let indices = columns
            .iter()
            .map(|c| dataset.column_index(c))
            .collect::<BenchResult<Vec<_>>>()?;
        (columns.to_vec(), information_loss(&dataset, &indices)?)
    };

    Ok(SuppressionReport {
        file: path,
        rows: dataset.num_rows(),
        columns,
        suppressed_fraction,
    })
}

/// Run the reference engine and write its output
pub fn anonymize_command(config: &BenchConfig, request: &AnonymizeRequest) -> BenchResult<AnonymizeReport> {
    let input = load_input(config, &request.dataset)?;
    let quasi_identifiers = if request.quasi_identifiers.is_empty() {
        default_quasi_identifiers(&request.dataset, &input, config.max_attributes)
    } else {
        request.quasi_identifiers.clone()
    };

    let engine_config = EngineConfig::from_risks(&quasi_identifiers, &request.risks)
        .with_suppression_limit(config.suppression_limit);
    log::info!("Anonymizing {} under {}", request.dataset, request.risks);
    let output = OutlierSuppressionEngine.anonymize(&input, &engine_config)?;

    let file = File::create(&request.out)?;
    write_csv(&output, file, config.delimiter, Some(config.suppression_marker.as_str()))?;

    Ok(AnonymizeReport {
        generated_at: Utc::now(),
        output: request.out.clone(),
        suppressed_records: output
            .rows()
            .filter(|row| row.iter().any(|c| c.is_suppressed()))
            .count(),
        suppressed_cells: suppressed_cell_fraction(output.rows())?,
        average_risk: average_risk(&output, &quasi_identifiers)?,
        rows: output.num_rows(),
        quasi_identifiers,
        privacy_models: engine_config.privacy_models,
    })
}

/// Accuracy of count estimates on an anonymized version of `dataset`
pub fn cube_command(config: &BenchConfig, request: &CubeRequest) -> BenchResult<CubeReport> {
    let input = load_input(config, &request.dataset)?;

    let output = match &request.output {
        Some(name) => load_output(config, name)?,
        None => {
            let mut quasi_identifiers: Vec<String> = if request.settings.attributes.is_empty() {
                input
                    .attribute_names()
                    .into_iter()
                    .take(request.settings.max_attributes)
                    .map(String::from)
                    .collect()
            } else {
                request.settings.attributes.clone()
            };
            quasi_identifiers.retain(|q| Some(q) != request.sensitive.as_ref());

            let mut engine_config = EngineConfig::new(&quasi_identifiers)
                .with_model(PrivacyModel::KAnonymity { k: request.k })
                .with_suppression_limit(config.suppression_limit);
            if let Some(sensitive) = &request.sensitive {
                engine_config = engine_config.with_model(PrivacyModel::DistinctLDiversity {
                    attribute: sensitive.clone(),
                    l: request.l,
                });
            }
            OutlierSuppressionEngine.anonymize(&input, &engine_config)?
        }
    };

    evaluate_cube(&input, &output, &request.settings, seeded_rng(request.seed))
}

/// Suppression, entropy and runtime as quasi-identifiers are added
pub fn sweep_command(config: &BenchConfig, dataset: &str, max_qis: usize) -> BenchResult<SweepSummary> {
    let input = load_input(config, dataset)?;
    let mut quasi_identifiers = default_quasi_identifiers(dataset, &input, max_qis);
    quasi_identifiers.truncate(max_qis);

    let presets = [Risks::new(1.0, 0.2, 0.0)?, Risks::new(1.0, 0.2, 0.1)?];
    let mut sweeps = Vec::with_capacity(presets.len());
    for risks in &presets {
        sweeps.push(quasi_identifier_sweep(
            &OutlierSuppressionEngine,
            &input,
            &quasi_identifiers,
            risks,
            config.suppression_limit,
        )?);
    }

    Ok(SweepSummary {
        generated_at: Utc::now(),
        dataset: dataset.to_string(),
        quasi_identifiers,
        sweeps,
    })
}

/// Risk-utility frontiers for highest-risk and average-risk thresholds
pub fn frontier_command(config: &BenchConfig, dataset: &str) -> BenchResult<FrontierSummary> {
    let input = load_input(config, dataset)?;
    let quasi_identifiers = default_quasi_identifiers(dataset, &input, config.max_attributes);

    let mut frontiers = Vec::new();
    for mode in [FrontierMode::Highest, FrontierMode::Average] {
        frontiers.push(risk_utility_frontier(
            &OutlierSuppressionEngine,
            &input,
            &quasi_identifiers,
            mode,
            &FRONTIER_DENOMINATORS,
            config.suppression_limit,
        )?);
    }

    Ok(FrontierSummary {
        generated_at: Utc::now(),
        dataset: dataset.to_string(),
        quasi_identifiers,
        frontiers,
    })
}

// ============================================================================
// HELPERS
// ============================================================================

fn load_input(config: &BenchConfig, name: &str) -> BenchResult<Dataset> {
    let options = CsvOptions {
        delimiter: config.delimiter,
        suppression_marker: None,
    };
    load_csv(&config.resolve_dataset(name), &options)
}

fn load_output(config: &BenchConfig, name: &str) -> BenchResult<Dataset> {
    let options = CsvOptions::output(config.delimiter, &config.suppression_marker);
    load_csv(&config.resolve_dataset(name), &options)
}

/// Preset QIs for known datasets, else the leading columns
fn default_quasi_identifiers(name: &str, input: &Dataset, limit: usize) -> Vec<String> {
    match DatasetPreset::from_name(name) {
        Some(preset) => preset.quasi_identifiers().iter().map(|q| q.to_string()).collect(),
        None => input.columns().iter().take(limit).cloned().collect(),
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_dataset(dir: &Path, name: &str) {
        let mut content = String::from("age;sex;zip;disease\n");
        // Ten (age, sex, zip) classes of three records each
        for i in 0..30 {
            let j = i % 10;
            content.push_str(&format!("{};{};{};d{}\n", 20 + (j % 3) * 10, j % 2, 1000 + j % 5, i % 4));
        }
        content.push_str("99;1;9999;d0\n");
        fs::write(dir.join(format!("{}.csv", name)), content).unwrap();
    }

    fn config(dir: &Path) -> BenchConfig {
        BenchConfig {
            data_dir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_size_threshold_command() {
        assert_eq!(size_threshold_command(0.2).unwrap().size, 5);
        assert!(matches!(size_threshold_command(0.0), Err(BenchError::InvalidArgument(_))));
        assert!(matches!(size_threshold_command(1.5), Err(BenchError::InvalidArgument(_))));
    }

    #[test]
    fn test_anonymize_then_measure() {
        let dir = tempdir().unwrap();
        write_dataset(dir.path(), "people");
        let config = config(dir.path());

        let out = dir.path().join("people_anon.csv");
        let request = AnonymizeRequest {
            dataset: "people".to_string(),
            out: out.clone(),
            quasi_identifiers: vec!["age".to_string(), "sex".to_string(), "zip".to_string()],
            risks: Risks::new(1.0, 0.5, 0.0).unwrap(),
        };
        let report = anonymize_command(&config, &request).unwrap();

        assert_eq!(report.rows, 31);
        assert_eq!(report.suppressed_records, 1);
        assert_eq!(report.privacy_models, vec![PrivacyModel::KAnonymity { k: 2 }]);
        assert!(out.exists());

        let measured = suppressed_command(&config, out.to_str().unwrap(), &[]).unwrap();
        assert!((measured.suppressed_fraction - 3.0 / 124.0).abs() < 1e-12);

        let zip = suppressed_command(&config, out.to_str().unwrap(), &["zip".to_string()]).unwrap();
        assert!((zip.suppressed_fraction - 1.0 / 31.0).abs() < 1e-12);
    }

    #[test]
    fn test_cube_command_is_reproducible_with_seed() {
        let dir = tempdir().unwrap();
        write_dataset(dir.path(), "people");
        let config = config(dir.path());

        let request = CubeRequest {
            dataset: "people".to_string(),
            output: None,
            k: 2,
            l: 2,
            sensitive: Some("disease".to_string()),
            settings: CubeSettings {
                iterations: 5,
                ..Default::default()
            },
            seed: Some(9),
        };
        let first = cube_command(&config, &request).unwrap();
        let second = cube_command(&config, &request).unwrap();

        assert_eq!(first.subsets, 15);
        assert_eq!(first.point_errors, second.point_errors);
        assert_eq!(first.range_errors, second.range_errors);
        assert!(first.information_loss > 0.0);
    }

    #[test]
    fn test_cube_command_missing_file() {
        let dir = tempdir().unwrap();
        let request = CubeRequest {
            dataset: "missing".to_string(),
            output: None,
            k: 2,
            l: 2,
            sensitive: None,
            settings: CubeSettings::default(),
            seed: Some(1),
        };
        assert!(matches!(cube_command(&config(dir.path()), &request), Err(BenchError::Io(_))));
    }

    #[test]
    fn test_sweep_and_frontier_commands() {
        let dir = tempdir().unwrap();
        write_dataset(dir.path(), "people");
        let config = BenchConfig {
            suppression_limit: 1.0,
            ..config(dir.path())
        };

        let sweep = sweep_command(&config, "people", 3).unwrap();
        assert_eq!(sweep.quasi_identifiers, vec!["age", "sex", "zip"]);
        assert_eq!(sweep.sweeps.len(), 2);
        assert!(sweep.sweeps.iter().all(|s| s.rows.len() == 3));

        let frontier = frontier_command(&config, "people").unwrap();
        assert_eq!(frontier.frontiers.len(), 2);
        for report in &frontier.frontiers {
            assert_eq!(report.points.first().map(|p| p.risk), Some(1.0));
            assert_eq!(report.points.last().map(|p| p.utility), Some(0.0));
        }
        assert!(serde_json::to_string(&frontier).is_ok());
    }
}
