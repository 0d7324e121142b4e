//! Risk-Utility Experiments
//!
//! Two sweeps over an `AnonymizationEngine`:
//!
//! - a frontier of (risk, utility) points for thresholds `1/2 .. 1/100`
//! - a quasi-identifier sweep that anonymizes with the first `n` QIs for
//!   `n = 1..=len` and records suppression, entropy and runtime

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult};
use crate::logic::dataset::{DataHandle, Dataset};
use crate::logic::engine::{average_risk, AnonymizationEngine, EngineConfig};
use crate::logic::risk::Risks;
use crate::logic::utility::{non_uniform_entropy, suppressed_cell_fraction};

// ============================================================================
// FRONTIER
// ============================================================================

/// Which risk threshold the frontier varies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontierMode {
    /// Highest risk `1/i`; the threshold itself is the reported risk
    #[default]
    Highest,
    /// Average risk `1/i`; the measured average risk is reported
    Average,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrontierPoint {
    pub risk: f64,
    /// 1 - fraction of suppressed cells
    pub utility: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrontierReport {
    pub mode: FrontierMode,
    pub points: Vec<FrontierPoint>,
}

impl fmt::Display for FrontierReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "risk\tutility")?;
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}\t{}", point.risk, point.utility)?;
        }
        Ok(())
    }
}

/// Anonymize `input` once per threshold `1/d` for each denominator.
///
/// Points are bracketed by (1, 1) for the untouched data and (0, 0) for
/// full suppression. Thresholds the engine cannot satisfy are skipped.
pub fn risk_utility_frontier<E, S>(
    engine: &E,
    input: &Dataset,
    quasi_identifiers: &[S],
    mode: FrontierMode,
    denominators: &[u32],
    suppression_limit: f64,
) -> BenchResult<FrontierReport>
where
    E: AnonymizationEngine,
    S: AsRef<str>,
{
    if input.num_rows() == 0 {
        return Err(BenchError::empty("cannot build a frontier for an empty dataset"));
    }

    let mut points = vec![FrontierPoint { risk: 1.0, utility: 1.0 }];

    for &denominator in denominators {
        if denominator == 0 {
            return Err(BenchError::invalid("frontier denominator must be positive"));
        }
        let threshold = 1.0 / denominator as f64;
        let risks = match mode {
            FrontierMode::Highest => Risks::new(1.0, threshold, 0.0)?,
            FrontierMode::Average => Risks::new(threshold, 1.0, 0.0)?,
        };
        let config = EngineConfig::from_risks(quasi_identifiers, &risks).with_suppression_limit(suppression_limit);

        let output = match engine.anonymize(input, &config) {
            Ok(output) => output,
            Err(BenchError::NoSolution(reason)) => {
                log::warn!("No solution for threshold 1/{}: {}", denominator, reason);
                continue;
            }
            Err(e) => return Err(e),
        };

        let risk = match mode {
            FrontierMode::Highest => threshold,
            FrontierMode::Average => average_risk(&output, quasi_identifiers)?,
        };
        let utility = 1.0 - suppressed_cell_fraction(output.rows())?;
        log::debug!("Threshold 1/{}: risk {:.4}, utility {:.4}", denominator, risk, utility);
        points.push(FrontierPoint { risk, utility });
    }

    points.push(FrontierPoint { risk: 0.0, utility: 0.0 });
    log::info!("Frontier ({:?}): {} points", mode, points.len());

    Ok(FrontierReport { mode, points })
}

// ============================================================================
// QUASI-IDENTIFIER SWEEP
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub quasi_identifiers: usize,
    /// Fraction of all cells suppressed in the output
    pub suppressed_cells: f64,
    /// Normalized non-uniform entropy of the QI columns
    pub entropy: f64,
    pub elapsed_ms: u128,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub risks: Risks,
    pub rows: Vec<SweepRow>,
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.risks)?;
        write!(f, "qis\tsuppressed\tentropy\ttime_ms")?;
        for row in &self.rows {
            write!(
                f,
                "\n{}\t{}\t{}\t{}",
                row.quasi_identifiers, row.suppressed_cells, row.entropy, row.elapsed_ms
            )?;
        }
        Ok(())
    }
}

/// Anonymize with growing QI prefixes under one risk profile
pub fn quasi_identifier_sweep<E, S>(
    engine: &E,
    input: &Dataset,
    quasi_identifiers: &[S],
    risks: &Risks,
    suppression_limit: f64,
) -> BenchResult<SweepReport>
where
    E: AnonymizationEngine,
    S: AsRef<str>,
{
    if quasi_identifiers.is_empty() {
        return Err(BenchError::empty("no quasi-identifiers to sweep"));
    }
    let columns = quasi_identifiers
        .iter()
        .map(|q| input.column_index(q.as_ref()))
        .collect::<BenchResult<Vec<_>>>()?;

    let mut rows = Vec::with_capacity(quasi_identifiers.len());
    for n in 1..=quasi_identifiers.len() {
        let config = EngineConfig::from_risks(&quasi_identifiers[..n], risks).with_suppression_limit(suppression_limit);

        let start = Instant::now();
        let output = engine.anonymize(input, &config)?;
        let elapsed_ms = start.elapsed().as_millis();

        let row = SweepRow {
            quasi_identifiers: n,
            suppressed_cells: suppressed_cell_fraction(output.rows())?,
            entropy: non_uniform_entropy(input, &output, &columns[..n])?,
            elapsed_ms,
        };
        log::info!(
            "{} QIs: suppressed {:.4}, entropy {:.4}, {} ms",
            n,
            row.suppressed_cells,
            row.entropy,
            row.elapsed_ms
        );
        rows.push(row);
    }

    Ok(SweepReport { risks: *risks, rows })
}
