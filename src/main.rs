//! Suppression Bench - Command Line Entry Point

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use suppression_bench::api::{
    anonymize_command, cube_command, frontier_command, size_threshold_command, suppressed_command,
    sweep_command, AnonymizeRequest, CubeRequest,
};
use suppression_bench::config::BenchConfig;
use suppression_bench::constants::{APP_NAME, APP_VERSION};
use suppression_bench::logic::evaluation::{CubeSettings, PointEstimation};
use suppression_bench::logic::query::PointMode;
use suppression_bench::logic::risk::Risks;

#[derive(Parser)]
#[command(name = "suppression-bench")]
#[command(version, about = "Utility and risk experiments on cell-suppressed datasets")]
struct Cli {
    /// Directory holding <dataset>.csv files (overrides BENCH_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print reports as pretty JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Minimal equivalence class size for a risk threshold
    SizeThreshold {
        #[arg(long)]
        risk: f64,
    },

    /// Suppressed-cell fraction of an anonymized file
    Suppressed {
        #[arg(long)]
        file: String,

        /// Restrict to these columns
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },

    /// Anonymize a dataset with the reference engine
    Anonymize {
        #[arg(long)]
        dataset: String,

        #[arg(long)]
        out: PathBuf,

        /// Quasi-identifiers (default: dataset preset or leading columns)
        #[arg(long = "qi", value_delimiter = ',')]
        qis: Vec<String>,

        #[arg(long, default_value_t = 1.0)]
        average: f64,

        #[arg(long, default_value_t = 0.2)]
        highest: f64,

        #[arg(long, default_value_t = 0.0)]
        records: f64,
    },

    /// Accuracy of point and range count estimates over all attribute subsets
    Cube {
        #[arg(long)]
        dataset: String,

        /// Anonymized version of the dataset (default: run the reference engine)
        #[arg(long)]
        output: Option<String>,

        #[arg(long, default_value_t = 5)]
        k: usize,

        #[arg(long, default_value_t = 3)]
        l: usize,

        /// Sensitive attribute for distinct l-diversity
        #[arg(long)]
        sensitive: Option<String>,

        /// Queries per subset (overrides BENCH_ITERATIONS)
        #[arg(long)]
        iterations: Option<usize>,

        #[arg(long, default_value_t = 50.0)]
        percentile: f64,

        /// Overrides BENCH_SEED
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, value_delimiter = ',')]
        attributes: Vec<String>,

        /// draw | record
        #[arg(long, default_value = "draw")]
        mode: PointMode,

        /// likelihood | exact
        #[arg(long, default_value = "likelihood")]
        estimation: PointEstimation,
    },

    /// Suppression, entropy and runtime for a growing number of QIs
    Sweep {
        #[arg(long)]
        dataset: String,

        #[arg(long, default_value_t = 9)]
        max_qis: usize,
    },

    /// Risk-utility frontier for highest and average risk thresholds
    Frontier {
        #[arg(long)]
        dataset: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = BenchConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    log::info!("Starting {} v{}", APP_NAME, APP_VERSION);
    log::debug!("Config: {:?}", config);

    match cli.command {
        Command::SizeThreshold { risk } => {
            let report = size_threshold_command(risk).context("size threshold")?;
            emit(&report, cli.json)
        }

        Command::Suppressed { file, columns } => {
            let report = suppressed_command(&config, &file, &columns)
                .with_context(|| format!("measuring suppression of {}", file))?;
            emit(&report, cli.json)
        }

        Command::Anonymize {
            dataset,
            out,
            qis,
            average,
            highest,
            records,
        } => {
            let risks = Risks::new(average, highest, records).context("invalid risk thresholds")?;
            let request = AnonymizeRequest {
                dataset,
                out,
                quasi_identifiers: qis,
                risks,
            };
            let report = anonymize_command(&config, &request)
                .with_context(|| format!("anonymizing {}", request.dataset))?;
            emit(&report, cli.json)
        }

        Command::Cube {
            dataset,
            output,
            k,
            l,
            sensitive,
            iterations,
            percentile,
            seed,
            attributes,
            mode,
            estimation,
        } => {
            let settings = CubeSettings {
                attributes,
                iterations: iterations.unwrap_or(config.iterations),
                percentile,
                point_mode: mode,
                point_estimation: estimation,
                ..CubeSettings::from_config(&config)
            };
            let request = CubeRequest {
                dataset,
                output,
                k,
                l,
                sensitive,
                settings,
                seed: seed.or(config.seed),
            };
            let report = cube_command(&config, &request)
                .with_context(|| format!("cube evaluation of {}", request.dataset))?;
            emit(&report, cli.json)
        }

        Command::Sweep { dataset, max_qis } => {
            let report = sweep_command(&config, &dataset, max_qis)
                .with_context(|| format!("QI sweep of {}", dataset))?;
            emit(&report, cli.json)
        }

        Command::Frontier { dataset } => {
            let report = frontier_command(&config, &dataset)
                .with_context(|| format!("risk-utility frontier of {}", dataset))?;
            emit(&report, cli.json)
        }
    }
}

fn emit<T: Serialize + fmt::Display>(report: &T, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}
