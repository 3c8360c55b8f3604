//! CLI argument parsing for scalefit

use crate::chart::ChartKind;
use crate::config::Config;
use crate::measurement::ScoreKind;
use crate::regression::{Basis, Weighting};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human-readable text format (default)
    #[default]
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "scalefit")]
#[command(version)]
#[command(
    about = "Fit latency scaling models to JMH benchmark results and compare slopes",
    long_about = None
)]
pub struct Cli {
    /// Method suffix: read bench_<METHOD>.csv instead of bench.csv
    #[arg(value_name = "METHOD")]
    pub method: Option<String>,

    /// Functional form to fit
    #[arg(short, long, value_enum)]
    pub model: Option<Basis>,

    /// What the Score column measures
    #[arg(long = "score-kind", value_enum)]
    pub score_kind: Option<ScoreKind>,

    /// Per-point weighting of the regression
    #[arg(long, value_enum)]
    pub weighting: Option<Weighting>,

    /// Chart to write into the plot directory
    #[arg(long, value_enum)]
    pub chart: Option<ChartKind>,

    /// Output format (text or json)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the benchmark CSV
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory charts are written to
    #[arg(long = "plot-dir", value_name = "DIR")]
    pub plot_dir: Option<PathBuf>,

    /// Compare slopes of every pair of series, not only prefix-matched ones
    #[arg(long = "all-pairs")]
    pub all_pairs: bool,

    /// Leading label characters ignored when pairing series
    #[arg(long = "prefix-len", value_name = "N")]
    pub prefix_len: Option<usize>,

    /// p-value below which slopes are reported as different
    #[arg(long, value_name = "P")]
    pub threshold: Option<f64>,

    /// Log progress to stderr (RUST_LOG refines the filter)
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply_to(&self, config: &mut Config) {
        let estimator = &mut config.estimator;
        if let Some(basis) = self.model {
            estimator.basis = basis;
        }
        if let Some(kind) = self.score_kind {
            estimator.score_kind = kind;
        }
        if let Some(weighting) = self.weighting {
            estimator.weighting = weighting;
        }
        if self.all_pairs {
            estimator.compare_all_pairs = true;
        }
        if let Some(n) = self.prefix_len {
            estimator.pair_prefix_len = n;
        }
        if let Some(threshold) = self.threshold {
            estimator.p_value_threshold = threshold;
        }

        let output = &mut config.output;
        if let Some(chart) = self.chart {
            output.chart = chart;
        }
        if let Some(format) = self.format {
            output.format = format;
        }
        if let Some(dir) = &self.data_dir {
            output.data_dir = dir.clone();
        }
        if let Some(dir) = &self.plot_dir {
            output.plot_dir = dir.clone();
        }
    }
}
