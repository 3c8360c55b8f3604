//! Run configuration loaded from TOML
//!
//! ```toml
//! [estimator]
//! basis = "affine"
//! score_kind = "throughput"
//! pair_prefix_len = 1
//!
//! [output]
//! data_dir = "results"
//! plot_dir = "plots"
//! chart = "slopes"
//! format = "json"
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use crate::chart::ChartKind;
use crate::cli::OutputFormat;
use crate::regression::{Basis, EstimatorConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where input is read from and what gets written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding `bench.csv` / `bench_<METHOD>.csv`
    pub data_dir: PathBuf,
    /// Directory charts are written to (created on demand)
    pub plot_dir: PathBuf,
    pub chart: ChartKind,
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            plot_dir: PathBuf::from("plots"),
            chart: ChartKind::Curves,
            format: OutputFormat::Text,
        }
    }
}

impl OutputConfig {
    /// Benchmark table for an optional method suffix
    pub fn input_path(&self, method: Option<&str>) -> PathBuf {
        match method {
            Some(m) => self.data_dir.join(format!("bench_{}.csv", m)),
            None => self.data_dir.join("bench.csv"),
        }
    }

    /// Chart file for this run, `None` when charts are disabled
    pub fn chart_path(&self, basis: Basis, method: Option<&str>) -> Option<PathBuf> {
        self.chart
            .file_name(basis, method)
            .map(|name| self.plot_dir.join(name))
    }
}

/// Complete run configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub estimator: EstimatorConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML")
    }

    pub fn validate(&self) -> Result<(), String> {
        self.estimator.validate()
    }
}
