//! JSON output format for scaling fits (`--format json`)

use crate::estimator::{Analysis, SeriesFailure, SeriesFit};
use crate::measurement::ScoreKind;
use crate::regression::{Basis, SlopeComparison};
use serde::{Deserialize, Serialize};

/// One fitted coefficient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCoefficient {
    /// Term name (e.g., "intercept", "n_log_n")
    pub term: String,
    pub value: f64,
    pub std_error: f64,
}

/// A fitted series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSeriesFit {
    /// Full benchmark name
    pub name: String,
    /// Text after the last '.'
    pub label: String,
    pub n_points: usize,
    pub coefficients: Vec<JsonCoefficient>,
    /// Root-mean-square of the unweighted residuals
    pub rmse: f64,
    /// Residual degrees of freedom (0 for an exact fit)
    pub df_resid: usize,
    pub slope: f64,
    pub slope_std_error: f64,
}

/// A series that was skipped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSeriesFailure {
    pub name: String,
    pub label: String,
    /// Failure category (e.g., "insufficient-data")
    pub kind: String,
    pub message: String,
}

/// Complete JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    pub version: String,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub basis: Basis,
    pub equation: String,
    pub score_kind: ScoreKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_unit: Option<String>,
    pub series: Vec<JsonSeriesFit>,
    pub failures: Vec<JsonSeriesFailure>,
    pub comparisons: Vec<SlopeComparison>,
}

impl JsonOutput {
    /// Build the JSON document for an analysis
    pub fn from_analysis(
        analysis: &Analysis,
        method: Option<&str>,
        latency_unit: Option<&str>,
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "scalefit-json-v1".to_string(),
            method: method.map(str::to_string),
            basis: analysis.basis,
            equation: analysis.basis.equation().to_string(),
            score_kind: analysis.score_kind,
            latency_unit: latency_unit.map(str::to_string),
            series: analysis.fits.iter().map(JsonSeriesFit::from).collect(),
            failures: analysis.failures.iter().map(JsonSeriesFailure::from).collect(),
            comparisons: analysis.comparisons.clone(),
        }
    }

    /// Serialize to JSON string
    ///
    /// Non-finite statistics (an infinite z for zero pooled error) are
    /// written as `null`.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<&SeriesFit> for JsonSeriesFit {
    fn from(series_fit: &SeriesFit) -> Self {
        let fit = &series_fit.fit;
        let coefficients = fit
            .basis
            .term_names()
            .iter()
            .zip(fit.coefficients.iter().zip(&fit.std_errors))
            .map(|(term, (value, std_error))| JsonCoefficient {
                term: term.to_string(),
                value: *value,
                std_error: *std_error,
            })
            .collect();

        Self {
            name: series_fit.name.clone(),
            label: series_fit.label.clone(),
            n_points: fit.n_points,
            coefficients,
            rmse: fit.rmse,
            df_resid: fit.df_resid,
            slope: fit.slope(),
            slope_std_error: fit.slope_std_error(),
        }
    }
}

impl From<&SeriesFailure> for JsonSeriesFailure {
    fn from(failure: &SeriesFailure) -> Self {
        Self {
            name: failure.name.clone(),
            label: failure.label.clone(),
            kind: failure.error.kind().to_string(),
            message: failure.error.to_string(),
        }
    }
}
