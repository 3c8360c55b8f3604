//! Benchmark measurements and unit conversion
//!
//! A [`Measurement`] is one row of a JMH-style result table. Scores are
//! stated with a confidence-interval half-width; this module turns them into
//! a latency with a one-sigma standard deviation, following the declared
//! [`ScoreKind`] of the input.

use crate::regression::{EstimateError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// z-multiplier of a 99.9% two-sided confidence interval (JMH's default)
pub const Z_999: f64 = 3.29;

/// z-multiplier of a 95% two-sided confidence interval
pub const Z_95: f64 = 1.96;

/// What the `Score` column of an input table measures
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum ScoreKind {
    /// Score is already a latency (e.g. JMH `avgt`, unit `ns/op`)
    #[default]
    #[serde(rename = "time-per-op")]
    #[value(name = "time-per-op")]
    TimePerOp,

    /// Score is a throughput (e.g. JMH `thrpt`, unit `ops/ns`); latency = 1/score
    #[serde(rename = "throughput")]
    #[value(name = "throughput")]
    Throughput,
}

impl ScoreKind {
    /// Guess the kind a unit string describes
    ///
    /// `ns/op` style units are time per operation, `ops/ns` style units are
    /// throughput. Anything else is unknown.
    pub fn from_unit(unit: &str) -> Option<ScoreKind> {
        let unit = unit.trim();
        if unit.ends_with("/op") {
            Some(ScoreKind::TimePerOp)
        } else if unit.starts_with("ops/") {
            Some(ScoreKind::Throughput)
        } else {
            None
        }
    }

    /// Unit of the derived latency, given the unit of the score column
    ///
    /// # Example
    /// ```
    /// use scalefit::measurement::ScoreKind;
    ///
    /// assert_eq!(ScoreKind::Throughput.latency_unit("ops/us"), "us/op");
    /// assert_eq!(ScoreKind::TimePerOp.latency_unit("ns/op"), "ns/op");
    /// ```
    pub fn latency_unit(self, score_unit: &str) -> String {
        match self {
            ScoreKind::TimePerOp => score_unit.trim().to_string(),
            ScoreKind::Throughput => match score_unit.trim().split_once('/') {
                Some((ops, time)) => format!("{}/{}", time, ops.trim_end_matches('s')),
                None => format!("1/({})", score_unit.trim()),
            },
        }
    }
}

impl fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreKind::TimePerOp => f.write_str("time-per-op"),
            ScoreKind::Throughput => f.write_str("throughput"),
        }
    }
}

/// One benchmark result row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Fully qualified benchmark identifier (e.g. `pkg.MapBench.aMap`)
    pub benchmark: String,
    /// Independent variable
    pub size: f64,
    /// Score as reported (latency or throughput, see [`ScoreKind`])
    pub score: f64,
    /// Confidence-interval half-width of `score`
    pub score_error: f64,
}

impl Measurement {
    pub fn new(benchmark: impl Into<String>, size: f64, score: f64, score_error: f64) -> Self {
        Self {
            benchmark: benchmark.into(),
            size,
            score,
            score_error,
        }
    }

    /// Display label: the final dotted segment of the benchmark name
    pub fn label(&self) -> &str {
        display_label(&self.benchmark)
    }

    /// Convert to a latency point
    ///
    /// `input_multiplier` is the z-multiplier of the confidence level the
    /// score error is stated at ([`Z_999`] for JMH output).
    pub fn to_latency(&self, kind: ScoreKind, input_multiplier: f64) -> Result<LatencyPoint> {
        let score_std = ci_to_std(self.score_error, input_multiplier);
        let (latency, latency_std) = match kind {
            ScoreKind::TimePerOp => (self.score, score_std),
            ScoreKind::Throughput => {
                if self.score == 0.0 {
                    return Err(EstimateError::InvalidInput(format!(
                        "zero throughput score at size {} cannot be inverted to a latency",
                        self.size
                    )));
                }
                (1.0 / self.score, score_std / (self.score * self.score))
            }
        };

        Ok(LatencyPoint {
            size: self.size,
            latency,
            latency_std,
        })
    }
}

/// A measurement expressed as latency with a one-sigma uncertainty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyPoint {
    pub size: f64,
    pub latency: f64,
    pub latency_std: f64,
}

/// Final dotted segment of a qualified benchmark name
pub fn display_label(benchmark: &str) -> &str {
    benchmark.rsplit('.').next().unwrap_or(benchmark)
}

/// Confidence-interval half-width → standard deviation
#[inline]
pub fn ci_to_std(half_width: f64, multiplier: f64) -> f64 {
    half_width / multiplier
}

/// Standard deviation → confidence-interval half-width
#[inline]
pub fn std_to_ci(std: f64, multiplier: f64) -> f64 {
    std * multiplier
}
