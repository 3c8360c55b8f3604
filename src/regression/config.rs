// Configuration for the scaling estimator
//
// Every constant the analysis depends on (confidence multipliers, band
// level, significance threshold, pairing offset) lives here so the
// statistical core never reaches for globals or file paths.

use crate::measurement::{ScoreKind, Z_95, Z_999};
use crate::regression::basis::Basis;
use crate::regression::comparison::PairingRule;
use crate::regression::prediction::{BandDistribution, GridSpacing};
use crate::regression::wls::Weighting;
use serde::{Deserialize, Serialize};

/// Configuration for fitting, banding and slope comparison
///
/// # Example
/// ```
/// use scalefit::regression::EstimatorConfig;
///
/// let config = EstimatorConfig::default();
/// assert_eq!(config.p_value_threshold, 0.01);
/// assert_eq!(config.pair_prefix_len, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Meaning of the `Score` column
    pub score_kind: ScoreKind,

    /// z-multiplier of the confidence level the input score error is stated at
    ///
    /// Default: 3.29 (99.9%, what JMH reports)
    pub input_ci_multiplier: f64,

    /// z-multiplier for the ± intervals in the text report and in charts
    ///
    /// Default: 1.96 (95%)
    pub output_ci_multiplier: f64,

    /// Functional form to fit
    pub basis: Basis,

    /// Per-point weighting
    pub weighting: Weighting,

    /// Significance level (alpha) of the prediction confidence band
    ///
    /// Default: 0.05 (95% band)
    pub band_alpha: f64,

    /// Distribution of the band quantile
    pub band_distribution: BandDistribution,

    /// Number of sizes the band is evaluated at
    pub prediction_points: usize,

    /// Spacing of the band sizes
    pub grid_spacing: GridSpacing,

    /// p-value below which two slopes are reported as different
    ///
    /// Default: 0.01
    pub p_value_threshold: f64,

    /// Leading characters dropped from labels before pairing
    ///
    /// Default: 2
    pub pair_prefix_len: usize,

    /// Compare every pair of series instead of prefix-matched ones
    pub compare_all_pairs: bool,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            score_kind: ScoreKind::TimePerOp,
            input_ci_multiplier: Z_999,
            output_ci_multiplier: Z_95,
            basis: Basis::Affine,
            weighting: Weighting::InverseVariance,
            band_alpha: 0.05,
            band_distribution: BandDistribution::StudentT,
            prediction_points: 200,
            grid_spacing: GridSpacing::Linear,
            p_value_threshold: 0.01,
            pair_prefix_len: 2,
            compare_all_pairs: false,
        }
    }
}

impl EstimatorConfig {
    /// Throughput input (JMH `thrpt`), latency = 1/score
    pub fn throughput() -> Self {
        Self {
            score_kind: ScoreKind::Throughput,
            ..Self::default()
        }
    }

    /// Every pair compared, log-spaced band grid
    pub fn all_pairs() -> Self {
        Self {
            compare_all_pairs: true,
            grid_spacing: GridSpacing::Log,
            ..Self::default()
        }
    }

    pub fn pairing_rule(&self) -> PairingRule {
        if self.compare_all_pairs {
            PairingRule::AllPairs
        } else {
            PairingRule::StrippedPrefix(self.pair_prefix_len)
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.input_ci_multiplier > 0.0 && self.input_ci_multiplier.is_finite()) {
            return Err(format!(
                "input_ci_multiplier must be positive and finite, got {}",
                self.input_ci_multiplier
            ));
        }

        if !(self.output_ci_multiplier > 0.0 && self.output_ci_multiplier.is_finite()) {
            return Err(format!(
                "output_ci_multiplier must be positive and finite, got {}",
                self.output_ci_multiplier
            ));
        }

        if !(self.band_alpha > 0.0 && self.band_alpha < 1.0) {
            return Err(format!(
                "band_alpha must be in (0, 1), got {}",
                self.band_alpha
            ));
        }

        if !(self.p_value_threshold > 0.0 && self.p_value_threshold <= 1.0) {
            return Err(format!(
                "p_value_threshold must be in (0, 1], got {}",
                self.p_value_threshold
            ));
        }

        if self.prediction_points < 2 {
            return Err(format!(
                "prediction_points must be >= 2, got {}",
                self.prediction_points
            ));
        }

        Ok(())
    }
}
