// Mean prediction and confidence bands for fitted models
//
// For a basis row b at size x the predicted mean is bᵀβ and its variance is
// bᵀ Cov(β) b. The band is a confidence interval on the mean, not a
// prediction interval for new observations.

use crate::regression::error::{EstimateError, Result};
use crate::regression::statistics::{normal_quantile, student_t_quantile};
use crate::regression::wls::{dot, Fit};
use clap::ValueEnum;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Reference distribution for band half-widths
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum BandDistribution {
    /// Student-t with n − p degrees of freedom (normal when n = p)
    #[default]
    StudentT,
    /// Standard normal regardless of sample size
    Normal,
}

/// Spacing of the sizes a band is evaluated at
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum GridSpacing {
    #[default]
    Linear,
    /// Geometric spacing; needs a strictly positive range
    Log,
}

/// Predicted mean latency at one size, with its confidence interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub size: f64,
    pub mean: f64,
    /// Standard error of the mean prediction
    pub std_error: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Fit {
    /// Predicted mean latency at `size`
    pub fn predict(&self, size: f64) -> Result<f64> {
        let row = self.basis_row(size)?;
        Ok(dot(&row, &self.coefficients))
    }

    /// Standard error of the predicted mean: sqrt(bᵀ Cov(β) b)
    pub fn prediction_std_error(&self, size: f64) -> Result<f64> {
        let row = DVector::from_vec(self.basis_row(size)?);
        let variance = row.dot(&(&self.covariance * &row));
        Ok(variance.max(0.0).sqrt())
    }

    /// Two-sided quantile used for a (1 − alpha) band
    pub fn band_quantile(&self, alpha: f64, distribution: BandDistribution) -> f64 {
        let p = 1.0 - alpha / 2.0;
        match distribution {
            BandDistribution::StudentT if self.df_resid > 0 => {
                student_t_quantile(p, self.df_resid as f64)
            }
            _ => normal_quantile(p),
        }
    }

    /// Mean prediction with a (1 − alpha) confidence interval
    pub fn predict_with_band(
        &self,
        size: f64,
        alpha: f64,
        distribution: BandDistribution,
    ) -> Result<Prediction> {
        let q = self.band_quantile(alpha, distribution);
        self.predict_with_quantile(size, q)
    }

    fn predict_with_quantile(&self, size: f64, q: f64) -> Result<Prediction> {
        let mean = self.predict(size)?;
        let std_error = self.prediction_std_error(size)?;
        Ok(Prediction {
            size,
            mean,
            std_error,
            lower: mean - q * std_error,
            upper: mean + q * std_error,
        })
    }

    fn basis_row(&self, size: f64) -> Result<Vec<f64>> {
        if self.basis.requires_positive_sizes() && !(size > 0.0) {
            return Err(EstimateError::InvalidDomain {
                basis: self.basis,
                size,
            });
        }
        Ok(self.basis.evaluate(size))
    }
}

/// `points` sizes spanning `[lo, hi]`
///
/// Log spacing over a range that is not strictly positive falls back to
/// linear spacing.
pub fn prediction_grid(lo: f64, hi: f64, points: usize, spacing: GridSpacing) -> Vec<f64> {
    match points {
        0 => return Vec::new(),
        1 => return vec![lo],
        _ => {}
    }
    let steps = (points - 1) as f64;

    match spacing {
        GridSpacing::Log if lo > 0.0 && hi > 0.0 => {
            let (log_lo, log_hi) = (lo.log10(), hi.log10());
            (0..points)
                .map(|i| 10f64.powf(log_lo + (log_hi - log_lo) * i as f64 / steps))
                .collect()
        }
        _ => (0..points)
            .map(|i| lo + (hi - lo) * i as f64 / steps)
            .collect(),
    }
}

/// Confidence band over the observed size range of a fit
pub fn confidence_band(
    fit: &Fit,
    alpha: f64,
    points: usize,
    spacing: GridSpacing,
    distribution: BandDistribution,
) -> Result<Vec<Prediction>> {
    let q = fit.band_quantile(alpha, distribution);
    prediction_grid(fit.min_size, fit.max_size, points, spacing)
        .into_iter()
        .map(|size| fit.predict_with_quantile(size, q))
        .collect()
}
