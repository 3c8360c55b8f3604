// Weighted least squares fitting
//
// Minimizes Σ wᵢ (yᵢ − xᵢᵀβ)² for a design built from a `Basis`.
//
// The solve runs on the √W-scaled design with each column equilibrated to
// unit norm, then a thin QR decomposition: R β = Qᵀ √W y. Sizes spanning
// several decades (and n·log n columns) make XᵀWX badly conditioned, so the
// normal equations are never formed explicitly.
//
// Covariance follows the usual regression convention:
//   Cov(β) = s² (XᵀWX)⁻¹,  s² = Σ wᵢ rᵢ² / (n − p)
// With n = p there is no residual information; s² is taken as 1, i.e. the
// supplied measurement variances are trusted as absolute.

use crate::regression::basis::Basis;
use crate::regression::error::{EstimateError, Result};
use crate::series::Series;
use clap::ValueEnum;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Relative size below which an R diagonal entry counts as zero
const RANK_TOLERANCE: f64 = 1e-12;

/// How per-point weights are derived from a series
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Weighting {
    /// wᵢ = 1 / σᵢ²
    #[default]
    InverseVariance,
    /// wᵢ = 1 (ordinary least squares)
    Uniform,
}

impl Weighting {
    /// Weight vector for a series
    pub fn weights(self, series: &Series) -> Result<Vec<f64>> {
        match self {
            Weighting::Uniform => Ok(vec![1.0; series.len()]),
            Weighting::InverseVariance => series
                .points
                .iter()
                .map(|p| {
                    if p.latency_std > 0.0 && p.latency_std.is_finite() {
                        Ok(1.0 / (p.latency_std * p.latency_std))
                    } else {
                        Err(EstimateError::InvalidInput(format!(
                            "latency std {} at size {} gives no usable inverse-variance weight",
                            p.latency_std, p.size
                        )))
                    }
                })
                .collect(),
        }
    }
}

/// A fitted latency model
#[derive(Debug, Clone, PartialEq)]
pub struct Fit {
    pub basis: Basis,
    /// One coefficient per basis function
    pub coefficients: Vec<f64>,
    /// Standard error of each coefficient (≥ 0)
    pub std_errors: Vec<f64>,
    /// Coefficient covariance matrix (p × p)
    pub covariance: DMatrix<f64>,
    /// Root-mean-square of the unweighted residuals
    pub rmse: f64,
    /// Residual variance scale s² applied to the covariance
    pub scale: f64,
    pub n_points: usize,
    /// Residual degrees of freedom (n − p)
    pub df_resid: usize,
    pub min_size: f64,
    pub max_size: f64,
}

impl Fit {
    /// Coefficient of the `n` term
    pub fn slope(&self) -> f64 {
        self.coefficients[self.basis.slope_index()]
    }

    /// Standard error of the `n` coefficient
    pub fn slope_std_error(&self) -> f64 {
        self.std_errors[self.basis.slope_index()]
    }

    /// True when n = p and the standard errors come from measurement error alone
    pub fn is_exactly_determined(&self) -> bool {
        self.df_resid == 0
    }
}

/// Fit a series with the weighting policy applied to its latency stds
pub fn fit_series(series: &Series, basis: Basis, weighting: Weighting) -> Result<Fit> {
    check_sample_size(series.len(), basis)?;
    let weights = weighting.weights(series)?;
    fit_wls(&series.sizes(), &series.latencies(), &weights, basis)
}

/// Weighted least squares fit of `latencies` against `basis(sizes)`
///
/// # Example
/// ```
/// use scalefit::regression::{fit_wls, Basis};
///
/// let sizes = [1.0, 2.0, 4.0, 8.0];
/// let latencies: Vec<f64> = sizes.iter().map(|n| 10.0 + 2.0 * n).collect();
/// let fit = fit_wls(&sizes, &latencies, &[1.0; 4], Basis::Affine).unwrap();
///
/// assert!((fit.coefficients[0] - 10.0).abs() < 1e-9);
/// assert!((fit.slope() - 2.0).abs() < 1e-9);
/// ```
pub fn fit_wls(sizes: &[f64], latencies: &[f64], weights: &[f64], basis: Basis) -> Result<Fit> {
    let n = sizes.len();
    let p = basis.dimension();

    if latencies.len() != n || weights.len() != n {
        return Err(EstimateError::InvalidInput(format!(
            "length mismatch: {} sizes, {} latencies, {} weights",
            n,
            latencies.len(),
            weights.len()
        )));
    }
    check_sample_size(n, basis)?;
    check_domain(sizes, basis)?;

    if let Some(i) = (0..n).find(|&i| !sizes[i].is_finite() || !latencies[i].is_finite()) {
        return Err(EstimateError::InvalidInput(format!(
            "non-finite point (size={}, latency={})",
            sizes[i], latencies[i]
        )));
    }
    if let Some(w) = weights.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
        return Err(EstimateError::InvalidInput(format!(
            "weights must be positive and finite, got {}",
            w
        )));
    }

    let rows: Vec<Vec<f64>> = sizes.iter().map(|&s| basis.evaluate(s)).collect();
    let sqrt_w: Vec<f64> = weights.iter().map(|w| w.sqrt()).collect();

    let mut xw = DMatrix::from_fn(n, p, |i, j| rows[i][j] * sqrt_w[i]);
    let yw = DVector::from_fn(n, |i, _| latencies[i] * sqrt_w[i]);

    // Column equilibration
    let mut column_norms = Vec::with_capacity(p);
    for j in 0..p {
        let norm = xw.column(j).norm();
        if !(norm > 0.0 && norm.is_finite()) {
            return Err(EstimateError::DegenerateDesign(format!(
                "basis column {} of the {} model is zero or non-finite",
                j, basis
            )));
        }
        for i in 0..n {
            xw[(i, j)] /= norm;
        }
        column_norms.push(norm);
    }

    let qr = xw.qr();
    let q = qr.q();
    let r = qr.r();

    let max_diag = (0..p).map(|j| r[(j, j)].abs()).fold(0.0_f64, f64::max);
    if (0..p).any(|j| r[(j, j)].abs() <= RANK_TOLERANCE * max_diag) {
        return Err(EstimateError::DegenerateDesign(format!(
            "{} model is rank deficient for sizes {:?}",
            basis, sizes
        )));
    }

    let qty = q.transpose() * &yw;
    let beta_eq = r.solve_upper_triangular(&qty).ok_or_else(|| {
        EstimateError::DegenerateDesign("triangular solve failed".to_string())
    })?;
    let r_inv = r.try_inverse().ok_or_else(|| {
        EstimateError::DegenerateDesign("R factor is not invertible".to_string())
    })?;
    let cov_eq = &r_inv * r_inv.transpose();

    // Undo the column equilibration
    let coefficients: Vec<f64> = (0..p).map(|j| beta_eq[j] / column_norms[j]).collect();

    let residuals: Vec<f64> = rows
        .iter()
        .zip(latencies)
        .map(|(row, y)| y - dot(row, &coefficients))
        .collect();
    let weighted_ssr: f64 = residuals
        .iter()
        .zip(weights)
        .map(|(r, w)| w * r * r)
        .sum();
    let rmse = (residuals.iter().map(|r| r * r).sum::<f64>() / n as f64).sqrt();

    let df_resid = n - p;
    let scale = if df_resid > 0 {
        weighted_ssr / df_resid as f64
    } else {
        1.0
    };

    let covariance =
        DMatrix::from_fn(p, p, |j, k| scale * cov_eq[(j, k)] / (column_norms[j] * column_norms[k]));
    let std_errors = (0..p).map(|j| covariance[(j, j)].max(0.0).sqrt()).collect();

    let (min_size, max_size) = sizes
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
            (lo.min(s), hi.max(s))
        });

    tracing::debug!(
        basis = %basis,
        n_points = n,
        rmse,
        scale,
        "fitted weighted least squares model"
    );

    Ok(Fit {
        basis,
        coefficients,
        std_errors,
        covariance,
        rmse,
        scale,
        n_points: n,
        df_resid,
        min_size,
        max_size,
    })
}

fn check_sample_size(n: usize, basis: Basis) -> Result<()> {
    if n < basis.dimension() {
        return Err(EstimateError::InsufficientData {
            basis,
            required: basis.dimension(),
            actual: n,
        });
    }
    Ok(())
}

fn check_domain(sizes: &[f64], basis: Basis) -> Result<()> {
    if basis.requires_positive_sizes() {
        if let Some(&size) = sizes.iter().find(|&&s| s.is_nan() || s <= 0.0) {
            return Err(EstimateError::InvalidDomain { basis, size });
        }
    }
    Ok(())
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
