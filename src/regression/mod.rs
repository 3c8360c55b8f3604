// Weighted regression of latency against input size
//
// This module is the statistical core of scalefit:
// - Weighted least squares under several functional forms (`Basis`)
// - Propagation of coefficient covariance into mean-prediction bands
// - z-tests for equality of fitted slopes between series
//
// Scientific Foundation:
// - Inverse-variance weights give noisier measurements less influence
//   (Aitken's generalized least squares with a diagonal covariance)
// - Coefficient covariance s²(XᵀWX)⁻¹ with s² from n − p residual
//   degrees of freedom, the convention of standard regression packages
// - Slope differences are tested against the standard normal, which is
//   appropriate when slope standard errors are large-sample estimates

mod basis;
mod comparison;
mod config;
mod error;
mod prediction;
mod statistics;
mod wls;

pub use basis::Basis;
pub use comparison::{
    compare_slopes, pairwise_comparisons, PairingRule, SlopeComparison, SlopeTest,
};
pub use config::EstimatorConfig;
pub use error::{EstimateError, Result};
pub use prediction::{
    confidence_band, prediction_grid, BandDistribution, GridSpacing, Prediction,
};
pub use statistics::{normal_cdf, normal_quantile, student_t_quantile, two_sided_p_value};
pub use wls::{fit_series, fit_wls, Fit, Weighting};
