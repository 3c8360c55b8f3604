// Series-level failures of the scaling estimator
//
// Row-level problems never reach this type: malformed rows are dropped at
// ingest. Everything here fails one series and leaves the others alone.

use crate::regression::basis::Basis;
use thiserror::Error;

/// Why a single series could not be fitted
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    #[error("Insufficient data: {basis} model needs at least {required} points, got {actual}")]
    InsufficientData {
        basis: Basis,
        required: usize,
        actual: usize,
    },

    #[error("Invalid domain: {basis} model takes log(size) and needs size > 0, got {size}")]
    InvalidDomain { basis: Basis, size: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Degenerate design matrix: {0}")]
    DegenerateDesign(String),
}

pub type Result<T> = std::result::Result<T, EstimateError>;

impl EstimateError {
    /// Short machine-readable category
    pub fn kind(&self) -> &'static str {
        match self {
            EstimateError::InsufficientData { .. } => "insufficient-data",
            EstimateError::InvalidDomain { .. } => "invalid-domain",
            EstimateError::InvalidInput(_) => "invalid-input",
            EstimateError::DegenerateDesign(_) => "degenerate-design",
        }
    }
}
