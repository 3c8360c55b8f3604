// Functional forms for latency-vs-size regression
//
// Each basis maps a size n to a row of regressors. All forms carry an `n`
// term; its coefficient is the "slope" compared across series.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Functional form of the fitted latency model
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum Basis {
    /// latency = a + b·n
    #[default]
    #[serde(rename = "affine")]
    #[value(name = "affine")]
    Affine,

    /// latency = b·n + c·log(n), no constant term
    #[serde(rename = "n-logn")]
    #[value(name = "n-logn")]
    NLogN,

    /// latency = a + b·n + c·n·log(n)
    #[serde(rename = "affine-nlogn")]
    #[value(name = "affine-nlogn")]
    AffineNLogN,
}

impl Basis {
    /// Number of regressors (coefficient count)
    pub fn dimension(self) -> usize {
        match self {
            Basis::Affine => 2,
            Basis::NLogN => 2,
            Basis::AffineNLogN => 3,
        }
    }

    /// Whether the basis takes log(n), which needs n > 0
    pub fn requires_positive_sizes(self) -> bool {
        matches!(self, Basis::NLogN | Basis::AffineNLogN)
    }

    /// Index of the `n` coefficient
    pub fn slope_index(self) -> usize {
        match self {
            Basis::Affine => 1,
            Basis::NLogN => 0,
            Basis::AffineNLogN => 1,
        }
    }

    /// Evaluate every basis function at `size`
    ///
    /// Callers are expected to have checked the domain; log terms of a
    /// non-positive size come back as NaN or -inf.
    pub fn evaluate(self, size: f64) -> Vec<f64> {
        match self {
            Basis::Affine => vec![1.0, size],
            Basis::NLogN => vec![size, size.ln()],
            Basis::AffineNLogN => vec![1.0, size, size * size.ln()],
        }
    }

    /// Term suffixes used when printing a fitted equation ("" is the constant)
    pub fn term_labels(self) -> &'static [&'static str] {
        match self {
            Basis::Affine => &["", "·size"],
            Basis::NLogN => &["·n", "·log(n)"],
            Basis::AffineNLogN => &["", "·n", "·n·log(n)"],
        }
    }

    /// Identifier of each coefficient for machine-readable output
    pub fn term_names(self) -> &'static [&'static str] {
        match self {
            Basis::Affine => &["intercept", "size"],
            Basis::NLogN => &["n", "log_n"],
            Basis::AffineNLogN => &["intercept", "n", "n_log_n"],
        }
    }

    /// Symbolic model equation for report headers and chart titles
    pub fn equation(self) -> &'static str {
        match self {
            Basis::Affine => "latency = a + k·size",
            Basis::NLogN => "latency = b·n + c·log(n)",
            Basis::AffineNLogN => "latency = a + b·n + c·n·log(n)",
        }
    }

    /// Suffix of the curve chart file name
    pub fn file_suffix(self) -> &'static str {
        match self {
            Basis::Affine => "linear",
            Basis::NLogN => "n_logn",
            Basis::AffineNLogN => "n_nlogn",
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Basis::Affine => "affine",
            Basis::NLogN => "n-logn",
            Basis::AffineNLogN => "affine-nlogn",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_matches_evaluated_row() {
        for basis in [Basis::Affine, Basis::NLogN, Basis::AffineNLogN] {
            assert_eq!(basis.evaluate(10.0).len(), basis.dimension());
            assert_eq!(basis.term_labels().len(), basis.dimension());
            assert_eq!(basis.term_names().len(), basis.dimension());
        }
    }

    #[test]
    fn test_slope_index_points_at_size_term() {
        for basis in [Basis::Affine, Basis::NLogN, Basis::AffineNLogN] {
            let row = basis.evaluate(7.0);
            assert_eq!(row[basis.slope_index()], 7.0);
        }
    }

    #[test]
    fn test_nlogn_row() {
        let row = Basis::AffineNLogN.evaluate(std::f64::consts::E);
        assert_eq!(row[0], 1.0);
        assert!((row[2] - std::f64::consts::E).abs() < 1e-12);
    }

    #[test]
    fn test_positive_size_requirement() {
        assert!(!Basis::Affine.requires_positive_sizes());
        assert!(Basis::NLogN.requires_positive_sizes());
        assert!(Basis::AffineNLogN.requires_positive_sizes());
    }

    #[test]
    fn test_display_and_serde_names_agree() {
        for basis in [Basis::Affine, Basis::NLogN, Basis::AffineNLogN] {
            let json = serde_json::to_string(&basis).unwrap();
            assert_eq!(json, format!("\"{}\"", basis));
        }
    }
}
