// Distribution functions for slope tests and confidence bands
//
// The pairwise slope test needs the standard normal CDF; prediction bands
// need Student-t quantiles with n - p degrees of freedom (the convention
// used for WLS mean-prediction intervals).
//
// Scientific Foundation:
// - Φ(x) and Φ⁻¹(p) from `statrs::distribution::Normal`
// - Student-t quantiles from `statrs::distribution::StudentsT`
//   (inverse of the regularized incomplete beta function)

use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

fn standard_normal() -> Option<Normal> {
    Normal::new(0.0, 1.0).ok()
}

/// Standard normal CDF: Φ(x) = (1 + erf(x/√2)) / 2
#[inline]
pub fn normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    standard_normal().map_or(f64::NAN, |n| n.cdf(x))
}

/// Two-sided p-value for a standard normal test statistic: 2·(1 − Φ(|z|))
///
/// Returns 1.0 for `z == 0` and 0.0 for infinite `z`.
pub fn two_sided_p_value(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    (2.0 * (1.0 - normal_cdf(z.abs()))).clamp(0.0, 1.0)
}

/// Inverse of the standard normal CDF
///
/// # Example
/// ```
/// use scalefit::regression::normal_quantile;
///
/// assert!((normal_quantile(0.975) - 1.959964).abs() < 1e-5);
/// ```
pub fn normal_quantile(p: f64) -> f64 {
    if !(0.0..=1.0).contains(&p) || p.is_nan() {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }
    standard_normal().map_or(f64::NAN, |n| n.inverse_cdf(p))
}

/// Inverse of the Student-t CDF with `df` degrees of freedom
///
/// `df == 0` or an infinite `df` degrade to the normal quantile.
pub fn student_t_quantile(p: f64, df: f64) -> f64 {
    if !(0.0..=1.0).contains(&p) || p.is_nan() {
        return f64::NAN;
    }
    if df <= 0.0 || df.is_infinite() {
        return normal_quantile(p);
    }
    if p == 0.5 {
        return 0.0;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }
    StudentsT::new(0.0, 1.0, df).map_or(f64::NAN, |t| t.inverse_cdf(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_cdf_reference_values() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-12);
        assert!((normal_cdf(1.96) - 0.975_002).abs() < 1e-5);
        assert!((normal_cdf(-1.96) - 0.024_998).abs() < 1e-5);
        assert!((normal_cdf(3.29) - 0.999_499).abs() < 1e-5);
    }

    #[test]
    fn test_two_sided_p_value() {
        assert_eq!(two_sided_p_value(0.0), 1.0);
        assert!((two_sided_p_value(1.96) - 0.05).abs() < 1e-3);
        assert!((two_sided_p_value(-1.96) - 0.05).abs() < 1e-3);
        assert_eq!(two_sided_p_value(f64::INFINITY), 0.0);
        assert!(two_sided_p_value(f64::NAN).is_nan());
    }

    #[test]
    fn test_normal_quantile_inverts_cdf() {
        for &p in &[0.001, 0.025, 0.1, 0.5, 0.9, 0.975, 0.9995] {
            let x = normal_quantile(p);
            assert!((normal_cdf(x) - p).abs() < 1e-9, "p={p}, x={x}");
        }
        assert!((normal_quantile(0.9995) - 3.2905).abs() < 1e-3);
    }

    #[test]
    fn test_normal_quantile_out_of_range() {
        assert!(normal_quantile(1.5).is_nan());
        assert!(normal_quantile(-0.1).is_nan());
        assert_eq!(normal_quantile(1.0), f64::INFINITY);
        assert_eq!(normal_quantile(0.0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_student_t_quantile_reference_values() {
        // Standard two-sided 95% critical values
        assert!((student_t_quantile(0.975, 1.0) - 12.706).abs() < 1e-3);
        assert!((student_t_quantile(0.975, 2.0) - 4.303).abs() < 1e-3);
        assert!((student_t_quantile(0.975, 3.0) - 3.182).abs() < 1e-3);
        assert!((student_t_quantile(0.975, 10.0) - 2.228).abs() < 1e-3);
        assert!((student_t_quantile(0.975, 30.0) - 2.042).abs() < 1e-3);
        assert!((student_t_quantile(0.975, 1000.0) - 1.962).abs() < 1e-3);
    }

    #[test]
    fn test_student_t_quantile_symmetry() {
        for &df in &[1.0, 3.0, 10.0] {
            let upper = student_t_quantile(0.9, df);
            let lower = student_t_quantile(0.1, df);
            assert!((upper + lower).abs() < 1e-8, "df={df}");
        }
    }

    #[test]
    fn test_student_t_quantile_zero_df_is_normal() {
        assert_eq!(student_t_quantile(0.975, 0.0), normal_quantile(0.975));
        assert_eq!(
            student_t_quantile(0.975, f64::INFINITY),
            normal_quantile(0.975)
        );
    }

    #[test]
    fn test_student_t_quantile_median_and_bounds() {
        assert_eq!(student_t_quantile(0.5, 4.0), 0.0);
        assert_eq!(student_t_quantile(1.0, 4.0), f64::INFINITY);
        assert!(student_t_quantile(1.2, 4.0).is_nan());
    }
}
