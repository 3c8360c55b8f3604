// Pairwise slope significance testing
//
// Two fitted slopes are compared with a large-sample z-test:
//   z = (b_A − b_B) / sqrt(se_A² + se_B²),  p = 2·(1 − Φ(|z|))
// Only pairs whose labels correspond under the pairing rule are tested;
// every other pair is skipped without comment.

use crate::regression::statistics::two_sided_p_value;
use crate::regression::wls::Fit;
use serde::{Deserialize, Serialize};

/// Which pairs of series get a slope test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PairingRule {
    /// Labels must agree after dropping this many leading characters
    /// (`aMap` and `bMap` correspond with 1; `a_Map`/`b_Map` with 2)
    StrippedPrefix(usize),
    /// Every pair
    AllPairs,
}

impl PairingRule {
    /// Whether two labels correspond under this rule
    ///
    /// # Example
    /// ```
    /// use scalefit::regression::PairingRule;
    ///
    /// let rule = PairingRule::StrippedPrefix(2);
    /// assert!(rule.matches("a_Map", "b_Map"));
    /// assert!(!rule.matches("a_Map", "b_Set"));
    /// ```
    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            PairingRule::AllPairs => true,
            PairingRule::StrippedPrefix(n) => a.chars().skip(n).eq(b.chars().skip(n)),
        }
    }
}

/// Outcome of a slope-difference z-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlopeTest {
    pub slope_difference: f64,
    pub pooled_std_error: f64,
    pub z: f64,
    pub p_value: f64,
    /// p < threshold
    pub significant: bool,
}

/// Slope test between two named series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlopeComparison {
    pub first: String,
    pub second: String,
    #[serde(flatten)]
    pub test: SlopeTest,
}

/// z-test for equality of two slopes given their standard errors
///
/// A zero pooled standard error gives z = 0, p = 1 for equal slopes and
/// z = ±∞, p = 0 otherwise.
pub fn compare_slopes(
    slope_a: f64,
    se_a: f64,
    slope_b: f64,
    se_b: f64,
    p_value_threshold: f64,
) -> SlopeTest {
    let slope_difference = slope_a - slope_b;
    let pooled_std_error = (se_a * se_a + se_b * se_b).sqrt();

    let z = if pooled_std_error > 0.0 {
        slope_difference / pooled_std_error
    } else if slope_difference == 0.0 {
        0.0
    } else {
        f64::INFINITY.copysign(slope_difference)
    };
    let p_value = two_sided_p_value(z);

    SlopeTest {
        slope_difference,
        pooled_std_error,
        z,
        p_value,
        significant: p_value < p_value_threshold,
    }
}

/// Test every corresponding pair (i < j, in the given order)
///
/// Each entry is a series label and its fit.
pub fn pairwise_comparisons(
    fits: &[(&str, &Fit)],
    rule: PairingRule,
    p_value_threshold: f64,
) -> Vec<SlopeComparison> {
    let mut comparisons = Vec::new();

    for (i, &(label_a, fit_a)) in fits.iter().enumerate() {
        for &(label_b, fit_b) in &fits[i + 1..] {
            if !rule.matches(label_a, label_b) {
                continue;
            }

            let test = compare_slopes(
                fit_a.slope(),
                fit_a.slope_std_error(),
                fit_b.slope(),
                fit_b.slope_std_error(),
                p_value_threshold,
            );
            tracing::debug!(
                first = %label_a,
                second = %label_b,
                z = test.z,
                p = test.p_value,
                "compared slopes"
            );
            comparisons.push(SlopeComparison {
                first: label_a.to_string(),
                second: label_b.to_string(),
                test,
            });
        }
    }

    comparisons
}
