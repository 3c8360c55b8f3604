//! Human-readable console report
//!
//! One line per fitted series, one warning line per skipped series, then
//! the pairwise slope verdicts.

use crate::estimator::{Analysis, SeriesFailure, SeriesFit};
use crate::regression::{normal_cdf, EstimatorConfig, PairingRule, SlopeComparison};

/// Width the series label is padded to
const LABEL_WIDTH: usize = 20;

/// Width the "A vs B" column of the comparison table is padded to
const PAIR_WIDTH: usize = 35;

/// Console report for one analysis run
#[derive(Debug)]
pub struct TextReport<'a> {
    analysis: &'a Analysis,
    config: &'a EstimatorConfig,
    method: Option<&'a str>,
    latency_unit: Option<&'a str>,
}

impl<'a> TextReport<'a> {
    pub fn new(
        analysis: &'a Analysis,
        config: &'a EstimatorConfig,
        method: Option<&'a str>,
        latency_unit: Option<&'a str>,
    ) -> Self {
        Self {
            analysis,
            config,
            method,
            latency_unit,
        }
    }

    /// Generate the full report text
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        report.push_str(&format!(
            "\nApproximation: {} (WLS, {:.0}% CI){}:\n\n",
            self.analysis.basis.equation(),
            confidence_percent(self.config.output_ci_multiplier),
            self.method.map(|m| format!(" — {}", m)).unwrap_or_default()
        ));

        if self.analysis.is_empty() {
            report.push_str("No benchmark series found.\n");
            return report;
        }

        for series_fit in &self.analysis.fits {
            report.push_str(&self.format_fit(series_fit));
            report.push('\n');
        }

        for failure in &self.analysis.failures {
            report.push_str(&Self::format_failure(failure));
            report.push('\n');
        }

        report.push_str(&self.comparison_header());
        if self.analysis.comparisons.is_empty() {
            report.push_str("(no corresponding pairs)\n");
        }
        for comparison in &self.analysis.comparisons {
            report.push_str(&Self::format_comparison(comparison));
            report.push('\n');
        }

        report
    }

    /// `label → latency = (a ± h) + (b ± h)·size    [RMSE = r unit]`
    ///
    /// Each half-width h is the output multiplier times the standard error.
    fn format_fit(&self, series_fit: &SeriesFit) -> String {
        let fit = &series_fit.fit;
        let multiplier = self.config.output_ci_multiplier;
        let terms: Vec<String> = fit
            .basis
            .term_labels()
            .iter()
            .zip(fit.coefficients.iter().zip(&fit.std_errors))
            .map(|(suffix, (value, se))| {
                format!(
                    "({} ± {}){}",
                    format_number(*value),
                    format_number(multiplier * se),
                    suffix
                )
            })
            .collect();

        let unit = self.latency_unit.map(|u| format!(" {}", u)).unwrap_or_default();
        let mut line = format!(
            "{} → latency = {}    [RMSE = {}{}]",
            pad(&series_fit.label, LABEL_WIDTH),
            terms.join(" + "),
            format_number(fit.rmse),
            unit
        );
        if fit.is_exactly_determined() {
            line.push_str(" (exact fit: errors from measurement uncertainty only)");
        }
        line
    }

    fn format_failure(failure: &SeriesFailure) -> String {
        format!("⚠️  {}: skipped ({})", failure.label, failure.error)
    }

    fn comparison_header(&self) -> String {
        let rule = match self.config.pairing_rule() {
            PairingRule::StrippedPrefix(n) => format!("prefix match, {} chars stripped", n),
            PairingRule::AllPairs => "all pairs".to_string(),
        };
        format!(
            "\nPairwise hypothesis test ({}): are slopes significantly different (p < {})?\n\n",
            rule, self.config.p_value_threshold
        )
    }

    fn format_comparison(comparison: &SlopeComparison) -> String {
        let test = &comparison.test;
        format!(
            "{}Δslope = {}, z = {:.2}, p = {:.4} → significantly different? {}",
            pad(
                &format!("{} vs {}", comparison.first, comparison.second),
                PAIR_WIDTH
            ),
            format_number(test.slope_difference),
            test.z,
            test.p_value,
            if test.significant { "YES" } else { "NO" }
        )
    }
}

/// Two-sided confidence level of a z-multiplier, in percent
pub fn confidence_percent(multiplier: f64) -> f64 {
    (2.0 * normal_cdf(multiplier) - 1.0) * 100.0
}

/// Fixed-point for ordinary magnitudes, scientific otherwise
pub fn format_number(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 || !value.is_finite() || (1e-3..1e5).contains(&magnitude) {
        format!("{:.3}", value)
    } else {
        format!("{:.2e}", value)
    }
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}
