//! Scaling estimator: measurements in, fits and slope comparisons out
//!
//! Problems are isolated per series: a series that cannot be converted or
//! fitted is recorded as a [`SeriesFailure`] and the rest of the analysis
//! carries on.

use crate::measurement::{Measurement, ScoreKind};
use crate::regression::{
    confidence_band, fit_series, pairwise_comparisons, Basis, EstimateError, EstimatorConfig, Fit,
    Prediction, SlopeComparison,
};
use crate::series::{group_by_benchmark, Series};

/// A series together with its fitted model
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFit {
    pub name: String,
    pub label: String,
    pub series: Series,
    pub fit: Fit,
}

impl SeriesFit {
    /// Confidence band over the observed size range, as configured
    pub fn band(&self, config: &EstimatorConfig) -> crate::regression::Result<Vec<Prediction>> {
        confidence_band(
            &self.fit,
            config.band_alpha,
            config.prediction_points,
            config.grid_spacing,
            config.band_distribution,
        )
    }
}

/// A series that could not be fitted
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFailure {
    pub name: String,
    pub label: String,
    pub error: EstimateError,
}

/// Everything one run produces, in report order
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub basis: Basis,
    pub score_kind: ScoreKind,
    /// Sorted by label, then full name
    pub fits: Vec<SeriesFit>,
    /// Sorted by label, then full name
    pub failures: Vec<SeriesFailure>,
    pub comparisons: Vec<SlopeComparison>,
}

impl Analysis {
    pub fn is_empty(&self) -> bool {
        self.fits.is_empty() && self.failures.is_empty()
    }
}

/// Fit one benchmark's measurements
pub fn fit_benchmark(
    name: &str,
    measurements: &[&Measurement],
    config: &EstimatorConfig,
) -> crate::regression::Result<SeriesFit> {
    let series = Series::from_measurements(
        name,
        measurements,
        config.score_kind,
        config.input_ci_multiplier,
    )?;
    let fit = fit_series(&series, config.basis, config.weighting)?;

    Ok(SeriesFit {
        name: series.name.clone(),
        label: series.label.clone(),
        series,
        fit,
    })
}

/// Run the full estimation over a table of measurements
///
/// # Example
/// ```
/// use scalefit::estimator::estimate;
/// use scalefit::measurement::Measurement;
/// use scalefit::regression::EstimatorConfig;
///
/// let rows = vec![
///     Measurement::new("pkg.Foo", 10.0, 5.0, 0.1),
///     Measurement::new("pkg.Foo", 100.0, 50.0, 0.1),
///     Measurement::new("pkg.Foo", 1000.0, 500.0, 0.1),
/// ];
/// let analysis = estimate(&rows, &EstimatorConfig::default());
/// assert!((analysis.fits[0].fit.slope() - 0.5).abs() < 1e-9);
/// ```
pub fn estimate(measurements: &[Measurement], config: &EstimatorConfig) -> Analysis {
    let mut fits = Vec::new();
    let mut failures = Vec::new();

    for (name, rows) in group_by_benchmark(measurements) {
        match fit_benchmark(name, &rows, config) {
            Ok(series_fit) => fits.push(series_fit),
            Err(error) => {
                tracing::warn!("Skipping series {}: {}", name, error);
                failures.push(SeriesFailure {
                    name: name.to_string(),
                    label: crate::measurement::display_label(name).to_string(),
                    error,
                });
            }
        }
    }

    fits.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.name.cmp(&b.name)));
    failures.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.name.cmp(&b.name)));

    let labelled: Vec<(&str, &Fit)> = fits.iter().map(|f| (f.label.as_str(), &f.fit)).collect();
    let comparisons =
        pairwise_comparisons(&labelled, config.pairing_rule(), config.p_value_threshold);

    tracing::info!(
        fitted = fits.len(),
        failed = failures.len(),
        comparisons = comparisons.len(),
        basis = %config.basis,
        "estimation complete"
    );

    Analysis {
        basis: config.basis,
        score_kind: config.score_kind,
        fits,
        failures,
        comparisons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_rows(name: &str, slope: f64, intercept: f64) -> Vec<Measurement> {
        [10.0, 100.0, 1000.0, 10000.0]
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                // Small alternating wiggle keeps the residual variance non-zero
                let wiggle = if i % 2 == 0 { 0.01 } else { -0.01 };
                Measurement::new(name, n, intercept + slope * n + wiggle, 0.05)
            })
            .collect()
    }

    #[test]
    fn test_results_sorted_by_label() {
        let mut rows = linear_rows("z.pkg.Beta", 0.5, 1.0);
        rows.extend(linear_rows("a.pkg.Gamma", 0.5, 1.0));
        rows.extend(linear_rows("m.pkg.Alpha", 0.5, 1.0));

        let analysis = estimate(&rows, &EstimatorConfig::default());
        let labels: Vec<&str> = analysis.fits.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_bad_series_isolated() {
        let mut rows = linear_rows("pkg.Good", 0.5, 1.0);
        rows.push(Measurement::new("pkg.Lonely", 10.0, 5.0, 0.1));

        let analysis = estimate(&rows, &EstimatorConfig::default());
        assert_eq!(analysis.fits.len(), 1);
        assert_eq!(analysis.failures.len(), 1);
        assert_eq!(analysis.failures[0].label, "Lonely");
        assert!(matches!(
            analysis.failures[0].error,
            EstimateError::InsufficientData { actual: 1, .. }
        ));
    }

    #[test]
    fn test_zero_throughput_fails_only_its_series() {
        let mut rows = vec![
            Measurement::new("pkg.Zero", 10.0, 0.0, 0.01),
            Measurement::new("pkg.Zero", 20.0, 0.1, 0.01),
        ];
        rows.extend([
            Measurement::new("pkg.Fine", 10.0, 0.2, 0.001),
            Measurement::new("pkg.Fine", 20.0, 0.1, 0.001),
            Measurement::new("pkg.Fine", 40.0, 0.05, 0.001),
        ]);

        let analysis = estimate(&rows, &EstimatorConfig::throughput());
        assert_eq!(analysis.fits.len(), 1);
        assert_eq!(analysis.fits[0].label, "Fine");
        assert!(matches!(
            analysis.failures[0].error,
            EstimateError::InvalidInput(_)
        ));
    }

    #[test]
    fn test_prefix_pairs_compared() {
        let mut rows = linear_rows("pkg.aMap", 0.5, 1.0);
        rows.extend(linear_rows("pkg.bMap", 0.9, 1.0));
        rows.extend(linear_rows("pkg.cSet", 0.5, 1.0));

        let config = EstimatorConfig {
            pair_prefix_len: 1,
            ..EstimatorConfig::default()
        };
        let analysis = estimate(&rows, &config);

        assert_eq!(analysis.comparisons.len(), 1);
        let c = &analysis.comparisons[0];
        assert_eq!((c.first.as_str(), c.second.as_str()), ("aMap", "bMap"));
        assert!(c.test.significant);
    }

    #[test]
    fn test_all_pairs_compared() {
        let mut rows = linear_rows("pkg.A", 0.5, 1.0);
        rows.extend(linear_rows("pkg.B", 0.5, 1.0));
        rows.extend(linear_rows("pkg.C", 0.5, 1.0));

        let analysis = estimate(&rows, &EstimatorConfig::all_pairs());
        assert_eq!(analysis.comparisons.len(), 3);
    }

    #[test]
    fn test_band_spans_observed_range() {
        let rows = linear_rows("pkg.Foo", 0.5, 1.0);
        let config = EstimatorConfig::default();
        let analysis = estimate(&rows, &config);
        let band = analysis.fits[0].band(&config).unwrap();

        assert_eq!(band.len(), config.prediction_points);
        assert_eq!(band[0].size, 10.0);
        assert_eq!(band[band.len() - 1].size, 10000.0);
        assert!(band.iter().all(|p| p.lower <= p.mean && p.mean <= p.upper));
    }

    #[test]
    fn test_empty_input() {
        let analysis = estimate(&[], &EstimatorConfig::default());
        assert!(analysis.is_empty());
        assert!(analysis.comparisons.is_empty());
    }
}
