//! Grouping measurements into per-benchmark series

use crate::measurement::{display_label, LatencyPoint, Measurement, ScoreKind};
use crate::regression::Result;
use std::collections::BTreeMap;

/// All latency points of one benchmark, ordered by ascending size
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Fully qualified benchmark name
    pub name: String,
    /// Final dotted segment of `name`
    pub label: String,
    pub points: Vec<LatencyPoint>,
}

impl Series {
    /// Build a series from already-converted points (sorted here)
    pub fn new(name: impl Into<String>, mut points: Vec<LatencyPoint>) -> Self {
        let name = name.into();
        points.sort_by(|a, b| a.size.total_cmp(&b.size));
        Self {
            label: display_label(&name).to_string(),
            name,
            points,
        }
    }

    /// Convert the measurements of one benchmark into a series
    ///
    /// Fails on the first measurement that cannot be converted (zero
    /// throughput); the caller reports that against this series only.
    pub fn from_measurements(
        name: &str,
        measurements: &[&Measurement],
        kind: ScoreKind,
        input_multiplier: f64,
    ) -> Result<Self> {
        let points = measurements
            .iter()
            .map(|m| m.to_latency(kind, input_multiplier))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(name, points))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn sizes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.size).collect()
    }

    pub fn latencies(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.latency).collect()
    }

}

/// Partition measurements by exact benchmark name
///
/// Keys iterate in lexicographic order of the full name; row order within a
/// group is preserved (sorting by size happens in [`Series::new`]).
pub fn group_by_benchmark(measurements: &[Measurement]) -> BTreeMap<&str, Vec<&Measurement>> {
    let mut groups: BTreeMap<&str, Vec<&Measurement>> = BTreeMap::new();
    for m in measurements {
        groups.entry(m.benchmark.as_str()).or_default().push(m);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::Z_999;

    fn rows() -> Vec<Measurement> {
        vec![
            Measurement::new("pkg.B", 100.0, 50.0, 1.0),
            Measurement::new("pkg.A", 10.0, 5.0, 1.0),
            Measurement::new("pkg.B", 10.0, 5.0, 1.0),
            Measurement::new("pkg.A", 1000.0, 500.0, 1.0),
            Measurement::new("pkg.A", 100.0, 50.0, 1.0),
        ]
    }

    #[test]
    fn test_group_by_exact_name() {
        let data = rows();
        let groups = group_by_benchmark(&data);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["pkg.A"].len(), 3);
        assert_eq!(groups["pkg.B"].len(), 2);
        let names: Vec<&str> = groups.keys().copied().collect();
        assert_eq!(names, vec!["pkg.A", "pkg.B"]);
    }

    #[test]
    fn test_series_sorted_by_size() {
        let data = rows();
        let groups = group_by_benchmark(&data);
        let series =
            Series::from_measurements("pkg.A", &groups["pkg.A"], ScoreKind::TimePerOp, Z_999)
                .unwrap();
        assert_eq!(series.sizes(), vec![10.0, 100.0, 1000.0]);
        assert_eq!(series.latencies(), vec![5.0, 50.0, 500.0]);
        assert_eq!(series.label, "A");
    }

    #[test]
    fn test_series_conversion_failure_propagates() {
        let data = vec![
            Measurement::new("pkg.A", 10.0, 0.5, 0.01),
            Measurement::new("pkg.A", 20.0, 0.0, 0.01),
        ];
        let refs: Vec<&Measurement> = data.iter().collect();
        assert!(Series::from_measurements("pkg.A", &refs, ScoreKind::Throughput, Z_999).is_err());
    }

    #[test]
    fn test_empty_series() {
        let series = Series::new("pkg.Empty", Vec::new());
        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
    }
}
