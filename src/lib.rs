//! Scalefit - latency scaling estimator for JMH benchmark results
//!
//! This library reads benchmark tables whose scores carry confidence
//! intervals, fits weighted least-squares models of latency against input
//! size, propagates coefficient uncertainty into confidence bands, and tests
//! whether corresponding benchmarks scale with significantly different slopes.

pub mod bench_csv;
pub mod chart;
pub mod cli;
pub mod config;
pub mod estimator;
pub mod json_output;
pub mod measurement;
pub mod regression;
pub mod report;
pub mod series;
