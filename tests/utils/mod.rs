// Shared fixtures for integration tests
//
// Writes JMH-style CSV tables into temporary directories.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const HEADER: &str =
    "\"Benchmark\",\"Mode\",\"Threads\",\"Samples\",\"Score\",\"Score Error (99.9%)\",\"Unit\",\"Param: size\"";

/// One benchmark row as JMH writes it
pub fn jmh_row(benchmark: &str, size: f64, score: f64, error: f64, unit: &str) -> String {
    let mode = if unit.starts_with("ops/") { "thrpt" } else { "avgt" };
    format!(
        "\"{}\",\"{}\",1,5,{},{},\"{}\",{}",
        benchmark, mode, score, error, unit, size
    )
}

/// Rows of a linear benchmark with a small alternating wiggle
pub fn linear_rows(benchmark: &str, intercept: f64, slope: f64) -> Vec<String> {
    [10.0, 100.0, 1000.0, 10000.0]
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            let wiggle = if i % 2 == 0 { 0.05 } else { -0.05 };
            jmh_row(benchmark, n, intercept + slope * n + wiggle, 0.3, "ns/op")
        })
        .collect()
}

/// Write `HEADER` plus `rows` to `dir/file_name`
pub fn write_bench_csv(dir: &Path, file_name: &str, rows: &[String]) -> PathBuf {
    let mut text = String::from(HEADER);
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    let path = dir.join(file_name);
    fs::write(&path, text).expect("write bench csv");
    path
}

/// Temp directory holding `bench.csv` with the pkg.Foo example
pub fn foo_workspace() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    let rows = vec![
        jmh_row("pkg.Foo", 10.0, 5.0, 0.1, "ns/op"),
        jmh_row("pkg.Foo", 100.0, 50.0, 0.1, "ns/op"),
        jmh_row("pkg.Foo", 1000.0, 500.0, 0.1, "ns/op"),
    ];
    write_bench_csv(dir.path(), "bench.csv", &rows);
    dir
}

/// Temp directory with a prefix-matched pair (aMap/bMap) scaling differently
pub fn map_pair_workspace(file_name: &str) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    let mut rows = linear_rows("org.bench.MapBench.aMap", 20.0, 0.001);
    rows.extend(linear_rows("org.bench.MapBench.bMap", 25.0, 0.01));
    rows.extend(linear_rows("org.bench.MapBench.cSet", 25.0, 0.01));
    write_bench_csv(dir.path(), file_name, &rows);
    dir
}
