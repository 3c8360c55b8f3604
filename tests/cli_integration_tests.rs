//! End-to-end tests of the scalefit binary
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests

mod utils;

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_text_report_and_chart() {
    let dir = utils::foo_workspace();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("scalefit");
    cmd.current_dir(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Approximation: latency = a + k·size"))
        .stdout(predicate::str::contains("Foo"))
        .stdout(predicate::str::contains("(0.500 ± "))
        .stdout(predicate::str::contains("ns/op"))
        .stdout(predicate::str::contains("Chart saved to"));

    let chart = dir.path().join("plots").join("latency_ci_linear.html");
    assert!(chart.exists());
    let html = fs::read_to_string(chart).unwrap();
    assert!(html.contains("Foo"));
}

#[test]
fn test_method_suffix_selects_input_and_output() {
    let dir = utils::map_pair_workspace("bench_Map.csv");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("scalefit");
    cmd.current_dir(dir.path())
        .arg("Map")
        .arg("--prefix-len")
        .arg("1");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("— Map"))
        .stdout(predicate::str::contains("aMap vs bMap"))
        .stdout(predicate::str::contains("significantly different? YES"))
        .stdout(predicate::str::contains("aMap vs cSet").not());

    assert!(dir.path().join("plots/latency_Map_linear.html").exists());
}

#[test]
fn test_json_output_parses() {
    let dir = utils::map_pair_workspace("bench.csv");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("scalefit");
    cmd.arg("--data-dir")
        .arg(dir.path())
        .arg("--format")
        .arg("json")
        .arg("--chart")
        .arg("none")
        .arg("--all-pairs");

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["format"], "scalefit-json-v1");
    assert_eq!(parsed["basis"], "affine");
    assert_eq!(parsed["series"].as_array().unwrap().len(), 3);
    assert_eq!(parsed["comparisons"].as_array().unwrap().len(), 3);
    assert!(!dir.path().join("plots").exists());
}

#[test]
fn test_slopes_chart_in_plot_dir() {
    let dir = utils::map_pair_workspace("bench.csv");
    let plots = dir.path().join("out");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("scalefit");
    cmd.arg("--data-dir")
        .arg(dir.path())
        .arg("--plot-dir")
        .arg(&plots)
        .arg("--chart")
        .arg("slopes");

    cmd.assert().success();
    assert!(plots.join("latency_scaling_wls.html").exists());
}

#[test]
fn test_nlogn_model_names_chart() {
    let dir = utils::map_pair_workspace("bench.csv");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("scalefit");
    cmd.current_dir(dir.path()).arg("--model").arg("n-logn");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("latency = b·n + c·log(n)"))
        .stdout(predicate::str::contains("·log(n)"));
    assert!(dir.path().join("plots/latency_n_logn.html").exists());
}

#[test]
fn test_short_series_reported_as_skipped() {
    let dir = TempDir::new().unwrap();
    let mut rows = utils::linear_rows("pkg.Good", 1.0, 0.5);
    rows.push(utils::jmh_row("pkg.Lonely", 10.0, 3.0, 0.1, "ns/op"));
    utils::write_bench_csv(dir.path(), "bench.csv", &rows);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("scalefit");
    cmd.current_dir(dir.path()).arg("--chart").arg("none");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Good"))
        .stdout(predicate::str::contains("Lonely: skipped"));
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("scalefit");
    cmd.current_dir(dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load benchmark table"))
        .stderr(predicate::str::contains("bench.csv"));
}

#[test]
fn test_missing_column_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("bench.csv"),
        "Benchmark,Score,Score Error (99.9%)\npkg.Foo,1.0,0.1\n",
    )
    .unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("scalefit");
    cmd.current_dir(dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Param: size"));
}

#[test]
fn test_throughput_unit_mismatch_warns() {
    let dir = utils::foo_workspace();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("scalefit");
    cmd.current_dir(dir.path())
        .arg("--score-kind")
        .arg("throughput")
        .arg("--chart")
        .arg("none");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Warning: unit 'ns/op'"));
}

#[test]
fn test_config_file_applied() {
    let dir = utils::map_pair_workspace("bench.csv");
    let config = dir.path().join("scalefit.toml");
    fs::write(
        &config,
        "[estimator]\npair_prefix_len = 1\n\n[output]\nchart = \"none\"\n",
    )
    .unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("scalefit");
    cmd.current_dir(dir.path()).arg("--config").arg(&config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("prefix match, 1 chars stripped"))
        .stdout(predicate::str::contains("aMap vs bMap"));
    assert!(!dir.path().join("plots").exists());
}

#[test]
fn test_invalid_threshold_rejected() {
    let dir = utils::foo_workspace();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("scalefit");
    cmd.current_dir(dir.path()).arg("--threshold").arg("0");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("p_value_threshold"));
}

#[test]
fn test_invalid_model_rejected() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("scalefit");
    cmd.arg("--model").arg("cubic");

    cmd.assert().failure();
}

#[test]
fn test_unwritable_plot_dir_fails() {
    let dir = utils::foo_workspace();
    fs::write(dir.path().join("blocker"), "not a directory").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("scalefit");
    cmd.current_dir(dir.path())
        .arg("--plot-dir")
        .arg("blocker/sub");

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Foo"))
        .stderr(predicate::str::contains("Failed to create plot directory"));
    assert!(!dir.path().join("blocker/sub").exists());
}
