#![no_main]

use libfuzzer_sys::fuzz_target;
use scalefit::bench_csv::parse_bench_csv;
use scalefit::estimator::estimate;
use scalefit::regression::EstimatorConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing and estimation must not panic on any table
        if let Ok(table) = parse_bench_csv(input) {
            let _ = estimate(&table.measurements, &EstimatorConfig::default());
        }
    }
});
