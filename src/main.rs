use anyhow::{Context, Result};
use clap::Parser;
use scalefit::{
    bench_csv::{load_bench_csv, BenchTable},
    chart::ChartContext,
    cli::{Cli, OutputFormat},
    config::Config,
    estimator::{estimate, Analysis},
    json_output::JsonOutput,
    report::TextReport,
};
use std::fs;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Resolve configuration: file (if any), then command-line overrides
fn load_config(args: &Cli) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    args.apply_to(&mut config);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    Ok(config)
}

/// A unit contradicting the declared score kind is suspicious but not fatal
fn warn_on_unit_mismatch(table: &BenchTable, config: &Config) {
    let kind = config.estimator.score_kind;
    for unit in table.conflicting_units(kind) {
        tracing::warn!(unit, %kind, "unit contradicts declared score kind");
        eprintln!(
            "Warning: unit '{}' does not look like {} scores (see --score-kind)",
            unit, kind
        );
    }
}

/// Write the configured chart, if any
fn write_chart(
    config: &Config,
    analysis: &Analysis,
    method: Option<&str>,
    latency_unit: Option<&str>,
) -> Result<()> {
    let (Some(renderer), Some(path)) = (
        config.output.chart.renderer(),
        config.output.chart_path(analysis.basis, method),
    ) else {
        return Ok(());
    };

    if analysis.fits.is_empty() {
        tracing::info!("no fitted series, skipping chart");
        return Ok(());
    }

    fs::create_dir_all(&config.output.plot_dir).with_context(|| {
        format!(
            "Failed to create plot directory {}",
            config.output.plot_dir.display()
        )
    })?;

    let ctx = ChartContext {
        analysis,
        config: &config.estimator,
        method,
        latency_unit,
    };
    renderer.render(&ctx, &path)?;

    if config.output.format == OutputFormat::Text {
        println!("\nChart saved to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = load_config(&args)?;
    let method = args.method.as_deref();

    let input = config.output.input_path(method);
    let table = load_bench_csv(&input)
        .with_context(|| format!("Failed to load benchmark table {}", input.display()))?;
    warn_on_unit_mismatch(&table, &config);

    let analysis = estimate(&table.measurements, &config.estimator);
    let latency_unit = table.latency_unit(config.estimator.score_kind);

    match config.output.format {
        OutputFormat::Text => {
            let report =
                TextReport::new(&analysis, &config.estimator, method, latency_unit.as_deref());
            print!("{}", report.to_report_string());
        }
        OutputFormat::Json => {
            let output = JsonOutput::from_analysis(&analysis, method, latency_unit.as_deref());
            println!("{}", output.to_json()?);
        }
    }

    write_chart(&config, &analysis, method, latency_unit.as_deref())?;

    Ok(())
}
