//! HTML charts of fitted scaling models
//!
//! Two renderers share the [`ChartRenderer`] trait:
//! - [`CurveChart`]: measured points with error markers, fitted curve and
//!   confidence band per series
//! - [`SlopeChart`]: fitted slope per series with output-level error markers

use crate::estimator::Analysis;
use crate::regression::{Basis, EstimatorConfig, GridSpacing};
use crate::report::confidence_percent;
use crate::series::Series;
use anyhow::{anyhow, Result};
use charming::{
    component::{Axis, Legend, Title},
    element::{AxisType, ItemStyle, LineStyle, NameLocation, Symbol},
    series::{Bar, Line, Scatter},
    Chart, HtmlRenderer,
};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Series colors, cycled
pub const PALETTE: [&str; 4] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728"];

const WIDTH: u64 = 1000;
const HEIGHT: u64 = 800;

/// Which chart a run writes
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    /// Fitted curves with confidence bands
    #[default]
    Curves,
    /// Bar chart of fitted slopes
    Slopes,
    /// No chart
    #[serde(rename = "none")]
    #[value(name = "none")]
    Disabled,
}

impl ChartKind {
    /// Output file name, or `None` when charts are disabled
    ///
    /// # Example
    /// ```
    /// use scalefit::chart::ChartKind;
    /// use scalefit::regression::Basis;
    ///
    /// assert_eq!(
    ///     ChartKind::Curves.file_name(Basis::Affine, None).as_deref(),
    ///     Some("latency_ci_linear.html")
    /// );
    /// assert_eq!(
    ///     ChartKind::Curves.file_name(Basis::NLogN, Some("Map")).as_deref(),
    ///     Some("latency_Map_n_logn.html")
    /// );
    /// ```
    pub fn file_name(self, basis: Basis, method: Option<&str>) -> Option<String> {
        let stem = match (self, method) {
            (ChartKind::Disabled, _) => return None,
            (ChartKind::Curves, None) if basis == Basis::Affine => "latency_ci_linear".to_string(),
            (ChartKind::Curves, None) => format!("latency_{}", basis.file_suffix()),
            (ChartKind::Curves, Some(m)) => format!("latency_{}_{}", m, basis.file_suffix()),
            (ChartKind::Slopes, _) => {
                let mut stem = "latency_scaling_wls".to_string();
                if basis != Basis::Affine {
                    stem.push('_');
                    stem.push_str(basis.file_suffix());
                }
                if let Some(m) = method {
                    stem.push('_');
                    stem.push_str(m);
                }
                stem
            }
        };
        Some(format!("{}.html", stem))
    }

    pub fn renderer(self) -> Option<Box<dyn ChartRenderer>> {
        match self {
            ChartKind::Curves => Some(Box::new(CurveChart)),
            ChartKind::Slopes => Some(Box::new(SlopeChart)),
            ChartKind::Disabled => None,
        }
    }
}

/// Inputs shared by every chart
#[derive(Debug, Clone, Copy)]
pub struct ChartContext<'a> {
    pub analysis: &'a Analysis,
    pub config: &'a EstimatorConfig,
    pub method: Option<&'a str>,
    pub latency_unit: Option<&'a str>,
}

impl ChartContext<'_> {
    fn latency_axis_name(&self) -> String {
        match self.latency_unit {
            Some(unit) => format!("Latency ({})", unit),
            None => "Latency".to_string(),
        }
    }

    fn method_suffix(&self) -> String {
        self.method.map(|m| format!(" — {}", m)).unwrap_or_default()
    }
}

/// Chart construction and output
pub trait ChartRenderer {
    fn title(&self, ctx: &ChartContext<'_>) -> String;

    fn build(&self, ctx: &ChartContext<'_>) -> Chart;

    /// Write the chart as a standalone HTML page
    fn render(&self, ctx: &ChartContext<'_>, path: &Path) -> Result<()> {
        let chart = self.build(ctx);
        HtmlRenderer::new(self.title(ctx), WIDTH, HEIGHT)
            .save(&chart, path)
            .map_err(|e| anyhow!("Failed to write chart {}: {}", path.display(), e))?;
        tracing::info!(path = %path.display(), "chart written");
        Ok(())
    }
}

/// Measured points, fitted curve and confidence band for every series
#[derive(Debug, Clone, Copy, Default)]
pub struct CurveChart;

impl CurveChart {
    fn uses_log_axes(ctx: &ChartContext<'_>) -> bool {
        ctx.analysis.basis == Basis::NLogN || ctx.config.grid_spacing == GridSpacing::Log
    }
}

fn value_axis(log: bool) -> AxisType {
    if log {
        AxisType::Log
    } else {
        AxisType::Value
    }
}

/// `[size, latency ∓ multiplier·std]` for the bottom and top of each point's error bar
fn error_bar_ends(series: &Series, multiplier: f64) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    series
        .points
        .iter()
        .map(|p| {
            let half_width = multiplier * p.latency_std;
            (
                vec![p.size, p.latency - half_width],
                vec![p.size, p.latency + half_width],
            )
        })
        .unzip()
}

impl ChartRenderer for CurveChart {
    fn title(&self, ctx: &ChartContext<'_>) -> String {
        format!(
            "{} (WLS, {:.0}% CI){}",
            ctx.analysis.basis.equation(),
            (1.0 - ctx.config.band_alpha) * 100.0,
            ctx.method_suffix()
        )
    }

    fn build(&self, ctx: &ChartContext<'_>) -> Chart {
        let log = Self::uses_log_axes(ctx);
        let mut chart = Chart::new()
            .background_color("white")
            .title(Title::new().text(self.title(ctx)))
            .x_axis(
                Axis::new()
                    .type_(value_axis(log))
                    .name("Size")
                    .name_location(NameLocation::Middle)
                    .name_gap(25),
            )
            .y_axis(
                Axis::new()
                    .type_(value_axis(log))
                    .name(ctx.latency_axis_name())
                    .name_location(NameLocation::Middle)
                    .name_gap(60),
            );

        let mut legends = Vec::new();
        for (i, series_fit) in ctx.analysis.fits.iter().enumerate() {
            let color = PALETTE[i % PALETTE.len()];
            let label = series_fit.label.clone();

            let measured: Vec<Vec<f64>> = series_fit
                .series
                .points
                .iter()
                .map(|p| vec![p.size, p.latency])
                .collect();
            chart = chart.series(
                Scatter::new()
                    .name(label.clone())
                    .data(measured)
                    .symbol(Symbol::Circle)
                    .symbol_size(8.0)
                    .item_style(ItemStyle::new().color(color)),
            );

            let (lower, upper) =
                error_bar_ends(&series_fit.series, ctx.config.output_ci_multiplier);
            for ends in [lower, upper] {
                chart = chart.series(
                    Scatter::new()
                        .name(label.clone())
                        .data(ends)
                        .symbol(Symbol::Rect)
                        .symbol_size(4.0)
                        .item_style(ItemStyle::new().color(color)),
                );
            }

            // Skipped band still leaves the measured points on the chart
            let band = match series_fit.band(ctx.config) {
                Ok(band) => band,
                Err(e) => {
                    tracing::warn!("No band for {}: {}", label, e);
                    legends.push(label);
                    continue;
                }
            };

            let curves = [
                (band.iter().map(|p| vec![p.size, p.mean]).collect::<Vec<_>>(), 2),
                (band.iter().map(|p| vec![p.size, p.lower]).collect(), 1),
                (band.iter().map(|p| vec![p.size, p.upper]).collect(), 1),
            ];
            for (data, width) in curves {
                chart = chart.series(
                    Line::new()
                        .name(label.clone())
                        .data(data)
                        .symbol(Symbol::None)
                        .line_style(LineStyle::new().width(width))
                        .item_style(ItemStyle::new().color(color)),
                );
            }

            legends.push(label);
        }

        chart.legend(Legend::new().data(legends).top("8%").left("center"))
    }
}

/// Fitted slope of each series with ± output-multiplier error markers
#[derive(Debug, Clone, Copy, Default)]
pub struct SlopeChart;

impl ChartRenderer for SlopeChart {
    fn title(&self, ctx: &ChartContext<'_>) -> String {
        format!(
            "Slope of {} (WLS){}",
            ctx.analysis.basis.equation(),
            ctx.method_suffix()
        )
    }

    fn build(&self, ctx: &ChartContext<'_>) -> Chart {
        let multiplier = ctx.config.output_ci_multiplier;
        let interval_name = format!("{:.0}% CI", confidence_percent(multiplier));

        let labels: Vec<String> = ctx.analysis.fits.iter().map(|f| f.label.clone()).collect();
        let slopes: Vec<f64> = ctx.analysis.fits.iter().map(|f| f.fit.slope()).collect();
        // Markers are placed by category index on the x axis
        let (lower, upper): (Vec<Vec<f64>>, Vec<Vec<f64>>) = ctx
            .analysis
            .fits
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let half_width = multiplier * f.fit.slope_std_error();
                let x = i as f64;
                (
                    vec![x, f.fit.slope() - half_width],
                    vec![x, f.fit.slope() + half_width],
                )
            })
            .unzip();

        let slope_axis_name = match ctx.latency_unit {
            Some(unit) => format!("Slope ({} per size unit)", unit),
            None => "Slope".to_string(),
        };

        Chart::new()
            .background_color("white")
            .title(Title::new().text(self.title(ctx)))
            .x_axis(
                Axis::new()
                    .type_(AxisType::Category)
                    .data(labels)
                    .name("Benchmark")
                    .name_location(NameLocation::Middle)
                    .name_gap(25),
            )
            .y_axis(
                Axis::new()
                    .type_(AxisType::Value)
                    .name(slope_axis_name)
                    .name_location(NameLocation::Middle)
                    .name_gap(80),
            )
            .series(
                Bar::new()
                    .name("slope")
                    .data(slopes)
                    .item_style(ItemStyle::new().color("salmon")),
            )
            .series(
                Scatter::new()
                    .name(interval_name.clone())
                    .data(lower)
                    .symbol(Symbol::Rect)
                    .symbol_size(6.0)
                    .item_style(ItemStyle::new().color("black")),
            )
            .series(
                Scatter::new()
                    .name(interval_name.clone())
                    .data(upper)
                    .symbol(Symbol::Rect)
                    .symbol_size(6.0)
                    .item_style(ItemStyle::new().color("black")),
            )
            .legend(
                Legend::new()
                    .data(vec!["slope".to_string(), interval_name])
                    .top("8%")
                    .left("center"),
            )
    }
}
