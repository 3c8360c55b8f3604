//! CSV input for JMH-style benchmark tables
//!
//! Expected header (JMH `-rff results.csv` export, extra columns ignored):
//!
//! ```csv
//! "Benchmark","Mode","Threads","Samples","Score","Score Error (99.9%)","Unit","Param: size"
//! "org.example.MapBench.aMap","avgt",1,5,52.1,1.3,"ns/op",100
//! ```
//!
//! Numeric cells that fail to parse, are non-finite, or are negative count
//! as missing, and their row is dropped rather than failing the file.

use crate::measurement::{Measurement, ScoreKind};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const BENCHMARK_COLUMN: &str = "Benchmark";
pub const SIZE_COLUMN: &str = "Param: size";
pub const SCORE_COLUMN: &str = "Score";
pub const SCORE_ERROR_COLUMN: &str = "Score Error (99.9%)";
pub const UNIT_COLUMN: &str = "Unit";

/// File-level input failures (fatal for the run)
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input has no header row")]
    Empty,

    #[error("Missing required column {column:?} (found: {found:?})")]
    MissingColumn { column: String, found: Vec<String> },
}

/// Parsed benchmark table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchTable {
    pub measurements: Vec<Measurement>,
    /// Data rows excluded for missing or non-numeric values
    pub dropped_rows: usize,
    /// Distinct values of the `Unit` column, if present
    pub units: BTreeSet<String>,
}

impl BenchTable {
    /// Latency unit for reports, when the table states a single score unit
    pub fn latency_unit(&self, kind: ScoreKind) -> Option<String> {
        match self.units.len() {
            1 => self.units.iter().next().map(|unit| kind.latency_unit(unit)),
            _ => None,
        }
    }

    /// Units that contradict the declared score kind
    pub fn conflicting_units(&self, kind: ScoreKind) -> Vec<&str> {
        self.units
            .iter()
            .filter(|unit| ScoreKind::from_unit(unit).is_some_and(|k| k != kind))
            .map(String::as_str)
            .collect()
    }
}

/// Column positions of the required fields
struct ColumnIndex {
    benchmark: usize,
    size: usize,
    score: usize,
    score_error: usize,
    unit: Option<usize>,
}

impl ColumnIndex {
    fn from_header(header: &[String]) -> Result<Self, InputError> {
        let find = |column: &str| header.iter().position(|h| h.trim() == column);
        let require = |column: &str| {
            find(column).ok_or_else(|| InputError::MissingColumn {
                column: column.to_string(),
                found: header.to_vec(),
            })
        };

        Ok(Self {
            benchmark: require(BENCHMARK_COLUMN)?,
            size: require(SIZE_COLUMN)?,
            score: require(SCORE_COLUMN)?,
            score_error: require(SCORE_ERROR_COLUMN)?,
            unit: find(UNIT_COLUMN),
        })
    }
}

/// Load a benchmark table from a CSV file
pub fn load_bench_csv(path: &Path) -> Result<BenchTable, InputError> {
    let text = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_bench_csv(&text)?;

    tracing::info!(
        path = %path.display(),
        rows = table.measurements.len(),
        dropped = table.dropped_rows,
        "loaded benchmark table"
    );
    Ok(table)
}

/// Parse benchmark CSV text
pub fn parse_bench_csv(text: &str) -> Result<BenchTable, InputError> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header_line) = lines.next().ok_or(InputError::Empty)?;
    let header = split_record(header_line.trim_start_matches('\u{feff}'));
    let columns = ColumnIndex::from_header(&header)?;

    let mut table = BenchTable::default();

    for (line_num, line) in lines {
        let fields = split_record(line);
        match parse_row(&fields, &columns) {
            Some(measurement) => {
                if let Some(unit) = columns.unit.and_then(|i| fields.get(i)) {
                    let unit = unit.trim();
                    if !unit.is_empty() {
                        table.units.insert(unit.to_string());
                    }
                }
                table.measurements.push(measurement);
            }
            None => {
                tracing::debug!(line = line_num + 1, "dropping row with missing or non-numeric values");
                table.dropped_rows += 1;
            }
        }
    }

    if table.dropped_rows > 0 {
        tracing::warn!(
            "Dropped {} row(s) with missing or non-numeric values",
            table.dropped_rows
        );
    }

    Ok(table)
}

fn parse_row(fields: &[String], columns: &ColumnIndex) -> Option<Measurement> {
    let benchmark = fields.get(columns.benchmark)?.trim();
    if benchmark.is_empty() {
        return None;
    }

    let size = to_numeric(fields.get(columns.size)?)?;
    let score = to_numeric(fields.get(columns.score)?)?;
    let score_error = to_numeric(fields.get(columns.score_error)?)?;
    if score < 0.0 || score_error < 0.0 {
        return None;
    }

    Some(Measurement::new(benchmark, size, score, score_error))
}

/// Lenient numeric coercion: anything unparsable or non-finite is missing
fn to_numeric(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split one CSV record, honouring double-quoted fields and `""` escapes
pub fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            '\r' if !in_quotes && chars.peek().is_none() => {}
            _ => field.push(c),
        }
    }
    fields.push(field);

    fields
}
