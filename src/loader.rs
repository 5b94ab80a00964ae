//! CSV ingestion with schema validation
//!
//! Loads harness measurement rows into [`BenchmarkRecord`]s. Structural
//! problems abort the whole load: a required column missing from the header
//! is a [`LoadError::Schema`] naming every absent column, and a cell that
//! fails type coercion is a [`LoadError::Row`] naming the 1-based data row
//! and the column. Rows are never silently dropped; partial benchmark data
//! is worse than none.

use crate::record::{BenchmarkRecord, FilterKind, Phase, Summary, Workload};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a benchmark CSV.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("missing required column(s): {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("row {row}, column '{column}': cannot parse '{value}' as {expected}")]
    Row {
        row: usize,
        column: String,
        value: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, LoadError>;

/// Column requirements of one report type. Columns not listed here are
/// optional: parsed when present, `None` when absent or empty.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub required: &'static [&'static str],
}

impl Schema {
    fn requires(&self, column: &str) -> bool {
        self.required.contains(&column)
    }
}

/// Load records from a CSV file on disk.
pub fn load_path(path: &Path, schema: &Schema) -> Result<Vec<BenchmarkRecord>> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    load_reader(file, schema)
}

/// Load records from any reader producing CSV text with a header row.
pub fn load_reader<R: Read>(reader: R, schema: &Schema) -> Result<Vec<BenchmarkRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: HashMap<String, usize> = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.to_string(), idx))
        .collect();

    let missing: Vec<String> = schema
        .required
        .iter()
        .filter(|name| !headers.contains_key(**name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::Schema { missing });
    }

    let mut records = Vec::new();
    for (index, row) in csv_reader.records().enumerate() {
        let row = row?;
        let cells = RowCells {
            headers: &headers,
            schema,
            record: &row,
            row: index + 1,
        };
        records.push(cells.benchmark_record()?);
    }

    tracing::debug!(rows = records.len(), "loaded benchmark records");
    Ok(records)
}

/// Typed access into one CSV row, with required-column enforcement.
struct RowCells<'a> {
    headers: &'a HashMap<String, usize>,
    schema: &'a Schema,
    record: &'a csv::StringRecord,
    row: usize,
}

impl RowCells<'_> {
    fn benchmark_record(&self) -> Result<BenchmarkRecord> {
        Ok(BenchmarkRecord {
            filter: self.filter()?,
            workload: self.text("workload")?.map(Workload::parse),
            phase: self.phase()?,
            n: self.integer("n")?,
            threads: self.integer("threads")?,
            target_fpr: self.float("target_fpr")?,
            bpe: self.float("bpe")?,
            load_factor: self.float("load_factor")?,
            neg_share: self.float("neg_share")?,
            ops_per_sec: self.summary("ops_per_sec_mean", "ops_per_sec_std")?,
            p50_ns: self.summary("p50_ns_mean", "p50_ns_std")?,
            p95_ns: self.summary("p95_ns_mean", "p95_ns_std")?,
            p99_ns: self.summary("p99_ns_mean", "p99_ns_std")?,
            achieved_fpr: self.float("achieved_fpr")?,
            kicks_per_insert: self.float("avg_kicks_per_insert")?,
            probe_len_insert: self.float("avg_probe_len_insert")?,
            avg_cluster_len: self.float("avg_cluster_len")?,
            max_cluster_len: self.float("max_cluster_len")?,
        })
    }

    /// Raw trimmed cell content; empty cells count as absent.
    fn raw(&self, column: &str) -> Option<&str> {
        self.headers
            .get(column)
            .and_then(|&idx| self.record.get(idx))
            .filter(|value| !value.is_empty())
    }

    fn error(&self, column: &str, value: &str, expected: &'static str) -> LoadError {
        LoadError::Row {
            row: self.row,
            column: column.to_string(),
            value: value.to_string(),
            expected,
        }
    }

    /// Cell content, enforcing non-emptiness for required columns.
    fn text(&self, column: &str) -> Result<Option<&str>> {
        match self.raw(column) {
            Some(value) => Ok(Some(value)),
            None if self.schema.requires(column) => {
                Err(self.error(column, "", "non-empty value"))
            }
            None => Ok(None),
        }
    }

    fn float(&self, column: &str) -> Result<Option<f64>> {
        self.text(column)?
            .map(|value| {
                value
                    .parse::<f64>()
                    .map_err(|_| self.error(column, value, "float"))
            })
            .transpose()
    }

    fn integer(&self, column: &str) -> Result<Option<u64>> {
        self.text(column)?
            .map(|value| {
                value
                    .parse::<u64>()
                    .ok()
                    .filter(|&v| v > 0)
                    .ok_or_else(|| self.error(column, value, "positive integer"))
            })
            .transpose()
    }

    fn filter(&self) -> Result<FilterKind> {
        let raw = self
            .text("filter")?
            .ok_or_else(|| self.error("filter", "", "filter label"))?;
        Ok(FilterKind::parse(raw))
    }

    fn phase(&self) -> Result<Option<Phase>> {
        self.text("phase")?
            .map(|value| {
                Phase::parse(value)
                    .ok_or_else(|| self.error("phase", value, "one of insert|delete|lookup"))
            })
            .transpose()
    }

    /// A harness-reduced mean/std pair. The std column defaults to 0 when
    /// absent so single-column summaries still load.
    fn summary(&self, mean_column: &str, std_column: &str) -> Result<Option<Summary>> {
        let mean = self.float(mean_column)?;
        let std = self.float(std_column)?;
        Ok(mean.map(|mean| Summary {
            mean,
            std: std.unwrap_or(0.0),
        }))
    }
}
