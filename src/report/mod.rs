//! Report orchestration
//!
//! One report type is one pipeline instance: load → aggregate → select →
//! compose → write, with no state shared across report types. Content-level
//! absence (a family, workload, or phase with no rows) skips charts with a
//! stdout diagnostic; only structural load errors abort a run.

pub mod load_factor;
pub mod neg_share;
pub mod space_accuracy;
pub mod thread_scaling;

use crate::aggregate::AggregatedRow;
use crate::chart::{self, ChartSpec, Curve, DataPoint};
use crate::record::{Dim, DimValue, DisplayNames, FilterKind, MetricField};
use crate::series::Series;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which report pipeline to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Throughput and structural cost across a load-factor sweep
    LoadFactor,
    /// Throughput across thread counts, one chart per workload
    ThreadScaling,
    /// Throughput and tail latency across negative-lookup shares
    NegativeShare,
    /// Achieved FPR against bits per entry, one chart per dataset size
    SpaceAccuracy,
}

/// Pipeline configuration: the display and ordering tables the original
/// per-report scripts hard-coded, made explicit and overridable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Raw label → legend label; unmapped labels render verbatim.
    pub display_names: DisplayNames,
    /// Raw filter labels in canonical legend order.
    pub allowed_filters: Vec<String>,
    /// Workloads the thread-scaling report charts, one chart each.
    pub workloads: Vec<String>,
    /// Dataset sizes the space-accuracy report charts, one chart each.
    pub dataset_sizes: Vec<u64>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            display_names: DisplayNames::default(),
            allowed_filters: FilterKind::CANONICAL
                .iter()
                .map(|kind| kind.as_str().to_string())
                .collect(),
            workloads: vec!["read_only".to_string(), "read_mostly".to_string()],
            dataset_sizes: vec![1_000_000, 5_000_000, 10_000_000],
        }
    }
}

impl ReportConfig {
    /// Load an override config from a JSON file; absent keys keep their
    /// defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("invalid report config in {}", path.display()))?;
        Ok(config)
    }

    /// Allowed filters as partition values, preserving configured order.
    pub fn allowed_filter_values(&self) -> Vec<DimValue> {
        self.allowed_filters
            .iter()
            .map(|raw| DimValue::Filter(FilterKind::parse(raw)))
            .collect()
    }

    pub fn allows_filter(&self, kind: &FilterKind) -> bool {
        self.allowed_filters
            .iter()
            .any(|raw| FilterKind::parse(raw) == *kind)
    }
}

/// Run one report pipeline end to end.
pub fn run_report(
    kind: ReportKind,
    input: &Path,
    output_dir: &Path,
    config: &ReportConfig,
) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    match kind {
        ReportKind::LoadFactor => load_factor::run(input, output_dir, config),
        ReportKind::ThreadScaling => thread_scaling::run(input, output_dir, config),
        ReportKind::NegativeShare => neg_share::run(input, output_dir, config),
        ReportKind::SpaceAccuracy => space_accuracy::run(input, output_dir, config),
    }
}

/// Write every composed chart. A failed write is reported and does not stop
/// the remaining writes; the first failure is returned once all were
/// attempted, so unrelated artifacts still land on disk.
pub(crate) fn write_all(charts: &[ChartSpec], output_dir: &Path) -> Result<()> {
    let mut first_err = None;
    for spec in charts {
        if let Err(err) = chart::write_chart(spec, output_dir) {
            eprintln!("error: {err:#}");
            if first_err.is_none() {
                first_err = Some(err);
            }
        }
    }
    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Build one curve from a series: x from `x_dim`, y mean ± std from
/// `metric`, both y values divided by `divisor` (1e6 turns ops/s into
/// Mops/s). Rows missing the metric contribute no point.
pub(crate) fn curve_from_series(
    series: &Series,
    x_dim: Dim,
    metric: MetricField,
    divisor: f64,
    color_index: usize,
    error_bars: bool,
    connect: bool,
) -> Curve {
    let points = series
        .rows
        .iter()
        .filter_map(|row| {
            let x = row.dim(x_dim)?.as_f64()?;
            let stat = row.metric(metric)?;
            Some(DataPoint {
                x,
                y: stat.mean / divisor,
                err: stat.std / divisor,
            })
        })
        .collect();
    Curve {
        label: series.label.clone(),
        color_index,
        points,
        error_bars,
        connect,
    }
}

/// Rows whose value of `dim` equals `value`.
pub(crate) fn rows_where(rows: &[AggregatedRow], dim: Dim, value: &DimValue) -> Vec<AggregatedRow> {
    rows.iter()
        .filter(|row| row.dim(dim) == Some(value))
        .cloned()
        .collect()
}

/// Artifact-name fragment from a legend label ("Blocked Bloom" →
/// "blocked_bloom").
pub(crate) fn artifact_slug(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

/// Thousands-separated integer for chart titles (1000000 → "1,000,000").
pub(crate) fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
