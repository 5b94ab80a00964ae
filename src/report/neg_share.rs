//! Negative-lookup-share report
//!
//! Restricted to the read-only workload. One throughput chart with an
//! error-bar line per family, plus a companion tail-latency chart per family
//! (p50/p95/p99 against negative share). The sweep's invariant `n` and
//! `target_fpr` are read once from the first record for the title.

use super::{artifact_slug, curve_from_series, group_thousands, write_all, ReportConfig};
use crate::aggregate::{aggregate, AggregatedRow};
use crate::chart::{filter_color_index, ChartSpec, Curve, YScale};
use crate::loader::{self, Schema};
use crate::record::{BenchmarkRecord, Dim, DimValue, MetricField, Workload};
use crate::series::{select, Series};
use anyhow::Result;
use std::path::Path;

pub const SCHEMA: Schema = Schema {
    required: &[
        "filter",
        "workload",
        "neg_share",
        "n",
        "target_fpr",
        "ops_per_sec_mean",
        "ops_per_sec_std",
    ],
};

const MOPS: f64 = 1e6;

const PERCENTILES: [(MetricField, &str); 3] = [
    (MetricField::P50Ns, "p50"),
    (MetricField::P95Ns, "p95"),
    (MetricField::P99Ns, "p99"),
];

pub fn run(input: &Path, output_dir: &Path, config: &ReportConfig) -> Result<()> {
    let records = loader::load_path(input, &SCHEMA)?;
    println!("Loaded rows: {}", records.len());

    let Some(first) = records.first() else {
        println!("[WARN] input contains no rows; nothing to plot.");
        return Ok(());
    };
    // Single n + target_fpr per sweep file; both are loader-required.
    let sweep_n = first.n.unwrap_or_default();
    let sweep_fpr = first.target_fpr.unwrap_or_default();

    let read_only: Vec<BenchmarkRecord> = records
        .iter()
        .filter(|rec| rec.workload == Some(Workload::ReadOnly))
        .cloned()
        .collect();
    if read_only.is_empty() {
        println!("[WARN] no read_only rows; nothing to plot.");
        return Ok(());
    }

    let mut metrics = vec![MetricField::OpsPerSec];
    metrics.extend(PERCENTILES.iter().map(|(field, _)| *field));
    let rows = aggregate(&read_only, &[Dim::Filter, Dim::NegShare], &metrics)?;

    let charts = compose(&rows, config, sweep_n, sweep_fpr);
    write_all(&charts, output_dir)
}

pub(crate) fn compose(
    rows: &[AggregatedRow],
    config: &ReportConfig,
    sweep_n: u64,
    sweep_fpr: f64,
) -> Vec<ChartSpec> {
    let series = select(
        rows,
        Dim::Filter,
        &config.allowed_filter_values(),
        &config.display_names,
        Dim::NegShare,
    );

    let mut charts = Vec::new();
    charts.extend(throughput_chart(&series, sweep_n, sweep_fpr));
    for s in series.iter().filter(|s| !s.is_empty()) {
        match latency_chart(s) {
            Some(chart) => charts.push(chart),
            None => println!("[WARN] no latency percentiles for {}; skipping.", s.label),
        }
    }
    charts
}

fn throughput_chart(series: &[Series], sweep_n: u64, sweep_fpr: f64) -> Option<ChartSpec> {
    let curves: Vec<Curve> = series
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| {
            let color = match &s.value {
                DimValue::Filter(kind) => filter_color_index(kind),
                _ => 0,
            };
            curve_from_series(s, Dim::NegShare, MetricField::OpsPerSec, MOPS, color, true, true)
        })
        .collect();
    if curves.is_empty() {
        return None;
    }
    Some(ChartSpec {
        name: "throughput_vs_negative_share".to_string(),
        title: format!(
            "Lookup Throughput vs Negative Share (read-only, n={}, target_fpr={})",
            group_thousands(sweep_n),
            sweep_fpr
        ),
        x_label: "Negative lookup share".to_string(),
        y_label: "Throughput (Million ops/s)".to_string(),
        y_scale: YScale::Linear,
        legend: true,
        curves,
    })
}

/// Tail-latency chart for one family. `None` when the percentile columns
/// never made it into the input.
fn latency_chart(series: &Series) -> Option<ChartSpec> {
    let curves: Vec<Curve> = PERCENTILES
        .iter()
        .enumerate()
        .map(|(idx, (field, label))| {
            let mut curve = curve_from_series(series, Dim::NegShare, *field, 1.0, idx, true, true);
            curve.label = label.to_string();
            curve
        })
        .filter(|c| !c.points.is_empty())
        .collect();
    if curves.is_empty() {
        return None;
    }
    Some(ChartSpec {
        name: format!(
            "latency_vs_negative_share_{}",
            artifact_slug(&series.label)
        ),
        title: format!(
            "{}: Tail latencies vs negative share (read-only)",
            series.label
        ),
        x_label: "Negative lookup share".to_string(),
        y_label: "Latency (ns)".to_string(),
        y_scale: YScale::Linear,
        legend: true,
        curves,
    })
}
