//! Space-vs-accuracy report
//!
//! One chart per configured dataset size: achieved false-positive rate
//! against bits per entry on a log y-axis. Points only, since bpe values are
//! discrete configuration choices rather than a swept variable, with error
//! bars from repeated trials and the fixed per-family colors.

use super::{group_thousands, rows_where, write_all, ReportConfig};
use crate::aggregate::{aggregate, AggregatedRow};
use crate::chart::{filter_color_index, ChartSpec, Curve, YScale};
use crate::loader::{self, Schema};
use crate::record::{Dim, DimValue, MetricField};
use crate::series::select;
use anyhow::Result;
use std::path::Path;

pub const SCHEMA: Schema = Schema {
    required: &["filter", "n", "target_fpr", "bpe", "achieved_fpr"],
};

pub fn run(input: &Path, output_dir: &Path, config: &ReportConfig) -> Result<()> {
    let records = loader::load_path(input, &SCHEMA)?;
    // Trial rows are raw here; the aggregator reduces repeats per
    // (filter, n, target_fpr, bpe) to mean and sample std.
    let rows = aggregate(
        &records,
        &[Dim::Filter, Dim::N, Dim::TargetFpr, Dim::Bpe],
        &[MetricField::AchievedFpr],
    )?;

    let charts = compose(&rows, config);
    write_all(&charts, output_dir)
}

pub(crate) fn compose(rows: &[AggregatedRow], config: &ReportConfig) -> Vec<ChartSpec> {
    let allowed = config.allowed_filter_values();
    let mut charts = Vec::new();

    for &n in &config.dataset_sizes {
        let size_rows = rows_where(rows, Dim::N, &DimValue::Int(n));
        if size_rows.is_empty() {
            println!("[WARN] no rows for n={n}; skipping.");
            continue;
        }

        let series = select(&size_rows, Dim::Filter, &allowed, &config.display_names, Dim::Bpe);
        let curves: Vec<Curve> = series
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| {
                let color = match &s.value {
                    DimValue::Filter(kind) => filter_color_index(kind),
                    _ => 0,
                };
                super::curve_from_series(s, Dim::Bpe, MetricField::AchievedFpr, 1.0, color, true, false)
            })
            .collect();
        if curves.is_empty() {
            continue;
        }

        charts.push(ChartSpec {
            name: format!("space_vs_accuracy_{n}"),
            title: format!("Space vs Accuracy (n = {})", group_thousands(n)),
            x_label: "Bits per entry (BPE)".to_string(),
            y_label: "Achieved FPR (mean ± std, log scale)".to_string(),
            y_scale: YScale::Log,
            legend: true,
            curves,
        });
    }
    charts
}
