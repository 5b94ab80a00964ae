//! Thread-scaling report
//!
//! One chart per configured workload: throughput against thread count, one
//! error-bar line per filter family in canonical legend order. A workload
//! with no rows is skipped with a warning.

use super::{curve_from_series, rows_where, write_all, ReportConfig};
use crate::aggregate::{aggregate, AggregatedRow};
use crate::chart::{filter_color_index, ChartSpec, Curve, YScale};
use crate::loader::{self, Schema};
use crate::record::{Dim, DimValue, MetricField};
use crate::series::select;
use anyhow::Result;
use std::path::Path;

pub const SCHEMA: Schema = Schema {
    required: &[
        "filter",
        "workload",
        "threads",
        "ops_per_sec_mean",
        "ops_per_sec_std",
    ],
};

const MOPS: f64 = 1e6;

pub fn run(input: &Path, output_dir: &Path, config: &ReportConfig) -> Result<()> {
    let records = loader::load_path(input, &SCHEMA)?;
    let rows = aggregate(
        &records,
        &[Dim::Filter, Dim::Workload, Dim::Threads],
        &[MetricField::OpsPerSec],
    )?;

    let charts = compose(&rows, config);
    write_all(&charts, output_dir)
}

pub(crate) fn compose(rows: &[AggregatedRow], config: &ReportConfig) -> Vec<ChartSpec> {
    let allowed = config.allowed_filter_values();
    let mut charts = Vec::new();

    for raw_workload in &config.workloads {
        let workload = crate::record::Workload::parse(raw_workload);
        let workload_rows = rows_where(rows, Dim::Workload, &DimValue::Workload(workload));
        if workload_rows.is_empty() {
            println!("[WARN] No rows for workload={raw_workload}");
            continue;
        }

        let series = select(
            &workload_rows,
            Dim::Filter,
            &allowed,
            &config.display_names,
            Dim::Threads,
        );
        let curves: Vec<Curve> = series
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| {
                let color = match &s.value {
                    DimValue::Filter(kind) => filter_color_index(kind),
                    _ => 0,
                };
                curve_from_series(s, Dim::Threads, MetricField::OpsPerSec, MOPS, color, true, true)
            })
            .collect();
        if curves.is_empty() {
            continue;
        }

        charts.push(ChartSpec {
            name: format!("thread_scaling_{raw_workload}"),
            title: format!("Thread Scaling ({})", raw_workload.replace('_', " ")),
            x_label: "Threads".to_string(),
            y_label: "Throughput (Million ops/s)".to_string(),
            y_scale: YScale::Linear,
            legend: true,
            curves,
        });
    }
    charts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{BenchmarkRecord, FilterKind, Summary, Workload};

    fn threaded_row(filter: FilterKind, workload: Workload, threads: u64, ops: f64) -> BenchmarkRecord {
        let mut rec = BenchmarkRecord::new(filter);
        rec.workload = Some(workload);
        rec.threads = Some(threads);
        rec.ops_per_sec = Some(Summary {
            mean: ops,
            std: ops * 0.01,
        });
        rec
    }

    fn aggregated(records: &[BenchmarkRecord]) -> Vec<AggregatedRow> {
        aggregate(
            records,
            &[Dim::Filter, Dim::Workload, Dim::Threads],
            &[MetricField::OpsPerSec],
        )
        .unwrap()
    }

    #[test]
    fn test_one_chart_per_workload_with_data() {
        let records = vec![
            threaded_row(FilterKind::Xor, Workload::ReadOnly, 1, 5_000_000.0),
            threaded_row(FilterKind::Xor, Workload::ReadOnly, 4, 18_000_000.0),
        ];
        let charts = compose(&aggregated(&records), &ReportConfig::default());
        // read_mostly has no rows and is skipped
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].name, "thread_scaling_read_only");
        assert_eq!(charts[0].title, "Thread Scaling (read only)");
    }

    #[test]
    fn test_legend_order_is_canonical_not_input_order() {
        let records = vec![
            threaded_row(FilterKind::Xor, Workload::ReadOnly, 1, 5_000_000.0),
            threaded_row(FilterKind::BlockedBloom, Workload::ReadOnly, 1, 6_000_000.0),
            threaded_row(FilterKind::Cuckoo, Workload::ReadOnly, 1, 4_000_000.0),
        ];
        let charts = compose(&aggregated(&records), &ReportConfig::default());
        let labels: Vec<&str> = charts[0].curves.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Blocked Bloom", "Cuckoo", "XOR"]);
    }

    #[test]
    fn test_threads_sorted_ascending() {
        let records = vec![
            threaded_row(FilterKind::Cuckoo, Workload::ReadMostly, 8, 20_000_000.0),
            threaded_row(FilterKind::Cuckoo, Workload::ReadMostly, 1, 4_000_000.0),
            threaded_row(FilterKind::Cuckoo, Workload::ReadMostly, 2, 7_000_000.0),
        ];
        let charts = compose(&aggregated(&records), &ReportConfig::default());
        let xs: Vec<f64> = charts[0].curves[0].points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 8.0]);
    }

    #[test]
    fn test_family_colors_follow_fixed_assignment() {
        let records = vec![
            threaded_row(FilterKind::Quotient, Workload::ReadOnly, 1, 3_000_000.0),
            threaded_row(FilterKind::Xor, Workload::ReadOnly, 1, 5_000_000.0),
        ];
        let charts = compose(&aggregated(&records), &ReportConfig::default());
        let colors: Vec<usize> = charts[0].curves.iter().map(|c| c.color_index).collect();
        assert_eq!(colors, vec![2, 3]);
    }
}
