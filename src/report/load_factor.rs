//! Load-factor sweep report
//!
//! Per dynamic filter family (cuckoo, quotient): an insert/delete throughput
//! chart, plus the family's structural cost against load factor (cuckoo
//! relocation kicks; quotient probe/cluster lengths and max cluster length).
//! A family with no rows is skipped with a warning, never a failure.

use super::{curve_from_series, rows_where, write_all, ReportConfig};
use crate::aggregate::{aggregate, AggregatedRow};
use crate::chart::{ChartSpec, Curve, YScale};
use crate::loader::{self, Schema};
use crate::record::{BenchmarkRecord, Dim, DimValue, FilterKind, MetricField, Phase};
use crate::series::{select, Series};
use anyhow::Result;
use std::path::Path;

pub const SCHEMA: Schema = Schema {
    required: &[
        "filter",
        "phase",
        "load_factor",
        "ops_per_sec_mean",
        "ops_per_sec_std",
    ],
};

const MOPS: f64 = 1e6;

pub fn run(input: &Path, output_dir: &Path, config: &ReportConfig) -> Result<()> {
    let records = loader::load_path(input, &SCHEMA)?;
    println!("Loaded dynamic rows: {}", records.len());
    print_filters_present(&records);

    let rows = aggregate(
        &records,
        &[Dim::Filter, Dim::Phase, Dim::LoadFactor],
        &[
            MetricField::OpsPerSec,
            MetricField::KicksPerInsert,
            MetricField::ProbeLenInsert,
            MetricField::AvgClusterLen,
            MetricField::MaxClusterLen,
        ],
    )?;

    let charts = compose(&rows, config);
    write_all(&charts, output_dir)
}

fn print_filters_present(records: &[BenchmarkRecord]) {
    let mut seen: Vec<FilterKind> = Vec::new();
    for record in records {
        if !seen.contains(&record.filter) {
            seen.push(record.filter.clone());
        }
    }
    let labels: Vec<&str> = seen.iter().map(FilterKind::as_str).collect();
    println!("Filters present: {}", labels.join(", "));
}

pub(crate) fn compose(rows: &[AggregatedRow], config: &ReportConfig) -> Vec<ChartSpec> {
    let mut charts = Vec::new();
    compose_cuckoo(rows, config, &mut charts);
    compose_quotient(rows, config, &mut charts);
    charts
}

/// Insert/delete phase series of one family, ascending by load factor.
fn phase_series(family: &[AggregatedRow], config: &ReportConfig) -> Vec<Series> {
    select(
        family,
        Dim::Phase,
        &[DimValue::Phase(Phase::Insert), DimValue::Phase(Phase::Delete)],
        &config.display_names,
        Dim::LoadFactor,
    )
}

fn throughput_chart(series: &[Series], family_name: &str, name: &str) -> Option<ChartSpec> {
    let curves: Vec<Curve> = series
        .iter()
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(idx, s)| {
            let mut curve = curve_from_series(
                s,
                Dim::LoadFactor,
                MetricField::OpsPerSec,
                MOPS,
                idx,
                true,
                true,
            );
            curve.label = format!("{} throughput", s.label);
            curve
        })
        .collect();
    if curves.is_empty() {
        return None;
    }
    Some(ChartSpec {
        name: name.to_string(),
        title: format!("{family_name}: Throughput vs Load Factor"),
        x_label: "Load factor".to_string(),
        y_label: "Throughput (Million ops/s)".to_string(),
        y_scale: YScale::Linear,
        legend: true,
        curves,
    })
}

/// A single-metric structural chart over the insert-phase series. `None`
/// when the metric column never made it into the input.
fn diagnostic_chart(
    insert: &Series,
    metric: MetricField,
    name: &str,
    title: &str,
    y_label: &str,
) -> Option<ChartSpec> {
    let curve = curve_from_series(insert, Dim::LoadFactor, metric, 1.0, 0, false, true);
    if curve.points.is_empty() {
        return None;
    }
    Some(ChartSpec {
        name: name.to_string(),
        title: title.to_string(),
        x_label: "Load factor".to_string(),
        y_label: y_label.to_string(),
        y_scale: YScale::Linear,
        legend: false,
        curves: vec![curve],
    })
}

fn compose_cuckoo(rows: &[AggregatedRow], config: &ReportConfig, charts: &mut Vec<ChartSpec>) {
    if !config.allows_filter(&FilterKind::Cuckoo) {
        return;
    }
    let family = rows_where(rows, Dim::Filter, &DimValue::Filter(FilterKind::Cuckoo));
    if family.is_empty() {
        println!("[WARN] No cuckoo rows; skipping.");
        return;
    }

    let series = phase_series(&family, config);
    charts.extend(throughput_chart(
        &series,
        "Cuckoo Filter",
        "cuckoo_throughput_vs_loadfactor",
    ));

    let insert = &series[0];
    if !insert.is_empty() {
        match diagnostic_chart(
            insert,
            MetricField::KicksPerInsert,
            "cuckoo_kicks_vs_loadfactor",
            "Cuckoo Filter: Kicks vs Load Factor",
            "Avg kicks per insert",
        ) {
            Some(chart) => charts.push(chart),
            None => println!("[WARN] no avg_kicks_per_insert data; skipping kicks chart."),
        }
    }
}

fn compose_quotient(rows: &[AggregatedRow], config: &ReportConfig, charts: &mut Vec<ChartSpec>) {
    if !config.allows_filter(&FilterKind::Quotient) {
        return;
    }
    let family = rows_where(rows, Dim::Filter, &DimValue::Filter(FilterKind::Quotient));
    if family.is_empty() {
        println!("[WARN] No quotient rows; skipping.");
        return;
    }

    let series = phase_series(&family, config);
    charts.extend(throughput_chart(
        &series,
        "Quotient Filter",
        "quotient_throughput_vs_loadfactor",
    ));

    let insert = &series[0];
    if insert.is_empty() {
        return;
    }

    let mut probe =
        curve_from_series(insert, Dim::LoadFactor, MetricField::ProbeLenInsert, 1.0, 0, false, true);
    probe.label = "Avg probe length".to_string();
    let mut cluster =
        curve_from_series(insert, Dim::LoadFactor, MetricField::AvgClusterLen, 1.0, 1, false, true);
    cluster.label = "Avg cluster length".to_string();
    let curves: Vec<Curve> = [probe, cluster]
        .into_iter()
        .filter(|c| !c.points.is_empty())
        .collect();
    if curves.is_empty() {
        println!("[WARN] no probe/cluster data; skipping probes chart.");
    } else {
        charts.push(ChartSpec {
            name: "quotient_probes_clusters_vs_loadfactor".to_string(),
            title: "Quotient Filter: Probes & Clusters vs Load Factor".to_string(),
            x_label: "Load factor".to_string(),
            y_label: "Probes / Cluster length".to_string(),
            y_scale: YScale::Linear,
            legend: true,
            curves,
        });
    }

    match diagnostic_chart(
        insert,
        MetricField::MaxClusterLen,
        "quotient_maxcluster_vs_loadfactor",
        "Quotient Filter: Max Cluster Length vs Load Factor",
        "Max cluster length",
    ) {
        Some(chart) => charts.push(chart),
        None => println!("[WARN] no max_cluster_len data; skipping max-cluster chart."),
    }
}
