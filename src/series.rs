//! Series selection
//!
//! Partitions aggregated rows into the named, ordered series a chart draws.
//! Partition order follows the caller's allowed-value list, never input row
//! order, so legends are stable across runs. Each series is sorted ascending
//! by the chart's x dimension; unsorted x values would render a zig-zag
//! instead of a trend line. An allowed value with no rows yields an empty
//! series plus a stdout diagnostic: a skip condition, not an error.

use crate::aggregate::AggregatedRow;
use crate::record::{Dim, DimValue, DisplayNames};

/// Ordered rows sharing one value of the partition dimension.
#[derive(Debug, Clone)]
pub struct Series {
    /// Human-readable label (display-name mapped, identity fallback).
    pub label: String,
    /// The partition value this series holds fixed.
    pub value: DimValue,
    /// Member rows, ascending by the sort dimension.
    pub rows: Vec<AggregatedRow>,
}

impl Series {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Partition `rows` by `partition`, restricted to `allowed` in that order,
/// sorting each series ascending by `sort`.
pub fn select(
    rows: &[AggregatedRow],
    partition: Dim,
    allowed: &[DimValue],
    names: &DisplayNames,
    sort: Dim,
) -> Vec<Series> {
    allowed
        .iter()
        .map(|value| {
            let mut members: Vec<AggregatedRow> = rows
                .iter()
                .filter(|row| row.dim(partition) == Some(value))
                .cloned()
                .collect();
            members.sort_by(|a, b| a.dim(sort).cmp(&b.dim(sort)));

            let label = names.label(&value.to_string());
            if members.is_empty() {
                println!("[WARN] no rows for {label}");
            }
            Series {
                label,
                value: value.clone(),
                rows: members,
            }
        })
        .collect()
}
