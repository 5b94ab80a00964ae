//! Trial aggregation
//!
//! Groups records by a report's key dimensions and reduces every requested
//! metric to `(mean, sample std)`. Metrics the harness already reduced
//! (`*_mean`/`*_std` column pairs) pass through instead of being re-derived
//! from what would look like a single sample.

use crate::record::{BenchmarkRecord, Dim, DimValue, MetricField, MetricValue, Summary};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("record {index} carries no value for key dimension '{}'", dim.column())]
    MissingKeyDimension { index: usize, dim: Dim },
}

pub type Result<T> = std::result::Result<T, AggregateError>;

/// Reduced statistics for one metric within one key group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricStat {
    pub mean: f64,
    pub std: f64,
}

/// One key-dimension tuple plus its reduced metrics.
#[derive(Debug, Clone)]
pub struct AggregatedRow {
    key: BTreeMap<Dim, DimValue>,
    metrics: BTreeMap<MetricField, MetricStat>,
}

impl AggregatedRow {
    pub fn dim(&self, dim: Dim) -> Option<&DimValue> {
        self.key.get(&dim)
    }

    pub fn metric(&self, field: MetricField) -> Option<MetricStat> {
        self.metrics.get(&field).copied()
    }

    #[cfg(test)]
    pub(crate) fn for_tests(
        key: impl IntoIterator<Item = (Dim, DimValue)>,
        metrics: impl IntoIterator<Item = (MetricField, MetricStat)>,
    ) -> Self {
        Self {
            key: key.into_iter().collect(),
            metrics: metrics.into_iter().collect(),
        }
    }
}

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n − 1 denominator). Zero for fewer than two
/// samples, matching the single-trial convention of exploratory sweeps.
///
/// # Example
/// ```
/// use cribar::aggregate::{mean, sample_std};
///
/// let trials = [0.012, 0.010];
/// let m = mean(&trials);
/// assert!((m - 0.011).abs() < 1e-12);
/// assert!((sample_std(&trials, m) - 0.0014142).abs() < 1e-6);
/// assert_eq!(sample_std(&[0.012], 0.012), 0.0);
/// ```
pub fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Group `records` by `key_dims` and reduce each metric in `metrics`.
///
/// Output order follows the key tuples' natural order; the series selector
/// re-sorts by the chart axis anyway. A metric absent from every row of a
/// group is simply absent from that group's output; mixed-family CSVs make
/// this the common case, not an error.
///
/// # Errors
/// A record missing one of the requested key dimensions is a structural
/// problem (the loader schema should have caught the column) and fails the
/// whole aggregation.
pub fn aggregate(
    records: &[BenchmarkRecord],
    key_dims: &[Dim],
    metrics: &[MetricField],
) -> Result<Vec<AggregatedRow>> {
    let mut groups: BTreeMap<Vec<DimValue>, Vec<&BenchmarkRecord>> = BTreeMap::new();
    for (index, record) in records.iter().enumerate() {
        let key = key_dims
            .iter()
            .map(|&dim| {
                record
                    .dim(dim)
                    .ok_or(AggregateError::MissingKeyDimension { index, dim })
            })
            .collect::<Result<Vec<_>>>()?;
        groups.entry(key).or_default().push(record);
    }

    let mut rows = Vec::with_capacity(groups.len());
    for (key, members) in groups {
        let mut reduced = BTreeMap::new();
        for &field in metrics {
            if let Some(stat) = reduce(&members, field) {
                reduced.insert(field, stat);
            }
        }
        rows.push(AggregatedRow {
            key: key_dims.iter().copied().zip(key).collect(),
            metrics: reduced,
        });
    }
    Ok(rows)
}

fn reduce(members: &[&BenchmarkRecord], field: MetricField) -> Option<MetricStat> {
    let mut samples: Vec<f64> = Vec::new();
    let mut summaries: Vec<Summary> = Vec::new();
    for record in members {
        match record.metric(field) {
            Some(MetricValue::Sample(value)) => samples.push(value),
            Some(MetricValue::Summary(summary)) => summaries.push(summary),
            None => {}
        }
    }

    if !summaries.is_empty() {
        // Already reduced upstream; averaging is exact pass-through for the
        // expected one-row-per-key shape.
        let means: Vec<f64> = summaries.iter().map(|s| s.mean).collect();
        let stds: Vec<f64> = summaries.iter().map(|s| s.std).collect();
        return Some(MetricStat {
            mean: mean(&means),
            std: mean(&stds),
        });
    }

    if samples.is_empty() {
        return None;
    }
    let m = mean(&samples);
    Some(MetricStat {
        mean: m,
        std: sample_std(&samples, m),
    })
}
