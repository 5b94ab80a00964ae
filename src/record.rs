//! Typed model for benchmark measurement rows
//!
//! One `BenchmarkRecord` is one CSV row emitted by a filter benchmark
//! harness. Reports address fields indirectly: key dimensions through
//! [`Dim`] and measured quantities through [`MetricField`], which lets the
//! aggregator and series selector stay generic over report types.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Approximate-membership filter family under measurement.
///
/// The harness writes `bloom_blocked`, `cuckoo`, `quotient`, `xor`; the
/// alias `blocked_bloom` is accepted too. Labels outside that set are kept
/// verbatim so they still group, sort, and render (with their raw name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterKind {
    BlockedBloom,
    Cuckoo,
    Quotient,
    Xor,
    Other(String),
}

impl FilterKind {
    /// The four families in canonical legend order.
    pub const CANONICAL: [FilterKind; 4] = [
        FilterKind::BlockedBloom,
        FilterKind::Cuckoo,
        FilterKind::Quotient,
        FilterKind::Xor,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw {
            "bloom_blocked" | "blocked_bloom" => FilterKind::BlockedBloom,
            "cuckoo" => FilterKind::Cuckoo,
            "quotient" => FilterKind::Quotient,
            "xor" => FilterKind::Xor,
            other => FilterKind::Other(other.to_string()),
        }
    }

    /// Canonical raw label, as the harness writes it.
    pub fn as_str(&self) -> &str {
        match self {
            FilterKind::BlockedBloom => "bloom_blocked",
            FilterKind::Cuckoo => "cuckoo",
            FilterKind::Quotient => "quotient",
            FilterKind::Xor => "xor",
            FilterKind::Other(raw) => raw,
        }
    }
}

/// Access pattern of the measured workload. Open set: harnesses grow new
/// workload labels faster than plots do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Workload {
    ReadOnly,
    ReadMostly,
    InsertOnly,
    Mixed,
    Other(String),
}

impl Workload {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "read_only" => Workload::ReadOnly,
            "read_mostly" => Workload::ReadMostly,
            "insert_only" => Workload::InsertOnly,
            "mixed" => Workload::Mixed,
            other => Workload::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Workload::ReadOnly => "read_only",
            Workload::ReadMostly => "read_mostly",
            Workload::InsertOnly => "insert_only",
            Workload::Mixed => "mixed",
            Workload::Other(raw) => raw,
        }
    }
}

/// Operation phase of a dynamic sweep. Closed set: an unknown phase label
/// is a row parse error, not a new category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Insert,
    Delete,
    Lookup,
}

impl Phase {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "insert" => Some(Phase::Insert),
            "delete" => Some(Phase::Delete),
            "lookup" => Some(Phase::Lookup),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Insert => "insert",
            Phase::Delete => "delete",
            Phase::Lookup => "lookup",
        }
    }
}

/// Float usable as a grouping/sorting key.
///
/// Equality, ordering, and hashing go through the IEEE total order, so two
/// identical cell values always land in the same group.
#[derive(Debug, Clone, Copy)]
pub struct FloatKey(pub f64);

impl PartialEq for FloatKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for FloatKey {}

impl PartialOrd for FloatKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for FloatKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Key dimensions a report can group, partition, or sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dim {
    Filter,
    Workload,
    Phase,
    N,
    Threads,
    TargetFpr,
    Bpe,
    LoadFactor,
    NegShare,
}

impl Dim {
    /// CSV column this dimension is read from.
    pub fn column(self) -> &'static str {
        match self {
            Dim::Filter => "filter",
            Dim::Workload => "workload",
            Dim::Phase => "phase",
            Dim::N => "n",
            Dim::Threads => "threads",
            Dim::TargetFpr => "target_fpr",
            Dim::Bpe => "bpe",
            Dim::LoadFactor => "load_factor",
            Dim::NegShare => "neg_share",
        }
    }
}

/// One concrete value of a key dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DimValue {
    Filter(FilterKind),
    Workload(Workload),
    Phase(Phase),
    Int(u64),
    Float(FloatKey),
}

impl DimValue {
    /// Numeric view, for dimensions that can serve as a chart axis.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DimValue::Int(v) => Some(*v as f64),
            DimValue::Float(FloatKey(v)) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for DimValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimValue::Filter(kind) => f.write_str(kind.as_str()),
            DimValue::Workload(wl) => f.write_str(wl.as_str()),
            DimValue::Phase(phase) => f.write_str(phase.as_str()),
            DimValue::Int(v) => write!(f, "{v}"),
            DimValue::Float(FloatKey(v)) => write!(f, "{v}"),
        }
    }
}

/// Measured quantities a report can request from the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricField {
    OpsPerSec,
    P50Ns,
    P95Ns,
    P99Ns,
    AchievedFpr,
    KicksPerInsert,
    ProbeLenInsert,
    AvgClusterLen,
    MaxClusterLen,
}

/// Already-reduced statistics carried by the harness (`*_mean`/`*_std`
/// column pairs).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub std: f64,
}

/// A metric value as found on one row: either a single trial sample or a
/// summary the harness reduced itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Sample(f64),
    Summary(Summary),
}

/// One raw measurement row. Fields a given CSV shape does not carry stay
/// `None`; the loader enforces presence of whatever the active report
/// requires.
#[derive(Debug, Clone)]
pub struct BenchmarkRecord {
    pub filter: FilterKind,
    pub workload: Option<Workload>,
    pub phase: Option<Phase>,
    pub n: Option<u64>,
    pub threads: Option<u64>,
    pub target_fpr: Option<f64>,
    pub bpe: Option<f64>,
    pub load_factor: Option<f64>,
    pub neg_share: Option<f64>,
    pub ops_per_sec: Option<Summary>,
    pub p50_ns: Option<Summary>,
    pub p95_ns: Option<Summary>,
    pub p99_ns: Option<Summary>,
    pub achieved_fpr: Option<f64>,
    pub kicks_per_insert: Option<f64>,
    pub probe_len_insert: Option<f64>,
    pub avg_cluster_len: Option<f64>,
    pub max_cluster_len: Option<f64>,
}

impl BenchmarkRecord {
    /// Record with only the filter family set. Mostly a test convenience.
    pub fn new(filter: FilterKind) -> Self {
        Self {
            filter,
            workload: None,
            phase: None,
            n: None,
            threads: None,
            target_fpr: None,
            bpe: None,
            load_factor: None,
            neg_share: None,
            ops_per_sec: None,
            p50_ns: None,
            p95_ns: None,
            p99_ns: None,
            achieved_fpr: None,
            kicks_per_insert: None,
            probe_len_insert: None,
            avg_cluster_len: None,
            max_cluster_len: None,
        }
    }

    /// Value of a key dimension, if this row carries it.
    pub fn dim(&self, dim: Dim) -> Option<DimValue> {
        match dim {
            Dim::Filter => Some(DimValue::Filter(self.filter.clone())),
            Dim::Workload => self.workload.clone().map(DimValue::Workload),
            Dim::Phase => self.phase.map(DimValue::Phase),
            Dim::N => self.n.map(DimValue::Int),
            Dim::Threads => self.threads.map(DimValue::Int),
            Dim::TargetFpr => self.target_fpr.map(|v| DimValue::Float(FloatKey(v))),
            Dim::Bpe => self.bpe.map(|v| DimValue::Float(FloatKey(v))),
            Dim::LoadFactor => self.load_factor.map(|v| DimValue::Float(FloatKey(v))),
            Dim::NegShare => self.neg_share.map(|v| DimValue::Float(FloatKey(v))),
        }
    }

    /// Value of a metric field, if this row carries it.
    pub fn metric(&self, field: MetricField) -> Option<MetricValue> {
        match field {
            MetricField::OpsPerSec => self.ops_per_sec.map(MetricValue::Summary),
            MetricField::P50Ns => self.p50_ns.map(MetricValue::Summary),
            MetricField::P95Ns => self.p95_ns.map(MetricValue::Summary),
            MetricField::P99Ns => self.p99_ns.map(MetricValue::Summary),
            MetricField::AchievedFpr => self.achieved_fpr.map(MetricValue::Sample),
            MetricField::KicksPerInsert => self.kicks_per_insert.map(MetricValue::Sample),
            MetricField::ProbeLenInsert => self.probe_len_insert.map(MetricValue::Sample),
            MetricField::AvgClusterLen => self.avg_cluster_len.map(MetricValue::Sample),
            MetricField::MaxClusterLen => self.max_cluster_len.map(MetricValue::Sample),
        }
    }
}

/// Raw label → human-readable legend label.
///
/// Labels without an entry pass through unchanged, so an unmapped family
/// still renders under its raw name instead of being dropped.
///
/// # Example
/// ```
/// use cribar::record::DisplayNames;
///
/// let names = DisplayNames::default();
/// assert_eq!(names.label("bloom_blocked"), "Blocked Bloom");
/// assert_eq!(names.label("ribbon"), "ribbon");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayNames {
    map: HashMap<String, String>,
}

impl Default for DisplayNames {
    fn default() -> Self {
        let map = [
            ("bloom_blocked", "Blocked Bloom"),
            ("cuckoo", "Cuckoo"),
            ("quotient", "Quotient"),
            ("xor", "XOR"),
        ]
        .into_iter()
        .map(|(raw, pretty)| (raw.to_string(), pretty.to_string()))
        .collect();
        Self { map }
    }
}

impl DisplayNames {
    pub fn label(&self, raw: &str) -> String {
        self.map
            .get(raw)
            .cloned()
            .unwrap_or_else(|| raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parse_canonical_labels() {
        assert_eq!(FilterKind::parse("bloom_blocked"), FilterKind::BlockedBloom);
        assert_eq!(FilterKind::parse("blocked_bloom"), FilterKind::BlockedBloom);
        assert_eq!(FilterKind::parse("cuckoo"), FilterKind::Cuckoo);
        assert_eq!(FilterKind::parse("quotient"), FilterKind::Quotient);
        assert_eq!(FilterKind::parse("xor"), FilterKind::Xor);
    }

    #[test]
    fn test_filter_parse_preserves_unknown_label() {
        let kind = FilterKind::parse("ribbon");
        assert_eq!(kind, FilterKind::Other("ribbon".to_string()));
        assert_eq!(kind.as_str(), "ribbon");
    }

    #[test]
    fn test_phase_rejects_unknown_label() {
        assert_eq!(Phase::parse("insert"), Some(Phase::Insert));
        assert_eq!(Phase::parse("compact"), None);
    }

    #[test]
    fn test_float_key_groups_identical_values() {
        assert_eq!(FloatKey(0.5), FloatKey(0.5));
        assert!(FloatKey(0.4) < FloatKey(0.9));
    }

    #[test]
    fn test_dim_value_axis_view() {
        assert_eq!(DimValue::Int(8).as_f64(), Some(8.0));
        assert_eq!(DimValue::Float(FloatKey(0.25)).as_f64(), Some(0.25));
        assert_eq!(DimValue::Filter(FilterKind::Cuckoo).as_f64(), None);
    }

    #[test]
    fn test_record_dim_and_metric_access() {
        let mut rec = BenchmarkRecord::new(FilterKind::Cuckoo);
        rec.load_factor = Some(0.5);
        rec.ops_per_sec = Some(Summary {
            mean: 2_000_000.0,
            std: 50_000.0,
        });
        rec.kicks_per_insert = Some(1.2);

        assert_eq!(
            rec.dim(Dim::LoadFactor),
            Some(DimValue::Float(FloatKey(0.5)))
        );
        assert_eq!(rec.dim(Dim::Threads), None);
        assert_eq!(
            rec.metric(MetricField::KicksPerInsert),
            Some(MetricValue::Sample(1.2))
        );
        match rec.metric(MetricField::OpsPerSec) {
            Some(MetricValue::Summary(s)) => assert_eq!(s.mean, 2_000_000.0),
            other => panic!("expected summary, got {other:?}"),
        }
    }

    #[test]
    fn test_display_name_identity_fallback() {
        let names = DisplayNames::default();
        assert_eq!(names.label("xor"), "XOR");
        assert_eq!(names.label("morton"), "morton");
    }
}
