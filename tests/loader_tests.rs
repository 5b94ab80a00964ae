//! CSV loading integration tests against on-disk fixtures
//!
//! Exercises the structural failure modes: missing files, missing columns,
//! and unparseable cells, plus a load of a harness-shaped file carrying
//! columns the reports never consume.

use cribar::loader::{load_path, LoadError, Schema};
use cribar::record::{FilterKind, Phase};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const DYNAMIC_SCHEMA: Schema = Schema {
    required: &[
        "filter",
        "phase",
        "load_factor",
        "ops_per_sec_mean",
        "ops_per_sec_std",
    ],
};

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_harness_shaped_dynamic_csv() {
    // Full harness header, including columns no report consumes
    // (ops, failure_rate, stash_inserts) and family-specific blanks.
    let csv = "\
filter,n,target_fpr,load_factor,phase,ops,ops_per_sec_mean,ops_per_sec_std,failure_rate,avg_kicks_per_insert,stash_inserts,avg_probe_len_insert,avg_cluster_len,max_cluster_len
cuckoo,1000000,0.01,0.5,insert,500000,2000000,50000,0,1.2,0,,,
quotient,1000000,0.01,0.5,insert,500000,900000,20000,0,,0,1.8,2.4,11
";
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "dynamic_results.csv", csv);

    let records = load_path(&path, &DYNAMIC_SCHEMA).unwrap();
    assert_eq!(records.len(), 2);

    let cuckoo = &records[0];
    assert_eq!(cuckoo.filter, FilterKind::Cuckoo);
    assert_eq!(cuckoo.phase, Some(Phase::Insert));
    assert_eq!(cuckoo.kicks_per_insert, Some(1.2));
    assert_eq!(cuckoo.probe_len_insert, None);

    let quotient = &records[1];
    assert_eq!(quotient.kicks_per_insert, None);
    assert_eq!(quotient.avg_cluster_len, Some(2.4));
    assert_eq!(quotient.max_cluster_len, Some(11.0));
}

#[test]
fn test_open_error_for_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("does_not_exist.csv");
    let err = load_path(&path, &DYNAMIC_SCHEMA).unwrap_err();
    match err {
        LoadError::Open { path: reported, .. } => {
            assert!(reported.contains("does_not_exist.csv"));
        }
        other => panic!("expected open error, got {other}"),
    }
}

#[test]
fn test_schema_error_from_file_names_missing_columns() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "trimmed.csv", "filter,phase\ncuckoo,insert\n");
    let err = load_path(&path, &DYNAMIC_SCHEMA).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("load_factor"));
    assert!(message.contains("ops_per_sec_mean"));
    assert!(message.contains("ops_per_sec_std"));
}

#[test]
fn test_row_error_reports_location() {
    let csv = "\
filter,phase,load_factor,ops_per_sec_mean,ops_per_sec_std
cuckoo,insert,0.5,2000000,50000
cuckoo,insert,0.9,fast,60000
";
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "bad_cell.csv", csv);
    let err = load_path(&path, &DYNAMIC_SCHEMA).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("row 2"));
    assert!(message.contains("ops_per_sec_mean"));
    assert!(message.contains("'fast'"));
}
