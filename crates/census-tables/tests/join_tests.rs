//! Tests for ROI reading and tract joins.

use census_tables::{left_join, read_roi, RoiColumns, RoiRecord};
use test_utils::fixtures::tract_row;
use test_utils::{ids, Workspace};
use tract_common::{MapError, Tract};

fn join_roi(tracts: &[Tract], roi: &[RoiRecord]) -> Vec<census_tables::Joined<Tract, RoiRecord>> {
    left_join(tracts, roi, |t: &Tract| t.geoid.as_str(), |r: &RoiRecord| r.fips.as_str())
}

// ============================================================================
// ROI files
// ============================================================================

#[test]
fn test_roi_leading_zeros_preserved() {
    let ws = Workspace::new();
    let path = ws.write_lines(
        "roi.csv",
        &["FIPS,COMP_RANK,COUNTY", "04001944201,2,Apache", "26163010100,1,Wayne"],
    );

    let records = read_roi(&path, &RoiColumns::default()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].fips.as_str(), ids::APACHE_TRACT);
    assert_eq!(records[0].rank, Some(2));
    assert_eq!(records[1].category().as_deref(), Some("1"));
}

#[test]
fn test_roi_custom_columns() {
    let ws = Workspace::new();
    let path = ws.write_lines("roi.csv", &["GEOID,Rank", "26163010100,3"]);

    let columns = RoiColumns {
        id: "GEOID".to_string(),
        rank: "Rank".to_string(),
    };
    let records = read_roi(&path, &columns).unwrap();
    assert_eq!(records[0].rank, Some(3));
}

#[test]
fn test_roi_missing_column() {
    let ws = Workspace::new();
    let path = ws.write_lines("roi.csv", &["GEOID,Rank", "26163010100,3"]);

    let result = read_roi(&path, &RoiColumns::default());
    assert!(matches!(result, Err(MapError::MissingColumn { ref column, .. }) if column == "FIPS"));
}

#[test]
fn test_roi_windows_1252_fallback() {
    let ws = Workspace::new();
    let path = ws.write_bytes("roi.csv", b"FIPS,COMP_RANK,NOTE\n26163010100,1,\x93core\x94\n");

    let records = read_roi(&path, &RoiColumns::default()).unwrap();
    assert_eq!(records[0].rank, Some(1));
}

// ============================================================================
// Joins
// ============================================================================

#[test]
fn test_join_attaches_rank() {
    let ws = Workspace::new();
    let path = ws.write_lines("roi.csv", &["FIPS,COMP_RANK", "26163010100,1"]);
    let roi = read_roi(&path, &RoiColumns::default()).unwrap();

    let tracts = tract_row(&[ids::WAYNE_TRACT, ids::WAYNE_TRACT_2]);
    let joined = join_roi(&tracts.tracts, &roi);

    assert_eq!(joined.len(), 2);
    assert_eq!(joined[0].right.as_ref().and_then(|r| r.rank), Some(1));
    assert!(!joined[1].is_matched());
    assert_eq!(joined[1].left.geoid.as_str(), ids::WAYNE_TRACT_2);
}

#[test]
fn test_join_leading_zero_match() {
    let ws = Workspace::new();
    let path = ws.write_lines("roi.csv", &["FIPS,COMP_RANK", "04001944201,3"]);
    let roi = read_roi(&path, &RoiColumns::default()).unwrap();

    let tracts = tract_row(&[ids::APACHE_TRACT]);
    let joined = join_roi(&tracts.tracts, &roi);
    assert!(joined[0].is_matched());
}

#[test]
fn test_join_fans_out_duplicates() {
    let ws = Workspace::new();
    let path = ws.write_lines(
        "roi.csv",
        &["FIPS,COMP_RANK", "26163010100,2", "48453000101,1", "26163010100,3"],
    );
    let roi = read_roi(&path, &RoiColumns::default()).unwrap();

    let tracts = tract_row(&[ids::WAYNE_TRACT]);
    let joined = join_roi(&tracts.tracts, &roi);

    let ranks: Vec<Option<i64>> = joined.iter().map(|j| j.right.as_ref().and_then(|r| r.rank)).collect();
    assert_eq!(ranks, vec![Some(2), Some(3)]);
}

#[test]
fn test_join_with_empty_right() {
    let tracts = tract_row(&[ids::WAYNE_TRACT, ids::TRAVIS_TRACT]);
    let joined = join_roi(&tracts.tracts, &[]);
    assert_eq!(joined.len(), 2);
    assert!(joined.iter().all(|j| !j.is_matched()));
}
