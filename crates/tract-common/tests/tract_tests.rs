//! Tests for TractCollection filtering and extents.

use geo::{polygon, MultiPolygon};
use tract_common::{GeoId, Tract, TractCollection};

fn square(geoid: &str, county: &str, x: f64, y: f64) -> Tract {
    let poly = polygon![
        (x: x, y: y),
        (x: x + 1.0, y: y),
        (x: x + 1.0, y: y + 1.0),
        (x: x, y: y + 1.0),
    ];
    Tract {
        geoid: GeoId::new(geoid),
        state_fp: geoid[0..2].to_string(),
        county_fp: county.to_string(),
        tract_ce: geoid[5..].to_string(),
        name: geoid[5..].to_string(),
        geometry: MultiPolygon::new(vec![poly]),
    }
}

// ============================================================================
// County filter
// ============================================================================

#[test]
fn test_in_county_keeps_matching_tracts() {
    let tracts = TractCollection::new(
        2020,
        vec![
            square("26163010100", "163", 0.0, 0.0),
            square("26125100100", "125", 1.0, 0.0),
            square("26163010200", "163", 2.0, 0.0),
        ],
    );

    let wayne = tracts.in_county("163");
    assert_eq!(wayne.len(), 2);
    assert_eq!(wayne.year, 2020);
    assert!(wayne.iter().all(|t| t.county_fp == "163"));
    assert_eq!(wayne.tracts[0].geoid.as_str(), "26163010100");
    assert_eq!(wayne.tracts[1].geoid.as_str(), "26163010200");
}

#[test]
fn test_in_county_compares_as_text() {
    let tracts = TractCollection::new(2020, vec![square("04001944201", "001", 0.0, 0.0)]);

    assert_eq!(tracts.in_county("001").len(), 1);
    assert!(tracts.in_county("1").is_empty());
}

#[test]
fn test_in_county_no_match_is_empty() {
    let tracts = TractCollection::new(2020, vec![square("26163010100", "163", 0.0, 0.0)]);
    assert!(tracts.in_county("999").is_empty());
}

// ============================================================================
// Extent
// ============================================================================

#[test]
fn test_extent_covers_all_tracts() {
    let tracts = TractCollection::new(
        2020,
        vec![
            square("26163010100", "163", -84.0, 42.0),
            square("26163010200", "163", -82.0, 43.0),
        ],
    );

    let extent = tracts.extent().unwrap();
    assert_eq!(extent.min_x, -84.0);
    assert_eq!(extent.min_y, 42.0);
    assert_eq!(extent.max_x, -81.0);
    assert_eq!(extent.max_y, 44.0);
}

#[test]
fn test_extent_of_empty_collection() {
    assert!(TractCollection::default().extent().is_none());
}
