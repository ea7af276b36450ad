//! Common test fixtures for tract-maps tests.

use geo::{LineString, MultiPolygon, Polygon};
use tract_common::{GeoId, Tract, TractCollection};

/// Well-known identifiers.
pub mod ids {
    /// Wayne County, MI tract used throughout the examples
    pub const WAYNE_TRACT: &str = "26163010100";

    /// A second Wayne County tract
    pub const WAYNE_TRACT_2: &str = "26163010200";

    /// Apache County, AZ: state code with a leading zero
    pub const APACHE_TRACT: &str = "04001944201";

    /// Travis County, TX
    pub const TRAVIS_TRACT: &str = "48453000101";
}

/// An axis-aligned square polygon with its lower-left corner at (x, y).
pub fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
    let exterior = LineString::from(vec![
        (x, y),
        (x + size, y),
        (x + size, y + size),
        (x, y + size),
        (x, y),
    ]);
    MultiPolygon::new(vec![Polygon::new(exterior, vec![])])
}

/// A tract whose codes are sliced from an 11-digit GEOID.
pub fn tract(geoid: &str, geometry: MultiPolygon<f64>) -> Tract {
    Tract {
        geoid: GeoId::new(geoid),
        state_fp: geoid.get(0..2).unwrap_or("").to_string(),
        county_fp: geoid.get(2..5).unwrap_or("").to_string(),
        tract_ce: geoid.get(5..).unwrap_or("").to_string(),
        name: geoid.get(5..).unwrap_or("").to_string(),
        geometry,
    }
}

/// A 0.01° square tract placed at column `index` along a row near Detroit.
pub fn square_tract(geoid: &str, index: usize) -> Tract {
    tract(geoid, square(-83.2 + index as f64 * 0.01, 42.3, 0.01))
}

/// Collection of square tracts laid out left to right.
pub fn tract_row(geoids: &[&str]) -> TractCollection {
    TractCollection::new(
        2020,
        geoids
            .iter()
            .enumerate()
            .map(|(i, id)| square_tract(id, i))
            .collect(),
    )
}

/// Builders for pipe-delimited PL 94-171 rows.
pub mod pl {
    /// Width of generated geographic header rows.
    pub const GEO_WIDTH: usize = 92;

    /// Width of generated Part 1 rows.
    pub const PART1_WIDTH: usize = 80;

    /// Part 1 counts in schema order.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Counts<'a> {
        pub total_pop: &'a str,
        pub white_alone: &'a str,
        pub black_alone: &'a str,
        pub aian_alone: &'a str,
        pub asian_alone: &'a str,
        pub nhpi_alone: &'a str,
        pub other_alone: &'a str,
        pub hispanic: &'a str,
    }

    /// A geographic header row with fields at the 2020 positions.
    pub fn geo_row(logrecno: &str, summary_level: &str, geoid: &str, county: &str) -> String {
        let mut fields = vec![String::new(); GEO_WIDTH];
        fields[0] = "PLST".to_string();
        fields[1] = "MI".to_string();
        fields[2] = summary_level.to_string();
        fields[7] = logrecno.to_string();
        fields[9] = geoid.to_string();
        fields[14] = county.to_string();
        fields[88] = "B".to_string();
        fields[90] = "A".to_string();
        fields.join("|")
    }

    /// A Part 1 row with counts at the 2020 positions.
    pub fn part1_row(logrecno: &str, counts: Counts<'_>) -> String {
        let mut fields = vec!["0".to_string(); PART1_WIDTH];
        fields[0] = "PLST".to_string();
        fields[1] = "MI".to_string();
        fields[2] = "000".to_string();
        fields[3] = "01".to_string();
        fields[4] = logrecno.to_string();
        fields[6] = counts.total_pop.to_string();
        fields[7] = counts.white_alone.to_string();
        fields[8] = counts.black_alone.to_string();
        fields[9] = counts.aian_alone.to_string();
        fields[10] = counts.asian_alone.to_string();
        fields[11] = counts.nhpi_alone.to_string();
        fields[12] = counts.other_alone.to_string();
        fields[73] = counts.hispanic.to_string();
        fields.join("|")
    }
}
