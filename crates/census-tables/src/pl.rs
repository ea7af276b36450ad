//! PL 94-171 redistricting data extraction.
//!
//! A PL release ships a geographic header file and numbered segment files
//! ("Part 1" holds the race and Hispanic-origin tables). Both are
//! pipe-delimited without headers, and their rows line up one-to-one by file
//! order. Field positions are taken from a [`PlSchema`] so a new file-format
//! revision only needs a new schema table.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tract_common::{GeoId, MapError, MapResult};

use crate::numeric::coerce_number;
use crate::reader::{read_delimited, ReadOptions, Table};

/// Column positions in the geographic header file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoColumns {
    pub summary_level: usize,
    pub logrecno: usize,
    pub geoid: usize,
    pub county: usize,
    pub before_county: usize,
    pub after_county: usize,
}

/// Column positions in the Part 1 segment file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part1Columns {
    pub logrecno: usize,
    pub total_pop: usize,
    pub white_alone: usize,
    pub black_alone: usize,
    pub aian_alone: usize,
    pub asian_alone: usize,
    pub nhpi_alone: usize,
    pub other_alone: usize,
    pub hispanic: usize,
}

/// Logical field → column index table for one PL file-format revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlSchema {
    pub geo: GeoColumns,
    pub part1: Part1Columns,
}

impl PlSchema {
    /// Positions used for the 2020 PL release.
    pub fn pl_2020() -> Self {
        PlSchema {
            geo: GeoColumns {
                summary_level: 2,
                logrecno: 7,
                geoid: 9,
                county: 14,
                before_county: 88,
                after_county: 90,
            },
            part1: Part1Columns {
                logrecno: 4,
                total_pop: 6,
                white_alone: 7,
                black_alone: 8,
                aian_alone: 9,
                asian_alone: 10,
                nhpi_alone: 11,
                other_alone: 12,
                hispanic: 73,
            },
        }
    }
}

impl Default for PlSchema {
    fn default() -> Self {
        Self::pl_2020()
    }
}

/// Race/ethnicity categories in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RaceCategory {
    WhiteNh,
    BlackAlone,
    AianAlone,
    AsianAlone,
    NhpiAlone,
    OtherAlone,
    Hispanic,
}

impl RaceCategory {
    /// Candidate order for the dominant-category pick; earlier wins ties.
    pub const ORDER: [RaceCategory; 7] = [
        RaceCategory::WhiteNh,
        RaceCategory::BlackAlone,
        RaceCategory::AianAlone,
        RaceCategory::AsianAlone,
        RaceCategory::NhpiAlone,
        RaceCategory::OtherAlone,
        RaceCategory::Hispanic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RaceCategory::WhiteNh => "white_nh",
            RaceCategory::BlackAlone => "black_alone",
            RaceCategory::AianAlone => "aian_alone",
            RaceCategory::AsianAlone => "asian_alone",
            RaceCategory::NhpiAlone => "nhpi_alone",
            RaceCategory::OtherAlone => "other_alone",
            RaceCategory::Hispanic => "hispanic",
        }
    }
}

impl fmt::Display for RaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Population counts and geography for one PL row.
///
/// Counts are `None` where the source field was not numeric.
#[derive(Debug, Clone, PartialEq)]
pub struct DemographicRecord {
    pub geoid: GeoId,
    pub summary_level: String,
    pub county: String,
    pub before_county: Option<String>,
    pub after_county: Option<String>,
    pub total_pop: Option<f64>,
    pub white_alone: Option<f64>,
    pub black_alone: Option<f64>,
    pub aian_alone: Option<f64>,
    pub asian_alone: Option<f64>,
    pub nhpi_alone: Option<f64>,
    pub other_alone: Option<f64>,
    pub hispanic: Option<f64>,
    /// `white_alone - hispanic`, unclamped
    pub white_nh: Option<f64>,
    pub dominant: Option<RaceCategory>,
}

impl DemographicRecord {
    pub fn count(&self, category: RaceCategory) -> Option<f64> {
        match category {
            RaceCategory::WhiteNh => self.white_nh,
            RaceCategory::BlackAlone => self.black_alone,
            RaceCategory::AianAlone => self.aian_alone,
            RaceCategory::AsianAlone => self.asian_alone,
            RaceCategory::NhpiAlone => self.nhpi_alone,
            RaceCategory::OtherAlone => self.other_alone,
            RaceCategory::Hispanic => self.hispanic,
        }
    }

    /// Category value used for styling.
    pub fn category(&self) -> Option<String> {
        self.dominant.map(|c| c.as_str().to_string())
    }
}

/// Category with the largest count; the first in [`RaceCategory::ORDER`]
/// wins ties and missing counts are skipped.
pub fn dominant_category(record: &DemographicRecord) -> Option<RaceCategory> {
    let mut best: Option<(RaceCategory, f64)> = None;
    for category in RaceCategory::ORDER {
        if let Some(value) = record.count(category) {
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((category, value)),
            }
        }
    }
    best.map(|(category, _)| category)
}

/// Read a PL release's geographic header and Part 1 files and extract one
/// record per row.
pub fn read_pl_data(
    geo_path: impl AsRef<Path>,
    part1_path: impl AsRef<Path>,
    schema: &PlSchema,
) -> MapResult<Vec<DemographicRecord>> {
    let options = ReadOptions::pipe_delimited();

    info!(path = %geo_path.as_ref().display(), "Reading geographic header file");
    let geo = read_delimited(geo_path, &options)?;

    info!(path = %part1_path.as_ref().display(), "Reading Part 1 demographic file");
    let part1 = read_delimited(part1_path, &options)?;

    info!("Processing demographic data");
    extract_demographics(&geo, &part1, schema)
}

/// Pair geographic header rows with Part 1 rows by position and extract
/// the demographic fields.
pub fn extract_demographics(
    geo: &Table,
    part1: &Table,
    schema: &PlSchema,
) -> MapResult<Vec<DemographicRecord>> {
    if geo.len() != part1.len() {
        return Err(MapError::RowCountMismatch {
            left: geo.path.display().to_string(),
            left_rows: geo.len(),
            right: part1.path.display().to_string(),
            right_rows: part1.len(),
        });
    }

    let g = &schema.geo;
    let p = &schema.part1;
    let mut misaligned = 0usize;

    let records: Vec<DemographicRecord> = geo
        .rows
        .iter()
        .zip(part1.rows.iter())
        .map(|(geo_row, part1_row)| {
            if geo_row.get(g.logrecno).map(str::trim) != part1_row.get(p.logrecno).map(str::trim) {
                misaligned += 1;
            }

            let count = |column: usize| part1_row.get(column).and_then(coerce_number);
            let text = |column: usize| geo_row.get(column).map(str::to_string);

            let white_alone = count(p.white_alone);
            let hispanic = count(p.hispanic);

            let mut record = DemographicRecord {
                geoid: GeoId::new(geo_row.get(g.geoid).unwrap_or("")),
                summary_level: geo_row.get(g.summary_level).unwrap_or("").trim().to_string(),
                county: geo_row.get(g.county).unwrap_or("").trim().to_string(),
                before_county: text(g.before_county),
                after_county: text(g.after_county),
                total_pop: count(p.total_pop),
                white_alone,
                black_alone: count(p.black_alone),
                aian_alone: count(p.aian_alone),
                asian_alone: count(p.asian_alone),
                nhpi_alone: count(p.nhpi_alone),
                other_alone: count(p.other_alone),
                hispanic,
                white_nh: white_alone.zip(hispanic).map(|(w, h)| w - h),
                dominant: None,
            };
            record.dominant = dominant_category(&record);
            record
        })
        .collect();

    if misaligned > 0 {
        warn!(
            geo = %geo.path.display(),
            part1 = %part1.path.display(),
            rows = misaligned,
            "Logical record numbers differ between PL files"
        );
    }

    Ok(records)
}

/// Keep only rows of one summary level (e.g. "140" for census tracts).
pub fn filter_summary_level(records: Vec<DemographicRecord>, level: &str) -> Vec<DemographicRecord> {
    let level = level.trim();
    records
        .into_iter()
        .filter(|r| r.summary_level == level)
        .collect()
}
