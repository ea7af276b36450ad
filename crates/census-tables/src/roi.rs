//! Opportunity ranking (ROI) flat files.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use tract_common::{GeoId, MapResult};

use crate::numeric::coerce_number;
use crate::reader::{read_delimited, ReadOptions, Table};

/// Column names of an ROI file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiColumns {
    #[serde(default = "default_id_column")]
    pub id: String,
    #[serde(default = "default_rank_column")]
    pub rank: String,
}

fn default_id_column() -> String {
    "FIPS".to_string()
}

fn default_rank_column() -> String {
    "COMP_RANK".to_string()
}

impl Default for RoiColumns {
    fn default() -> Self {
        Self {
            id: default_id_column(),
            rank: default_rank_column(),
        }
    }
}

/// One tract's opportunity ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RoiRecord {
    pub fips: GeoId,
    /// Rank, 1 = highest opportunity. `None` when the field is not an integer.
    pub rank: Option<i64>,
}

impl RoiRecord {
    /// Category value used for styling: the rank as text.
    pub fn category(&self) -> Option<String> {
        self.rank.map(|r| r.to_string())
    }
}

/// Read an ROI CSV file.
pub fn read_roi(path: impl AsRef<Path>, columns: &RoiColumns) -> MapResult<Vec<RoiRecord>> {
    let table = read_delimited(path, &ReadOptions::csv_with_headers())?;
    roi_records(&table, columns)
}

/// Extract ROI records from an already loaded table.
pub fn roi_records(table: &Table, columns: &RoiColumns) -> MapResult<Vec<RoiRecord>> {
    let id_idx = table.column_index(&columns.id)?;
    let rank_idx = table.column_index(&columns.rank)?;

    let records: Vec<RoiRecord> = table
        .rows
        .iter()
        .map(|row| RoiRecord {
            fips: GeoId::new(row.get(id_idx).unwrap_or("")),
            rank: row.get(rank_idx).and_then(parse_rank),
        })
        .collect();

    let unranked = records.iter().filter(|r| r.rank.is_none()).count();
    if unranked > 0 {
        warn!(
            path = %table.path.display(),
            unranked = unranked,
            "ROI rows without a numeric rank"
        );
    }

    Ok(records)
}

fn parse_rank(raw: &str) -> Option<i64> {
    coerce_number(raw).and_then(|v| {
        if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
            Some(v as i64)
        } else {
            None
        }
    })
}
