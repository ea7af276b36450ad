//! Side file listing tracts that fell back to the unknown category.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use tract_common::{MapResult, UNKNOWN_CATEGORY};

use crate::choropleth::MapFeature;

/// Header names of the unmatched side file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedColumns {
    #[serde(default = "default_id_header")]
    pub id: String,
    #[serde(default = "default_category_header")]
    pub category: String,
}

fn default_id_header() -> String {
    "GEOID".to_string()
}

fn default_category_header() -> String {
    "dominant_race".to_string()
}

impl Default for UnmatchedColumns {
    fn default() -> Self {
        Self {
            id: default_id_header(),
            category: default_category_header(),
        }
    }
}

/// Write features whose category is [`UNKNOWN_CATEGORY`] to a CSV file.
///
/// Nothing is written when there are none. Returns the number of rows written.
pub fn write_unmatched(
    path: impl AsRef<Path>,
    features: &[MapFeature],
    columns: &UnmatchedColumns,
) -> MapResult<usize> {
    let path = path.as_ref();
    let unmatched: Vec<&MapFeature> = features
        .iter()
        .filter(|f| f.category == UNKNOWN_CATEGORY)
        .collect();

    if unmatched.is_empty() {
        return Ok(0);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([columns.id.as_str(), columns.category.as_str()])?;
    for feature in &unmatched {
        writer.write_record([feature.geoid.as_str(), feature.category.as_str()])?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = unmatched.len(), "Wrote unmatched tracts");
    Ok(unmatched.len())
}
