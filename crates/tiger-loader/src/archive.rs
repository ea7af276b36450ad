//! Reading tracts from TIGER/Line shapefile archives.
//!
//! Archives are unpacked into a temporary directory that is removed once the
//! shapefile has been read.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use geo::MultiPolygon;
use shapefile::dbase::{FieldValue, Record};
use shapefile::Shape;
use tracing::{debug, info, instrument, warn};
use zip::ZipArchive;

use tract_common::{GeoId, MapError, MapResult, StateCode, Tract, TractCollection};

use crate::source::{select_state, TractSource};

/// Read every tract in a zipped shapefile.
pub fn read_tract_archive(bytes: &[u8], year: u16) -> MapResult<TractCollection> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| MapError::Archive(format!("Not a zip archive: {}", e)))?;

    let shp_name = archive
        .file_names()
        .find(|name| name.to_ascii_lowercase().ends_with(".shp"))
        .map(str::to_string)
        .ok_or_else(|| MapError::Archive("Archive contains no .shp file".to_string()))?;

    let dir = tempfile::tempdir()?;
    archive
        .extract(dir.path())
        .map_err(|e| MapError::Archive(format!("Failed to unpack archive: {}", e)))?;

    debug!(shapefile = %shp_name, entries = archive.len(), "Unpacked tract archive");
    read_tract_shapefile(dir.path().join(&shp_name), year)
}

/// Read every tract in a shapefile with its `.dbf` sidecar.
pub fn read_tract_shapefile(path: impl AsRef<Path>, year: u16) -> MapResult<TractCollection> {
    let path = path.as_ref();
    let mut reader = shapefile::Reader::from_path(path)
        .map_err(|e| MapError::Archive(format!("Failed to open shapefile {}: {}", path.display(), e)))?;

    let suffix = format!("{:02}", year % 100);
    let mut tracts = Vec::new();
    let mut skipped = 0usize;

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.map_err(|e| MapError::Archive(format!("Bad shapefile record: {}", e)))?;

        let geometry = match polygon_geometry(shape)? {
            Some(geometry) => geometry,
            None => {
                skipped += 1;
                continue;
            }
        };

        let field = |name: &str| text_field(&record, name, &suffix);
        let geoid = field("GEOID")
            .ok_or_else(|| MapError::Archive(format!("Record without GEOID in {}", path.display())))?;

        tracts.push(Tract {
            geoid: GeoId::new(geoid),
            state_fp: field("STATEFP").unwrap_or_default(),
            county_fp: field("COUNTYFP").unwrap_or_default(),
            tract_ce: field("TRACTCE").unwrap_or_default(),
            name: field("NAME").unwrap_or_default(),
            geometry,
        });
    }

    if skipped > 0 {
        warn!(path = %path.display(), skipped = skipped, "Skipped non-polygon shapes");
    }

    Ok(TractCollection::new(year, tracts))
}

fn polygon_geometry(shape: Shape) -> MapResult<Option<MultiPolygon<f64>>> {
    let converted: Result<MultiPolygon<f64>, String> = match shape {
        Shape::Polygon(polygon) => polygon.try_into().map_err(|e| format!("{:?}", e)),
        Shape::PolygonM(polygon) => polygon.try_into().map_err(|e| format!("{:?}", e)),
        Shape::PolygonZ(polygon) => polygon.try_into().map_err(|e| format!("{:?}", e)),
        _ => return Ok(None),
    };
    converted
        .map(Some)
        .map_err(|e| MapError::Archive(format!("Failed to convert polygon: {}", e)))
}

/// Text value of a DBF field. Older vintages suffix field names with the
/// two-digit year (`GEOID10`), which is tried second.
fn text_field(record: &Record, name: &str, year_suffix: &str) -> Option<String> {
    let suffixed = format!("{}{}", name, year_suffix);
    [name, suffixed.as_str()].iter().find_map(|key| match record.get(key) {
        Some(FieldValue::Character(Some(s))) => Some(s.trim().to_string()),
        _ => None,
    })
}

/// Tract archive already on disk.
#[derive(Debug, Clone)]
pub struct LocalArchiveSource {
    path: PathBuf,
}

impl LocalArchiveSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TractSource for LocalArchiveSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn tracts(&self, state: &StateCode, year: u16) -> MapResult<TractCollection> {
        info!(state = %state, year = year, "Reading census tracts from local archive");
        let bytes = tokio::fs::read(&self.path).await?;
        let collection = tokio::task::spawn_blocking(move || read_tract_archive(&bytes, year))
            .await
            .map_err(|e| MapError::Archive(format!("Archive reader task failed: {}", e)))??;
        select_state(collection.tracts, state, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_zip_bytes_rejected() {
        let result = read_tract_archive(b"definitely not a zip", 2020);
        assert!(matches!(result, Err(MapError::Archive(_))));
    }

    #[test]
    fn test_zip_without_shapefile_rejected() {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer
                .start_file("README.txt", zip::write::FileOptions::default())
                .unwrap();
            std::io::Write::write_all(&mut writer, b"no shapes here").unwrap();
            writer.finish().unwrap();
        }

        match read_tract_archive(buffer.get_ref(), 2020) {
            Err(MapError::Archive(message)) => assert!(message.contains(".shp")),
            other => panic!("Expected Archive error, got {:?}", other),
        }
    }
}
