//! GeoJSON export of merged map features.

use std::path::Path;

use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue};
use tracing::info;

use renderer::MapFeature;

/// Build a feature collection with `GEOID` and `category_field` properties.
pub fn feature_collection(features: &[MapFeature], category_field: &str) -> FeatureCollection {
    features
        .iter()
        .map(|feature| {
            let mut properties = JsonObject::new();
            properties.insert("GEOID".to_string(), JsonValue::from(feature.geoid.as_str()));
            properties.insert(category_field.to_string(), JsonValue::from(feature.category.as_str()));

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::from(&feature.geometry))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect()
}

/// Write features to a GeoJSON file and return the feature count.
pub fn write_geojson(path: &Path, features: &[MapFeature], category_field: &str) -> Result<usize> {
    let collection = feature_collection(features, category_field);
    let count = collection.features.len();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let out = GeoJson::from(collection);
    std::fs::write(path, out.to_string())
        .with_context(|| format!("Failed to write GeoJSON: {}", path.display()))?;

    info!(path = %path.display(), features = count, "Wrote GeoJSON");
    Ok(count)
}
