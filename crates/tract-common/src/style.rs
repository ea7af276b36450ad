//! Category styles for choropleth rendering.
//!
//! A [`CategoryScheme`] maps category values to fill colors and legend
//! labels. The two built-in schemes cover the opportunity and race/ethnicity
//! maps; other schemes can be loaded from a JSON file:
//!
//! ```json
//! {"version":"1.0","schemes":{"opportunity":{"name":"Opportunity","legend_title":"Opportunity Rankings",
//!   "entries":[{"value":"1","color":"#2ecc71","label":"High Opportunity Area"}]}}}
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::MapError;

/// Category assigned to tracts with no matching tabular row.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Root style configuration - can contain multiple named schemes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Version of the style schema
    #[serde(default = "default_version")]
    pub version: String,

    /// Named category schemes
    pub schemes: HashMap<String, CategoryScheme>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl StyleConfig {
    /// Load style configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse style configuration from JSON string.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let config: StyleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Get a scheme by name.
    pub fn get(&self, name: &str) -> Option<&CategoryScheme> {
        self.schemes.get(name)
    }

    /// Validate all schemes in the configuration.
    pub fn validate(&self) -> Result<(), MapError> {
        for (name, scheme) in &self.schemes {
            scheme
                .validate()
                .map_err(|e| MapError::Style(format!("{}: {}", name, e)))?;
        }
        Ok(())
    }
}

/// Ordered category → color → label mapping with a fallback fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScheme {
    /// Human-readable name
    pub name: String,

    /// Title drawn above the legend patches
    pub legend_title: String,

    /// Entries in legend order
    pub entries: Vec<CategoryEntry>,

    /// Fill for categories not listed in `entries`
    #[serde(default = "default_fill")]
    pub default_color: Color,

    /// Tract outline, none when omitted
    #[serde(default)]
    pub edge: Option<EdgeStyle>,
}

fn default_fill() -> Color {
    Color::Hex("#FFFFFF".to_string())
}

/// One category of a scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    /// Category value as it appears in the merged data
    pub value: String,

    pub color: Color,

    /// Label for legend
    pub label: String,
}

/// Polygon outline style.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeStyle {
    pub color: Color,

    /// Line width in points (1/72 in)
    #[serde(default = "default_edge_width")]
    pub width_pt: f32,
}

fn default_edge_width() -> f32 {
    1.0
}

impl CategoryScheme {
    pub fn validate(&self) -> Result<(), String> {
        if self.entries.is_empty() {
            return Err("Scheme must have at least 1 category".to_string());
        }

        let mut seen = HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.value.as_str()) {
                return Err(format!("Duplicate category '{}'", entry.value));
            }
        }

        if let Some(edge) = &self.edge {
            if edge.width_pt < 0.0 {
                return Err("Edge width must not be negative".to_string());
            }
        }

        Ok(())
    }

    pub fn entry(&self, category: &str) -> Option<&CategoryEntry> {
        self.entries.iter().find(|e| e.value == category)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.entry(category).is_some()
    }

    /// Fill color for a category, the default fill when it is not listed.
    pub fn color_for(&self, category: &str) -> (u8, u8, u8, u8) {
        self.entry(category)
            .map(|e| e.color.to_rgba())
            .unwrap_or_else(|| self.default_color.to_rgba())
    }

    /// Opportunity rankings (1 = high, 3 = low) with gray tract outlines.
    pub fn opportunity() -> Self {
        CategoryScheme {
            name: "Opportunity Rankings".to_string(),
            legend_title: "Opportunity Rankings".to_string(),
            entries: vec![
                entry("1", "#2ecc71", "High Opportunity Area"),
                entry("2", "#f1c40f", "Medium Opportunity Area"),
                entry("3", "#e74c3c", "Low Opportunity Area"),
            ],
            default_color: default_fill(),
            edge: Some(EdgeStyle {
                color: Color::Named("0.8".to_string()),
                width_pt: 0.8,
            }),
        }
    }

    /// Dominant race/ethnicity, including the `Unknown` sentinel.
    pub fn race_ethnicity() -> Self {
        CategoryScheme {
            name: "Dominant Race/Ethnicity".to_string(),
            legend_title: "Dominant Race/Ethnicity".to_string(),
            entries: vec![
                entry("white_nh", "#FFB6C1", "White (Non-Hispanic)"),
                entry("black_alone", "#87CEEB", "Black/African American"),
                entry("asian_alone", "#98FB98", "Asian"),
                entry("hispanic", "#DDA0DD", "Hispanic/Latino"),
                entry("aian_alone", "#F0E68C", "American Indian/Alaska Native"),
                entry("nhpi_alone", "#FFA07A", "Native Hawaiian/Pacific Islander"),
                entry("other_alone", "#D3D3D3", "Other Race"),
                entry(UNKNOWN_CATEGORY, "#FFFFFF", "Unknown"),
            ],
            default_color: default_fill(),
            edge: None,
        }
    }
}

fn entry(value: &str, hex: &str, label: &str) -> CategoryEntry {
    CategoryEntry {
        value: value.to_string(),
        color: Color::Hex(hex.to_string()),
        label: label.to_string(),
    }
}

/// Color representation supporting multiple formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// Hex string: "#RRGGBB" or "#RRGGBBAA"
    Hex(String),

    /// RGB array: [r, g, b] or [r, g, b, a]
    Array(Vec<u8>),

    /// Named color, or a gray level between "0" and "1"
    Named(String),

    /// Explicit RGBA
    Rgba { r: u8, g: u8, b: u8, a: u8 },
}

impl Color {
    /// Convert to RGBA tuple.
    pub fn to_rgba(&self) -> (u8, u8, u8, u8) {
        match self {
            Color::Hex(s) if s.starts_with('#') => parse_hex_color(s),
            Color::Hex(s) | Color::Named(s) => named_color(s),
            Color::Array(arr) => {
                let r = arr.first().copied().unwrap_or(0);
                let g = arr.get(1).copied().unwrap_or(0);
                let b = arr.get(2).copied().unwrap_or(0);
                let a = arr.get(3).copied().unwrap_or(255);
                (r, g, b, a)
            }
            Color::Rgba { r, g, b, a } => (*r, *g, *b, *a),
        }
    }
}

fn parse_hex_color(s: &str) -> (u8, u8, u8, u8) {
    let s = s.trim_start_matches('#');
    let channel = |i: usize| u8::from_str_radix(s.get(i..i + 2).unwrap_or("00"), 16).unwrap_or(0);

    match s.len() {
        6 => (channel(0), channel(2), channel(4), 255),
        8 => (channel(0), channel(2), channel(4), channel(6)),
        _ => (0, 0, 0, 255),
    }
}

fn named_color(name: &str) -> (u8, u8, u8, u8) {
    // Gray level string, "0.8" is a light gray
    if let Ok(level) = name.trim().parse::<f64>() {
        if (0.0..=1.0).contains(&level) {
            let v = (level * 255.0).round() as u8;
            return (v, v, v, 255);
        }
    }

    match name.to_lowercase().as_str() {
        "transparent" | "none" => (0, 0, 0, 0),
        "black" => (0, 0, 0, 255),
        "white" => (255, 255, 255, 255),
        "red" => (255, 0, 0, 255),
        "green" => (0, 255, 0, 255),
        "blue" => (0, 0, 255, 255),
        "yellow" => (255, 255, 0, 255),
        "orange" => (255, 165, 0, 255),
        "purple" => (128, 0, 128, 255),
        "gray" | "grey" => (128, 128, 128, 255),
        "lightgray" | "lightgrey" => (211, 211, 211, 255),
        _ => (0, 0, 0, 255),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scheme_config() {
        let json = r##"{"version":"1.0","schemes":{"tiers":{"name":"Tiers","legend_title":"Tier","entries":[{"value":"A","color":"#FF0000","label":"Tier A"},{"value":"B","color":[0,0,255],"label":"Tier B"}],"default_color":"gray","edge":{"color":"0.5","width_pt":0.5}}}}"##;

        let config = StyleConfig::from_json(json).unwrap();
        let scheme = config.get("tiers").unwrap();
        assert_eq!(scheme.entries.len(), 2);
        assert_eq!(scheme.color_for("A"), (255, 0, 0, 255));
        assert_eq!(scheme.color_for("B"), (0, 0, 255, 255));
        assert_eq!(scheme.color_for("C"), (128, 128, 128, 255));
        assert_eq!(scheme.edge.as_ref().unwrap().color.to_rgba(), (128, 128, 128, 255));
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let json = r##"{"schemes":{"dup":{"name":"Dup","legend_title":"Dup","entries":[{"value":"1","color":"#000000","label":"a"},{"value":"1","color":"#FFFFFF","label":"b"}]}}}"##;
        assert!(matches!(StyleConfig::from_json(json), Err(MapError::Style(_))));
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!(Color::Hex("#FF5500".to_string()).to_rgba(), (255, 85, 0, 255));
        assert_eq!(Color::Hex("#2ecc71".to_string()).to_rgba(), (46, 204, 113, 255));
        assert_eq!(Color::Array(vec![100, 150, 200]).to_rgba(), (100, 150, 200, 255));
        assert_eq!(Color::Named("red".to_string()).to_rgba(), (255, 0, 0, 255));
        assert_eq!(Color::Named("0.8".to_string()).to_rgba(), (204, 204, 204, 255));
    }

    #[test]
    fn test_builtin_schemes_validate() {
        assert!(CategoryScheme::opportunity().validate().is_ok());
        assert!(CategoryScheme::race_ethnicity().validate().is_ok());
    }

    #[test]
    fn test_unlisted_category_uses_default() {
        let scheme = CategoryScheme::opportunity();
        assert_eq!(scheme.color_for("4"), (255, 255, 255, 255));
        assert_eq!(scheme.color_for(UNKNOWN_CATEGORY), (255, 255, 255, 255));
    }
}
