//! Map job definitions and batch job files.
//!
//! A batch file lists jobs tagged by kind:
//!
//! ```yaml
//! jobs:
//!   - kind: opportunity
//!     state: "26"
//!     county: "163"
//!     city: Detroit
//!     roi_path: data/roi_detroit.csv
//!     output: output/detroit_opportunity.png
//!   - kind: demographics
//!     state: MI
//!     county: "163"
//!     county_name: Wayne
//!     geo_path: mi2020.pl/migeo2020.pl
//!     part1_path: mi2020.pl/mi000012020.pl
//!     output: output/wayne_map.png
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use census_tables::{PlSchema, RoiColumns};
use renderer::{RenderConfig, UnmatchedColumns};
use tiger_loader::{LocalArchiveSource, TigerConfig, TigerTractSource, TractSource};
use tract_common::{StateCode, DEFAULT_YEAR};

fn default_year() -> u16 {
    DEFAULT_YEAR
}

fn default_unmatched_path() -> PathBuf {
    PathBuf::from("unmatched_tracts.csv")
}

/// Opportunity ranking map of one county.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityJob {
    /// State FIPS code or postal abbreviation
    pub state: String,

    /// Three-digit county code; the whole state when omitted
    #[serde(default)]
    pub county: Option<String>,

    #[serde(default = "default_year")]
    pub year: u16,

    /// Place name shown in the title
    pub city: String,

    pub roi_path: PathBuf,

    #[serde(default)]
    pub roi_columns: RoiColumns,

    /// PNG output path
    pub output: PathBuf,

    /// Tracts without a ranking, written only when set
    #[serde(default)]
    pub unmatched_path: Option<PathBuf>,

    /// GeoJSON export of the merged features
    #[serde(default)]
    pub geojson: Option<PathBuf>,

    /// JSON style file whose "opportunity" scheme replaces the built-in one
    #[serde(default)]
    pub style_file: Option<PathBuf>,

    #[serde(default)]
    pub render: RenderConfig,
}

impl OpportunityJob {
    pub fn title(&self) -> String {
        format!("Opportunity Rankings by Census Tract - {} ({})", self.city, self.year)
    }
}

/// Dominant race/ethnicity map of one county from PL 94-171 files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemographicJob {
    pub state: String,

    #[serde(default)]
    pub county: Option<String>,

    #[serde(default = "default_year")]
    pub year: u16,

    /// County name shown in the title
    pub county_name: String,

    /// Geographic header file
    pub geo_path: PathBuf,

    /// Part 1 segment file
    pub part1_path: PathBuf,

    #[serde(default)]
    pub schema: PlSchema,

    /// Keep only PL rows of this summary level ("140" for tracts)
    #[serde(default)]
    pub summary_level: Option<String>,

    pub output: PathBuf,

    #[serde(default = "default_unmatched_path")]
    pub unmatched_path: PathBuf,

    #[serde(default)]
    pub unmatched_columns: UnmatchedColumns,

    #[serde(default)]
    pub geojson: Option<PathBuf>,

    /// JSON style file whose "race_ethnicity" scheme replaces the built-in one
    #[serde(default)]
    pub style_file: Option<PathBuf>,

    #[serde(default)]
    pub render: RenderConfig,
}

impl DemographicJob {
    pub fn title(&self) -> String {
        format!(
            "Dominant Race/Ethnicity by Census Tract - {} County ({})",
            self.county_name, self.year
        )
    }
}

/// One entry of a batch file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapJob {
    Opportunity(OpportunityJob),
    Demographics(DemographicJob),
}

impl MapJob {
    pub fn output(&self) -> &Path {
        match self {
            MapJob::Opportunity(job) => &job.output,
            MapJob::Demographics(job) => &job.output,
        }
    }

    pub fn render_mut(&mut self) -> &mut RenderConfig {
        match self {
            MapJob::Opportunity(job) => &mut job.render,
            MapJob::Demographics(job) => &mut job.render,
        }
    }
}

/// A batch file: jobs run in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub jobs: Vec<MapJob>,
}

impl BatchConfig {
    /// Load a batch file from YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), jobs = config.jobs.len(), "Loaded map jobs");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Where tract geometries come from.
#[derive(Debug, Clone, Default)]
pub struct SourceSettings {
    pub tiger: TigerConfig,

    /// A tract archive on disk; skips the download when set
    pub archive: Option<PathBuf>,
}

impl SourceSettings {
    pub fn build(self) -> Result<Box<dyn TractSource>> {
        match self.archive {
            Some(path) => Ok(Box::new(LocalArchiveSource::new(path))),
            None => {
                let source = TigerTractSource::new(self.tiger).context("Failed to create tract source")?;
                Ok(Box::new(source))
            }
        }
    }
}

/// Parse a state argument, with context naming the job field.
pub(crate) fn parse_state(state: &str) -> Result<StateCode> {
    StateCode::parse(state).with_context(|| format!("Invalid state in job: {}", state))
}
