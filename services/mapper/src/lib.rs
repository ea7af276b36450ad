//! Census tract choropleth map jobs.
//!
//! - Opportunity ranking maps from ROI files
//! - Dominant race/ethnicity maps from PL 94-171 files
//! - Batch job files in YAML

pub mod config;
pub mod export;
pub mod pipeline;

pub use config::{BatchConfig, DemographicJob, MapJob, OpportunityJob, SourceSettings};
pub use export::{feature_collection, write_geojson};
pub use pipeline::{run_batch, run_demographic_map, run_opportunity_map, MapSummary};
