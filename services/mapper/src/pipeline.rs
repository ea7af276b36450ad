//! Map job pipelines.
//!
//! Each job loads tracts, narrows them to a county, merges tabular records
//! onto them by GEOID and renders the result. Nothing runs until a pipeline
//! function is called.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use census_tables::{filter_summary_level, left_join, read_pl_data, read_roi, DemographicRecord, Joined, RoiRecord};
use renderer::{render_choropleth, write_unmatched, MapFeature, RenderConfig, SavedImage, UnmatchedColumns};
use tiger_loader::TractSource;
use tract_common::{CategoryScheme, StyleConfig, Tract, TractCollection, UNKNOWN_CATEGORY};

use crate::config::{parse_state, BatchConfig, DemographicJob, MapJob, OpportunityJob};
use crate::export::write_geojson;

/// Outcome of one map job.
#[derive(Debug, Clone)]
pub struct MapSummary {
    /// Tracts in the mapped area
    pub tracts: usize,
    /// Merged rows with a tabular match
    pub matched: usize,
    /// Merged rows filled with the sentinel category
    pub unmatched: usize,
    pub output: SavedImage,
    /// Unmatched side file, when one was written
    pub unmatched_file: Option<PathBuf>,
    pub geojson: Option<PathBuf>,
}

/// Render an opportunity ranking map.
#[instrument(skip(job, source), fields(state = %job.state, city = %job.city))]
pub async fn run_opportunity_map(job: &OpportunityJob, source: &dyn TractSource) -> Result<MapSummary> {
    let tracts = load_area(source, &job.state, job.county.as_deref(), job.year).await?;

    info!(path = %job.roi_path.display(), "Reading ROI data");
    let roi = read_roi(&job.roi_path, &job.roi_columns)
        .with_context(|| format!("Failed to read ROI file: {}", job.roi_path.display()))?;

    let merged = left_join(
        &tracts.tracts,
        &roi,
        |t: &Tract| t.geoid.as_str(),
        |r: &RoiRecord| r.fips.as_str(),
    );
    let features = map_features(&merged, RoiRecord::category);

    let scheme = resolve_scheme(job.style_file.as_deref(), "opportunity", CategoryScheme::opportunity)?;
    let output = render(&features, &scheme, &job.title(), &job.output, &job.render)?;

    let unmatched_file = match &job.unmatched_path {
        Some(path) => {
            let columns = UnmatchedColumns {
                category: job.roi_columns.rank.clone(),
                ..UnmatchedColumns::default()
            };
            write_side_file(path, &features, &columns)?
        }
        None => None,
    };

    let geojson = export(job.geojson.as_deref(), &features, &job.roi_columns.rank)?;
    Ok(summarize(tracts.len(), &merged, output, unmatched_file, geojson))
}

/// Render a dominant race/ethnicity map and write the unmatched side file.
#[instrument(skip(job, source), fields(state = %job.state, county = %job.county_name))]
pub async fn run_demographic_map(job: &DemographicJob, source: &dyn TractSource) -> Result<MapSummary> {
    let tracts = load_area(source, &job.state, job.county.as_deref(), job.year).await?;

    let mut records = read_pl_data(&job.geo_path, &job.part1_path, &job.schema)
        .context("Failed to read PL 94-171 files")?;
    if let Some(level) = &job.summary_level {
        let total = records.len();
        records = filter_summary_level(records, level);
        info!(level = %level, total = total, kept = records.len(), "Filtered PL rows by summary level");
    }

    let merged = left_join(
        &tracts.tracts,
        &records,
        |t: &Tract| t.geoid.as_str(),
        |r: &DemographicRecord| r.geoid.as_str(),
    );
    let features = map_features(&merged, DemographicRecord::category);

    let scheme = resolve_scheme(job.style_file.as_deref(), "race_ethnicity", CategoryScheme::race_ethnicity)?;
    let output = render(&features, &scheme, &job.title(), &job.output, &job.render)?;

    let unmatched_file = write_side_file(&job.unmatched_path, &features, &job.unmatched_columns)?;
    let geojson = export(job.geojson.as_deref(), &features, &job.unmatched_columns.category)?;
    Ok(summarize(tracts.len(), &merged, output, unmatched_file, geojson))
}

/// Run batch jobs in order, stopping at the first failure.
pub async fn run_batch(config: &BatchConfig, source: &dyn TractSource) -> Result<Vec<MapSummary>> {
    let mut summaries = Vec::with_capacity(config.jobs.len());

    for (i, job) in config.jobs.iter().enumerate() {
        info!(job = i + 1, of = config.jobs.len(), output = %job.output().display(), "Running map job");
        let summary = match job {
            MapJob::Opportunity(job) => run_opportunity_map(job, source).await,
            MapJob::Demographics(job) => run_demographic_map(job, source).await,
        }
        .with_context(|| format!("Map job {} ({}) failed", i + 1, job.output().display()))?;
        summaries.push(summary);
    }

    Ok(summaries)
}

/// Tracts of a state, narrowed to one county when given.
async fn load_area(
    source: &dyn TractSource,
    state: &str,
    county: Option<&str>,
    year: u16,
) -> Result<TractCollection> {
    let state = parse_state(state)?;
    let tracts = source
        .tracts(&state, year)
        .await
        .with_context(|| format!("Failed to load census tracts for state {}", state))?;

    let Some(county) = county else {
        return Ok(tracts);
    };

    let selected = tracts.in_county(county.trim());
    if selected.is_empty() {
        warn!(state = %state, county = %county, "No tracts in county");
    } else {
        info!(state = %state, county = %county, tracts = selected.len(), "Selected county tracts");
    }
    Ok(selected)
}

/// One feature per merged row; rows without a category get the sentinel.
fn map_features<R>(merged: &[Joined<Tract, R>], category: impl Fn(&R) -> Option<String>) -> Vec<MapFeature> {
    merged
        .iter()
        .map(|row| MapFeature {
            geoid: row.left.geoid.clone(),
            category: row
                .right
                .as_ref()
                .and_then(&category)
                .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
            geometry: row.left.geometry.clone(),
        })
        .collect()
}

/// A named scheme from a style file, the built-in one otherwise.
fn resolve_scheme(
    style_file: Option<&Path>,
    name: &str,
    builtin: fn() -> CategoryScheme,
) -> Result<CategoryScheme> {
    let Some(path) = style_file else {
        return Ok(builtin());
    };

    let style = StyleConfig::from_file(path)
        .with_context(|| format!("Failed to load style file: {}", path.display()))?;
    let scheme = style
        .get(name)
        .cloned()
        .with_context(|| format!("Style file {} has no '{}' scheme", path.display(), name))?;

    info!(path = %path.display(), scheme = %name, "Using scheme from style file");
    Ok(scheme)
}

fn render(
    features: &[MapFeature],
    scheme: &CategoryScheme,
    title: &str,
    output: &Path,
    config: &RenderConfig,
) -> Result<SavedImage> {
    let figure = render_choropleth(features, scheme, title, config).context("Failed to render map")?;

    figure
        .save_png(output, config.pad_in)
        .with_context(|| format!("Failed to save map: {}", output.display()))
}

fn write_side_file(path: &Path, features: &[MapFeature], columns: &UnmatchedColumns) -> Result<Option<PathBuf>> {
    let written = write_unmatched(path, features, columns)
        .with_context(|| format!("Failed to write unmatched tracts: {}", path.display()))?;
    Ok((written > 0).then(|| path.to_path_buf()))
}

fn export(path: Option<&Path>, features: &[MapFeature], category_field: &str) -> Result<Option<PathBuf>> {
    match path {
        Some(path) => {
            write_geojson(path, features, category_field)?;
            Ok(Some(path.to_path_buf()))
        }
        None => Ok(None),
    }
}

fn summarize<R>(
    tracts: usize,
    merged: &[Joined<Tract, R>],
    output: SavedImage,
    unmatched_file: Option<PathBuf>,
    geojson: Option<PathBuf>,
) -> MapSummary {
    let matched = merged.iter().filter(|row| row.is_matched()).count();
    let summary = MapSummary {
        tracts,
        matched,
        unmatched: merged.len() - matched,
        output,
        unmatched_file,
        geojson,
    };

    info!(
        tracts = summary.tracts,
        matched = summary.matched,
        unmatched = summary.unmatched,
        "Map job complete"
    );
    summary
}
