//! Census tract map generator.
//!
//! Renders choropleth maps of census tracts:
//! - Opportunity rankings joined from an ROI file
//! - Dominant race/ethnicity from PL 94-171 redistricting files
//! - Batches of either from a YAML job file

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use census_tables::RoiColumns;
use mapper::{
    run_batch, run_demographic_map, run_opportunity_map, BatchConfig, DemographicJob, MapJob, MapSummary,
    OpportunityJob, SourceSettings,
};
use renderer::{RenderConfig, UnmatchedColumns};
use tiger_loader::{TigerConfig, DEFAULT_BASE_URL};
use tract_common::DEFAULT_YEAR;

#[derive(Parser, Debug)]
#[command(name = "mapper")]
#[command(about = "Census tract choropleth maps", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Root URL of the TIGER/Line file server
    #[arg(long, env = "TIGER_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    tiger_base_url: String,

    /// Use 1:500k cartographic boundary files
    #[arg(long, global = true)]
    cartographic: bool,

    /// Directory where downloaded tract archives are kept
    #[arg(long, env = "TRACT_CACHE_DIR", global = true)]
    cache_dir: Option<PathBuf>,

    /// Read tracts from this zipped shapefile instead of downloading
    #[arg(long, global = true)]
    tract_archive: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value = "300", global = true)]
    timeout_secs: u64,

    /// TrueType font for titles and legends
    #[arg(long, env = "MAP_FONT_PATH", global = true)]
    font: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Map opportunity rankings of one county
    Opportunity {
        /// State FIPS code or abbreviation (e.g. 26 or MI)
        #[arg(long)]
        state: String,

        /// Three-digit county code (e.g. 163)
        #[arg(long)]
        county: Option<String>,

        /// City name for the title
        #[arg(long)]
        city: String,

        /// ROI CSV file
        #[arg(long)]
        roi: PathBuf,

        /// Tract identifier column of the ROI file
        #[arg(long, default_value = "FIPS")]
        id_column: String,

        /// Rank column of the ROI file
        #[arg(long, default_value = "COMP_RANK")]
        rank_column: String,

        /// Output PNG
        #[arg(short, long)]
        output: PathBuf,

        /// Census vintage
        #[arg(long, default_value_t = DEFAULT_YEAR)]
        year: u16,

        /// Write tracts without a ranking to this CSV
        #[arg(long)]
        unmatched: Option<PathBuf>,

        /// Also export merged features as GeoJSON
        #[arg(long)]
        geojson: Option<PathBuf>,

        /// JSON style file overriding the built-in scheme
        #[arg(long)]
        style: Option<PathBuf>,
    },

    /// Map dominant race/ethnicity of one county
    Demographics {
        #[arg(long)]
        state: String,

        #[arg(long)]
        county: Option<String>,

        /// County name for the title
        #[arg(long)]
        county_name: String,

        /// PL geographic header file
        #[arg(long)]
        geo: PathBuf,

        /// PL Part 1 file
        #[arg(long)]
        part1: PathBuf,

        /// Keep only PL rows of this summary level (140 = tracts)
        #[arg(long)]
        summary_level: Option<String>,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(long, default_value_t = DEFAULT_YEAR)]
        year: u16,

        /// CSV of tracts without demographic data
        #[arg(long, default_value = "unmatched_tracts.csv")]
        unmatched: PathBuf,

        #[arg(long)]
        geojson: Option<PathBuf>,

        #[arg(long)]
        style: Option<PathBuf>,
    },

    /// Run every job in a YAML batch file
    Run {
        /// Path to the job file
        #[arg(short, long, default_value = "config/maps.yaml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting census tract mapper");

    let settings = SourceSettings {
        tiger: TigerConfig {
            base_url: args.tiger_base_url.clone(),
            cartographic: args.cartographic,
            cache_dir: args.cache_dir.clone(),
            request_timeout: Duration::from_secs(args.timeout_secs),
        },
        archive: args.tract_archive.clone(),
    };
    let source = settings.build()?;

    let render = RenderConfig {
        font_path: args.font.clone(),
        ..RenderConfig::default()
    };

    let summaries = match args.command {
        Commands::Opportunity {
            state,
            county,
            city,
            roi,
            id_column,
            rank_column,
            output,
            year,
            unmatched,
            geojson,
            style,
        } => {
            let job = OpportunityJob {
                state,
                county,
                year,
                city,
                roi_path: roi,
                roi_columns: RoiColumns {
                    id: id_column,
                    rank: rank_column,
                },
                output,
                unmatched_path: unmatched,
                geojson,
                style_file: style,
                render,
            };
            vec![run_opportunity_map(&job, source.as_ref()).await?]
        }
        Commands::Demographics {
            state,
            county,
            county_name,
            geo,
            part1,
            summary_level,
            output,
            year,
            unmatched,
            geojson,
            style,
        } => {
            let job = DemographicJob {
                state,
                county,
                year,
                county_name,
                geo_path: geo,
                part1_path: part1,
                schema: Default::default(),
                summary_level,
                output,
                unmatched_path: unmatched,
                unmatched_columns: UnmatchedColumns::default(),
                geojson,
                style_file: style,
                render,
            };
            vec![run_demographic_map(&job, source.as_ref()).await?]
        }
        Commands::Run { config } => {
            let mut batch = BatchConfig::load(&config)?;
            if let Some(font) = &args.font {
                for job in &mut batch.jobs {
                    apply_font(job, font);
                }
            }
            run_batch(&batch, source.as_ref())
                .await
                .with_context(|| format!("Batch {} failed", config.display()))?
        }
    };

    for summary in &summaries {
        report(summary);
    }

    Ok(())
}

/// Use the command-line font for jobs that do not name one.
fn apply_font(job: &mut MapJob, font: &Path) {
    let render = job.render_mut();
    if render.font_path.is_none() {
        render.font_path = Some(font.to_path_buf());
    }
}

fn report(summary: &MapSummary) {
    info!(
        output = %summary.output.path.display(),
        tracts = summary.tracts,
        matched = summary.matched,
        unmatched = summary.unmatched,
        unmatched_file = ?summary.unmatched_file,
        geojson = ?summary.geojson,
        "Map complete"
    );
}
