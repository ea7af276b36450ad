//! Census Bureau TIGER/Line tract downloads.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, info, instrument};

use tract_common::{MapError, MapResult, StateCode, TractCollection};

use crate::archive::read_tract_archive;
use crate::source::{select_state, TractSource};

/// Default root of the Census Bureau geography file server.
pub const DEFAULT_BASE_URL: &str = "https://www2.census.gov/geo/tiger";

/// Configuration for [`TigerTractSource`].
#[derive(Debug, Clone)]
pub struct TigerConfig {
    /// Server root, without a trailing slash
    pub base_url: String,
    /// Use the generalized 1:500k cartographic boundary files instead of
    /// full-resolution TIGER/Line shapes
    pub cartographic: bool,
    /// Directory where downloaded archives are kept and reused
    pub cache_dir: Option<PathBuf>,
    /// HTTP request timeout
    pub request_timeout: Duration,
}

impl Default for TigerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cartographic: false,
            cache_dir: None,
            request_timeout: Duration::from_secs(300),
        }
    }
}

impl TigerConfig {
    /// Archive file name for a state and year.
    pub fn archive_name(&self, state: &StateCode, year: u16) -> String {
        if self.cartographic {
            format!("cb_{}_{}_tract_500k.zip", year, state.fips())
        } else {
            format!("tl_{}_{}_tract.zip", year, state.fips())
        }
    }

    /// Download URL for a state and year.
    pub fn archive_url(&self, state: &StateCode, year: u16) -> String {
        let base = self.base_url.trim_end_matches('/');
        let name = self.archive_name(state, year);
        if self.cartographic {
            format!("{}/GENZ{}/shp/{}", base, year, name)
        } else {
            format!("{}/TIGER{}/TRACT/{}", base, year, name)
        }
    }
}

/// Tracts downloaded from the Census Bureau.
///
/// Failures are not retried.
pub struct TigerTractSource {
    client: Client,
    config: TigerConfig,
}

impl TigerTractSource {
    pub fn new(config: TigerConfig) -> MapResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MapError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TigerConfig {
        &self.config
    }

    async fn fetch(&self, url: &str) -> MapResult<Bytes> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MapError::ProviderUnreachable(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MapError::ProviderUnreachable(format!("{} returned HTTP {}", url, status)));
        }

        response
            .bytes()
            .await
            .map_err(|e| MapError::ProviderUnreachable(format!("{}: {}", url, e)))
    }

    /// Archive bytes from the cache, or downloaded and then cached.
    ///
    /// The path is returned when the bytes came from the cache.
    async fn archive_bytes(&self, state: &StateCode, year: u16) -> MapResult<(Bytes, Option<PathBuf>)> {
        let name = self.config.archive_name(state, year);
        let cached = self.config.cache_dir.as_ref().map(|dir| dir.join(&name));

        if let Some(path) = cached.as_ref().filter(|p| p.is_file()) {
            info!(path = %path.display(), "Using cached tract archive");
            let bytes = Bytes::from(tokio::fs::read(path).await?);
            return Ok((bytes, Some(path.clone())));
        }

        let url = self.config.archive_url(state, year);
        info!(state = %state, year = year, url = %url, "Downloading census tracts");
        let bytes = self.fetch(&url).await?;
        debug!(bytes = bytes.len(), "Download complete");

        if let Some(path) = cached {
            let data = bytes.clone();
            let target = path.clone();
            tokio::task::spawn_blocking(move || write_cache_entry(&target, &data))
                .await
                .map_err(|e| MapError::Archive(format!("Cache writer task failed: {}", e)))??;
            debug!(path = %path.display(), "Cached tract archive");
        }

        Ok((bytes, None))
    }
}

/// Store an archive in the cache.
///
/// The bytes go to a temporary file beside `path` that is renamed into place
/// once complete, so an interrupted write never leaves a truncated archive
/// under the final name.
pub(crate) fn write_cache_entry(path: &Path, bytes: &[u8]) -> MapResult<()> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => dir,
        None => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut partial = tempfile::Builder::new()
        .prefix(".partial-")
        .tempfile_in(dir)?;
    partial.write_all(bytes)?;
    partial.as_file().sync_all()?;
    partial.persist(path).map_err(|e| MapError::Io(e.error))?;
    Ok(())
}

#[async_trait]
impl TractSource for TigerTractSource {
    #[instrument(skip(self))]
    async fn tracts(&self, state: &StateCode, year: u16) -> MapResult<TractCollection> {
        let (bytes, cached) = self.archive_bytes(state, year).await?;

        let result = tokio::task::spawn_blocking(move || read_tract_archive(&bytes, year))
            .await
            .map_err(|e| MapError::Archive(format!("Archive reader task failed: {}", e)))?;

        let collection = match (result, cached) {
            (Ok(collection), _) => collection,
            (Err(MapError::Archive(reason)), Some(path)) => {
                return Err(MapError::Archive(format!(
                    "cached archive {} is unreadable ({}); delete it to download again",
                    path.display(),
                    reason
                )));
            }
            (Err(e), _) => return Err(e),
        };

        info!(state = %state, year = year, tracts = collection.len(), "Loaded census tracts");
        select_state(collection.tracts, state, year)
    }
}
