//! Error types for tract mapping.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using MapError.
pub type MapResult<T> = Result<T, MapError>;

/// Primary error type for tract mapping operations.
///
/// Every variant is terminal for a map job. Malformed numeric fields and join
/// misses never reach this type; they are absorbed where they occur.
#[derive(Debug, Error)]
pub enum MapError {
    // === Geometry Provider Errors ===
    #[error("Tract provider unreachable: {0}")]
    ProviderUnreachable(String),

    #[error("Tract provider returned no tracts for state {state} ({year})")]
    EmptyResult { state: String, year: u16 },

    #[error("Invalid state code: {0}")]
    InvalidStateCode(String),

    #[error("Invalid tract archive: {0}")]
    Archive(String),

    // === Tabular Errors ===
    #[error("Could not read file {} with any supported encoding", path.display())]
    UnsupportedEncoding { path: PathBuf },

    #[error("Column '{column}' not found in {}", path.display())]
    MissingColumn { column: String, path: PathBuf },

    #[error("Row count mismatch: {left} has {left_rows} rows, {right} has {right_rows}")]
    RowCountMismatch {
        left: String,
        left_rows: usize,
        right: String,
        right_rows: usize,
    },

    #[error("Failed to parse delimited data: {0}")]
    Parse(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Style error: {0}")]
    Style(String),

    // === Infrastructure Errors ===
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MapError {
    /// Whether the error originates from the geometry provider.
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            MapError::ProviderUnreachable(_) | MapError::EmptyResult { .. } | MapError::Archive(_)
        )
    }
}

impl From<csv::Error> for MapError {
    fn from(err: csv::Error) -> Self {
        MapError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        MapError::Style(format!("JSON error: {}", err))
    }
}
