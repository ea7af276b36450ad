//! Census tract geometry sources.
//!
//! - [`TractSource`]: async provider trait
//! - [`TigerTractSource`]: TIGER/Line and cartographic boundary downloads
//! - [`LocalArchiveSource`]: a tract archive on disk
//! - [`MemoryTractSource`]: fixed tracts for tests and fixtures

pub mod archive;
pub mod source;
pub mod tiger;

pub use archive::{read_tract_archive, read_tract_shapefile, LocalArchiveSource};
pub use source::{MemoryTractSource, TractSource};
pub use tiger::{TigerConfig, TigerTractSource, DEFAULT_BASE_URL};
