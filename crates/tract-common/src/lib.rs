//! Common types and utilities shared across the tract-maps crates.

pub mod bbox;
pub mod error;
pub mod geoid;
pub mod state;
pub mod style;
pub mod tract;

pub use bbox::BoundingBox;
pub use error::{MapError, MapResult};
pub use geoid::GeoId;
pub use state::StateCode;
pub use style::{CategoryEntry, CategoryScheme, Color, EdgeStyle, StyleConfig, UNKNOWN_CATEGORY};
pub use tract::{Tract, TractCollection};

/// Vintage year of the 2020 decennial census products.
pub const DEFAULT_YEAR: u16 = 2020;
