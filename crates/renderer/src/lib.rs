//! Static map rendering for census tracts.
//!
//! - Categorical choropleths with a manually built legend
//! - Figure canvas with tight cropping
//! - Indexed/RGBA PNG encoding with resolution metadata
//! - Unmatched-tract side files

pub mod choropleth;
pub mod figure;
pub mod legend;
pub mod png;
pub mod projection;
pub mod text;
pub mod unmatched;

pub use choropleth::{render_choropleth, Layout, MapFeature, RenderConfig};
pub use figure::{Figure, SavedImage};
pub use legend::{build_legend, Legend, LegendPatch};
pub use projection::{MapProjection, PixelRect};
pub use unmatched::{write_unmatched, UnmatchedColumns};
