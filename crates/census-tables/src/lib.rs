//! Tabular inputs for tract maps.
//!
//! - Delimited file reading with an encoding fallback chain
//! - Opportunity ranking (ROI) files
//! - PL 94-171 demographic extraction
//! - Left joins of tracts with tabular records

pub mod encoding;
pub mod merge;
mod numeric;
pub mod pl;
pub mod reader;
pub mod roi;

pub use encoding::{EncodingChain, TextEncoding};
pub use merge::{left_join, Joined};
pub use pl::{
    dominant_category, extract_demographics, filter_summary_level, read_pl_data,
    DemographicRecord, PlSchema, RaceCategory,
};
pub use reader::{read_delimited, ReadOptions, Table};
pub use roi::{read_roi, roi_records, RoiColumns, RoiRecord};
