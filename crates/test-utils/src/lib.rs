//! Test support for the tract-maps crates.
//!
//! - Square tract fixtures and well-known GEOIDs
//! - PL 94-171 row builders
//! - Temporary workspaces for input and output files
//! - Locating optional real data (TIGER archives, PL releases)
//!
//! Tests pull it in as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod files;
pub mod fixtures;
pub mod paths;

pub use files::*;
pub use fixtures::*;
pub use paths::*;

/// Return the path of an optional data file, or end the test early.
///
/// Real archives are hundreds of megabytes and stay out of the repository;
/// point `TEST_DATA_DIR` at a download to run these tests.
///
/// ```ignore
/// let path = require_test_file!("tl_2020_26_tract.zip");
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        let Some(path) = $crate::find_test_file($name) else {
            eprintln!("SKIPPED: '{}' not found (set TEST_DATA_DIR)", $name);
            return;
        };
        path
    }};
}

/// Assert two numbers differ by at most `epsilon`. Operands are compared
/// as `f64`.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left, right, epsilon) = ($left as f64, $right as f64, $epsilon as f64);
        assert!(
            (left - right).abs() <= epsilon,
            "expected {} within {} of {}",
            left,
            epsilon,
            right
        );
    }};
}
