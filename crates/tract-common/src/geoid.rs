//! Geographic identifiers (GEOID / FIPS).
//!
//! Identifiers are always text. Leading zeros are significant ("04001" is
//! Arizona's Apache County, "4001" is nothing), so nothing in this workspace
//! parses them as numbers.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A normalized geographic identifier used as a join key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeoId(String);

impl GeoId {
    /// Normalize a raw identifier: surrounding whitespace is dropped, the
    /// digits are kept verbatim. Normalizing an already normalized value is a
    /// no-op.
    pub fn new(raw: impl AsRef<str>) -> Self {
        GeoId(raw.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The two-digit state prefix, if the identifier is long enough.
    pub fn state_fips(&self) -> Option<&str> {
        self.0.get(0..2)
    }

    /// The three-digit county code following the state prefix.
    pub fn county_fips(&self) -> Option<&str> {
        self.0.get(2..5)
    }
}

impl fmt::Display for GeoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GeoId {
    fn from(s: &str) -> Self {
        GeoId::new(s)
    }
}

impl From<String> for GeoId {
    fn from(s: String) -> Self {
        GeoId::new(s)
    }
}

impl AsRef<str> for GeoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for GeoId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_zeros_preserved() {
        let id = GeoId::new("04001944201");
        assert_eq!(id.as_str(), "04001944201");
        assert_eq!(id.state_fips(), Some("04"));
        assert_eq!(id.county_fips(), Some("001"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = GeoId::new("  26163010100 ");
        let twice = GeoId::new(once.as_str());
        assert_eq!(once, twice);
        assert_eq!(twice.as_str(), "26163010100");
    }

    #[test]
    fn test_short_identifier_has_no_county() {
        let id = GeoId::new("26");
        assert_eq!(id.state_fips(), Some("26"));
        assert_eq!(id.county_fips(), None);
    }
}
