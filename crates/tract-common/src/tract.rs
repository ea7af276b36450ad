//! Census tract geometries.

use geo::MultiPolygon;

use crate::bbox::BoundingBox;
use crate::geoid::GeoId;

/// A single census tract for one vintage year.
#[derive(Debug, Clone, PartialEq)]
pub struct Tract {
    /// Full tract identifier: state (2) + county (3) + tract (6).
    pub geoid: GeoId,
    /// Two-digit state FIPS code.
    pub state_fp: String,
    /// Three-digit county FIPS code.
    pub county_fp: String,
    /// Six-digit tract code.
    pub tract_ce: String,
    /// Human readable tract name, e.g. "5101.02".
    pub name: String,
    pub geometry: MultiPolygon<f64>,
}

/// Tracts for one state and year, in provider order.
#[derive(Debug, Clone, Default)]
pub struct TractCollection {
    pub year: u16,
    pub tracts: Vec<Tract>,
}

impl TractCollection {
    pub fn new(year: u16, tracts: Vec<Tract>) -> Self {
        Self { year, tracts }
    }

    pub fn len(&self) -> usize {
        self.tracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tract> {
        self.tracts.iter()
    }

    /// Tracts whose county code equals `county_fp` (compared as text).
    pub fn in_county(&self, county_fp: &str) -> TractCollection {
        let county_fp = county_fp.trim();
        TractCollection {
            year: self.year,
            tracts: self
                .tracts
                .iter()
                .filter(|t| t.county_fp == county_fp)
                .cloned()
                .collect(),
        }
    }

    /// Extent of all tract geometries.
    pub fn extent(&self) -> Option<BoundingBox> {
        BoundingBox::of_all(self.tracts.iter().map(|t| &t.geometry))
    }
}

impl IntoIterator for TractCollection {
    type Item = Tract;
    type IntoIter = std::vec::IntoIter<Tract>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracts.into_iter()
    }
}

impl<'a> IntoIterator for &'a TractCollection {
    type Item = &'a Tract;
    type IntoIter = std::slice::Iter<'a, Tract>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracts.iter()
    }
}
