//! The tract provider abstraction.

use async_trait::async_trait;
use tracing::debug;

use tract_common::{MapError, MapResult, StateCode, Tract, TractCollection};

/// A provider of census tract geometries.
#[async_trait]
pub trait TractSource: Send + Sync {
    /// All tracts of `state` for vintage `year`.
    ///
    /// An empty result is an error ([`MapError::EmptyResult`]).
    async fn tracts(&self, state: &StateCode, year: u16) -> MapResult<TractCollection>;
}

/// Keep the tracts of one state, failing when none remain.
pub(crate) fn select_state(tracts: Vec<Tract>, state: &StateCode, year: u16) -> MapResult<TractCollection> {
    let total = tracts.len();
    let selected: Vec<Tract> = tracts
        .into_iter()
        .filter(|t| t.state_fp == state.fips())
        .collect();

    debug!(state = %state, total = total, selected = selected.len(), "Selected state tracts");

    if selected.is_empty() {
        return Err(MapError::EmptyResult {
            state: state.fips().to_string(),
            year,
        });
    }
    Ok(TractCollection::new(year, selected))
}

/// Fixed in-memory tracts.
#[derive(Debug, Clone, Default)]
pub struct MemoryTractSource {
    tracts: Vec<Tract>,
}

impl MemoryTractSource {
    pub fn new(tracts: Vec<Tract>) -> Self {
        Self { tracts }
    }
}

impl From<TractCollection> for MemoryTractSource {
    fn from(collection: TractCollection) -> Self {
        Self::new(collection.tracts)
    }
}

#[async_trait]
impl TractSource for MemoryTractSource {
    async fn tracts(&self, state: &StateCode, year: u16) -> MapResult<TractCollection> {
        select_state(self.tracts.clone(), state, year)
    }
}
