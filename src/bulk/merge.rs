use std::fmt;

use crate::api::OutcomeMap;

/// Success/failure counts for a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub success: usize,
    pub failure: usize,
}

impl Tally {
    /// Classify every entry of `outcomes` against the success vocabulary
    #[must_use]
    pub fn from_outcomes(outcomes: &OutcomeMap) -> Self {
        let success = outcomes.values().filter(|o| o.is_success()).count();
        Self {
            success,
            failure: outcomes.len() - success,
        }
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Success: {} Failed: {}", self.success, self.failure)
    }
}

/// Merged outcome of one bulk operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkReport {
    pub outcomes: OutcomeMap,
    pub tally: Tally,
}

impl BulkReport {
    #[must_use]
    pub fn new(outcomes: OutcomeMap) -> Self {
        let tally = Tally::from_outcomes(&outcomes);
        Self { outcomes, tally }
    }
}

/// Union per-shard outcome maps into one.
///
/// Shards are expected to be disjoint. If a node shows up in more than one
/// map, the later map wins.
#[must_use]
pub fn merge<I>(maps: I) -> OutcomeMap
where
    I: IntoIterator<Item = OutcomeMap>,
{
    let mut merged = OutcomeMap::new();
    for map in maps {
        merged.extend(map);
    }
    merged
}
