//! High-score table
//!
//! A map from screen id to best score. A score only replaces the stored
//! one when it is strictly greater. Persisting the table is left to the
//! caller.

use alloc::collections::BTreeMap;
use alloc::string::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct HighScoreTable {
    scores: BTreeMap<String, i64>,
}

impl HighScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best score for `id`, zero if none recorded
    pub fn get(&self, id: &str) -> i64 {
        self.scores.get(id).copied().unwrap_or(0)
    }

    /// Record a score; returns `true` if it became the new best
    pub fn record(&mut self, id: &str, score: i64) -> bool {
        match self.scores.get_mut(id) {
            Some(best) if score > *best => {
                *best = score;
                true
            }
            Some(_) => false,
            None => {
                self.scores.insert(String::from(id), score);
                true
            }
        }
    }

    /// Entries in id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.scores.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
