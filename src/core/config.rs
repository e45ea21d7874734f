//! Session configuration.
//!
//! The rules themselves have no knobs: turn parity, the crew allow-list and
//! the order of checks are fixed. What callers can tune is how a session
//! talks to its collaborators and how strictly the seed title is matched.

use serde::{Deserialize, Serialize};

/// How a candidate is compared against the seed title.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedMatch {
    /// Compare display labels only.
    Label,
    /// Compare stable keys only. States without a recorded seed key fall
    /// back to labels.
    Key,
    /// Reject on either a key or a label match.
    #[default]
    KeyOrLabel,
}

/// Session configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of candidates returned by a search.
    pub search_limit: usize,

    /// Attempts to commit an accepted move before giving up.
    /// Each retry reloads the state and re-runs the rules.
    pub max_commit_attempts: u32,

    /// Seed duplicate check.
    pub seed_match: SeedMatch,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            search_limit: 5,
            max_commit_attempts: 3,
            seed_match: SeedMatch::default(),
        }
    }
}

impl SessionConfig {
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    /// Values below 1 are treated as 1.
    pub fn with_max_commit_attempts(mut self, attempts: u32) -> Self {
        self.max_commit_attempts = attempts.max(1);
        self
    }

    pub fn with_seed_match(mut self, seed_match: SeedMatch) -> Self {
        self.seed_match = seed_match;
        self
    }
}
