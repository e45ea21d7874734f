//! Search results: turning provider hits into playable candidates.
//!
//! Purely presentational. The rules only ever see the resulting
//! [`MediaCandidate`](crate::core::MediaCandidate)s.

mod results;

pub use results::{format_label, format_results, SearchHit};
