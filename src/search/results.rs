//! Provider hits and candidate formatting.

use serde::{Deserialize, Serialize};

use crate::core::{MediaCandidate, MediaType};

/// Placeholder year for titles without a release date.
const UNKNOWN_YEAR: &str = "N/A";

/// One hit from a multi-type search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum SearchHit {
    Movie {
        id: u64,
        title: String,
        #[serde(default)]
        release_date: Option<String>,
    },
    Tv {
        id: u64,
        name: String,
        #[serde(default)]
        first_air_date: Option<String>,
    },
    /// People show up in multi searches but can't be played.
    Person { id: u64, name: String },
}

impl SearchHit {
    /// Candidate for this hit, `None` for people.
    #[must_use]
    pub fn to_candidate(&self) -> Option<MediaCandidate> {
        match self {
            SearchHit::Movie {
                id,
                title,
                release_date,
            } => Some(MediaCandidate::new(
                MediaType::Movie,
                *id,
                format_label(title, release_date.as_deref()),
            )),
            SearchHit::Tv {
                id,
                name,
                first_air_date,
            } => Some(MediaCandidate::new(
                MediaType::Tv,
                *id,
                format_label(name, first_air_date.as_deref()),
            )),
            SearchHit::Person { .. } => None,
        }
    }
}

/// `"Title (YYYY)"`, or `"Title (N/A)"` without a usable date.
///
/// ```
/// use credit_chain::search::format_label;
///
/// assert_eq!(format_label("Inception", Some("2010-07-15")), "Inception (2010)");
/// assert_eq!(format_label("Untitled", Some("")), "Untitled (N/A)");
/// assert_eq!(format_label("Untitled", None), "Untitled (N/A)");
/// ```
#[must_use]
pub fn format_label(title: &str, date: Option<&str>) -> String {
    let year = date
        .and_then(|d| d.get(..4).or(Some(d)))
        .filter(|y| !y.is_empty())
        .unwrap_or(UNKNOWN_YEAR);
    format!("{} ({})", title, year)
}

/// First `limit` playable candidates, in hit order. People don't count
/// toward the limit.
#[must_use]
pub fn format_results(hits: &[SearchHit], limit: usize) -> Vec<MediaCandidate> {
    hits.iter().filter_map(SearchHit::to_candidate).take(limit).collect()
}
