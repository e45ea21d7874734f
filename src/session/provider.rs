//! Metadata provider contract.

use thiserror::Error;

use crate::core::{Contributor, MediaRef};
use crate::search::SearchHit;

/// Metadata provider errors.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no {} with id {}", .0.media_type, .0.id)]
    NotFound(MediaRef),
    #[error("metadata provider unavailable")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Source of titles and their credits.
pub trait MetadataProvider {
    /// Full cast and crew of a title. Filtering is the rules' job, so
    /// implementations return every credit.
    fn credits(&self, media: &MediaRef) -> Result<Vec<Contributor>, ProviderError>;

    /// Free-text search over movies, TV and people.
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, ProviderError>;
}
