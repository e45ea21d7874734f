//! Media items: titles that can be played into the chain.
//!
//! A title is identified by its [`MediaKey`], which combines the media type
//! with the metadata provider's id (`movie-27205`, `tv-1399`). Labels are
//! display strings only.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Person identifier assigned by the metadata provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub u64);

impl PersonId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Person({})", self.0)
    }
}

/// Kind of title.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// Prefix used in media keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique key of a title within a game.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaKey(String);

impl MediaKey {
    /// Key for a provider title: `"{media_type}-{id}"`.
    #[must_use]
    pub fn for_media(media_type: MediaType, id: u64) -> Self {
        Self(format!("{}-{}", media_type, id))
    }

    /// Wrap an existing key string.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MediaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the metadata provider needs to look a title up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaRef {
    pub id: u64,
    pub media_type: MediaType,
}

/// A title proposed by a player (usually picked from search results).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaCandidate {
    pub key: MediaKey,
    pub id: u64,
    pub label: String,
    pub media_type: MediaType,
}

impl MediaCandidate {
    /// Build a candidate, deriving the key from type and id.
    #[must_use]
    pub fn new(media_type: MediaType, id: u64, label: impl Into<String>) -> Self {
        Self {
            key: MediaKey::for_media(media_type, id),
            id,
            label: label.into(),
            media_type,
        }
    }

    #[must_use]
    pub fn media_ref(&self) -> MediaRef {
        MediaRef {
            id: self.id,
            media_type: self.media_type,
        }
    }
}

/// A person shared between a played title and the title before it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub id: PersonId,
    pub name: String,
}

impl Link {
    #[must_use]
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Links on one chain entry. Usually only a handful of people overlap.
pub type Links = SmallVec<[Link; 4]>;

/// An accepted entry in the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedMedia {
    pub key: MediaKey,
    pub label: String,
    pub links: Links,
}
