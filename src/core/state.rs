//! Game state: the single record for one match.
//!
//! ## GameState
//!
//! - Players (two seats, order fixes turn parity)
//! - Seed title (label, and key when known)
//! - Chain of accepted titles, newest first
//! - Credit pool: contributors of the most recent title
//!
//! There is deliberately no turn field. Whose turn it is follows from the
//! chain length, see [`crate::rules::turn`].
//!
//! Uses `im` persistent data structures so that producing the next state
//! from a snapshot shares everything but the new chain entry.

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::credits::{self, Contributor};
use super::media::{MediaCandidate, MediaKey, PersonId, PlayedMedia};
use super::player::{JoinError, PlayerId, Players, Seat};

/// Snapshot codec errors.
#[derive(Debug, Error)]
#[error("invalid game state snapshot: {0}")]
pub struct SnapshotError(#[from] bincode::Error);

/// Complete state of one game.
///
/// Serializes with camelCase field names:
/// `{ players, initialLabel, initialKey, media, currentCredits }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Seated players, host first.
    pub players: Players,

    /// Display label of the seed title.
    pub initial_label: String,

    /// Stable key of the seed title. Absent on states created from a label
    /// alone.
    #[serde(default)]
    pub initial_key: Option<MediaKey>,

    /// Accepted titles, newest first.
    pub media: Vector<PlayedMedia>,

    /// Person ids eligible to be linked by the next move.
    pub current_credits: Vector<PersonId>,
}

impl GameState {
    /// Create a game with only the host seated.
    ///
    /// `credits` is the seed title's contributor pool. Duplicate ids are
    /// dropped, first occurrence wins.
    #[must_use]
    pub fn new(
        host: PlayerId,
        initial_label: impl Into<String>,
        credits: impl IntoIterator<Item = PersonId>,
    ) -> Self {
        Self {
            players: Players::with_host(host),
            initial_label: initial_label.into(),
            initial_key: None,
            media: Vector::new(),
            current_credits: credit_pool(credits),
        }
    }

    /// Create a game seeded from a title and its (unfiltered) credits.
    #[must_use]
    pub fn from_seed(host: PlayerId, seed: &MediaCandidate, contributors: &[Contributor]) -> Self {
        let pool = credits::eligible(contributors).map(|c| c.id);
        Self::new(host, seed.label.clone(), pool).with_seed_key(seed.key.clone())
    }

    /// Record the seed title's stable key.
    #[must_use]
    pub fn with_seed_key(mut self, key: MediaKey) -> Self {
        self.initial_key = Some(key);
        self
    }

    /// Seat the second player.
    pub fn join(&mut self, player: PlayerId) -> Result<Seat, JoinError> {
        self.players.seat(player)
    }

    /// Number of accepted titles.
    #[must_use]
    pub fn chain_len(&self) -> usize {
        self.media.len()
    }

    /// Most recently accepted title.
    #[must_use]
    pub fn latest(&self) -> Option<&PlayedMedia> {
        self.media.front()
    }

    /// Whether a key already appears in the chain.
    #[must_use]
    pub fn has_played(&self, key: &MediaKey) -> bool {
        self.media.iter().any(|m| &m.key == key)
    }

    /// Whether a person is in the current credit pool.
    #[must_use]
    pub fn in_pool(&self, person: PersonId) -> bool {
        self.current_credits.contains(&person)
    }

    /// Encode for the state store.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a snapshot produced by [`GameState::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Deduplicate person ids, keeping first-seen order.
pub(crate) fn credit_pool(ids: impl IntoIterator<Item = PersonId>) -> Vector<PersonId> {
    let mut seen = FxHashSet::default();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
