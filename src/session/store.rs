//! State store contract and an in-process implementation.
//!
//! Stores hold one serialized [`GameState`] per room, stamped with a version
//! that increases on every write. Writers use
//! [`StateStore::compare_and_swap`] so that two moves computed from the same
//! snapshot can't both land.

use std::sync::{Mutex, PoisonError};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{GameState, SnapshotError};

/// Room identifier shared by both players.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// A stored state and the version it was read at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Versioned {
    pub version: u64,
    pub state: GameState,
}

/// State store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("room {0} already has a game")]
    RoomExists(RoomCode),
    #[error("room {0} has no game")]
    RoomNotFound(RoomCode),
    #[error("room {room} changed underneath us (expected version {expected}, found {found})")]
    Conflict {
        room: RoomCode,
        expected: u64,
        found: u64,
    },
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("state store backend failed")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Where game states live between requests.
pub trait StateStore {
    /// Current state of a room, if any.
    fn load(&self, room: &RoomCode) -> Result<Option<Versioned>, StoreError>;

    /// Store the first state of a new room. Returns the new version.
    fn insert(&self, room: &RoomCode, state: &GameState) -> Result<u64, StoreError>;

    /// Replace a room's state if it is still at `expected`.
    /// Returns the new version, or [`StoreError::Conflict`].
    fn compare_and_swap(
        &self,
        room: &RoomCode,
        expected: u64,
        state: &GameState,
    ) -> Result<u64, StoreError>;
}

#[derive(Debug)]
struct Slot {
    version: u64,
    bytes: Vec<u8>,
}

/// In-process store keeping encoded snapshots in a mutex-guarded map.
///
/// ```
/// use credit_chain::core::{GameState, PersonId, PlayerId};
/// use credit_chain::session::{MemoryStore, RoomCode, StateStore};
///
/// let store = MemoryStore::new();
/// let room = RoomCode::new("ABCD");
/// let state = GameState::new(PlayerId::new("A"), "Seed (2000)", [PersonId(1)]);
///
/// let version = store.insert(&room, &state).unwrap();
/// let loaded = store.load(&room).unwrap().unwrap();
/// assert_eq!(loaded.version, version);
/// assert_eq!(loaded.state, state);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    rooms: Mutex<FxHashMap<RoomCode, Slot>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rooms with a game.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop a room's game.
    pub fn remove(&self, room: &RoomCode) -> bool {
        self.lock().remove(room).is_some()
    }

    // A panic while holding the lock can't leave a slot half-written, so a
    // poisoned map is still consistent.
    fn lock(&self) -> std::sync::MutexGuard<'_, FxHashMap<RoomCode, Slot>> {
        self.rooms.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateStore for MemoryStore {
    fn load(&self, room: &RoomCode) -> Result<Option<Versioned>, StoreError> {
        let rooms = self.lock();
        let Some(slot) = rooms.get(room) else {
            return Ok(None);
        };
        Ok(Some(Versioned {
            version: slot.version,
            state: GameState::from_bytes(&slot.bytes)?,
        }))
    }

    fn insert(&self, room: &RoomCode, state: &GameState) -> Result<u64, StoreError> {
        let bytes = state.to_bytes()?;
        let mut rooms = self.lock();
        if rooms.contains_key(room) {
            return Err(StoreError::RoomExists(room.clone()));
        }
        rooms.insert(room.clone(), Slot { version: 1, bytes });
        Ok(1)
    }

    fn compare_and_swap(
        &self,
        room: &RoomCode,
        expected: u64,
        state: &GameState,
    ) -> Result<u64, StoreError> {
        let bytes = state.to_bytes()?;
        let mut rooms = self.lock();
        let slot = rooms
            .get_mut(room)
            .ok_or_else(|| StoreError::RoomNotFound(room.clone()))?;
        if slot.version != expected {
            return Err(StoreError::Conflict {
                room: room.clone(),
                expected,
                found: slot.version,
            });
        }
        slot.version += 1;
        slot.bytes = bytes;
        Ok(slot.version)
    }
}
