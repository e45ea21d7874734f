//! Session layer: the caller side of the rules.
//!
//! A request loads the room's state, asks the rules for an outcome, and on
//! acceptance writes the new state back and tells the room. The collaborators
//! for each step are traits injected into [`GameSession`]:
//!
//! - [`MetadataProvider`]: title search and credits
//! - [`StateStore`]: versioned per-room state
//! - [`Broadcaster`]: realtime events to the room
//!
//! [`MemoryStore`] and [`MemoryBroadcaster`] are in-process implementations.

pub mod store;
pub mod provider;
pub mod broadcast;
pub mod game;

pub use store::{MemoryStore, RoomCode, StateStore, StoreError, Versioned};
pub use provider::{MetadataProvider, ProviderError};
pub use broadcast::{BroadcastError, Broadcaster, MemoryBroadcaster, RoomEvent};
pub use game::{GameSession, SessionError};
