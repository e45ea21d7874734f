//! Core game types: players, media, contributors, state, configuration.
//!
//! Everything here is plain data. The rules that act on it live in
//! [`crate::rules`].

pub mod player;
pub mod media;
pub mod credits;
pub mod state;
pub mod event;
pub mod config;

pub use player::{JoinError, PlayerId, Players, Seat, SEAT_COUNT};
pub use media::{Link, Links, MediaCandidate, MediaKey, MediaRef, MediaType, PersonId, PlayedMedia};
pub use credits::{Contributor, Role};
pub use state::{GameState, SnapshotError};
pub use event::{EndGame, EndGameReason};
pub use config::{SeedMatch, SessionConfig};
