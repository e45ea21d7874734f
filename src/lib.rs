//! # credit-chain
//!
//! Engine for a two-player filmography chain game: players take turns naming
//! a movie or TV title that shares a cast or crew member with the previous
//! one.
//!
//! ## Design Principles
//!
//! 1. **Pure Rules**: Turn resolution and answer validation are functions of
//!    a state snapshot and their inputs. No I/O, no clocks, no logging.
//!
//! 2. **Derived Turns**: Whose turn it is follows from the chain length.
//!    There is no turn counter to drift out of sync.
//!
//! 3. **Outcomes, Not Errors**: A refused move is an [`Outcome::Rejected`]
//!    with a [`Rejection`] reason. Errors are reserved for infrastructure.
//!
//! 4. **Injected Collaborators**: Metadata, storage and broadcast are traits
//!    handed to a [`GameSession`], never globals.
//!
//! ## Modules
//!
//! - `core`: Identifiers, media, contributors, state, configuration
//! - `rules`: Turn resolution and answer validation
//! - `search`: Search hit formatting
//! - `session`: Request orchestration over injected collaborators

pub mod core;
pub mod rules;
pub mod search;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    PlayerId, Players, Seat, JoinError,
    PersonId, MediaType, MediaKey, MediaRef, MediaCandidate, Link, Links, PlayedMedia,
    Contributor, Role,
    GameState, SnapshotError,
    EndGame, EndGameReason,
    SeedMatch, SessionConfig,
};

pub use crate::rules::{is_player_turn, apply_answer, submit_answer, Outcome, Referee, Rejection};

pub use crate::search::{format_results, SearchHit};

pub use crate::session::{
    GameSession, SessionError,
    MetadataProvider, ProviderError,
    StateStore, MemoryStore, RoomCode, StoreError, Versioned,
    Broadcaster, MemoryBroadcaster, RoomEvent, BroadcastError,
};
