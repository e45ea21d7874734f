//! End-of-game signal.
//!
//! The rules never end a game on their own. A game ends when something
//! outside them happens: a player leaves or a turn timer runs out.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Why a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndGameReason {
    PlayerLeft,
    Timeout,
}

/// End-of-game notification: the reason and the player it concerns (the one
/// who left, or the one whose turn timed out).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndGame {
    pub reason: EndGameReason,
    pub player: PlayerId,
}

impl EndGame {
    #[must_use]
    pub fn new(reason: EndGameReason, player: PlayerId) -> Self {
        Self { reason, player }
    }
}
