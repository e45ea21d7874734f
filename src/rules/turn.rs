//! Turn resolution.
//!
//! The seat that owns the turn is `chain_len % 2`: the host plays onto an
//! empty chain, then turns alternate with every accepted move. Nothing else
//! is consulted, so a rejected move never passes the turn.

use crate::core::{GameState, PlayerId, Seat};

/// Whether `player` may move in `state`.
///
/// Returns `false` when either side is unknown (no state, no player, or an
/// empty player id), and when the owning seat is still empty.
///
/// ```
/// use credit_chain::core::{GameState, PersonId, PlayerId};
/// use credit_chain::rules::is_player_turn;
///
/// let mut state = GameState::new(PlayerId::new("A"), "Seed (2000)", [PersonId(1)]);
/// state.join(PlayerId::new("B")).unwrap();
///
/// assert!(is_player_turn(Some(&state), Some(&PlayerId::new("A"))));
/// assert!(!is_player_turn(Some(&state), Some(&PlayerId::new("B"))));
/// assert!(!is_player_turn(None, Some(&PlayerId::new("A"))));
/// assert!(!is_player_turn(Some(&state), None));
/// ```
#[must_use]
pub fn is_player_turn(state: Option<&GameState>, player: Option<&PlayerId>) -> bool {
    match (state, player) {
        (Some(state), Some(player)) => state.is_turn_of(player),
        _ => false,
    }
}

impl GameState {
    /// Seat that owns the current turn.
    #[must_use]
    pub fn current_seat(&self) -> Seat {
        Seat::for_chain_len(self.media.len())
    }

    /// Player that owns the current turn, if that seat is taken.
    #[must_use]
    pub fn current_player(&self) -> Option<&PlayerId> {
        self.players.get(self.current_seat())
    }

    /// Whether it is `player`'s turn.
    #[must_use]
    pub fn is_turn_of(&self, player: &PlayerId) -> bool {
        !player.is_empty() && self.current_player() == Some(player)
    }
}
