//! Player identification and the two-seat roster.
//!
//! ## PlayerId
//!
//! Opaque player identifier handed to us by the session layer (a user id).
//!
//! ## Players
//!
//! Ordered roster with exactly two seats. Seat order is fixed when players
//! are seated and never changes: it decides turn parity.

use serde::{Deserialize, Serialize};
use std::ops::Index;
use thiserror::Error;

/// Number of seats in a game.
pub const SEAT_COUNT: usize = 2;

/// Player identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty identifier names nobody.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Seat index (0 = host, 1 = guest).
///
/// Only [`Seat::HOST`], [`Seat::GUEST`] and [`Seat::for_chain_len`] build
/// seats, so the index is always 0 or 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Seat(u8);

impl Seat {
    pub const HOST: Seat = Seat(0);
    pub const GUEST: Seat = Seat(1);

    /// Seat that owns the turn after `chain_len` accepted moves.
    #[must_use]
    pub const fn for_chain_len(chain_len: usize) -> Self {
        Self((chain_len % SEAT_COUNT) as u8)
    }

    /// Get the raw seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other seat.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(self.0 ^ 1)
    }
}

/// Roster errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("the game already has two players")]
    RoomFull,
    #[error("player {0} is already seated")]
    AlreadySeated(PlayerId),
    #[error("player id must not be empty")]
    EmptyPlayerId,
    #[error("a game needs a host")]
    NoHost,
}

/// Ordered two-seat roster.
///
/// Serializes as a plain array of ids, host first. Deserializing checks the
/// same rules as seating: one or two distinct, non-empty ids.
///
/// ```
/// use credit_chain::core::{PlayerId, Players, Seat};
///
/// let mut players = Players::with_host(PlayerId::new("alice"));
/// assert!(!players.is_full());
///
/// players.seat(PlayerId::new("bob")).unwrap();
/// assert_eq!(players[Seat::GUEST], PlayerId::new("bob"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<PlayerId>", into = "Vec<PlayerId>")]
pub struct Players {
    seats: Vec<PlayerId>,
}

impl Players {
    /// Roster with only the host seated.
    #[must_use]
    pub fn with_host(host: PlayerId) -> Self {
        Self { seats: vec![host] }
    }

    /// Seat a second player.
    pub fn seat(&mut self, player: PlayerId) -> Result<Seat, JoinError> {
        if player.is_empty() {
            return Err(JoinError::EmptyPlayerId);
        }
        if self.seats.contains(&player) {
            return Err(JoinError::AlreadySeated(player));
        }
        if self.is_full() {
            return Err(JoinError::RoomFull);
        }
        self.seats.push(player);
        Ok(Seat((self.seats.len() - 1) as u8))
    }

    /// Player in a seat, if the seat is taken.
    #[must_use]
    pub fn get(&self, seat: Seat) -> Option<&PlayerId> {
        self.seats.get(seat.index())
    }

    /// Seat a player occupies.
    #[must_use]
    pub fn seat_of(&self, player: &PlayerId) -> Option<Seat> {
        self.seats
            .iter()
            .position(|p| p == player)
            .map(|idx| Seat(idx as u8))
    }

    #[must_use]
    pub fn contains(&self, player: &PlayerId) -> bool {
        self.seats.contains(player)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.seats.len() >= SEAT_COUNT
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerId> {
        self.seats.iter()
    }
}

impl TryFrom<Vec<PlayerId>> for Players {
    type Error = JoinError;

    fn try_from(ids: Vec<PlayerId>) -> Result<Self, Self::Error> {
        let mut ids = ids.into_iter();
        let host = ids.next().ok_or(JoinError::NoHost)?;
        if host.is_empty() {
            return Err(JoinError::EmptyPlayerId);
        }

        let mut players = Players::with_host(host);
        for id in ids {
            players.seat(id)?;
        }
        Ok(players)
    }
}

impl From<Players> for Vec<PlayerId> {
    fn from(players: Players) -> Self {
        players.seats
    }
}

/// Panics if the seat is empty. Use [`Players::get`] when unsure.
impl Index<Seat> for Players {
    type Output = PlayerId;

    fn index(&self, seat: Seat) -> &Self::Output {
        &self.seats[seat.index()]
    }
}
