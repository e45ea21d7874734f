//! Broadcast channel contract.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::store::RoomCode;
use crate::core::{EndGame, GameState};

/// Event published to everyone in a room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum RoomEvent {
    /// Full state after a change.
    #[serde(rename = "update")]
    Update(GameState),
    #[serde(rename = "end-game")]
    End(EndGame),
}

impl RoomEvent {
    /// Channel event name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            RoomEvent::Update(_) => "update",
            RoomEvent::End(_) => "end-game",
        }
    }
}

#[derive(Debug, Error)]
#[error("failed to publish {event} to room {room}")]
pub struct BroadcastError {
    pub room: RoomCode,
    pub event: &'static str,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// Realtime delivery to the players in a room.
pub trait Broadcaster {
    fn publish(&self, room: &RoomCode, event: &RoomEvent) -> Result<(), BroadcastError>;
}

/// Broadcaster that keeps every published event in memory.
#[derive(Debug, Default)]
pub struct MemoryBroadcaster {
    events: Mutex<Vec<(RoomCode, RoomEvent)>>,
}

impl MemoryBroadcaster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events published so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<(RoomCode, RoomEvent)> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Events published to one room.
    #[must_use]
    pub fn events_for(&self, room: &RoomCode) -> Vec<RoomEvent> {
        self.events()
            .into_iter()
            .filter(|(r, _)| r == room)
            .map(|(_, event)| event)
            .collect()
    }
}

impl Broadcaster for MemoryBroadcaster {
    fn publish(&self, room: &RoomCode, event: &RoomEvent) -> Result<(), BroadcastError> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((room.clone(), event.clone()));
        Ok(())
    }
}
