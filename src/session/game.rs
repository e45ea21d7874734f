//! Game session: runs requests against the rules and the collaborators.

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::broadcast::{BroadcastError, Broadcaster, RoomEvent};
use super::provider::{MetadataProvider, ProviderError};
use super::store::{RoomCode, StateStore, StoreError, Versioned};
use crate::core::{
    Contributor, EndGame, EndGameReason, GameState, JoinError, MediaCandidate, PlayerId,
    SessionConfig,
};
use crate::rules::{Outcome, Referee, Rejection};
use crate::search::{format_results, SearchHit};

/// Failures outside the rules. Rule violations are [`Outcome::Rejected`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("room {0} has no game")]
    GameNotFound(RoomCode),
    #[error("player {player} is not in room {room}")]
    NotInGame { room: RoomCode, player: PlayerId },
    #[error("gave up on room {room} after {attempts} conflicting writes")]
    Contention { room: RoomCode, attempts: u32 },
    #[error(transparent)]
    Join(#[from] JoinError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Broadcast(#[from] BroadcastError),
}

/// One game service: a metadata provider, a state store and a broadcast
/// channel, all injected.
///
/// Every mutation is a read, a pure rules step, and a versioned write. A
/// write that loses a race is retried from a fresh read, up to
/// [`SessionConfig::max_commit_attempts`] times.
#[derive(Debug)]
pub struct GameSession<P, S, B> {
    provider: P,
    store: S,
    broadcaster: B,
    config: SessionConfig,
    referee: Referee,
}

impl<P, S, B> GameSession<P, S, B>
where
    P: MetadataProvider,
    S: StateStore,
    B: Broadcaster,
{
    /// Session with the default configuration.
    pub fn new(provider: P, store: S, broadcaster: B) -> Self {
        Self::with_config(provider, store, broadcaster, SessionConfig::default())
    }

    pub fn with_config(provider: P, store: S, broadcaster: B, config: SessionConfig) -> Self {
        Self {
            provider,
            store,
            broadcaster,
            referee: Referee::new(config.seed_match),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn broadcaster(&self) -> &B {
        &self.broadcaster
    }

    /// Current state of a room.
    pub fn load(&self, room: &RoomCode) -> Result<GameState, SessionError> {
        Ok(self.load_versioned(room)?.state)
    }

    /// Start a game in `room` with `host` seated and `seed` as the anchor.
    #[instrument(skip_all, fields(room = %room, host = %host))]
    pub fn create_game(
        &self,
        room: &RoomCode,
        host: PlayerId,
        seed: &MediaCandidate,
    ) -> Result<GameState, SessionError> {
        if host.is_empty() {
            return Err(JoinError::EmptyPlayerId.into());
        }
        let contributors = self.provider.credits(&seed.media_ref())?;
        let state = GameState::from_seed(host, seed, &contributors);
        self.store.insert(room, &state)?;

        info!(seed = %seed.key, pool = state.current_credits.len(), "game created");
        Ok(state)
    }

    /// Seat the second player and tell the room.
    #[instrument(skip_all, fields(room = %room, player = %player))]
    pub fn join_game(&self, room: &RoomCode, player: PlayerId) -> Result<GameState, SessionError> {
        for attempt in 1..=self.attempts() {
            let Versioned { version, mut state } = self.load_versioned(room)?;
            state.join(player.clone())?;

            match self.store.compare_and_swap(room, version, &state) {
                Ok(_) => {
                    info!("player joined");
                    self.publish_update(room, &state);
                    return Ok(state);
                }
                Err(StoreError::Conflict { .. }) => {
                    debug!(attempt, "join raced another write, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(self.contention(room))
    }

    /// Search the provider and format the playable results.
    #[instrument(skip(self))]
    pub fn search(&self, query: &str) -> Result<Vec<MediaCandidate>, SessionError> {
        let hits: Vec<SearchHit> = self.provider.search(query)?;
        let results = format_results(&hits, self.config.search_limit);
        debug!(hits = hits.len(), results = results.len(), "search done");
        Ok(results)
    }

    /// Play `candidate` for `player`.
    ///
    /// Turn and duplicate checks run before credits are fetched, so refused
    /// repeats cost no provider call. Accepted moves are committed and
    /// broadcast. Rejections change nothing.
    #[instrument(skip_all, fields(room = %room, player = %player, candidate = %candidate.key))]
    pub fn submit_answer(
        &self,
        room: &RoomCode,
        player: &PlayerId,
        candidate: &MediaCandidate,
    ) -> Result<Outcome, SessionError> {
        let mut contributors: Option<Vec<Contributor>> = None;

        for attempt in 1..=self.attempts() {
            let Versioned { version, state } = self.load_versioned(room)?;

            if !state.is_turn_of(player) {
                return Ok(self.rejected(Rejection::NotYourTurn));
            }
            if let Some(rejection) = self.referee.check_duplicate(&state, candidate) {
                return Ok(self.rejected(rejection));
            }

            // Credits don't depend on the state, so a retry reuses them.
            if contributors.is_none() {
                contributors = Some(self.provider.credits(&candidate.media_ref())?);
            }
            let credits = contributors.as_deref().unwrap_or_default();

            let next = match self.referee.apply_answer(&state, candidate, credits) {
                Outcome::Accepted(next) => next,
                Outcome::Rejected(rejection) => return Ok(self.rejected(rejection)),
            };

            match self.store.compare_and_swap(room, version, &next) {
                Ok(version) => {
                    let links = next.latest().map_or(0, |m| m.links.len());
                    info!(version, links, chain = next.chain_len(), "answer accepted");
                    self.publish_update(room, &next);
                    return Ok(Outcome::Accepted(next));
                }
                Err(StoreError::Conflict { .. }) => {
                    debug!(attempt, "answer raced another write, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(self.contention(room))
    }

    /// Announce the end of a game.
    ///
    /// The stored state is left in place so late requests still see the
    /// final chain. Dropping ended rooms (e.g. [`MemoryStore::remove`]) is
    /// up to the caller.
    ///
    /// [`MemoryStore::remove`]: super::MemoryStore::remove
    #[instrument(skip_all, fields(room = %room, player = %player, reason = ?reason))]
    pub fn end_game(
        &self,
        room: &RoomCode,
        reason: EndGameReason,
        player: PlayerId,
    ) -> Result<EndGame, SessionError> {
        let state = self.load(room)?;
        if !state.players.contains(&player) {
            return Err(SessionError::NotInGame {
                room: room.clone(),
                player,
            });
        }

        let end = EndGame::new(reason, player);
        self.broadcaster.publish(room, &RoomEvent::End(end.clone()))?;
        info!(chain = state.chain_len(), "game ended");
        Ok(end)
    }

    fn attempts(&self) -> u32 {
        self.config.max_commit_attempts.max(1)
    }

    fn load_versioned(&self, room: &RoomCode) -> Result<Versioned, SessionError> {
        self.store
            .load(room)?
            .ok_or_else(|| SessionError::GameNotFound(room.clone()))
    }

    fn rejected(&self, rejection: Rejection) -> Outcome {
        debug!(%rejection, "answer rejected");
        Outcome::Rejected(rejection)
    }

    fn contention(&self, room: &RoomCode) -> SessionError {
        let attempts = self.attempts();
        warn!(attempts, "commit attempts exhausted");
        SessionError::Contention {
            room: room.clone(),
            attempts,
        }
    }

    // The state is already committed. Clients resync on the next update,
    // so a failed publish is logged rather than failing the request.
    fn publish_update(&self, room: &RoomCode, state: &GameState) {
        if let Err(err) = self.broadcaster.publish(room, &RoomEvent::Update(state.clone())) {
            warn!(error = %err, "update broadcast failed");
        }
    }
}
