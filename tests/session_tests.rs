//! Session integration tests.
//!
//! These tests drive a `GameSession` over an in-memory store and
//! broadcaster with a scripted metadata provider, covering the request flow
//! around the rules: creation, joining, search, submissions, write races and
//! game end.

use std::cell::{Cell, RefCell};

use rustc_hash::FxHashMap;

use credit_chain::core::{
    Contributor, EndGameReason, GameState, JoinError, MediaCandidate, MediaKey, MediaRef, MediaType,
    PersonId, PlayerId, SeedMatch, SessionConfig,
};
use credit_chain::rules::{apply_answer, Outcome, Rejection};
use credit_chain::search::SearchHit;
use credit_chain::session::{
    BroadcastError, Broadcaster, GameSession, MemoryBroadcaster, MemoryStore, MetadataProvider,
    ProviderError, RoomCode, RoomEvent, SessionError, StateStore, StoreError, Versioned,
};

/// Provider answering from a fixed table and counting credit lookups.
#[derive(Default)]
struct ScriptedProvider {
    credits: FxHashMap<MediaRef, Vec<Contributor>>,
    hits: Vec<SearchHit>,
    credit_calls: Cell<usize>,
}

impl ScriptedProvider {
    fn with_credits(mut self, candidate: &MediaCandidate, credits: Vec<Contributor>) -> Self {
        self.credits.insert(candidate.media_ref(), credits);
        self
    }
}

impl MetadataProvider for ScriptedProvider {
    fn credits(&self, media: &MediaRef) -> Result<Vec<Contributor>, ProviderError> {
        self.credit_calls.set(self.credit_calls.get() + 1);
        self.credits.get(media).cloned().ok_or(ProviderError::NotFound(*media))
    }

    fn search(&self, _query: &str) -> Result<Vec<SearchHit>, ProviderError> {
        Ok(self.hits.clone())
    }
}

fn inception() -> MediaCandidate {
    MediaCandidate::new(MediaType::Movie, 27205, "Inception (2010)")
}

fn dark_knight() -> MediaCandidate {
    MediaCandidate::new(MediaType::Movie, 155, "The Dark Knight (2008)")
}

fn unrelated() -> MediaCandidate {
    MediaCandidate::new(MediaType::Tv, 1, "Unrelated Show (1990)")
}

fn provider() -> ScriptedProvider {
    ScriptedProvider::default()
        .with_credits(
            &inception(),
            vec![
                Contributor::cast(6193, "Leonardo DiCaprio"),
                Contributor::cast(2524, "Tom Hardy"),
                Contributor::crew(525, "Christopher Nolan", "Director"),
                Contributor::crew(556, "Emma Thomas", "Producer"),
            ],
        )
        .with_credits(
            &dark_knight(),
            vec![
                Contributor::cast(3894, "Christian Bale"),
                Contributor::crew(525, "Christopher Nolan", "Director"),
                Contributor::crew(525, "Christopher Nolan", "Screenplay"),
                Contributor::crew(556, "Emma Thomas", "Producer"),
            ],
        )
        .with_credits(&unrelated(), vec![Contributor::cast(1, "Nobody")])
}

type Session = GameSession<ScriptedProvider, MemoryStore, MemoryBroadcaster>;
type RacySession = GameSession<ScriptedProvider, RacyStore, MemoryBroadcaster>;

fn room() -> RoomCode {
    RoomCode::new("ROOM1")
}

fn started_session() -> Session {
    let session = GameSession::new(provider(), MemoryStore::new(), MemoryBroadcaster::new());
    session.create_game(&room(), PlayerId::new("A"), &inception()).unwrap();
    session.join_game(&room(), PlayerId::new("B")).unwrap();
    session
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Test that a created game is seeded from the filtered seed credits.
#[test]
fn test_create_game() {
    let session = GameSession::new(provider(), MemoryStore::new(), MemoryBroadcaster::new());
    let state = session.create_game(&room(), PlayerId::new("A"), &inception()).unwrap();

    assert_eq!(state.initial_label, "Inception (2010)");
    assert_eq!(state.initial_key, Some(MediaKey::new("movie-27205")));
    assert_eq!(
        state.current_credits.iter().map(|p| p.raw()).collect::<Vec<_>>(),
        vec![6193, 2524, 525]
    );
    assert_eq!(session.load(&room()).unwrap(), state);
}

/// Test that a room can only hold one game.
#[test]
fn test_create_game_twice() {
    let session = started_session();
    let err = session.create_game(&room(), PlayerId::new("C"), &inception()).unwrap_err();
    assert!(matches!(err, SessionError::Store(StoreError::RoomExists(_))));
}

/// Test that joining seats the guest and broadcasts the state.
#[test]
fn test_join_broadcasts() {
    let session = started_session();

    let events = session.broadcaster().events_for(&room());
    assert_eq!(events.len(), 1);
    match &events[0] {
        RoomEvent::Update(state) => assert_eq!(state.players.len(), 2),
        other => panic!("unexpected event {:?}", other),
    }

    let err = session.join_game(&room(), PlayerId::new("C")).unwrap_err();
    assert!(matches!(err, SessionError::Join(_)));
}

/// Test that requests against an unknown room fail cleanly.
#[test]
fn test_unknown_room() {
    let session = started_session();
    let missing = RoomCode::new("MISSING");

    let err = session.submit_answer(&missing, &PlayerId::new("A"), &dark_knight()).unwrap_err();
    assert!(matches!(err, SessionError::GameNotFound(r) if r == missing));
}

// =============================================================================
// Submissions
// =============================================================================

/// Test an accepted answer: committed, broadcast, turn passed.
#[test]
fn test_submit_accepted() {
    let session = started_session();

    let outcome = session.submit_answer(&room(), &PlayerId::new("A"), &dark_knight()).unwrap();
    let next = outcome.into_state().expect("linked through the director");

    let latest = next.latest().unwrap();
    assert_eq!(latest.key, MediaKey::new("movie-155"));
    assert_eq!(latest.links.len(), 1);
    assert_eq!(latest.links[0].id, PersonId(525));
    assert_eq!(
        next.current_credits.iter().map(|p| p.raw()).collect::<Vec<_>>(),
        vec![3894, 525]
    );

    assert_eq!(session.load(&room()).unwrap(), next);
    assert_eq!(
        session.broadcaster().events_for(&room()).last(),
        Some(&RoomEvent::Update(next.clone()))
    );
    assert_eq!(next.current_player(), Some(&PlayerId::new("B")));
}

/// Test that rejections neither write nor broadcast.
#[test]
fn test_submit_rejections_leave_room_alone() {
    let session = started_session();
    let before = session.load(&room()).unwrap();
    let events_before = session.broadcaster().events().len();

    let not_turn = session.submit_answer(&room(), &PlayerId::new("B"), &dark_knight()).unwrap();
    assert_eq!(not_turn, Outcome::Rejected(Rejection::NotYourTurn));

    let outsider = session.submit_answer(&room(), &PlayerId::new("Z"), &dark_knight()).unwrap();
    assert_eq!(outsider, Outcome::Rejected(Rejection::NotYourTurn));

    let seed = session.submit_answer(&room(), &PlayerId::new("A"), &inception()).unwrap();
    assert_eq!(seed, Outcome::Rejected(Rejection::AlreadyPlayed));

    let no_links = session.submit_answer(&room(), &PlayerId::new("A"), &unrelated()).unwrap();
    assert_eq!(no_links, Outcome::Rejected(Rejection::NoLinksFound));

    assert_eq!(session.load(&room()).unwrap(), before);
    assert_eq!(session.broadcaster().events().len(), events_before);
}

/// Test that repeats are refused without asking the provider for credits.
#[test]
fn test_duplicates_skip_provider() {
    let session = started_session();
    session.submit_answer(&room(), &PlayerId::new("A"), &dark_knight()).unwrap();
    let calls = session.provider().credit_calls.get();

    let outcome = session.submit_answer(&room(), &PlayerId::new("B"), &dark_knight()).unwrap();
    assert_eq!(outcome.rejection(), Some(Rejection::AlreadyPlayed));

    let outcome = session.submit_answer(&room(), &PlayerId::new("B"), &inception()).unwrap();
    assert_eq!(outcome.rejection(), Some(Rejection::AlreadyPlayed));

    assert_eq!(session.provider().credit_calls.get(), calls);
}

/// Test that provider failures surface as errors, not rejections.
#[test]
fn test_provider_failure() {
    let session = started_session();
    let unknown = MediaCandidate::new(MediaType::Movie, 404, "Lost (1900)");

    let err = session.submit_answer(&room(), &PlayerId::new("A"), &unknown).unwrap_err();
    assert!(matches!(err, SessionError::Provider(ProviderError::NotFound(_))));
    assert_eq!(session.load(&room()).unwrap().chain_len(), 0);
}

/// Test that a same-labelled title with a different key is only playable
/// under key matching.
#[test]
fn test_seed_match_config() {
    let remake = MediaCandidate::new(MediaType::Movie, 1, "Inception (2010)");
    let make_provider = || {
        provider().with_credits(&remake, vec![Contributor::cast(6193, "Leonardo DiCaprio")])
    };

    let strict = GameSession::with_config(
        make_provider(),
        MemoryStore::new(),
        MemoryBroadcaster::new(),
        SessionConfig::default().with_seed_match(SeedMatch::Key),
    );
    strict.create_game(&room(), PlayerId::new("A"), &inception()).unwrap();
    strict.join_game(&room(), PlayerId::new("B")).unwrap();
    assert!(strict.submit_answer(&room(), &PlayerId::new("A"), &remake).unwrap().is_accepted());

    let label = GameSession::with_config(
        make_provider(),
        MemoryStore::new(),
        MemoryBroadcaster::new(),
        SessionConfig::default().with_seed_match(SeedMatch::Label),
    );
    label.create_game(&room(), PlayerId::new("A"), &inception()).unwrap();
    label.join_game(&room(), PlayerId::new("B")).unwrap();
    assert_eq!(
        label.submit_answer(&room(), &PlayerId::new("A"), &remake).unwrap().rejection(),
        Some(Rejection::AlreadyPlayed)
    );
}

// =============================================================================
// Write Races
// =============================================================================

/// Store that lets another writer sneak in before the next few swaps.
struct RacyStore {
    inner: MemoryStore,
    interloper: RefCell<Option<GameState>>,
    races_left: Cell<u32>,
}

impl StateStore for RacyStore {
    fn load(&self, room: &RoomCode) -> Result<Option<Versioned>, StoreError> {
        self.inner.load(room)
    }

    fn insert(&self, room: &RoomCode, state: &GameState) -> Result<u64, StoreError> {
        self.inner.insert(room, state)
    }

    fn compare_and_swap(
        &self,
        room: &RoomCode,
        expected: u64,
        state: &GameState,
    ) -> Result<u64, StoreError> {
        if self.races_left.get() > 0 {
            self.races_left.set(self.races_left.get() - 1);
            let current = self.inner.load(room)?.expect("room exists");
            let rewrite = self.interloper.borrow().clone().unwrap_or(current.state);
            self.inner.compare_and_swap(room, current.version, &rewrite)?;
        }
        self.inner.compare_and_swap(room, expected, state)
    }
}

/// Racy session with only the host seated.
fn racy_lobby() -> RacySession {
    let store = RacyStore {
        inner: MemoryStore::new(),
        interloper: RefCell::new(None),
        races_left: Cell::new(0),
    };
    let session = GameSession::new(provider(), store, MemoryBroadcaster::new());
    session.create_game(&room(), PlayerId::new("A"), &inception()).unwrap();
    session
}

fn racy_session() -> RacySession {
    let session = racy_lobby();
    session.join_game(&room(), PlayerId::new("B")).unwrap();
    session
}

fn arm(session: &RacySession, races: u32, interloper: Option<GameState>) {
    session.store().races_left.set(races);
    *session.store().interloper.borrow_mut() = interloper;
}

/// Test that a lost race is retried and the answer still lands.
#[test]
fn test_conflict_retried() {
    let session = racy_session();
    arm(&session, 1, None);

    let outcome = session.submit_answer(&room(), &PlayerId::new("A"), &dark_knight()).unwrap();

    assert!(outcome.is_accepted());
    assert_eq!(session.load(&room()).unwrap().chain_len(), 1);
    // Credits fetched once for the seed and once for the answer
    assert_eq!(session.provider().credit_calls.get(), 2);
}

/// Test that a retry re-runs the rules against the fresher state.
#[test]
fn test_retry_sees_winning_write() {
    let session = racy_session();
    let current = session.load(&room()).unwrap();
    let credits = session.provider().credits(&dark_knight().media_ref()).unwrap();
    let played = apply_answer(&current, &dark_knight(), &credits).into_state().unwrap();
    arm(&session, 1, Some(played.clone()));

    let outcome = session.submit_answer(&room(), &PlayerId::new("A"), &dark_knight()).unwrap();

    assert_eq!(outcome.rejection(), Some(Rejection::NotYourTurn));
    assert_eq!(session.load(&room()).unwrap(), played);
}

/// Test that a join losing a race is retried and still seats the guest.
#[test]
fn test_join_conflict_retried() {
    let session = racy_lobby();
    arm(&session, 1, None);

    let state = session.join_game(&room(), PlayerId::new("B")).unwrap();

    assert_eq!(state.players.len(), 2);
    assert_eq!(session.load(&room()).unwrap(), state);
    assert_eq!(session.store().races_left.get(), 0);
    assert_eq!(session.broadcaster().events_for(&room()).len(), 1);
}

/// Test that a join retried after someone else took the seat is refused.
#[test]
fn test_join_retry_sees_taken_seat() {
    let session = racy_lobby();
    let mut taken = session.load(&room()).unwrap();
    taken.join(PlayerId::new("C")).unwrap();
    arm(&session, 1, Some(taken.clone()));

    let err = session.join_game(&room(), PlayerId::new("B")).unwrap_err();

    assert!(matches!(err, SessionError::Join(JoinError::RoomFull)));
    assert_eq!(session.load(&room()).unwrap(), taken);
    assert!(session.broadcaster().events().is_empty());
}

/// Test that endless contention gives up with an error.
#[test]
fn test_contention_exhausted() {
    let session = racy_session();
    arm(&session, 10, None);

    let err = session.submit_answer(&room(), &PlayerId::new("A"), &dark_knight()).unwrap_err();

    assert!(matches!(err, SessionError::Contention { attempts: 3, .. }));
    assert_eq!(session.load(&room()).unwrap().chain_len(), 0);
}

// =============================================================================
// Search and Game End
// =============================================================================

/// Test that search applies the configured limit and skips people.
#[test]
fn test_search() {
    let mut provider = provider();
    provider.hits = vec![
        SearchHit::Person { id: 525, name: "Christopher Nolan".to_string() },
        SearchHit::Movie {
            id: 27205,
            title: "Inception".to_string(),
            release_date: Some("2010-07-15".to_string()),
        },
        SearchHit::Tv { id: 9, name: "Inception: Jump In".to_string(), first_air_date: None },
        SearchHit::Movie {
            id: 10,
            title: "Inception 2".to_string(),
            release_date: Some(String::new()),
        },
    ];
    let session = GameSession::with_config(
        provider,
        MemoryStore::new(),
        MemoryBroadcaster::new(),
        SessionConfig::default().with_search_limit(2),
    );

    let results = session.search("inception").unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0], inception());
    assert_eq!(results[1].label, "Inception: Jump In (N/A)");
}

/// Test that ending a game broadcasts the reason and player.
#[test]
fn test_end_game() {
    let session = started_session();

    let end = session.end_game(&room(), EndGameReason::PlayerLeft, PlayerId::new("B")).unwrap();

    assert_eq!(end.reason, EndGameReason::PlayerLeft);
    assert_eq!(session.broadcaster().events_for(&room()).last(), Some(&RoomEvent::End(end)));

    let err = session
        .end_game(&room(), EndGameReason::Timeout, PlayerId::new("Z"))
        .unwrap_err();
    assert!(matches!(err, SessionError::NotInGame { .. }));
}

/// Test that an ended game stays readable until the caller drops the room.
#[test]
fn test_ended_room_kept_until_removed() {
    let session = started_session();
    session.submit_answer(&room(), &PlayerId::new("A"), &dark_knight()).unwrap();

    session.end_game(&room(), EndGameReason::Timeout, PlayerId::new("A")).unwrap();
    assert_eq!(session.load(&room()).unwrap().chain_len(), 1);
    assert_eq!(session.store().len(), 1);

    assert!(session.store().remove(&room()));
    assert!(session.store().is_empty());
    let err = session.load(&room()).unwrap_err();
    assert!(matches!(err, SessionError::GameNotFound(_)));
}

// =============================================================================
// Broadcast Failures
// =============================================================================

/// Broadcaster whose channel is down. Counts publish attempts.
#[derive(Default)]
struct DownBroadcaster {
    attempts: Cell<usize>,
}

impl Broadcaster for DownBroadcaster {
    fn publish(&self, room: &RoomCode, event: &RoomEvent) -> Result<(), BroadcastError> {
        self.attempts.set(self.attempts.get() + 1);
        Err(BroadcastError {
            room: room.clone(),
            event: event.name(),
            source: None,
        })
    }
}

fn offline_session() -> GameSession<ScriptedProvider, MemoryStore, DownBroadcaster> {
    GameSession::new(provider(), MemoryStore::new(), DownBroadcaster::default())
}

/// Test that committed moves succeed even when the update can't be sent.
#[test]
fn test_update_broadcast_failure_is_not_fatal() {
    let session = offline_session();
    session.create_game(&room(), PlayerId::new("A"), &inception()).unwrap();

    let joined = session.join_game(&room(), PlayerId::new("B")).unwrap();
    assert_eq!(joined.players.len(), 2);

    let outcome = session.submit_answer(&room(), &PlayerId::new("A"), &dark_knight()).unwrap();
    let next = outcome.into_state().expect("linked through the director");

    assert_eq!(session.load(&room()).unwrap(), next);
    assert_eq!(session.broadcaster().attempts.get(), 2);
}

/// Test that a failed end-game announcement is reported to the caller.
#[test]
fn test_end_game_broadcast_failure() {
    let session = offline_session();
    session.create_game(&room(), PlayerId::new("A"), &inception()).unwrap();

    let err = session
        .end_game(&room(), EndGameReason::PlayerLeft, PlayerId::new("A"))
        .unwrap_err();

    match err {
        SessionError::Broadcast(err) => {
            assert_eq!(err.room, room());
            assert_eq!(err.event, "end-game");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(session.broadcaster().attempts.get(), 1);
}
