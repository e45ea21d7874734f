//! Answer validation and application.
//!
//! A submitted title goes through these checks, in this order:
//!
//! 1. It must be the submitting player's turn.
//! 2. It must not be the seed title.
//! 3. It must not already be in the chain.
//! 4. At least one of its eligible contributors must be in the credit pool.
//!
//! The first failing check decides the [`Rejection`]. An accepted title is
//! prepended to the chain with its links, and its eligible contributors
//! replace the credit pool.
//!
//! Everything here is a pure function of its inputs. The same state,
//! candidate and contributors always produce the same [`Outcome`], which
//! is what lets a caller retry under optimistic concurrency.

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::credits::{self, Contributor};
use crate::core::state::credit_pool;
use crate::core::{
    GameState, Link, Links, MediaCandidate, PersonId, PlayedMedia, PlayerId, SeedMatch,
};

/// Why a move was refused. The message is shown to the player as is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum Rejection {
    #[error("It is not your turn")]
    NotYourTurn,
    /// Covers both the seed title and titles already in the chain.
    #[error("This media has already been played")]
    AlreadyPlayed,
    #[error("No links found")]
    NoLinksFound,
}

/// Result of submitting a title.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// The move stands. Carries the next state.
    Accepted(GameState),
    /// The move was refused. The input state is unchanged.
    Rejected(Rejection),
}

impl Outcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Outcome::Accepted(_) => None,
            Outcome::Rejected(reason) => Some(*reason),
        }
    }

    /// The next state, if accepted.
    #[must_use]
    pub fn into_state(self) -> Option<GameState> {
        match self {
            Outcome::Accepted(state) => Some(state),
            Outcome::Rejected(_) => None,
        }
    }
}

/// Links a candidate would form, plus the pool it would leave behind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkScan {
    /// People in both the current pool and the candidate's credits, in
    /// credit order, one entry per person (first name seen wins).
    pub links: Links,
    /// Every eligible contributor of the candidate, deduplicated.
    pub pool: Vector<PersonId>,
}

/// Compute links between the current pool and a candidate's contributors.
///
/// Ineligible crew credits are skipped entirely: they neither link nor
/// enter the next pool.
#[must_use]
pub fn scan_links(current_credits: &Vector<PersonId>, contributors: &[Contributor]) -> LinkScan {
    let pool: FxHashSet<PersonId> = current_credits.iter().copied().collect();
    let mut linked = FxHashSet::default();
    let mut links = Links::new();

    for person in credits::eligible(contributors) {
        if pool.contains(&person.id) && linked.insert(person.id) {
            links.push(Link::new(person.id, person.name.clone()));
        }
    }

    LinkScan {
        links,
        pool: credit_pool(credits::eligible(contributors).map(|c| c.id)),
    }
}

/// Applies the rules with a fixed seed-matching policy.
///
/// ```
/// use credit_chain::core::{Contributor, GameState, MediaCandidate, MediaType, PersonId, PlayerId};
/// use credit_chain::rules::{Referee, Rejection};
///
/// let mut state = GameState::new(PlayerId::new("A"), "Inception (2010)", [PersonId(5)]);
/// state.join(PlayerId::new("B")).unwrap();
///
/// let candidate = MediaCandidate::new(MediaType::Movie, 999, "Other Movie (2015)");
/// let referee = Referee::default();
///
/// let outcome = referee.submit_answer(&state, &PlayerId::new("B"), &candidate, &[]);
/// assert_eq!(outcome.rejection(), Some(Rejection::NotYourTurn));
///
/// let credits = [Contributor::cast(5, "X")];
/// let outcome = referee.submit_answer(&state, &PlayerId::new("A"), &candidate, &credits);
/// assert!(outcome.is_accepted());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Referee {
    seed_match: SeedMatch,
}

impl Referee {
    #[must_use]
    pub const fn new(seed_match: SeedMatch) -> Self {
        Self { seed_match }
    }

    #[must_use]
    pub const fn seed_match(&self) -> SeedMatch {
        self.seed_match
    }

    /// Whether the candidate is the seed title.
    #[must_use]
    pub fn is_seed(&self, state: &GameState, candidate: &MediaCandidate) -> bool {
        let label_match = state.initial_label == candidate.label;
        match (self.seed_match, &state.initial_key) {
            (SeedMatch::Label, _) => label_match,
            (SeedMatch::Key, Some(key)) => *key == candidate.key,
            (SeedMatch::Key, None) => label_match,
            (SeedMatch::KeyOrLabel, key) => label_match || key.as_ref() == Some(&candidate.key),
        }
    }

    /// Seed and history checks. Needs no credits, so callers can run it
    /// before fetching any.
    #[must_use]
    pub fn check_duplicate(
        &self,
        state: &GameState,
        candidate: &MediaCandidate,
    ) -> Option<Rejection> {
        if self.is_seed(state, candidate) || state.has_played(&candidate.key) {
            Some(Rejection::AlreadyPlayed)
        } else {
            None
        }
    }

    /// Validate and apply a candidate whose turn has already been checked.
    pub fn apply_answer(
        &self,
        state: &GameState,
        candidate: &MediaCandidate,
        contributors: &[Contributor],
    ) -> Outcome {
        if let Some(rejection) = self.check_duplicate(state, candidate) {
            return Outcome::Rejected(rejection);
        }

        let LinkScan { links, pool } = scan_links(&state.current_credits, contributors);
        if links.is_empty() {
            return Outcome::Rejected(Rejection::NoLinksFound);
        }

        let mut next = state.clone();
        next.current_credits = pool;
        next.media.push_front(PlayedMedia {
            key: candidate.key.clone(),
            label: candidate.label.clone(),
            links,
        });
        Outcome::Accepted(next)
    }

    /// Turn check followed by [`Referee::apply_answer`].
    pub fn submit_answer(
        &self,
        state: &GameState,
        player: &PlayerId,
        candidate: &MediaCandidate,
        contributors: &[Contributor],
    ) -> Outcome {
        if !state.is_turn_of(player) {
            return Outcome::Rejected(Rejection::NotYourTurn);
        }
        self.apply_answer(state, candidate, contributors)
    }
}

/// [`Referee::apply_answer`] with the default seed-matching policy.
pub fn apply_answer(
    state: &GameState,
    candidate: &MediaCandidate,
    contributors: &[Contributor],
) -> Outcome {
    Referee::default().apply_answer(state, candidate, contributors)
}

/// [`Referee::submit_answer`] with the default seed-matching policy.
pub fn submit_answer(
    state: &GameState,
    player: &PlayerId,
    candidate: &MediaCandidate,
    contributors: &[Contributor],
) -> Outcome {
    Referee::default().submit_answer(state, player, candidate, contributors)
}
