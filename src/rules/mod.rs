//! Game rules: turn resolution and answer validation.
//!
//! Both are pure functions over a [`GameState`](crate::core::GameState)
//! snapshot. They perform no I/O and never log.

pub mod turn;
pub mod engine;

pub use turn::is_player_turn;
pub use engine::{apply_answer, scan_links, submit_answer, LinkScan, Outcome, Referee, Rejection};
