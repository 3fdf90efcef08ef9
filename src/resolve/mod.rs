//! Rules resolution.
//!
//! Resolves the night's actions into an outcome, tallies the day's vote,
//! checks the win condition, and sequences the phases of the game.

pub mod night;
pub mod oracle;
pub mod phase;
pub mod victory;
pub mod vote;

pub use night::{apply_outcome, resolve};
pub use phase::{advance_state, next_phase, night_turns, open_night};
pub use victory::{evaluate, side_counts, Verdict};
pub use vote::{count_ballots, tally, validate_ballot, Tally};
