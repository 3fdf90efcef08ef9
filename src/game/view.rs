//! The table-wide view of a game.
//!
//! Everything here may be shown to all participants at once. Roles stay
//! hidden until the game has been decided.

use serde::Serialize;

use super::action::NightTurn;
use super::player::PlayerId;
use super::role::{RoleKind, Side};
use super::state::{GameState, Phase};

/// A seat as seen by the whole table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PublicSeat {
    pub id: PlayerId,
    pub alive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleKind>,
}

/// Public snapshot of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicView {
    pub phase: Phase,
    pub day_count: u32,
    pub seats: Vec<PublicSeat>,
    pub next_night_turn: Option<NightTurn>,
    pub votes_cast: usize,
    pub last_night_summary: String,
    pub last_execution: Option<PlayerId>,
    pub winner: Option<Side>,
}

impl PublicView {
    pub fn of(state: &GameState) -> Self {
        let reveal_roles = state.phase == Phase::Result;
        PublicView {
            phase: state.phase,
            day_count: state.day_count,
            seats: state
                .players
                .iter()
                .map(|p| PublicSeat {
                    id: p.id,
                    alive: p.alive,
                    role: reveal_roles.then_some(p.role),
                })
                .collect(),
            next_night_turn: state.next_night_turn(),
            votes_cast: state.votes.len(),
            last_night_summary: state.last_night_summary.clone(),
            last_execution: state.last_execution,
            winner: state.winner,
        }
    }
}
