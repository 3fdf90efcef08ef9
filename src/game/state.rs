//! Game state representation.
//!
//! Holds the complete snapshot of a game: seats and roles, the current phase
//! and day, the night's pending turns and recorded actions, the day's
//! ballots, and the outcome once the game is decided.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::action::{MediumReading, NightActions, NightOutcome, NightTurn, SeerQueryState};
use super::player::{Player, PlayerId};
use super::role::{RoleKind, Side};

/// The phase of the game cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Setup,
    RoleReveal,
    Night,
    Day,
    Vote,
    Result,
}

impl Phase {
    /// Returns the lowercase protocol name.
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::RoleReveal => "reveal",
            Phase::Night => "night",
            Phase::Day => "day",
            Phase::Vote => "vote",
            Phase::Result => "result",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ballots keyed by voter. A living player without an entry abstains.
pub type VoteBallot = BTreeMap<PlayerId, PlayerId>;

/// Complete game state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: Phase,
    /// Starts at 1; advances when a vote hands over to the next night.
    pub day_count: u32,
    pub players: Vec<Player>,
    /// Role acknowledgements collected during `RoleReveal`, indexed by id.
    pub acknowledged: Vec<bool>,
    /// Turns still owed this night, in hand-off order.
    pub night_turns: VecDeque<NightTurn>,
    /// Turns already consumed this night.
    pub finished_turns: Vec<NightTurn>,
    pub night_actions: NightActions,
    pub seer_query: SeerQueryState,
    pub medium_reading: Option<MediumReading>,
    pub votes: VoteBallot,
    pub last_night: Option<NightOutcome>,
    pub last_night_summary: String,
    pub last_execution: Option<PlayerId>,
    pub winner: Option<Side>,
}

impl Default for GameState {
    fn default() -> Self {
        GameState {
            phase: Phase::Setup,
            day_count: 1,
            players: Vec::new(),
            acknowledged: Vec::new(),
            night_turns: VecDeque::new(),
            finished_turns: Vec::new(),
            night_actions: NightActions::default(),
            seer_query: SeerQueryState::default(),
            medium_reading: None,
            votes: VoteBallot::new(),
            last_night: None,
            last_night_summary: String::new(),
            last_execution: None,
            winner: None,
        }
    }
}

impl GameState {
    /// Creates a fresh game in `RoleReveal` for already-dealt players.
    pub fn with_players(players: Vec<Player>) -> Self {
        let count = players.len();
        GameState {
            phase: Phase::RoleReveal,
            players,
            acknowledged: vec![false; count],
            ..GameState::default()
        }
    }

    /// Looks up a player by id.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// Returns true if `id` names a living player.
    pub fn is_alive(&self, id: PlayerId) -> bool {
        self.player(id).is_some_and(|p| p.alive)
    }

    /// Ids of all living players, ascending.
    pub fn living(&self) -> Vec<PlayerId> {
        self.players.iter().filter(|p| p.alive).map(|p| p.id).collect()
    }

    /// Ids of living players holding `role`, ascending.
    pub fn living_with_role(&self, role: RoleKind) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.is_living(role))
            .map(|p| p.id)
            .collect()
    }

    /// The first living holder of `role`, if any.
    pub fn holder(&self, role: RoleKind) -> Option<PlayerId> {
        self.players.iter().find(|p| p.is_living(role)).map(|p| p.id)
    }

    /// Number of players who have not yet acknowledged their role.
    pub fn pending_acknowledgements(&self) -> usize {
        self.acknowledged.iter().filter(|a| !**a).count()
    }

    /// The next night turn in hand-off order.
    pub fn next_night_turn(&self) -> Option<NightTurn> {
        self.night_turns.front().copied()
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_seats() -> GameState {
        GameState::with_players(vec![
            Player::new(0, RoleKind::Werewolf),
            Player::new(1, RoleKind::Seer),
            Player::new(2, RoleKind::Villager),
            Player::new(3, RoleKind::Guard),
        ])
    }

    #[test]
    fn default_state_is_setup() {
        let state = GameState::default();
        assert_eq!(state.phase, Phase::Setup);
        assert_eq!(state.day_count, 1);
        assert!(state.players.is_empty());
        assert!(state.winner.is_none());
    }

    #[test]
    fn with_players_enters_role_reveal() {
        let state = four_seats();
        assert_eq!(state.phase, Phase::RoleReveal);
        assert_eq!(state.pending_acknowledgements(), 4);
        assert_eq!(state.living(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn role_lookups_ignore_the_dead() {
        let mut state = four_seats();
        assert_eq!(state.holder(RoleKind::Seer), Some(1));
        state.players[1].alive = false;
        assert_eq!(state.holder(RoleKind::Seer), None);
        assert!(state.living_with_role(RoleKind::Seer).is_empty());
        assert!(!state.is_alive(1));
        assert!(!state.is_alive(42));
        // Dead players stay addressable.
        assert_eq!(state.player(1).map(|p| p.role), Some(RoleKind::Seer));
    }

    #[test]
    fn mid_game_snapshot_restores_from_json() {
        let mut state = four_seats();
        state.phase = Phase::Night;
        state.day_count = 2;
        state.players[2].alive = false;
        state.acknowledged = vec![true; 4];
        state.night_turns = VecDeque::from([NightTurn::Seer, NightTurn::Guard]);
        state.finished_turns = vec![NightTurn::Wolves];
        state.night_actions.wolf_target = Some(1);
        state.last_night = Some(NightOutcome::Killed(2));
        state.last_night_summary = "player 2 was found dead".to_string();
        state.medium_reading = Some(MediumReading {
            executed: 0,
            is_wolf: true,
        });

        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
        assert_eq!(restored.next_night_turn(), Some(NightTurn::Seer));
    }

    #[test]
    fn phase_names_are_lowercase() {
        assert_eq!(Phase::RoleReveal.to_string(), "reveal");
        assert_eq!(Phase::Vote.to_string(), "vote");
    }
}
