//! Night actions, night turns, and night outcomes.
//!
//! A night collects at most one target per acting role. The role holders act
//! in turns drawn from an explicit queue; each turn is consumed exactly once,
//! either by a submission or by a skip.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use super::role::RoleKind;

/// One pending step of a night, owned by a role class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NightTurn {
    /// All living werewolves, acting together.
    Wolves,
    Seer,
    Guard,
    Medium,
}

/// Night turns in hand-off order.
pub const NIGHT_ORDER: [NightTurn; 4] = [
    NightTurn::Wolves,
    NightTurn::Seer,
    NightTurn::Guard,
    NightTurn::Medium,
];

impl NightTurn {
    /// Returns the role whose holders act in this turn.
    pub const fn role(self) -> RoleKind {
        match self {
            NightTurn::Wolves => RoleKind::Werewolf,
            NightTurn::Seer => RoleKind::Seer,
            NightTurn::Guard => RoleKind::Guard,
            NightTurn::Medium => RoleKind::Medium,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            NightTurn::Wolves => "wolves",
            NightTurn::Seer => "seer",
            NightTurn::Guard => "guard",
            NightTurn::Medium => "medium",
        }
    }

    /// Parses a turn from its protocol name. Accepts "wolf" and "werewolf"
    /// as aliases for the wolves' turn.
    pub fn from_name(s: &str) -> Option<NightTurn> {
        match s.to_ascii_lowercase().as_str() {
            "wolves" | "wolf" | "werewolf" | "werewolves" => Some(NightTurn::Wolves),
            "seer" => Some(NightTurn::Seer),
            "guard" => Some(NightTurn::Guard),
            "medium" => Some(NightTurn::Medium),
            _ => None,
        }
    }
}

impl fmt::Display for NightTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Targets recorded during the current night.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightActions {
    pub wolf_target: Option<PlayerId>,
    pub seer_target: Option<PlayerId>,
    pub guard_target: Option<PlayerId>,
}

impl NightActions {
    pub fn is_empty(&self) -> bool {
        self.wolf_target.is_none() && self.seer_target.is_none() && self.guard_target.is_none()
    }
}

/// What the seer learned about one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeerResult {
    pub target: PlayerId,
    pub is_wolf: bool,
}

/// The seer's once-per-night query slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeerQueryState {
    pub used_this_night: bool,
    pub last_result: Option<SeerResult>,
}

/// What the medium learned about the previous day's executed player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediumReading {
    pub executed: PlayerId,
    pub is_wolf: bool,
}

/// The resolved result of one night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NightOutcome {
    /// The wolves did not attack.
    Peaceful,
    /// The attacked player was guarded and survived.
    Protected(PlayerId),
    /// The attacked player died.
    Killed(PlayerId),
    /// The attacked player was already dead; nothing happened.
    Undisturbed(PlayerId),
}

impl NightOutcome {
    /// Returns the player who died this night, if any.
    pub fn victim(self) -> Option<PlayerId> {
        match self {
            NightOutcome::Killed(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for NightOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NightOutcome::Peaceful => write!(f, "peaceful night"),
            NightOutcome::Protected(p) => {
                write!(f, "nobody died: player {} survived an attack", p)
            }
            NightOutcome::Killed(p) => write!(f, "player {} was found dead", p),
            NightOutcome::Undisturbed(_) => write!(f, "strangely, nobody died"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn night_turn_names_roundtrip() {
        for turn in NIGHT_ORDER {
            assert_eq!(NightTurn::from_name(turn.name()), Some(turn));
            assert_eq!(turn.role().night_turn(), Some(turn));
        }
        assert_eq!(NightTurn::from_name("wolf"), Some(NightTurn::Wolves));
        assert_eq!(NightTurn::from_name("villager"), None);
    }

    #[test]
    fn only_kills_have_a_victim() {
        assert_eq!(NightOutcome::Killed(2).victim(), Some(2));
        assert_eq!(NightOutcome::Protected(2).victim(), None);
        assert_eq!(NightOutcome::Undisturbed(2).victim(), None);
        assert_eq!(NightOutcome::Peaceful.victim(), None);
    }

    #[test]
    fn summaries_name_the_player() {
        assert_eq!(NightOutcome::Peaceful.to_string(), "peaceful night");
        assert!(NightOutcome::Protected(4).to_string().contains("player 4"));
        assert!(NightOutcome::Killed(1).to_string().contains("player 1"));
    }

    #[test]
    fn default_actions_are_empty() {
        let mut actions = NightActions::default();
        assert!(actions.is_empty());
        actions.guard_target = Some(0);
        assert!(!actions.is_empty());
    }
}
