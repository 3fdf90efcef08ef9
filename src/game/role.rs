//! Roles and the sides they play for.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::action::NightTurn;

/// The two competing sides of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Villagers,
    Werewolves,
}

impl Side {
    /// Returns the lowercase protocol name.
    pub const fn name(self) -> &'static str {
        match self {
            Side::Villagers => "villagers",
            Side::Werewolves => "werewolves",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A role dealt to one player at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoleKind {
    Werewolf,
    Seer,
    Guard,
    Medium,
    Villager,
}

/// All roles, in table-column order.
pub const ALL_ROLES: [RoleKind; 5] = [
    RoleKind::Werewolf,
    RoleKind::Seer,
    RoleKind::Guard,
    RoleKind::Medium,
    RoleKind::Villager,
];

impl RoleKind {
    /// Returns the side this role wins with.
    pub const fn side(self) -> Side {
        match self {
            RoleKind::Werewolf => Side::Werewolves,
            _ => Side::Villagers,
        }
    }

    pub const fn is_werewolf(self) -> bool {
        matches!(self, RoleKind::Werewolf)
    }

    /// Returns the night turn this role acts in, if any.
    pub const fn night_turn(self) -> Option<NightTurn> {
        match self {
            RoleKind::Werewolf => Some(NightTurn::Wolves),
            RoleKind::Seer => Some(NightTurn::Seer),
            RoleKind::Guard => Some(NightTurn::Guard),
            RoleKind::Medium => Some(NightTurn::Medium),
            RoleKind::Villager => None,
        }
    }

    /// Returns the lowercase protocol name.
    pub const fn name(self) -> &'static str {
        match self {
            RoleKind::Werewolf => "werewolf",
            RoleKind::Seer => "seer",
            RoleKind::Guard => "guard",
            RoleKind::Medium => "medium",
            RoleKind::Villager => "villager",
        }
    }

    /// Parses a role from its protocol name (case-insensitive).
    pub fn from_name(s: &str) -> Option<RoleKind> {
        ALL_ROLES
            .iter()
            .copied()
            .find(|r| r.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
