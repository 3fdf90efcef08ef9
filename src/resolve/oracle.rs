//! Alignment queries for the seer and the medium.
//!
//! Only `Werewolf` reads as a wolf. Every other role, the medium included,
//! reads as "not a wolf".

use crate::game::{MediumReading, Player, PlayerId, RoleKind, SeerResult};

/// Returns true if `role` reads as a werewolf to the seer and the medium.
pub const fn is_werewolf_aligned(role: RoleKind) -> bool {
    matches!(role, RoleKind::Werewolf)
}

/// Looks up one player's alignment. `target` must be a valid id.
pub fn query(players: &[Player], target: PlayerId) -> SeerResult {
    SeerResult {
        target,
        is_wolf: is_werewolf_aligned(players[target].role),
    }
}

/// Reads the alignment of an executed player.
pub fn medium_reading(players: &[Player], executed: PlayerId) -> MediumReading {
    MediumReading {
        executed,
        is_wolf: is_werewolf_aligned(players[executed].role),
    }
}
