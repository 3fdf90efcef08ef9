//! Player records.

use serde::{Deserialize, Serialize};

use super::role::RoleKind;

/// Seat index, dense in `0..N` and stable for the whole game.
pub type PlayerId = usize;

/// One seat at the table.
///
/// Dead players keep their record so they stay addressable by id; only
/// `alive` changes after setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub role: RoleKind,
    pub alive: bool,
}

impl Player {
    /// Creates a living player.
    pub fn new(id: PlayerId, role: RoleKind) -> Self {
        Player {
            id,
            role,
            alive: true,
        }
    }

    /// Returns true if this player is alive and holds `role`.
    pub fn is_living(&self, role: RoleKind) -> bool {
        self.alive && self.role == role
    }
}
