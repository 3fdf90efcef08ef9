//! Game representation.
//!
//! Contains the core data structures for roles, players, night actions, the
//! overall game state, and the public view shown to the whole table.

pub mod action;
pub mod player;
pub mod role;
pub mod state;
pub mod view;

pub use action::{
    MediumReading, NightActions, NightOutcome, NightTurn, SeerQueryState, SeerResult,
    NIGHT_ORDER,
};
pub use player::{Player, PlayerId};
pub use role::{RoleKind, Side, ALL_ROLES};
pub use state::{GameState, Phase, VoteBallot};
pub use view::{PublicSeat, PublicView};
