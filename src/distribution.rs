//! Role distribution.
//!
//! Each supported player count has exactly one fixed role multiset. Dealing
//! shuffles that multiset and hands role `i` to seat `i`.

use crate::error::{EngineError, Result};
use crate::game::RoleKind::{Guard, Medium, Seer, Villager, Werewolf};
use crate::game::{Player, RoleKind};
use crate::random::RandomSource;

/// Smallest supported table.
pub const MIN_PLAYERS: usize = 4;
/// Largest supported table.
pub const MAX_PLAYERS: usize = 8;

const TABLE_4: [RoleKind; 4] = [Werewolf, Seer, Guard, Villager];
const TABLE_5: [RoleKind; 5] = [Werewolf, Seer, Guard, Villager, Villager];
const TABLE_6: [RoleKind; 6] = [Werewolf, Werewolf, Seer, Guard, Villager, Villager];
const TABLE_7: [RoleKind; 7] = [Werewolf, Werewolf, Seer, Guard, Medium, Villager, Villager];
const TABLE_8: [RoleKind; 8] = [
    Werewolf, Werewolf, Seer, Guard, Medium, Villager, Villager, Villager,
];

/// Returns the role multiset for `n` players.
pub fn roles_for(n: usize) -> Result<&'static [RoleKind]> {
    match n {
        4 => Ok(&TABLE_4),
        5 => Ok(&TABLE_5),
        6 => Ok(&TABLE_6),
        7 => Ok(&TABLE_7),
        8 => Ok(&TABLE_8),
        _ => Err(EngineError::InvalidPlayerCount(n)),
    }
}

/// Counts how many copies of `role` the table for `n` players deals.
pub fn role_count(n: usize, role: RoleKind) -> Result<usize> {
    Ok(roles_for(n)?.iter().filter(|r| **r == role).count())
}

/// Deals a uniformly shuffled copy of the `n`-player table onto seats `0..n`.
pub fn assign_roles<R: RandomSource>(n: usize, rng: &mut R) -> Result<Vec<Player>> {
    let mut roles = roles_for(n)?.to_vec();
    rng.shuffle(&mut roles);
    Ok(roles
        .into_iter()
        .enumerate()
        .map(|(id, role)| Player::new(id, role))
        .collect())
}
