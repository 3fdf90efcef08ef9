//! Win-condition evaluation.
//!
//! A pure function of who is alive. The wolves win ties: one wolf facing one
//! villager is already a wolf win.

use crate::game::{Player, Side};

/// Result of a win check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    NoWinnerYet,
    VillagerWin,
    WolfWin,
}

impl Verdict {
    /// Returns the winning side, if the game is decided.
    pub const fn winner(self) -> Option<Side> {
        match self {
            Verdict::NoWinnerYet => None,
            Verdict::VillagerWin => Some(Side::Villagers),
            Verdict::WolfWin => Some(Side::Werewolves),
        }
    }
}

/// Counts living players as `(werewolves, others)`.
pub fn side_counts(players: &[Player]) -> (usize, usize) {
    players
        .iter()
        .filter(|p| p.alive)
        .fold((0, 0), |(wolves, others), p| {
            if p.role.is_werewolf() {
                (wolves + 1, others)
            } else {
                (wolves, others + 1)
            }
        })
}

/// Evaluates the win condition over the current living roles.
pub fn evaluate(players: &[Player]) -> Verdict {
    let (wolves, others) = side_counts(players);
    if wolves == 0 {
        Verdict::VillagerWin
    } else if wolves >= others {
        Verdict::WolfWin
    } else {
        Verdict::NoWinnerYet
    }
}
