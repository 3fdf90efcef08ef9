//! Night resolution.
//!
//! Validates each role's target as it is submitted, then turns the night's
//! recorded actions into a single outcome: a peaceful night, a guarded
//! survivor, or one death.

use log::warn;

use crate::error::{EngineError, Result, TargetRejection};
use crate::game::{NightActions, NightOutcome, Player, PlayerId};

/// Looks up a living target, rejecting unknown ids and the dead.
fn living_target(players: &[Player], target: PlayerId) -> Result<&Player> {
    let reject = |reason| EngineError::InvalidTarget { target, reason };
    let player = players
        .get(target)
        .ok_or_else(|| reject(TargetRejection::UnknownPlayer))?;
    if !player.alive {
        return Err(reject(TargetRejection::Dead));
    }
    Ok(player)
}

/// The wolves may attack any living non-werewolf.
pub fn validate_wolf_target(players: &[Player], target: PlayerId) -> Result<()> {
    let player = living_target(players, target)?;
    if player.role.is_werewolf() {
        return Err(EngineError::InvalidTarget {
            target,
            reason: TargetRejection::Werewolf,
        });
    }
    Ok(())
}

/// The seer may query any living player except itself.
pub fn validate_seer_target(players: &[Player], seer: PlayerId, target: PlayerId) -> Result<()> {
    living_target(players, target)?;
    if target == seer {
        return Err(EngineError::InvalidTarget {
            target,
            reason: TargetRejection::SelfTarget,
        });
    }
    Ok(())
}

/// The guard may protect any living player; itself only if the table allows it.
pub fn validate_guard_target(
    players: &[Player],
    guard: PlayerId,
    target: PlayerId,
    allow_self: bool,
) -> Result<()> {
    living_target(players, target)?;
    if target == guard && !allow_self {
        return Err(EngineError::InvalidTarget {
            target,
            reason: TargetRejection::SelfTarget,
        });
    }
    Ok(())
}

/// Determines the night's outcome without touching any player.
pub fn resolve(actions: &NightActions, players: &[Player]) -> NightOutcome {
    let Some(target) = actions.wolf_target else {
        return NightOutcome::Peaceful;
    };
    if actions.guard_target == Some(target) {
        return NightOutcome::Protected(target);
    }
    if players.get(target).is_some_and(|p| p.alive) {
        NightOutcome::Killed(target)
    } else {
        NightOutcome::Undisturbed(target)
    }
}

/// Applies a resolved outcome. Only a kill changes anything.
pub fn apply_outcome(players: &mut [Player], outcome: NightOutcome) {
    match outcome {
        NightOutcome::Killed(victim) => players[victim].alive = false,
        NightOutcome::Undisturbed(target) => {
            warn!("wolf target {} was already dead at resolution", target);
        }
        NightOutcome::Peaceful | NightOutcome::Protected(_) => {}
    }
}
