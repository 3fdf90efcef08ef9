//! Engine errors.
//!
//! Every variant is a local, recoverable rejection. An operation that returns
//! an error leaves the game state exactly as it was before the call.

use thiserror::Error;

use crate::game::{NightTurn, Phase, PlayerId};

/// Why a night-action target was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRejection {
    UnknownPlayer,
    Dead,
    SelfTarget,
    Werewolf,
}

impl TargetRejection {
    pub const fn describe(self) -> &'static str {
        match self {
            TargetRejection::UnknownPlayer => "no such player",
            TargetRejection::Dead => "player is dead",
            TargetRejection::SelfTarget => "cannot target self",
            TargetRejection::Werewolf => "werewolves cannot attack a werewolf",
        }
    }
}

/// Why a ballot was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteRejection {
    UnknownPlayer,
    DeadVoter,
    DeadTarget,
    SelfVote,
}

impl VoteRejection {
    pub const fn describe(self) -> &'static str {
        match self {
            VoteRejection::UnknownPlayer => "no such player",
            VoteRejection::DeadVoter => "voter is dead",
            VoteRejection::DeadTarget => "target is dead",
            VoteRejection::SelfVote => "cannot vote for self",
        }
    }
}

/// Errors returned by engine operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("player count must be between 4 and 8, got {0}")]
    InvalidPlayerCount(usize),

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("invalid target {target}: {}", reason.describe())]
    InvalidTarget {
        target: PlayerId,
        reason: TargetRejection,
    },

    #[error("{0} already acted this night")]
    DuplicateNightAction(NightTurn),

    #[error("seer already used this night's query")]
    SeerAlreadyActed,

    #[error("{0} has no turn this night")]
    NoEligibleActor(NightTurn),

    #[error("{0} night turn(s) still pending")]
    PendingNightTurns(usize),

    #[error("{0} player(s) have not acknowledged their role")]
    AwaitingAcknowledgements(usize),

    #[error("invalid vote {voter} -> {target}: {}", reason.describe())]
    InvalidVote {
        voter: PlayerId,
        target: PlayerId,
        reason: VoteRejection,
    },

    #[error("{operation} is not allowed during the {phase} phase")]
    PhaseViolation {
        operation: &'static str,
        phase: Phase,
    },

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidOptionValue { name: String, value: String },
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;
