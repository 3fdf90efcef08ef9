//! Phase sequencing logic.
//!
//! Determines the next phase of the game cycle and advances the state
//! accordingly, opening a fresh night queue whenever a night begins.

use std::collections::VecDeque;

use log::debug;

use crate::game::{
    GameState, NightActions, NightTurn, Phase, SeerQueryState, Side, NIGHT_ORDER,
};
use crate::rules::TableRules;

/// Computes the phase that follows `phase` given the current winner.
///
/// Phase flow:
/// - Setup      -> RoleReveal
/// - RoleReveal -> Night
/// - Night      -> Day, or Result once a side has won
/// - Day        -> Vote
/// - Vote       -> Night, or Result once a side has won
/// - Result     -> Result (only a reset leaves it)
pub fn next_phase(phase: Phase, winner: Option<Side>) -> Phase {
    match phase {
        Phase::Setup => Phase::RoleReveal,
        Phase::RoleReveal => Phase::Night,
        Phase::Night | Phase::Vote if winner.is_some() => Phase::Result,
        Phase::Night => Phase::Day,
        Phase::Day => Phase::Vote,
        Phase::Vote => Phase::Night,
        Phase::Result => Phase::Result,
    }
}

/// Builds the night's turn queue from the living role holders.
///
/// A role class with no living holder gets no turn, so it never blocks the
/// night. The medium only has something to learn after an execution.
pub fn night_turns(state: &GameState, rules: &TableRules) -> VecDeque<NightTurn> {
    NIGHT_ORDER
        .iter()
        .copied()
        .filter(|turn| state.holder(turn.role()).is_some())
        .filter(|turn| {
            *turn != NightTurn::Medium || (rules.medium_reveal && state.last_execution.is_some())
        })
        .collect()
}

/// Clears per-night bookkeeping and queues the night's turns.
pub fn open_night(state: &mut GameState, rules: &TableRules) {
    state.night_actions = NightActions::default();
    state.seer_query = SeerQueryState::default();
    state.medium_reading = None;
    state.finished_turns.clear();
    state.night_turns = night_turns(state, rules);
}

/// Advances the state to the next phase.
///
/// This handles:
/// - Day counter increment when a vote hands over to the next night
/// - Opening the night queue when entering Night
/// - Clearing ballots when entering or leaving Vote, so ballots never
///   outlive the tally that consumed them
pub fn advance_state(state: &mut GameState, rules: &TableRules) {
    let next = next_phase(state.phase, state.winner);

    if state.phase == Phase::Vote {
        state.votes.clear();
        if next == Phase::Night {
            state.day_count += 1;
        }
    }

    match next {
        Phase::Night => open_night(state, rules),
        Phase::Vote => state.votes.clear(),
        _ => {}
    }

    debug!("phase {} -> {} (day {})", state.phase, next, state.day_count);
    state.phase = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Player, RoleKind};

    fn seven() -> GameState {
        let roles = [
            RoleKind::Werewolf,
            RoleKind::Werewolf,
            RoleKind::Seer,
            RoleKind::Guard,
            RoleKind::Medium,
            RoleKind::Villager,
            RoleKind::Villager,
        ];
        GameState::with_players(
            roles
                .iter()
                .enumerate()
                .map(|(i, r)| Player::new(i, *r))
                .collect(),
        )
    }

    #[test]
    fn cycle_without_winner() {
        assert_eq!(next_phase(Phase::Setup, None), Phase::RoleReveal);
        assert_eq!(next_phase(Phase::RoleReveal, None), Phase::Night);
        assert_eq!(next_phase(Phase::Night, None), Phase::Day);
        assert_eq!(next_phase(Phase::Day, None), Phase::Vote);
        assert_eq!(next_phase(Phase::Vote, None), Phase::Night);
    }

    #[test]
    fn winner_ends_the_game() {
        let w = Some(Side::Werewolves);
        assert_eq!(next_phase(Phase::Night, w), Phase::Result);
        assert_eq!(next_phase(Phase::Vote, w), Phase::Result);
        assert_eq!(next_phase(Phase::Result, w), Phase::Result);
    }

    #[test]
    fn first_night_has_no_medium_turn() {
        let state = seven();
        let turns: Vec<NightTurn> = night_turns(&state, &TableRules::default()).into();
        assert_eq!(turns, vec![NightTurn::Wolves, NightTurn::Seer, NightTurn::Guard]);
    }

    #[test]
    fn medium_turn_follows_an_execution() {
        let mut state = seven();
        state.players[5].alive = false;
        state.last_execution = Some(5);
        let turns: Vec<NightTurn> = night_turns(&state, &TableRules::default()).into();
        assert_eq!(turns.last(), Some(&NightTurn::Medium));

        let rules = TableRules {
            medium_reveal: false,
            ..TableRules::default()
        };
        assert!(!night_turns(&state, &rules).contains(&NightTurn::Medium));
    }

    #[test]
    fn dead_roles_get_no_turn() {
        let mut state = seven();
        state.players[2].alive = false;
        state.players[3].alive = false;
        let turns: Vec<NightTurn> = night_turns(&state, &TableRules::default()).into();
        assert_eq!(turns, vec![NightTurn::Wolves]);
    }

    #[test]
    fn vote_to_night_increments_day_and_opens_queue() {
        let mut state = seven();
        state.phase = Phase::Vote;
        state.night_actions.wolf_target = Some(4);
        state.votes.insert(0, 4);
        advance_state(&mut state, &TableRules::default());
        assert_eq!(state.phase, Phase::Night);
        assert_eq!(state.day_count, 2);
        assert!(state.night_actions.is_empty());
        assert!(state.votes.is_empty());
        assert_eq!(state.next_night_turn(), Some(NightTurn::Wolves));
    }

    #[test]
    fn tallied_ballots_do_not_reach_the_result() {
        let mut state = seven();
        state.phase = Phase::Vote;
        state.winner = Some(Side::Villagers);
        state.votes.insert(2, 0);
        advance_state(&mut state, &TableRules::default());
        assert_eq!(state.phase, Phase::Result);
        assert!(state.votes.is_empty());
    }

    #[test]
    fn night_to_day_keeps_day_count() {
        let mut state = seven();
        state.phase = Phase::Night;
        advance_state(&mut state, &TableRules::default());
        assert_eq!(state.phase, Phase::Day);
        assert_eq!(state.day_count, 1);
    }

    #[test]
    fn entering_vote_clears_ballots() {
        let mut state = seven();
        state.phase = Phase::Day;
        state.votes.insert(0, 2);
        advance_state(&mut state, &TableRules::default());
        assert_eq!(state.phase, Phase::Vote);
        assert!(state.votes.is_empty());
    }
}
