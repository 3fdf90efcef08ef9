//! Engine state management.
//!
//! Owns the game state, the table rules, and the random source between
//! calls. Every operation is one atomic transition: it validates everything
//! first and only then mutates, so a rejected call leaves the state untouched.

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::distribution::assign_roles;
use crate::error::{EngineError, Result};
use crate::game::{
    GameState, MediumReading, NightOutcome, NightTurn, Phase, PlayerId, PublicView, RoleKind,
    SeerResult, Side,
};
use crate::random::RandomSource;
use crate::resolve::{self, night, oracle, vote, Tally};
use crate::rules::TableRules;

/// What `resolve_night` reports back to the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NightReport {
    pub outcome: NightOutcome,
    pub summary: String,
    pub winner: Option<Side>,
}

/// What `tally_votes` reports back to the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteReport {
    pub tally: Tally,
    pub executed: Option<PlayerId>,
    pub winner: Option<Side>,
}

/// Holds the mutable state of one table between calls.
pub struct Engine<R: RandomSource = SmallRng> {
    state: GameState,
    rules: TableRules,
    rng: R,
}

impl Engine<SmallRng> {
    /// Creates an engine with default table rules.
    pub fn new() -> Self {
        Self::with_rules(TableRules::default())
    }

    /// Creates an engine whose games draw from a `SmallRng` seeded per game.
    pub fn with_rules(rules: TableRules) -> Self {
        Engine::with_source(rules, SmallRng::from_entropy())
    }
}

impl Default for Engine<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> Engine<R> {
    /// Creates an engine drawing from `rng`.
    pub fn with_source(rules: TableRules, rng: R) -> Self {
        Engine {
            state: GameState::default(),
            rules,
            rng,
        }
    }

    /// Read-only snapshot of the full state, hidden information included.
    pub fn current_state(&self) -> &GameState {
        &self.state
    }

    /// The view that may be shown to the whole table.
    pub fn public_view(&self) -> PublicView {
        PublicView::of(&self.state)
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    /// Sets one table rule. Rules are fixed once a game is dealt.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        self.expect_phase(Phase::Setup, "set_option")?;
        self.rules.set_option(name, value)
    }

    /// Ids of all living players.
    pub fn living_players(&self) -> Vec<PlayerId> {
        self.state.living()
    }

    /// Deals roles for `n` players and enters `RoleReveal`.
    pub fn new_game(&mut self, n: usize) -> Result<&GameState> {
        self.expect_phase(Phase::Setup, "new_game")?;
        crate::distribution::roles_for(n)?;

        self.rng.reseed(self.rules.seed);
        let players = assign_roles(n, &mut self.rng)?;
        self.state = GameState::with_players(players);
        info!("new game with {} players", n);
        Ok(&self.state)
    }

    /// Abandons the current game and returns to `Setup`. Allowed in any phase.
    pub fn reset(&mut self) {
        debug!("reset from {} phase", self.state.phase);
        self.state = GameState::default();
    }

    /// Looks up a player's role. Never changes state.
    pub fn reveal_role(&self, id: PlayerId) -> Result<RoleKind> {
        self.state
            .player(id)
            .map(|p| p.role)
            .ok_or(EngineError::UnknownPlayer(id))
    }

    /// Marks that `id` has seen their role.
    pub fn acknowledge_role(&mut self, id: PlayerId) -> Result<()> {
        self.expect_phase(Phase::RoleReveal, "acknowledge_role")?;
        let slot = self
            .state
            .acknowledged
            .get_mut(id)
            .ok_or(EngineError::UnknownPlayer(id))?;
        *slot = true;
        Ok(())
    }

    /// Starts the first night once every player has acknowledged their role.
    pub fn advance_role_reveal(&mut self) -> Result<&GameState> {
        self.expect_phase(Phase::RoleReveal, "advance_role_reveal")?;
        let pending = self.state.pending_acknowledgements();
        if pending > 0 {
            return Err(EngineError::AwaitingAcknowledgements(pending));
        }
        resolve::advance_state(&mut self.state, &self.rules);
        Ok(&self.state)
    }

    /// The next night turn in hand-off order, if the night still owes one.
    pub fn next_night_turn(&self) -> Option<NightTurn> {
        self.state.next_night_turn()
    }

    /// Records the wolves' collective attack target.
    pub fn submit_wolf_target(&mut self, target: PlayerId) -> Result<()> {
        self.expect_phase(Phase::Night, "submit_wolf_target")?;
        self.check_turn(NightTurn::Wolves)?;
        night::validate_wolf_target(&self.state.players, target)?;

        self.state.night_actions.wolf_target = Some(target);
        self.finish_turn(NightTurn::Wolves);
        Ok(())
    }

    /// Records the seer's query and returns what the seer learns.
    pub fn submit_seer_target(&mut self, target: PlayerId) -> Result<SeerResult> {
        self.expect_phase(Phase::Night, "submit_seer_target")?;
        self.check_turn(NightTurn::Seer)?;
        let seer = self.actor(NightTurn::Seer)?;
        night::validate_seer_target(&self.state.players, seer, target)?;

        let result = oracle::query(&self.state.players, target);
        self.state.night_actions.seer_target = Some(target);
        self.state.seer_query.used_this_night = true;
        self.state.seer_query.last_result = Some(result);
        self.finish_turn(NightTurn::Seer);
        Ok(result)
    }

    /// Records the guard's protection target.
    pub fn submit_guard_target(&mut self, target: PlayerId) -> Result<()> {
        self.expect_phase(Phase::Night, "submit_guard_target")?;
        self.check_turn(NightTurn::Guard)?;
        let guard = self.actor(NightTurn::Guard)?;
        night::validate_guard_target(
            &self.state.players,
            guard,
            target,
            self.rules.allow_self_guard,
        )?;

        self.state.night_actions.guard_target = Some(target);
        self.finish_turn(NightTurn::Guard);
        Ok(())
    }

    /// Lets the medium learn whether the previous day's executed player was a wolf.
    pub fn submit_medium_reading(&mut self) -> Result<MediumReading> {
        self.expect_phase(Phase::Night, "submit_medium_reading")?;
        self.check_turn(NightTurn::Medium)?;
        let executed = self
            .state
            .last_execution
            .ok_or(EngineError::NoEligibleActor(NightTurn::Medium))?;

        let reading = oracle::medium_reading(&self.state.players, executed);
        self.state.medium_reading = Some(reading);
        self.finish_turn(NightTurn::Medium);
        Ok(reading)
    }

    /// Consumes a turn without acting: the holder declines.
    pub fn skip_night_turn(&mut self, turn: NightTurn) -> Result<()> {
        self.expect_phase(Phase::Night, "skip_night_turn")?;
        self.check_turn(turn)?;
        self.finish_turn(turn);
        Ok(())
    }

    /// Resolves the night once every queued turn has been consumed.
    pub fn resolve_night(&mut self) -> Result<NightReport> {
        self.expect_phase(Phase::Night, "resolve_night")?;
        let pending = self.state.night_turns.len();
        if pending > 0 {
            return Err(EngineError::PendingNightTurns(pending));
        }

        let outcome = night::resolve(&self.state.night_actions, &self.state.players);
        night::apply_outcome(&mut self.state.players, outcome);
        let summary = outcome.to_string();
        info!("night {}: {}", self.state.day_count, summary);

        self.state.last_night = Some(outcome);
        self.state.last_night_summary = summary.clone();
        self.state.night_actions = Default::default();
        self.state.seer_query = Default::default();
        self.state.medium_reading = None;
        self.state.finished_turns.clear();

        let winner = self.settle_winner();
        resolve::advance_state(&mut self.state, &self.rules);
        Ok(NightReport {
            outcome,
            summary,
            winner,
        })
    }

    /// Ends the day's discussion and opens the vote.
    pub fn close_discussion(&mut self) -> Result<()> {
        self.expect_phase(Phase::Day, "close_discussion")?;
        resolve::advance_state(&mut self.state, &self.rules);
        Ok(())
    }

    /// Stores or overwrites `voter`'s ballot.
    pub fn cast_vote(&mut self, voter: PlayerId, target: PlayerId) -> Result<()> {
        self.expect_phase(Phase::Vote, "cast_vote")?;
        vote::validate_ballot(&self.state.players, voter, target)?;
        self.state.votes.insert(voter, target);
        debug!("ballot recorded for voter {}", voter);
        Ok(())
    }

    /// Tallies the ballots, executes the result, and moves on.
    pub fn tally_votes(&mut self) -> Result<VoteReport> {
        self.expect_phase(Phase::Vote, "tally_votes")?;

        let tally = vote::tally(&self.state.players, &self.state.votes, &mut self.rng);
        let executed = tally.executed.filter(|&p| self.state.is_alive(p));
        if let Some(p) = executed {
            self.state.players[p].alive = false;
            info!(
                "day {}: player {} executed{}",
                self.state.day_count,
                p,
                if tally.tie_break { " by tie-break" } else { "" }
            );
        } else {
            info!("day {}: nobody executed", self.state.day_count);
        }
        self.state.last_execution = executed;

        let winner = self.settle_winner();
        resolve::advance_state(&mut self.state, &self.rules);
        Ok(VoteReport {
            tally,
            executed,
            winner,
        })
    }

    fn expect_phase(&self, phase: Phase, operation: &'static str) -> Result<()> {
        if self.state.phase != phase {
            return Err(EngineError::PhaseViolation {
                operation,
                phase: self.state.phase,
            });
        }
        Ok(())
    }

    /// Checks that `turn` is still owed tonight without consuming it.
    fn check_turn(&self, turn: NightTurn) -> Result<()> {
        if self.state.finished_turns.contains(&turn) {
            if turn == NightTurn::Seer && self.state.seer_query.used_this_night {
                return Err(EngineError::SeerAlreadyActed);
            }
            return Err(EngineError::DuplicateNightAction(turn));
        }
        if !self.state.night_turns.contains(&turn) {
            return Err(EngineError::NoEligibleActor(turn));
        }
        Ok(())
    }

    fn actor(&self, turn: NightTurn) -> Result<PlayerId> {
        self.state
            .holder(turn.role())
            .ok_or(EngineError::NoEligibleActor(turn))
    }

    fn finish_turn(&mut self, turn: NightTurn) {
        self.state.night_turns.retain(|t| *t != turn);
        self.state.finished_turns.push(turn);
        debug!("night turn {} done", turn);
    }

    /// Runs the win check after a death-causing step and records the winner.
    fn settle_winner(&mut self) -> Option<Side> {
        let winner = resolve::evaluate(&self.state.players).winner();
        if let Some(side) = winner {
            info!("{} win on day {}", side, self.state.day_count);
        }
        self.state.winner = winner;
        winner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedSource;

    /// Four seats dealt in table order: 0 werewolf, 1 seer, 2 guard, 3 villager.
    fn dealt_four() -> Engine<ScriptedSource> {
        let mut engine =
            Engine::with_source(TableRules::default(), ScriptedSource::identity_shuffle(4));
        engine.new_game(4).unwrap();
        engine
    }

    fn at_first_night() -> Engine<ScriptedSource> {
        let mut engine = dealt_four();
        for id in 0..4 {
            engine.acknowledge_role(id).unwrap();
        }
        engine.advance_role_reveal().unwrap();
        engine
    }

    #[test]
    fn new_engine_is_in_setup() {
        let engine = Engine::new();
        assert_eq!(engine.current_state().phase, Phase::Setup);
        assert!(engine.current_state().players.is_empty());
    }

    #[test]
    fn new_game_rejects_bad_counts_without_change() {
        let mut engine = Engine::new();
        assert_eq!(engine.new_game(3).unwrap_err(), EngineError::InvalidPlayerCount(3));
        assert_eq!(engine.new_game(9).unwrap_err(), EngineError::InvalidPlayerCount(9));
        assert_eq!(engine.current_state(), &GameState::default());
    }

    #[test]
    fn new_game_only_from_setup() {
        let mut engine = dealt_four();
        assert!(matches!(
            engine.new_game(5),
            Err(EngineError::PhaseViolation { operation: "new_game", phase: Phase::RoleReveal })
        ));
        engine.reset();
        assert!(engine.new_game(5).is_ok());
    }

    #[test]
    fn reveal_is_read_only() {
        let engine = dealt_four();
        let before = engine.current_state().clone();
        assert_eq!(engine.reveal_role(0), Ok(RoleKind::Werewolf));
        assert_eq!(engine.reveal_role(3), Ok(RoleKind::Villager));
        assert_eq!(engine.reveal_role(4), Err(EngineError::UnknownPlayer(4)));
        assert_eq!(engine.current_state(), &before);
    }

    #[test]
    fn night_waits_for_every_acknowledgement() {
        let mut engine = dealt_four();
        engine.acknowledge_role(0).unwrap();
        engine.acknowledge_role(0).unwrap();
        assert_eq!(
            engine.advance_role_reveal().unwrap_err(),
            EngineError::AwaitingAcknowledgements(3)
        );
        for id in 1..4 {
            engine.acknowledge_role(id).unwrap();
        }
        assert_eq!(engine.advance_role_reveal().unwrap().phase, Phase::Night);
        assert_eq!(engine.next_night_turn(), Some(NightTurn::Wolves));
    }

    #[test]
    fn second_wolf_submission_is_rejected() {
        let mut engine = at_first_night();
        engine.submit_wolf_target(3).unwrap();
        let before = engine.current_state().clone();
        assert_eq!(
            engine.submit_wolf_target(1),
            Err(EngineError::DuplicateNightAction(NightTurn::Wolves))
        );
        assert_eq!(engine.current_state(), &before);
        assert_eq!(engine.current_state().night_actions.wolf_target, Some(3));
    }

    #[test]
    fn seer_query_is_once_per_night() {
        let mut engine = at_first_night();
        let first = engine.submit_seer_target(0).unwrap();
        assert!(first.is_wolf);
        assert_eq!(engine.submit_seer_target(3), Err(EngineError::SeerAlreadyActed));
        assert_eq!(engine.current_state().seer_query.last_result, Some(first));
        assert_eq!(engine.current_state().night_actions.seer_target, Some(0));
    }

    #[test]
    fn rejected_target_keeps_the_turn_open() {
        let mut engine = at_first_night();
        assert!(matches!(
            engine.submit_wolf_target(0),
            Err(EngineError::InvalidTarget { .. })
        ));
        assert_eq!(engine.next_night_turn(), Some(NightTurn::Wolves));
        assert!(engine.submit_wolf_target(1).is_ok());
    }

    #[test]
    fn skipped_turn_cannot_act_later() {
        let mut engine = at_first_night();
        engine.skip_night_turn(NightTurn::Seer).unwrap();
        assert_eq!(
            engine.submit_seer_target(0),
            Err(EngineError::DuplicateNightAction(NightTurn::Seer))
        );
    }

    #[test]
    fn resolve_waits_for_pending_turns() {
        let mut engine = at_first_night();
        engine.submit_wolf_target(3).unwrap();
        assert_eq!(engine.resolve_night(), Err(EngineError::PendingNightTurns(2)));
        engine.skip_night_turn(NightTurn::Seer).unwrap();
        engine.skip_night_turn(NightTurn::Guard).unwrap();
        let report = engine.resolve_night().unwrap();
        assert_eq!(report.outcome, NightOutcome::Killed(3));
        assert_eq!(report.winner, None);
        assert_eq!(engine.current_state().phase, Phase::Day);
    }

    #[test]
    fn medium_has_no_turn_at_a_four_player_table() {
        let mut engine = at_first_night();
        assert_eq!(
            engine.submit_medium_reading(),
            Err(EngineError::NoEligibleActor(NightTurn::Medium))
        );
    }

    #[test]
    fn votes_only_during_vote_phase() {
        let mut engine = at_first_night();
        assert!(matches!(
            engine.cast_vote(1, 0),
            Err(EngineError::PhaseViolation { phase: Phase::Night, .. })
        ));
        assert!(matches!(
            engine.tally_votes(),
            Err(EngineError::PhaseViolation { .. })
        ));
    }

    #[test]
    fn options_are_locked_after_dealing() {
        let mut engine = Engine::new();
        engine.set_option("SelfGuard", Some("false")).unwrap();
        assert!(!engine.rules().allow_self_guard);
        engine.new_game(4).unwrap();
        assert!(matches!(
            engine.set_option("SelfGuard", Some("true")),
            Err(EngineError::PhaseViolation { .. })
        ));
    }

    #[test]
    fn fixed_seed_deals_the_same_table() {
        let rules = TableRules {
            seed: Some(2024),
            ..TableRules::default()
        };
        let mut a = Engine::with_rules(rules.clone());
        let mut b = Engine::with_rules(rules);
        let roles_a: Vec<RoleKind> = a.new_game(8).unwrap().players.iter().map(|p| p.role).collect();
        let roles_b: Vec<RoleKind> = b.new_game(8).unwrap().players.iter().map(|p| p.role).collect();
        assert_eq!(roles_a, roles_b);
    }
}
