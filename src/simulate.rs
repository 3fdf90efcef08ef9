//! Batch game simulation.
//!
//! Plays complete games with random-policy participants: wolves attack a
//! random villager-side player, the seer and guard pick random targets, and
//! each living voter either abstains or votes for a random other player.
//! Records one `GameRecord` per game for balance statistics.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::engine::Engine;
use crate::error::Result;
use crate::game::{GameState, NightOutcome, NightTurn, PlayerId, RoleKind, SeerResult, Side};
use crate::random::RandomSource;
use crate::rules::TableRules;

/// Configuration for a simulation batch.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Seats per game (4 to 8).
    pub players: usize,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Base random seed (0 = use entropy). Game `i` uses `seed + i`.
    pub seed: u64,
    /// Probability that a living voter casts no ballot.
    pub abstain_rate: f64,
    /// Day after which an unfinished game is abandoned.
    pub max_days: u32,
    /// Table rules every game is played under.
    pub rules: TableRules,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            num_games: 100,
            players: 6,
            threads: 4,
            seed: 0,
            abstain_rate: 0.1,
            max_days: 20,
            rules: TableRules::default(),
        }
    }
}

/// What happened on one day: the night that opened it and the vote that closed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRecord {
    pub day: u32,
    pub night: NightOutcome,
    pub seer: Option<SeerResult>,
    /// `None` when nobody was executed: the vote put no one on the block,
    /// or the game ended at dawn before any vote was held.
    pub executed: Option<PlayerId>,
    pub tie_break: bool,
}

/// A complete simulated game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    /// Sequential game ID.
    pub game_id: usize,
    /// Seed the game's engine was dealt with.
    pub seed: u64,
    pub player_count: usize,
    /// Roles by seat.
    pub roles: Vec<RoleKind>,
    pub days: Vec<DayRecord>,
    /// `None` if the game hit `max_days`.
    pub winner: Option<Side>,
    pub final_day: u32,
}

/// Aggregate results over a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub games: usize,
    pub villager_wins: usize,
    pub wolf_wins: usize,
    pub unfinished: usize,
    pub total_days: u64,
}

impl Summary {
    pub fn of(games: &[GameRecord]) -> Self {
        let mut summary = Summary {
            games: games.len(),
            ..Default::default()
        };
        for game in games {
            match game.winner {
                Some(Side::Villagers) => summary.villager_wins += 1,
                Some(Side::Werewolves) => summary.wolf_wins += 1,
                None => summary.unfinished += 1,
            }
            summary.total_days += u64::from(game.final_day);
        }
        summary
    }

    pub fn average_days(&self) -> f64 {
        self.total_days as f64 / self.games.max(1) as f64
    }

    /// Share of games won by `side`, in percent.
    pub fn win_rate(&self, side: Side) -> f64 {
        let wins = match side {
            Side::Villagers => self.villager_wins,
            Side::Werewolves => self.wolf_wins,
        };
        100.0 * wins as f64 / self.games.max(1) as f64
    }
}

/// Picks a uniformly random element, or `None` for an empty slice.
fn pick(candidates: &[PlayerId], rng: &mut SmallRng) -> Option<PlayerId> {
    if candidates.is_empty() {
        None
    } else {
        Some(candidates[rng.below(candidates.len())])
    }
}

fn living_except(state: &GameState, excluded: Option<PlayerId>) -> Vec<PlayerId> {
    state
        .living()
        .into_iter()
        .filter(|&p| Some(p) != excluded)
        .collect()
}

/// Plays one night turn for its holder. Returns the seer's result, if this was the seer.
fn play_turn<R: RandomSource>(
    engine: &mut Engine<R>,
    turn: NightTurn,
    rng: &mut SmallRng,
) -> Result<Option<SeerResult>> {
    let state = engine.current_state();
    let actor = state.holder(turn.role());
    match turn {
        NightTurn::Wolves => {
            let prey: Vec<PlayerId> = state
                .players
                .iter()
                .filter(|p| p.alive && !p.role.is_werewolf())
                .map(|p| p.id)
                .collect();
            match pick(&prey, rng) {
                Some(target) => engine.submit_wolf_target(target)?,
                None => engine.skip_night_turn(turn)?,
            }
        }
        NightTurn::Seer => {
            let candidates = living_except(state, actor);
            if let Some(target) = pick(&candidates, rng) {
                return Ok(Some(engine.submit_seer_target(target)?));
            }
            engine.skip_night_turn(turn)?;
        }
        NightTurn::Guard => {
            let excluded = if engine.rules().allow_self_guard {
                None
            } else {
                actor
            };
            let candidates = living_except(state, excluded);
            match pick(&candidates, rng) {
                Some(target) => engine.submit_guard_target(target)?,
                None => engine.skip_night_turn(turn)?,
            }
        }
        NightTurn::Medium => {
            engine.submit_medium_reading()?;
        }
    }
    Ok(None)
}

/// Plays a single game to completion (or `max_days`) and returns its record.
pub fn play_game(config: &SimulationConfig, game_id: usize, seed: u64) -> Result<GameRecord> {
    let mut rules = config.rules.clone();
    rules.seed = Some(seed);
    let mut engine = Engine::with_source(rules, SmallRng::seed_from_u64(seed));
    let mut rng = SmallRng::seed_from_u64(seed.rotate_left(32) ^ 0x5eed);

    engine.new_game(config.players)?;
    let roles: Vec<RoleKind> = engine
        .current_state()
        .players
        .iter()
        .map(|p| p.role)
        .collect();
    for id in 0..config.players {
        engine.acknowledge_role(id)?;
    }
    engine.advance_role_reveal()?;

    let mut days = Vec::new();
    while !engine.current_state().is_over() && engine.current_state().day_count <= config.max_days
    {
        let day = engine.current_state().day_count;

        let mut seer = None;
        while let Some(turn) = engine.next_night_turn() {
            if let Some(result) = play_turn(&mut engine, turn, &mut rng)? {
                seer = Some(result);
            }
        }
        let night = engine.resolve_night()?;
        let mut record = DayRecord {
            day,
            night: night.outcome,
            seer,
            executed: None,
            tie_break: false,
        };
        if night.winner.is_some() {
            days.push(record);
            break;
        }

        engine.close_discussion()?;
        for voter in engine.living_players() {
            if rng.gen::<f64>() < config.abstain_rate {
                continue;
            }
            let candidates = living_except(engine.current_state(), Some(voter));
            if let Some(target) = pick(&candidates, &mut rng) {
                engine.cast_vote(voter, target)?;
            }
        }
        let report = engine.tally_votes()?;
        record.executed = report.executed;
        record.tie_break = report.tally.tie_break;
        days.push(record);
    }

    let state = engine.current_state();
    Ok(GameRecord {
        game_id,
        seed,
        player_count: config.players,
        roles,
        days,
        winner: state.winner,
        final_day: state.day_count,
    })
}

/// Runs the batch, producing every completed game record.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_simulation(config: &SimulationConfig) -> Vec<GameRecord> {
    let mut games = Vec::with_capacity(config.num_games);
    run_simulation_with_callback(config, |game| games.push(game));
    games.sort_by_key(|g| g.game_id);
    games
}

/// Runs the batch, calling `on_game` with each completed game record.
///
/// Games that fail are logged and skipped. In parallel mode games arrive in
/// completion order.
pub fn run_simulation_with_callback<F>(config: &SimulationConfig, on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    let base = if config.seed != 0 {
        config.seed
    } else {
        rand::random()
    };

    if config.threads > 1 {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()
        {
            Ok(pool) => return run_parallel(config, base, &pool, on_game),
            Err(e) => warn!("failed to build thread pool, running sequentially: {}", e),
        }
    }
    run_sequential(config, base, on_game);
}

fn game_seed(base: u64, game_id: usize) -> u64 {
    base.wrapping_add(game_id as u64)
}

fn finish(game_id: usize, result: Result<GameRecord>) -> Option<GameRecord> {
    match result {
        Ok(game) => {
            debug!(
                "game {}: {} after {} days",
                game_id,
                game.winner.map_or("unfinished", Side::name),
                game.final_day
            );
            Some(game)
        }
        Err(e) => {
            warn!("game {} aborted: {}", game_id, e);
            None
        }
    }
}

fn run_sequential<F>(config: &SimulationConfig, base: u64, mut on_game: F)
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        if let Some(game) = finish(i, play_game(config, i, game_seed(base, i))) {
            on_game(game);
        }
    }
}

/// Plays games on `pool` and delivers them to `on_game` on the calling thread.
fn run_parallel<F>(config: &SimulationConfig, base: u64, pool: &rayon::ThreadPool, mut on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<GameRecord>();

    std::thread::scope(|s| {
        let completed = &completed;
        s.spawn(move || {
            pool.install(|| {
                (0..config.num_games)
                    .into_par_iter()
                    .for_each_with(tx, |tx, i| {
                        let result = play_game(config, i, game_seed(base, i));
                        completed.fetch_add(1, Ordering::Relaxed);
                        if let Some(game) = finish(i, result) {
                            let _ = tx.send(game);
                        }
                    });
            });
        });

        for game in rx {
            on_game(game);
        }
    });

    debug!(
        "{} of {} games finished",
        completed.load(Ordering::Relaxed),
        config.num_games
    );
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Prints a summary of simulation results to stderr.
pub fn print_summary(games: &[GameRecord]) {
    let summary = Summary::of(games);
    eprintln!("=== Simulation Summary ===");
    eprintln!("Games: {}", summary.games);
    eprintln!("Avg days/game: {:.1}", summary.average_days());
    eprintln!("Unfinished: {}", summary.unfinished);
    eprintln!("Win distribution:");
    for side in [Side::Villagers, Side::Werewolves] {
        let wins = match side {
            Side::Villagers => summary.villager_wins,
            Side::Werewolves => summary.wolf_wins,
        };
        eprintln!("  {:>10}: {} ({:.1}%)", side.name(), wins, summary.win_rate(side));
    }
}
