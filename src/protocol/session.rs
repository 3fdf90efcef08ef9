//! Protocol session.
//!
//! Dispatches parsed commands to an `Engine` and writes one reply line per
//! result. Engine errors become `error <message>` lines; the session itself
//! never stops on a rejected command.

use std::io::{self, Write};

use rand::rngs::SmallRng;
use serde::Serialize;

use crate::engine::{Engine, NightReport, VoteReport};
use crate::error::EngineError;
use crate::game::{GameState, NightTurn, Phase, Side};
use crate::random::RandomSource;
use crate::rules::TableRules;

use super::parser::Command;

/// Whether the read loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One engine plus the protocol framing around it.
pub struct Session<R: RandomSource = SmallRng> {
    engine: Engine<R>,
}

impl Session<SmallRng> {
    pub fn new(rules: TableRules) -> Self {
        Session {
            engine: Engine::with_rules(rules),
        }
    }
}

impl<R: RandomSource> Session<R> {
    /// Wraps an existing engine.
    pub fn with_engine(engine: Engine<R>) -> Self {
        Session { engine }
    }

    pub fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    /// Executes one command, writing its reply lines to `out`.
    pub fn handle<W: Write>(&mut self, cmd: Command, out: &mut W) -> io::Result<Flow> {
        if cmd == Command::Quit {
            return Ok(Flow::Quit);
        }
        match self.respond(cmd) {
            Ok(lines) => {
                for line in lines {
                    writeln!(out, "{}", line)?;
                }
            }
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()?;
        Ok(Flow::Continue)
    }

    /// Runs one command against the engine and returns the reply lines.
    fn respond(&mut self, cmd: Command) -> Result<Vec<String>, EngineError> {
        let engine = &mut self.engine;
        let lines = match cmd {
            Command::Quit => Vec::new(),
            Command::IsReady => vec!["readyok".to_string()],
            Command::SetOption { name, value } => {
                engine.set_option(&name, value.as_deref())?;
                Vec::new()
            }
            Command::NewGame { players } => vec![phase_line(engine.new_game(players)?.phase)],
            Command::Reveal { player } => {
                vec![format!("role {} {}", player, engine.reveal_role(player)?)]
            }
            Command::Acknowledge { player } => {
                engine.acknowledge_role(player)?;
                ok()
            }
            Command::Begin => {
                let phase = engine.advance_role_reveal()?.phase;
                vec![phase_line(phase), turn_line(engine.next_night_turn())]
            }
            Command::Turn => vec![turn_line(engine.next_night_turn())],
            Command::Wolf { target } => {
                engine.submit_wolf_target(target)?;
                ok()
            }
            Command::Seer { target } => {
                let r = engine.submit_seer_target(target)?;
                vec![format!("seer {} {}", r.target, alignment(r.is_wolf))]
            }
            Command::Guard { target } => {
                engine.submit_guard_target(target)?;
                ok()
            }
            Command::Medium => {
                let r = engine.submit_medium_reading()?;
                vec![format!("medium {} {}", r.executed, alignment(r.is_wolf))]
            }
            Command::Skip { turn } => {
                engine.skip_night_turn(turn)?;
                ok()
            }
            Command::Resolve => {
                let report = engine.resolve_night()?;
                night_lines(&report, engine.current_state())
            }
            Command::CloseDay => {
                engine.close_discussion()?;
                vec![phase_line(Phase::Vote)]
            }
            Command::Vote { voter, target } => {
                engine.cast_vote(voter, target)?;
                ok()
            }
            Command::Tally => {
                let report = engine.tally_votes()?;
                tally_lines(&report, engine.current_state())
            }
            Command::State => vec![json_line("state", engine.current_state())],
            Command::View => vec![json_line("view", &engine.public_view())],
            Command::Reset => {
                engine.reset();
                vec![phase_line(Phase::Setup)]
            }
        };
        Ok(lines)
    }
}

fn ok() -> Vec<String> {
    vec!["ok".to_string()]
}

fn alignment(is_wolf: bool) -> &'static str {
    if is_wolf {
        "wolf"
    } else {
        "human"
    }
}

fn phase_line(phase: Phase) -> String {
    format!("phase {}", phase)
}

fn turn_line(turn: Option<NightTurn>) -> String {
    match turn {
        Some(t) => format!("turn {}", t),
        None => "turn none".to_string(),
    }
}

fn winner_line(winner: Option<Side>) -> Option<String> {
    winner.map(|side| format!("winner {}", side))
}

fn night_lines(report: &NightReport, state: &GameState) -> Vec<String> {
    let mut lines = vec![format!("night {}", report.summary)];
    lines.extend(winner_line(report.winner));
    lines.push(phase_line(state.phase));
    lines
}

fn tally_lines(report: &VoteReport, state: &GameState) -> Vec<String> {
    let mut lines = vec![match report.executed {
        Some(p) if report.tally.tie_break => format!("executed {} tiebreak", p),
        Some(p) => format!("executed {}", p),
        None => "executed none".to_string(),
    }];
    lines.extend(winner_line(report.winner));
    lines.push(phase_line(state.phase));
    if state.phase == Phase::Night {
        lines.push(turn_line(state.next_night_turn()));
    }
    lines
}

fn json_line<T: Serialize>(tag: &str, value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => format!("{} {}", tag, json),
        Err(e) => format!("error failed to encode {}: {}", tag, e),
    }
}
