//! Command parser.
//!
//! Parses incoming protocol lines from raw text into structured `Command`
//! variants that the session can dispatch on.

use log::warn;

use crate::game::{NightTurn, PlayerId};

/// A parsed shell-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set a table rule: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Deal roles for a new game: `newgame <n>`.
    NewGame { players: usize },

    /// Show one player's role: `reveal <id>`.
    Reveal { player: PlayerId },

    /// Mark one player's role as seen: `ack <id>`.
    Acknowledge { player: PlayerId },

    /// Leave role reveal and start the first night.
    Begin,

    /// Ask whose night turn is next.
    Turn,

    /// Wolves attack: `wolf <id>`.
    Wolf { target: PlayerId },

    /// Seer query: `seer <id>`.
    Seer { target: PlayerId },

    /// Guard protection: `guard <id>`.
    Guard { target: PlayerId },

    /// Medium reading of the previous execution.
    Medium,

    /// Decline a night turn: `skip <role>`.
    Skip { turn: NightTurn },

    /// Resolve the night.
    Resolve,

    /// Close the day's discussion and open the vote.
    CloseDay,

    /// Cast a ballot: `vote <voter> <target>`.
    Vote { voter: PlayerId, target: PlayerId },

    /// Tally the ballots.
    Tally,

    /// Dump the full state as JSON.
    State,

    /// Dump the public view as JSON.
    View,

    /// Abandon the game and return to setup.
    Reset,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();

    match tokens[0] {
        "isready" => Some(Command::IsReady),
        "begin" => Some(Command::Begin),
        "turn" => Some(Command::Turn),
        "medium" => Some(Command::Medium),
        "resolve" => Some(Command::Resolve),
        "closeday" | "discuss" => Some(Command::CloseDay),
        "tally" => Some(Command::Tally),
        "state" => Some(Command::State),
        "view" => Some(Command::View),
        "reset" => Some(Command::Reset),
        "quit" => Some(Command::Quit),

        "setoption" => parse_setoption(&tokens),
        "newgame" => parse_id(&tokens, "newgame <players>").map(|players| Command::NewGame { players }),
        "reveal" => parse_id(&tokens, "reveal <id>").map(|player| Command::Reveal { player }),
        "ack" => parse_id(&tokens, "ack <id>").map(|player| Command::Acknowledge { player }),
        "wolf" => parse_id(&tokens, "wolf <id>").map(|target| Command::Wolf { target }),
        "seer" => parse_id(&tokens, "seer <id>").map(|target| Command::Seer { target }),
        "guard" => parse_id(&tokens, "guard <id>").map(|target| Command::Guard { target }),
        "skip" => parse_skip(&tokens),
        "vote" => parse_vote(&tokens),

        other => {
            warn!("unknown command: {}", other);
            None
        }
    }
}

/// Parses the single numeric argument of `<cmd> <n>`.
fn parse_id(tokens: &[&str], usage: &str) -> Option<usize> {
    if tokens.len() != 2 {
        warn!("malformed {}: expected '{}'", tokens[0], usage);
        return None;
    }
    match tokens[1].parse::<usize>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("invalid {} argument: '{}'", tokens[0], tokens[1]);
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let value_idx = tokens.iter().position(|&t| t == "value");

    let (name, value) = match value_idx {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            let value_parts = &tokens[vi + 1..];
            if name_parts.is_empty() {
                warn!("malformed setoption: empty name");
                return None;
            }
            let value = if value_parts.is_empty() {
                None
            } else {
                Some(value_parts.join(" "))
            };
            (name_parts.join(" "), value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Some(Command::SetOption { name, value })
}

/// Parses `skip <role>`.
fn parse_skip(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 2 {
        warn!("malformed skip: expected 'skip <wolves|seer|guard|medium>'");
        return None;
    }
    match NightTurn::from_name(tokens[1]) {
        Some(turn) => Some(Command::Skip { turn }),
        None => {
            warn!("unknown night turn: '{}'", tokens[1]);
            None
        }
    }
}

/// Parses `vote <voter> <target>`.
fn parse_vote(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 3 {
        warn!("malformed vote: expected 'vote <voter> <target>'");
        return None;
    }
    match (tokens[1].parse::<usize>(), tokens[2].parse::<usize>()) {
        (Ok(voter), Ok(target)) => Some(Command::Vote { voter, target }),
        _ => {
            warn!("invalid vote arguments: '{} {}'", tokens[1], tokens[2]);
            None
        }
    }
}
