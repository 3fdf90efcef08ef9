//! lycan -- a single-device Werewolf rules engine.
//!
//! This binary reads commands from stdin and writes replies to stdout, one
//! line each, so a presentation shell can drive a game. Logs go to stderr.

use std::io::{self, BufRead};
use std::path::Path;

use log::error;

use lycan::protocol::{parse_command, Flow, Session};
use lycan::rules::TableRules;

/// Runs the main protocol loop, reading commands from stdin
/// and writing responses to stdout.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    let rules = match std::env::var("LYCAN_RULES") {
        Ok(path) => match TableRules::load(Path::new(&path)) {
            Ok(rules) => rules,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        Err(_) => TableRules::default(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut session = Session::new(rules);

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match session.handle(cmd, &mut out) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => {
                error!("failed to write reply: {}", e);
                break;
            }
        }
    }
}
