//! Batch simulation CLI.
//!
//! Plays Werewolf games with random-policy players and outputs one JSON
//! record per game.
//!
//! Usage:
//!   cargo run --release --bin simulate -- [OPTIONS]
//!
//! Options:
//!   --games N         Number of games to play (default: 100)
//!   --players N       Seats per game, 4-8 (default: 6)
//!   --max-days N      Abandon games still running after this day (default: 20)
//!   --abstain P       Probability a voter abstains (default: 0.1)
//!   --threads N       Number of parallel threads (default: 4)
//!   --seed N          Random seed, 0 for entropy (default: 0)
//!   --rules FILE      Load table rules from a JSON file
//!   --no-self-guard   Forbid the guard from protecting itself
//!   --no-medium       Disable the medium's night reading
//!   --output FILE     Output file path (default: stdout)
//!   --quiet           Suppress summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::process;
use std::str::FromStr;
use std::time::Instant;

use log::error;

use lycan::rules::TableRules;
use lycan::simulate::{self, SimulationConfig};

/// Parses the value following `args[i]`, exiting with usage on failure.
fn value<T: FromStr>(args: &[String], i: usize) -> T {
    match args.get(i + 1).map(|s| s.parse::<T>()) {
        Some(Ok(v)) => v,
        _ => {
            eprintln!("invalid {} value", args[i]);
            print_usage();
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().collect();
    let mut config = SimulationConfig::default();
    let mut output_path: Option<String> = None;
    let mut quiet = false;
    let mut no_self_guard = false;
    let mut no_medium = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                config.num_games = value(&args, i);
                i += 1;
            }
            "--players" => {
                config.players = value(&args, i);
                i += 1;
            }
            "--max-days" => {
                config.max_days = value(&args, i);
                i += 1;
            }
            "--abstain" => {
                config.abstain_rate = value::<f64>(&args, i).clamp(0.0, 1.0);
                i += 1;
            }
            "--threads" => {
                config.threads = value(&args, i);
                i += 1;
            }
            "--seed" => {
                config.seed = value(&args, i);
                i += 1;
            }
            "--rules" => {
                let path: String = value(&args, i);
                config.rules = match TableRules::load(Path::new(&path)) {
                    Ok(rules) => rules,
                    Err(e) => {
                        error!("{}", e);
                        process::exit(1);
                    }
                };
                i += 1;
            }
            "--output" => {
                output_path = Some(value(&args, i));
                i += 1;
            }
            "--no-self-guard" => no_self_guard = true,
            "--no-medium" => no_medium = true,
            "--quiet" => quiet = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    if no_self_guard {
        config.rules.allow_self_guard = false;
    }
    if no_medium {
        config.rules.medium_reveal = false;
    }

    if !quiet {
        eprintln!(
            "Simulation: {} games, {} players, max day {}, abstain {:.2}, {} threads",
            config.num_games, config.players, config.max_days, config.abstain_rate, config.threads
        );
    }

    let start = Instant::now();
    let games = simulate::run_simulation(&config);
    let elapsed = start.elapsed();

    if !quiet {
        eprintln!(
            "Completed {} games in {:.2}s",
            games.len(),
            elapsed.as_secs_f64()
        );
        simulate::print_summary(&games);
    }

    let written = match &output_path {
        Some(path) => File::create(path)
            .and_then(|file| simulate::write_jsonl(&games, &mut BufWriter::new(file))),
        None => {
            let stdout = io::stdout();
            simulate::write_jsonl(&games, &mut BufWriter::new(stdout.lock()))
        }
    };
    match (written, output_path) {
        (Err(e), _) => {
            error!("failed to write output: {}", e);
            process::exit(1);
        }
        (Ok(()), Some(path)) if !quiet => eprintln!("Wrote {} games to {}", games.len(), path),
        _ => {}
    }
}

fn print_usage() {
    eprintln!("Usage: simulate [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N         Number of games to play (default: 100)");
    eprintln!("  --players N       Seats per game, 4-8 (default: 6)");
    eprintln!("  --max-days N      Abandon games still running after this day (default: 20)");
    eprintln!("  --abstain P       Probability a voter abstains (default: 0.1)");
    eprintln!("  --threads N       Number of parallel threads (default: 4)");
    eprintln!("  --seed N          Random seed, 0 for entropy (default: 0)");
    eprintln!("  --rules FILE      Load table rules from a JSON file");
    eprintln!("  --no-self-guard   Forbid the guard from protecting itself");
    eprintln!("  --no-medium       Disable the medium's night reading");
    eprintln!("  --output FILE     Output file path (default: stdout)");
    eprintln!("  --quiet           Suppress summary output");
    eprintln!("  --help            Show this help");
}
