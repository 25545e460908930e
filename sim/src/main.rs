//! Runs one headless futevôlei match and prints the result.
//!
//! Usage: cargo run --bin futevolei-sim -- [CONFIG] [OPTIONS]
//!
//! Options:
//!   --seed N      Override the config's RNG seed
//!   --idle        Leave the human player standing still (default: autopilot)
//!   --events      Print every game event to stdout as a JSON line
//!   --realtime    Pace the match by the wall clock instead of running flat out

use futevolei_sim::config::FileConfig;
use futevolei_sim::game_loop::{run_match, run_realtime};
use futevolei_sim::input::{Autopilot, IdleInput, InputProvider};
use futevolei_sim::notify::{JsonLinesNotifier, Notifier, TracingNotifier};
use futevolei_sim::state::MatchState;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<PathBuf> = None;
    let mut seed: Option<u64> = None;
    let mut idle = false;
    let mut print_events = false;
    let mut realtime = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|s| s.parse().ok());
            }
            "--idle" => idle = true,
            "--events" => print_events = true,
            "--realtime" => realtime = true,
            other if !other.starts_with("--") => config_path = Some(PathBuf::from(other)),
            other => eprintln!("Ignoring unknown option {}", other),
        }
        i += 1;
    }

    let mut config = match &config_path {
        Some(path) => match FileConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Invalid configuration: {}", e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };
    if let Some(seed) = seed {
        config.sim.rng_seed = seed;
    }

    // Validate configuration before starting
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let max_seconds = config.sim.max_match_seconds;
    let seed = config.sim.rng_seed;
    let mut state = MatchState::new(config.game, config.sim);

    let mut input: Box<dyn InputProvider> = if idle {
        Box::new(IdleInput)
    } else {
        Box::new(Autopilot::new(seed.wrapping_add(1)))
    };
    let mut notifier: Box<dyn Notifier> = if print_events {
        Box::new(JsonLinesNotifier::new(std::io::stdout().lock()))
    } else {
        Box::new(TracingNotifier)
    };

    tracing::info!("Starting match with seed {}", seed);
    let summary = if realtime {
        run_realtime(&mut state, input.as_mut(), Some(notifier.as_mut()), max_seconds)
    } else {
        run_match(&mut state, input.as_mut(), Some(notifier.as_mut()), max_seconds)
    };

    if print_events {
        return;
    }

    println!("=== Match Result ===");
    match summary.winner {
        Some(team) => println!("Winner: {}", team.label()),
        None => println!("Winner: none (time limit)"),
    }
    println!("Score: {} - {}", summary.player_score, summary.opponent_score);
    println!("Duration: {:.1}s ({} ticks)", summary.seconds, summary.ticks);
    println!("Points on landing: {}", summary.points_landed);
    println!("Double touches: {}", summary.double_touches);
    println!("Too many touches: {}", summary.too_many_touches);
    println!("Replays: {}", summary.replays);
}
