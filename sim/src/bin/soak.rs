//! Soak test for the match simulation.
//!
//! Plays many seeded headless matches back to back with the autopilot on the
//! human side and reports how they ended:
//! - how many finished vs. hit the time limit
//! - score spread and win counts per team
//! - how points were decided (landings, faults, replays)
//!
//! Usage: cargo run --release --bin soak -- [OPTIONS]
//!
//! Options:
//!   --matches N       Number of matches to play (default: 50)
//!   --max-seconds S   Simulated time limit per match (default: 900)
//!   --seed N          Seed of the first match; match k uses seed + k (default: 1)

use futevolei_shared::config::GameConfig;
use futevolei_shared::protocol::Team;
use futevolei_sim::config::SimConfig;
use futevolei_sim::game_loop::{run_match, MatchSummary};
use futevolei_sim::input::Autopilot;
use futevolei_sim::state::MatchState;
use std::time::Instant;

#[derive(Default)]
struct Totals {
    matches: u32,
    finished: u32,
    player_wins: u32,
    opponent_wins: u32,
    points: u32,
    landed: u32,
    double_touches: u32,
    too_many_touches: u32,
    replays: u32,
    ticks: u64,
    simulated_seconds: f64,
    longest_seconds: f64,
}

impl Totals {
    fn add(&mut self, summary: &MatchSummary) {
        self.matches += 1;
        match summary.winner {
            Some(Team::Player) => self.player_wins += 1,
            Some(Team::Opponent) => self.opponent_wins += 1,
            None => {}
        }
        if summary.winner.is_some() {
            self.finished += 1;
        }
        self.points += summary.player_score + summary.opponent_score;
        self.landed += summary.points_landed;
        self.double_touches += summary.double_touches;
        self.too_many_touches += summary.too_many_touches;
        self.replays += summary.replays;
        self.ticks += summary.ticks;
        self.simulated_seconds += summary.seconds;
        self.longest_seconds = self.longest_seconds.max(summary.seconds);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut num_matches: u32 = 50;
    let mut max_seconds: f64 = 900.0;
    let mut base_seed: u64 = 1;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--matches" => {
                i += 1;
                num_matches = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(50);
            }
            "--max-seconds" => {
                i += 1;
                max_seconds = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(900.0);
            }
            "--seed" => {
                i += 1;
                base_seed = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(1);
            }
            _ => {}
        }
        i += 1;
    }

    println!("=== Futevolei Soak Test ===");
    println!("Matches: {}", num_matches);
    println!("Time limit: {}s per match", max_seconds);
    println!("Seeds: {}..{}", base_seed, base_seed + num_matches as u64);
    println!();

    let wall_start = Instant::now();
    let mut totals = Totals::default();

    for k in 0..num_matches {
        let seed = base_seed + k as u64;
        let sim = SimConfig {
            rng_seed: seed,
            max_match_seconds: max_seconds,
            ..Default::default()
        };
        let mut state = MatchState::new(GameConfig::default(), sim);
        let mut pilot = Autopilot::new(seed.wrapping_mul(31).wrapping_add(7));
        let summary = run_match(&mut state, &mut pilot, None, max_seconds);

        println!(
            "[seed {:4}] {:>2} - {:<2} winner={:<8} {:6.1}s faults={} replays={}",
            seed,
            summary.player_score,
            summary.opponent_score,
            summary.winner.map(Team::label).unwrap_or("none"),
            summary.seconds,
            summary.double_touches + summary.too_many_touches,
            summary.replays
        );
        totals.add(&summary);
    }

    let wall = wall_start.elapsed();

    println!();
    println!("=== Final Results ===");
    println!("Finished matches: {}/{}", totals.finished, totals.matches);
    println!("Player wins: {}", totals.player_wins);
    println!("Opponent wins: {}", totals.opponent_wins);
    println!("Total points: {}", totals.points);
    println!("  on landing: {}", totals.landed);
    println!("  double touches: {}", totals.double_touches);
    println!("  too many touches: {}", totals.too_many_touches);
    println!("Replays: {}", totals.replays);

    if totals.matches > 0 {
        println!(
            "Average match length: {:.1}s (longest {:.1}s)",
            totals.simulated_seconds / totals.matches as f64,
            totals.longest_seconds
        );
    }

    let secs = wall.as_secs_f64();
    println!();
    println!("Wall time: {:?}", wall);
    if secs > 0.0 {
        println!("Ticks/sec: {:.0}", totals.ticks as f64 / secs);
        println!("Speed-up over real time: {:.0}x", totals.simulated_seconds / secs);
    }
}
