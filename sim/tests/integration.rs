//! Integration tests for the match simulation.
//!
//! These tests drive whole matches through the public API the binaries use
//! and check end-to-end behavior.

use futevolei_shared::config::GameConfig;
use futevolei_shared::protocol::{
    GameEvent, MatchOverMsg, MessageMsg, ScoreMsg, ServeStartedMsg, Team,
};
use futevolei_sim::config::{ConfigError, FileConfig, ServeRule, SimConfig};
use futevolei_sim::game_loop::run_match;
use futevolei_sim::input::{Autopilot, IdleInput, InputProvider};
use futevolei_sim::notify::{JsonLinesNotifier, Notifier};
use futevolei_sim::state::{MatchPhase, MatchState};
use std::io::Write;

const DT: f64 = 1.0 / 60.0;

/// Collects every event it is handed, in order.
#[derive(Default)]
struct EventLog {
    events: Vec<GameEvent>,
}

impl Notifier for EventLog {
    fn score(&mut self, msg: &ScoreMsg) {
        self.events.push(GameEvent::Score(msg.clone()));
    }

    fn message(&mut self, msg: &MessageMsg) {
        self.events.push(GameEvent::Message(msg.clone()));
    }

    fn serve_started(&mut self, msg: &ServeStartedMsg) {
        self.events.push(GameEvent::ServeStarted(msg.clone()));
    }

    fn match_over(&mut self, msg: &MatchOverMsg) {
        self.events.push(GameEvent::MatchOver(msg.clone()));
    }
}

fn short_match(points_to_win: u32, seed: u64) -> MatchState {
    let game = GameConfig {
        points_to_win,
        ..Default::default()
    };
    let sim = SimConfig {
        rng_seed: seed,
        ..Default::default()
    };
    MatchState::new(game, sim)
}

#[test]
fn autopilot_match_plays_to_a_winner() {
    let mut state = short_match(3, 11);
    let mut pilot = Autopilot::new(12);
    let summary = run_match(&mut state, &mut pilot, None, 900.0);

    let winner = summary.winner.expect("match should finish inside the limit");
    assert_eq!(state.phase(), MatchPhase::Over);
    let (won, lost) = match winner {
        Team::Player => (summary.player_score, summary.opponent_score),
        Team::Opponent => (summary.opponent_score, summary.player_score),
    };
    assert_eq!(won, 3);
    assert!(lost < 3);
    assert!(summary.points_landed > 0, "every point was a fault: {:?}", summary);
    assert_eq!(
        summary.player_score + summary.opponent_score,
        summary.points_landed + summary.double_touches + summary.too_many_touches
    );
}

#[test]
fn rallies_end_on_landings_not_faults() {
    let mut landed = 0;
    let mut double_touches = 0;
    for seed in 1..=3 {
        let mut state = short_match(5, seed);
        let summary = run_match(&mut state, &mut IdleInput, None, 900.0);
        landed += summary.points_landed;
        double_touches += summary.double_touches;
    }
    assert!(
        landed > double_touches,
        "{} points on landing, {} double touches",
        landed,
        double_touches
    );
}

#[test]
fn same_seed_same_match() {
    let run = |seed: u64| {
        let mut state = short_match(4, seed);
        let mut pilot = Autopilot::new(seed + 100);
        let mut log = EventLog::default();
        let summary = run_match(&mut state, &mut pilot, Some(&mut log), 600.0);
        (summary, log.events)
    };

    let (first, first_events) = run(5);
    let (second, second_events) = run(5);
    assert_eq!(first, second);
    assert_eq!(first_events, second_events);
}

#[test]
fn first_serve_launches_exactly_once_toward_opponent() {
    let mut state = short_match(12, 3);
    let events = state.start_match();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::ServeStarted(s) if s.serving_team == Team::Player
    )));

    let mut launches = 0;
    let mut launch_velocity = None;
    let mut was_serving = state.serve().is_currently_serving();
    for _ in 0..200 {
        state.tick(DT, &Default::default());
        let serving = state.serve().is_currently_serving();
        if was_serving && !serving {
            launches += 1;
            launch_velocity = Some(state.ball().velocity);
        }
        was_serving = serving;
    }

    assert_eq!(launches, 1);
    let v = launch_velocity.unwrap();
    assert!(v.y > 0.0);
    assert!(v.z < 0.0);
}

#[test]
fn rally_invariants_hold_every_tick() {
    let mut state = short_match(5, 21);
    let mut pilot = Autopilot::new(22);
    state.start_match();

    let max_touches = state.config().max_touches;
    let mut last_score = (0, 0);
    for _ in 0..(60 * 300) {
        let frame = pilot.poll(&state, DT);
        state.tick(DT, &frame);

        let rally = state.rules().rally();
        assert!(rally.touch_count <= max_touches);
        if rally.touch_count > 0 {
            assert!(rally.current_team.is_some());
            assert!(rally.last_touch_actor.is_some());
        }

        let score = state.rules().score();
        assert!(score.player >= last_score.0 && score.opponent >= last_score.1);
        last_score = (score.player, score.opponent);

        for npc in state.npcs() {
            let z = npc.position().z;
            if !state.serve().is_currently_serving() {
                assert!(z * npc.team.side_sign() > 0.0, "NPC {} crossed the net", npc.id.0);
            }
        }
        assert!(state.player().position().z > 0.0);

        if state.phase() == MatchPhase::Over {
            break;
        }
    }
}

#[test]
fn loser_serves_after_each_point() {
    let sim = SimConfig {
        serve_rule: ServeRule::LoserServes,
        rng_seed: 8,
        ..Default::default()
    };
    let game = GameConfig {
        points_to_win: 3,
        ..Default::default()
    };
    let mut state = MatchState::new(game, sim);
    let mut log = EventLog::default();
    run_match(&mut state, &mut IdleInput, Some(&mut log), 900.0);

    let mut last_scorer = None;
    for event in &log.events {
        match event {
            GameEvent::Score(s) => last_scorer = Some(s.scoring_team),
            GameEvent::ServeStarted(s) => {
                let expected = last_scorer.map(Team::other).unwrap_or(Team::Player);
                assert_eq!(s.serving_team, expected);
            }
            _ => {}
        }
    }
}

#[test]
fn events_stream_as_json_lines() {
    let mut state = short_match(2, 4);
    let mut pilot = Autopilot::new(5);
    let mut out = JsonLinesNotifier::new(Vec::new());
    run_match(&mut state, &mut pilot, Some(&mut out), 900.0);

    let text = String::from_utf8(out.into_inner()).unwrap();
    let events: Vec<GameEvent> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert!(matches!(events.first(), Some(GameEvent::ServeStarted(_))));
    if state.phase() == MatchPhase::Over {
        let scores = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Score(_)))
            .count();
        assert!(scores >= 2);
        assert!(matches!(events.last(), Some(GameEvent::Message(_))));
        assert!(events.iter().any(|e| matches!(e, GameEvent::MatchOver(_))));
    }
}

#[test]
fn config_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"game": {{"pointsToWin": 5, "npcReactionTime": 0.5}}, "sim": {{"rngSeed": 77}}}}"#
    )
    .unwrap();

    let config = FileConfig::load(file.path()).unwrap();
    assert_eq!(config.game.points_to_win, 5);
    assert_eq!(config.game.npc_reaction_time, 0.5);
    assert_eq!(config.game.max_touches, 3);
    assert_eq!(config.sim.rng_seed, 77);

    let mut state = MatchState::new(config.game, config.sim);
    state.start_match();
    assert_eq!(state.phase(), MatchPhase::Playing);
}

#[test]
fn config_file_errors_are_reported() {
    let missing = FileConfig::load(std::path::Path::new("/nonexistent/futevolei.json"));
    assert!(matches!(missing, Err(ConfigError::Io(_))));

    let mut garbled = tempfile::NamedTempFile::new().unwrap();
    write!(garbled, "{{ not json").unwrap();
    assert!(matches!(
        FileConfig::load(garbled.path()),
        Err(ConfigError::Parse(_))
    ));

    let mut invalid = tempfile::NamedTempFile::new().unwrap();
    write!(invalid, r#"{{"game": {{"maxTouches": 0}}}}"#).unwrap();
    assert!(matches!(
        FileConfig::load(invalid.path()),
        Err(ConfigError::Invalid(_))
    ));
}
