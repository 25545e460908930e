use crate::config::SimConfig;
use crate::input::InputProvider;
use crate::notify::{self, Notifier};
use crate::state::{MatchPhase, MatchState};
use futevolei_shared::protocol::Team;
use std::time::{Duration, Instant};

/// Turns variable frame times into whole fixed ticks.
#[derive(Debug, Clone)]
pub struct FixedStep {
    dt: f64,
    max_steps: u32,
    accumulator: f64,
}

impl FixedStep {
    pub fn new(tick_rate_hz: u32, max_steps: u32) -> Self {
        Self {
            dt: 1.0 / tick_rate_hz.max(1) as f64,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
        }
    }

    pub fn from_config(sim: &SimConfig) -> Self {
        Self::new(sim.tick_rate_hz, sim.max_steps_per_frame)
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Add a frame's elapsed time and return how many ticks to run.
    /// Time beyond `max_steps` ticks is dropped rather than carried over.
    pub fn advance(&mut self, frame_seconds: f64) -> u32 {
        if frame_seconds.is_finite() && frame_seconds > 0.0 {
            self.accumulator += frame_seconds;
        }

        let mut steps = 0;
        while self.accumulator >= self.dt && steps < self.max_steps {
            self.accumulator -= self.dt;
            steps += 1;
        }
        if steps == self.max_steps && self.accumulator >= self.dt {
            tracing::debug!(
                "Frame too long, dropping {:.3}s of simulation",
                self.accumulator
            );
            self.accumulator = 0.0;
        }
        steps
    }
}

/// Outcome of a headless match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub player_score: u32,
    pub opponent_score: u32,
    /// None when the time limit hit first
    pub winner: Option<Team>,
    pub ticks: u64,
    pub seconds: f64,
    pub points_landed: u32,
    pub double_touches: u32,
    pub too_many_touches: u32,
    pub replays: u32,
    pub events: usize,
}

/// Run the ticks a frame of `frame_seconds` owes the match, polling input
/// before each one. Returns how many events were dispatched.
pub fn run_frame(
    state: &mut MatchState,
    step: &mut FixedStep,
    input: &mut dyn InputProvider,
    mut notifier: Option<&mut (dyn Notifier + '_)>,
    frame_seconds: f64,
) -> usize {
    let dt = step.dt();
    let mut event_count = 0;
    for _ in 0..step.advance(frame_seconds) {
        if state.phase() != MatchPhase::Playing {
            break;
        }
        let frame = input.poll(state, dt);
        let events = state.tick(dt, &frame);
        event_count += events.len();
        notify::dispatch(&events, notifier.as_deref_mut());
    }
    event_count
}

/// Run a whole match as fast as possible, one tick per frame.
/// Starts the match if it has not been started yet.
pub fn run_match(
    state: &mut MatchState,
    input: &mut dyn InputProvider,
    mut notifier: Option<&mut (dyn Notifier + '_)>,
    max_seconds: f64,
) -> MatchSummary {
    let mut step = FixedStep::from_config(state.sim_config());
    let frame_seconds = step.dt();
    let mut event_count = begin(state, notifier.as_deref_mut());

    let start = state.clock();
    while state.phase() == MatchPhase::Playing && state.clock() - start < max_seconds {
        event_count += run_frame(
            state,
            &mut step,
            input,
            notifier.as_deref_mut(),
            frame_seconds,
        );
    }

    summarize(state, event_count, max_seconds)
}

/// Run a whole match paced by the wall clock, the way a rendered client
/// would. Slow frames catch up by at most `max_steps_per_frame` ticks.
pub fn run_realtime(
    state: &mut MatchState,
    input: &mut dyn InputProvider,
    mut notifier: Option<&mut (dyn Notifier + '_)>,
    max_seconds: f64,
) -> MatchSummary {
    let mut step = FixedStep::from_config(state.sim_config());
    let frame_time = Duration::from_secs_f64(step.dt());
    let mut event_count = begin(state, notifier.as_deref_mut());

    let start = state.clock();
    let mut last = Instant::now();
    while state.phase() == MatchPhase::Playing && state.clock() - start < max_seconds {
        std::thread::sleep(frame_time);
        let now = Instant::now();
        let elapsed = now.duration_since(last).as_secs_f64();
        last = now;
        event_count += run_frame(state, &mut step, input, notifier.as_deref_mut(), elapsed);
    }

    summarize(state, event_count, max_seconds)
}

fn begin(state: &mut MatchState, notifier: Option<&mut (dyn Notifier + '_)>) -> usize {
    if state.phase() != MatchPhase::Waiting {
        return 0;
    }
    let events = state.start_match();
    notify::dispatch(&events, notifier);
    events.len()
}

fn summarize(state: &MatchState, event_count: usize, max_seconds: f64) -> MatchSummary {
    if state.phase() == MatchPhase::Playing {
        tracing::warn!(
            "Match stopped at the {:.0}s limit, {} - {}",
            max_seconds,
            state.rules().score().player,
            state.rules().score().opponent
        );
    }

    let score = state.rules().score();
    let stats = state.stats();
    MatchSummary {
        player_score: score.player,
        opponent_score: score.opponent,
        winner: state.rules().winner(),
        ticks: state.ticks(),
        seconds: state.clock(),
        points_landed: stats.landed,
        double_touches: stats.double_touches,
        too_many_touches: stats.too_many_touches,
        replays: stats.replays,
        events: event_count,
    }
}
