use crate::actor::ActorId;
use crate::aim::{DirectionCapture, PowerCapture};
use crate::ball::Ball;
use crate::config::SimConfig;
use crate::input::InputFrame;
use crate::npc::Npc;
use crate::player::Player;
use crate::rules::{Fault, PointAwarded, PointReason, RallyEnd, RuleEngine, TouchOutcome};
use crate::serve::ServeSequencer;
use futevolei_shared::config::GameConfig;
use futevolei_shared::protocol::{
    round4, GameEvent, IndicatorMsg, MatchOverMsg, MessageMsg, ScoreMsg, ServeStartedMsg, Team,
};
use futevolei_shared::vec3::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const HUMAN_HOME: (f64, f64) = (0.0, 6.0);
/// Ally first: the first NPC of a team is its server
const NPC_HOMES: [(ActorId, Team, f64, f64); 3] = [
    (ActorId(1), Team::Player, 2.0, 4.0),
    (ActorId(2), Team::Opponent, -2.0, -4.0),
    (ActorId(3), Team::Opponent, 2.0, -6.0),
];
/// Headers always go straight over the net at full power
const HEADER_DIRECTION: Vec3 = Vec3 {
    x: 0.0,
    y: 0.5,
    z: -1.0,
};
const MESSAGE_MS: u32 = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Built but `start_match` not called yet
    Waiting,
    Playing,
    /// Frozen mid-match; nothing advances until `resume`
    Paused,
    Over,
}

/// How the points of a match were decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub landed: u32,
    pub double_touches: u32,
    pub too_many_touches: u32,
    pub replays: u32,
}

impl MatchStats {
    fn record(&mut self, reason: PointReason) {
        match reason {
            PointReason::Landed => self.landed += 1,
            PointReason::Fault(Fault::DoubleTouch) => self.double_touches += 1,
            PointReason::Fault(Fault::TooManyTouches) => self.too_many_touches += 1,
        }
    }
}

/// One match: court, actors, rules and serve, advanced one tick at a time.
pub struct MatchState {
    config: GameConfig,
    sim: SimConfig,
    ball: Ball,
    player: Player,
    npcs: Vec<Npc>,
    rules: RuleEngine,
    serve: ServeSequencer,
    power: PowerCapture,
    aim: DirectionCapture,
    phase: MatchPhase,
    stats: MatchStats,
    /// Simulated seconds since the state was built
    clock: f64,
    ticks: u64,
    rng: ChaCha8Rng,
}

impl MatchState {
    pub fn new(config: GameConfig, sim: SimConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(sim.rng_seed);
        let npcs = NPC_HOMES
            .iter()
            .map(|&(id, team, x, z)| Npc::new(id, team, &config, x, z))
            .collect();

        Self {
            ball: Ball::new(&config, Vec3::new(0.0, config.ball_radius, 0.0)),
            player: Player::new(&config, HUMAN_HOME.0, HUMAN_HOME.1),
            npcs,
            rules: RuleEngine::new(config.max_touches, config.points_to_win, sim.serve_rule),
            serve: ServeSequencer::new(&config),
            power: PowerCapture::new(config.power_frequency),
            aim: DirectionCapture::new(config.aim_dead_zone),
            phase: MatchPhase::Waiting,
            stats: MatchStats::default(),
            clock: 0.0,
            ticks: 0,
            rng,
            config,
            sim,
        }
    }

    /// Begin play with the first serve. No-op unless waiting.
    pub fn start_match(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != MatchPhase::Waiting {
            return events;
        }
        self.phase = MatchPhase::Playing;
        tracing::info!("Match started, first to {}", self.config.points_to_win);
        self.start_next_serve(&mut events);
        events
    }

    /// Clear the score and serve again, whatever the current phase.
    pub fn reset_match(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.rules.reset();
        self.stats = MatchStats::default();
        self.phase = MatchPhase::Playing;
        tracing::info!("Match reset");
        self.start_next_serve(&mut events);
        events
    }

    /// Freeze the match. Returns false unless it was playing.
    pub fn pause(&mut self) -> bool {
        if self.phase != MatchPhase::Playing {
            return false;
        }
        self.phase = MatchPhase::Paused;
        tracing::info!("Match paused at {:.1}s", self.clock);
        true
    }

    /// Continue a paused match where it stopped.
    pub fn resume(&mut self) -> bool {
        if self.phase != MatchPhase::Paused {
            return false;
        }
        self.phase = MatchPhase::Playing;
        tracing::info!("Match resumed");
        true
    }

    /// Advance one fixed step. Returns the events produced during it.
    pub fn tick(&mut self, dt: f64, input: &InputFrame) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != MatchPhase::Playing {
            return events;
        }
        self.clock += dt;
        self.ticks += 1;

        self.capture_input(dt, input, &mut events);

        self.player
            .movement
            .set_move_direction(input.move_x, input.move_z);
        self.player.movement.update(dt);

        if self.serve.is_currently_serving() {
            if input.kick_released {
                self.stop_captures(&mut events);
            }
            if self.serve.update(dt, &mut self.ball, &mut self.rng) {
                let clock = self.clock;
                if let Some(server) = self.serve.server() {
                    if let Some(npc) = self.npcs.iter_mut().find(|n| n.id == server) {
                        npc.mark_action(clock);
                    }
                }
            }
            return events;
        }

        if let Some(point) = self.player_actions(input, &mut events) {
            self.on_point(point, &mut events);
            return events;
        }

        let mut fault = None;
        for npc in self.npcs.iter_mut() {
            let touch = npc.update(dt, self.clock, &mut self.ball, &mut self.rules, &mut self.rng);
            if let Some(TouchOutcome::Rejected(point)) = touch {
                fault = Some(point);
                break;
            }
        }
        if let Some(point) = fault {
            self.on_point(point, &mut events);
            return events;
        }

        self.ball.update(dt);

        match self.rules.evaluate(&self.ball) {
            Some(RallyEnd::Point(point)) => self.on_point(point, &mut events),
            Some(RallyEnd::Replay) => {
                self.stats.replays += 1;
                events.push(message("Replay!".to_string()));
                self.start_next_serve(&mut events);
            }
            None => {}
        }

        events
    }

    /// Put the ball in live play, abandoning any serve in progress.
    pub fn set_ball_in_play(&mut self, position: Vec3, velocity: Vec3) {
        self.serve.cancel();
        self.ball.reset(position.x, position.y, position.z);
        self.ball.set_velocity(velocity);
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    pub fn serve(&self) -> &ServeSequencer {
        &self.serve
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn stats(&self) -> MatchStats {
        self.stats
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn sim_config(&self) -> &SimConfig {
        &self.sim
    }

    /// Power on the meter right now; 0 unless a kick is charging.
    pub fn kick_power(&self) -> f64 {
        if self.power.is_active() {
            self.power.power()
        } else {
            0.0
        }
    }

    fn capture_input(&mut self, dt: f64, input: &InputFrame, events: &mut Vec<GameEvent>) {
        if input.kick_pressed && !self.power.is_active() {
            let (x, y) = input.pointer.unwrap_or((0.0, 0.0));
            self.power.start();
            self.aim.start(x, y);
        }

        if let Some((x, y)) = input.pointer {
            self.aim.update(x, y);
        }

        if self.power.is_active() {
            let power = self.power.update(dt);
            events.push(GameEvent::Indicator(IndicatorMsg {
                power: round4(power),
                angle: round4(self.aim.angle()),
                position: self.player.position().to_array().map(round4),
            }));
        }
    }

    /// Freeze both captures. Returns the released power if a kick was charging.
    fn stop_captures(&mut self, events: &mut Vec<GameEvent>) -> Option<f64> {
        if !self.power.is_active() {
            return None;
        }
        let power = self.power.stop();
        self.aim.stop();
        events.push(GameEvent::IndicatorHidden);
        Some(power)
    }

    /// Human header and kick. Each registers its touch before touching the ball.
    fn player_actions(
        &mut self,
        input: &InputFrame,
        events: &mut Vec<GameEvent>,
    ) -> Option<PointAwarded> {
        if input.header_pressed && self.player.can_header(&self.ball) {
            match self.rules.register_touch(self.player.id, self.player.team) {
                TouchOutcome::Rejected(point) => return Some(point),
                TouchOutcome::Accepted { .. } => {
                    self.player.header(&mut self.ball, HEADER_DIRECTION, 1.0);
                }
            }
        }

        if input.kick_released {
            if let Some(power) = self.stop_captures(events) {
                let direction = self.aim.direction();
                if self.player.can_kick(&self.ball) {
                    match self.rules.register_touch(self.player.id, self.player.team) {
                        TouchOutcome::Rejected(point) => return Some(point),
                        TouchOutcome::Accepted { .. } => {
                            self.player.kick(&mut self.ball, direction, power);
                        }
                    }
                }
            }
        }

        None
    }

    fn on_point(&mut self, point: PointAwarded, events: &mut Vec<GameEvent>) {
        self.stats.record(point.reason);
        events.push(GameEvent::Score(ScoreMsg {
            player_score: point.player_score,
            opponent_score: point.opponent_score,
            scoring_team: point.team,
        }));
        if let PointReason::Fault(fault) = point.reason {
            events.push(message(fault.describe().to_string()));
        }

        if let Some(winner) = self.rules.winner() {
            self.phase = MatchPhase::Over;
            self.serve.cancel();
            self.stop_captures(events);
            events.push(GameEvent::MatchOver(MatchOverMsg {
                winner,
                player_score: point.player_score,
                opponent_score: point.opponent_score,
            }));
            events.push(message(format!("{} wins!", winner.label())));
            tracing::info!(
                "{} won {} - {} after {:.1}s",
                winner.label(),
                point.player_score,
                point.opponent_score,
                self.clock
            );
            return;
        }

        self.start_next_serve(events);
    }

    /// Everyone home, then the serving team's first NPC serves.
    fn start_next_serve(&mut self, events: &mut Vec<GameEvent>) {
        self.stop_captures(events);
        self.rules.reset_rally();

        self.player.movement.place(HUMAN_HOME.0, HUMAN_HOME.1);
        for npc in self.npcs.iter_mut() {
            npc.reset();
        }

        let team = self.rules.serving_team();
        let Some(server) = self.npcs.iter_mut().find(|n| n.team == team) else {
            tracing::warn!("No server available for {}", team.label());
            return;
        };
        self.serve
            .start_serve(team, server, &mut self.ball, &mut self.rng);

        events.push(GameEvent::ServeStarted(ServeStartedMsg {
            serving_team: team,
            server_id: server.id.0,
        }));
        events.push(message(format!("{} serve", team.label())));
    }
}

fn message(text: String) -> GameEvent {
    GameEvent::Message(MessageMsg {
        text,
        duration_ms: MESSAGE_MS,
    })
}
