//! Serve sequencing: walk the server to a back corner, hold the ball, then
//! launch it onto the opposing half.

use crate::actor::ActorId;
use crate::ball::Ball;
use crate::npc::Npc;
use crate::trajectory;
use futevolei_shared::config::GameConfig;
use futevolei_shared::protocol::Team;
use futevolei_shared::vec3::Vec3;
use rand::Rng;

/// Server stands this far inside the sideline
const SIDELINE_INSET: f64 = 0.5;
/// And this far behind the back line
const BACKLINE_OFFSET: f64 = 1.0;
/// Ball hangs this far in front of the server, toward the net
const HOLD_OFFSET: f64 = 0.5;
/// Serve targets stay this far inside the sidelines
const TARGET_INSET: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServePhase {
    Idle,
    Positioning,
    Ready,
    Executing,
}

#[derive(Debug, Clone)]
pub struct ServeSequencer {
    phase: ServePhase,
    timer: f64,
    serving_team: Option<Team>,
    server: Option<ActorId>,
    /// Where the ball is held, fixed for the whole sequence
    hold_point: Vec3,
    config: GameConfig,
}

impl ServeSequencer {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: ServePhase::Idle,
            timer: 0.0,
            serving_team: None,
            server: None,
            hold_point: Vec3::ZERO,
            config: *config,
        }
    }

    /// Move the server to a random back corner and pin the ball in front of it.
    pub fn start_serve(
        &mut self,
        team: Team,
        server: &mut Npc,
        ball: &mut Ball,
        rng: &mut impl Rng,
    ) {
        let side = team.side_sign();
        let lateral = self.config.half_width() - SIDELINE_INSET;
        let x = if rng.gen_bool(0.5) { lateral } else { -lateral };
        let z = side * (self.config.half_length() + BACKLINE_OFFSET);

        server.movement.place(x, z);
        server.movement.stop();

        self.hold_point = Vec3::new(x, self.config.serve_hold_height, z - side * HOLD_OFFSET);
        ball.hold_at(self.hold_point);

        self.phase = ServePhase::Positioning;
        self.timer = 0.0;
        self.serving_team = Some(team);
        self.server = Some(server.id);

        tracing::info!(
            "{} serving from ({:.1}, {:.1}) by actor {}",
            team.label(),
            x,
            z,
            server.id.0
        );
    }

    /// Advance the sequence. Returns true on the tick the ball is launched.
    pub fn update(&mut self, dt: f64, ball: &mut Ball, rng: &mut impl Rng) -> bool {
        match self.phase {
            ServePhase::Idle => return false,
            ServePhase::Positioning => {
                self.timer += dt;
                if self.timer >= self.config.serve_position_delay {
                    self.phase = ServePhase::Ready;
                    self.timer = 0.0;
                }
            }
            ServePhase::Ready => {
                self.timer += dt;
                if self.timer >= self.config.serve_delay {
                    self.phase = ServePhase::Executing;
                }
            }
            ServePhase::Executing => {}
        }

        if self.phase != ServePhase::Executing {
            if !ball.is_held() {
                ball.hold_at(self.hold_point);
            }
            return false;
        }

        let Some(team) = self.serving_team else {
            self.phase = ServePhase::Idle;
            return false;
        };
        ball.set_velocity(self.launch_velocity(team, rng));
        self.phase = ServePhase::Idle;
        self.timer = 0.0;
        true
    }

    fn launch_velocity(&self, team: Team, rng: &mut impl Rng) -> Vec3 {
        let cfg = &self.config;
        let target_side = -team.side_sign();
        let lateral = (cfg.half_width() - TARGET_INSET).max(0.0);
        let target = Vec3::new(
            rng.gen_range(-lateral..=lateral),
            0.0,
            target_side * cfg.court_length / 4.0,
        );

        let velocity = trajectory::launch_velocity(
            self.hold_point,
            target,
            cfg.serve_lift,
            cfg.gravity,
            cfg.air_drag,
            cfg.ball_radius,
        )
        .unwrap_or(Vec3::new(0.0, cfg.serve_lift, target_side * cfg.npc_max_kick_speed));

        tracing::debug!(
            "Serve launched toward ({:.2}, {:.2}) at ({:.2}, {:.2}, {:.2})",
            target.x,
            target.z,
            velocity.x,
            velocity.y,
            velocity.z
        );
        velocity
    }

    /// Abandon any sequence in progress without launching.
    pub fn cancel(&mut self) {
        self.phase = ServePhase::Idle;
        self.timer = 0.0;
    }

    pub fn is_currently_serving(&self) -> bool {
        self.phase != ServePhase::Idle
    }

    pub fn phase(&self) -> ServePhase {
        self.phase
    }

    /// Team of the current or most recent serve.
    pub fn serving_team(&self) -> Option<Team> {
        self.serving_team
    }

    /// Server of the current or most recent serve.
    pub fn server(&self) -> Option<ActorId> {
        self.server
    }
}
