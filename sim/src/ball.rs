//! Ball kinematics: gravity, air drag, ground bounce, net deflection and
//! out-of-bounds detection.
//!
//! The ball is the only shared mutable object in a match. It is written by
//! `update` (integration) or by an action (`set_velocity`, `apply_force`,
//! `reset`), never by both in the same step without the caller choosing the
//! order.

use futevolei_shared::config::GameConfig;
use futevolei_shared::vec3::{self, Vec3};

/// Below this vertical speed a bounce is treated as settled
const REST_BOUNCE_SPEED: f64 = 0.5;
/// Horizontal damping applied on every ground contact
const GROUND_FRICTION: f64 = 0.9;
/// Extra horizontal damping once the ball stops bouncing
const REST_FRICTION: f64 = 0.95;
/// Half-thickness of the net band around z = 0
pub const NET_HALF_THICKNESS: f64 = 0.2;
const GROUND_TOLERANCE: f64 = 0.1;
const STOP_SPEED: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct Ball {
    pub position: Vec3,
    pub velocity: Vec3,
    out_of_bounds: bool,
    /// Suspended in place (serve hold); integration is skipped
    held: bool,
    config: GameConfig,
}

impl Ball {
    pub fn new(config: &GameConfig, position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            out_of_bounds: false,
            held: false,
            config: *config,
        }
    }

    /// Advance one step. No-op once the ball is out of bounds or held.
    pub fn update(&mut self, dt: f64) {
        if self.out_of_bounds || self.held {
            return;
        }

        self.velocity.y += self.config.gravity * dt;

        // Exponential decay keeps drag independent of the frame rate
        let drag = (-self.config.air_drag * dt).exp();
        self.velocity.x *= drag;
        self.velocity.z *= drag;

        self.position = vec3::add(self.position, vec3::scale(self.velocity, dt));

        let radius = self.config.ball_radius;
        if self.position.y <= radius {
            self.position.y = radius;
            self.velocity.y = self.velocity.y.abs() * self.config.ball_bounce;
            self.velocity.x *= GROUND_FRICTION;
            self.velocity.z *= GROUND_FRICTION;

            if self.velocity.y.abs() < REST_BOUNCE_SPEED {
                self.velocity.y = 0.0;
                self.velocity.x *= REST_FRICTION;
                self.velocity.z *= REST_FRICTION;
            }
        }

        // Approximate deflection, not a true collision response
        if self.position.z.abs() < NET_HALF_THICKNESS && self.position.y < self.config.net_height
        {
            self.velocity.z *= -0.5;
            self.velocity.y *= 0.5;
        }

        let limit_x = self.config.half_width() + self.config.out_of_bounds_margin;
        let limit_z = self.config.half_length() + self.config.out_of_bounds_margin;
        if self.position.x.abs() > limit_x || self.position.z.abs() > limit_z {
            self.out_of_bounds = true;
            tracing::debug!(
                "Ball out of bounds at ({:.2}, {:.2})",
                self.position.x,
                self.position.z
            );
        }
    }

    pub fn apply_force(&mut self, force: Vec3) {
        self.velocity = vec3::add(self.velocity, force);
    }

    /// Overwrite velocity (kicks, headers, serves). Releases a held ball.
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
        self.held = false;
    }

    /// Place the ball at rest, clearing the out-of-bounds and held flags.
    pub fn reset(&mut self, x: f64, y: f64, z: f64) {
        self.position = Vec3::new(x, y, z);
        self.velocity = Vec3::ZERO;
        self.out_of_bounds = false;
        self.held = false;
    }

    /// Pin the ball in the air at `position` until the next `set_velocity`.
    pub fn hold_at(&mut self, position: Vec3) {
        self.reset(position.x, position.y, position.z);
        self.held = true;
    }

    pub fn is_on_ground(&self) -> bool {
        self.position.y <= self.config.ball_radius + GROUND_TOLERANCE
    }

    pub fn is_stopped(&self) -> bool {
        vec3::length(self.velocity) < STOP_SPEED && self.is_on_ground()
    }

    pub fn is_out_of_bounds(&self) -> bool {
        self.out_of_bounds
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn radius(&self) -> f64 {
        self.config.ball_radius
    }
}
