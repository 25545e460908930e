use crate::actor::{ActorId, ActorMovement, SideBounds};
use crate::ball::Ball;
use futevolei_shared::config::GameConfig;
use futevolei_shared::protocol::Team;
use futevolei_shared::vec3::{self, Vec3};

const KICK_RANGE: f64 = 1.0;
const HEADER_RANGE: f64 = 1.2;
/// Balls at or above this height are headers, below it kicks
const HEADER_MIN_HEIGHT: f64 = 1.2;
const HEADER_MAX_HEIGHT: f64 = 3.0;
/// Header reach is measured from the head, kick reach from the feet
const HEAD_HEIGHT: f64 = 1.6;
const KICK_POWER: f64 = 8.0;
const HEADER_POWER: f64 = 6.0;
const KICK_MIN_LIFT: f64 = 3.0;
const HEADER_MIN_LIFT: f64 = 2.0;

/// The human-controlled actor. Always on the Player team's half.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: ActorId,
    pub team: Team,
    pub movement: ActorMovement,
}

impl Player {
    pub fn new(config: &GameConfig, x: f64, z: f64) -> Self {
        Self {
            id: ActorId::HUMAN,
            team: Team::Player,
            movement: ActorMovement::new(
                Vec3::new(x, 0.0, z),
                config.player_speed,
                SideBounds::for_team(config, Team::Player),
            ),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.movement.position
    }

    pub fn can_kick(&self, ball: &Ball) -> bool {
        vec3::distance(ball.position, self.position()) < KICK_RANGE
            && ball.position.y < HEADER_MIN_HEIGHT
    }

    pub fn can_header(&self, ball: &Ball) -> bool {
        let y = ball.position.y;
        let head = vec3::add(self.position(), Vec3::new(0.0, HEAD_HEIGHT, 0.0));
        vec3::distance(ball.position, head) < HEADER_RANGE
            && (HEADER_MIN_HEIGHT..HEADER_MAX_HEIGHT).contains(&y)
    }

    /// Kick the ball. Silently ignored when out of reach.
    /// The touch must already be registered and accepted.
    pub fn kick(&self, ball: &mut Ball, direction: Vec3, power: f64) -> bool {
        if !self.can_kick(ball) {
            return false;
        }
        ball.set_velocity(strike(direction, KICK_POWER * power, KICK_MIN_LIFT));
        true
    }

    /// Head the ball. Silently ignored when out of reach.
    /// The touch must already be registered and accepted.
    pub fn header(&self, ball: &mut Ball, direction: Vec3, power: f64) -> bool {
        if !self.can_header(ball) {
            return false;
        }
        ball.set_velocity(strike(direction, HEADER_POWER * power, HEADER_MIN_LIFT));
        true
    }
}

fn strike(direction: Vec3, speed: f64, min_lift: f64) -> Vec3 {
    let mut v = vec3::scale(vec3::normalize(direction), speed);
    v.y = v.y.max(min_lift);
    v
}
