//! NPC players driven by a small per-tick state machine.
//!
//! Each NPC:
//! - chases a live ball that is on (or coming to) its half
//! - attacks it when in reach, after a reaction-time cooldown
//! - walks back to its home spot otherwise

use crate::actor::{ActorId, ActorMovement, SideBounds};
use crate::ball::Ball;
use crate::rules::{RuleEngine, TouchOutcome};
use crate::trajectory;
use futevolei_shared::config::GameConfig;
use futevolei_shared::protocol::Team;
use futevolei_shared::vec3::{self, Vec3};
use rand::Rng;

/// NPC chase speed as a fraction of player speed
const CHASE_SPEED_FACTOR: f64 = 0.8;
/// NPC return speed as a fraction of player speed
const RETURN_SPEED_FACTOR: f64 = 0.6;
/// Within this distance of home the NPC stands still
const HOME_RADIUS: f64 = 0.5;
/// Height above the net the ball must keep over the whole net band
const NET_CLEARANCE: f64 = 0.8;
/// Closest deep target from the net on the opposing half
const MIN_TARGET_DEPTH: f64 = 2.0;
/// Target just past the net for balls played from close in
const DROP_SHOT_DEPTH: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpcPhase {
    Idle,
    Chase,
    Attack,
    Return,
}

#[derive(Debug, Clone)]
pub struct Npc {
    pub id: ActorId,
    pub team: Team,
    pub movement: ActorMovement,
    home: Vec3,
    phase: NpcPhase,
    /// Match clock (seconds) of the last kick attempt
    last_action_time: Option<f64>,
    config: GameConfig,
}

impl Npc {
    pub fn new(id: ActorId, team: Team, config: &GameConfig, x: f64, z: f64) -> Self {
        let home = Vec3::new(x, 0.0, z);
        Self {
            id,
            team,
            movement: ActorMovement::new(
                home,
                config.player_speed * RETURN_SPEED_FACTOR,
                SideBounds::for_team(config, team),
            ),
            home,
            phase: NpcPhase::Idle,
            last_action_time: None,
            config: *config,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.movement.position
    }

    pub fn home(&self) -> Vec3 {
        self.home
    }

    pub fn phase(&self) -> NpcPhase {
        self.phase
    }

    /// Pick the phase for this tick from the ball's state.
    pub fn decide(&self, ball: &Ball) -> NpcPhase {
        if ball.is_stopped() || ball.is_held() || ball.is_out_of_bounds() {
            return NpcPhase::Return;
        }

        let side = self.team.side_sign();
        let on_side = ball.position.z * side > 0.0;
        let heading_here = ball.velocity.z * side > 0.0;
        let dist = vec3::horizontal_distance(ball.position, self.position());

        let in_reach =
            dist < self.config.npc_kick_range && ball.position.y < self.config.npc_reach_height;

        if on_side && in_reach {
            NpcPhase::Attack
        } else if (on_side || heading_here) && dist < self.config.npc_chase_range {
            NpcPhase::Chase
        } else {
            NpcPhase::Return
        }
    }

    /// Run one tick. Returns the touch outcome if the NPC touched the ball.
    pub fn update(
        &mut self,
        dt: f64,
        now: f64,
        ball: &mut Ball,
        rules: &mut RuleEngine,
        rng: &mut impl Rng,
    ) -> Option<TouchOutcome> {
        self.phase = self.decide(ball);

        let touch = match self.phase {
            NpcPhase::Chase => {
                self.steer_to(ball.position, CHASE_SPEED_FACTOR);
                None
            }
            NpcPhase::Attack => self.attack(now, ball, rules, rng),
            NpcPhase::Return | NpcPhase::Idle => {
                self.return_home();
                None
            }
        };

        self.movement.update(dt);
        touch
    }

    /// Start the reaction cooldown without touching the ball.
    pub fn mark_action(&mut self, now: f64) {
        self.last_action_time = Some(now);
    }

    /// Back to the home spot, idle, cooldown cleared.
    pub fn reset(&mut self) {
        self.movement.place(self.home.x, self.home.z);
        self.phase = NpcPhase::Idle;
        self.last_action_time = None;
    }

    fn ready(&self, now: f64) -> bool {
        self.last_action_time
            .map_or(true, |last| now - last >= self.config.npc_reaction_time)
    }

    fn attack(
        &mut self,
        now: f64,
        ball: &mut Ball,
        rules: &mut RuleEngine,
        rng: &mut impl Rng,
    ) -> Option<TouchOutcome> {
        self.movement.stop();
        if !self.ready(now) {
            return None;
        }
        self.last_action_time = Some(now);

        let outcome = rules.register_touch(self.id, self.team);
        if !outcome.is_accepted() {
            return Some(outcome);
        }

        let velocity = self.kick_velocity(ball.position, rng);
        ball.set_velocity(velocity);
        tracing::debug!(
            "NPC {} kicked toward ({:.2}, {:.2}, {:.2})",
            self.id.0,
            velocity.x,
            velocity.y,
            velocity.z
        );
        Some(outcome)
    }

    fn kick_velocity(&self, from: Vec3, rng: &mut impl Rng) -> Vec3 {
        let cfg = &self.config;
        let target_side = -self.team.side_sign();
        let max_depth = (cfg.half_length() - 1.0).max(MIN_TARGET_DEPTH);
        let depth = rng.gen_range(MIN_TARGET_DEPTH..=max_depth);
        let lateral = (cfg.half_width() - 1.0).max(0.0);
        let x = rng.gen_range(-lateral..=lateral);
        // Shorter fallbacks need less lift when the ball is close to the net
        let targets = [
            Vec3::new(x, 0.0, target_side * depth),
            Vec3::new(x, 0.0, target_side * MIN_TARGET_DEPTH),
            Vec3::new(x, 0.0, target_side * DROP_SHOT_DEPTH),
        ];

        let clear_height = cfg.net_height + NET_CLEARANCE;
        let lift = trajectory::lift_to_clear(from.y, cfg.net_height, NET_CLEARANCE, cfg.gravity)
            .max(cfg.npc_min_lift);

        trajectory::clearing_velocity(
            cfg,
            from,
            &targets,
            clear_height,
            lift,
            cfg.npc_max_kick_speed,
        )
        .unwrap_or_else(|| {
            tracing::debug!("NPC {} cannot clear the net from z = {:.2}", self.id.0, from.z);
            Vec3::new(0.0, lift, target_side * cfg.npc_max_kick_speed)
        })
    }

    fn steer_to(&mut self, target: Vec3, speed_factor: f64) {
        let to = vec3::sub(target, self.position());
        self.movement.set_speed(self.config.player_speed * speed_factor);
        self.movement.set_move_direction(to.x, to.z);
    }

    fn return_home(&mut self) {
        if vec3::horizontal_distance(self.home, self.position()) < HOME_RADIUS {
            self.movement.stop();
            return;
        }
        self.steer_to(self.home, RETURN_SPEED_FACTOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServeRule;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DT: f64 = 1.0 / 60.0;

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn rules() -> RuleEngine {
        RuleEngine::new(3, 12, ServeRule::WinnerServes)
    }

    fn opponent_at(x: f64, z: f64) -> Npc {
        Npc::new(ActorId(2), Team::Opponent, &GameConfig::default(), x, z)
    }

    fn flying_ball(position: Vec3, velocity: Vec3) -> Ball {
        let mut ball = Ball::new(&GameConfig::default(), position);
        ball.set_velocity(velocity);
        ball
    }

    #[test]
    fn chases_ball_on_own_half() {
        let npc = opponent_at(0.0, -5.0);
        let ball = flying_ball(Vec3::new(2.0, 2.0, -3.0), Vec3::new(0.0, 1.0, -1.0));
        assert_eq!(npc.decide(&ball), NpcPhase::Chase);
    }

    #[test]
    fn chases_ball_heading_over_the_net() {
        let npc = opponent_at(0.0, -2.0);
        let ball = flying_ball(Vec3::new(0.0, 3.0, 2.0), Vec3::new(0.0, 1.0, -6.0));
        assert_eq!(npc.decide(&ball), NpcPhase::Chase);
    }

    #[test]
    fn ignores_ball_leaving_its_half() {
        let npc = opponent_at(0.0, -2.0);
        let ball = flying_ball(Vec3::new(0.0, 3.0, 2.0), Vec3::new(0.0, 1.0, 6.0));
        assert_eq!(npc.decide(&ball), NpcPhase::Return);
    }

    #[test]
    fn attacks_ball_in_reach() {
        let npc = opponent_at(0.0, -5.0);
        let ball = flying_ball(Vec3::new(0.3, 1.0, -5.2), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(npc.decide(&ball), NpcPhase::Attack);
    }

    #[test]
    fn stopped_ball_sends_npc_home() {
        let npc = opponent_at(0.0, -5.0);
        let config = GameConfig::default();
        let ball = Ball::new(&config, Vec3::new(0.3, config.ball_radius, -5.2));
        assert_eq!(npc.decide(&ball), NpcPhase::Return);
    }

    #[test]
    fn attack_sends_ball_over_the_net() {
        let mut npc = opponent_at(0.0, -5.0);
        let mut ball = flying_ball(Vec3::new(0.3, 1.0, -5.2), Vec3::new(0.0, -1.0, 0.0));
        let mut rules = rules();
        let mut rng = test_rng();

        let touch = npc.update(DT, 1.0, &mut ball, &mut rules, &mut rng);
        assert_eq!(touch, Some(TouchOutcome::Accepted { touch_count: 1 }));
        assert!(ball.velocity.z > 0.0, "toward the Player half");
        assert!(ball.velocity.y >= GameConfig::default().npc_min_lift);
        assert!(vec3::length_xz(ball.velocity) <= GameConfig::default().npc_max_kick_speed + 1e-9);
        assert!(!npc.movement.is_moving());
    }

    #[test]
    fn kicks_from_any_depth_land_across_the_net() {
        let config = GameConfig::default();
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for &z in &[-0.6, -1.0, -1.5, -3.0, -4.0, -6.0, -8.5] {
                for &(dx, dz) in &[(0.3, 0.1), (-0.4, -0.4)] {
                    for &y in &[0.6, 1.5, 2.3] {
                        let mut npc = opponent_at(0.0, z);
                        let start = Vec3::new(dx, y, z + dz);
                        let mut ball = flying_ball(start, Vec3::new(0.0, -1.0, 0.0));
                        let mut rules = rules();

                        let touch = npc.update(DT, 1.0, &mut ball, &mut rules, &mut rng);
                        assert_eq!(touch, Some(TouchOutcome::Accepted { touch_count: 1 }));

                        for _ in 0..600 {
                            ball.update(DT);
                            if ball.position.y <= ball.radius() || ball.is_out_of_bounds() {
                                break;
                            }
                        }
                        assert!(!ball.is_out_of_bounds(), "kick from {:?} went out", start);
                        assert!(
                            ball.position.z > 0.0,
                            "kick from {:?} landed at z = {:.2}",
                            start,
                            ball.position.z
                        );
                        assert!(ball.position.z < config.half_length());
                    }
                }
            }
        }
    }

    #[test]
    fn attack_respects_reaction_time() {
        let mut npc = opponent_at(0.0, -5.0);
        let mut rules = rules();
        let mut rng = test_rng();
        npc.mark_action(1.0);

        let mut ball = flying_ball(Vec3::new(0.3, 1.0, -5.2), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(npc.update(DT, 1.1, &mut ball, &mut rules, &mut rng), None);
        assert_eq!(npc.phase(), NpcPhase::Attack);
        assert_eq!(rules.rally().touch_count, 0);

        let mut ball = flying_ball(Vec3::new(0.3, 1.0, -5.2), Vec3::new(0.0, -1.0, 0.0));
        assert!(npc.update(DT, 1.31, &mut ball, &mut rules, &mut rng).is_some());
    }

    #[test]
    fn rejected_touch_leaves_ball_untouched() {
        let mut npc = opponent_at(0.0, -5.0);
        let mut rules = rules();
        let mut rng = test_rng();
        rules.register_touch(npc.id, Team::Opponent);

        let velocity = Vec3::new(0.0, -1.0, 0.0);
        let mut ball = flying_ball(Vec3::new(0.3, 1.0, -5.2), velocity);
        let touch = npc.update(DT, 5.0, &mut ball, &mut rules, &mut rng);

        assert!(matches!(touch, Some(TouchOutcome::Rejected(_))));
        assert_eq!(ball.velocity, velocity);
        assert_eq!(rules.score().player, 1);
    }

    #[test]
    fn returns_home_and_stops() {
        let mut npc = opponent_at(0.0, -5.0);
        npc.movement.place(3.0, -2.0);
        let config = GameConfig::default();
        let mut ball = Ball::new(&config, Vec3::new(0.0, config.ball_radius, 5.0));
        let mut rules = rules();
        let mut rng = test_rng();

        for i in 0..600 {
            npc.update(DT, i as f64 * DT, &mut ball, &mut rules, &mut rng);
        }
        assert!(vec3::horizontal_distance(npc.position(), npc.home()) < HOME_RADIUS);
        assert!(!npc.movement.is_moving());
    }

    #[test]
    fn npc_stays_on_its_half_while_chasing() {
        let mut npc = opponent_at(0.0, -1.0);
        let mut rules = rules();
        let mut rng = test_rng();
        for i in 0..120 {
            let mut ball = flying_ball(Vec3::new(0.0, 3.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
            npc.update(DT, i as f64 * DT, &mut ball, &mut rules, &mut rng);
            assert!(npc.position().z <= -0.5);
        }
    }
}
