//! Per-tick input for the human-controlled player, and providers that
//! produce it without a real controller.

use crate::actor::ActorId;
use crate::state::{MatchPhase, MatchState};
use futevolei_shared::vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Everything the human player can do in one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    /// Ground-plane movement intent, any magnitude
    pub move_x: f64,
    pub move_z: f64,
    /// Kick gesture began this tick
    pub kick_pressed: bool,
    /// Kick gesture ended this tick
    pub kick_released: bool,
    pub header_pressed: bool,
    /// Pointer position in screen pixels, if it moved or was pressed
    pub pointer: Option<(f64, f64)>,
}

impl InputFrame {
    pub fn moving(x: f64, z: f64) -> Self {
        Self {
            move_x: x,
            move_z: z,
            ..Default::default()
        }
    }
}

/// Source of human input, polled once per tick before the state advances.
pub trait InputProvider {
    fn poll(&mut self, state: &MatchState, dt: f64) -> InputFrame;
}

/// Stands still and never acts.
#[derive(Debug, Default)]
pub struct IdleInput;

impl InputProvider for IdleInput {
    fn poll(&mut self, _state: &MatchState, _dt: f64) -> InputFrame {
        InputFrame::default()
    }
}

/// Replays a fixed script of frames, then idles.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: Vec<InputFrame>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn new(frames: Vec<InputFrame>) -> Self {
        Self { frames, cursor: 0 }
    }
}

impl InputProvider for ScriptedInput {
    fn poll(&mut self, _state: &MatchState, _dt: f64) -> InputFrame {
        let frame = self.frames.get(self.cursor).copied().unwrap_or_default();
        self.cursor += 1;
        frame
    }
}

/// Screen point the autopilot's drag gesture starts from
const GESTURE_ORIGIN: (f64, f64) = (400.0, 500.0);
/// Length of the autopilot's aiming drag, in pixels
const GESTURE_LENGTH: f64 = 120.0;
/// Widest aiming angle either side of straight ahead (radians)
const MAX_AIM_ANGLE: f64 = 0.4;
const CHARGE_POWER_MIN: f64 = 0.6;
const CHARGE_POWER_MAX: f64 = 1.0;
/// Start charging once the ball is this close on the ground plane
const CHARGE_DISTANCE: f64 = 3.0;
/// Give up a charge that has not found the ball after this long
const CHARGE_TIMEOUT: f64 = 2.0;
const HEADER_COOLDOWN: f64 = 0.5;
/// Within this distance of home the autopilot stands still
const HOME_RADIUS: f64 = 0.3;
const HOME: (f64, f64) = (0.0, 6.0);

/// Plays the human side headlessly: chases balls on the Player half, charges
/// kicks to a random power and headers high balls. It never plays the ball
/// twice in a row.
#[derive(Debug)]
pub struct Autopilot {
    rng: ChaCha8Rng,
    charging: bool,
    charge_time: f64,
    target_power: f64,
    aim_angle: f64,
    header_cooldown: f64,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            charging: false,
            charge_time: 0.0,
            target_power: CHARGE_POWER_MAX,
            aim_angle: 0.0,
            header_cooldown: 0.0,
        }
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    fn release(&mut self, frame: &mut InputFrame) {
        frame.kick_released = true;
        self.charging = false;
        self.charge_time = 0.0;
    }
}

impl InputProvider for Autopilot {
    fn poll(&mut self, state: &MatchState, dt: f64) -> InputFrame {
        let mut frame = InputFrame::default();

        // Hold everything, including a charge in progress
        if state.phase() == MatchPhase::Paused {
            return frame;
        }
        self.header_cooldown = (self.header_cooldown - dt).max(0.0);

        if state.phase() != MatchPhase::Playing || state.serve().is_currently_serving() {
            if self.charging {
                self.release(&mut frame);
            }
            return frame;
        }

        let ball = state.ball();
        let player = state.player();
        let me = player.position();

        let live = !ball.is_stopped() && !ball.is_out_of_bounds();
        let ours = ball.position.z > 0.0 || ball.velocity.z > 0.0;

        if live && ours {
            frame.move_x = ball.position.x - me.x;
            frame.move_z = ball.position.z - me.z;
        } else {
            let (hx, hz) = HOME;
            if ((hx - me.x).powi(2) + (hz - me.z).powi(2)).sqrt() > HOME_RADIUS {
                frame.move_x = hx - me.x;
                frame.move_z = hz - me.z;
            }
        }

        // Once the human has played the ball, someone else must touch it next
        let mut touching = state.rules().rally().last_touch_actor == Some(ActorId::HUMAN);

        if live && !touching && self.header_cooldown <= 0.0 && player.can_header(ball) {
            frame.header_pressed = true;
            self.header_cooldown = HEADER_COOLDOWN;
            touching = true;
        }

        if self.charging {
            self.charge_time += dt;
            let aim = (
                GESTURE_ORIGIN.0 + GESTURE_LENGTH * self.aim_angle.sin(),
                GESTURE_ORIGIN.1 - GESTURE_LENGTH * self.aim_angle.cos(),
            );
            frame.pointer = Some(aim);

            let in_reach = player.can_kick(ball);
            let ready = state.kick_power() >= self.target_power;
            let wants_release = (ready && in_reach) || self.charge_time > CHARGE_TIMEOUT || !live;
            // A release in reach is a kick; keep charging until the ball is clear
            if wants_release && !(touching && in_reach) {
                self.release(&mut frame);
            }
        } else if live
            && !touching
            && ball.position.z > 0.0
            && vec3::horizontal_distance(ball.position, me) < CHARGE_DISTANCE
        {
            self.charging = true;
            self.charge_time = 0.0;
            self.target_power = self.rng.gen_range(CHARGE_POWER_MIN..CHARGE_POWER_MAX);
            self.aim_angle = self.rng.gen_range(-MAX_AIM_ANGLE..=MAX_AIM_ANGLE);
            frame.kick_pressed = true;
            frame.pointer = Some(GESTURE_ORIGIN);
        }

        frame
    }
}
