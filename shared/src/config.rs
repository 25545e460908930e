/// Gameplay configuration shared by the simulation and the browser client.
///
/// Distances are meters, times seconds, speeds meters per second.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, ts_rs::TS)]
#[ts(export, export_to = "../../client/src/shared/generated/")]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    pub points_to_win: u32,
    pub max_touches: u32,
    pub gravity: f64,
    pub ball_bounce: f64,
    pub ball_radius: f64,
    pub court_length: f64,
    pub court_width: f64,
    pub net_height: f64,
    pub player_speed: f64,
    pub npc_reaction_time: f64,
    /// Horizontal air drag rate per second (velocity *= exp(-air_drag * dt))
    pub air_drag: f64,
    /// How far past the court lines the ball may travel before it is out
    pub out_of_bounds_margin: f64,
    /// Distance actors keep from the sidelines and the net
    pub actor_margin: f64,
    /// Power meter oscillation rate (power units per second)
    pub power_frequency: f64,
    /// Drag distance in pixels before an aim gesture changes direction
    pub aim_dead_zone: f64,
    pub serve_position_delay: f64,
    pub serve_delay: f64,
    pub serve_hold_height: f64,
    /// Vertical launch speed of a serve
    pub serve_lift: f64,
    pub npc_kick_range: f64,
    pub npc_chase_range: f64,
    pub npc_reach_height: f64,
    pub npc_max_kick_speed: f64,
    pub npc_min_lift: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            points_to_win: 12,
            max_touches: 3,
            gravity: -9.8,
            ball_bounce: 0.7,
            ball_radius: 0.45,
            court_length: 18.0,
            court_width: 9.0,
            net_height: 2.2,
            player_speed: 5.0,
            npc_reaction_time: 0.3,
            air_drag: 1.212_162_4, // 2% per frame at 60 Hz
            out_of_bounds_margin: 2.0,
            actor_margin: 0.5,
            power_frequency: 2.5,
            aim_dead_zone: 10.0,
            serve_position_delay: 1.0,
            serve_delay: 1.0,
            serve_hold_height: 1.0,
            serve_lift: 8.0,
            npc_kick_range: 1.0,
            npc_chase_range: 6.0,
            npc_reach_height: 2.5,
            npc_max_kick_speed: 14.0,
            npc_min_lift: 5.0,
        }
    }
}

impl GameConfig {
    pub fn half_length(&self) -> f64 {
        self.court_length / 2.0
    }

    pub fn half_width(&self) -> f64 {
        self.court_width / 2.0
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.points_to_win == 0 {
            return Err("points_to_win must be > 0".to_string());
        }
        if self.max_touches == 0 {
            return Err("max_touches must be > 0".to_string());
        }
        if !self.gravity.is_finite() || self.gravity >= 0.0 {
            return Err("gravity must be finite and < 0".to_string());
        }
        if !self.ball_bounce.is_finite() || !(0.0..1.0).contains(&self.ball_bounce) {
            return Err("ball_bounce must be in [0, 1)".to_string());
        }
        if !self.ball_radius.is_finite() || self.ball_radius <= 0.0 {
            return Err("ball_radius must be finite and > 0".to_string());
        }
        if !self.court_length.is_finite() || self.court_length <= 2.0 * self.actor_margin {
            return Err("court_length must be finite and wider than both margins".to_string());
        }
        if !self.court_width.is_finite() || self.court_width <= 2.0 * self.actor_margin {
            return Err("court_width must be finite and wider than both margins".to_string());
        }
        if !self.net_height.is_finite() || self.net_height <= 0.0 {
            return Err("net_height must be finite and > 0".to_string());
        }
        if !self.air_drag.is_finite() || self.air_drag < 0.0 {
            return Err("air_drag must be finite and >= 0".to_string());
        }
        if !self.power_frequency.is_finite() || self.power_frequency <= 0.0 {
            return Err("power_frequency must be finite and > 0".to_string());
        }
        if !self.serve_position_delay.is_finite()
            || !self.serve_delay.is_finite()
            || self.serve_position_delay < 0.0
            || self.serve_delay < 0.0
        {
            return Err("serve delays must be finite and >= 0".to_string());
        }
        if !self.serve_lift.is_finite() || self.serve_lift <= 0.0 {
            return Err("serve_lift must be finite and > 0".to_string());
        }
        if !self.npc_max_kick_speed.is_finite() || self.npc_max_kick_speed <= 0.0 {
            return Err("npc_max_kick_speed must be finite and > 0".to_string());
        }
        if !self.npc_min_lift.is_finite() || self.npc_min_lift <= 0.0 {
            return Err("npc_min_lift must be finite and > 0".to_string());
        }
        let distances_and_times = [
            ("player_speed", self.player_speed),
            ("npc_reaction_time", self.npc_reaction_time),
            ("out_of_bounds_margin", self.out_of_bounds_margin),
            ("actor_margin", self.actor_margin),
            ("aim_dead_zone", self.aim_dead_zone),
            ("serve_hold_height", self.serve_hold_height),
            ("npc_kick_range", self.npc_kick_range),
            ("npc_chase_range", self.npc_chase_range),
            ("npc_reach_height", self.npc_reach_height),
        ];
        for (name, value) in distances_and_times {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be finite and >= 0", name));
            }
        }
        Ok(())
    }
}
