//! Aim and power capture for kicks.
//!
//! A kick gesture runs from press to release. While it is held, the power
//! meter sweeps 0 → 1 → 0 as a triangle wave and the drag offset from the
//! press point steers the kick direction. The release freezes both.

use futevolei_shared::vec3::{self, Vec3};

/// Vertical component of every aimed direction before normalizing
const AIM_LIFT: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct PowerCapture {
    power: f64,
    direction: f64,
    /// Power units per second
    frequency: f64,
    active: bool,
}

impl PowerCapture {
    pub fn new(frequency: f64) -> Self {
        Self {
            power: 0.0,
            direction: 1.0,
            frequency,
            active: false,
        }
    }

    pub fn start(&mut self) {
        self.active = true;
        self.power = 0.0;
        self.direction = 1.0;
    }

    /// Advance the meter. Returns the current power; 0 while inactive.
    pub fn update(&mut self, dt: f64) -> f64 {
        if !self.active {
            return 0.0;
        }

        self.power += self.direction * self.frequency * dt;

        // Reflect any overshoot back into [0, 1]
        loop {
            if self.power >= 1.0 {
                self.power = 2.0 - self.power;
                self.direction = -1.0;
            } else if self.power <= 0.0 {
                self.power = self.power.abs();
                self.direction = 1.0;
            } else {
                break;
            }
            if self.power == 1.0 || self.power == 0.0 {
                break;
            }
        }

        self.power
    }

    /// Freeze the meter and return the power at release.
    pub fn stop(&mut self) -> f64 {
        self.active = false;
        self.power
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn power(&self) -> f64 {
        self.power
    }
}

#[derive(Debug, Clone)]
pub struct DirectionCapture {
    /// Radians, 0 = straight at the opponent (-z), positive = right
    angle: f64,
    origin: Option<(f64, f64)>,
    /// Pixels of drag ignored before the angle follows the pointer
    dead_zone: f64,
}

impl DirectionCapture {
    pub fn new(dead_zone: f64) -> Self {
        Self {
            angle: 0.0,
            origin: None,
            dead_zone,
        }
    }

    pub fn start(&mut self, x: f64, y: f64) {
        self.origin = Some((x, y));
        self.angle = 0.0;
    }

    /// Follow the pointer. Screen y grows downward, so dragging up aims forward.
    pub fn update(&mut self, x: f64, y: f64) {
        let Some((ox, oy)) = self.origin else {
            return;
        };
        let dx = x - ox;
        let dy = y - oy;
        if dx.abs() > self.dead_zone || dy.abs() > self.dead_zone {
            self.angle = dx.atan2(-dy);
        }
    }

    /// Unit kick direction in court space.
    pub fn direction(&self) -> Vec3 {
        vec3::normalize(Vec3::new(self.angle.sin(), AIM_LIFT, -self.angle.cos()))
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn stop(&mut self) {
        self.origin = None;
    }

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    // 2.5 * 1/80 = 1/32, exact in binary
    const DT: f64 = 1.0 / 80.0;

    #[test]
    fn inactive_meter_reports_zero() {
        let mut meter = PowerCapture::new(2.5);
        assert_eq!(meter.update(DT), 0.0);
    }

    #[test]
    fn power_is_a_triangle_wave() {
        let mut meter = PowerCapture::new(2.5);
        meter.start();

        let mut peak_step = None;
        for step in 1..=64 {
            let power = meter.update(DT);
            assert!((0.0..=1.0).contains(&power));
            if power == 1.0 {
                peak_step = Some(step);
            }
        }
        assert_eq!(peak_step, Some(32));
        assert_eq!(meter.power(), 0.0);
    }

    #[test]
    fn large_step_reflects_instead_of_clamping() {
        let mut meter = PowerCapture::new(2.5);
        meter.start();
        let power = meter.update(0.5);
        assert!((power - 0.75).abs() < 1e-9);
        assert!(meter.update(0.1) < power, "should be heading down");
    }

    #[test]
    fn stop_freezes_power() {
        let mut meter = PowerCapture::new(2.5);
        meter.start();
        for _ in 0..10 {
            meter.update(DT);
        }
        let released = meter.stop();
        assert!((released - 10.0 / 32.0).abs() < 1e-12);
        assert!(!meter.is_active());
        meter.update(DT);
        assert_eq!(meter.power(), released);
    }

    #[test]
    fn start_defaults_to_forward() {
        let mut aim = DirectionCapture::new(10.0);
        aim.start(100.0, 100.0);
        assert_eq!(aim.angle(), 0.0);
        let dir = aim.direction();
        assert!(dir.z < 0.0);
        assert!(dir.x.abs() < 1e-12);
        assert!((vec3::length(dir) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn small_drag_stays_in_dead_zone() {
        let mut aim = DirectionCapture::new(10.0);
        aim.start(100.0, 100.0);
        aim.update(108.0, 95.0);
        assert_eq!(aim.angle(), 0.0);
    }

    #[test]
    fn drag_right_aims_right() {
        let mut aim = DirectionCapture::new(10.0);
        aim.start(100.0, 100.0);
        aim.update(150.0, 100.0);
        assert!((aim.angle() - FRAC_PI_2).abs() < 1e-9);
        assert!(aim.direction().x > 0.0);
    }

    #[test]
    fn drag_up_aims_forward() {
        let mut aim = DirectionCapture::new(10.0);
        aim.start(100.0, 100.0);
        aim.update(100.0, 40.0);
        assert!(aim.angle().abs() < 1e-12);
    }

    #[test]
    fn update_without_start_is_ignored() {
        let mut aim = DirectionCapture::new(10.0);
        aim.update(500.0, 0.0);
        assert_eq!(aim.angle(), 0.0);
        assert!(!aim.is_active());
    }
}
