use crate::ball::NET_HALF_THICKNESS;
use futevolei_shared::config::GameConfig;
use futevolei_shared::vec3::{self, Vec3};

/// Highest vertical speed a net-clearing search will try
const MAX_LIFT: f64 = 25.0;
const LIFT_STEP: f64 = 0.25;

/// Time for a ball launched upward at `vy` from height `y0` to come back down
/// to `ground_y`. None if it never reaches that height.
pub fn flight_time(y0: f64, vy: f64, gravity: f64, ground_y: f64) -> Option<f64> {
    if gravity >= 0.0 {
        return None;
    }
    let g = -gravity;
    let disc = vy * vy + 2.0 * g * (y0 - ground_y);
    if disc < 0.0 {
        return None;
    }
    let t = (vy + disc.sqrt()) / g;
    (t > 0.0).then_some(t)
}

/// Launch velocity that lands a ball from `from` on the ground point under
/// `target`, given a fixed vertical speed. Horizontal speed compensates for
/// exponential air drag at rate `air_drag` per second.
pub fn launch_velocity(
    from: Vec3,
    target: Vec3,
    vy: f64,
    gravity: f64,
    air_drag: f64,
    ground_y: f64,
) -> Option<Vec3> {
    let t = flight_time(from.y, vy, gravity, ground_y)?;

    let dx = target.x - from.x;
    let dz = target.z - from.z;
    let dist = (dx * dx + dz * dz).sqrt();
    if dist < 1e-9 {
        return Some(Vec3::new(0.0, vy, 0.0));
    }

    // Horizontal travel under drag: v / k * (1 - e^(-k t))
    let speed = if air_drag > 1e-9 {
        dist * air_drag / (1.0 - (-air_drag * t).exp())
    } else {
        dist / t
    };

    Some(Vec3::new(dx / dist * speed, vy, dz / dist * speed))
}

/// Vertical speed needed for a ball at `y` to peak `clearance` above the net.
pub fn lift_to_clear(y: f64, net_height: f64, clearance: f64, gravity: f64) -> f64 {
    let rise = (net_height + clearance - y).max(0.0);
    (2.0 * gravity.abs() * rise).sqrt()
}

/// Time for a ball moving along z at `vz` to cover `dz` under exponential
/// drag. None if it is moving the other way or drag stops it first.
pub fn time_to_travel(dz: f64, vz: f64, air_drag: f64) -> Option<f64> {
    if dz == 0.0 {
        return Some(0.0);
    }
    if vz == 0.0 || dz.signum() != vz.signum() {
        return None;
    }
    if air_drag <= 1e-9 {
        return Some(dz / vz);
    }
    // z(t) = vz / k * (1 - e^(-k t))
    let fraction = dz * air_drag / vz;
    if fraction >= 1.0 {
        return None;
    }
    Some(-(1.0 - fraction).ln() / air_drag)
}

/// Lowest height of the ball's center while it passes over the net band.
/// None if it starts inside the band or never reaches it.
pub fn height_over_net(from: Vec3, velocity: Vec3, gravity: f64, air_drag: f64) -> Option<f64> {
    let to_net = from.z.abs();
    if to_net <= NET_HALF_THICKNESS {
        return None;
    }
    let toward = -from.z.signum();
    let height_at = |dz: f64| {
        time_to_travel(toward * dz, velocity.z, air_drag)
            .map(|t| from.y + velocity.y * t + 0.5 * gravity * t * t)
    };
    // The arc is concave, so its lowest point over the band is at an edge
    let near = height_at(to_net - NET_HALF_THICKNESS)?;
    let far = height_at(to_net + NET_HALF_THICKNESS)?;
    Some(near.min(far))
}

/// Launch velocity that passes at least `clear_height` over the whole net
/// band and lands on one of `targets`. Lift is raised from `min_lift` in
/// small steps; at each lift the targets are tried in order, so the flattest
/// clearing arc wins. Horizontal speed is capped at `max_speed`.
pub fn clearing_velocity(
    config: &GameConfig,
    from: Vec3,
    targets: &[Vec3],
    clear_height: f64,
    min_lift: f64,
    max_speed: f64,
) -> Option<Vec3> {
    let mut lift = min_lift.max(0.0);
    while lift <= MAX_LIFT {
        for &target in targets {
            let Some(velocity) = launch_velocity(
                from,
                target,
                lift,
                config.gravity,
                config.air_drag,
                config.ball_radius,
            ) else {
                continue;
            };
            let velocity = cap_horizontal(velocity, max_speed);
            let clears = height_over_net(from, velocity, config.gravity, config.air_drag)
                .map_or(false, |h| h >= clear_height);
            if clears {
                return Some(velocity);
            }
        }
        lift += LIFT_STEP;
    }
    None
}

/// Cap the ground-plane speed of a velocity, keeping its vertical part.
pub fn cap_horizontal(velocity: Vec3, max_speed: f64) -> Vec3 {
    let speed = vec3::length_xz(velocity);
    if speed <= max_speed || speed < 1e-9 {
        return velocity;
    }
    let k = max_speed / speed;
    Vec3::new(velocity.x * k, velocity.y, velocity.z * k)
}
