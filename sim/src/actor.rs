use futevolei_shared::config::GameConfig;
use futevolei_shared::protocol::Team;
use futevolei_shared::vec3::{self, Vec3};

/// Identity of a touching actor, used by the double-touch rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(pub u32);

impl ActorId {
    /// The human-controlled actor
    pub const HUMAN: ActorId = ActorId(0);
}

/// Rectangle an actor may stand in (ground plane, inclusive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl SideBounds {
    /// The half of the court a team defends, shrunk by the actor margin.
    pub fn for_team(config: &GameConfig, team: Team) -> Self {
        let margin = config.actor_margin;
        let half_w = config.half_width();
        let half_l = config.half_length();
        let (min_z, max_z) = match team {
            Team::Player => (margin, half_l - margin),
            Team::Opponent => (-half_l + margin, -margin),
        };
        Self {
            min_x: -half_w + margin,
            max_x: half_w - margin,
            min_z,
            max_z,
        }
    }

    pub fn clamp(&self, x: f64, z: f64) -> (f64, f64) {
        (x.clamp(self.min_x, self.max_x), z.clamp(self.min_z, self.max_z))
    }
}

/// Locomotion shared by the human and NPCs: intent in, bounded position out.
#[derive(Debug, Clone)]
pub struct ActorMovement {
    pub position: Vec3,
    intent: (f64, f64),
    speed: f64,
    bounds: SideBounds,
}

impl ActorMovement {
    pub fn new(position: Vec3, speed: f64, bounds: SideBounds) -> Self {
        Self {
            position,
            intent: (0.0, 0.0),
            speed,
            bounds,
        }
    }

    /// Raw, unnormalized movement intent on the ground plane.
    pub fn set_move_direction(&mut self, x: f64, z: f64) {
        self.intent = (x, z);
    }

    pub fn stop(&mut self) {
        self.intent = (0.0, 0.0);
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_moving(&self) -> bool {
        self.intent != (0.0, 0.0)
    }

    pub fn update(&mut self, dt: f64) {
        // Normalized so diagonal input is not faster
        let (dx, dz) = vec3::normalize_2d(self.intent.0, self.intent.1);
        let x = self.position.x + dx * self.speed * dt;
        let z = self.position.z + dz * self.speed * dt;
        let (x, z) = self.bounds.clamp(x, z);
        self.position.x = x;
        self.position.z = z;
    }

    /// Teleport without clamping. The next `update` pulls the actor back in bounds.
    pub fn place(&mut self, x: f64, z: f64) {
        self.position.x = x;
        self.position.z = z;
        self.intent = (0.0, 0.0);
    }

    pub fn bounds(&self) -> SideBounds {
        self.bounds
    }
}
