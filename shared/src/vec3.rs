/// 3D vector utilities for court-space kinematics.
/// Court axes: x across the court, y up, z along the court (net at z = 0).

#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Shorthand constructor
pub fn vec3(x: f64, y: f64, z: f64) -> Vec3 {
    Vec3::new(x, y, z)
}

/// Vector length
pub fn length(v: Vec3) -> f64 {
    (v.x * v.x + v.y * v.y + v.z * v.z).sqrt()
}

/// Length of the ground-plane (x, z) projection
pub fn length_xz(v: Vec3) -> f64 {
    (v.x * v.x + v.z * v.z).sqrt()
}

/// Normalize vector to unit length. Near-zero vectors stay zero.
pub fn normalize(v: Vec3) -> Vec3 {
    let len = length(v);
    if len < 1e-10 {
        return Vec3::ZERO;
    }
    Vec3::new(v.x / len, v.y / len, v.z / len)
}

/// Scale vector by scalar
pub fn scale(v: Vec3, s: f64) -> Vec3 {
    Vec3::new(v.x * s, v.y * s, v.z * s)
}

/// Add two vectors
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(a.x + b.x, a.y + b.y, a.z + b.z)
}

/// Subtract vectors (a - b)
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(a.x - b.x, a.y - b.y, a.z - b.z)
}

/// Euclidean distance between two points
pub fn distance(a: Vec3, b: Vec3) -> f64 {
    length(sub(a, b))
}

/// Distance on the ground plane, ignoring height
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f64 {
    length_xz(sub(a, b))
}

/// Normalize a 2D (x, z) intent. Zero input stays zero.
pub fn normalize_2d(x: f64, z: f64) -> (f64, f64) {
    let len = (x * x + z * z).sqrt();
    if len < 1e-10 {
        return (0.0, 0.0);
    }
    (x / len, z / len)
}
