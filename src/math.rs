//! Vector helpers over plain `[f32; 3]` arrays

/// A point or direction in world space
pub type Vec3 = [f32; 3];

/// World up axis (Y-up)
pub const UP: Vec3 = [0.0, 1.0, 0.0];

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn lerp3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)]
}

pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(v: Vec3, s: f32) -> Vec3 {
    [v[0] * s, v[1] * s, v[2] * s]
}

pub fn length(v: Vec3) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

pub fn distance(a: Vec3, b: Vec3) -> f32 {
    length(sub(b, a))
}

pub fn midpoint(a: Vec3, b: Vec3) -> Vec3 {
    lerp3(a, b, 0.5)
}

/// Largest absolute component
pub fn max_abs(v: Vec3) -> f32 {
    v[0].abs().max(v[1].abs()).max(v[2].abs())
}
