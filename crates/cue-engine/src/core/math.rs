// core/math.rs
//
// Small planar vector helpers the integrator and resolver share.
// The table plane is XY with +Z pointing out of the table (the "forward" axis
// the curve model crosses against).

use glam::{Vec2, Vec3};

/// Speeds at or below this are treated as zero-length for normalization.
pub const NORMALIZE_EPSILON: f32 = 0.01;

/// Reflect `v` about a unit `normal`: `v - 2 (v·n) n`.
pub fn reflect(v: Vec2, normal: Vec2) -> Vec2 {
    v - 2.0 * v.dot(normal) * normal
}

/// Move `current` toward `target` by at most `max_delta` (vector length).
/// Never overshoots.
pub fn move_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let delta = target - current;
    let dist = delta.length();
    if dist <= max_delta || dist == 0.0 {
        target
    } else {
        current + delta / dist * max_delta
    }
}

/// `cross(dir, +Z)` for a planar direction: the right-hand side normal.
/// For `dir = (1, 0)` this is `(0, -1)`.
pub fn cross_forward(dir: Vec2) -> Vec2 {
    let c = dir.extend(0.0).cross(Vec3::Z);
    Vec2::new(c.x, c.y)
}

/// Left-hand side normal of a direction (counter-clockwise perpendicular).
pub fn side_normal(dir: Vec2) -> Vec2 {
    -cross_forward(dir)
}

/// Clamp both spin components into `[-1, 1]`.
pub fn clamp_spin(spin: Vec2) -> Vec2 {
    spin.clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
}

/// Normalize, or `None` when the vector is too short to carry a direction.
pub fn direction_of(v: Vec2) -> Option<Vec2> {
    if v.length() < NORMALIZE_EPSILON {
        None
    } else {
        v.try_normalize()
    }
}
