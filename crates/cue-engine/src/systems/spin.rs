//! Spin model: Magnus side-curve, top/back-spin push, and spin decay.
//!
//! Spin is a 2-vector `(side, top)` with both components in `[-1, 1]`.
//! Positive side spin curves the ball to the LEFT of its direction of travel
//! (counter-clockwise when viewed from +Z). Positive top spin accelerates the
//! ball along its heading, negative (back spin) slows it.

use glam::{Vec2, Vec3};

use crate::api::config::SpinConfig;
use crate::core::math::{clamp_spin, cross_forward, direction_of, move_towards};

/// Spin components at or below this are ignored.
pub const SPIN_EPSILON: f32 = 0.01;

/// Velocity change from side spin over one tick.
/// Returns zero for a velocity too short to normalize.
pub fn magnus_delta(velocity: Vec2, side_spin: f32, config: &SpinConfig, dt: f32) -> Vec2 {
    let Some(heading) = direction_of(velocity) else {
        return Vec2::ZERO;
    };
    let perp = cross_forward(heading);
    let speed = velocity
        .length()
        .clamp(config.magnus_min_speed, config.magnus_max_speed);
    let accel = -side_spin * config.curve_strength * speed;
    perp * accel * dt
}

/// Velocity change from top/back spin over one tick.
pub fn top_spin_delta(velocity: Vec2, top_spin: f32, config: &SpinConfig, dt: f32) -> Vec2 {
    let Some(heading) = direction_of(velocity) else {
        return Vec2::ZERO;
    };
    heading * (top_spin * config.top_spin_effect) * dt
}

/// Apply both spin effects to `velocity`. Components below `SPIN_EPSILON` are skipped.
pub fn apply_spin_effects(velocity: Vec2, spin: Vec2, config: &SpinConfig, dt: f32) -> Vec2 {
    let mut v = velocity;
    if spin.x.abs() > SPIN_EPSILON {
        v += magnus_delta(v, spin.x, config, dt);
    }
    if spin.y.abs() > SPIN_EPSILON {
        v += top_spin_delta(v, spin.y, config, dt);
    }
    v
}

/// Linear decay of the spin vector toward zero, `rate` units per second.
/// Magnitude-based, so the side/top ratio is kept while decaying.
pub fn decay_spin(spin: Vec2, rate: f32, dt: f32) -> Vec2 {
    clamp_spin(move_towards(spin, Vec2::ZERO, rate * dt))
}

/// Angular velocity contributed by a spin selection (visual roll).
/// Top spin rolls about -X, side spin twists about +Z.
pub fn spin_to_angular_velocity(spin: Vec2, spin_strength: f32) -> Vec3 {
    Vec3::new(-spin.y, 0.0, spin.x) * spin_strength
}
