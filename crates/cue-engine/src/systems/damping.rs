use glam::{Vec2, Vec3};

use crate::api::config::DampingConfig;

/// Per-tick retention factor: `factor ^ (dt * reference_rate)`.
/// With `reference_rate = 60` a factor of 0.95 means "keep 95% every 1/60 s"
/// regardless of the actual tick length.
pub fn retention(factor: f32, dt: f32, reference_rate: f32) -> f32 {
    factor.powf(dt * reference_rate)
}

/// Damp linear and angular velocity for one tick, snapping each to exactly
/// zero once its magnitude falls below `stop_threshold`.
pub fn apply_damping(
    velocity: Vec2,
    angular_velocity: Vec3,
    config: &DampingConfig,
    stop_threshold: f32,
    dt: f32,
) -> (Vec2, Vec3) {
    let mut v = velocity * retention(config.linear, dt, config.reference_rate);
    let mut w = angular_velocity * retention(config.angular, dt, config.reference_rate);

    if v.length() < stop_threshold {
        v = Vec2::ZERO;
    }
    if w.length() < stop_threshold {
        w = Vec3::ZERO;
    }
    (v, w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_is_tick_rate_independent() {
        // One second of damping at 50 Hz equals one second at 120 Hz.
        let at_50 = retention(0.95, 1.0 / 50.0, 60.0).powi(50);
        let at_120 = retention(0.95, 1.0 / 120.0, 60.0).powi(120);
        assert!((at_50 - at_120).abs() < 1e-4, "50Hz={} 120Hz={}", at_50, at_120);
        assert!((at_50 - 0.95f32.powi(60)).abs() < 1e-4);
    }

    #[test]
    fn damping_shrinks_velocity() {
        let cfg = DampingConfig::default();
        let (v, w) = apply_damping(Vec2::new(10.0, 0.0), Vec3::new(0.0, 0.0, 10.0), &cfg, 0.1, 0.02);
        assert!(v.x < 10.0 && v.x > 9.0, "v = {:?}", v);
        assert!(w.z < 10.0 && w.z > v.x, "angular damps slower: w = {:?}", w);
    }

    #[test]
    fn hard_zero_below_threshold() {
        let cfg = DampingConfig::default();
        let (v, w) = apply_damping(Vec2::new(0.1, 0.0), Vec3::new(0.05, 0.0, 0.0), &cfg, 0.1, 0.02);
        assert_eq!(v, Vec2::ZERO);
        assert_eq!(w, Vec3::ZERO);
    }
}
