use glam::Vec2;

use crate::api::config::CurvePullConfig;

/// A decaying sideways pull applied every tick for a bounded time.
///
/// This is the continuous-curve shot mode: instead of curving through
/// persistent spin, the ball is dragged toward `lateral` with an intensity
/// that falls off both geometrically per tick and linearly with elapsed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePull {
    /// Unit direction of the pull.
    pub lateral: Vec2,
    /// Current intensity (decays every tick).
    pub intensity: f32,
    /// Seconds since the pull started.
    pub elapsed: f32,
    /// Seconds the pull lasts.
    pub duration: f32,
}

impl CurvePull {
    pub fn new(lateral: Vec2, intensity: f32, duration: f32) -> Self {
        Self {
            lateral: lateral.normalize_or_zero(),
            intensity: intensity.max(0.0),
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    /// Whether the pull still has time left.
    pub fn is_active(&self) -> bool {
        self.elapsed < self.duration && self.intensity > 0.0
    }

    /// Velocity change for this tick, advancing the pull's own clock.
    /// Returns `None` once the pull has run out and should be dropped.
    pub fn step(&mut self, config: &CurvePullConfig, mass: f32, dt: f32) -> Option<Vec2> {
        if !self.is_active() {
            return None;
        }
        let falloff = 1.0 - self.elapsed / self.duration;
        let delta = self.lateral * (self.intensity * config.pull_force * falloff) * dt / mass;
        self.intensity *= config.decay_per_tick;
        self.elapsed += dt;
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pull_expires_after_duration() {
        let cfg = CurvePullConfig::default();
        let mut pull = CurvePull::new(Vec2::Y, 3.0, cfg.duration);
        let mut ticks = 0;
        while pull.step(&cfg, 1.0, 0.02).is_some() {
            ticks += 1;
            assert!(ticks < 1000, "pull never expired");
        }
        // 0.6 s at 50 Hz, allowing for float accumulation at the boundary
        assert!((30..=31).contains(&ticks), "ran for {} ticks", ticks);
        assert!(!pull.is_active());
    }

    #[test]
    fn pull_weakens_every_tick() {
        let cfg = CurvePullConfig::default();
        let mut pull = CurvePull::new(Vec2::new(0.0, 2.0), 3.0, cfg.duration);
        let first = pull.step(&cfg, 1.0, 0.02).unwrap();
        let second = pull.step(&cfg, 1.0, 0.02).unwrap();
        assert!(first.y > 0.0 && first.x == 0.0, "first = {:?}", first);
        assert!(second.y < first.y, "first={:?} second={:?}", first, second);
        // 3 * 4 * 1.0 * 0.02 = 0.24
        assert!((first.y - 0.24).abs() < 1e-5);
        assert!((pull.intensity - 3.0 * 0.95 * 0.95).abs() < 1e-5);
    }

    #[test]
    fn heavier_ball_pulls_less() {
        let cfg = CurvePullConfig::default();
        let mut light = CurvePull::new(Vec2::X, 1.0, 0.6);
        let mut heavy = CurvePull::new(Vec2::X, 1.0, 0.6);
        let a = light.step(&cfg, 1.0, 0.02).unwrap();
        let b = heavy.step(&cfg, 4.0, 0.02).unwrap();
        assert!((a.x - 4.0 * b.x).abs() < 1e-6);
    }
}
