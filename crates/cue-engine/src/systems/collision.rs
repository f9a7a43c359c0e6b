use glam::Vec2;

use crate::api::config::CollisionConfig;
use crate::components::ball::Ball;
use crate::core::math::reflect;

/// What a ball touched.
pub enum ContactTarget<'a> {
    /// A static surface. `normal` points away from the surface, toward the ball.
    Wall { normal: Vec2 },
    /// Another ball. `normal` points from `other` toward the resolving ball.
    Ball { other: &'a mut Ball, normal: Vec2 },
}

/// Stateless contact response: reflect, lose energy, hand momentum on.
///
/// The ball-vs-ball split is a gameplay approximation, not an elastic
/// collision: the struck ball receives `transfer_fraction` of the striker's
/// reflected momentum and the striker keeps `retained_fraction` of its
/// reflected velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResolver {
    config: CollisionConfig,
}

impl CollisionResolver {
    pub fn new(config: CollisionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Resolve one contact for `ball`. Call exactly once per contact per tick.
    pub fn resolve(&self, ball: &mut Ball, target: ContactTarget<'_>) {
        match target {
            ContactTarget::Wall { normal } => self.resolve_wall(ball, normal),
            ContactTarget::Ball { other, normal } => self.resolve_ball(ball, other, normal),
        }
    }

    /// Bounce off a static surface.
    pub fn resolve_wall(&self, ball: &mut Ball, normal: Vec2) {
        if !self.reflect_and_attenuate(ball, normal) {
            return;
        }
        log::debug!("ball {}: cushion n={:?} v'={:?}", ball.id.0, normal, ball.velocity());
    }

    /// `striker` hit `struck`; `normal` points from `struck` toward `striker`.
    pub fn resolve_ball(&self, striker: &mut Ball, struck: &mut Ball, normal: Vec2) {
        if !self.reflect_and_attenuate(striker, normal) {
            return;
        }
        let impulse = striker.velocity() * striker.mass() * self.config.transfer_fraction;
        struck.apply_force(impulse);
        striker.set_velocity(striker.velocity() * self.config.retained_fraction);

        log::debug!(
            "ball {} -> ball {}: impulse={:?} striker v'={:?}",
            striker.id.0,
            struck.id.0,
            impulse,
            striker.velocity()
        );
    }

    /// Shared first half of both responses. False when the normal is unusable.
    fn reflect_and_attenuate(&self, ball: &mut Ball, normal: Vec2) -> bool {
        let Some(n) = normal.try_normalize() else {
            log::warn!("ball {}: contact with degenerate normal {:?} ignored", ball.id.0, normal);
            return false;
        };
        ball.set_velocity(reflect(ball.velocity(), n) * self.config.restitution);
        ball.attenuate_spin(self.config.spin_retention);
        true
    }
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(CollisionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::BallConfig;
    use crate::api::types::{BallId, BallKind};
    use glam::Vec3;

    fn ball_at(id: u32, x: f32) -> Ball {
        Ball::new(BallId(id), BallKind::Object, Vec2::new(x, 0.0), BallConfig::default())
    }

    #[test]
    fn wall_reflects_with_restitution() {
        let resolver = CollisionResolver::default();
        let mut b = ball_at(1, 0.0).with_velocity(Vec2::new(5.0, 2.0));
        resolver.resolve(&mut b, ContactTarget::Wall { normal: Vec2::new(-1.0, 0.0) });
        assert!((b.velocity() - Vec2::new(-4.0, 1.6)).length() < 1e-5, "v = {:?}", b.velocity());
    }

    #[test]
    fn wall_attenuates_spin() {
        let resolver = CollisionResolver::default();
        let mut b = ball_at(1, 0.0)
            .with_velocity(Vec2::new(0.0, 3.0))
            .with_spin(Vec2::new(0.5, -1.0))
            .with_angular_velocity(Vec3::new(10.0, 0.0, 0.0));
        resolver.resolve_wall(&mut b, Vec2::new(0.0, -1.0));
        assert!((b.spin() - Vec2::new(0.45, -0.9)).length() < 1e-6, "spin = {:?}", b.spin());
        assert!((b.angular_velocity().x - 9.0).abs() < 1e-5);
    }

    #[test]
    fn momentum_transfer_is_deterministic() {
        let run = || {
            let resolver = CollisionResolver::default();
            let mut a = ball_at(1, 0.0).with_velocity(Vec2::new(5.0, 0.0));
            let mut b = ball_at(2, 0.5);
            // normal from B toward A
            resolver.resolve(&mut a, ContactTarget::Ball { other: &mut b, normal: Vec2::new(-1.0, 0.0) });
            (a.velocity(), b.velocity())
        };

        let (va, vb) = run();
        // reflect (5,0) -> (-5,0), restitution -> (-4,0)
        let post_reflection = Vec2::new(-4.0, 0.0);
        assert_eq!(va, post_reflection * 0.5);
        assert_eq!(vb, post_reflection * 0.5);
        assert!((va.length() - post_reflection.length() * 0.5).abs() < f32::EPSILON);

        // bit-for-bit reproducible
        let (va2, vb2) = run();
        assert_eq!(va.to_array().map(f32::to_bits), va2.to_array().map(f32::to_bits));
        assert_eq!(vb.to_array().map(f32::to_bits), vb2.to_array().map(f32::to_bits));
    }

    #[test]
    fn struck_ball_keeps_its_spin() {
        let resolver = CollisionResolver::default();
        let mut a = ball_at(1, 0.0).with_velocity(Vec2::new(5.0, 0.0));
        let mut b = ball_at(2, 0.5).with_spin(Vec2::new(0.3, 0.0));
        resolver.resolve_ball(&mut a, &mut b, Vec2::new(-1.0, 0.0));
        assert_eq!(b.spin(), Vec2::new(0.3, 0.0));
    }

    #[test]
    fn heavier_struck_ball_moves_less() {
        let resolver = CollisionResolver::default();
        let mut heavy_cfg = BallConfig::default();
        heavy_cfg.mass = 4.0;
        let mut a = ball_at(1, 0.0).with_velocity(Vec2::new(5.0, 0.0));
        let mut b = Ball::new(BallId(2), BallKind::Object, Vec2::new(0.5, 0.0), heavy_cfg);
        resolver.resolve_ball(&mut a, &mut b, Vec2::new(-1.0, 0.0));
        assert!((b.velocity().x + 0.5).abs() < 1e-6, "vb = {:?}", b.velocity());
    }

    #[test]
    fn degenerate_normal_is_ignored() {
        let resolver = CollisionResolver::default();
        let mut b = ball_at(1, 0.0).with_velocity(Vec2::new(2.0, 0.0));
        resolver.resolve_wall(&mut b, Vec2::ZERO);
        assert_eq!(b.velocity(), Vec2::new(2.0, 0.0));
    }
}
