use glam::{Quat, Vec2, Vec3};

use crate::api::config::{BallConfig, LEGACY_CURVE_DIVISOR};
use crate::api::shot::{CurveMode, ShotRequest, SpinPolicy, EXPLICIT_SPIN_MIN};
use crate::api::types::{BallEvent, BallId, BallKind};
use crate::components::curve::CurvePull;
use crate::core::math::{clamp_spin, side_normal};
use crate::systems::damping::apply_damping;
use crate::systems::spin::{apply_spin_effects, decay_spin, spin_to_angular_velocity, SPIN_EPSILON};

/// Angular speeds at or below this skip orientation integration.
const ORIENTATION_EPSILON: f32 = 0.01;

/// One ball on the table, advanced kinematically by `tick`.
///
/// Invariants kept by every method:
/// - both spin components stay within `[-1, 1]`;
/// - a ball reported as not moving has exactly zero linear and angular velocity.
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: BallId,
    pub kind: BallKind,
    position: Vec2,
    velocity: Vec2,
    angular_velocity: Vec3,
    orientation: Quat,
    spin: Vec2,
    config: BallConfig,
    curve_pull: Option<CurvePull>,
    active: bool,
    was_moving: bool,
    /// Set on a moving → stopped edge, consumed by the next `tick` or contact settle.
    stop_pending: bool,
}

impl Ball {
    /// Create a resting ball at `position`.
    pub fn new(id: BallId, kind: BallKind, position: Vec2, config: BallConfig) -> Self {
        Self {
            id,
            kind,
            position,
            velocity: Vec2::ZERO,
            angular_velocity: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            spin: Vec2::ZERO,
            config,
            curve_pull: None,
            active: true,
            was_moving: false,
            stop_pending: false,
        }
    }

    // -- Builder pattern --

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.set_velocity(velocity);
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        if angular_velocity.is_finite() {
            self.angular_velocity = angular_velocity;
        }
        self
    }

    pub fn with_spin(mut self, spin: Vec2) -> Self {
        self.set_spin(spin);
        self
    }

    // -- Telemetry --

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    /// Visual orientation integrated from angular velocity.
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Current `(side, top)` spin.
    pub fn spin(&self) -> Vec2 {
        self.spin
    }

    pub fn mass(&self) -> f32 {
        self.config.mass
    }

    pub fn radius(&self) -> f32 {
        self.config.radius
    }

    pub fn config(&self) -> &BallConfig {
        &self.config
    }

    /// The continuous-curve pull in progress, if any.
    pub fn curve_pull(&self) -> Option<&CurvePull> {
        self.curve_pull.as_ref()
    }

    /// Whether the ball is on the table (inactive balls are skipped).
    pub fn is_active(&self) -> bool {
        self.active
    }

    // -- Shots and forces --

    /// Store a spin selection without touching velocity.
    /// The next spin-preserving shot carries it.
    pub fn set_spin(&mut self, spin: Vec2) {
        if spin.is_finite() {
            self.spin = clamp_spin(spin);
        }
    }

    /// Overwrite linear velocity. Non-finite input is ignored.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        if velocity.is_finite() {
            self.velocity = velocity;
        }
    }

    /// Impulse that keeps the stored spin and re-applies it as angular velocity.
    pub fn apply_force(&mut self, force: Vec2) {
        if !self.add_impulse(force) {
            return;
        }
        if self.spin.length() > SPIN_EPSILON {
            self.add_spin_rotation(self.spin);
        }
        log::trace!("ball {}: force {:?} -> v={:.2}", self.id.0, force, self.velocity.length());
    }

    /// Impulse that replaces the stored spin.
    pub fn apply_force_with_spin(&mut self, force: Vec2, spin: Vec2) {
        if !self.add_impulse(force) {
            return;
        }
        if spin.is_finite() {
            self.spin = clamp_spin(spin);
            self.add_spin_rotation(self.spin);
        }
    }

    /// Impulse that clears spin and angular velocity unconditionally.
    pub fn apply_force_and_reset_spin(&mut self, force: Vec2) {
        if !self.add_impulse(force) {
            return;
        }
        self.spin = Vec2::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }

    /// Shoot along `direction` with `power` and an explicit spin selection.
    pub fn shoot(&mut self, direction: Vec2, power: f32, spin: Vec2) {
        self.apply_shot(&ShotRequest::new(direction, power).with_spin(spin));
    }

    /// Resolve a shot request into a velocity delta plus spin or pull state.
    /// Any curve pull from an earlier shot is cancelled.
    pub fn apply_shot(&mut self, shot: &ShotRequest) {
        let power = if shot.power.is_finite() {
            shot.power.clamp(0.0, self.config.max_power)
        } else {
            0.0
        };
        let direction = shot.direction.normalize_or_zero();
        let force = direction * power;
        let explicit = shot.spin.filter(|s| s.is_finite());
        let legacy = shot.effective_legacy_curve();

        self.curve_pull = None;

        if shot.spin_policy == SpinPolicy::Reset {
            self.apply_force_and_reset_spin(force);
        } else if shot.curve_mode == CurveMode::ContinuousPull {
            match explicit {
                Some(spin) => self.apply_force_with_spin(force, spin),
                None => self.apply_force(force),
            }
            if let Some(curve) = legacy {
                let lateral = side_normal(direction) * curve.signum();
                let pull = CurvePull::new(lateral, curve.abs(), self.config.curve_pull.duration);
                if pull.is_active() {
                    self.curve_pull = Some(pull);
                }
            }
        } else {
            match (explicit, legacy) {
                (Some(spin), _) if spin.length() > EXPLICIT_SPIN_MIN => {
                    self.apply_force_with_spin(force, spin);
                }
                (small, Some(curve)) => {
                    self.add_impulse(force);
                    let base = small.map(clamp_spin).unwrap_or(self.spin);
                    let side = (curve / LEGACY_CURVE_DIVISOR).clamp(-1.0, 1.0);
                    self.spin = clamp_spin(Vec2::new(side, base.y));
                    self.add_spin_rotation(self.spin);
                }
                (Some(spin), None) => self.apply_force_with_spin(force, spin),
                (None, None) => self.apply_force(force),
            }
        }

        log::debug!(
            "ball {}: shot dir={:?} power={:.2} v={:.2} spin={:?} pull={}",
            self.id.0,
            direction,
            power,
            self.velocity.length(),
            self.spin,
            self.curve_pull.is_some()
        );
    }

    // -- Integration --

    /// Advance one fixed step. Returns `Stopped` on the tick the ball comes to rest.
    pub fn tick(&mut self, dt: f32) -> Option<BallEvent> {
        if !self.active || !(dt > 0.0) || !dt.is_finite() {
            return None;
        }
        let threshold = self.config.stop_velocity_threshold;

        // 1. spin forces, then decay
        if self.velocity.length() > threshold && self.spin.length() > SPIN_EPSILON {
            self.velocity = apply_spin_effects(self.velocity, self.spin, &self.config.spin, dt);
            self.spin = decay_spin(self.spin, self.config.spin.spin_decay_rate, dt);
        }

        // continuous-curve pull, if one is scheduled
        if let Some(pull) = self.curve_pull.as_mut() {
            let step = if self.velocity.length() > threshold {
                pull.step(&self.config.curve_pull, self.config.mass, dt)
            } else {
                None
            };
            match step {
                Some(delta) => self.velocity += delta,
                None => self.curve_pull = None,
            }
        }

        // 2. damping
        let (v, w) = apply_damping(
            self.velocity,
            self.angular_velocity,
            &self.config.damping,
            threshold,
            dt,
        );
        self.velocity = v;
        self.angular_velocity = w;

        // 3. position
        self.position += self.velocity * dt;

        // 4. orientation (visual only)
        if self.angular_velocity.length() > ORIENTATION_EPSILON {
            let delta = Quat::from_scaled_axis(self.angular_velocity * dt);
            self.orientation = (self.orientation * delta).normalize();
        }

        // 5. stop detection
        self.update_motion_state();
        if std::mem::take(&mut self.stop_pending) {
            Some(BallEvent::Stopped { id: self.id, position: self.position })
        } else {
            None
        }
    }

    /// Whether the ball is moving. When it is not, velocity and angular velocity
    /// are forced to exactly zero; on the moving → stopped edge spin and any
    /// curve pull are cleared as well.
    pub fn is_moving(&mut self) -> bool {
        self.update_motion_state()
    }

    /// Threshold check without side effects.
    pub fn is_moving_now(&self) -> bool {
        let threshold = self.config.stop_velocity_threshold;
        self.velocity.length() > threshold || self.angular_velocity.length() > threshold
    }

    /// Put the ball back at `position` fully at rest (respawn).
    pub fn reset_to_position(&mut self, position: Vec2) {
        if position.is_finite() {
            self.position = position;
        }
        self.velocity = Vec2::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.spin = Vec2::ZERO;
        self.curve_pull = None;
        self.was_moving = false;
        self.stop_pending = false;
        log::debug!("ball {}: reset to {:?}", self.id.0, self.position);
    }

    // -- crate-internal mutation used by the table and the resolver --

    pub(crate) fn set_position(&mut self, position: Vec2) {
        if position.is_finite() {
            self.position = position;
        }
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Re-run the stop check after a contact changed velocity outside `tick`.
    /// Returns `Stopped` if this call is where the ball came to rest.
    pub(crate) fn settle_after_contact(&mut self) -> Option<BallEvent> {
        self.update_motion_state();
        if std::mem::take(&mut self.stop_pending) {
            Some(BallEvent::Stopped { id: self.id, position: self.position })
        } else {
            None
        }
    }

    /// Scale spin and angular velocity by `factor` (contact losses).
    pub(crate) fn attenuate_spin(&mut self, factor: f32) {
        self.spin = clamp_spin(self.spin * factor);
        self.angular_velocity *= factor;
    }

    // -- private helpers --

    /// `velocity += force / mass`. Returns false (and changes nothing) for non-finite force.
    fn add_impulse(&mut self, force: Vec2) -> bool {
        if !force.is_finite() {
            log::warn!("ball {}: ignoring non-finite force {:?}", self.id.0, force);
            return false;
        }
        self.velocity += force / self.config.mass;
        true
    }

    fn add_spin_rotation(&mut self, spin: Vec2) {
        self.angular_velocity += spin_to_angular_velocity(spin, self.config.spin_strength);
    }

    fn update_motion_state(&mut self) -> bool {
        let moving = self.is_moving_now();
        if !moving {
            self.velocity = Vec2::ZERO;
            self.angular_velocity = Vec3::ZERO;
            if self.was_moving {
                self.spin = Vec2::ZERO;
                self.curve_pull = None;
                self.stop_pending = true;
                log::debug!("ball {}: stopped at {:?}", self.id.0, self.position);
            }
        }
        self.was_moving = moving;
        moving
    }
}
