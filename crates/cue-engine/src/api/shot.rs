// api/shot.rs
//
// One value type for every way a shot can be requested.
//
// Usage:
//   let shot = ShotRequest::new(aim, power).with_spin(Vec2::new(0.5, 0.0));
//   ball.apply_shot(&shot);

use glam::Vec2;

/// What a shot does to the spin already stored on the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinPolicy {
    /// Keep (and re-apply) the stored spin unless the request carries its own.
    #[default]
    Preserve,
    /// Zero spin and angular velocity unconditionally.
    Reset,
}

/// How a curve request is realized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveMode {
    /// Curve comes from persistent side spin through the Magnus term.
    #[default]
    Spin,
    /// Curve comes from a scheduled, decaying lateral pull.
    ContinuousPull,
}

/// A shot: aim, power, and optional spin/curve inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRequest {
    /// Aim direction. Normalized on use; zero means "no push".
    pub direction: Vec2,
    /// Impulse magnitude, clamped to the ball's `max_power`.
    pub power: f32,
    /// Explicit `(side, top)` spin. Wins over `legacy_curve_intensity` when its
    /// magnitude exceeds `EXPLICIT_SPIN_MIN`.
    pub spin: Option<Vec2>,
    /// Older scalar curve input, converted to side spin via `LEGACY_CURVE_DIVISOR`.
    pub legacy_curve_intensity: Option<f32>,
    pub spin_policy: SpinPolicy,
    pub curve_mode: CurveMode,
}

/// Explicit spin below this magnitude does not override a legacy curve.
pub const EXPLICIT_SPIN_MIN: f32 = 0.1;

/// Legacy curve intensities below this are treated as "no curve".
pub const LEGACY_CURVE_MIN: f32 = 0.01;

impl ShotRequest {
    /// A straight shot that keeps whatever spin the ball already carries.
    pub fn new(direction: Vec2, power: f32) -> Self {
        Self {
            direction,
            power,
            spin: None,
            legacy_curve_intensity: None,
            spin_policy: SpinPolicy::Preserve,
            curve_mode: CurveMode::Spin,
        }
    }

    /// A straight shot that clears any stored spin.
    pub fn straight(direction: Vec2, power: f32) -> Self {
        Self::new(direction, power).with_spin_policy(SpinPolicy::Reset)
    }

    // -- Builder pattern --

    pub fn with_spin(mut self, spin: Vec2) -> Self {
        self.spin = Some(spin);
        self
    }

    pub fn with_legacy_curve(mut self, intensity: f32) -> Self {
        self.legacy_curve_intensity = Some(intensity);
        self
    }

    pub fn with_spin_policy(mut self, policy: SpinPolicy) -> Self {
        self.spin_policy = policy;
        self
    }

    pub fn with_curve_mode(mut self, mode: CurveMode) -> Self {
        self.curve_mode = mode;
        self
    }

    /// The legacy curve value if it is large enough to matter.
    pub fn effective_legacy_curve(&self) -> Option<f32> {
        self.legacy_curve_intensity
            .filter(|c| c.is_finite() && c.abs() > LEGACY_CURVE_MIN)
    }
}
