use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Divisor converting a legacy curve-intensity scalar into side spin.
/// `side_spin = clamp(intensity / LEGACY_CURVE_DIVISOR, -1, 1)`.
pub const LEGACY_CURVE_DIVISOR: f32 = 2.0;

/// Conventional fixed tick (50 Hz).
pub const DEFAULT_FIXED_DT: f32 = 0.02;

/// Top-level simulation configuration.
/// Every section falls back to its defaults, so partial JSON is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed timestep in seconds (default: 0.02).
    pub fixed_dt: f32,
    /// Maximum fixed steps run per frame before the accumulator is capped.
    pub max_steps_per_frame: u32,
    pub ball: BallConfig,
    pub collision: CollisionConfig,
    pub table: TableConfig,
    pub rules: RulesConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_dt: DEFAULT_FIXED_DT,
            max_steps_per_frame: 10,
            ball: BallConfig::default(),
            collision: CollisionConfig::default(),
            table: TableConfig::default(),
            rules: RulesConfig::default(),
        }
    }
}

/// Per-ball tuning. Copied onto every ball at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    /// Converts impulses into velocity deltas.
    pub mass: f32,
    /// Contact radius on the table plane.
    pub radius: f32,
    /// Linear and angular speed must both be at or below this to count as stopped.
    pub stop_velocity_threshold: f32,
    /// Spin → angular velocity scale.
    pub spin_strength: f32,
    /// Shot power ceiling.
    pub max_power: f32,
    pub spin: SpinConfig,
    pub damping: DampingConfig,
    pub curve_pull: CurvePullConfig,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            radius: 0.25,
            stop_velocity_threshold: 0.1,
            spin_strength: 15.0,
            max_power: 20.0,
            spin: SpinConfig::default(),
            damping: DampingConfig::default(),
            curve_pull: CurvePullConfig::default(),
        }
    }
}

/// Magnus and top/back-spin tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    /// Lateral acceleration per unit side spin per unit (clamped) speed.
    pub curve_strength: f32,
    /// Longitudinal acceleration per unit top spin.
    pub top_spin_effect: f32,
    /// Linear spin decay toward zero, per second.
    pub spin_decay_rate: f32,
    /// Speed clamp applied to the Magnus multiplier.
    pub magnus_min_speed: f32,
    pub magnus_max_speed: f32,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            curve_strength: 15.0,
            top_spin_effect: 8.0,
            spin_decay_rate: 0.5,
            magnus_min_speed: 1.0,
            magnus_max_speed: 12.0,
        }
    }
}

/// Exponential damping, normalized to `reference_rate` ticks per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DampingConfig {
    /// Velocity retained per reference tick.
    pub linear: f32,
    /// Angular velocity retained per reference tick.
    pub angular: f32,
    pub reference_rate: f32,
}

impl Default for DampingConfig {
    fn default() -> Self {
        Self {
            linear: 0.95,
            angular: 0.98,
            reference_rate: 60.0,
        }
    }
}

/// Continuous-curve ("pull") shot tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurvePullConfig {
    pub pull_force: f32,
    /// Seconds the pull stays active.
    pub duration: f32,
    /// Geometric intensity falloff applied once per tick.
    pub decay_per_tick: f32,
}

impl Default for CurvePullConfig {
    fn default() -> Self {
        Self {
            pull_force: 4.0,
            duration: 0.6,
            decay_per_tick: 0.95,
        }
    }
}

/// Contact response constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Fraction of reflected velocity kept.
    pub restitution: f32,
    /// Spin and angular velocity multiplier on every contact.
    pub spin_retention: f32,
    /// Share of the source ball's momentum handed to the other ball.
    pub transfer_fraction: f32,
    /// Share of its own velocity the source ball keeps after a transfer.
    pub retained_fraction: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            restitution: 0.8,
            spin_retention: 0.9,
            transfer_fraction: 0.5,
            retained_fraction: 0.5,
        }
    }
}

/// Rectangular table: four cushions, six pockets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub width: f32,
    pub height: f32,
    pub pocket_radius: f32,
    /// Cue ball spawn position.
    pub cue_start: Vec2,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            width: 16.0,
            height: 8.0,
            pocket_radius: 0.5,
            cue_start: Vec2::new(4.0, 4.0),
        }
    }
}

/// Lives and respawn timing for the cue ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub lives: u32,
    /// Seconds the cue ball stays off the table after being pocketed.
    pub respawn_delay: f32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            lives: 3,
            respawn_delay: 0.5,
        }
    }
}

impl SimConfig {
    /// Parse a configuration from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Return a copy with every out-of-range value pulled back into range.
    /// Each correction is logged; nothing is rejected.
    pub fn sanitized(mut self) -> Self {
        let defaults = SimConfig::default();
        fix_positive("fixed_dt", &mut self.fixed_dt, defaults.fixed_dt);
        if self.max_steps_per_frame == 0 {
            log::warn!("config: max_steps_per_frame must be at least 1, using 1");
            self.max_steps_per_frame = 1;
        }
        self.ball = self.ball.sanitized();

        let c = &mut self.collision;
        fix_unit("collision.restitution", &mut c.restitution);
        fix_unit("collision.spin_retention", &mut c.spin_retention);
        fix_unit("collision.transfer_fraction", &mut c.transfer_fraction);
        fix_unit("collision.retained_fraction", &mut c.retained_fraction);

        let t = &mut self.table;
        fix_positive("table.width", &mut t.width, defaults.table.width);
        fix_positive("table.height", &mut t.height, defaults.table.height);
        fix_positive("table.pocket_radius", &mut t.pocket_radius, defaults.table.pocket_radius);
        let clamped = t.cue_start.clamp(Vec2::ZERO, Vec2::new(t.width, t.height));
        if clamped != t.cue_start {
            log::warn!("config: table.cue_start {:?} is off the table, using {:?}", t.cue_start, clamped);
            t.cue_start = clamped;
        }

        if self.rules.respawn_delay < 0.0 {
            log::warn!("config: rules.respawn_delay is negative, using 0");
            self.rules.respawn_delay = 0.0;
        }
        self
    }
}

impl BallConfig {
    /// Return a copy with every out-of-range value pulled back into range.
    pub fn sanitized(mut self) -> Self {
        let d = BallConfig::default();
        fix_positive("ball.mass", &mut self.mass, d.mass);
        fix_positive("ball.radius", &mut self.radius, d.radius);
        fix_non_negative("ball.stop_velocity_threshold", &mut self.stop_velocity_threshold);
        fix_non_negative("ball.spin_strength", &mut self.spin_strength);
        fix_non_negative("ball.max_power", &mut self.max_power);

        let s = &mut self.spin;
        fix_non_negative("spin.spin_decay_rate", &mut s.spin_decay_rate);
        fix_non_negative("spin.magnus_min_speed", &mut s.magnus_min_speed);
        if s.magnus_max_speed < s.magnus_min_speed {
            log::warn!(
                "config: spin.magnus_max_speed {} below min {}, raising it",
                s.magnus_max_speed,
                s.magnus_min_speed
            );
            s.magnus_max_speed = s.magnus_min_speed;
        }

        let dm = &mut self.damping;
        fix_damping("damping.linear", &mut dm.linear);
        fix_damping("damping.angular", &mut dm.angular);
        fix_positive("damping.reference_rate", &mut dm.reference_rate, d.damping.reference_rate);

        let p = &mut self.curve_pull;
        fix_non_negative("curve_pull.pull_force", &mut p.pull_force);
        fix_non_negative("curve_pull.duration", &mut p.duration);
        fix_unit("curve_pull.decay_per_tick", &mut p.decay_per_tick);
        self
    }
}

// ---------------------------------------------------------------------------
// Range fixes (private)
// ---------------------------------------------------------------------------

fn fix_positive(name: &str, value: &mut f32, fallback: f32) {
    if !(value.is_finite() && *value > 0.0) {
        log::warn!("config: {} must be positive (got {}), using {}", name, value, fallback);
        *value = fallback;
    }
}

fn fix_non_negative(name: &str, value: &mut f32) {
    if !value.is_finite() || *value < 0.0 {
        log::warn!("config: {} must be non-negative (got {}), using 0", name, value);
        *value = 0.0;
    }
}

fn fix_unit(name: &str, value: &mut f32) {
    let fixed = if value.is_finite() { value.clamp(0.0, 1.0) } else { 1.0 };
    if fixed != *value {
        log::warn!("config: {} must be within [0, 1] (got {}), using {}", name, value, fixed);
        *value = fixed;
    }
}

/// Damping factors live in (0, 1]; zero would stop a ball in a single tick
/// and make `powf` degenerate.
fn fix_damping(name: &str, value: &mut f32) {
    let fixed = if value.is_finite() { value.clamp(f32::EPSILON, 1.0) } else { 1.0 };
    if fixed != *value {
        log::warn!("config: {} must be within (0, 1] (got {}), using {}", name, value, fixed);
        *value = fixed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuning() {
        let c = SimConfig::default();
        assert!((c.fixed_dt - 0.02).abs() < 1e-6);
        assert!((c.ball.stop_velocity_threshold - 0.1).abs() < 1e-6);
        assert!((c.ball.spin.curve_strength - 15.0).abs() < 1e-6);
        assert!((c.ball.damping.linear - 0.95).abs() < 1e-6);
        assert!((c.collision.restitution - 0.8).abs() < 1e-6);
        assert_eq!(c.rules.lives, 3);
    }

    #[test]
    fn parse_partial_json() {
        let json = r#"{
            "fixed_dt": 0.01,
            "ball": { "mass": 2.0, "spin": { "curve_strength": 10.0 } },
            "table": { "cue_start": [2.0, 3.0] }
        }"#;
        let c = SimConfig::from_json(json).unwrap();
        assert!((c.fixed_dt - 0.01).abs() < 1e-6);
        assert!((c.ball.mass - 2.0).abs() < 1e-6);
        assert!((c.ball.spin.curve_strength - 10.0).abs() < 1e-6);
        // Untouched fields keep defaults
        assert!((c.ball.spin.top_spin_effect - 8.0).abs() < 1e-6);
        assert!((c.collision.restitution - 0.8).abs() < 1e-6);
        assert_eq!(c.table.cue_start, Vec2::new(2.0, 3.0));
    }

    #[test]
    fn parse_rejects_malformed_json() {
        assert!(SimConfig::from_json("{ fixed_dt: }").is_err());
    }

    #[test]
    fn sanitized_clamps_bad_values() {
        let mut c = SimConfig::default();
        c.fixed_dt = -1.0;
        c.max_steps_per_frame = 0;
        c.ball.mass = 0.0;
        c.ball.damping.linear = 1.5;
        c.ball.spin.magnus_max_speed = 0.5;
        c.collision.restitution = 2.0;
        c.table.cue_start = Vec2::new(-5.0, 100.0);

        let c = c.sanitized();
        assert!((c.fixed_dt - DEFAULT_FIXED_DT).abs() < 1e-6);
        assert_eq!(c.max_steps_per_frame, 1);
        assert!((c.ball.mass - 1.0).abs() < 1e-6);
        assert!((c.ball.damping.linear - 1.0).abs() < 1e-6);
        assert!(c.ball.spin.magnus_max_speed >= c.ball.spin.magnus_min_speed);
        assert!((c.collision.restitution - 1.0).abs() < 1e-6);
        assert_eq!(c.table.cue_start, Vec2::new(0.0, c.table.height));
    }

    #[test]
    fn sanitized_keeps_valid_config() {
        let c = SimConfig::default();
        assert_eq!(c.sanitized(), c);
    }
}
