use crate::api::config::DEFAULT_FIXED_DT;

/// Fixed timestep accumulator.
/// Turns variable frame deltas into a whole number of fixed simulation ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
    /// Upper bound on ticks per frame (spiral-of-death guard).
    max_steps: u32,
    /// Ticks handed out since creation or the last reset.
    total_steps: u64,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { DEFAULT_FIXED_DT };
        Self {
            dt,
            accumulator: 0.0,
            max_steps: 10,
            total_steps: 0,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        self.total_steps += steps as u64;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Drop any banked time and the step counter.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.total_steps = 0;
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_DT)
    }
}
