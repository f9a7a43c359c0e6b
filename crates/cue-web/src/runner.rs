use glam::Vec2;
use cue_engine::{
    BallEvent, BallId, BallSnapshot, CurveMode, EventRecord, ShotRequest, SimConfig, Simulation,
    SpinPolicy,
};

/// Wires a `Simulation` to the browser.
///
/// wasm-bindgen cannot hand out references, so the JS side reads ball and
/// event state straight out of linear memory through the pointer/length
/// accessors below. Pointers stay valid until the next mutating call.
pub struct SimRunner {
    sim: Simulation,
    /// Frames seen since creation or the last reset.
    frame_count: u64,
}

impl SimRunner {
    pub fn new(sim: Simulation) -> Self {
        Self { sim, frame_count: 0 }
    }

    /// Build from a JSON config. Parse errors are reported to the browser
    /// console and the default config is used instead.
    pub fn from_json(json: &str) -> Self {
        let config = if json.trim().is_empty() {
            SimConfig::default()
        } else {
            match SimConfig::from_json(json) {
                Ok(config) => config,
                Err(err) => {
                    let msg = format!("cue-web: bad config ({}), using defaults", err);
                    web_sys::console::warn_1(&msg.as_str().into());
                    log::warn!("{}", msg);
                    SimConfig::default()
                }
            }
        };
        Self::new(Simulation::new(config))
    }

    /// Run one frame: fixed steps plus buffer rebuild.
    pub fn tick(&mut self, dt: f32) -> u32 {
        self.frame_count += 1;
        let steps = self.sim.advance(dt);
        for event in self.sim.events() {
            match event {
                BallEvent::GameOver => log::info!("cue-web: game over after {} frames", self.frame_count),
                BallEvent::LivesChanged { lives } => log::info!("cue-web: {} lives left", lives),
                _ => {}
            }
        }
        steps
    }

    pub fn reset(&mut self) {
        self.sim.reset();
        self.frame_count = 0;
    }

    // ---- Shots ----

    /// `mode`: 0 = spin curve, 1 = continuous pull. NaN `curve` means "no legacy curve".
    ///
    /// A spin of `(0, 0)` means "no spin supplied": the ball keeps the spin
    /// stored by `set_spin`. This differs from `Ball::shoot`, where a zero spin
    /// is explicit and clears it. Pass `reset_spin` to clear spin from JS.
    #[allow(clippy::too_many_arguments)]
    pub fn shoot(
        &mut self,
        id: u32,
        dir_x: f32,
        dir_y: f32,
        power: f32,
        spin_x: f32,
        spin_y: f32,
        curve: f32,
        mode: u32,
        reset_spin: bool,
    ) -> bool {
        let mut shot = ShotRequest::new(Vec2::new(dir_x, dir_y), power);
        if spin_x != 0.0 || spin_y != 0.0 {
            shot = shot.with_spin(Vec2::new(spin_x, spin_y));
        }
        if !curve.is_nan() {
            shot = shot.with_legacy_curve(curve);
        }
        if mode == 1 {
            shot = shot.with_curve_mode(CurveMode::ContinuousPull);
        }
        if reset_spin {
            shot = shot.with_spin_policy(SpinPolicy::Reset);
        }
        self.sim.shoot(BallId(id), &shot)
    }

    pub fn set_spin(&mut self, id: u32, spin_x: f32, spin_y: f32) -> bool {
        self.sim.set_spin(BallId(id), Vec2::new(spin_x, spin_y))
    }

    pub fn spawn_object(&mut self, x: f32, y: f32) -> u32 {
        self.sim.spawn_object(Vec2::new(x, y)).0
    }

    // ---- Pointer accessors for linear-memory reads ----

    pub fn balls_ptr(&self) -> *const f32 {
        bytemuck_ptr(self.sim.snapshots())
    }

    pub fn ball_count(&self) -> u32 {
        self.sim.snapshots().len() as u32
    }

    pub fn ball_floats(&self) -> u32 {
        BallSnapshot::FLOATS as u32
    }

    pub fn events_ptr(&self) -> *const f32 {
        bytemuck_ptr(self.sim.event_records())
    }

    pub fn events_len(&self) -> u32 {
        self.sim.event_records().len() as u32
    }

    pub fn event_floats(&self) -> u32 {
        EventRecord::FLOATS as u32
    }

    /// Ball state copied into a fresh JS array (for callers without memory access).
    pub fn balls_array(&self) -> js_sys::Float32Array {
        let floats: &[f32] = bytemuck::cast_slice(self.sim.snapshots());
        js_sys::Float32Array::from(floats)
    }

    // ---- Scalars ----

    pub fn cue_id(&self) -> u32 {
        self.sim.cue_id().0
    }

    pub fn lives(&self) -> u32 {
        self.sim.lives()
    }

    pub fn is_game_over(&self) -> bool {
        self.sim.is_game_over()
    }

    pub fn any_moving(&self) -> bool {
        self.sim.any_moving()
    }

    pub fn alpha(&self) -> f32 {
        self.sim.alpha()
    }

    pub fn table_width(&self) -> f32 {
        self.sim.config().table.width
    }

    pub fn table_height(&self) -> f32 {
        self.sim.config().table.height
    }

    pub fn ball_radius(&self) -> f32 {
        self.sim.config().ball.radius
    }
}

fn bytemuck_ptr<T: bytemuck::Pod>(records: &[T]) -> *const f32 {
    let floats: &[f32] = bytemuck::cast_slice(records);
    floats.as_ptr()
}
