//! Browser bridge for `cue-engine`.
//!
//! One simulation lives in a `thread_local!` slot; the exported free functions
//! below drive it. Call `sim_init` first; every other export is a no-op
//! (returning a zero value) until then.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

pub mod runner;

pub use runner::SimRunner;

thread_local! {
    static RUNNER: RefCell<Option<SimRunner>> = const { RefCell::new(None) };
}

fn with_runner<R>(f: impl FnOnce(&mut SimRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("cue-web: simulation not initialized, call sim_init() first");
                None
            }
        }
    })
}

/// Create the simulation from a JSON config (empty string for defaults).
#[wasm_bindgen]
pub fn sim_init(config_json: &str) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = SimRunner::from_json(config_json);
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("cue-web: initialized");
}

#[wasm_bindgen]
pub fn sim_tick(dt: f32) -> u32 {
    with_runner(|r| r.tick(dt)).unwrap_or(0)
}

#[wasm_bindgen]
pub fn sim_reset() {
    with_runner(|r| r.reset());
}

// ---- Shots ----

/// Shoot ball `id`. Spin `(0, 0)` keeps the ball's stored spin
/// (see `SimRunner::shoot`); set `reset_spin` to clear it.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn sim_shoot(
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
    with_runner(|r| r.shoot(id, dir_x, dir_y, power, spin_x, spin_y, curve, mode, reset_spin))
        .unwrap_or(false)
}

/// Shoot the cue ball keeping its stored spin.
#[wasm_bindgen]
pub fn sim_shoot_cue(dir_x: f32, dir_y: f32, power: f32) -> bool {
    with_runner(|r| {
        let cue = r.cue_id();
        r.shoot(cue, dir_x, dir_y, power, 0.0, 0.0, f32::NAN, 0, false)
    })
    .unwrap_or(false)
}

#[wasm_bindgen]
pub fn sim_set_spin(id: u32, spin_x: f32, spin_y: f32) -> bool {
    with_runner(|r| r.set_spin(id, spin_x, spin_y)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn sim_spawn_object(x: f32, y: f32) -> u32 {
    with_runner(|r| r.spawn_object(x, y)).unwrap_or(u32::MAX)
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_balls_ptr() -> *const f32 {
    with_runner(|r| r.balls_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_ball_count() -> u32 {
    with_runner(|r| r.ball_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_ball_floats() -> u32 {
    with_runner(|r| r.ball_floats()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_balls_array() -> js_sys::Float32Array {
    with_runner(|r| r.balls_array()).unwrap_or_else(|| js_sys::Float32Array::new_with_length(0))
}

#[wasm_bindgen]
pub fn get_events_ptr() -> *const f32 {
    with_runner(|r| r.events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_events_len() -> u32 {
    with_runner(|r| r.events_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_event_floats() -> u32 {
    with_runner(|r| r.event_floats()).unwrap_or(0)
}

// ---- Scalars ----

#[wasm_bindgen]
pub fn get_cue_id() -> u32 {
    with_runner(|r| r.cue_id()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_lives() -> u32 {
    with_runner(|r| r.lives()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn is_game_over() -> bool {
    with_runner(|r| r.is_game_over()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn any_moving() -> bool {
    with_runner(|r| r.any_moving()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn get_alpha() -> f32 {
    with_runner(|r| r.alpha()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_table_width() -> f32 {
    with_runner(|r| r.table_width()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_table_height() -> f32 {
    with_runner(|r| r.table_height()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_ball_radius() -> f32 {
    with_runner(|r| r.ball_radius()).unwrap_or(0.0)
}
