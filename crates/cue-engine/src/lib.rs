pub mod api;
pub mod core;
pub mod components;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{
    BallConfig, CollisionConfig, CurvePullConfig, DampingConfig, RulesConfig, SimConfig,
    SpinConfig, TableConfig, DEFAULT_FIXED_DT, LEGACY_CURVE_DIVISOR,
};
pub use api::shot::{CurveMode, ShotRequest, SpinPolicy};
pub use api::simulation::Simulation;
pub use api::types::{BallEvent, BallId, BallKind, BallSnapshot, EventRecord};
pub use components::ball::Ball;
pub use components::curve::CurvePull;
pub use core::table::{Cushion, Table};
pub use core::time::FixedTimestep;
pub use systems::collision::{CollisionResolver, ContactTarget};
pub use systems::pockets::{Pocket, RespawnFlow, StationaryTracker};
