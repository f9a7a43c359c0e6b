pub mod config;
pub mod shot;
pub mod simulation;
pub mod types;
