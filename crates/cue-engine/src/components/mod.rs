pub mod ball;
pub mod curve;
