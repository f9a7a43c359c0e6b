pub mod math;
pub mod table;
pub mod time;
