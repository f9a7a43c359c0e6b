pub mod collision;
pub mod damping;
pub mod pockets;
pub mod spin;
