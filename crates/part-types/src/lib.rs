pub mod math;
pub mod plane;
pub mod sketch;
pub mod topo;

pub use plane::*;
pub use sketch::*;
pub use topo::*;
