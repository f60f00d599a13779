pub mod boolean;
pub mod extrude;
pub mod hole;
pub mod kernel_ext;
pub mod select;
pub mod types;
pub mod workplane;

pub use boolean::{execute_boolean, BooleanKind};
pub use extrude::execute_extrude;
pub use hole::execute_hole;
pub use kernel_ext::KernelBundle;
pub use select::FaceSelection;
pub use types::*;
pub use workplane::Workplane;
