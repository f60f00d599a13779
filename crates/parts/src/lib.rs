//! Parametric parts for a small wheeled robot.
//!
//! Each part is a fixed sketch-extrude-bore pipeline over a dimension set:
//!
//! - [`leds_holder`]: LED and light-sensor holder with its link bar
//! - [`rim`]: wheel rim with a pinion bore, in several revisions
//!
//! [`generate::generate_parts`] builds a list of parts on any kernel, exports
//! them and writes a manifest.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod generate;
pub mod leds_holder;
pub mod params;
pub mod report;
pub mod rim;

pub use catalog::{BuiltPart, PartKind};
pub use config::PartsConfig;
pub use errors::{ConfigError, PartError};
pub use generate::generate_parts;
pub use leds_holder::build_leds_holder;
pub use params::{LedsHolderParams, ParamError, RimParams, RimRevision};
pub use report::PartReport;
pub use rim::build_rim;
