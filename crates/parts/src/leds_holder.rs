//! LED and light-sensor holder.
//!
//! A rectangular block with one bore per component, extruded together with
//! the detached link bar in a single sketch.

use modeling_ops::{Body, KernelBundle, Workplane};
use tracing::{debug, instrument};

use crate::errors::PartError;
use crate::params::LedsHolderParams;

#[instrument(skip(kb))]
pub fn build_leds_holder(
    kb: &mut dyn KernelBundle,
    p: &LedsHolderParams,
) -> Result<Body, PartError> {
    p.validate()?;

    let body = Workplane::named("XY")?
        .rect(p.holder_x, p.holder_y)
        .center(p.led_pos_x, 0.0)
        .circle(p.led_diameter / 2.0)
        .center(-p.led_pos_x, 0.0)
        .center(p.sensor_pos_x, 0.0)
        .circle(p.sensor_diameter / 2.0)
        .center(-p.sensor_pos_x, 0.0)
        .center(p.link_pos_x(), 0.0)
        .rect(p.link_x, p.link_y)
        .extrude(kb, p.holder_z)?;

    debug!(lumps = kb.lump_count(&body.handle), "holder built");
    Ok(body)
}
