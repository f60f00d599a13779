//! Wheel rim with a pinion bore through its top face.

use modeling_ops::{Body, CenterOption, KernelBundle, Workplane};
use tracing::{debug, instrument};

use crate::errors::PartError;
use crate::params::RimParams;

#[instrument(skip(kb))]
pub fn build_rim(kb: &mut dyn KernelBundle, p: &RimParams) -> Result<Body, PartError> {
    p.validate()?;

    let disc = Workplane::named("XY")?
        .circle(p.outer_diameter() / 2.0)
        .extrude(kb, p.height)?;
    let body = disc
        .faces(&*kb, ">Z")?
        .workplane(&*kb, CenterOption::ProjectedOrigin)?
        .hole(kb, p.pinion_diameter, None)?;

    debug!(outer = p.outer_diameter(), wall = p.wall(), "rim built");
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use shape_kernel::{KernelIntrospect, MockKernel};
    use std::f64::consts::PI;

    #[test]
    fn rim_is_a_bored_disc() {
        let mut kernel = MockKernel::new();
        let p = RimParams::default();
        let body = build_rim(&mut kernel, &p).unwrap();

        // two caps, outer wall, bore wall
        assert_eq!(kernel.list_faces(&body.handle).len(), 4);
        let expected = PI / 4.0 * (15.5f64.powi(2) - 6.7f64.powi(2)) * 8.0;
        assert_relative_eq!(kernel.volume(&body.handle).unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn bore_wider_than_rim_is_rejected() {
        let mut kernel = MockKernel::new();
        let p = RimParams {
            pinion_diameter: 16.0,
            ..Default::default()
        };
        assert!(matches!(build_rim(&mut kernel, &p), Err(PartError::Param(_))));
    }
}
