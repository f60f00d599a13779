use part_types::{math, Plane, Shape2d};
use tracing::{debug, info, instrument};

use crate::boolean::{execute_boolean, BooleanKind};
use crate::extrude::execute_extrude;
use crate::kernel_ext::KernelBundle;
use crate::types::{check_positive, Body, Extrusion, OpError};

/// How far a cutting tool starts above the workplane (mm).
const TOOL_OVERSHOOT: f64 = 0.01;

/// Cosine tolerance for a bore axis to count as parallel to an extrusion.
const AXIS_TOL: f64 = 1e-6;

/// Drill a hole of `diameter` centered on the plane origin, going against
/// the plane normal. `None` depth drills through the whole body.
///
/// A through-hole parallel to a plain extrusion is added to the extruded
/// profile as another inner loop and the body is rebuilt. Anything else
/// subtracts a cylinder from the body.
#[instrument(skip(kb, body), fields(handle = ?body.handle))]
pub fn execute_hole(
    kb: &mut dyn KernelBundle,
    body: &Body,
    plane: &Plane,
    diameter: f64,
    depth: Option<f64>,
) -> Result<Body, OpError> {
    check_positive(diameter, "hole diameter")?;
    if let Some(d) = depth {
        check_positive(d, "hole depth")?;
    }

    match (&body.recipe, depth) {
        (Some(recipe), None) if plane.is_parallel_to(&recipe.plane, AXIS_TOL) => {
            rebuild_with_hole(kb, recipe, plane, diameter)
        }
        _ => cut_with_cylinder(kb, body, plane, diameter, depth),
    }
}

fn rebuild_with_hole(
    kb: &mut dyn KernelBundle,
    recipe: &Extrusion,
    plane: &Plane,
    diameter: f64,
) -> Result<Body, OpError> {
    let (u, v, _) = recipe.plane.to_local(plane.origin);
    let bore = Shape2d::circle((u, v), diameter / 2.0);

    let mut regions = recipe.regions.clone();
    let region = regions
        .iter_mut()
        .find(|r| r.accepts_hole(&bore))
        .ok_or_else(|| OpError::InvalidParameter {
            reason: format!(
                "hole of diameter {} at ({:.3}, {:.3}) does not fit inside the profile",
                diameter, u, v
            ),
        })?;
    region.holes.push(bore);

    let handle = execute_extrude(kb, &recipe.plane, &regions, recipe.depth)?;
    info!(diameter, u, v, "through-hole added to profile");
    Ok(Body {
        handle,
        plane: *plane,
        recipe: Some(Extrusion {
            plane: recipe.plane,
            regions,
            depth: recipe.depth,
        }),
    })
}

fn cut_with_cylinder(
    kb: &mut dyn KernelBundle,
    body: &Body,
    plane: &Plane,
    diameter: f64,
    depth: Option<f64>,
) -> Result<Body, OpError> {
    let bb = kb.require_bounds(&body.handle)?;
    let diagonal = math::length([bb[3] - bb[0], bb[4] - bb[1], bb[5] - bb[2]]);

    // Through-all tools start beyond the body on the near side and leave it on the far side.
    let (start, length) = match depth {
        Some(d) => (TOOL_OVERSHOOT, d + TOOL_OVERSHOOT),
        None => (diagonal + TOOL_OVERSHOOT, 2.0 * (diagonal + TOOL_OVERSHOOT)),
    };
    let base = math::add(plane.origin, math::scale(plane.normal, start));
    let axis = math::scale(plane.normal, -1.0);

    let tool = kb.make_cylinder(base, axis, diameter / 2.0, length)?;
    let handle = execute_boolean(kb, &body.handle, &tool, BooleanKind::Subtract)?;
    debug!(diameter, length, "hole cut with cylinder");
    Ok(Body {
        handle,
        plane: *plane,
        recipe: None,
    })
}
