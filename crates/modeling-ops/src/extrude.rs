use part_types::{Plane, Region};
use shape_kernel::{KernelId, KernelSolidHandle};
use tracing::{debug, instrument};

use crate::kernel_ext::KernelBundle;
use crate::types::{check_positive, OpError};

/// Extrude regions drawn on `plane` by `depth` along the plane normal.
///
/// Every region becomes one face and one lump of the resulting body.
#[instrument(skip(kb, regions), fields(regions = regions.len()))]
pub fn execute_extrude(
    kb: &mut dyn KernelBundle,
    plane: &Plane,
    regions: &[Region],
    depth: f64,
) -> Result<KernelSolidHandle, OpError> {
    check_positive(depth, "extrude depth")?;
    if regions.is_empty() {
        return Err(OpError::Profile(part_types::ProfileError::Empty));
    }

    let faces = regions
        .iter()
        .map(|region| kb.make_region_face(region, plane))
        .collect::<Result<Vec<KernelId>, _>>()?;
    let handle = kb.extrude_faces(&faces, plane.normal, depth)?;

    debug!(
        faces = kb.list_faces(&handle).len(),
        lumps = kb.lump_count(&handle),
        "extrusion built"
    );
    Ok(handle)
}
