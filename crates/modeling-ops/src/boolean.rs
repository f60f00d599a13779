use shape_kernel::KernelSolidHandle;
use tracing::{debug, instrument};

use crate::kernel_ext::KernelBundle;
use crate::types::OpError;

/// Boolean operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanKind {
    Union,
    Subtract,
}

/// Execute a boolean operation between two bodies.
#[instrument(skip(kb))]
pub fn execute_boolean(
    kb: &mut dyn KernelBundle,
    body_a: &KernelSolidHandle,
    body_b: &KernelSolidHandle,
    kind: BooleanKind,
) -> Result<KernelSolidHandle, OpError> {
    let faces_before = kb.list_faces(body_a).len();

    let handle = match kind {
        BooleanKind::Union => kb.boolean_union(body_a, body_b)?,
        BooleanKind::Subtract => kb.boolean_subtract(body_a, body_b)?,
    };

    debug!(
        faces_before,
        faces_after = kb.list_faces(&handle).len(),
        "boolean done"
    );
    Ok(handle)
}
