use shape_kernel::{Kernel, KernelId, KernelIntrospect, KernelSolidHandle, TopoKind, TopoSignature};

use crate::types::OpError;

/// Kernel plus introspection on one object, so an operation can build
/// geometry and query it without juggling `&mut` and `&` borrows.
pub trait KernelBundle: Kernel + KernelIntrospect {
    fn as_kernel(&self) -> &dyn Kernel;

    /// Every face of a body with its signature, in id order.
    fn face_signatures(&self, solid: &KernelSolidHandle) -> Vec<(KernelId, TopoSignature)> {
        self.compute_all_signatures(solid, TopoKind::Face)
    }

    /// Bounds of a body, or an error when the kernel has none for it.
    fn require_bounds(&self, solid: &KernelSolidHandle) -> Result<[f64; 6], OpError> {
        self.bounding_box(solid).ok_or_else(|| OpError::InvalidParameter {
            reason: "body has no extent".to_string(),
        })
    }
}

impl<T: Kernel + KernelIntrospect> KernelBundle for T {
    fn as_kernel(&self) -> &dyn Kernel {
        self
    }
}
