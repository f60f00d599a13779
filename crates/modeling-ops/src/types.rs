use part_types::{Plane, ProfileError, Region, SelectorError};
use shape_kernel::KernelSolidHandle;

/// A solid produced by the workplane pipeline.
#[derive(Debug, Clone)]
pub struct Body {
    /// Handle to the solid in the kernel. Runtime-only, not persisted.
    pub handle: KernelSolidHandle,
    /// Workplane the body was last built from, origin shifts included.
    pub plane: Plane,
    /// How to rebuild the body when it is a plain extrusion.
    pub recipe: Option<Extrusion>,
}

/// A set of regions swept along their plane's normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Extrusion {
    pub plane: Plane,
    pub regions: Vec<Region>,
    pub depth: f64,
}

impl Extrusion {
    /// Net cross-section area times depth.
    pub fn volume(&self) -> f64 {
        self.regions.iter().map(Region::area).sum::<f64>() * self.depth
    }
}

/// Where a workplane built on selected faces puts its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CenterOption {
    /// The parent workplane origin, projected onto the face plane.
    #[default]
    ProjectedOrigin,
    /// The area-weighted centroid of the selected faces.
    CenterOfMass,
}

/// Errors from modeling operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OpError {
    #[error("kernel error: {0}")]
    Kernel(#[from] shape_kernel::KernelError),

    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("selector error: {0}")]
    Selector(#[from] SelectorError),

    #[error("selector {selector} matched no faces")]
    EmptySelection { selector: String },

    #[error("selected faces are not coplanar")]
    NotCoplanar,

    #[error("operation needs a solid on the workplane")]
    NoContext,

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },
}

pub(crate) fn check_positive(value: f64, what: &str) -> Result<(), OpError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(OpError::InvalidParameter {
            reason: format!("{} must be positive, got {}", what, value),
        })
    }
}
