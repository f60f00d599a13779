//! Chainable sketch-and-extrude builder.
//!
//! Curves are collected in the coordinates of the plane the workplane was
//! created on; `center` only moves the point where the next curve lands.

use part_types::{Plane, Region, Shape2d};
use tracing::info;

use crate::boolean::{execute_boolean, BooleanKind};
use crate::extrude::execute_extrude;
use crate::hole::execute_hole;
use crate::kernel_ext::KernelBundle;
use crate::types::{check_positive, Body, Extrusion, OpError};

#[derive(Debug, Clone)]
pub struct Workplane {
    base: Plane,
    offset: (f64, f64),
    pending: Vec<Shape2d>,
    context: Option<Body>,
}

impl Workplane {
    pub fn new(plane: Plane) -> Self {
        Self {
            base: plane,
            offset: (0.0, 0.0),
            pending: Vec::new(),
            context: None,
        }
    }

    /// Workplane on one of the named planes (`"XY"`, `"XZ"`, ...).
    pub fn named(name: &str) -> Result<Self, OpError> {
        Plane::named(name)
            .map(Self::new)
            .ok_or_else(|| OpError::InvalidParameter {
                reason: format!("unknown plane {:?}", name),
            })
    }

    /// Workplane that unions new extrusions into `body` and cuts holes in it.
    pub fn on(plane: Plane, body: Body) -> Self {
        Self {
            context: Some(body),
            ..Self::new(plane)
        }
    }

    /// The plane with its origin at the current center.
    pub fn plane(&self) -> Plane {
        self.base.offset_origin(self.offset.0, self.offset.1)
    }

    pub fn pending(&self) -> &[Shape2d] {
        &self.pending
    }

    pub fn context(&self) -> Option<&Body> {
        self.context.as_ref()
    }

    /// Shift the origin by `(dx, dy)`. Shifts accumulate.
    pub fn center(mut self, dx: f64, dy: f64) -> Self {
        self.offset = (self.offset.0 + dx, self.offset.1 + dy);
        self
    }

    /// Rectangle centered on the current origin.
    pub fn rect(mut self, width: f64, height: f64) -> Self {
        self.pending.push(Shape2d::rect(self.offset, width, height));
        self
    }

    /// Circle centered on the current origin.
    pub fn circle(mut self, radius: f64) -> Self {
        self.pending.push(Shape2d::circle(self.offset, radius));
        self
    }

    /// Sweep the pending curves `depth` along the plane normal.
    ///
    /// Curves inside other curves become holes; separate outer curves
    /// become separate lumps. With a context body the result is fused into it.
    pub fn extrude(self, kb: &mut dyn KernelBundle, depth: f64) -> Result<Body, OpError> {
        check_positive(depth, "extrude depth")?;
        let regions = Region::nest(&self.pending)?;
        let plane = self.plane();
        let handle = execute_extrude(kb, &self.base, &regions, depth)?;

        let body = match self.context {
            Some(context) => Body {
                handle: execute_boolean(kb, &context.handle, &handle, BooleanKind::Union)?,
                plane,
                recipe: None,
            },
            None => Body {
                handle,
                plane,
                recipe: Some(Extrusion {
                    plane: self.base,
                    regions,
                    depth,
                }),
            },
        };
        info!(
            curves = self.pending.len(),
            lumps = kb.lump_count(&body.handle),
            depth,
            "extruded"
        );
        Ok(body)
    }

    /// Bore of `diameter` at the current origin, going into the context body.
    /// `None` depth cuts all the way through.
    pub fn hole(
        self,
        kb: &mut dyn KernelBundle,
        diameter: f64,
        depth: Option<f64>,
    ) -> Result<Body, OpError> {
        let plane = self.plane();
        let body = self.context.ok_or(OpError::NoContext)?;
        execute_hole(kb, &body, &plane, diameter, depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_accumulates() {
        let wp = Workplane::new(Plane::xy())
            .center(-2.5, 0.0)
            .circle(1.0)
            .center(2.5, 0.0)
            .center(3.5, 1.0)
            .rect(1.0, 1.0);
        assert_eq!(wp.pending()[0].center(), (-2.5, 0.0));
        assert_eq!(wp.pending()[1].center(), (3.5, 1.0));
        assert_eq!(wp.plane().origin, [3.5, 1.0, 0.0]);
    }

    #[test]
    fn named_plane_lookup() {
        let wp = Workplane::named("XZ").unwrap();
        assert_eq!(wp.plane().normal, [0.0, -1.0, 0.0]);
        assert!(matches!(
            Workplane::named("QQ"),
            Err(OpError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn curves_follow_plane_axes() {
        let wp = Workplane::named("YZ").unwrap().center(1.0, 2.0);
        assert_eq!(wp.plane().origin, [0.0, 1.0, 2.0]);
    }
}
