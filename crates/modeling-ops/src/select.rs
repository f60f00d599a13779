use part_types::{math, FaceSelector, Plane, TopoSignature};
use shape_kernel::KernelId;
use tracing::debug;

use crate::kernel_ext::KernelBundle;
use crate::types::{Body, CenterOption, OpError};
use crate::workplane::Workplane;

/// Tolerance for treating selected faces as one plane (mm, and cosine).
const COPLANAR_TOL: f64 = 1e-6;

/// Faces of a body picked by a selector.
#[derive(Debug, Clone)]
pub struct FaceSelection {
    body: Body,
    selector: FaceSelector,
    faces: Vec<(KernelId, TopoSignature)>,
}

impl Body {
    /// Select faces with a selector string such as `">Z"`.
    pub fn faces(&self, kb: &dyn KernelBundle, selector: &str) -> Result<FaceSelection, OpError> {
        let selector: FaceSelector = selector.parse()?;
        let all = kb.face_signatures(&self.handle);
        let picked = selector.select(&all);
        let faces: Vec<(KernelId, TopoSignature)> = all
            .into_iter()
            .filter(|(id, _)| picked.contains(id))
            .collect();

        debug!(%selector, count = faces.len(), "faces selected");
        if faces.is_empty() {
            return Err(OpError::EmptySelection {
                selector: selector.to_string(),
            });
        }
        Ok(FaceSelection {
            body: self.clone(),
            selector,
            faces,
        })
    }
}

impl FaceSelection {
    pub fn ids(&self) -> Vec<KernelId> {
        self.faces.iter().map(|(id, _)| *id).collect()
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn selector(&self) -> FaceSelector {
        self.selector
    }

    pub fn signatures(&self) -> impl Iterator<Item = &TopoSignature> {
        self.faces.iter().map(|(_, sig)| sig)
    }

    /// Area-weighted centroid of the selected faces.
    pub fn center_of_mass(&self) -> Option<[f64; 3]> {
        let mut total = 0.0;
        let mut acc = [0.0; 3];
        for sig in self.signatures() {
            let (Some(area), Some(c)) = (sig.area, sig.centroid) else {
                continue;
            };
            total += area;
            acc = math::add(acc, math::scale(c, area));
        }
        (total > 0.0).then(|| [acc[0] / total, acc[1] / total, acc[2] / total])
    }

    /// Workplane lying on the selected faces, carrying the body as context.
    ///
    /// All faces must be planar and share one plane. The new x direction is
    /// global X for faces normal to Z, otherwise `Z × normal`.
    pub fn workplane(&self, kb: &dyn KernelBundle, center: CenterOption) -> Result<Workplane, OpError> {
        let (normal, point) = self.common_plane()?;

        let origin = match center {
            CenterOption::ProjectedOrigin => {
                let o = self.body.plane.origin;
                let h = math::dot(math::sub(o, point), normal);
                math::sub(o, math::scale(normal, h))
            }
            CenterOption::CenterOfMass => {
                self.center_of_mass().ok_or_else(|| OpError::InvalidParameter {
                    reason: "selected faces have no area".to_string(),
                })?
            }
        };

        let x_dir = math::normalize(math::cross([0.0, 0.0, 1.0], normal))
            .unwrap_or([1.0, 0.0, 0.0]);
        let plane = Plane::new(origin, x_dir, normal).ok_or(OpError::NotCoplanar)?;

        debug!(
            origin = ?plane.origin,
            normal = ?plane.normal,
            lumps = kb.lump_count(&self.body.handle),
            "workplane on faces"
        );
        Ok(Workplane::on(plane, self.body.clone()))
    }

    /// Normal and a point shared by every selected face.
    fn common_plane(&self) -> Result<([f64; 3], [f64; 3]), OpError> {
        let mut planes = self.faces.iter().map(|(_, sig)| match (sig.normal, sig.centroid) {
            (Some(n), Some(c)) if sig.is_planar() => Ok((n, c)),
            _ => Err(OpError::NotCoplanar),
        });
        let (normal, point) = planes.next().ok_or(OpError::NotCoplanar)??;
        for next in planes {
            let (n, c) = next?;
            let offset = math::dot(math::sub(c, point), normal).abs();
            if !math::same_direction(n, normal, COPLANAR_TOL) || offset > COPLANAR_TOL {
                return Err(OpError::NotCoplanar);
            }
        }
        Ok((normal, point))
    }
}
