//! Profile and primitive builders on top of truck's sweep API.
//!
//! truck has no built-in rectangle/circle/cylinder; everything is successive sweeps.

use std::f64::consts::PI;
use truck_modeling::builder;
use truck_modeling::topology::{Edge, Face, Solid, Vertex, Wire};
use truck_modeling::{Point3, Rad, Vector3};

use crate::types::{KernelError, Plane, Region, Shape2d};

fn point(p: [f64; 3]) -> Point3 {
    Point3::new(p[0], p[1], p[2])
}

fn vector(v: [f64; 3]) -> Vector3 {
    Vector3::new(v[0], v[1], v[2])
}

/// Counter-clockwise (about the plane normal) closed wire for a curve.
pub fn shape_wire(shape: &Shape2d, plane: &Plane) -> Wire {
    match *shape {
        Shape2d::Rect {
            center: (cu, cv),
            width,
            height,
        } => {
            let (hw, hh) = (width / 2.0, height / 2.0);
            let corners = [
                (cu - hw, cv - hh),
                (cu + hw, cv - hh),
                (cu + hw, cv + hh),
                (cu - hw, cv + hh),
            ];
            let vertices: Vec<Vertex> = corners
                .iter()
                .map(|&(u, v)| builder::vertex(point(plane.to_world(u, v))))
                .collect();
            let edges: Vec<Edge> = (0..4)
                .map(|i| builder::line(&vertices[i], &vertices[(i + 1) % 4]))
                .collect();
            Wire::from_iter(edges)
        }
        Shape2d::Circle {
            center: (cu, cv),
            radius,
        } => {
            let start = builder::vertex(point(plane.to_world(cu + radius, cv)));
            builder::rsweep(
                &start,
                point(plane.to_world(cu, cv)),
                vector(plane.normal),
                Rad(2.0 * PI),
            )
        }
    }
}

/// Planar face bounded by the region's outer curve with its holes cut out.
pub fn region_face(region: &Region, plane: &Plane) -> Result<Face, KernelError> {
    let mut wires = Vec::with_capacity(1 + region.holes.len());
    wires.push(shape_wire(&region.outer, plane));
    // inner boundaries run clockwise
    wires.extend(region.holes.iter().map(|h| shape_wire(h, plane).inverse()));

    builder::try_attach_plane(&wires).map_err(|e| KernelError::FaceFailed {
        reason: format!("failed to create planar face: {}", e),
    })
}

/// Any unit vector perpendicular to `axis` (assumed unit length).
pub fn perpendicular(axis: [f64; 3]) -> [f64; 3] {
    let helper = if axis[0].abs() < 0.9 {
        [1.0, 0.0, 0.0]
    } else {
        [0.0, 1.0, 0.0]
    };
    let c = part_types::math::cross(axis, helper);
    part_types::math::normalize(c).unwrap_or([0.0, 0.0, 1.0])
}

/// Create a box solid via successive translational sweeps.
/// Origin at (0,0,0), extends to (w,h,d).
#[cfg(test)]
pub(crate) fn make_box(w: f64, h: f64, d: f64) -> Solid {
    let v = builder::vertex(Point3::new(0.0, 0.0, 0.0));
    let edge = builder::tsweep(&v, Vector3::new(w, 0.0, 0.0));
    let face = builder::tsweep(&edge, Vector3::new(0.0, h, 0.0));
    builder::tsweep(&face, Vector3::new(0.0, 0.0, d))
}

/// Cylinder with its base disc centered on `base`, extending `height` along unit `axis`.
pub fn make_cylinder(
    base: [f64; 3],
    axis: [f64; 3],
    radius: f64,
    height: f64,
) -> Result<Solid, KernelError> {
    let plane = Plane::new(base, perpendicular(axis), axis).ok_or_else(|| {
        KernelError::InvalidArgument {
            reason: "cylinder axis has zero length".to_string(),
        }
    })?;
    let face = region_face(&Region::solid(Shape2d::circle((0.0, 0.0), radius)), &plane)?;
    Ok(builder::tsweep(&face, vector(axis) * height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex_bounds(solid: &Solid) -> ([f64; 3], [f64; 3]) {
        let mut min = [f64::MAX; 3];
        let mut max = [f64::MIN; 3];
        for shell in solid.boundaries() {
            for v in shell.vertex_iter() {
                let p = v.point();
                for i in 0..3 {
                    min[i] = min[i].min(p[i]);
                    max[i] = max[i].max(p[i]);
                }
            }
        }
        (min, max)
    }

    #[test]
    fn test_make_box_topology() {
        let solid = make_box(1.0, 2.0, 3.0);

        let boundaries = solid.boundaries();
        assert_eq!(boundaries.len(), 1, "Box should have 1 shell");

        let shell = &boundaries[0];
        let faces: Vec<_> = shell.face_iter().collect();

        let mut edge_ids = std::collections::HashSet::new();
        for edge in shell.edge_iter() {
            edge_ids.insert(edge.id());
        }
        let mut vert_ids = std::collections::HashSet::new();
        for v in shell.vertex_iter() {
            vert_ids.insert(v.id());
        }

        assert_eq!(faces.len(), 6, "Box should have 6 faces");
        assert_eq!(edge_ids.len(), 12, "Box should have 12 edges");
        assert_eq!(vert_ids.len(), 8, "Box should have 8 vertices");
    }

    #[test]
    fn rect_region_extrudes_to_prism() {
        let plane = Plane::xy();
        let region = Region::solid(Shape2d::rect((0.0, 0.0), 14.0, 8.0));
        let face = region_face(&region, &plane).unwrap();
        let solid = builder::tsweep(&face, Vector3::new(0.0, 0.0, 8.0));

        let shell = &solid.boundaries()[0];
        assert_eq!(shell.face_iter().count(), 6);

        let (min, max) = vertex_bounds(&solid);
        let eps = 1e-10;
        assert!((min[0] + 7.0).abs() < eps && (max[0] - 7.0).abs() < eps);
        assert!((min[1] + 4.0).abs() < eps && (max[1] - 4.0).abs() < eps);
        assert!(min[2].abs() < eps && (max[2] - 8.0).abs() < eps);
    }

    #[test]
    fn region_with_hole_adds_bore_faces() {
        let plane = Plane::xy();
        let plain = Region::solid(Shape2d::rect((0.0, 0.0), 14.0, 8.0));
        let mut bored = plain.clone();
        bored.holes.push(Shape2d::circle((-2.5, 0.0), 3.05));

        let count = |region: &Region| {
            let face = region_face(region, &plane).unwrap();
            let solid = builder::tsweep(&face, Vector3::new(0.0, 0.0, 8.0));
            solid.boundaries()[0].face_iter().count()
        };
        assert!(count(&bored) > count(&plain));
    }

    #[test]
    fn cylinder_reaches_requested_height() {
        let solid = make_cylinder([1.0, 2.0, -1.0], [0.0, 0.0, 1.0], 2.0, 5.0).unwrap();
        let (min, max) = vertex_bounds(&solid);
        assert!((min[2] + 1.0).abs() < 1e-10);
        assert!((max[2] - 4.0).abs() < 1e-10);
        assert!(solid.boundaries()[0].face_iter().count() >= 3);
    }

    #[test]
    fn perpendicular_is_orthogonal() {
        for axis in [[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]] {
            let p = perpendicular(axis);
            assert!(part_types::math::dot(p, axis).abs() < 1e-12);
        }
    }
}
