//! MockKernel: a deterministic test double implementing Kernel + KernelIntrospect.
//!
//! Bodies are kept as analytic prisms (a region swept along a direction)
//! plus the prisms cut out of them. Topology and signatures are derived
//! from that description, so counts and face positions are exact.
//! Used by modeling-ops and parts for unit testing.

use crate::primitives::perpendicular;
use crate::traits::{Kernel, KernelIntrospect};
use crate::types::*;
use part_types::math;
use std::collections::HashMap;
use std::f64::consts::PI;

/// A region on a plane swept `depth` along the unit vector `dir`.
#[derive(Debug, Clone)]
struct MockPrism {
    plane: Plane,
    region: Region,
    dir: [f64; 3],
    depth: f64,
}

impl MockPrism {
    fn point(&self, (u, v): (f64, f64), t: f64) -> [f64; 3] {
        math::add(self.plane.to_world(u, v), math::scale(self.dir, t))
    }

    fn bounds(&self) -> [f64; 6] {
        let (u0, v0, u1, v1) = self.region.outer.bounds();
        let mut bb = [f64::MAX, f64::MAX, f64::MAX, f64::MIN, f64::MIN, f64::MIN];
        for uv in [(u0, v0), (u1, v0), (u1, v1), (u0, v1)] {
            for t in [0.0, self.depth] {
                let p = self.point(uv, t);
                for i in 0..3 {
                    bb[i] = bb[i].min(p[i]);
                    bb[i + 3] = bb[i + 3].max(p[i]);
                }
            }
        }
        bb
    }

    fn volume(&self) -> f64 {
        self.region.area() * self.depth
    }
}

#[derive(Debug, Clone, Default)]
struct MockBody {
    prisms: Vec<MockPrism>,
    cuts: Vec<MockPrism>,
}

impl MockBody {
    fn bounds(&self) -> Option<[f64; 6]> {
        self.prisms
            .iter()
            .map(|p| Some(p.bounds()))
            .fold(None, merge)
    }
}

fn merge(a: Option<[f64; 6]>, b: Option<[f64; 6]>) -> Option<[f64; 6]> {
    match (a, b) {
        (Some(a), Some(b)) => Some([
            a[0].min(b[0]),
            a[1].min(b[1]),
            a[2].min(b[2]),
            a[3].max(b[3]),
            a[4].max(b[4]),
            a[5].max(b[5]),
        ]),
        (a, None) => a,
        (None, b) => b,
    }
}

fn overlaps(a: &[f64; 6], b: &[f64; 6]) -> bool {
    (0..3).all(|i| a[i] <= b[i + 3] && b[i] <= a[i + 3])
}

/// Synthetic topology of a body, in id order.
#[derive(Debug, Default)]
struct MockTopology {
    faces: Vec<TopoSignature>,
    edges: Vec<TopoSignature>,
    vertices: Vec<TopoSignature>,
}

impl MockTopology {
    fn of(body: &MockBody) -> Self {
        let mut topo = Self::default();
        for prism in &body.prisms {
            topo.push_caps(prism);
            topo.push_walls(prism, &prism.region.outer, false);
            for hole in &prism.region.holes {
                topo.push_walls(prism, hole, true);
            }
        }
        for cut in &body.cuts {
            topo.push_walls(cut, &cut.region.outer, true);
        }
        topo
    }

    fn push_caps(&mut self, prism: &MockPrism) {
        let region = &prism.region;
        let area = region.area();
        let (cu, cv) = region_centroid(region);
        for (t, normal) in [
            (0.0, math::scale(prism.dir, -1.0)),
            (prism.depth, prism.dir),
        ] {
            self.faces.push(TopoSignature {
                surface_type: Some("planar".to_string()),
                area: Some(area),
                centroid: Some(prism.point((cu, cv), t)),
                normal: Some(normal),
                ..TopoSignature::empty()
            });
        }
    }

    /// Side walls swept from one boundary curve. Hole walls face inward.
    fn push_walls(&mut self, prism: &MockPrism, shape: &Shape2d, inward: bool) {
        let mid = prism.depth / 2.0;
        let flip = if inward { -1.0 } else { 1.0 };
        match *shape {
            Shape2d::Rect {
                center: (cu, cv),
                width,
                height,
            } => {
                let (hw, hh) = (width / 2.0, height / 2.0);
                let x = prism.plane.x_dir;
                let y = prism.plane.y_dir();
                let sides = [
                    ((cu + hw, cv), x, height),
                    ((cu - hw, cv), math::scale(x, -1.0), height),
                    ((cu, cv + hh), y, width),
                    ((cu, cv - hh), math::scale(y, -1.0), width),
                ];
                for (uv, normal, len) in sides {
                    self.faces.push(TopoSignature {
                        surface_type: Some("planar".to_string()),
                        area: Some(len * prism.depth),
                        centroid: Some(prism.point(uv, mid)),
                        normal: Some(math::scale(normal, flip)),
                        ..TopoSignature::empty()
                    });
                }

                let corners = [
                    (cu - hw, cv - hh),
                    (cu + hw, cv - hh),
                    (cu + hw, cv + hh),
                    (cu - hw, cv + hh),
                ];
                let lengths = [width, height, width, height];
                for t in [0.0, prism.depth] {
                    for i in 0..4 {
                        let (a, b) = (corners[i], corners[(i + 1) % 4]);
                        let midpoint = ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
                        self.push_edge(prism.point(midpoint, t), lengths[i], "line");
                        self.push_vertex(prism.point(a, t));
                    }
                }
                for c in corners {
                    self.push_edge(prism.point(c, mid), prism.depth, "line");
                }
            }
            Shape2d::Circle {
                center: (cu, cv),
                radius,
            } => {
                self.faces.push(TopoSignature {
                    surface_type: Some("cylindrical".to_string()),
                    area: Some(2.0 * PI * radius * prism.depth),
                    centroid: Some(prism.point((cu, cv), mid)),
                    ..TopoSignature::empty()
                });
                for t in [0.0, prism.depth] {
                    self.push_edge(prism.point((cu, cv), t), 2.0 * PI * radius, "curve");
                    self.push_vertex(prism.point((cu + radius, cv), t));
                }
                self.push_edge(prism.point((cu + radius, cv), mid), prism.depth, "line");
            }
        }
    }

    fn push_edge(&mut self, centroid: [f64; 3], length: f64, kind: &str) {
        self.edges.push(TopoSignature {
            surface_type: Some(kind.to_string()),
            centroid: Some(centroid),
            length: Some(length),
            ..TopoSignature::empty()
        });
    }

    fn push_vertex(&mut self, position: [f64; 3]) {
        self.vertices.push(TopoSignature {
            surface_type: Some("point".to_string()),
            centroid: Some(position),
            ..TopoSignature::empty()
        });
    }
}

fn region_centroid(region: &Region) -> (f64, f64) {
    let mut area = region.outer.area();
    let (ou, ov) = region.outer.center();
    let (mut su, mut sv) = (ou * area, ov * area);
    for hole in &region.holes {
        let a = hole.area();
        let (hu, hv) = hole.center();
        su -= hu * a;
        sv -= hv * a;
        area -= a;
    }
    if area <= 0.0 {
        return (ou, ov);
    }
    (su / area, sv / area)
}

/// Deterministic test double for the geometry kernel.
/// Implements both Kernel and KernelIntrospect.
pub struct MockKernel {
    next_id: u64,
    next_handle: u64,
    bodies: HashMap<u64, MockBody>,
    /// Faces created by make_region_face, awaiting extrude.
    standalone_faces: HashMap<u64, (Region, Plane)>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            next_handle: 1,
            bodies: HashMap::new(),
            standalone_faces: HashMap::new(),
        }
    }

    fn alloc_id(&mut self) -> KernelId {
        let id = KernelId(self.next_id);
        self.next_id += 1;
        id
    }

    fn alloc_handle(&mut self) -> KernelSolidHandle {
        let h = KernelSolidHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    fn store(&mut self, body: MockBody) -> KernelSolidHandle {
        let handle = self.alloc_handle();
        self.bodies.insert(handle.id(), body);
        handle
    }

    fn body(&self, handle: &KernelSolidHandle) -> Result<&MockBody, KernelError> {
        self.bodies
            .get(&handle.id())
            .ok_or(KernelError::EntityNotFound {
                id: KernelId(handle.id()),
            })
    }

    fn topology(&self, handle: &KernelSolidHandle) -> MockTopology {
        self.bodies
            .get(&handle.id())
            .map(MockTopology::of)
            .unwrap_or_default()
    }

    /// Analytic volume: prisms minus the part of each cut that lies
    /// within the body's extent along the cut axis.
    pub fn volume(&self, handle: &KernelSolidHandle) -> Option<f64> {
        let body = self.bodies.get(&handle.id())?;
        let bounds = body.bounds()?;
        let solid: f64 = body.prisms.iter().map(MockPrism::volume).sum();
        let removed: f64 = body
            .cuts
            .iter()
            .map(|cut| {
                let base = cut.plane.origin;
                let (lo, hi) = (0..3).fold((f64::MIN, f64::MAX), |(lo, hi), i| {
                    if cut.dir[i].abs() < 1e-12 {
                        return (lo, hi);
                    }
                    let a = (bounds[i] - base[i]) / cut.dir[i];
                    let b = (bounds[i + 3] - base[i]) / cut.dir[i];
                    (lo.max(a.min(b)), hi.min(a.max(b)))
                });
                let inside = (hi.min(cut.depth) - lo.max(0.0)).max(0.0);
                cut.region.area() * inside
            })
            .sum();
        Some(solid - removed)
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for MockKernel {
    fn make_region_face(&mut self, region: &Region, plane: &Plane) -> Result<KernelId, KernelError> {
        if region.outer.is_degenerate() {
            return Err(KernelError::FaceFailed {
                reason: format!("degenerate outer boundary: {:?}", region.outer),
            });
        }
        let mut seen = Region::solid(region.outer);
        for hole in &region.holes {
            if !seen.accepts_hole(hole) {
                return Err(KernelError::FaceFailed {
                    reason: format!("hole {:?} does not fit the boundary", hole),
                });
            }
            seen.holes.push(*hole);
        }
        let id = self.alloc_id();
        self.standalone_faces.insert(id.0, (region.clone(), *plane));
        Ok(id)
    }

    fn extrude_faces(
        &mut self,
        faces: &[KernelId],
        direction: [f64; 3],
        depth: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        let dir = math::normalize(direction).ok_or_else(|| KernelError::InvalidArgument {
            reason: "extrude direction has zero length".to_string(),
        })?;
        if !(depth.is_finite() && depth > 0.0) {
            return Err(KernelError::InvalidArgument {
                reason: format!("extrude depth must be positive, got {}", depth),
            });
        }
        if faces.is_empty() {
            return Err(KernelError::InvalidArgument {
                reason: "no faces to extrude".to_string(),
            });
        }

        let mut body = MockBody::default();
        for &face in faces {
            let (region, plane) = self
                .standalone_faces
                .remove(&face.0)
                .ok_or(KernelError::EntityNotFound { id: face })?;
            body.prisms.push(MockPrism {
                plane,
                region,
                dir,
                depth,
            });
        }
        Ok(self.store(body))
    }

    fn make_cylinder(
        &mut self,
        base: [f64; 3],
        axis: [f64; 3],
        radius: f64,
        height: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        let axis = math::normalize(axis).ok_or_else(|| KernelError::InvalidArgument {
            reason: "cylinder axis has zero length".to_string(),
        })?;
        if !(radius > 0.0 && height > 0.0) {
            return Err(KernelError::InvalidArgument {
                reason: format!("cylinder needs positive size, got r={} h={}", radius, height),
            });
        }
        let plane = Plane::new(base, perpendicular(axis), axis).ok_or_else(|| {
            KernelError::InvalidArgument {
                reason: "cannot build cylinder base plane".to_string(),
            }
        })?;
        let body = MockBody {
            prisms: vec![MockPrism {
                plane,
                region: Region::solid(Shape2d::circle((0.0, 0.0), radius)),
                dir: axis,
                depth: height,
            }],
            cuts: Vec::new(),
        };
        Ok(self.store(body))
    }

    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let mut merged = self.body(a)?.clone();
        let other = self.body(b)?.clone();
        merged.prisms.extend(other.prisms);
        merged.cuts.extend(other.cuts);
        Ok(self.store(merged))
    }

    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let mut target = self.body(a)?.clone();
        let tool = self.body(b)?.clone();
        let target_box = target.bounds();
        for prism in tool.prisms {
            let hits = target_box.is_some_and(|tb| overlaps(&tb, &prism.bounds()));
            if hits {
                target.cuts.push(prism);
            }
        }
        Ok(self.store(target))
    }

    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError> {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(KernelError::TessellationFailed {
                reason: format!("tolerance must be positive, got {}", tolerance),
            });
        }
        let bb = self
            .body(solid)?
            .bounds()
            .ok_or_else(|| KernelError::TessellationFailed {
                reason: "empty body".to_string(),
            })?;

        // Bounding box as 12 outward-wound triangles.
        let (x0, y0, z0, x1, y1, z1) = (bb[0], bb[1], bb[2], bb[3], bb[4], bb[5]);
        let corners = [
            [x0, y0, z0],
            [x1, y0, z0],
            [x1, y1, z0],
            [x0, y1, z0],
            [x0, y0, z1],
            [x1, y0, z1],
            [x1, y1, z1],
            [x0, y1, z1],
        ];
        let vertices: Vec<f32> = corners.iter().flatten().map(|&c| c as f32).collect();
        let indices: Vec<u32> = vec![
            0, 2, 1, 0, 3, 2, // bottom
            4, 5, 6, 4, 6, 7, // top
            0, 1, 5, 0, 5, 4, // front
            2, 3, 7, 2, 7, 6, // back
            0, 4, 7, 0, 7, 3, // left
            1, 2, 6, 1, 6, 5, // right
        ];
        let face_id = self.alloc_id();
        Ok(RenderMesh {
            normals: vec![0.0; vertices.len()],
            vertices,
            face_ranges: vec![FaceRange {
                face_id,
                start_index: 0,
                end_index: indices.len() as u32,
            }],
            indices,
        })
    }

    fn export_step(&self, solid: &KernelSolidHandle, name: &str) -> Result<String, KernelError> {
        let body = self.body(solid)?;
        Ok(format!(
            "ISO-10303-21;\nHEADER;\nFILE_DESCRIPTION(('mock'),'2;1');\n\
             FILE_NAME('{}','',(''),(''),'','meiga-parts','');\nENDSEC;\nDATA;\n\
             /* {} prisms, {} cuts */\nENDSEC;\nEND-ISO-10303-21;\n",
            name,
            body.prisms.len(),
            body.cuts.len()
        ))
    }
}

impl KernelIntrospect for MockKernel {
    fn list_faces(&self, solid: &KernelSolidHandle) -> Vec<KernelId> {
        let n = self.topology(solid).faces.len() as u64;
        (0..n).map(|i| KernelId(solid.id() * 10000 + i)).collect()
    }

    fn list_edges(&self, solid: &KernelSolidHandle) -> Vec<KernelId> {
        let n = self.topology(solid).edges.len() as u64;
        (0..n)
            .map(|i| KernelId(solid.id() * 10000 + 1000 + i))
            .collect()
    }

    fn list_vertices(&self, solid: &KernelSolidHandle) -> Vec<KernelId> {
        let n = self.topology(solid).vertices.len() as u64;
        (0..n)
            .map(|i| KernelId(solid.id() * 10000 + 2000 + i))
            .collect()
    }

    /// Prisms whose bounds touch are counted as one lump.
    fn lump_count(&self, solid: &KernelSolidHandle) -> usize {
        let Some(body) = self.bodies.get(&solid.id()) else {
            return 0;
        };
        let boxes: Vec<[f64; 6]> = body.prisms.iter().map(MockPrism::bounds).collect();
        let mut group: Vec<usize> = (0..boxes.len()).collect();
        for i in 0..boxes.len() {
            for j in (i + 1)..boxes.len() {
                if overlaps(&boxes[i], &boxes[j]) {
                    let (from, to) = (group[j], group[i]);
                    for g in group.iter_mut() {
                        if *g == from {
                            *g = to;
                        }
                    }
                }
            }
        }
        group.sort_unstable();
        group.dedup();
        group.len()
    }

    fn compute_signature(&self, entity: KernelId, kind: TopoKind) -> TopoSignature {
        let handle = KernelSolidHandle(entity.0 / 10000);
        let local = entity.0 % 10000;
        let topo = self.topology(&handle);
        let found = match kind {
            TopoKind::Face => topo.faces.get(local as usize),
            TopoKind::Edge => local
                .checked_sub(1000)
                .and_then(|i| topo.edges.get(i as usize)),
            TopoKind::Vertex => local
                .checked_sub(2000)
                .and_then(|i| topo.vertices.get(i as usize)),
            TopoKind::Solid => None,
        };
        found.cloned().unwrap_or_else(TopoSignature::empty)
    }

    fn bounding_box(&self, solid: &KernelSolidHandle) -> Option<[f64; 6]> {
        self.bodies.get(&solid.id())?.bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use part_types::{Axis, FaceSelector};

    fn prism(kernel: &mut MockKernel, regions: &[Region], depth: f64) -> KernelSolidHandle {
        let faces: Vec<KernelId> = regions
            .iter()
            .map(|r| kernel.make_region_face(r, &Plane::xy()).unwrap())
            .collect();
        kernel.extrude_faces(&faces, [0.0, 0.0, 1.0], depth).unwrap()
    }

    #[test]
    fn box_has_exact_topology() {
        let mut mk = MockKernel::new();
        let h = prism(
            &mut mk,
            &[Region::solid(Shape2d::rect((0.0, 0.0), 2.0, 3.0))],
            4.0,
        );
        assert_eq!(mk.list_faces(&h).len(), 6);
        assert_eq!(mk.list_edges(&h).len(), 12);
        assert_eq!(mk.list_vertices(&h).len(), 8);
        assert_relative_eq!(mk.volume(&h).unwrap(), 24.0);
    }

    #[test]
    fn disc_with_bore() {
        let mut mk = MockKernel::new();
        let mut region = Region::solid(Shape2d::circle((0.0, 0.0), 7.75));
        region.holes.push(Shape2d::circle((0.0, 0.0), 3.35));
        let h = prism(&mut mk, &[region.clone()], 8.0);

        // two caps, outer wall, bore wall
        assert_eq!(mk.list_faces(&h).len(), 4);
        assert_relative_eq!(mk.volume(&h).unwrap(), region.area() * 8.0, epsilon = 1e-9);

        let sigs = mk.compute_all_signatures(&h, TopoKind::Face);
        let top = FaceSelector::Max(Axis::Z).select(&sigs);
        assert_eq!(top.len(), 1);
        let sig = mk.compute_signature(top[0], TopoKind::Face);
        assert_eq!(sig.normal, Some([0.0, 0.0, 1.0]));
        assert_relative_eq!(sig.centroid.unwrap()[2], 8.0);
    }

    #[test]
    fn rect_hole_walls_face_inward() {
        let mut mk = MockKernel::new();
        let mut region = Region::solid(Shape2d::rect((0.0, 0.0), 10.0, 10.0));
        region.holes.push(Shape2d::rect((0.0, 0.0), 2.0, 2.0));
        let h = prism(&mut mk, &[region], 1.0);

        let sigs = mk.compute_all_signatures(&h, TopoKind::Face);
        let along_x = FaceSelector::Along(Axis::X).select(&sigs);
        assert_eq!(along_x.len(), 2);
        let xs: Vec<f64> = along_x
            .iter()
            .map(|id| mk.compute_signature(*id, TopoKind::Face).centroid.unwrap()[0])
            .collect();
        assert!(xs.contains(&5.0));
        assert!(xs.contains(&-1.0));
    }

    #[test]
    fn subtracting_a_cylinder_removes_its_overlap() {
        let mut mk = MockKernel::new();
        let h = prism(
            &mut mk,
            &[Region::solid(Shape2d::rect((0.0, 0.0), 10.0, 10.0))],
            2.0,
        );
        let tool = mk.make_cylinder([0.0, 0.0, -5.0], [0.0, 0.0, 1.0], 1.0, 20.0).unwrap();
        let cut = mk.boolean_subtract(&h, &tool).unwrap();
        assert_relative_eq!(mk.volume(&cut).unwrap(), 200.0 - PI * 2.0, epsilon = 1e-9);
        assert_eq!(mk.list_faces(&cut).len(), 7);
    }

    #[test]
    fn subtract_ignores_distant_tools() {
        let mut mk = MockKernel::new();
        let h = prism(
            &mut mk,
            &[Region::solid(Shape2d::rect((0.0, 0.0), 1.0, 1.0))],
            1.0,
        );
        let far = mk.make_cylinder([50.0, 0.0, 0.0], [0.0, 0.0, 1.0], 1.0, 1.0).unwrap();
        let cut = mk.boolean_subtract(&h, &far).unwrap();
        assert_relative_eq!(mk.volume(&cut).unwrap(), 1.0);
    }

    #[test]
    fn lumps_follow_bounds() {
        let mut mk = MockKernel::new();
        let apart = prism(
            &mut mk,
            &[
                Region::solid(Shape2d::rect((0.0, 0.0), 14.0, 8.0)),
                Region::solid(Shape2d::rect((8.0, 0.0), 1.0, 1.0)),
            ],
            8.0,
        );
        assert_eq!(mk.lump_count(&apart), 2);

        let a = prism(&mut mk, &[Region::solid(Shape2d::rect((0.0, 0.0), 2.0, 2.0))], 1.0);
        let b = prism(&mut mk, &[Region::solid(Shape2d::rect((0.5, 0.0), 2.0, 2.0))], 1.0);
        let fused = mk.boolean_union(&a, &b).unwrap();
        assert_eq!(mk.lump_count(&fused), 1);
    }

    #[test]
    fn rejects_hole_outside_boundary() {
        let mut mk = MockKernel::new();
        let mut region = Region::solid(Shape2d::rect((0.0, 0.0), 2.0, 2.0));
        region.holes.push(Shape2d::circle((5.0, 0.0), 0.5));
        assert!(matches!(
            mk.make_region_face(&region, &Plane::xy()),
            Err(KernelError::FaceFailed { .. })
        ));
    }

    #[test]
    fn tessellation_is_bounding_box() {
        let mut mk = MockKernel::new();
        let h = prism(
            &mut mk,
            &[Region::solid(Shape2d::rect((1.0, 1.0), 2.0, 2.0))],
            3.0,
        );
        let mesh = mk.tessellate(&h, 0.1).unwrap();
        assert_eq!(mesh.triangle_count(), 12);
        assert_relative_eq!(mesh.volume(), 12.0, epsilon = 1e-6);
        assert!(mk.tessellate(&h, 0.0).is_err());
    }

    #[test]
    fn step_text_names_part() {
        let mut mk = MockKernel::new();
        let h = prism(&mut mk, &[Region::solid(Shape2d::circle((0.0, 0.0), 1.0))], 1.0);
        let step = mk.export_step(&h, "rim").unwrap();
        assert!(step.starts_with("ISO-10303-21;"));
        assert!(step.contains("'rim'"));
    }
}
