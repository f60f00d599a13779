//! KernelIntrospect for TruckKernel: topology queries over stored bodies.
//!
//! Entity ids encode the owning body: faces are `handle * 10000 + i`,
//! edges `+ 1000 + i` and vertices `+ 2000 + i`, numbered across all lumps.

use std::collections::HashSet;

use crate::tessellation::{self, FaceMeshStats};
use crate::traits::KernelIntrospect;
use crate::truck_kernel::{TruckKernel, QUERY_TOL};
use crate::types::*;

use truck_modeling::geometry::Surface;
use truck_modeling::topology::{Edge, Face, Solid, Vertex};
use truck_modeling::{BoundedCurve, ParameterDivision1D};

const EDGE_BASE: u64 = 1000;
const VERTEX_BASE: u64 = 2000;

fn split_id(entity: KernelId) -> (KernelSolidHandle, u64) {
    (KernelSolidHandle(entity.0 / 10000), entity.0 % 10000)
}

fn faces_of<'a>(solids: &'a [Solid]) -> impl Iterator<Item = (usize, &'a Face)> + 'a {
    solids.iter().enumerate().flat_map(|(lump, solid)| {
        solid
            .boundaries()
            .iter()
            .flat_map(|shell| shell.face_iter())
            .map(move |face| (lump, face))
    })
}

fn unique_edges(solids: &[Solid]) -> Vec<Edge> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for shell in solids.iter().flat_map(|s| s.boundaries().iter()) {
        for edge in shell.edge_iter() {
            if seen.insert(edge.id()) {
                edges.push(edge);
            }
        }
    }
    edges
}

fn unique_vertices(solids: &[Solid]) -> Vec<Vertex> {
    let mut seen = HashSet::new();
    let mut vertices = Vec::new();
    for shell in solids.iter().flat_map(|s| s.boundaries().iter()) {
        for v in shell.vertex_iter() {
            if seen.insert(v.id()) {
                vertices.push(v);
            }
        }
    }
    vertices
}

impl KernelIntrospect for TruckKernel {
    fn list_faces(&self, solid: &KernelSolidHandle) -> Vec<KernelId> {
        let Some(solids) = self.get_body(solid) else {
            return Vec::new();
        };
        (0..faces_of(solids).count() as u64)
            .map(|i| KernelId(solid.id() * 10000 + i))
            .collect()
    }

    fn list_edges(&self, solid: &KernelSolidHandle) -> Vec<KernelId> {
        let Some(solids) = self.get_body(solid) else {
            return Vec::new();
        };
        (0..unique_edges(solids).len() as u64)
            .map(|i| KernelId(solid.id() * 10000 + EDGE_BASE + i))
            .collect()
    }

    fn list_vertices(&self, solid: &KernelSolidHandle) -> Vec<KernelId> {
        let Some(solids) = self.get_body(solid) else {
            return Vec::new();
        };
        (0..unique_vertices(solids).len() as u64)
            .map(|i| KernelId(solid.id() * 10000 + VERTEX_BASE + i))
            .collect()
    }

    fn lump_count(&self, solid: &KernelSolidHandle) -> usize {
        self.get_body(solid).map_or(0, <[Solid]>::len)
    }

    fn compute_signature(&self, entity: KernelId, kind: TopoKind) -> TopoSignature {
        let (handle, local) = split_id(entity);
        let Some(solids) = self.get_body(&handle) else {
            return TopoSignature::empty();
        };

        match kind {
            TopoKind::Face => {
                let Some((lump, face)) = faces_of(solids).nth(local as usize) else {
                    return TopoSignature::empty();
                };
                // position of the face inside its own lump
                let offset = faces_of(solids).take_while(|(l, _)| *l < lump).count();
                let stats = tessellation::face_stats(&solids[lump], QUERY_TOL);
                let face_stat = stats.get(local as usize - offset).copied().flatten();
                compute_face_signature(face, face_stat)
            }
            TopoKind::Edge => local
                .checked_sub(EDGE_BASE)
                .and_then(|i| unique_edges(solids).get(i as usize).map(compute_edge_signature))
                .unwrap_or_else(TopoSignature::empty),
            TopoKind::Vertex => local
                .checked_sub(VERTEX_BASE)
                .and_then(|i| {
                    unique_vertices(solids)
                        .get(i as usize)
                        .map(compute_vertex_signature)
                })
                .unwrap_or_else(TopoSignature::empty),
            TopoKind::Solid => TopoSignature::empty(),
        }
    }

    /// Faces are tessellated once per lump instead of once per face.
    fn compute_all_signatures(
        &self,
        solid: &KernelSolidHandle,
        kind: TopoKind,
    ) -> Vec<(KernelId, TopoSignature)> {
        let Some(solids) = self.get_body(solid) else {
            return Vec::new();
        };
        if kind != TopoKind::Face {
            let ids = match kind {
                TopoKind::Edge => self.list_edges(solid),
                TopoKind::Vertex => self.list_vertices(solid),
                _ => Vec::new(),
            };
            return ids
                .into_iter()
                .map(|id| (id, self.compute_signature(id, kind)))
                .collect();
        }

        let mut out = Vec::new();
        for lump in solids {
            let stats = tessellation::face_stats(lump, QUERY_TOL);
            let faces = lump.boundaries().iter().flat_map(|shell| shell.face_iter());
            for (i, face) in faces.enumerate() {
                let id = KernelId(solid.id() * 10000 + out.len() as u64);
                let sig = compute_face_signature(face, stats.get(i).copied().flatten());
                out.push((id, sig));
            }
        }
        out
    }

    fn bounding_box(&self, solid: &KernelSolidHandle) -> Option<[f64; 6]> {
        self.get_body(solid)?
            .iter()
            .map(|s| tessellation::solid_bounds(s, QUERY_TOL))
            .fold(None, tessellation::merge_bounds)
    }
}

fn compute_face_signature(face: &Face, stats: Option<FaceMeshStats>) -> TopoSignature {
    let surface = face.oriented_surface();
    let normal = match &surface {
        Surface::Plane(plane) => {
            let n = plane.normal();
            Some([n[0], n[1], n[2]])
        }
        _ => None,
    };

    TopoSignature {
        surface_type: Some(classify_surface(&surface)),
        area: stats.map(|s| s.area),
        centroid: stats.map(|s| s.centroid),
        normal,
        bbox: stats.map(|s| s.bbox),
        length: None,
    }
}

fn classify_surface(surface: &Surface) -> String {
    match surface {
        Surface::Plane(_) => "planar".to_string(),
        Surface::RevolutedCurve(_) => "revolved".to_string(),
        Surface::BSplineSurface(_) => "nurbs".to_string(),
        Surface::NurbsSurface(_) => "nurbs".to_string(),
    }
}

fn compute_edge_signature(edge: &Edge) -> TopoSignature {
    let curve = edge.oriented_curve();
    let (_params, points) = curve.parameter_division(curve.range_tuple(), QUERY_TOL);

    let length: f64 = points
        .windows(2)
        .map(|w| {
            let d = w[1] - w[0];
            (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
        })
        .sum();
    let front = edge.front().point();
    let back = edge.back().point();
    let centroid = [
        (front[0] + back[0]) / 2.0,
        (front[1] + back[1]) / 2.0,
        (front[2] + back[2]) / 2.0,
    ];
    let kind = if points.len() <= 2 { "line" } else { "curve" };

    TopoSignature {
        surface_type: Some(kind.to_string()),
        centroid: Some(centroid),
        length: Some(length),
        ..TopoSignature::empty()
    }
}

fn compute_vertex_signature(vertex: &Vertex) -> TopoSignature {
    let p = vertex.point();
    TopoSignature {
        surface_type: Some("point".to_string()),
        centroid: Some([p[0], p[1], p[2]]),
        ..TopoSignature::empty()
    }
}
