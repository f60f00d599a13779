//! Tessellation wrapper with face-range metadata.
//!
//! Wraps truck-meshalgo to produce RenderMesh with FaceRange entries
//! that map triangle index ranges to logical faces.

use crate::types::*;
use truck_meshalgo::prelude::*;
use truck_meshalgo::tessellation::{MeshableShape, MeshedShape};

type TruckSolid = truck_modeling::Solid;

/// Area, centroid and bounds of one tessellated face.
#[derive(Debug, Clone, Copy)]
pub struct FaceMeshStats {
    pub area: f64,
    pub centroid: [f64; 3],
    pub bbox: [f64; 6],
}

/// Tessellate every lump of a body into one RenderMesh with per-face tracking.
pub fn tessellate_body(
    solids: &[TruckSolid],
    tolerance: f64,
    next_id: &mut u64,
) -> std::result::Result<RenderMesh, KernelError> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(KernelError::TessellationFailed {
            reason: format!("tolerance must be positive, got {}", tolerance),
        });
    }
    let mut out = RenderMesh::default();
    for solid in solids {
        tessellate_solid_into(solid, tolerance, next_id, &mut out);
    }
    if out.is_empty() {
        return Err(KernelError::TessellationFailed {
            reason: "no triangles produced".to_string(),
        });
    }
    Ok(out)
}

/// Tessellate one truck Solid, appending to `out`.
///
/// Each face is tessellated as part of the solid, then we iterate
/// the meshed faces to extract per-face triangle ranges.
fn tessellate_solid_into(solid: &TruckSolid, tolerance: f64, next_id: &mut u64, out: &mut RenderMesh) {
    let meshed_solid = solid.triangulation(tolerance);
    let before = out.indices.len();

    for shell in meshed_solid.boundaries().iter() {
        for face in shell.face_iter() {
            let face_id = KernelId(*next_id);
            *next_id += 1;

            let Some(face_mesh) = oriented_face_mesh(face.surface(), face.orientation()) else {
                continue;
            };
            append_mesh(out, &face_mesh, face_id);
        }
    }

    // Fallback if nothing was tessellated per face
    if out.indices.len() == before {
        let mesh = meshed_solid.to_polygon();
        let face_id = KernelId(*next_id);
        *next_id += 1;
        append_mesh(out, &mesh, face_id);
    }
}

/// A meshed face's polygon, inverted when the face is reversed.
fn oriented_face_mesh(mesh: Option<PolygonMesh>, orientation: bool) -> Option<PolygonMesh> {
    let mut mesh = mesh?;
    if !orientation {
        mesh.invert();
    }
    Some(mesh)
}

fn append_mesh(out: &mut RenderMesh, mesh: &PolygonMesh, face_id: KernelId) {
    let start_index = out.indices.len() as u32;
    let base_vertex = (out.vertices.len() / 3) as u32;

    let positions = mesh.positions();
    let normals = mesh.normals();

    for pos in positions {
        out.vertices.push(pos[0] as f32);
        out.vertices.push(pos[1] as f32);
        out.vertices.push(pos[2] as f32);
    }

    // Normals are attached per position only when the counts line up
    if normals.len() == positions.len() {
        for norm in normals {
            out.normals.push(norm[0] as f32);
            out.normals.push(norm[1] as f32);
            out.normals.push(norm[2] as f32);
        }
    } else {
        for _ in 0..positions.len() {
            out.normals.extend_from_slice(&[0.0, 0.0, 1.0]);
        }
    }

    for tri in mesh.tri_faces() {
        for v in tri.iter() {
            out.indices.push(v.pos as u32 + base_vertex);
        }
    }

    let end_index = out.indices.len() as u32;
    if end_index > start_index {
        out.face_ranges.push(FaceRange {
            face_id,
            start_index,
            end_index,
        });
    }
}

/// Per-face statistics in shell/face iteration order, matching the solid's own faces.
pub fn face_stats(solid: &TruckSolid, tolerance: f64) -> Vec<Option<FaceMeshStats>> {
    let meshed_solid = solid.triangulation(tolerance);
    let mut stats = Vec::new();
    for shell in meshed_solid.boundaries().iter() {
        for face in shell.face_iter() {
            let mesh = oriented_face_mesh(face.surface(), face.orientation());
            stats.push(mesh.as_ref().and_then(mesh_stats));
        }
    }
    stats
}

fn mesh_stats(mesh: &PolygonMesh) -> Option<FaceMeshStats> {
    let positions = mesh.positions();
    let mut area = 0.0;
    let mut weighted = [0.0f64; 3];
    let mut bbox = [f64::MAX, f64::MAX, f64::MAX, f64::MIN, f64::MIN, f64::MIN];

    for p in positions {
        for i in 0..3 {
            bbox[i] = bbox[i].min(p[i]);
            bbox[i + 3] = bbox[i + 3].max(p[i]);
        }
    }

    for tri in mesh.tri_faces() {
        let [a, b, c] = [positions[tri[0].pos], positions[tri[1].pos], positions[tri[2].pos]];
        let ab = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let ac = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let tri_area = part_types::math::length(part_types::math::cross(ab, ac)) / 2.0;
        area += tri_area;
        for i in 0..3 {
            weighted[i] += tri_area * (a[i] + b[i] + c[i]) / 3.0;
        }
    }

    if area <= 0.0 {
        return None;
    }
    Some(FaceMeshStats {
        area,
        centroid: [weighted[0] / area, weighted[1] / area, weighted[2] / area],
        bbox,
    })
}

/// Axis-aligned bounds of a solid's tessellation.
pub fn solid_bounds(solid: &TruckSolid, tolerance: f64) -> Option<[f64; 6]> {
    let mesh = solid.triangulation(tolerance).to_polygon();
    let positions = mesh.positions();
    if positions.is_empty() {
        return None;
    }
    let mut bbox = [f64::MAX, f64::MAX, f64::MAX, f64::MIN, f64::MIN, f64::MIN];
    for p in positions {
        for i in 0..3 {
            bbox[i] = bbox[i].min(p[i]);
            bbox[i + 3] = bbox[i + 3].max(p[i]);
        }
    }
    Some(bbox)
}

/// Union of two bounding boxes.
pub fn merge_bounds(a: Option<[f64; 6]>, b: Option<[f64; 6]>) -> Option<[f64; 6]> {
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

/// Whether two bounding boxes intersect (touching counts).
pub fn bounds_overlap(a: &[f64; 6], b: &[f64; 6]) -> bool {
    (0..3).all(|i| a[i] <= b[i + 3] && b[i] <= a[i + 3])
}
