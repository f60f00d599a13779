//! Helper functions: error type and mesh edge bookkeeping.

use std::collections::HashMap;

use shape_kernel::RenderMesh;

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },

    #[error("kernel error: {0}")]
    Kernel(#[from] shape_kernel::KernelError),
}

// ── Mesh Edges ──────────────────────────────────────────────────────────────

pub(crate) type PosKey = (i64, i64, i64);
pub(crate) type PosEdge = (PosKey, PosKey);

/// Quantize a position to 1e-4 so per-face vertex copies compare equal.
fn quantize(mesh: &RenderMesh, idx: u32) -> Option<PosKey> {
    let i = idx as usize * 3;
    let p = mesh.vertices.get(i..i + 3)?;
    let q = |v: f32| (v as f64 * 10000.0).round() as i64;
    Some((q(p[0]), q(p[1]), q(p[2])))
}

/// How many triangles use each edge, matched by position rather than index.
pub(crate) fn edge_usage(mesh: &RenderMesh) -> HashMap<PosEdge, usize> {
    let mut counts = HashMap::new();
    for tri in mesh.indices.chunks_exact(3) {
        let (Some(a), Some(b), Some(c)) = (
            quantize(mesh, tri[0]),
            quantize(mesh, tri[1]),
            quantize(mesh, tri[2]),
        ) else {
            continue;
        };
        for (p, q) in [(a, b), (b, c), (c, a)] {
            if p == q {
                continue;
            }
            *counts.entry((p.min(q), p.max(q))).or_insert(0) += 1;
        }
    }
    counts
}

/// Count mesh edges: returns (total_edges, boundary_edges).
///
/// A boundary edge is used by exactly one triangle.
/// For a watertight mesh, boundary_edges should be 0.
pub fn count_mesh_edges(mesh: &RenderMesh) -> (usize, usize) {
    let usage = edge_usage(mesh);
    let boundary = usage.values().filter(|&&c| c == 1).count();
    (usage.len(), boundary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_triangle_is_all_boundary() {
        let mesh = RenderMesh {
            vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            normals: vec![],
            indices: vec![0, 1, 2],
            face_ranges: vec![],
        };
        assert_eq!(count_mesh_edges(&mesh), (3, 3));
    }

    #[test]
    fn duplicated_positions_are_merged() {
        // two triangles sharing an edge through copied vertices
        let mesh = RenderMesh {
            vertices: vec![
                0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
                1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0,
            ],
            normals: vec![],
            indices: vec![0, 1, 2, 3, 4, 5],
            face_ranges: vec![],
        };
        assert_eq!(count_mesh_edges(&mesh), (5, 4));
    }
}
