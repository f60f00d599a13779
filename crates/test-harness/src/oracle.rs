//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail instead of
//! panicking, so one pass over a part collects every failure.

use shape_kernel::{KernelIntrospect, KernelSolidHandle, RenderMesh};

use crate::helpers::edge_usage;

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::pass(name, detail)
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::fail(name, detail)
        }
    }
}

// ── Topology Oracles ────────────────────────────────────────────────────────

/// Check the number of disjoint solids in a body.
pub fn check_lump_count(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
    expected: usize,
) -> OracleVerdict {
    let lumps = introspect.lump_count(solid);
    if lumps == expected {
        OracleVerdict::pass_val("lump_count", format!("{} lumps", lumps), lumps as f64)
    } else {
        OracleVerdict::fail_val(
            "lump_count",
            format!("expected {} lumps, found {}", expected, lumps),
            lumps as f64,
        )
    }
}

/// Check the face count of a body.
pub fn check_face_count(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
    expected: usize,
) -> OracleVerdict {
    let faces = introspect.list_faces(solid).len();
    if faces == expected {
        OracleVerdict::pass_val("face_count", format!("{} faces", faces), faces as f64)
    } else {
        OracleVerdict::fail_val(
            "face_count",
            format!("expected {} faces, found {}", expected, faces),
            faces as f64,
        )
    }
}

/// Check every face reports a positive area.
pub fn check_face_validity(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
) -> OracleVerdict {
    let sigs = introspect.compute_all_signatures(solid, shape_kernel::TopoKind::Face);
    if sigs.is_empty() {
        return OracleVerdict::fail("face_validity", "body has no faces".to_string());
    }
    let bad: Vec<u64> = sigs
        .iter()
        .filter(|(_, sig)| !matches!(sig.area, Some(a) if a > 0.0))
        .map(|(id, _)| id.0)
        .collect();
    if bad.is_empty() {
        OracleVerdict::pass("face_validity", format!("{} faces with area", sigs.len()))
    } else {
        OracleVerdict::fail(
            "face_validity",
            format!("faces without area: {:?}", bad),
        )
    }
}

/// Compare the kernel's bounding box to an expected one, per coordinate.
pub fn check_kernel_bounds(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
    expected: [f64; 6],
    tolerance: f64,
) -> OracleVerdict {
    let Some(bbox) = introspect.bounding_box(solid) else {
        return OracleVerdict::fail("kernel_bounds", "body has no bounds".to_string());
    };
    let worst = bbox
        .iter()
        .zip(expected.iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f64, f64::max);
    if worst <= tolerance {
        OracleVerdict::pass_val("kernel_bounds", format!("{:?}", bbox), worst)
    } else {
        OracleVerdict::fail_val(
            "kernel_bounds",
            format!("bounds {:?} differ from {:?} by {:.4}", bbox, expected, worst),
            worst,
        )
    }
}

// ── Mesh Oracles ────────────────────────────────────────────────────────────

/// Check the mesh is closed: every edge shared by exactly two triangles.
///
/// Edges are matched by quantized position, since tessellators duplicate
/// vertices along face seams.
pub fn check_watertight_mesh(mesh: &RenderMesh) -> OracleVerdict {
    let usage = edge_usage(mesh);
    let open = usage.values().filter(|&&c| c != 2).count();
    if open == 0 {
        OracleVerdict::pass(
            "watertight_mesh",
            format!("{} edges, all shared by two triangles", usage.len()),
        )
    } else {
        OracleVerdict::fail_val(
            "watertight_mesh",
            format!("{} of {} edges not shared by exactly two triangles", open, usage.len()),
            open as f64,
        )
    }
}

/// Check no triangle has (near) zero area.
pub fn check_no_degenerate_triangles(mesh: &RenderMesh) -> OracleVerdict {
    let mut degenerate = 0usize;
    for tri in mesh.indices.chunks_exact(3) {
        let p = |i: u32| -> Option<[f64; 3]> {
            let i = i as usize * 3;
            let v = mesh.vertices.get(i..i + 3)?;
            Some([v[0] as f64, v[1] as f64, v[2] as f64])
        };
        let (Some(a), Some(b), Some(c)) = (p(tri[0]), p(tri[1]), p(tri[2])) else {
            continue;
        };
        let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let n = [
            u[1] * v[2] - u[2] * v[1],
            u[2] * v[0] - u[0] * v[2],
            u[0] * v[1] - u[1] * v[0],
        ];
        if (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt() / 2.0 < 1e-10 {
            degenerate += 1;
        }
    }
    if degenerate == 0 {
        OracleVerdict::pass(
            "no_degenerate_triangles",
            format!("{} triangles", mesh.triangle_count()),
        )
    } else {
        OracleVerdict::fail_val(
            "no_degenerate_triangles",
            format!("{} degenerate triangles", degenerate),
            degenerate as f64,
        )
    }
}

/// Check every index points at a vertex.
pub fn check_valid_indices(mesh: &RenderMesh) -> OracleVerdict {
    let vertex_count = mesh.vertices.len() / 3;
    if mesh.indices.len() % 3 != 0 {
        return OracleVerdict::fail(
            "valid_indices",
            format!("{} indices is not a multiple of 3", mesh.indices.len()),
        );
    }
    match mesh.indices.iter().find(|&&i| i as usize >= vertex_count) {
        None => OracleVerdict::pass(
            "valid_indices",
            format!("{} indices below {}", mesh.indices.len(), vertex_count),
        ),
        Some(i) => OracleVerdict::fail(
            "valid_indices",
            format!("index {} out of range ({} vertices)", i, vertex_count),
        ),
    }
}

/// Check face ranges tile the index buffer without gaps or overlaps.
pub fn check_face_range_coverage(mesh: &RenderMesh) -> OracleVerdict {
    let mut ranges: Vec<(u32, u32)> = mesh
        .face_ranges
        .iter()
        .map(|r| (r.start_index, r.end_index))
        .collect();
    ranges.sort_unstable();

    let mut cursor = 0u32;
    for (start, end) in ranges {
        if start != cursor || end < start {
            return OracleVerdict::fail(
                "face_range_coverage",
                format!("range {}..{} does not continue from {}", start, end, cursor),
            );
        }
        cursor = end;
    }
    if cursor as usize == mesh.indices.len() {
        OracleVerdict::pass(
            "face_range_coverage",
            format!("{} ranges cover {} indices", mesh.face_ranges.len(), cursor),
        )
    } else {
        OracleVerdict::fail(
            "face_range_coverage",
            format!("ranges end at {} of {} indices", cursor, mesh.indices.len()),
        )
    }
}

/// Check the mesh bounding box against expected extents.
pub fn check_bounding_box(
    mesh: &RenderMesh,
    expected_min: [f64; 3],
    expected_max: [f64; 3],
    tolerance: f64,
) -> OracleVerdict {
    let Some((min, max)) = mesh.bounding_box() else {
        return OracleVerdict::fail("bounding_box", "empty mesh".to_string());
    };
    let worst = (0..3)
        .map(|i| {
            (min[i] - expected_min[i])
                .abs()
                .max((max[i] - expected_max[i]).abs())
        })
        .fold(0.0f64, f64::max);
    if worst <= tolerance {
        OracleVerdict::pass_val(
            "bounding_box",
            format!("min {:?} max {:?}", min, max),
            worst,
        )
    } else {
        OracleVerdict::fail_val(
            "bounding_box",
            format!(
                "min {:?} max {:?}, expected min {:?} max {:?}",
                min, max, expected_min, expected_max
            ),
            worst,
        )
    }
}

/// Check the enclosed mesh volume is within a relative tolerance.
pub fn check_volume(mesh: &RenderMesh, expected: f64, rel_tolerance: f64) -> OracleVerdict {
    let volume = mesh.volume();
    let error = if expected.abs() > 0.0 {
        (volume - expected).abs() / expected.abs()
    } else {
        volume.abs()
    };
    if error <= rel_tolerance {
        OracleVerdict::pass_val(
            "volume",
            format!("{:.3} mm³ (expected {:.3})", volume, expected),
            volume,
        )
    } else {
        OracleVerdict::fail_val(
            "volume",
            format!(
                "{:.3} mm³, expected {:.3} within {:.1}%",
                volume,
                expected,
                rel_tolerance * 100.0
            ),
            volume,
        )
    }
}

/// Structural mesh checks every exported part should pass.
pub fn run_mesh_oracles(mesh: &RenderMesh) -> Vec<OracleVerdict> {
    vec![
        check_valid_indices(mesh),
        check_no_degenerate_triangles(mesh),
        check_watertight_mesh(mesh),
        check_face_range_coverage(mesh),
    ]
}
