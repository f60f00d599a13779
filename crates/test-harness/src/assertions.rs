//! Assertion helpers with diagnostic output.
//!
//! Every failure names the context string passed by the caller along with
//! expected and actual values.

use shape_kernel::{KernelIntrospect, KernelSolidHandle, RenderMesh};

use crate::helpers::HarnessError;
use crate::oracle::{self, OracleVerdict};

/// Assert exact topology counts (V, E, F) for a body.
pub fn assert_topology_eq(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
    expected_v: usize,
    expected_e: usize,
    expected_f: usize,
    ctx: &str,
) -> Result<(), HarnessError> {
    let v = introspect.list_vertices(solid).len();
    let e = introspect.list_edges(solid).len();
    let f = introspect.list_faces(solid).len();

    if v == expected_v && e == expected_e && f == expected_f {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] expected V={} E={} F={}, got V={} E={} F={}",
                ctx, expected_v, expected_e, expected_f, v, e, f,
            ),
        })
    }
}

/// Assert the number of disjoint solids in a body.
pub fn assert_lumps(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
    expected: usize,
    ctx: &str,
) -> Result<(), HarnessError> {
    verdict_ok(oracle::check_lump_count(introspect, solid, expected), ctx)
}

/// Assert the mesh bounding box matches expected values within tolerance.
pub fn assert_bounding_box(
    mesh: &RenderMesh,
    expected_min: [f64; 3],
    expected_max: [f64; 3],
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let (actual_min, actual_max) = mesh.bounding_box().ok_or_else(|| {
        HarnessError::AssertionFailed {
            detail: format!("[{}] mesh is empty", ctx),
        }
    })?;

    for i in 0..3 {
        if (actual_min[i] - expected_min[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box min[{}]: expected {:.3}, got {:.3} (tol={})",
                    ctx, i, expected_min[i], actual_min[i], tol,
                ),
            });
        }
        if (actual_max[i] - expected_max[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box max[{}]: expected {:.3}, got {:.3} (tol={})",
                    ctx, i, expected_max[i], actual_max[i], tol,
                ),
            });
        }
    }
    Ok(())
}

/// Assert the mesh volume within a relative tolerance.
pub fn assert_volume(
    mesh: &RenderMesh,
    expected: f64,
    rel_tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    verdict_ok(oracle::check_volume(mesh, expected, rel_tol), ctx)
}

/// Assert every verdict passed, reporting the first failure.
pub fn assert_all_pass(verdicts: &[OracleVerdict], ctx: &str) -> Result<(), HarnessError> {
    match verdicts.iter().find(|v| !v.passed) {
        None => Ok(()),
        Some(v) => Err(HarnessError::OracleFailure {
            oracle: v.oracle_name.clone(),
            detail: format!("[{}] {}", ctx, v.detail),
        }),
    }
}

fn verdict_ok(verdict: OracleVerdict, ctx: &str) -> Result<(), HarnessError> {
    assert_all_pass(std::slice::from_ref(&verdict), ctx)
}
