//! End-to-end part builds on the truck kernel.

use std::f64::consts::PI;

use approx::assert_relative_eq;
use meiga_parts::{generate_parts, PartKind, PartReport, PartsConfig, RimParams, RimRevision};
use shape_kernel::{Kernel, KernelIntrospect, TruckKernel};
use test_harness::assertions::{assert_all_pass, assert_lumps, assert_volume};
use test_harness::oracle::{check_face_range_coverage, check_kernel_bounds, check_valid_indices};

const TOL: f64 = 0.01;

fn rim_volume(p: &RimParams) -> f64 {
    PI / 4.0 * (p.outer_diameter().powi(2) - p.pinion_diameter.powi(2)) * p.height
}

// ── LED holder ──────────────────────────────────────────────────────────────

#[test]
fn holder_on_truck() {
    let mut kernel = TruckKernel::new();
    let config = PartsConfig::default();
    let part = PartKind::LedsHolder.build(&config, &mut kernel).unwrap();
    let handle = &part.body.handle;

    assert_lumps(&kernel, handle, 2, "holder").unwrap();
    // 8 block faces plus 6 for the bar; bore walls may be split at seams
    assert!(kernel.list_faces(handle).len() >= 14);

    let bounds = check_kernel_bounds(&kernel, handle, [-7.0, -4.0, 0.0, 8.5, 4.0, 8.0], 1e-6);
    assert!(bounds.passed, "{}", bounds.detail);

    let mesh = kernel.tessellate(handle, TOL).unwrap();
    let expected = (14.0 * 8.0 - PI * 3.05 * 3.05 - PI * 2.05 * 2.05 + 1.0) * 8.0;
    assert_volume(&mesh, expected, 0.01, "holder").unwrap();
    assert_all_pass(
        &[check_valid_indices(&mesh), check_face_range_coverage(&mesh)],
        "holder mesh",
    )
    .unwrap();
}

// ── Rims ────────────────────────────────────────────────────────────────────

#[test]
fn every_rim_revision_on_truck() {
    let config = PartsConfig::default();
    for (kind, revision) in [
        (PartKind::Rim, RimRevision::Initial),
        (PartKind::RimV2, RimRevision::Margin),
        (PartKind::RimV3, RimRevision::MarginTight),
    ] {
        let mut kernel = TruckKernel::new();
        let part = kind.build(&config, &mut kernel).unwrap();
        let handle = &part.body.handle;
        let params = revision.params(&config.rim);

        assert_lumps(&kernel, handle, 1, kind.name()).unwrap();
        let bb = kernel.bounding_box(handle).unwrap();
        assert_relative_eq!(bb[3] - bb[0], params.outer_diameter(), epsilon = 1e-2);
        assert_relative_eq!(bb[5] - bb[2], 8.0, epsilon = 1e-6);

        let mesh = kernel.tessellate(handle, TOL).unwrap();
        assert_volume(&mesh, rim_volume(&params), 0.01, kind.name()).unwrap();
    }
}

#[test]
fn rim_report_and_step() {
    let mut kernel = TruckKernel::new();
    let part = PartKind::RimV2
        .build(&PartsConfig::default(), &mut kernel)
        .unwrap();
    let report = PartReport::gather(&mut kernel, &part, TOL).unwrap();
    assert_eq!(report.lumps, 1);
    assert_relative_eq!(report.dimensions["outer_diameter"], 15.3, epsilon = 1e-12);
    assert!(report.to_string().starts_with("rim_v2: 1 lump(s)"));

    let step = kernel.export_step(&part.body.handle, "rim_v2").unwrap();
    assert!(step.trim_start().starts_with("ISO-10303-21"));
}

// ── Generator ───────────────────────────────────────────────────────────────

#[test]
fn generate_rim_v3_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = PartsConfig::from_json(&format!(
        r#"{{ "output_dir": {:?}, "formats": ["stl", "stl-ascii", "step"] }}"#,
        dir.path().display().to_string()
    ))
    .unwrap();

    let mut kernel = TruckKernel::new();
    let manifest = generate_parts(&mut kernel, &config, &[PartKind::RimV3]).unwrap();

    let record = manifest.part("rim_v3").unwrap();
    assert_eq!(record.files.len(), 3);
    for file in &record.files {
        assert!(file.bytes > 0, "{} is empty", file.path.display());
    }
    let expected = rim_volume(&RimRevision::MarginTight.params(&config.rim));
    let volume = record.volume.unwrap();
    assert!((volume - expected).abs() / expected < 0.01);
}
