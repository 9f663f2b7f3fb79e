//! Workflow regression tests against MockKernel.
//!
//! These scenarios drive the public modeling API through ModelBuilder and
//! check bounds, mesh oracles, and registry state at each step.

use igniscad::{Axis, BoundingBox, IgnisConfig, IgnisError};
use test_harness::assertions::{assert_all_pass, assert_bbox_near, assert_bounding_box, assert_registry};
use test_harness::oracle;
use test_harness::{HarnessError, ModelBuilder};

// ── Scenario 1: Single primitive ────────────────────────────────────────

#[test]
fn test_pole_basic() {
    let mut m = ModelBuilder::mock();
    m.cylinder("pole", 5.0, 38.0).unwrap();
    m.assert_has_solid("pole").unwrap();

    let mesh = m.tessellate("pole").unwrap();
    assert_eq!(mesh.triangle_count(), 12, "mock proxy mesh is a box");
    assert_bounding_box(&mesh, [-5.0, -5.0, -19.0], [5.0, 5.0, 19.0], 1e-5, "pole").unwrap();
    assert_all_pass(&m.check_mesh("pole").unwrap(), "pole").unwrap();
}

// ── Scenario 2: Flange ──────────────────────────────────────────────────

#[test]
fn test_flange_with_bolt_hole() {
    let mut m = ModelBuilder::mock();
    m.cylinder("base", 50.0, 10.0).unwrap();
    let offset = m.entity("base").unwrap().radius().unwrap() * 0.8;
    m.cylinder("bolt", 5.0, 20.0)
        .unwrap()
        .moved("bolt_placed", "bolt", offset, 0.0, 0.0)
        .unwrap()
        .difference("flange", "base", "bolt_placed")
        .unwrap()
        .keep("flange")
        .unwrap();

    assert_registry(m.model(), &["flange"]).unwrap();

    let flange = m.entity("flange").unwrap();
    assert!(!flange.same_shape(m.entity("base").unwrap()));

    assert_bbox_near(
        &flange.bbox().unwrap(),
        &BoundingBox::new([-50.0, -50.0, -5.0], [50.0, 50.0, 5.0]),
        1e-9,
        "flange",
    )
    .unwrap();
}

// ── Scenario 3: Stacking ────────────────────────────────────────────────

#[test]
fn test_stack_three_blocks() {
    let mut m = ModelBuilder::mock();
    m.cuboid("base", 20.0, 20.0, 4.0)
        .unwrap()
        .cuboid("column", 4.0, 4.0, 30.0)
        .unwrap()
        .sphere("knob", 3.0)
        .unwrap()
        .on_top_of("column_up", "column", "base")
        .unwrap()
        .on_top_of("knob_up", "knob", "column_up")
        .unwrap();

    for name in ["base", "column_up", "knob_up"] {
        m.keep(name).unwrap();
    }
    assert_registry(m.model(), &["base", "column_up", "knob_up"]).unwrap();

    let all = m.model().combined().unwrap().bbox().unwrap();
    assert_bbox_near(
        &all,
        &BoundingBox::new([-10.0, -10.0, -2.0], [10.0, 10.0, 38.0]),
        1e-9,
        "stack",
    )
    .unwrap();
}

// ── Scenario 4: Rotations compose about the world origin ────────────────

#[test]
fn test_rotate_then_move_differs_from_move_then_rotate() {
    let mut m = ModelBuilder::mock();
    m.cuboid("bar", 10.0, 2.0, 2.0)
        .unwrap()
        .rotated("r", "bar", Axis::Z, 90.0)
        .unwrap()
        .moved("rm", "r", 10.0, 0.0, 0.0)
        .unwrap()
        .moved("m", "bar", 10.0, 0.0, 0.0)
        .unwrap()
        .rotated("mr", "m", Axis::Z, 90.0)
        .unwrap();

    let rm = m.entity("rm").unwrap().bbox().unwrap().center();
    let mr = m.entity("mr").unwrap().bbox().unwrap().center();
    assert!((rm[0] - 10.0).abs() < 1e-9 && rm[1].abs() < 1e-9);
    assert!(mr[0].abs() < 1e-9 && (mr[1] - 10.0).abs() < 1e-9);
}

// ── Scenario 5: Sketch workflow ─────────────────────────────────────────

#[test]
fn test_plate_with_slot_cut() {
    let mut m = ModelBuilder::mock();
    m.plate("plate", 40.0, 20.0, 5.0)
        .unwrap()
        .slot("slot", 20.0, 6.0, 10.0)
        .unwrap()
        .difference("slotted", "plate", "slot")
        .unwrap();

    let mesh = m.tessellate("slotted").unwrap();
    assert_all_pass(&oracle::run_all_mesh_checks(&mesh), "slotted").unwrap();
    assert_bounding_box(&mesh, [-20.0, -10.0, 0.0], [20.0, 10.0, 5.0], 1e-5, "slotted").unwrap();
}

// ── Scenario 6: Error paths ─────────────────────────────────────────────

#[test]
fn test_invalid_dimension_reports_label() {
    let mut m = ModelBuilder::mock();
    let err = m.sphere("ball", 0.0).err().unwrap();
    match err {
        HarnessError::Ignis(IgnisError::InvalidParameter { label, reasons }) => {
            assert_eq!(label, "ball");
            assert_eq!(reasons, vec!["Dimensions must be positive. Invalid arguments: r=0"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_duplicate_scenario_name_rejected() {
    let mut m = ModelBuilder::mock();
    m.sphere("a", 1.0).unwrap();
    assert!(matches!(
        m.cuboid("a", 1.0, 1.0, 1.0),
        Err(HarnessError::DuplicateName { .. })
    ));
    assert_eq!(m.history().len(), 1);
}

#[test]
fn test_disjoint_intersection_is_geometry_error() {
    let mut m = ModelBuilder::mock();
    m.sphere("a", 1.0)
        .unwrap()
        .sphere("b", 1.0)
        .unwrap()
        .moved("far", "b", 10.0, 0.0, 0.0)
        .unwrap();
    let err = m.intersection("none", "a", "far").err().unwrap();
    assert!(matches!(
        err,
        HarnessError::Ignis(IgnisError::GeometryOperation { ref operation, .. }) if operation == "intersection"
    ));
}

#[test]
fn test_unsupported_iso_size() {
    let mut m = ModelBuilder::mock();
    let err = m.iso_hole("h", "M7", 5.0).err().unwrap();
    assert!(err.to_string().contains("Unsupported ISO hole size: M7"));
    m.iso_hole("m8", "m8", 5.0).unwrap();
    let size = m.entity("m8").unwrap().bbox().unwrap().size();
    assert!((size[0] - 9.0).abs() < 1e-9);
}

// ── Scenario 7: Export ──────────────────────────────────────────────────

#[test]
fn test_model_export_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let mut m = ModelBuilder::with_config(false, IgnisConfig::default());
    m.cuboid("a", 2.0, 2.0, 2.0)
        .unwrap()
        .torus("ring", 6.0, 1.0)
        .unwrap()
        .keep("a")
        .unwrap()
        .keep("ring")
        .unwrap();

    let path = dir.path().join("scenario.stl");
    m.export_model(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    let verdict = oracle::check_stl_parses(&bytes, 12);
    assert!(verdict.passed, "{}", verdict.detail);
    assert!(m.model().is_exported());
}
