//! TruckKernel scenario tests.
//!
//! These test against real truck geometry. Coplanar booleans are known to
//! fail in truck-shapeops; that test is #[ignore]d.

use std::f64::consts::PI;
use std::io::Cursor;

use igniscad::{
    Axis, BoundingBox, Entity, ExportFormat, ExportOptions, Model, OnExit, RenderMesh, Session,
    ShowMode, ShowOptions,
};
use test_harness::assertions::{assert_bbox_near, assert_bounding_box};
use test_harness::helpers::mesh_volume;
use test_harness::oracle;
use test_harness::ModelBuilder;

/// Truck tessellation of curved faces has known quality issues (unpaired
/// edges along seams, slivers at poles). Every other oracle must pass.
const KNOWN_TRUCK_ISSUES: [&str; 2] = ["watertight_mesh", "no_degenerate_triangles"];

/// Tessellated `entity` faces outward and encloses `expected` within 3%.
fn assert_outward_volume(entity: &Entity, expected: f64, what: &str) {
    let mesh = entity.tessellate(0.02).unwrap();
    let orientation = oracle::check_outward_orientation(&mesh);
    assert!(orientation.passed, "[{}] {}", what, orientation.detail);
    let volume = oracle::check_volume(&mesh, expected, 0.03);
    assert!(volume.passed, "[{}] {}", what, volume.detail);
}

/// Re-index an STL read back from disk so the mesh oracles can run on it.
fn mesh_from_stl(parsed: &stl_io::IndexedMesh) -> RenderMesh {
    RenderMesh {
        vertices: parsed
            .vertices
            .iter()
            .flat_map(|v| [v[0], v[1], v[2]])
            .collect(),
        normals: Vec::new(),
        indices: parsed
            .faces
            .iter()
            .flat_map(|f| f.vertices.map(|i| i as u32))
            .collect(),
    }
}

fn assert_mesh_oracles(m: &ModelBuilder, name: &str) {
    for v in m.check_mesh(name).unwrap() {
        if KNOWN_TRUCK_ISSUES.contains(&v.oracle_name.as_str()) {
            continue;
        }
        assert!(v.passed, "[{}] oracle '{}' failed: {}", name, v.oracle_name, v.detail);
    }
}

#[test]
fn test_truck_box() {
    let mut m = ModelBuilder::truck();
    m.cuboid("box", 10.0, 10.0, 10.0).unwrap();
    m.assert_has_solid("box").unwrap();

    let mesh = m.tessellate("box").unwrap();
    assert_bounding_box(&mesh, [-5.0; 3], [5.0; 3], 1e-4, "box").unwrap();
    for v in oracle::run_all_mesh_checks(&mesh) {
        assert!(v.passed, "oracle '{}' failed: {}", v.oracle_name, v.detail);
    }
    let volume = oracle::check_volume(&mesh, 1000.0, 1e-4);
    assert!(volume.passed, "{}", volume.detail);
}

#[test]
fn test_truck_cylinder_pole() {
    let mut m = ModelBuilder::truck();
    m.cylinder("pole", 5.0, 38.0).unwrap();
    assert_mesh_oracles(&m, "pole");

    let mesh = m.tessellate("pole").unwrap();
    assert_bounding_box(&mesh, [-5.0, -5.0, -19.0], [5.0, 5.0, 19.0], 0.1, "pole").unwrap();
    let expected = std::f64::consts::PI * 25.0 * 38.0;
    let volume = oracle::check_volume(&mesh, expected, 0.03);
    assert!(volume.passed, "{}", volume.detail);
}

#[test]
fn test_truck_sphere() {
    let mut m = ModelBuilder::truck();
    m.sphere("ball", 10.0).unwrap();
    assert_mesh_oracles(&m, "ball");

    let bbox = m.entity("ball").unwrap().bbox().unwrap();
    assert_bbox_near(&bbox, &BoundingBox::new([-10.0; 3], [10.0; 3]), 0.2, "ball").unwrap();
    assert_outward_volume(m.entity("ball").unwrap(), 4.0 / 3.0 * PI * 1000.0, "ball");
}

#[test]
fn test_truck_revolved_primitives_face_outward() {
    let session = Session::truck();

    let cone = session.cone(3.0, 1.0, 4.0, None).unwrap();
    assert_outward_volume(&cone, PI * 4.0 / 3.0 * 13.0, "cone");

    let torus = session.torus(4.0, 1.0, None).unwrap();
    assert_outward_volume(&torus, 2.0 * PI * PI * 4.0, "torus");

    // Bore r 3 below, counter-bore r 5.5 over the top 3 of 10.
    let cb = session.counterbore_hole(3.0, 5.5, 3.0, 10.0, None).unwrap();
    assert_outward_volume(&cb, PI * (5.5 * 5.5 * 3.0 + 9.0 * 7.0), "counterbore");

    // 90° countersink from r 2 to r 5 is 3 deep; bore r 2 over the other 7.
    let csk = session.countersink_hole(2.0, 5.0, 90.0, 10.0, None).unwrap();
    let frustum = PI * 3.0 / 3.0 * (25.0 + 10.0 + 4.0);
    assert_outward_volume(&csk, PI * 4.0 * 7.0 + frustum, "countersink");

    let washer = session
        .polygon(&[[1.0, 0.0], [3.0, 0.0], [3.0, 1.0], [1.0, 1.0]], None)
        .unwrap()
        .revolve(Axis::Y, None)
        .unwrap();
    assert_outward_volume(&washer, PI * 8.0, "revolved about Y");
}

#[test]
fn test_truck_difference_of_curved_solids_is_ordered() {
    let session = Session::truck();
    let can = session.cylinder(5.0, 10.0, Some("can")).unwrap();
    let ball = session.sphere(4.0, Some("ball")).unwrap().moved(0.0, 0.0, 5.0).unwrap();
    let half_ball = 2.0 / 3.0 * PI * 64.0;

    let dented = can.difference(&ball).unwrap();
    let dome = ball.difference(&can).unwrap();

    assert_outward_volume(&dented, PI * 25.0 * 10.0 - half_ball, "can - ball");
    assert_outward_volume(&dome, half_ball, "ball - can");
    let dome_bbox = dome.bbox().unwrap();
    assert!((dome_bbox.min[2] - 5.0).abs() < 0.05, "dome starts at the can top");
    assert!((dome_bbox.max[2] - 9.0).abs() < 0.05);
}

#[test]
fn test_truck_pole_export_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::truck();
    let path = dir.path().join("Example.stl");

    let model = Model::scoped(
        &session,
        "Example",
        OnExit::Show(ShowMode::Export, ShowOptions::to_path(&path)),
        |m| {
            m.add(session.cylinder(5.0, 38.0, Some("pole"))?)?;
            Ok(())
        },
    )
    .unwrap();
    assert!(model.is_exported());

    let parsed = stl_io::read_stl(&mut Cursor::new(std::fs::read(&path).unwrap())).unwrap();
    let mesh = mesh_from_stl(&parsed);
    assert_bounding_box(&mesh, [-5.0, -5.0, -19.0], [5.0, 5.0, 19.0], 0.1, "pole").unwrap();
    let orientation = oracle::check_outward_orientation(&mesh);
    assert!(orientation.passed, "{}", orientation.detail);
    let expected = PI * 25.0 * 38.0;
    assert!(
        (mesh_volume(&mesh) - expected).abs() / expected < 0.03,
        "pole volume {}",
        mesh_volume(&mesh)
    );
}

#[test]
fn test_truck_plate_extrude() {
    let mut m = ModelBuilder::truck();
    m.plate("plate", 40.0, 20.0, 5.0).unwrap();
    let mesh = m.tessellate("plate").unwrap();
    assert_bounding_box(&mesh, [-20.0, -10.0, 0.0], [20.0, 10.0, 5.0], 1e-4, "plate").unwrap();
    let volume = oracle::check_volume(&mesh, 4000.0, 1e-4);
    assert!(volume.passed, "{}", volume.detail);
}

#[test]
fn test_truck_transforms() {
    let mut m = ModelBuilder::truck();
    m.cuboid("bar", 10.0, 2.0, 2.0)
        .unwrap()
        .rotated("r", "bar", Axis::Z, 90.0)
        .unwrap()
        .moved("rm", "r", 0.0, 0.0, 10.0)
        .unwrap();

    let bbox = m.entity("rm").unwrap().bbox().unwrap();
    assert_bbox_near(
        &bbox,
        &BoundingBox::new([-1.0, -5.0, 9.0], [1.0, 5.0, 11.0]),
        1e-6,
        "rotated bar",
    )
    .unwrap();
}

#[test]
fn test_truck_boolean_offset() {
    let mut m = ModelBuilder::truck();
    m.cuboid("box1", 10.0, 10.0, 10.0)
        .unwrap()
        .cuboid("box2", 10.0, 10.0, 10.0)
        .unwrap()
        .moved("box2_offset", "box2", 5.0, 5.0, 5.0)
        .unwrap();

    // Offset boxes (not coplanar) should work in truck
    m.union("merged", "box1", "box2_offset").unwrap();
    m.assert_has_solid("merged").unwrap();

    let bbox = m.entity("merged").unwrap().bbox().unwrap();
    assert_bbox_near(
        &bbox,
        &BoundingBox::new([-5.0; 3], [10.0; 3]),
        1e-4,
        "merged",
    )
    .unwrap();
}

#[test]
fn test_truck_boolean_subtract_offset() {
    let mut m = ModelBuilder::truck();
    m.cuboid("box1", 10.0, 10.0, 10.0)
        .unwrap()
        .cuboid("box2", 6.0, 6.0, 10.0)
        .unwrap()
        .moved("pocket", "box2", 0.0, 0.0, 5.0)
        .unwrap();

    m.difference("result", "box1", "pocket").unwrap();
    m.assert_has_solid("result").unwrap();
    let volume = oracle::check_volume(&m.tessellate("result").unwrap(), 1000.0 - 180.0, 1e-3);
    assert!(volume.passed, "{}", volume.detail);
}

#[test]
fn test_truck_counterbore_profile() {
    let session = Session::truck();
    let hole = session
        .counterbore_hole(3.0, 5.5, 3.0, 10.0, Some("cb"))
        .unwrap();
    let bbox = hole.bbox().unwrap();
    assert!((bbox.size()[2] - 10.0).abs() < 0.1);
    assert!((bbox.size()[0] - 11.0).abs() < 0.2);
}

#[test]
fn test_truck_step_export() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::truck();
    let mut model = session.model("block");
    model.add(session.cuboid(4.0, 4.0, 4.0, Some("block")).unwrap()).unwrap();

    let path = dir.path().join("block.step");
    let options = ShowOptions::to_path(&path).with_export(ExportOptions {
        format: ExportFormat::Step,
        ..Default::default()
    });
    model.show(ShowMode::Export, &options).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("ISO-10303-21"));
}

#[test]
fn test_truck_model_export_stl() {
    let dir = tempfile::tempdir().unwrap();
    let mut m = ModelBuilder::truck();
    m.cuboid("a", 4.0, 4.0, 4.0).unwrap().keep("a").unwrap();

    let path = dir.path().join("a.stl");
    m.export_model(&path).unwrap();
    let mesh = m.tessellate("a").unwrap();
    let verdict = oracle::check_stl_parses(&std::fs::read(&path).unwrap(), mesh.triangle_count());
    assert!(verdict.passed, "{}", verdict.detail);
}

#[test]
fn test_truck_flange() {
    let mut m = ModelBuilder::truck();
    m.cylinder("base", 50.0, 10.0)
        .unwrap()
        .cylinder("bolt", 5.0, 20.0)
        .unwrap()
        .moved("bolt_placed", "bolt", 40.0, 0.0, 0.0)
        .unwrap()
        .difference("flange", "base", "bolt_placed")
        .unwrap();
    m.assert_has_solid("flange").unwrap();
}

#[test]
#[ignore = "truck-shapeops: coplanar boolean faces fail"]
fn test_truck_boolean_coplanar() {
    let mut m = ModelBuilder::truck();
    m.cuboid("box1", 10.0, 10.0, 10.0)
        .unwrap()
        .cuboid("box2", 10.0, 10.0, 10.0)
        .unwrap()
        // Same Z range = coplanar top and bottom faces
        .moved("box2_offset", "box2", 5.0, 5.0, 0.0)
        .unwrap();

    m.union("merged", "box1", "box2_offset").unwrap();
    m.assert_has_solid("merged").unwrap();
}

#[test]
fn test_truck_plate_with_slot() {
    let mut m = ModelBuilder::truck();
    m.plate("plate", 40.0, 20.0, 5.0)
        .unwrap()
        .slot("slot", 20.0, 6.0, 20.0)
        .unwrap()
        .difference("slotted", "plate", "slot")
        .unwrap();
    m.assert_has_solid("slotted").unwrap();
}
