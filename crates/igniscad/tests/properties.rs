//! Property tests for the modeling layer on the mock kernel.

use igniscad::{Axis, IgnisError, Session};
use proptest::prelude::*;

fn dim() -> impl Strategy<Value = f64> {
    0.1f64..50.0
}

fn offset() -> impl Strategy<Value = f64> {
    -100.0f64..100.0
}

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}"
}

fn rotate_z(p: [f64; 3], degrees: f64) -> [f64; 3] {
    let (s, c) = degrees.to_radians().sin_cos();
    [c * p[0] - s * p[1], s * p[0] + c * p[1], p[2]]
}

proptest! {
    #[test]
    fn constructed_entity_keeps_name(x in dim(), y in dim(), z in dim(), n in name()) {
        let session = Session::mock();
        let e = session.cuboid(x, y, z, Some(n.as_str())).unwrap();
        prop_assert_eq!(e.name(), Some(n.as_str()));

        let size = e.bbox().unwrap().size();
        prop_assert!((size[0] - x).abs() < 1e-9);
        prop_assert!((size[1] - y).abs() < 1e-9);
        prop_assert!((size[2] - z).abs() < 1e-9);
    }

    #[test]
    fn non_positive_dimension_rejected(r in -10.0f64..=0.0, h in dim()) {
        let session = Session::mock();
        let err = session.cylinder(r, h, None).unwrap_err();
        let is_invalid = matches!(err, IgnisError::InvalidParameter { ref label, .. } if label == "Cylinder<Pending>");
        prop_assert!(is_invalid);
    }

    #[test]
    fn move_rotate_move_composes_in_call_order(
        v1 in prop::array::uniform3(offset()),
        v2 in prop::array::uniform3(offset()),
        degrees in -360.0f64..360.0,
    ) {
        let session = Session::mock();
        let marker = session.sphere(0.5, Some("marker")).unwrap();
        let placed = marker
            .moved(v1[0], v1[1], v1[2]).unwrap()
            .rotate(Axis::Z, degrees).unwrap()
            .moved(v2[0], v2[1], v2[2]).unwrap();
        prop_assert_eq!(placed.name(), Some("marker"));

        let r = rotate_z(v1, degrees);
        let expected = [r[0] + v2[0], r[1] + v2[1], r[2] + v2[2]];
        let center = placed.bbox().unwrap().center();
        for i in 0..3 {
            prop_assert!((center[i] - expected[i]).abs() < 1e-6, "axis {}: {} vs {}", i, center[i], expected[i]);
        }
    }

    #[test]
    fn transforms_leave_receiver_untouched(v in prop::array::uniform3(offset())) {
        let session = Session::mock();
        let a = session.cuboid(2.0, 3.0, 4.0, Some("a")).unwrap();
        let before = a.bbox().unwrap();
        let _ = a.moved(v[0], v[1], v[2]).unwrap();
        let _ = a.rotate(Axis::Y, v[0]).unwrap();
        prop_assert_eq!(a.bbox().unwrap(), before);
    }
}
