//! Property-based tests for MockKernel invariants using the `proptest` crate.

use proptest::prelude::*;

use ignis_kernel::{Axis, Kernel, MockKernel};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Arbitrary translation offsets.
fn arb_translation() -> impl Strategy<Value = (f64, f64, f64)> {
    (-100.0f64..100.0, -100.0f64..100.0, -100.0f64..100.0)
}

/// Arbitrary positive dimension (avoids degenerate zero-size).
fn arb_positive_dim() -> impl Strategy<Value = f64> {
    0.1f64..100.0
}

/// Arbitrary rotation angle in radians.
fn arb_angle() -> impl Strategy<Value = f64> {
    -std::f64::consts::PI..std::f64::consts::PI
}

fn arb_axis() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::X), Just(Axis::Y), Just(Axis::Z)]
}

const TOL: f64 = 1e-6;

// ---------------------------------------------------------------------------
// 1. A translated box keeps its size and moves its center by the offset
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn translate_moves_center(
        (w, h, d) in (arb_positive_dim(), arb_positive_dim(), arb_positive_dim()),
        (tx, ty, tz) in arb_translation(),
    ) {
        let mut kernel = MockKernel::new();
        let solid = kernel.make_box(w, h, d).unwrap();
        let moved = kernel.translate(&solid, [tx, ty, tz]).unwrap();
        let bbox = kernel.bounding_box(&moved).unwrap();
        let c = bbox.center();
        let s = bbox.size();
        prop_assert!((c[0] - tx).abs() < TOL && (c[1] - ty).abs() < TOL && (c[2] - tz).abs() < TOL,
            "center {:?} != offset {:?}", c, (tx, ty, tz));
        prop_assert!((s[0] - w).abs() < TOL && (s[1] - h).abs() < TOL && (s[2] - d).abs() < TOL);
    }
}

// ---------------------------------------------------------------------------
// 2. Rotating there and back restores membership
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn rotate_inverse_restores_membership(
        axis in arb_axis(),
        angle in arb_angle(),
        (px, py, pz) in (-2.0f64..2.0, -2.0f64..2.0, -2.0f64..2.0),
    ) {
        let mut kernel = MockKernel::new();
        let solid = kernel.make_box(2.0, 3.0, 1.0).unwrap();
        let there = kernel.rotate(&solid, axis, angle).unwrap();
        let back = kernel.rotate(&there, axis, -angle).unwrap();

        // Stay clear of the boundary where float noise could flip the answer.
        let near_face = (px.abs() - 1.0).abs() < 1e-6
            || (py.abs() - 1.5).abs() < 1e-6
            || (pz.abs() - 0.5).abs() < 1e-6;
        prop_assume!(!near_face);

        prop_assert_eq!(
            kernel.contains_point(&solid, [px, py, pz]).unwrap(),
            kernel.contains_point(&back, [px, py, pz]).unwrap()
        );
    }
}

// ---------------------------------------------------------------------------
// 3. Union contains both operands; difference excludes the subtrahend
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn boolean_membership_laws(
        r1 in 0.5f64..5.0,
        r2 in 0.5f64..5.0,
        (tx, ty, tz) in (-3.0f64..3.0, -3.0f64..3.0, -3.0f64..3.0),
    ) {
        let mut kernel = MockKernel::new();
        let a = kernel.make_sphere(r1).unwrap();
        let b = kernel.make_sphere(r2).unwrap();
        let b = kernel.translate(&b, [tx, ty, tz]).unwrap();

        let union = kernel.boolean_union(&a, &b).unwrap();
        let diff = kernel.boolean_subtract(&a, &b).unwrap();

        prop_assert!(kernel.contains_point(&union, [0.0, 0.0, 0.0]).unwrap());
        prop_assert!(kernel.contains_point(&union, [tx, ty, tz]).unwrap());
        prop_assert!(!kernel.contains_point(&diff, [tx, ty, tz]).unwrap());
    }
}
