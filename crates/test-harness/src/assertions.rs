//! Rich assertion helpers with diagnostic output.
//!
//! Failures carry expected vs actual values and the context string so a
//! scenario log pinpoints the step that broke.

use igniscad::{BoundingBox, Model, RenderMesh};

use crate::helpers::HarnessError;
use crate::oracle::OracleVerdict;

/// Assert the mesh bounding box matches expected values within tolerance.
pub fn assert_bounding_box(
    mesh: &RenderMesh,
    expected_min: [f32; 3],
    expected_max: [f32; 3],
    tol: f32,
    ctx: &str,
) -> Result<(), HarnessError> {
    let (actual_min, actual_max) = crate::helpers::mesh_bounding_box(mesh);

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

/// Assert a kernel bounding box within tolerance.
pub fn assert_bbox_near(
    actual: &BoundingBox,
    expected: &BoundingBox,
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    for i in 0..3 {
        let (dmin, dmax) = (
            (actual.min[i] - expected.min[i]).abs(),
            (actual.max[i] - expected.max[i]).abs(),
        );
        if dmin > tol || dmax > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] axis {}: expected {:.3}..{:.3}, got {:.3}..{:.3} (tol={})",
                    ctx, i, expected.min[i], expected.max[i], actual.min[i], actual.max[i], tol,
                ),
            });
        }
    }
    Ok(())
}

/// Fail on the first verdict that did not pass, naming every failure.
pub fn assert_all_pass(verdicts: &[OracleVerdict], ctx: &str) -> Result<(), HarnessError> {
    let failures: Vec<&OracleVerdict> = verdicts.iter().filter(|v| !v.passed).collect();
    match failures.first() {
        None => Ok(()),
        Some(first) => Err(HarnessError::OracleFailure {
            oracle: first.oracle_name.clone(),
            detail: format!(
                "[{}] {} failing: {}",
                ctx,
                failures.len(),
                failures
                    .iter()
                    .map(|v| format!("{} ({})", v.oracle_name, v.detail))
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
        }),
    }
}

/// Assert the model registers exactly `expected` names, in insertion order.
pub fn assert_registry(model: &Model, expected: &[&str]) -> Result<(), HarnessError> {
    let actual: Vec<&str> = model.names().collect();
    if actual == expected {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "registry mismatch in '{}': expected {:?}, got {:?} ({} parts total)",
                model.name(),
                expected,
                actual,
                model.len(),
            ),
        })
    }
}
