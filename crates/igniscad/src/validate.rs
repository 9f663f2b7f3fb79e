//! Parameter checks run before anything reaches the kernel.

use crate::error::IgnisError;

/// Display label for a shape in error messages.
pub(crate) fn label(kind: &str, name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("{kind}<Pending>"),
    }
}

/// Every named dimension must be finite and strictly greater than `tolerance`.
pub(crate) fn positive_dimensions(
    kind: &str,
    name: Option<&str>,
    dims: &[(&str, f64)],
    tolerance: f64,
) -> Result<(), IgnisError> {
    let invalid: Vec<String> = dims
        .iter()
        // `!(v > tol)` also rejects NaN.
        .filter(|(_, v)| !(*v > tolerance) || v.is_infinite())
        .map(|(arg, v)| format!("{arg}={v}"))
        .collect();

    if invalid.is_empty() {
        return Ok(());
    }
    Err(IgnisError::InvalidParameter {
        label: label(kind, name),
        reasons: vec![format!(
            "Dimensions must be positive. Invalid arguments: {}",
            invalid.join(", ")
        )],
    })
}

/// At least `min_points` vertices, no two neighbours (cyclically) coincident.
pub(crate) fn vertices(
    kind: &str,
    name: Option<&str>,
    points: &[[f64; 2]],
    min_points: usize,
    tolerance: f64,
) -> Result<(), IgnisError> {
    let fail = |reason: String| IgnisError::InvalidParameter {
        label: label(kind, name),
        reasons: vec![reason],
    };

    if points.is_empty() {
        return Err(fail("No vertices provided.".to_string()));
    }
    if points.len() < min_points {
        return Err(fail(format!(
            "Polygon requires at least {min_points} vertices. Got {}.",
            points.len()
        )));
    }
    if let Some((i, p)) = points.iter().enumerate().find(|(_, p)| !p[0].is_finite() || !p[1].is_finite()) {
        return Err(fail(format!("Vertex {i} {p:?} is not finite.")));
    }
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        let (p1, p2) = (points[i], points[j]);
        let dist = ((p1[0] - p2[0]).powi(2) + (p1[1] - p2[1]).powi(2)).sqrt();
        if dist <= tolerance {
            return Err(fail(format!(
                "Vertex {i} {p1:?} and Vertex {j} {p2:?} are too close \
                 (distance {dist:.2e} <= tolerance {tolerance}). \
                 This would create a zero-length edge."
            )));
        }
    }
    Ok(())
}
