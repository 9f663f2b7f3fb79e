//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics,
//! so a scenario can collect every failure in one pass.

use std::collections::HashMap;
use std::io::Cursor;

use igniscad::{BoundingBox, RenderMesh};

use crate::helpers::{
    mesh_signed_volume, mesh_triangles, position_key, triangle_area, triangle_normal,
};

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

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

// ── Mesh Oracles ────────────────────────────────────────────────────────────

/// Every triangle edge shared by exactly 2 triangles.
///
/// Edges are matched by quantized position, so meshes with per-face vertices
/// still count as closed.
pub fn check_watertight_mesh(mesh: &RenderMesh) -> OracleVerdict {
    let mut edge_counts: HashMap<_, usize> = HashMap::new();
    for tri in mesh_triangles(mesh) {
        let [a, b, c] = tri.map(position_key);
        for (p, q) in [(a, b), (b, c), (c, a)] {
            let key = if p <= q { (p, q) } else { (q, p) };
            *edge_counts.entry(key).or_insert(0) += 1;
        }
    }

    let unpaired = edge_counts.values().filter(|&&c| c != 2).count();
    if unpaired == 0 {
        OracleVerdict::pass(
            "watertight_mesh",
            format!("all {} edges paired", edge_counts.len()),
        )
    } else {
        OracleVerdict::fail(
            "watertight_mesh",
            format!(
                "{} unpaired edges out of {} total",
                unpaired,
                edge_counts.len()
            ),
        )
    }
}

/// Positive signed volume: triangles wound counter-clockwise seen from outside.
pub fn check_outward_orientation(mesh: &RenderMesh) -> OracleVerdict {
    let volume = mesh_signed_volume(mesh);
    if volume > 0.0 {
        OracleVerdict::pass("outward_orientation", format!("signed volume {:.4}", volume))
            .with_value(volume)
    } else {
        OracleVerdict::fail(
            "outward_orientation",
            format!("signed volume {:.4} is not positive", volume),
        )
        .with_value(volume)
    }
}

/// Stored normals agree with geometric winding.
pub fn check_consistent_normals(mesh: &RenderMesh) -> OracleVerdict {
    let norms = &mesh.normals;
    let total = mesh.triangle_count();
    let mut inconsistent = 0usize;

    for tri in mesh.indices.chunks_exact(3) {
        let stored = |axis: usize| -> Option<f64> {
            tri.iter()
                .map(|&i| norms.get(i as usize * 3 + axis).map(|&n| n as f64))
                .sum::<Option<f64>>()
        };
        let (Some(sx), Some(sy), Some(sz)) = (stored(0), stored(1), stored(2)) else {
            continue;
        };
        let corners: Option<Vec<[f64; 3]>> = tri
            .iter()
            .map(|&i| {
                let i = i as usize * 3;
                mesh.vertices
                    .get(i..i + 3)
                    .map(|v| [v[0] as f64, v[1] as f64, v[2] as f64])
            })
            .collect();
        let Some(corners) = corners else { continue };
        let g = triangle_normal(&[corners[0], corners[1], corners[2]]);
        if g[0] * sx + g[1] * sy + g[2] * sz < 0.0 {
            inconsistent += 1;
        }
    }

    if inconsistent == 0 {
        OracleVerdict::pass(
            "consistent_normals",
            format!("all {} triangles have consistent winding", total),
        )
    } else {
        OracleVerdict::fail(
            "consistent_normals",
            format!(
                "{} of {} triangles have reversed normals",
                inconsistent, total
            ),
        )
    }
}

/// No triangle with area below 1e-10.
pub fn check_no_degenerate_triangles(mesh: &RenderMesh) -> OracleVerdict {
    let total = mesh.triangle_count();
    let degenerate = mesh_triangles(mesh)
        .filter(|tri| triangle_area(tri) < 1e-10)
        .count();

    if degenerate == 0 {
        OracleVerdict::pass(
            "no_degenerate_triangles",
            format!("all {} triangles have non-zero area", total),
        )
    } else {
        OracleVerdict::fail(
            "no_degenerate_triangles",
            format!("{} of {} triangles are degenerate", degenerate, total),
        )
    }
}

/// Index buffer is a whole number of triangles and every index is in range.
pub fn check_valid_indices(mesh: &RenderMesh) -> OracleVerdict {
    let vertex_count = mesh.vertex_count();
    if mesh.indices.len() % 3 != 0 {
        return OracleVerdict::fail(
            "valid_indices",
            format!("index count {} is not a multiple of 3", mesh.indices.len()),
        );
    }
    match mesh.indices.iter().find(|&&i| i as usize >= vertex_count) {
        None => OracleVerdict::pass(
            "valid_indices",
            format!("{} indices within {} vertices", mesh.indices.len(), vertex_count),
        ),
        Some(&bad) => OracleVerdict::fail(
            "valid_indices",
            format!("index {} out of range (vertex count = {})", bad, vertex_count),
        ),
    }
}

/// Mesh vertex bounds match `expected` within `tol` on every axis.
pub fn check_bounding_box(mesh: &RenderMesh, expected: &BoundingBox, tol: f64) -> OracleVerdict {
    let Some(actual) = BoundingBox::from_points(mesh_triangles(mesh).flatten()) else {
        return OracleVerdict::fail("bounding_box", "mesh has no triangles".to_string());
    };

    let worst = (0..3)
        .flat_map(|i| {
            [
                (actual.min[i] - expected.min[i]).abs(),
                (actual.max[i] - expected.max[i]).abs(),
            ]
        })
        .fold(0.0, f64::max);

    let detail = format!(
        "actual {:?}..{:?}, expected {:?}..{:?}",
        actual.min, actual.max, expected.min, expected.max
    );
    if worst <= tol {
        OracleVerdict::pass("bounding_box", detail).with_value(worst)
    } else {
        OracleVerdict::fail("bounding_box", format!("{} (off by {:.4})", detail, worst))
            .with_value(worst)
    }
}

/// Enclosed volume within `rel_tol` of `expected`.
pub fn check_volume(mesh: &RenderMesh, expected: f64, rel_tol: f64) -> OracleVerdict {
    let volume = mesh_signed_volume(mesh).abs();
    let err = (volume - expected).abs() / expected.abs().max(1e-12);
    let detail = format!("volume {:.4}, expected {:.4} (rel err {:.4})", volume, expected, err);
    if err <= rel_tol {
        OracleVerdict::pass("volume", detail).with_value(volume)
    } else {
        OracleVerdict::fail("volume", detail).with_value(volume)
    }
}

// ── File Oracles ────────────────────────────────────────────────────────────

/// STL bytes parse and hold `expected_triangles` facets.
pub fn check_stl_parses(bytes: &[u8], expected_triangles: usize) -> OracleVerdict {
    match stl_io::read_stl(&mut Cursor::new(bytes)) {
        Ok(parsed) if parsed.faces.len() == expected_triangles => OracleVerdict::pass(
            "stl_parses",
            format!(
                "{} facets, {} unique vertices",
                parsed.faces.len(),
                parsed.vertices.len()
            ),
        ),
        Ok(parsed) => OracleVerdict::fail(
            "stl_parses",
            format!(
                "expected {} facets, got {}",
                expected_triangles,
                parsed.faces.len()
            ),
        ),
        Err(e) => OracleVerdict::fail("stl_parses", format!("stl_io rejected the file: {}", e)),
    }
}

// ── Composite ───────────────────────────────────────────────────────────────

/// Structural checks every closed export mesh should pass.
pub fn run_all_mesh_checks(mesh: &RenderMesh) -> Vec<OracleVerdict> {
    vec![
        check_valid_indices(mesh),
        check_no_degenerate_triangles(mesh),
        check_watertight_mesh(mesh),
        check_outward_orientation(mesh),
        check_consistent_normals(mesh),
    ]
}
