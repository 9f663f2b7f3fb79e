//! Helper functions: error type and mesh math.

use std::collections::HashMap;

use igniscad::{IgnisError, RenderMesh};

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("entity not found: {name}")]
    EntityNotFound { name: String },

    #[error("duplicate name: {name}")]
    DuplicateName { name: String },

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },

    #[error("STL error: {reason}")]
    StlError { reason: String },

    #[error(transparent)]
    Ignis(#[from] IgnisError),
}

// ── Mesh Math ───────────────────────────────────────────────────────────────

/// Triangles as f64 corner triples. Triangles with out-of-range indices are skipped.
pub fn mesh_triangles(mesh: &RenderMesh) -> impl Iterator<Item = [[f64; 3]; 3]> + '_ {
    let vertex = move |idx: u32| {
        let i = idx as usize * 3;
        mesh.vertices
            .get(i..i + 3)
            .map(|v| [v[0] as f64, v[1] as f64, v[2] as f64])
    };
    mesh.indices
        .chunks_exact(3)
        .filter_map(move |tri| Some([vertex(tri[0])?, vertex(tri[1])?, vertex(tri[2])?]))
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Twice the triangle's area vector (unnormalized geometric normal).
pub fn triangle_normal([p0, p1, p2]: &[[f64; 3]; 3]) -> [f64; 3] {
    cross(sub(*p1, *p0), sub(*p2, *p0))
}

pub fn triangle_area(tri: &[[f64; 3]; 3]) -> f64 {
    let n = triangle_normal(tri);
    (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt() / 2.0
}

/// Axis-aligned bounds of all vertex positions.
pub fn mesh_bounding_box(mesh: &RenderMesh) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for chunk in mesh.vertices.chunks_exact(3) {
        for i in 0..3 {
            min[i] = min[i].min(chunk[i]);
            max[i] = max[i].max(chunk[i]);
        }
    }
    (min, max)
}

/// Signed enclosed volume by the divergence theorem.
///
/// Positive for a closed mesh with outward winding; meaningless for open meshes.
pub fn mesh_signed_volume(mesh: &RenderMesh) -> f64 {
    mesh_triangles(mesh)
        .map(|[p0, p1, p2]| {
            let c = cross(p1, p2);
            p0[0] * c[0] + p0[1] * c[1] + p0[2] * c[2]
        })
        .sum::<f64>()
        / 6.0
}

pub fn mesh_volume(mesh: &RenderMesh) -> f64 {
    mesh_signed_volume(mesh).abs()
}

pub fn mesh_surface_area(mesh: &RenderMesh) -> f64 {
    mesh_triangles(mesh).map(|tri| triangle_area(&tri)).sum()
}

/// Quantize a position so per-face duplicated vertices compare equal.
pub(crate) fn position_key(p: [f64; 3]) -> (i64, i64, i64) {
    let q = |v: f64| (v * 10000.0).round() as i64;
    (q(p[0]), q(p[1]), q(p[2]))
}

/// Count mesh edges by position: returns (total_edges, boundary_edges).
///
/// A boundary edge is shared by exactly 1 triangle. For a watertight mesh
/// boundary_edges is 0.
pub fn count_mesh_edges(mesh: &RenderMesh) -> (usize, usize) {
    let mut edge_counts: HashMap<_, usize> = HashMap::new();

    for tri in mesh_triangles(mesh) {
        let keys = tri.map(position_key);
        for (a, b) in [(keys[0], keys[1]), (keys[1], keys[2]), (keys[2], keys[0])] {
            let key = if a <= b { (a, b) } else { (b, a) };
            *edge_counts.entry(key).or_insert(0) += 1;
        }
    }

    let total = edge_counts.len();
    let boundary = edge_counts.values().filter(|&&c| c == 1).count();
    (total, boundary)
}

#[cfg(test)]
pub(crate) fn unit_cube() -> RenderMesh {
    RenderMesh {
        vertices: vec![
            0.0, 0.0, 0.0, // v0
            1.0, 0.0, 0.0, // v1
            1.0, 1.0, 0.0, // v2
            0.0, 1.0, 0.0, // v3
            0.0, 0.0, 1.0, // v4
            1.0, 0.0, 1.0, // v5
            1.0, 1.0, 1.0, // v6
            0.0, 1.0, 1.0, // v7
        ],
        normals: vec![0.0; 24],
        indices: vec![
            0, 2, 1, 0, 3, 2, // bottom
            4, 5, 6, 4, 6, 7, // top
            0, 1, 5, 0, 5, 4, // front
            2, 3, 7, 2, 7, 6, // back
            0, 4, 7, 0, 7, 3, // left
            1, 2, 6, 1, 6, 5, // right
        ],
    }
}
