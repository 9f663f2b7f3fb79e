//! Tessellation wrapper around truck-meshalgo.
//!
//! Each face is meshed as part of the solid so shared edges line up; faces
//! stored with reversed orientation get their mesh inverted.

use crate::types::*;
use truck_meshalgo::prelude::*;
use truck_meshalgo::tessellation::MeshableShape;

type TruckSolid = truck_modeling::Solid;

/// Tessellate a truck Solid into a RenderMesh.
pub fn tessellate_solid(solid: &TruckSolid, tolerance: f64) -> Result<RenderMesh, KernelError> {
    if !(tolerance > 0.0) {
        return Err(KernelError::TessellationFailed {
            reason: format!("tolerance must be positive, got {tolerance}"),
        });
    }
    let meshed_solid = solid.triangulation(tolerance);
    let mut mesh = RenderMesh::default();

    for shell in meshed_solid.boundaries().iter() {
        for face in shell.face_iter() {
            let maybe_mesh: Option<PolygonMesh> = face.surface();
            let Some(mut face_mesh) = maybe_mesh else {
                continue;
            };
            if !face.orientation() {
                face_mesh.invert();
            }
            append_polygon(&mut mesh, &face_mesh);
        }
    }

    if mesh.is_empty() {
        return tessellate_solid_merged(solid, tolerance);
    }
    Ok(mesh)
}

/// Signed enclosed volume; negative when the triangles face inward.
pub fn signed_volume(mesh: &RenderMesh) -> f64 {
    let corner = |idx: u32| {
        let i = idx as usize * 3;
        [
            mesh.vertices[i] as f64,
            mesh.vertices[i + 1] as f64,
            mesh.vertices[i + 2] as f64,
        ]
    };
    mesh.indices
        .chunks_exact(3)
        .map(|tri| {
            let (a, b, c) = (corner(tri[0]), corner(tri[1]), corner(tri[2]));
            (a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
                + a[2] * (b[0] * c[1] - b[1] * c[0]))
                / 6.0
        })
        .sum()
}

/// Fallback tessellation: merge everything into a single PolygonMesh.
fn tessellate_solid_merged(
    solid: &TruckSolid,
    tolerance: f64,
) -> Result<RenderMesh, KernelError> {
    use truck_meshalgo::tessellation::MeshedShape;

    let polygon = solid.triangulation(tolerance).to_polygon();
    let mut mesh = RenderMesh::default();
    append_polygon(&mut mesh, &polygon);
    if mesh.is_empty() {
        return Err(KernelError::TessellationFailed {
            reason: "solid produced no triangles".to_string(),
        });
    }
    Ok(mesh)
}

/// Append positions, per-vertex normals and triangles (quads split in two).
fn append_polygon(mesh: &mut RenderMesh, polygon: &PolygonMesh) {
    let base_vertex = mesh.vertex_count() as u32;
    let positions = polygon.positions();
    let normals = polygon.normals();

    for pos in positions {
        mesh.vertices
            .extend_from_slice(&[pos[0] as f32, pos[1] as f32, pos[2] as f32]);
    }

    // Normals in truck are indexed separately from positions; collapse them
    // onto position indices, last writer wins.
    let mut vertex_normals = vec![[0.0f32; 3]; positions.len()];
    let mut record = |pos: usize, nor: Option<usize>| {
        if let Some(n) = nor.and_then(|i| normals.get(i)) {
            vertex_normals[pos] = [n[0] as f32, n[1] as f32, n[2] as f32];
        }
    };

    for tri in polygon.tri_faces() {
        for v in tri.iter() {
            record(v.pos, v.nor);
            mesh.indices.push(v.pos as u32 + base_vertex);
        }
    }
    for quad in polygon.quad_faces() {
        for v in quad.iter() {
            record(v.pos, v.nor);
        }
        for i in [0, 1, 2, 0, 2, 3] {
            mesh.indices.push(quad[i].pos as u32 + base_vertex);
        }
    }

    for n in vertex_normals {
        mesh.normals.extend_from_slice(&n);
    }
}
