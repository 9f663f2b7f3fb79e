//! STL output for a RenderMesh through truck's STL writer.
//!
//! Facet normals are recomputed from winding; per-vertex normals in the mesh
//! are ignored.

use crate::errors::ExportError;
use ignis_kernel::RenderMesh;
use truck_meshalgo::prelude::stl::{self, StlFace, StlType};

type Vertex = [f32; 3];

/// Validated triangles in the writer's face layout.
fn facets(mesh: &RenderMesh) -> Result<Vec<StlFace>, ExportError> {
    if mesh.triangle_count() == 0 {
        return Err(ExportError::EmptyMesh);
    }
    let vertex_count = mesh.vertex_count();
    if let Some(&index) = mesh
        .indices
        .iter()
        .find(|&&idx| idx as usize >= vertex_count)
    {
        return Err(ExportError::InvalidIndex {
            index,
            vertex_count,
        });
    }

    let vertex = |idx: u32| {
        let i = idx as usize * 3;
        [mesh.vertices[i], mesh.vertices[i + 1], mesh.vertices[i + 2]]
    };

    Ok(mesh
        .indices
        .chunks_exact(3)
        .map(|tri| {
            let vertices = [vertex(tri[0]), vertex(tri[1]), vertex(tri[2])];
            StlFace {
                normal: facet_normal(&vertices),
                vertices,
            }
        })
        .collect())
}

/// Unit normal from the cross product; +Z for degenerate triangles.
fn facet_normal([p0, p1, p2]: &[Vertex; 3]) -> Vertex {
    let (ax, ay, az) = (p1[0] - p0[0], p1[1] - p0[1], p1[2] - p0[2]);
    let (bx, by, bz) = (p2[0] - p0[0], p2[1] - p0[1], p2[2] - p0[2]);
    let nx = ay * bz - az * by;
    let ny = az * bx - ax * bz;
    let nz = ax * by - ay * bx;
    let len = (nx * nx + ny * ny + nz * nz).sqrt();
    if len > 1e-12 {
        [nx / len, ny / len, nz / len]
    } else {
        [0.0, 0.0, 1.0]
    }
}

fn encode(mesh: &RenderMesh, stl_type: StlType, format: &str) -> Result<Vec<u8>, ExportError> {
    let faces = facets(mesh)?;
    let mut buf = Vec::with_capacity(84 + faces.len() * 50);
    stl::write(faces.into_iter(), &mut buf, stl_type).map_err(|e| ExportError::Encode {
        format: format.to_string(),
        reason: e.to_string(),
    })?;
    Ok(buf)
}

/// Encode a RenderMesh as binary STL.
pub fn encode_binary_stl(mesh: &RenderMesh) -> Result<Vec<u8>, ExportError> {
    encode(mesh, StlType::Binary, "binary STL")
}

/// Encode a RenderMesh as an ASCII STL document.
pub fn encode_ascii_stl(mesh: &RenderMesh) -> Result<String, ExportError> {
    let bytes = encode(mesh, StlType::Ascii, "ASCII STL")?;
    String::from_utf8(bytes).map_err(|e| ExportError::Encode {
        format: "ASCII STL".to_string(),
        reason: e.to_string(),
    })
}
