use std::path::PathBuf;

/// Errors while encoding or writing an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("mesh has no triangles")]
    EmptyMesh,

    #[error("index {index} out of range (vertex count = {vertex_count})")]
    InvalidIndex { index: u32, vertex_count: usize },

    #[error("{format} encoding failed: {reason}")]
    Encode { format: String, reason: String },

    #[error("{format} export needs a single solid, got {count} parts")]
    RequiresSingleSolid { format: String, count: usize },

    #[error("kernel could not produce export data: {0}")]
    Kernel(String),
}
