//! Mesh and document encoders plus atomic file output.

pub mod errors;
pub mod options;
pub mod stl;
pub mod write;

pub use errors::ExportError;
pub use options::{CombineMode, ExportFormat, ExportOptions};
pub use stl::{encode_ascii_stl, encode_binary_stl};
pub use write::write_atomically;
