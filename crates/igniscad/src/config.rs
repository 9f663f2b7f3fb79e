use ignis_export::ExportOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Session-wide settings. Every field has a default, so partial JSON works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnisConfig {
    /// Dimensions at or below this value are rejected.
    pub dimension_tolerance: f64,
    /// Tolerance handed to the kernel's boolean operations.
    pub boolean_tolerance: f64,
    /// Chord tolerance for kernel-side bounding boxes.
    pub mesh_tolerance: f64,
    /// Directory for exports that do not name a destination.
    pub output_dir: PathBuf,
    pub export: ExportOptions,
}

impl Default for IgnisConfig {
    fn default() -> Self {
        Self {
            dimension_tolerance: 1e-6,
            boolean_tolerance: 0.05,
            mesh_tolerance: 0.05,
            output_dir: PathBuf::from("."),
            export: ExportOptions::default(),
        }
    }
}

impl IgnisConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
