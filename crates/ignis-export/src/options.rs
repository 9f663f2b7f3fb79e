use serde::{Deserialize, Serialize};

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    StlBinary,
    StlAscii,
    Step,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::StlBinary | ExportFormat::StlAscii => "stl",
            ExportFormat::Step => "step",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::StlBinary => "binary STL",
            ExportFormat::StlAscii => "ASCII STL",
            ExportFormat::Step => "STEP",
        }
    }
}

/// How a multi-part model becomes one output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombineMode {
    /// Boolean union of every part, in insertion order.
    #[default]
    Union,
    /// Concatenate per-part meshes without booleans.
    Compound,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub combine: CombineMode,
    /// Chord tolerance for tessellation.
    pub tolerance: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            combine: CombineMode::default(),
            tolerance: 0.05,
        }
    }
}
