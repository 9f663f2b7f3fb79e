use ignis_export::ExportError;
use ignis_kernel::KernelError;

/// Errors surfaced by the modeling layer.
#[derive(Debug, thiserror::Error)]
pub enum IgnisError {
    #[error("the model \"{label}\" is physically infeasible: {}", .reasons.join("; "))]
    InvalidParameter { label: String, reasons: Vec<String> },

    #[error("{operation} failed: {reason}")]
    GeometryOperation { operation: String, reason: String },

    #[error("part '{name}' not found in model '{model}'")]
    EntityNotFound { name: String, model: String },

    #[error("part name '{name}' is already registered in model '{model}'")]
    DuplicateName { name: String, model: String },

    #[error("model '{model}' has no parts to export")]
    EmptyModel { model: String },

    #[error("group '{group}' has no members")]
    EmptyGroup { group: String },

    #[error("model '{model}' has already been exported")]
    AlreadyExported { model: String },

    #[error("entity belongs to a different session")]
    ForeignEntity,

    #[error("no viewer is attached to this session")]
    ViewerUnavailable,

    #[error("viewer '{viewer}' failed: {reason}")]
    Viewer { viewer: String, reason: String },

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("kernel error: {0}")]
    Kernel(KernelError),
}

impl IgnisError {
    /// Classify a kernel failure raised while running `operation`.
    pub(crate) fn from_kernel(operation: &str, err: KernelError) -> Self {
        match err {
            KernelError::BooleanFailed { reason } => IgnisError::GeometryOperation {
                operation: operation.to_string(),
                reason,
            },
            KernelError::EmptyResult { .. } => IgnisError::GeometryOperation {
                operation: operation.to_string(),
                reason: "result is empty".to_string(),
            },
            KernelError::ConstructionFailed { reason } | KernelError::InvalidParameter { reason } => {
                IgnisError::InvalidParameter {
                    label: operation.to_string(),
                    reasons: vec![reason],
                }
            }
            other => IgnisError::Kernel(other),
        }
    }
}
