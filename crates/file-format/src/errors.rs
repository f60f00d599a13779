/// Errors while writing part files.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("kernel error: {0}")]
    Kernel(#[from] shape_kernel::KernelError),

    #[error("STEP export failed: {0}")]
    StepExportFailed(String),

    #[error("mesh has no triangles")]
    EmptyMesh,

    #[error("invalid mesh: {reason}")]
    InvalidMesh { reason: String },

    #[error("unknown export format {0:?}")]
    UnknownFormat(String),

    #[error("manifest serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
