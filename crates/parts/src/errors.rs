use std::path::PathBuf;

use file_format::ExportError;
use modeling_ops::OpError;

use crate::params::ParamError;

/// Errors from building or exporting a part.
#[derive(Debug, thiserror::Error)]
pub enum PartError {
    #[error("bad dimensions: {0}")]
    Param(#[from] ParamError),

    #[error("modeling failed: {0}")]
    Op(#[from] OpError),

    #[error("kernel error: {0}")]
    Kernel(#[from] shape_kernel::KernelError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    #[error("unknown part {0:?}")]
    UnknownPart(String),
}

/// Errors from loading a generator configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {reason}")]
    Invalid { reason: String },

    #[error("invalid config: {0}")]
    Param(#[from] ParamError),
}
