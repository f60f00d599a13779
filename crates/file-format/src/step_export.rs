use std::path::Path;

use shape_kernel::{Kernel, KernelSolidHandle};

use crate::errors::ExportError;

/// Export a body to STEP AP203 text.
///
/// Returns an error if the kernel cannot serialize the body.
pub fn export_step(
    kb: &dyn Kernel,
    body: &KernelSolidHandle,
    name: &str,
) -> Result<String, ExportError> {
    let step_string = kb
        .export_step(body, name)
        .map_err(|e| ExportError::StepExportFailed(format!("{}", e)))?;
    if !step_string.trim_start().starts_with("ISO-10303-21") {
        return Err(ExportError::StepExportFailed(
            "kernel output is not an ISO-10303-21 exchange file".to_string(),
        ));
    }
    Ok(step_string)
}

/// Export a body to a STEP file at `path`.
pub fn write_step(
    kb: &dyn Kernel,
    body: &KernelSolidHandle,
    name: &str,
    path: &Path,
) -> Result<u64, ExportError> {
    let text = export_step(kb, body, name)?;
    std::fs::write(path, &text)?;
    Ok(text.len() as u64)
}
