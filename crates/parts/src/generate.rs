use file_format::{export_with_mesh, PartsManifest};
use modeling_ops::KernelBundle;
use tracing::{info, info_span};

use crate::catalog::PartKind;
use crate::config::PartsConfig;
use crate::errors::PartError;
use crate::report::PartReport;

/// Build, measure and export every part in `parts`, then write the
/// manifest into the output directory.
///
/// Stops at the first part that fails.
pub fn generate_parts(
    kb: &mut dyn KernelBundle,
    config: &PartsConfig,
    parts: &[PartKind],
) -> Result<PartsManifest, PartError> {
    let mut manifest = PartsManifest::new();
    for &kind in parts {
        let _span = info_span!("part", name = kind.name()).entered();

        let built = kind.build(config, kb)?;
        let handle = &built.body.handle;
        let mesh = kb.tessellate(handle, config.tolerance)?;
        let report = PartReport::from_mesh(&*kb, &built, &mesh);
        info!("{}", report.to_string().trim_end());

        let files = export_with_mesh(
            kb.as_kernel(),
            handle,
            Some(&mesh),
            kind.name(),
            &config.formats,
            &config.output_dir,
        )?;
        manifest.push(report.into_record(files));
    }

    let path = manifest.write(&config.output_dir)?;
    info!(path = %path.display(), parts = manifest.parts.len(), "manifest written");
    Ok(manifest)
}
