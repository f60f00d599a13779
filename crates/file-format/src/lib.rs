pub mod errors;
pub mod export;
pub mod manifest;
pub mod step_export;
pub mod stl;

pub use errors::ExportError;
pub use export::{export_body, export_with_mesh, ExportFormat, ExportedFile};
pub use manifest::{PartRecord, PartsManifest, FORMAT_VERSION, MANIFEST_FILE};
pub use step_export::{export_step, write_step};
pub use stl::{render_mesh_to_stl, write_stl_ascii, write_stl_binary};
