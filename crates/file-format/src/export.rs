use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shape_kernel::{Kernel, KernelSolidHandle, RenderMesh};
use tracing::{info, instrument};

use crate::errors::ExportError;
use crate::step_export::write_step;
use crate::stl::{write_stl_ascii, write_stl_binary};

/// Output file kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    #[serde(rename = "stl")]
    Stl,
    #[serde(rename = "stl-ascii")]
    StlAscii,
    #[serde(rename = "step")]
    Step,
}

impl ExportFormat {
    /// File name for a part in this format. ASCII STL gets its own suffix
    /// so it can sit next to the binary file.
    pub fn file_name(self, part: &str) -> String {
        match self {
            ExportFormat::Stl => format!("{part}.stl"),
            ExportFormat::StlAscii => format!("{part}.ascii.stl"),
            ExportFormat::Step => format!("{part}.step"),
        }
    }

    fn needs_mesh(self) -> bool {
        !matches!(self, ExportFormat::Step)
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stl" => Ok(ExportFormat::Stl),
            "stl-ascii" | "ascii-stl" => Ok(ExportFormat::StlAscii),
            "step" | "stp" => Ok(ExportFormat::Step),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Stl => "stl",
            ExportFormat::StlAscii => "stl-ascii",
            ExportFormat::Step => "step",
        })
    }
}

/// One file written by `export_body`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedFile {
    pub format: ExportFormat,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Write `body` to `dir` in every requested format.
///
/// The body is tessellated at most once, and only when a mesh format is requested.
#[instrument(skip(kb, body, formats), fields(formats = formats.len()))]
pub fn export_body(
    kb: &mut dyn Kernel,
    body: &KernelSolidHandle,
    name: &str,
    formats: &[ExportFormat],
    dir: &Path,
    tolerance: f64,
) -> Result<Vec<ExportedFile>, ExportError> {
    let mesh = if formats.iter().any(|f| f.needs_mesh()) {
        Some(kb.tessellate(body, tolerance)?)
    } else {
        None
    };
    export_with_mesh(kb, body, mesh.as_ref(), name, formats, dir)
}

/// Like [`export_body`], with a tessellation the caller already has.
///
/// `mesh` may be `None` only when no mesh format is requested.
pub fn export_with_mesh(
    kb: &dyn Kernel,
    body: &KernelSolidHandle,
    mesh: Option<&RenderMesh>,
    name: &str,
    formats: &[ExportFormat],
    dir: &Path,
) -> Result<Vec<ExportedFile>, ExportError> {
    if mesh.is_some_and(RenderMesh::is_empty) {
        return Err(ExportError::EmptyMesh);
    }
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(formats.len());
    for &format in formats {
        let path = dir.join(format.file_name(name));
        match (format, mesh) {
            (ExportFormat::Step, _) => {
                write_step(kb, body, name, &path)?;
            }
            (ExportFormat::Stl, Some(m)) => {
                write_stl_binary(m, BufWriter::new(File::create(&path)?))?;
            }
            (ExportFormat::StlAscii, Some(m)) => {
                write_stl_ascii(m, name, BufWriter::new(File::create(&path)?))?;
            }
            (_, None) => return Err(ExportError::EmptyMesh),
        }
        let bytes = std::fs::metadata(&path)?.len();
        info!(path = %path.display(), bytes, %format, "wrote part file");
        written.push(ExportedFile {
            format,
            path,
            bytes,
        });
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shape_kernel::{MockKernel, Plane, Region, Shape2d};

    fn block(kernel: &mut MockKernel) -> KernelSolidHandle {
        let face = kernel
            .make_region_face(
                &Region::solid(Shape2d::rect((0.0, 0.0), 2.0, 2.0)),
                &Plane::xy(),
            )
            .unwrap();
        kernel.extrude_faces(&[face], [0.0, 0.0, 1.0], 1.0).unwrap()
    }

    #[test]
    fn format_names_parse_and_print() {
        for f in [ExportFormat::Stl, ExportFormat::StlAscii, ExportFormat::Step] {
            assert_eq!(f.to_string().parse::<ExportFormat>().unwrap(), f);
        }
        assert_eq!("STP".parse::<ExportFormat>().unwrap(), ExportFormat::Step);
        assert!(matches!(
            "obj".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(_))
        ));
    }

    #[test]
    fn format_serde_names() {
        let json = serde_json::to_string(&[ExportFormat::StlAscii, ExportFormat::Step]).unwrap();
        assert_eq!(json, r#"["stl-ascii","step"]"#);
    }

    #[test]
    fn writes_every_requested_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut kernel = MockKernel::new();
        let body = block(&mut kernel);

        let files = export_body(
            &mut kernel,
            &body,
            "block",
            &[ExportFormat::Stl, ExportFormat::StlAscii, ExportFormat::Step],
            dir.path(),
            0.1,
        )
        .unwrap();

        assert_eq!(files.len(), 3);
        assert_eq!(files[0].path, dir.path().join("block.stl"));
        // mock tessellation is a 12-triangle box
        assert_eq!(files[0].bytes, 84 + 12 * 50);
        assert!(files[1].path.ends_with("block.ascii.stl"));
        let step = std::fs::read_to_string(&files[2].path).unwrap();
        assert!(step.starts_with("ISO-10303-21;"));
    }

    #[test]
    fn step_only_skips_tessellation() {
        let dir = tempfile::tempdir().unwrap();
        let mut kernel = MockKernel::new();
        let body = block(&mut kernel);
        // a bad tolerance would fail tessellation
        let files = export_body(&mut kernel, &body, "b", &[ExportFormat::Step], dir.path(), 0.0)
            .unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn prepared_mesh_is_written_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let mut kernel = MockKernel::new();
        let body = block(&mut kernel);
        let mesh = kernel.tessellate(&body, 0.1).unwrap();

        let files = export_with_mesh(
            &kernel,
            &body,
            Some(&mesh),
            "b",
            &[ExportFormat::Stl],
            dir.path(),
        )
        .unwrap();
        assert_eq!(files[0].bytes, 84 + 50 * mesh.triangle_count() as u64);

        let missing = export_with_mesh(&kernel, &body, None, "b", &[ExportFormat::Stl], dir.path());
        assert!(matches!(missing, Err(ExportError::EmptyMesh)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn full_device_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink("/dev/full", dir.path().join("b.stl")).unwrap();
        let mut kernel = MockKernel::new();
        let body = block(&mut kernel);

        let result = export_body(&mut kernel, &body, "b", &[ExportFormat::Stl], dir.path(), 0.1);
        assert!(matches!(result, Err(ExportError::Io(_))), "{result:?}");
    }

    #[test]
    fn creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("parts");
        let mut kernel = MockKernel::new();
        let body = block(&mut kernel);
        export_body(&mut kernel, &body, "b", &[ExportFormat::Stl], &nested, 0.1).unwrap();
        assert!(nested.join("b.stl").exists());
    }
}
