use std::collections::BTreeMap;
use std::fmt;

use file_format::{ExportedFile, PartRecord};
use modeling_ops::KernelBundle;
use shape_kernel::RenderMesh;

use crate::catalog::BuiltPart;
use crate::errors::PartError;

/// What the generator shows for a finished part.
#[derive(Debug, Clone, PartialEq)]
pub struct PartReport {
    pub name: String,
    pub lumps: usize,
    pub faces: usize,
    pub triangles: usize,
    pub bbox: Option<[f64; 6]>,
    /// Enclosed volume of the tessellation, mm³.
    pub volume: f64,
    pub dimensions: BTreeMap<String, f64>,
}

impl PartReport {
    /// Measure a built part. Tessellates once at `tolerance`.
    pub fn gather(
        kb: &mut dyn KernelBundle,
        part: &BuiltPart,
        tolerance: f64,
    ) -> Result<Self, PartError> {
        let mesh = kb.tessellate(&part.body.handle, tolerance)?;
        Ok(Self::from_mesh(&*kb, part, &mesh))
    }

    /// Measure a built part against a tessellation already made for it.
    pub fn from_mesh(kb: &dyn KernelBundle, part: &BuiltPart, mesh: &RenderMesh) -> Self {
        let handle = &part.body.handle;
        Self {
            name: part.kind.name().to_string(),
            lumps: kb.lump_count(handle),
            faces: kb.list_faces(handle).len(),
            triangles: mesh.triangle_count(),
            bbox: kb.bounding_box(handle),
            volume: mesh.volume(),
            dimensions: part.dimensions.clone(),
        }
    }

    /// Manifest entry for this part and the files written for it.
    pub fn into_record(self, files: Vec<ExportedFile>) -> PartRecord {
        PartRecord {
            name: self.name,
            files,
            bbox: self.bbox,
            volume: Some(self.volume),
            dimensions: self.dimensions,
        }
    }
}

impl fmt::Display for PartReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} lump(s), {} faces, {} triangles, {:.2} mm³",
            self.name, self.lumps, self.faces, self.triangles, self.volume
        )?;
        if let Some(b) = self.bbox {
            writeln!(
                f,
                "  size {:.2} x {:.2} x {:.2} mm",
                b[3] - b[0],
                b[4] - b[1],
                b[5] - b[2]
            )?;
        }
        for (name, value) in &self.dimensions {
            writeln!(f, "  {name} = {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PartKind;
    use crate::config::PartsConfig;
    use shape_kernel::MockKernel;

    #[test]
    fn report_for_mock_holder() {
        let mut kernel = MockKernel::new();
        let part = PartKind::LedsHolder
            .build(&PartsConfig::default(), &mut kernel)
            .unwrap();
        let report = PartReport::gather(&mut kernel, &part, 0.1).unwrap();

        assert_eq!(report.name, "leds_holder");
        assert_eq!(report.lumps, 2);
        assert_eq!(report.faces, 14);
        // mock tessellation is the bounding box: x from -7 to 8.5
        assert_eq!(report.bbox, Some([-7.0, -4.0, 0.0, 8.5, 4.0, 8.0]));

        let text = report.to_string();
        assert!(text.starts_with("leds_holder: 2 lump(s), 14 faces"));
        assert!(text.contains("size 15.50 x 8.00 x 8.00 mm"));
        assert!(text.contains("  link_pos_x = 8\n"));
    }

    #[test]
    fn record_keeps_dimensions() {
        let report = PartReport {
            name: "rim".to_string(),
            lumps: 1,
            faces: 4,
            triangles: 12,
            bbox: None,
            volume: 10.0,
            dimensions: BTreeMap::from([("height".to_string(), 8.0)]),
        };
        let record = report.into_record(Vec::new());
        assert_eq!(record.volume, Some(10.0));
        assert_eq!(record.dimensions["height"], 8.0);
    }
}
