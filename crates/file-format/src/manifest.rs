use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ExportError;
use crate::export::ExportedFile;

/// Current manifest format version.
pub const FORMAT_VERSION: u32 = 1;

const FORMAT_ID: &str = "meiga-parts";

/// File name of the manifest inside the output directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Summary of one generated part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    pub name: String,
    pub files: Vec<ExportedFile>,
    /// `[min_x, min_y, min_z, max_x, max_y, max_z]` in mm.
    pub bbox: Option<[f64; 6]>,
    /// Mesh volume in mm³.
    pub volume: Option<f64>,
    /// Named dimensions the part was built from, derived ones included.
    #[serde(default)]
    pub dimensions: BTreeMap<String, f64>,
}

/// Everything one generator run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartsManifest {
    /// Format identifier.
    pub format: String,
    /// Format version number.
    pub version: u32,
    /// When the run happened.
    pub generated: DateTime<Utc>,
    pub parts: Vec<PartRecord>,
}

impl PartsManifest {
    /// Empty manifest stamped with the current time.
    pub fn new() -> Self {
        Self {
            format: FORMAT_ID.to_string(),
            version: FORMAT_VERSION,
            generated: Utc::now(),
            parts: Vec::new(),
        }
    }

    pub fn push(&mut self, record: PartRecord) {
        self.parts.push(record);
    }

    pub fn part(&self, name: &str) -> Option<&PartRecord> {
        self.parts.iter().find(|p| p.name == name)
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Write `manifest.json` into `dir`, returning its path.
    pub fn write(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(MANIFEST_FILE);
        std::fs::write(&path, self.to_json()?)?;
        Ok(path)
    }
}

impl Default for PartsManifest {
    fn default() -> Self {
        Self::new()
    }
}
