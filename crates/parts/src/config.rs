//! Generator configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! builds all parts with their nominal dimensions.

use std::path::{Path, PathBuf};

use file_format::ExportFormat;
use serde::{Deserialize, Serialize};

use crate::catalog::PartKind;
use crate::errors::ConfigError;
use crate::params::{LedsHolderParams, RimParams};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartsConfig {
    pub output_dir: PathBuf,
    pub formats: Vec<ExportFormat>,
    /// Tessellation tolerance in mm.
    pub tolerance: f64,
    pub parts: Vec<PartKind>,
    pub leds_holder: LedsHolderParams,
    /// Base rim dimensions. Each rim revision applies its own margin.
    pub rim: RimParams,
}

impl Default for PartsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("out"),
            formats: vec![ExportFormat::Stl, ExportFormat::Step],
            tolerance: 0.01,
            parts: PartKind::ALL.to_vec(),
            leds_holder: LedsHolderParams::default(),
            rim: RimParams::default(),
        }
    }
}

impl PartsConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ConfigError::Invalid {
                reason: format!("tolerance must be positive, got {}", self.tolerance),
            });
        }
        if self.formats.is_empty() {
            return Err(ConfigError::Invalid {
                reason: "no output formats".to_string(),
            });
        }
        self.leds_holder.validate()?;
        self.rim.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamError;

    #[test]
    fn empty_object_is_the_default() {
        assert_eq!(PartsConfig::from_json("{}").unwrap(), PartsConfig::default());
    }

    #[test]
    fn overrides_merge_with_defaults() {
        let config = PartsConfig::from_json(
            r#"{
                "formats": ["stl-ascii"],
                "parts": ["rim_v2"],
                "rim": { "pinion_diameter": 5.0 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.formats, vec![ExportFormat::StlAscii]);
        assert_eq!(config.parts, vec![PartKind::RimV2]);
        assert_eq!(config.rim.pinion_diameter, 5.0);
        assert_eq!(config.rim.height, 8.0);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn bad_dimensions_fail_at_load() {
        let err = PartsConfig::from_json(r#"{ "leds_holder": { "holder_y": 0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Param(ParamError::NotPositive {
                name: "holder_y",
                ..
            })
        ));
    }

    #[test]
    fn bad_tolerance_and_formats() {
        assert!(matches!(
            PartsConfig::from_json(r#"{ "tolerance": -1 }"#),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            PartsConfig::from_json(r#"{ "formats": [] }"#),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            PartsConfig::from_json(r#"{ "formats": ["obj"] }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = PartsConfig::load(Path::new("/nonexistent/parts.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/parts.json"));
    }
}
