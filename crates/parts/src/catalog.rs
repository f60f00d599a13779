use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use modeling_ops::{Body, KernelBundle};
use serde::{Deserialize, Serialize};

use crate::config::PartsConfig;
use crate::errors::PartError;
use crate::leds_holder::build_leds_holder;
use crate::params::RimRevision;
use crate::rim::build_rim;

/// Every part the generator knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    LedsHolder,
    Rim,
    RimV2,
    RimV3,
}

/// A part body together with the dimensions it was built from.
#[derive(Debug, Clone)]
pub struct BuiltPart {
    pub kind: PartKind,
    pub body: Body,
    pub dimensions: BTreeMap<String, f64>,
}

impl PartKind {
    pub const ALL: [PartKind; 4] = [
        PartKind::LedsHolder,
        PartKind::Rim,
        PartKind::RimV2,
        PartKind::RimV3,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PartKind::LedsHolder => "leds_holder",
            PartKind::Rim => "rim",
            PartKind::RimV2 => "rim_v2",
            PartKind::RimV3 => "rim_v3",
        }
    }

    /// Rim revision, for the rim parts.
    pub fn rim_revision(self) -> Option<RimRevision> {
        match self {
            PartKind::LedsHolder => None,
            PartKind::Rim => Some(RimRevision::Initial),
            PartKind::RimV2 => Some(RimRevision::Margin),
            PartKind::RimV3 => Some(RimRevision::MarginTight),
        }
    }

    /// Build this part from the dimensions in `config`.
    pub fn build(self, config: &PartsConfig, kb: &mut dyn KernelBundle) -> Result<BuiltPart, PartError> {
        let (body, dimensions) = match self.rim_revision() {
            None => (
                build_leds_holder(kb, &config.leds_holder)?,
                config.leds_holder.dimensions(),
            ),
            Some(revision) => {
                let params = revision.params(&config.rim);
                (build_rim(kb, &params)?, params.dimensions())
            }
        };
        Ok(BuiltPart {
            kind: self,
            body,
            dimensions,
        })
    }
}

impl FromStr for PartKind {
    type Err = PartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase().replace('-', "_");
        PartKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or(PartError::UnknownPart(s))
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use shape_kernel::MockKernel;

    #[test]
    fn names_round_trip() {
        for kind in PartKind::ALL {
            assert_eq!(kind.to_string().parse::<PartKind>().unwrap(), kind);
        }
        assert_eq!("Rim-V2".parse::<PartKind>().unwrap(), PartKind::RimV2);
        assert!(matches!(
            "hub".parse::<PartKind>(),
            Err(PartError::UnknownPart(_))
        ));
    }

    #[test]
    fn serde_names_match_display() {
        let json = serde_json::to_string(&PartKind::ALL).unwrap();
        assert_eq!(json, r#"["leds_holder","rim","rim_v2","rim_v3"]"#);
    }

    #[test]
    fn rim_revisions_carry_their_margin() {
        let mut kernel = MockKernel::new();
        let config = PartsConfig::default();
        let v3 = PartKind::RimV3.build(&config, &mut kernel).unwrap();
        assert_eq!(v3.kind, PartKind::RimV3);
        assert_relative_eq!(v3.dimensions["margin"], 0.3);
        assert_relative_eq!(v3.dimensions["outer_diameter"], 15.2, epsilon = 1e-12);

        let holder = PartKind::LedsHolder.build(&config, &mut kernel).unwrap();
        assert!(holder.dimensions.contains_key("link_pos_x"));
    }
}
