//! Dimension sets for the generated parts.
//!
//! All lengths are millimetres. Each set checks its own realizability
//! before any geometry is built, so a bad override fails with a named
//! dimension instead of a kernel error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Why a dimension set cannot be built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{inner} does not fit inside {outer}")]
    DoesNotFit {
        inner: &'static str,
        outer: &'static str,
    },

    #[error("{a} overlaps {b}")]
    Overlap { a: &'static str, b: &'static str },
}

fn positive(name: &'static str, value: f64) -> Result<(), ParamError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParamError::NotPositive { name, value })
    }
}

// ── LED / sensor holder ─────────────────────────────────────────────────────

/// Block holding an LED and a light sensor side by side, with a small
/// link bar sitting next to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedsHolderParams {
    pub holder_x: f64,
    pub holder_y: f64,
    pub holder_z: f64,
    pub led_diameter: f64,
    /// LED bore centre along X, from the holder centre.
    pub led_pos_x: f64,
    pub sensor_diameter: f64,
    pub sensor_pos_x: f64,
    pub link_x: f64,
    pub link_y: f64,
    /// Clearance between the holder's +X side and the link bar.
    pub link_gap: f64,
}

impl Default for LedsHolderParams {
    fn default() -> Self {
        Self {
            holder_x: 14.0,
            holder_y: 8.0,
            holder_z: 8.0,
            led_diameter: 6.1,
            led_pos_x: -2.5,
            sensor_diameter: 4.1,
            sensor_pos_x: 3.5,
            link_x: 1.0,
            link_y: 1.0,
            link_gap: 0.5,
        }
    }
}

impl LedsHolderParams {
    /// Link bar centre along X.
    pub fn link_pos_x(&self) -> f64 {
        self.holder_x / 2.0 + self.link_x / 2.0 + self.link_gap
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        positive("holder_x", self.holder_x)?;
        positive("holder_y", self.holder_y)?;
        positive("holder_z", self.holder_z)?;
        positive("led_diameter", self.led_diameter)?;
        positive("sensor_diameter", self.sensor_diameter)?;
        positive("link_x", self.link_x)?;
        positive("link_y", self.link_y)?;
        positive("link_gap", self.link_gap)?;
        if !(self.led_pos_x.is_finite() && self.sensor_pos_x.is_finite()) {
            return Err(ParamError::DoesNotFit {
                inner: "bore positions",
                outer: "holder",
            });
        }

        let bore_fits = |pos: f64, diameter: f64| {
            pos.abs() + diameter / 2.0 < self.holder_x / 2.0 && diameter < self.holder_y
        };
        if !bore_fits(self.led_pos_x, self.led_diameter) {
            return Err(ParamError::DoesNotFit {
                inner: "LED bore",
                outer: "holder",
            });
        }
        if !bore_fits(self.sensor_pos_x, self.sensor_diameter) {
            return Err(ParamError::DoesNotFit {
                inner: "sensor bore",
                outer: "holder",
            });
        }
        let spacing = (self.led_pos_x - self.sensor_pos_x).abs();
        if spacing <= (self.led_diameter + self.sensor_diameter) / 2.0 {
            return Err(ParamError::Overlap {
                a: "LED bore",
                b: "sensor bore",
            });
        }
        Ok(())
    }

    /// Every dimension by name, derived ones included.
    pub fn dimensions(&self) -> BTreeMap<String, f64> {
        [
            ("holder_x", self.holder_x),
            ("holder_y", self.holder_y),
            ("holder_z", self.holder_z),
            ("led_diameter", self.led_diameter),
            ("led_pos_x", self.led_pos_x),
            ("sensor_diameter", self.sensor_diameter),
            ("sensor_pos_x", self.sensor_pos_x),
            ("link_x", self.link_x),
            ("link_y", self.link_y),
            ("link_pos_x", self.link_pos_x()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}

// ── Wheel rim ───────────────────────────────────────────────────────────────

/// Rim disc that the tire is stretched over, bored for the motor pinion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RimParams {
    /// Wheel diameter with the tire fitted.
    pub wheel_diameter: f64,
    /// Tire wall thickness; the tire takes this off each side.
    pub tire_thickness: f64,
    pub height: f64,
    pub pinion_diameter: f64,
    /// Taken off the outer diameter so the printed rim fits the tire.
    pub margin: f64,
}

impl Default for RimParams {
    fn default() -> Self {
        Self {
            wheel_diameter: 20.5,
            tire_thickness: 2.5,
            height: 8.0,
            pinion_diameter: 6.70,
            margin: 0.0,
        }
    }
}

impl RimParams {
    pub fn tire_width(&self) -> f64 {
        2.0 * self.tire_thickness
    }

    pub fn outer_diameter(&self) -> f64 {
        self.wheel_diameter - self.tire_width() - self.margin
    }

    /// Radial wall between the pinion bore and the rim edge.
    pub fn wall(&self) -> f64 {
        (self.outer_diameter() - self.pinion_diameter) / 2.0
    }

    pub fn with_margin(self, margin: f64) -> Self {
        Self { margin, ..self }
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        positive("wheel_diameter", self.wheel_diameter)?;
        positive("tire_thickness", self.tire_thickness)?;
        positive("height", self.height)?;
        positive("pinion_diameter", self.pinion_diameter)?;
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(ParamError::Negative {
                name: "margin",
                value: self.margin,
            });
        }
        positive("outer_diameter", self.outer_diameter())?;
        // the bore plus the margin has to leave material all around
        if self.pinion_diameter + self.margin >= self.outer_diameter() {
            return Err(ParamError::DoesNotFit {
                inner: "pinion bore",
                outer: "rim",
            });
        }
        Ok(())
    }

    pub fn dimensions(&self) -> BTreeMap<String, f64> {
        [
            ("wheel_diameter", self.wheel_diameter),
            ("tire_width", self.tire_width()),
            ("height", self.height),
            ("pinion_diameter", self.pinion_diameter),
            ("margin", self.margin),
            ("outer_diameter", self.outer_diameter()),
            ("wall", self.wall()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}

/// Printed rim revisions, each fitting the tire a little looser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RimRevision {
    /// Nominal diameter, no fabrication margin.
    Initial,
    Margin,
    MarginTight,
}

impl RimRevision {
    pub const ALL: [RimRevision; 3] = [
        RimRevision::Initial,
        RimRevision::Margin,
        RimRevision::MarginTight,
    ];

    pub fn margin(self) -> f64 {
        match self {
            RimRevision::Initial => 0.0,
            RimRevision::Margin => 0.2,
            RimRevision::MarginTight => 0.3,
        }
    }

    /// `base` with this revision's margin.
    pub fn params(self, base: &RimParams) -> RimParams {
        base.with_margin(self.margin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn holder_defaults_are_valid() {
        let p = LedsHolderParams::default();
        p.validate().unwrap();
        assert_relative_eq!(p.link_pos_x(), 8.0);
        assert_eq!(p.dimensions()["link_pos_x"], 8.0);
    }

    #[test]
    fn holder_bore_past_the_edge() {
        let p = LedsHolderParams {
            led_pos_x: -4.5,
            ..Default::default()
        };
        assert_eq!(
            p.validate(),
            Err(ParamError::DoesNotFit {
                inner: "LED bore",
                outer: "holder"
            })
        );
    }

    #[test]
    fn holder_bores_touching() {
        let p = LedsHolderParams {
            sensor_pos_x: 2.0,
            ..Default::default()
        };
        assert!(matches!(p.validate(), Err(ParamError::Overlap { .. })));
    }

    #[test]
    fn holder_zero_height() {
        let p = LedsHolderParams {
            holder_z: 0.0,
            ..Default::default()
        };
        assert_eq!(
            p.validate(),
            Err(ParamError::NotPositive {
                name: "holder_z",
                value: 0.0
            })
        );
    }

    #[test]
    fn rim_derived_dimensions() {
        let p = RimParams::default();
        assert_relative_eq!(p.tire_width(), 5.0);
        assert_relative_eq!(p.outer_diameter(), 15.5);
        assert_relative_eq!(p.wall(), 4.4, epsilon = 1e-12);
        p.validate().unwrap();
    }

    #[test]
    fn revisions_shrink_the_rim() {
        let base = RimParams::default();
        let diameters: Vec<f64> = RimRevision::ALL
            .iter()
            .map(|r| r.params(&base).outer_diameter())
            .collect();
        assert_relative_eq!(diameters[0], 15.5);
        assert_relative_eq!(diameters[1], 15.3, epsilon = 1e-12);
        assert_relative_eq!(diameters[2], 15.2, epsilon = 1e-12);
        assert_eq!(RimRevision::Margin.params(&base).pinion_diameter, 6.7);
    }

    #[test]
    fn rim_pinion_too_wide() {
        let p = RimParams {
            pinion_diameter: 15.4,
            margin: 0.2,
            ..Default::default()
        };
        assert!(matches!(p.validate(), Err(ParamError::DoesNotFit { .. })));
    }

    #[test]
    fn rim_negative_margin() {
        let p = RimParams::default().with_margin(-0.1);
        assert!(matches!(p.validate(), Err(ParamError::Negative { .. })));
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let p: RimParams = serde_json::from_str(r#"{ "height": 10.0 }"#).unwrap();
        assert_eq!(p.height, 10.0);
        assert_eq!(p.wheel_diameter, 20.5);
    }
}
