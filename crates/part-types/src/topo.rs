use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::math;

/// The kind of topological entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TopoKind {
    Vertex,
    Edge,
    Face,
    Solid,
}

/// Geometric signature of a topological entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopoSignature {
    /// Surface type (planar, cylindrical, revolved, nurbs).
    pub surface_type: Option<String>,
    /// Surface area (for faces).
    pub area: Option<f64>,
    /// Centroid position [x, y, z].
    pub centroid: Option<[f64; 3]>,
    /// Outward-pointing normal (planar faces only).
    pub normal: Option<[f64; 3]>,
    /// Axis-aligned bounding box [min_x, min_y, min_z, max_x, max_y, max_z].
    pub bbox: Option<[f64; 6]>,
    /// Edge length (for edges).
    pub length: Option<f64>,
}

impl TopoSignature {
    pub fn empty() -> Self {
        Self {
            surface_type: None,
            area: None,
            centroid: None,
            normal: None,
            bbox: None,
            length: None,
        }
    }

    pub fn is_planar(&self) -> bool {
        self.surface_type.as_deref() == Some("planar")
    }
}

/// World axis used by face selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn direction(self) -> [f64; 3] {
        match self {
            Axis::X => [1.0, 0.0, 0.0],
            Axis::Y => [0.0, 1.0, 0.0],
            Axis::Z => [0.0, 0.0, 1.0],
        }
    }
}

/// Face filter in the compact string syntax of CSG scripting tools.
///
/// | syntax | meaning                                             |
/// |--------|-----------------------------------------------------|
/// | `>Z`   | faces whose centroid is furthest along +Z           |
/// | `<Z`   | faces whose centroid is furthest along -Z           |
/// | `+Z`   | planar faces whose normal points along +Z           |
/// | `-Z`   | planar faces whose normal points along -Z           |
/// | `\|Z`  | planar faces whose normal is parallel to Z          |
/// | `#Z`   | planar faces whose normal is perpendicular to Z     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceSelector {
    Max(Axis),
    Min(Axis),
    Along(Axis),
    Against(Axis),
    Parallel(Axis),
    Perpendicular(Axis),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("unknown face selector {0:?}")]
    Unknown(String),
}

/// Tolerance on centroid heights and normal cosines when selecting faces.
pub const SELECT_TOL: f64 = 1e-4;

impl FromStr for FaceSelector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(op), Some(axis), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SelectorError::Unknown(s.to_string()));
        };
        let axis = match axis.to_ascii_uppercase() {
            'X' => Axis::X,
            'Y' => Axis::Y,
            'Z' => Axis::Z,
            _ => return Err(SelectorError::Unknown(s.to_string())),
        };
        match op {
            '>' => Ok(FaceSelector::Max(axis)),
            '<' => Ok(FaceSelector::Min(axis)),
            '+' => Ok(FaceSelector::Along(axis)),
            '-' => Ok(FaceSelector::Against(axis)),
            '|' => Ok(FaceSelector::Parallel(axis)),
            '#' => Ok(FaceSelector::Perpendicular(axis)),
            _ => Err(SelectorError::Unknown(s.to_string())),
        }
    }
}

impl fmt::Display for FaceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (op, axis) = match self {
            FaceSelector::Max(a) => ('>', a),
            FaceSelector::Min(a) => ('<', a),
            FaceSelector::Along(a) => ('+', a),
            FaceSelector::Against(a) => ('-', a),
            FaceSelector::Parallel(a) => ('|', a),
            FaceSelector::Perpendicular(a) => ('#', a),
        };
        write!(f, "{op}{axis:?}")
    }
}

impl FaceSelector {
    /// Filter candidate faces, keeping input order.
    pub fn select<Id: Copy>(&self, faces: &[(Id, TopoSignature)]) -> Vec<Id> {
        match *self {
            FaceSelector::Max(axis) => extreme(faces, axis.direction()),
            FaceSelector::Min(axis) => extreme(faces, math::scale(axis.direction(), -1.0)),
            FaceSelector::Along(axis) => by_normal(faces, |n| {
                math::same_direction(n, axis.direction(), SELECT_TOL)
            }),
            FaceSelector::Against(axis) => by_normal(faces, |n| {
                math::same_direction(n, math::scale(axis.direction(), -1.0), SELECT_TOL)
            }),
            FaceSelector::Parallel(axis) => by_normal(faces, |n| {
                math::dot(n, axis.direction()).abs() > 1.0 - SELECT_TOL
            }),
            FaceSelector::Perpendicular(axis) => by_normal(faces, |n| {
                math::dot(n, axis.direction()).abs() < SELECT_TOL
            }),
        }
    }
}

fn extreme<Id: Copy>(faces: &[(Id, TopoSignature)], dir: [f64; 3]) -> Vec<Id> {
    let heights: Vec<(Id, f64)> = faces
        .iter()
        .filter_map(|(id, sig)| sig.centroid.map(|c| (*id, math::dot(c, dir))))
        .collect();
    let Some(best) = heights.iter().map(|(_, h)| *h).reduce(f64::max) else {
        return Vec::new();
    };
    heights
        .into_iter()
        .filter(|(_, h)| best - h < SELECT_TOL)
        .map(|(id, _)| id)
        .collect()
}

fn by_normal<Id: Copy>(
    faces: &[(Id, TopoSignature)],
    keep: impl Fn([f64; 3]) -> bool,
) -> Vec<Id> {
    faces
        .iter()
        .filter(|(_, sig)| sig.is_planar())
        .filter_map(|(id, sig)| sig.normal.filter(|n| keep(*n)).map(|_| *id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planar(centroid: [f64; 3], normal: [f64; 3]) -> TopoSignature {
        TopoSignature {
            surface_type: Some("planar".to_string()),
            centroid: Some(centroid),
            normal: Some(normal),
            ..TopoSignature::empty()
        }
    }

    fn disc_faces() -> Vec<(u32, TopoSignature)> {
        vec![
            (0, planar([0.0, 0.0, 0.0], [0.0, 0.0, -1.0])),
            (1, planar([0.0, 0.0, 8.0], [0.0, 0.0, 1.0])),
            (
                2,
                TopoSignature {
                    surface_type: Some("cylindrical".to_string()),
                    centroid: Some([0.0, 0.0, 4.0]),
                    ..TopoSignature::empty()
                },
            ),
        ]
    }

    #[test]
    fn parses_all_operators() {
        assert_eq!(">Z".parse::<FaceSelector>(), Ok(FaceSelector::Max(Axis::Z)));
        assert_eq!("<x".parse::<FaceSelector>(), Ok(FaceSelector::Min(Axis::X)));
        assert_eq!("+Y".parse::<FaceSelector>(), Ok(FaceSelector::Along(Axis::Y)));
        assert_eq!("-Z".parse::<FaceSelector>(), Ok(FaceSelector::Against(Axis::Z)));
        assert_eq!("|Z".parse::<FaceSelector>(), Ok(FaceSelector::Parallel(Axis::Z)));
        assert_eq!("#Z".parse::<FaceSelector>(), Ok(FaceSelector::Perpendicular(Axis::Z)));
        assert!(">W".parse::<FaceSelector>().is_err());
        assert!(">ZZ".parse::<FaceSelector>().is_err());
        assert!("".parse::<FaceSelector>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for s in [">Z", "<X", "+Y", "-Z", "|X", "#Y"] {
            let sel: FaceSelector = s.parse().unwrap();
            assert_eq!(sel.to_string(), s);
        }
    }

    #[test]
    fn max_z_picks_top_cap() {
        let faces = disc_faces();
        assert_eq!(FaceSelector::Max(Axis::Z).select(&faces), vec![1]);
        assert_eq!(FaceSelector::Min(Axis::Z).select(&faces), vec![0]);
    }

    #[test]
    fn normal_selectors_skip_curved_faces() {
        let faces = disc_faces();
        assert_eq!(FaceSelector::Parallel(Axis::Z).select(&faces), vec![0, 1]);
        assert_eq!(FaceSelector::Against(Axis::Z).select(&faces), vec![0]);
        assert!(FaceSelector::Perpendicular(Axis::Z).select(&faces).is_empty());
    }
}
