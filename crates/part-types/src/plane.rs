use serde::{Deserialize, Serialize};

use crate::math;

/// A 2D reference plane in world space.
///
/// Local coordinates `(u, v)` map to `origin + u * x_dir + v * y_dir`,
/// where `y_dir = normal × x_dir`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: [f64; 3],
    pub x_dir: [f64; 3],
    pub normal: [f64; 3],
}

impl Plane {
    /// Build a plane, normalizing both directions.
    /// Returns `None` when the directions are degenerate or not perpendicular.
    pub fn new(origin: [f64; 3], x_dir: [f64; 3], normal: [f64; 3]) -> Option<Self> {
        let x_dir = math::normalize(x_dir)?;
        let normal = math::normalize(normal)?;
        if math::dot(x_dir, normal).abs() > 1e-9 {
            return None;
        }
        Some(Self {
            origin,
            x_dir,
            normal,
        })
    }

    /// Look up one of the named workplanes: XY, YZ, ZX, XZ, YX, ZY.
    pub fn named(name: &str) -> Option<Self> {
        let (x_dir, normal) = match name {
            "XY" => ([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            "YZ" => ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
            "ZX" => ([0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            "XZ" => ([1.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
            "YX" => ([0.0, 1.0, 0.0], [0.0, 0.0, -1.0]),
            "ZY" => ([0.0, 0.0, 1.0], [-1.0, 0.0, 0.0]),
            _ => return None,
        };
        Some(Self {
            origin: [0.0; 3],
            x_dir,
            normal,
        })
    }

    pub fn xy() -> Self {
        Self {
            origin: [0.0; 3],
            x_dir: [1.0, 0.0, 0.0],
            normal: [0.0, 0.0, 1.0],
        }
    }

    pub fn y_dir(&self) -> [f64; 3] {
        math::cross(self.normal, self.x_dir)
    }

    pub fn to_world(&self, u: f64, v: f64) -> [f64; 3] {
        math::add(
            self.origin,
            math::add(math::scale(self.x_dir, u), math::scale(self.y_dir(), v)),
        )
    }

    /// Project a world point into local `(u, v)` plus its signed height above the plane.
    pub fn to_local(&self, p: [f64; 3]) -> (f64, f64, f64) {
        let d = math::sub(p, self.origin);
        (
            math::dot(d, self.x_dir),
            math::dot(d, self.y_dir()),
            math::dot(d, self.normal),
        )
    }

    /// Same plane with its origin moved by `(du, dv)` in local coordinates.
    pub fn offset_origin(&self, du: f64, dv: f64) -> Self {
        Self {
            origin: self.to_world(du, dv),
            ..*self
        }
    }

    /// Orthogonal projection of a world point onto the plane.
    pub fn project(&self, p: [f64; 3]) -> [f64; 3] {
        let (_, _, h) = self.to_local(p);
        math::sub(p, math::scale(self.normal, h))
    }

    /// True when both planes share a normal (up to sign) within `tol`.
    pub fn is_parallel_to(&self, other: &Plane, tol: f64) -> bool {
        math::dot(self.normal, other.normal).abs() > 1.0 - tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn named_planes_are_right_handed() {
        for name in ["XY", "YZ", "ZX", "XZ", "YX", "ZY"] {
            let plane = Plane::named(name).unwrap();
            let z = math::cross(plane.x_dir, plane.y_dir());
            assert_eq!(z, plane.normal, "plane {name}");
        }
        assert!(Plane::named("QQ").is_none());
    }

    #[test]
    fn local_world_round_trip() {
        let plane = Plane::named("XZ").unwrap().offset_origin(2.0, 3.0);
        let p = plane.to_world(1.5, -0.5);
        let (u, v, h) = plane.to_local(p);
        assert_relative_eq!(u, 1.5, epsilon = 1e-12);
        assert_relative_eq!(v, -0.5, epsilon = 1e-12);
        assert_relative_eq!(h, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_skewed_axes() {
        assert!(Plane::new([0.0; 3], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]).is_none());
        assert!(Plane::new([0.0; 3], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]).is_none());
    }
}
