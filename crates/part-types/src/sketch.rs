use serde::{Deserialize, Serialize};

/// Minimum clearance for two curves to count as separate (mm).
pub const CLEARANCE_EPS: f64 = 1e-9;

/// A closed curve in workplane coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Shape2d {
    /// Axis-aligned rectangle centered on `center`.
    Rect {
        center: (f64, f64),
        width: f64,
        height: f64,
    },
    Circle { center: (f64, f64), radius: f64 },
}

impl Shape2d {
    pub fn rect(center: (f64, f64), width: f64, height: f64) -> Self {
        Shape2d::Rect {
            center,
            width,
            height,
        }
    }

    pub fn circle(center: (f64, f64), radius: f64) -> Self {
        Shape2d::Circle { center, radius }
    }

    pub fn center(&self) -> (f64, f64) {
        match *self {
            Shape2d::Rect { center, .. } | Shape2d::Circle { center, .. } => center,
        }
    }

    /// Bounding box as `(min_u, min_v, max_u, max_v)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        match *self {
            Shape2d::Rect {
                center: (cu, cv),
                width,
                height,
            } => (
                cu - width / 2.0,
                cv - height / 2.0,
                cu + width / 2.0,
                cv + height / 2.0,
            ),
            Shape2d::Circle {
                center: (cu, cv),
                radius,
            } => (cu - radius, cv - radius, cu + radius, cv + radius),
        }
    }

    pub fn area(&self) -> f64 {
        match *self {
            Shape2d::Rect { width, height, .. } => width * height,
            Shape2d::Circle { radius, .. } => std::f64::consts::PI * radius * radius,
        }
    }

    /// Non-finite or non-positive dimensions.
    pub fn is_degenerate(&self) -> bool {
        let (cu, cv) = self.center();
        if !cu.is_finite() || !cv.is_finite() {
            return true;
        }
        match *self {
            Shape2d::Rect { width, height, .. } => {
                !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0)
            }
            Shape2d::Circle { radius, .. } => !(radius.is_finite() && radius > 0.0),
        }
    }

    pub fn translated(&self, du: f64, dv: f64) -> Self {
        match *self {
            Shape2d::Rect {
                center: (cu, cv),
                width,
                height,
            } => Shape2d::rect((cu + du, cv + dv), width, height),
            Shape2d::Circle {
                center: (cu, cv),
                radius,
            } => Shape2d::circle((cu + du, cv + dv), radius),
        }
    }

    /// Strictly inside the curve (points on the boundary are outside).
    pub fn contains_point(&self, p: (f64, f64)) -> bool {
        match *self {
            Shape2d::Rect {
                center: (cu, cv),
                width,
                height,
            } => (p.0 - cu).abs() < width / 2.0 && (p.1 - cv).abs() < height / 2.0,
            Shape2d::Circle { center, radius } => distance(center, p) < radius,
        }
    }

    /// `inner` lies strictly inside `self` without touching its boundary.
    pub fn contains_shape(&self, inner: &Shape2d) -> bool {
        match (*self, *inner) {
            (Shape2d::Rect { .. }, _) => {
                let (a0, b0, a1, b1) = self.bounds();
                let (c0, d0, c1, d1) = inner.bounds();
                c0 - a0 > CLEARANCE_EPS
                    && d0 - b0 > CLEARANCE_EPS
                    && a1 - c1 > CLEARANCE_EPS
                    && b1 - d1 > CLEARANCE_EPS
            }
            (
                Shape2d::Circle { center, radius },
                Shape2d::Circle {
                    center: ic,
                    radius: ir,
                },
            ) => radius - (distance(center, ic) + ir) > CLEARANCE_EPS,
            (Shape2d::Circle { center, radius }, Shape2d::Rect { .. }) => {
                let (c0, d0, c1, d1) = inner.bounds();
                [(c0, d0), (c1, d0), (c1, d1), (c0, d1)]
                    .iter()
                    .all(|&corner| radius - distance(center, corner) > CLEARANCE_EPS)
            }
        }
    }

    /// The two curves neither overlap nor touch.
    pub fn is_disjoint_from(&self, other: &Shape2d) -> bool {
        match (*self, *other) {
            (Shape2d::Rect { .. }, Shape2d::Rect { .. }) => {
                let (a0, b0, a1, b1) = self.bounds();
                let (c0, d0, c1, d1) = other.bounds();
                c0 - a1 > CLEARANCE_EPS
                    || a0 - c1 > CLEARANCE_EPS
                    || d0 - b1 > CLEARANCE_EPS
                    || b0 - d1 > CLEARANCE_EPS
            }
            (
                Shape2d::Circle { center, radius },
                Shape2d::Circle {
                    center: oc,
                    radius: or,
                },
            ) => distance(center, oc) - (radius + or) > CLEARANCE_EPS,
            (Shape2d::Circle { center, radius }, rect @ Shape2d::Rect { .. })
            | (rect @ Shape2d::Rect { .. }, Shape2d::Circle { center, radius }) => {
                let (c0, d0, c1, d1) = rect.bounds();
                let nearest = (center.0.clamp(c0, c1), center.1.clamp(d0, d1));
                distance(center, nearest) - radius > CLEARANCE_EPS
            }
        }
    }
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// Errors raised while turning a set of curves into extrudable regions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("no closed curves to extrude")]
    Empty,

    #[error("curve {index} is degenerate: {shape:?}")]
    Degenerate { index: usize, shape: Shape2d },

    #[error("curves {a} and {b} overlap or touch")]
    Overlap { a: usize, b: usize },
}

/// One face to extrude: an outer boundary and the holes cut into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub outer: Shape2d,
    #[serde(default)]
    pub holes: Vec<Shape2d>,
}

impl Region {
    pub fn solid(outer: Shape2d) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Net area of the face (outer minus holes).
    pub fn area(&self) -> f64 {
        self.outer.area() - self.holes.iter().map(Shape2d::area).sum::<f64>()
    }

    /// Check that `hole` can be cut into this region: strictly inside the
    /// outer boundary and clear of every existing hole.
    pub fn accepts_hole(&self, hole: &Shape2d) -> bool {
        !hole.is_degenerate()
            && self.outer.contains_shape(hole)
            && self.holes.iter().all(|h| h.is_disjoint_from(hole))
    }

    /// Sort a flat list of closed curves into regions.
    ///
    /// A curve's nesting depth is the number of curves strictly containing it.
    /// Even depths start a new region, odd depths become holes of their
    /// innermost container. Curves that neither nest nor stay apart are rejected.
    pub fn nest(shapes: &[Shape2d]) -> Result<Vec<Region>, ProfileError> {
        if shapes.is_empty() {
            return Err(ProfileError::Empty);
        }
        if let Some((index, shape)) = shapes.iter().enumerate().find(|(_, s)| s.is_degenerate()) {
            return Err(ProfileError::Degenerate {
                index,
                shape: *shape,
            });
        }

        for a in 0..shapes.len() {
            for b in (a + 1)..shapes.len() {
                let (sa, sb) = (&shapes[a], &shapes[b]);
                if !(sa.is_disjoint_from(sb) || sa.contains_shape(sb) || sb.contains_shape(sa)) {
                    return Err(ProfileError::Overlap { a, b });
                }
            }
        }

        let containers: Vec<Vec<usize>> = (0..shapes.len())
            .map(|i| {
                (0..shapes.len())
                    .filter(|&j| j != i && shapes[j].contains_shape(&shapes[i]))
                    .collect()
            })
            .collect();

        let mut regions = Vec::new();
        // shape index -> region index, for outers only
        let mut region_of = vec![None; shapes.len()];
        for (i, shape) in shapes.iter().enumerate() {
            if containers[i].len() % 2 == 0 {
                region_of[i] = Some(regions.len());
                regions.push(Region::solid(*shape));
            }
        }
        for (i, shape) in shapes.iter().enumerate() {
            let depth = containers[i].len();
            if depth % 2 == 1 {
                let parent = containers[i]
                    .iter()
                    .copied()
                    .find(|&j| containers[j].len() == depth - 1);
                if let Some(r) = parent.and_then(|j| region_of[j]) {
                    regions[r].holes.push(*shape);
                }
            }
        }
        Ok(regions)
    }
}
