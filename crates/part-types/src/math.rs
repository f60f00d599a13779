//! Small vector helpers over `[f64; 3]`, the coordinate type used across crates.

pub fn add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(a: [f64; 3], s: f64) -> [f64; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

pub fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn length(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

/// Unit vector along `a`, or `None` for a (near) zero vector.
pub fn normalize(a: [f64; 3]) -> Option<[f64; 3]> {
    let len = length(a);
    if len < 1e-12 {
        None
    } else {
        Some(scale(a, 1.0 / len))
    }
}

/// True when `a` and `b` are unit vectors pointing the same way within `tol` (cosine distance).
pub fn same_direction(a: [f64; 3], b: [f64; 3], tol: f64) -> bool {
    dot(a, b) > 1.0 - tol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_of_axes() {
        assert_eq!(cross([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
        assert_eq!(cross([0.0, 1.0, 0.0], [0.0, 0.0, 1.0]), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn normalize_rejects_zero() {
        assert!(normalize([0.0, 0.0, 0.0]).is_none());
        let n = normalize([0.0, 3.0, 4.0]).unwrap();
        assert!((length(n) - 1.0).abs() < 1e-12);
    }
}
