//! Shared geometry utilities.

use kurbo::{Point, Rect, Vec2};

/// Unsigned angle between two vectors, in degrees [0, 180].
///
/// Uses the clamped arccosine of the normalized dot product, so tiny
/// floating-point drift past ±1 cannot produce NaN.
/// Zero-length inputs yield 0.
pub fn angle_between_deg(a: Vec2, b: Vec2) -> f64 {
    let la = a.hypot();
    let lb = b.hypot();
    if la == 0.0 || lb == 0.0 {
        return 0.0;
    }
    let cos = (a.dot(b) / (la * lb)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Direction of the segment `a → b` in radians (`atan2(dy, dx)`).
pub fn heading(a: Point, b: Point) -> f64 {
    let d = b - a;
    d.y.atan2(d.x)
}

/// Wrap an angle difference in degrees into [-180, 180].
pub fn wrap_deg(mut d: f64) -> f64 {
    while d > 180.0 {
        d -= 360.0;
    }
    while d < -180.0 {
        d += 360.0;
    }
    d
}

/// Centered moving average with window 3.
///
/// The first and last entries average with their single available
/// neighbor; a one-element input is returned unchanged.
pub fn smooth3(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(1);
            let hi = (i + 1).min(n - 1);
            let window = &values[lo..=hi];
            window.iter().sum::<f64>() / window.len() as f64
        })
        .collect()
}

/// Axis-aligned bounding box of a point set. Empty input → `Rect::ZERO`.
pub fn bounds(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn right_angle_is_ninety_degrees() {
        let a = Vec2::new(10.0, 0.0);
        let b = Vec2::new(0.0, 10.0);
        assert_relative_eq!(angle_between_deg(a, b), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn parallel_vectors_do_not_produce_nan() {
        let a = Vec2::new(0.1, 0.2);
        let b = Vec2::new(0.3, 0.6);
        let angle = angle_between_deg(a, b);
        assert!(angle.is_finite());
        assert!(angle < 1e-5);
    }

    #[test]
    fn smoothing_uses_available_neighbors_at_ends() {
        let smoothed = smooth3(&[0.0, 9.0, 0.0]);
        assert_relative_eq!(smoothed[0], 4.5);
        assert_relative_eq!(smoothed[1], 3.0);
        assert_relative_eq!(smoothed[2], 4.5);
    }

    #[test]
    fn wrap_keeps_differences_in_half_turn() {
        assert_relative_eq!(wrap_deg(270.0), -90.0);
        assert_relative_eq!(wrap_deg(-350.0), 10.0);
        assert_relative_eq!(wrap_deg(180.0), 180.0);
    }

    #[test]
    fn bounds_cover_all_points() {
        let r = bounds(&[
            Point::new(3.0, -1.0),
            Point::new(-2.0, 4.0),
            Point::new(0.0, 0.0),
        ]);
        assert_eq!(r, Rect::new(-2.0, -1.0, 3.0, 4.0));
    }
}
