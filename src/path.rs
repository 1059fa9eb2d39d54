//! Normalized river path: points, optional widths, arclength and bounds.

use kurbo::{Point, Rect};
use serde::Serialize;

use crate::centerline::CenterlineSample;
use crate::error::LabelError;
use crate::geom;

/// Minimum number of points a path must have.
pub const MIN_POINTS: usize = 3;

/// An immutable polyline with an optional per-point width profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathModel {
    points: Vec<Point>,
    /// `None` when no point carries a width. Otherwise index-aligned with
    /// `points`; `None` entries mean "width unknown", not zero.
    widths: Option<Vec<Option<f64>>>,
    /// Arclength from the first point to each point.
    cumulative: Vec<f64>,
    total_length: f64,
    bounds: Rect,
}

impl PathModel {
    /// Build a path from typed points and an optional width profile.
    pub fn new(points: Vec<Point>, widths: Option<Vec<Option<f64>>>) -> Result<Self, LabelError> {
        if points.len() < MIN_POINTS {
            return Err(LabelError::InvalidPath(format!(
                "path needs at least {} points, got {}",
                MIN_POINTS,
                points.len()
            )));
        }
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(LabelError::InvalidPath(format!(
                "point {} has a non-finite coordinate",
                i
            )));
        }
        if let Some(widths) = &widths {
            if widths.len() != points.len() {
                return Err(LabelError::InvalidPath(format!(
                    "width profile has {} entries for {} points",
                    widths.len(),
                    points.len()
                )));
            }
            if let Some(i) = widths.iter().position(|w| w.is_some_and(|w| !w.is_finite())) {
                return Err(LabelError::InvalidPath(format!(
                    "point {} has a non-finite width",
                    i
                )));
            }
        }

        let mut cumulative = Vec::with_capacity(points.len());
        let mut total_length = 0.0;
        cumulative.push(0.0);
        for pair in points.windows(2) {
            total_length += pair[0].distance(pair[1]);
            cumulative.push(total_length);
        }
        let bounds = geom::bounds(&points);

        Ok(Self {
            points,
            widths,
            cumulative,
            total_length,
            bounds,
        })
    }

    /// Build a path from raw coordinate records `[x, y]` or `[x, y, width]`.
    ///
    /// Any record carrying a width makes the whole path width-aware;
    /// records without one are stored as width-absent.
    pub fn from_coords(coords: &[Vec<f64>]) -> Result<Self, LabelError> {
        if coords.len() < MIN_POINTS {
            return Err(LabelError::InvalidPath(format!(
                "path needs at least {} points, got {}",
                MIN_POINTS,
                coords.len()
            )));
        }

        let mut points = Vec::with_capacity(coords.len());
        let mut widths = Vec::with_capacity(coords.len());
        for (i, record) in coords.iter().enumerate() {
            if record.len() != 2 && record.len() != 3 {
                return Err(LabelError::InvalidPath(format!(
                    "point {} has {} fields, expected 2 (x, y) or 3 (x, y, width)",
                    i,
                    record.len()
                )));
            }
            if let Some(field) = record.iter().position(|v| !v.is_finite()) {
                return Err(LabelError::InvalidPath(format!(
                    "point {} field {} is not a finite number",
                    i, field
                )));
            }
            points.push(Point::new(record[0], record[1]));
            widths.push(record.get(2).copied());
        }

        let widths = widths.iter().any(Option::is_some).then_some(widths);
        Self::new(points, widths)
    }

    /// Build a width-aware path from extracted centerline samples.
    pub fn from_centerline(samples: &[CenterlineSample]) -> Result<Self, LabelError> {
        let points = samples.iter().map(|s| s.point).collect();
        let widths = samples.iter().map(|s| Some(s.width)).collect();
        Self::new(points, Some(widths))
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The width profile, if any point carried a width.
    pub fn widths(&self) -> Option<&[Option<f64>]> {
        self.widths.as_deref()
    }

    pub fn is_width_aware(&self) -> bool {
        self.widths.is_some()
    }

    /// Width at point `i`; `None` when unknown or out of range.
    pub fn width_at(&self, i: usize) -> Option<f64> {
        self.widths.as_ref().and_then(|w| w.get(i).copied().flatten())
    }

    /// Arclength from the first point to each point.
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Arclength between points `start` and `end` (inclusive indices).
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn length_between(&self, start: usize, end: usize) -> f64 {
        self.cumulative[end] - self.cumulative[start]
    }

    /// Point at arclength `distance` from the start, clamped to the path.
    pub fn point_at_distance(&self, distance: f64) -> Point {
        let n = self.points.len();
        if distance <= 0.0 {
            return self.points[0];
        }
        if distance >= self.total_length {
            return self.points[n - 1];
        }
        // First point strictly past `distance`; the segment ends there.
        let end = self.cumulative.partition_point(|&c| c <= distance).min(n - 1);
        let start = end - 1;
        let seg = self.cumulative[end] - self.cumulative[start];
        if seg == 0.0 {
            return self.points[start];
        }
        let t = (distance - self.cumulative[start]) / seg;
        self.points[start].lerp(self.points[end], t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn coords(raw: &[&[f64]]) -> Vec<Vec<f64>> {
        raw.iter().map(|r| r.to_vec()).collect()
    }

    #[test]
    fn length_and_bounds_from_coords() {
        let path = PathModel::from_coords(&coords(&[&[0.0, 0.0], &[3.0, 4.0], &[3.0, 10.0]]))
            .unwrap();
        assert_eq!(path.len(), 3);
        assert_relative_eq!(path.total_length(), 11.0);
        assert_eq!(path.cumulative(), &[0.0, 5.0, 11.0]);
        assert_eq!(path.bounds(), Rect::new(0.0, 0.0, 3.0, 10.0));
        assert!(!path.is_width_aware());
    }

    #[test]
    fn width_presence_is_per_point() {
        let path = PathModel::from_coords(&coords(&[
            &[0.0, 0.0, 12.0],
            &[1.0, 0.0],
            &[2.0, 0.0, 8.0],
        ]))
        .unwrap();
        assert!(path.is_width_aware());
        assert_eq!(path.widths().unwrap(), &[Some(12.0), None, Some(8.0)]);
        assert_eq!(path.width_at(1), None);
    }

    #[test]
    fn too_few_points_is_rejected() {
        let err = PathModel::from_coords(&coords(&[&[0.0, 0.0], &[1.0, 1.0]])).unwrap_err();
        assert!(matches!(err, LabelError::InvalidPath(_)));
    }

    #[test]
    fn non_finite_coordinate_names_the_point() {
        let err = PathModel::from_coords(&coords(&[
            &[0.0, 0.0],
            &[1.0, f64::NAN],
            &[2.0, 0.0],
        ]))
        .unwrap_err();
        match err {
            LabelError::InvalidPath(reason) => assert!(reason.contains("point 1"), "{reason}"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let err = PathModel::from_coords(&coords(&[
            &[0.0, 0.0],
            &[1.0, 0.0, 5.0, 7.0],
            &[2.0, 0.0],
        ]))
        .unwrap_err();
        assert!(matches!(err, LabelError::InvalidPath(_)));

        let err =
            PathModel::from_coords(&coords(&[&[0.0], &[1.0, 0.0], &[2.0, 0.0]])).unwrap_err();
        assert!(matches!(err, LabelError::InvalidPath(_)));
    }

    #[test]
    fn infinite_width_is_rejected() {
        let err = PathModel::from_coords(&coords(&[
            &[0.0, 0.0, f64::INFINITY],
            &[1.0, 0.0],
            &[2.0, 0.0],
        ]))
        .unwrap_err();
        assert!(matches!(err, LabelError::InvalidPath(_)));
    }

    #[test]
    fn point_at_distance_interpolates_and_clamps() {
        let path = PathModel::from_coords(&coords(&[&[0.0, 0.0], &[10.0, 0.0], &[10.0, 10.0]]))
            .unwrap();
        assert_eq!(path.point_at_distance(5.0), Point::new(5.0, 0.0));
        assert_eq!(path.point_at_distance(15.0), Point::new(10.0, 5.0));
        assert_eq!(path.point_at_distance(-1.0), Point::new(0.0, 0.0));
        assert_eq!(path.point_at_distance(99.0), Point::new(10.0, 10.0));
    }
}
