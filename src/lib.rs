//! riverlabel: label placement along winding, variable-width river paths.
//!
//! Finds where a label reads best along a river centerline and lays out
//! each glyph along it, ready for any renderer.
//!
//! # Example
//!
//! ```
//! use riverlabel::{place_label, MonospaceMetrics, PathInput, PlacementConfig};
//!
//! let coords = (0..=20).map(|i| vec![i as f64 * 20.0, 0.0, 25.0]).collect();
//! let layout = place_label(
//!     &PathInput::Coordinates(coords),
//!     "Danube",
//!     &MonospaceMetrics::default(),
//!     &PlacementConfig::default(),
//! )?;
//! assert_eq!(layout.glyphs.len(), 6);
//! # Ok::<(), riverlabel::LabelError>(())
//! ```

#![forbid(unsafe_code)]

mod config;
mod geom;

pub mod analyze;
pub mod centerline;
pub mod error;
pub mod glyphs;
pub mod path;
pub mod score;

// Re-export kurbo so callers build polygon rings with the same version.
pub use kurbo;

pub use analyze::{GeometryAnalysis, RejectReason, RejectedRegion};
pub use centerline::CenterlineSample;
pub use config::{FontSpec, PlacementConfig};
pub use error::{LabelError, PlacementWarning};
pub use glyphs::{GlyphMetrics, GlyphPlacement, MonospaceMetrics};
pub use path::PathModel;
pub use score::{ComponentScores, Placement, PlacementCandidate};

use kurbo::Point;
use log::debug;
use serde::Serialize;

/// Raw geometry handed to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PathInput {
    /// Centerline records `[x, y]` or `[x, y, width]`.
    Coordinates(Vec<Vec<f64>>),
    /// Closed river polygon; its centerline is extracted first.
    Polygon(Vec<Point>),
}

/// Everything the pipeline produced for one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelLayout {
    pub path: PathModel,
    pub analysis: GeometryAnalysis,
    pub placement: Placement,
    /// Empty when no window could be selected.
    pub glyphs: Vec<GlyphPlacement>,
}

impl LabelLayout {
    pub fn warning(&self) -> Option<PlacementWarning> {
        self.placement.warning
    }
}

/// Build the path model for an input, extracting a centerline from
/// polygons.
pub fn build_path(input: &PathInput, config: &PlacementConfig) -> Result<PathModel, LabelError> {
    match input {
        PathInput::Coordinates(coords) => PathModel::from_coords(coords),
        PathInput::Polygon(ring) => {
            let samples = centerline::extract(ring, config.max_centerline_samples)?;
            PathModel::from_centerline(&samples)
        }
    }
}

/// Full pipeline: input geometry + label → scored placement and glyphs.
///
/// Input errors are fatal; "no good spot" is not, and comes back as
/// [`LabelLayout::warning`].
pub fn place_label(
    input: &PathInput,
    text: &str,
    metrics: &impl GlyphMetrics,
    config: &PlacementConfig,
) -> Result<LabelLayout, LabelError> {
    let path = build_path(input, config)?;
    debug!(
        "path: {} points, length {:.1}, width-aware {}",
        path.len(),
        path.total_length(),
        path.is_width_aware()
    );

    let analysis = analyze::analyze(&path, config);
    let label_length = glyphs::measure_text(text, metrics, &config.font);
    let placement = score::place(&path, &analysis, label_length);

    let glyphs = match &placement.selected {
        Some(selected) => glyphs::place(text, &path, selected.start, metrics, &config.font)?,
        None => Vec::new(),
    };

    Ok(LabelLayout {
        path,
        analysis,
        placement,
        glyphs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn coords(raw: &[&[f64]]) -> PathInput {
        PathInput::Coordinates(raw.iter().map(|r| r.to_vec()).collect())
    }

    #[test]
    fn straight_river_places_label_in_the_middle() {
        let input = coords(&[
            &[0.0, 0.0],
            &[100.0, 0.0],
            &[200.0, 0.0],
            &[300.0, 0.0],
            &[400.0, 0.0],
        ]);
        let layout = place_label(
            &input,
            "Test",
            &MonospaceMetrics::default(),
            &PlacementConfig::default(),
        )
        .unwrap();
        let selected = layout.placement.selected.unwrap();
        assert_relative_eq!(selected.scores.curvature, 100.0, epsilon = 1e-6);
        assert_relative_eq!(selected.scores.straightness, 100.0, epsilon = 1e-6);
        assert!(selected.scores.position > 95.0);
        assert_eq!(layout.glyphs.len(), 4);
        assert!(layout.glyphs.iter().all(|g| g.y == 0.0 && g.x >= 200.0));
    }

    #[test]
    fn polygon_input_goes_through_the_centerline() {
        let mut ring = Vec::new();
        for i in 0..=40 {
            ring.push(Point::new(i as f64 * 25.0, 0.0));
        }
        for i in (0..=40).rev() {
            ring.push(Point::new(i as f64 * 25.0, 30.0));
        }
        let layout = place_label(
            &PathInput::Polygon(ring),
            "Amazon",
            &MonospaceMetrics::default(),
            &PlacementConfig::default(),
        )
        .unwrap();
        assert!(layout.path.is_width_aware());
        assert!(layout.warning().is_none());
        let selected = layout.placement.selected.unwrap();
        assert_relative_eq!(selected.scores.width, 100.0, epsilon = 1e-9);
        assert_eq!(layout.glyphs.len(), 6);
        for g in &layout.glyphs {
            assert_relative_eq!(g.y, 15.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn invalid_coordinates_are_fatal() {
        let err = place_label(
            &coords(&[&[0.0, 0.0], &[1.0, 1.0]]),
            "x",
            &MonospaceMetrics::default(),
            &PlacementConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LabelError::InvalidPath(_)));
    }

    #[test]
    fn degenerate_polygon_is_fatal() {
        let err = place_label(
            &PathInput::Polygon(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]),
            "x",
            &MonospaceMetrics::default(),
            &PlacementConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LabelError::InvalidGeometry(_)));
    }

    #[test]
    fn fully_narrow_river_places_no_glyphs() {
        let input = coords(&[
            &[0.0, 0.0, 3.0],
            &[50.0, 0.0, 3.0],
            &[100.0, 0.0, 3.0],
            &[150.0, 0.0, 3.0],
        ]);
        let layout = place_label(
            &input,
            "Creek",
            &MonospaceMetrics::default(),
            &PlacementConfig::default(),
        )
        .unwrap();
        assert!(layout.glyphs.is_empty());
        assert_eq!(layout.warning(), Some(PlacementWarning::NoUsablePath));
    }

    #[test]
    fn caller_supplied_metrics_drive_the_fit() {
        let input = PathInput::Coordinates((0..=10).map(|i| vec![i as f64 * 10.0, 0.0]).collect());
        let wide = |_: char, size: f64, _: &str| size * 10.0;
        let layout = place_label(&input, "Nile", &wide, &PlacementConfig::default()).unwrap();
        assert!(matches!(
            layout.warning(),
            Some(PlacementWarning::NoFittingPlacement { .. })
        ));
        assert_eq!(layout.glyphs.len(), 4);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Coordinate records, roughly half of them carrying a width.
    fn records() -> impl Strategy<Value = Vec<Vec<f64>>> {
        prop::collection::vec(
            (
                -500.0f64..500.0,
                -500.0f64..500.0,
                prop::option::of(0.0f64..40.0),
            ),
            3..40,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(x, y, w)| match w {
                    Some(w) => vec![x, y, w],
                    None => vec![x, y],
                })
                .collect()
        })
    }

    fn in_score_range(value: f64) -> bool {
        (0.0..=100.0).contains(&value)
    }

    fn scores_in_range(c: &PlacementCandidate) -> bool {
        [
            c.score,
            c.scores.curvature,
            c.scores.width,
            c.scores.position,
            c.scores.straightness,
        ]
        .into_iter()
        .all(in_score_range)
    }

    proptest! {
        #[test]
        fn path_keeps_every_record(coords in records()) {
            let path = PathModel::from_coords(&coords).unwrap();
            prop_assert_eq!(path.len(), coords.len());
            for (i, record) in coords.iter().enumerate() {
                prop_assert_eq!(path.width_at(i), record.get(2).copied());
            }
        }

        #[test]
        fn curvature_profile_is_aligned_and_non_negative(coords in records()) {
            let path = PathModel::from_coords(&coords).unwrap();
            let analysis = analyze::analyze(&path, &PlacementConfig::default());
            let n = path.len();
            prop_assert_eq!(analysis.curvature.len(), n);
            prop_assert_eq!(analysis.curvature[0], 0.0);
            prop_assert_eq!(analysis.curvature[n - 1], 0.0);
            prop_assert!(analysis.curvature.iter().all(|c| c.is_finite() && *c >= 0.0));
            prop_assert!(analysis.regions.iter().all(|r| r.start <= r.end && r.end < n));
        }

        #[test]
        fn placement_respects_rejections_and_ranking(
            coords in records(),
            label_length in 0.0f64..400.0,
        ) {
            let path = PathModel::from_coords(&coords).unwrap();
            let analysis = analyze::analyze(&path, &PlacementConfig::default());
            let rejected = analysis.rejected_mask();
            let placement = score::place(&path, &analysis, label_length);

            for c in &placement.candidates {
                prop_assert!(scores_in_range(c), "{:?}", c);
                prop_assert!(c.length >= label_length);
                prop_assert!((c.start..=c.end).all(|i| !rejected[i]), "{:?}", c);
            }
            if let Some(selected) = &placement.selected {
                prop_assert!(scores_in_range(selected), "{:?}", selected);
                prop_assert!((selected.start..=selected.end).all(|i| !rejected[i]));
            }
            match placement.candidates.first() {
                Some(best) => {
                    prop_assert_eq!(placement.selected.as_ref(), Some(best));
                    prop_assert!(placement.warning.is_none());
                    for c in &placement.candidates {
                        prop_assert!(c.score <= best.score);
                        if c.score == best.score {
                            prop_assert!(c.scores.position <= best.scores.position);
                        }
                    }
                }
                None => prop_assert!(placement.warning.is_some()),
            }
        }

        #[test]
        fn every_character_is_placed(coords in records(), text in "[A-Za-z ]{0,12}") {
            let layout = place_label(
                &PathInput::Coordinates(coords),
                &text,
                &MonospaceMetrics::default(),
                &PlacementConfig::default(),
            )
            .unwrap();
            if layout.placement.selected.is_some() {
                prop_assert_eq!(layout.glyphs.len(), text.chars().count());
                prop_assert!(layout.glyphs.iter().all(|g| g.x.is_finite() && g.y.is_finite()));
            } else {
                prop_assert!(layout.glyphs.is_empty());
            }
        }
    }
}
