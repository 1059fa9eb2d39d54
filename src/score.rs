//! Candidate window enumeration, scoring and selection.
//!
//! Every window of consecutive usable points long enough to hold the
//! label is scored on four criteria (low curvature, ample width, central
//! position, straightness). The best window wins; when nothing fits, the
//! longest usable run is offered instead with a warning.

use std::cmp::Ordering;

use kurbo::Point;
use log::debug;
use serde::Serialize;

use crate::analyze::GeometryAnalysis;
use crate::error::PlacementWarning;
use crate::geom;
use crate::path::PathModel;

const CURVATURE_WEIGHT: f64 = 0.4;
const WIDTH_WEIGHT: f64 = 0.2;
const POSITION_WEIGHT: f64 = 0.2;
const STRAIGHTNESS_WEIGHT: f64 = 0.2;

/// Fixed reference width at which the width score saturates.
pub const IDEAL_WIDTH: f64 = 20.0;
/// Width score when the ribbon width is unknown.
const NEUTRAL_WIDTH_SCORE: f64 = 50.0;

/// Per-criterion scores, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentScores {
    pub curvature: f64,
    pub width: f64,
    pub position: f64,
    pub straightness: f64,
}

impl ComponentScores {
    /// Weighted sum of the four criteria.
    pub fn overall(&self) -> f64 {
        let sum = self.curvature * CURVATURE_WEIGHT
            + self.width * WIDTH_WEIGHT
            + self.position * POSITION_WEIGHT
            + self.straightness * STRAIGHTNESS_WEIGHT;
        sum.clamp(0.0, 100.0)
    }
}

/// A scored window `[start, end]` of path points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacementCandidate {
    pub start: usize,
    pub end: usize,
    /// Arclength of the window.
    pub length: f64,
    pub score: f64,
    pub scores: ComponentScores,
    /// Path point at the window's arclength midpoint.
    pub visual_center: Point,
}

/// Ranked candidates plus the chosen window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    /// All fitting candidates, best first.
    pub candidates: Vec<PlacementCandidate>,
    /// Best candidate, the fallback run, or `None` if the whole path is rejected.
    pub selected: Option<PlacementCandidate>,
    pub warning: Option<PlacementWarning>,
}

/// Enumerate, score and select placement windows for a label of
/// `label_length` path units.
///
/// # Panics
///
/// Panics if `analysis` was not computed from `path`.
pub fn place(path: &PathModel, analysis: &GeometryAnalysis, label_length: f64) -> Placement {
    assert_eq!(
        analysis.curvature.len(),
        path.len(),
        "analysis belongs to a different path"
    );
    let rejected = analysis.rejected_mask();
    let mut candidates = enumerate(path, analysis, &rejected, label_length);
    candidates.sort_by(rank);

    if let Some(best) = candidates.first().copied() {
        debug!(
            "score: {} candidates, best [{}..={}] score {:.1}",
            candidates.len(),
            best.start,
            best.end,
            best.score
        );
        return Placement {
            candidates,
            selected: Some(best),
            warning: None,
        };
    }

    match longest_usable_run(path, &rejected) {
        Some((start, end)) => {
            let fallback = score_window(path, analysis, start, end);
            let warning = PlacementWarning::NoFittingPlacement {
                required: label_length,
                available: fallback.length,
            };
            debug!("score: {}; falling back to [{}..={}]", warning, start, end);
            Placement {
                candidates,
                selected: Some(fallback),
                warning: Some(warning),
            }
        }
        None => {
            debug!("score: {}", PlacementWarning::NoUsablePath);
            Placement {
                candidates,
                selected: None,
                warning: Some(PlacementWarning::NoUsablePath),
            }
        }
    }
}

/// Higher overall score first; exact ties go to the more central window.
/// `sort_by` is stable, so remaining ties keep enumeration order.
fn rank(a: &PlacementCandidate, b: &PlacementCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.scores.position.total_cmp(&a.scores.position))
}

/// All windows that hold the label without touching a rejected point.
///
/// A window grows one segment at a time from each usable start and stops
/// before the first rejected point, so no rejected index can fall inside
/// it. Every length-qualifying end yields its own (overlapping) candidate.
fn enumerate(
    path: &PathModel,
    analysis: &GeometryAnalysis,
    rejected: &[bool],
    label_length: f64,
) -> Vec<PlacementCandidate> {
    let n = path.len();
    let mut candidates = Vec::new();

    for start in (0..n).filter(|&i| !rejected[i]) {
        for end in start + 1..n {
            if rejected[end] {
                break;
            }
            // Measured exactly like the candidate's reported length.
            if path.length_between(start, end) >= label_length {
                candidates.push(score_window(path, analysis, start, end));
            }
        }
    }
    candidates
}

/// Longest run of consecutive usable points by arclength (first on ties).
fn longest_usable_run(path: &PathModel, rejected: &[bool]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut i = 0;
    while i < rejected.len() {
        if rejected[i] {
            i += 1;
            continue;
        }
        let start = i;
        while i + 1 < rejected.len() && !rejected[i + 1] {
            i += 1;
        }
        let longer = best.map_or(true, |(s, e)| {
            path.length_between(start, i) > path.length_between(s, e)
        });
        if longer {
            best = Some((start, i));
        }
        i += 1;
    }
    best
}

fn score_window(
    path: &PathModel,
    analysis: &GeometryAnalysis,
    start: usize,
    end: usize,
) -> PlacementCandidate {
    let cumulative = path.cumulative();
    let center = (cumulative[start] + cumulative[end]) / 2.0;
    let scores = ComponentScores {
        curvature: curvature_score(&analysis.curvature[start..=end]),
        width: width_score(path, start, end),
        position: position_score(center, path.total_length()),
        straightness: straightness_score(&path.points()[start..=end]),
    };
    PlacementCandidate {
        start,
        end,
        length: path.length_between(start, end),
        score: scores.overall(),
        scores,
        visual_center: path.point_at_distance(center),
    }
}

fn curvature_score(curvature: &[f64]) -> f64 {
    let mean = curvature.iter().sum::<f64>() / curvature.len() as f64;
    (100.0 - 3.0 * mean).clamp(0.0, 100.0)
}

/// Mean known width relative to [`IDEAL_WIDTH`]; neutral when unknown.
fn width_score(path: &PathModel, start: usize, end: usize) -> f64 {
    let known: Vec<f64> = (start..=end).filter_map(|i| path.width_at(i)).collect();
    if known.is_empty() {
        return NEUTRAL_WIDTH_SCORE;
    }
    let mean = known.iter().sum::<f64>() / known.len() as f64;
    (100.0 * mean / IDEAL_WIDTH).clamp(0.0, 100.0)
}

/// Linear falloff from 100 at the path midpoint to 0 at either end.
fn position_score(center: f64, total_length: f64) -> f64 {
    if total_length == 0.0 {
        return 100.0;
    }
    let half = total_length / 2.0;
    (100.0 * (1.0 - (center - half).abs() / half)).clamp(0.0, 100.0)
}

/// Penalize spread of segment headings inside the window.
///
/// Deviations are taken from the arithmetic mean heading and wrapped into
/// [-180°, 180°] before squaring. Zero-length segments have no heading.
fn straightness_score(points: &[Point]) -> f64 {
    let headings: Vec<f64> = points
        .windows(2)
        .filter(|w| w[0] != w[1])
        .map(|w| geom::heading(w[0], w[1]).to_degrees())
        .collect();
    if headings.len() < 2 {
        return 100.0;
    }
    let mean = headings.iter().sum::<f64>() / headings.len() as f64;
    let variance = headings
        .iter()
        .map(|h| geom::wrap_deg(h - mean).powi(2))
        .sum::<f64>()
        / headings.len() as f64;
    (100.0 - 5.0 * variance.sqrt()).clamp(0.0, 100.0)
}
