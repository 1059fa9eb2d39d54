//! Curvature profile and rejected-region classification.
//!
//! Marks the parts of a path a label must not sit on: sharp bends, narrow
//! stretches of the ribbon, and the first/last tenth of the path.

use log::debug;
use serde::Serialize;

use crate::config::PlacementConfig;
use crate::geom;
use crate::path::PathModel;

/// Fraction of the total length excluded at each end of the path.
pub const EDGE_FRACTION: f64 = 0.1;

/// Why a region was excluded from placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    SharpCurve,
    NarrowSection,
    PathEdge,
}

/// A contiguous, inclusive index range of the path excluded from placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RejectedRegion {
    pub start: usize,
    pub end: usize,
    /// Arclength from `start` to `end`.
    pub length: f64,
    pub reason: RejectReason,
}

/// Everything the scorer needs to know about a path's shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GeometryAnalysis {
    /// Smoothed curvature in degrees per unit distance, one per point.
    pub curvature: Vec<f64>,
    pub regions: Vec<RejectedRegion>,
    /// Mean curvature over interior points.
    pub average_curvature: f64,
    pub max_curvature: f64,
}

impl GeometryAnalysis {
    /// Regions carrying a given reason.
    pub fn regions_with(&self, reason: RejectReason) -> impl Iterator<Item = &RejectedRegion> {
        self.regions.iter().filter(move |r| r.reason == reason)
    }

    /// Union of all region indices as a bitmap over point indices.
    ///
    /// Sized by the curvature profile; regions are expected to come from
    /// the same [`analyze`] call.
    pub fn rejected_mask(&self) -> Vec<bool> {
        let mut mask = vec![false; self.curvature.len()];
        for region in &self.regions {
            for flag in &mut mask[region.start..=region.end] {
                *flag = true;
            }
        }
        mask
    }
}

/// Analyze a path's curvature and classify its unusable regions.
pub fn analyze(path: &PathModel, config: &PlacementConfig) -> GeometryAnalysis {
    if path.len() < 3 {
        return GeometryAnalysis::default();
    }

    let curvature = curvature_profile(path);
    let n = curvature.len();
    let average_curvature = curvature[1..n - 1].iter().sum::<f64>() / (n - 2) as f64;
    let max_curvature = curvature.iter().copied().fold(0.0, f64::max);

    let mut regions = Vec::new();
    regions.extend(runs(&curvature, |c| c > config.curvature_threshold).map(|(start, end)| {
        region(path, start, end, RejectReason::SharpCurve)
    }));
    if let Some(widths) = path.widths() {
        regions.extend(
            runs(widths, |w| w.is_some_and(|w| w < config.min_width))
                .map(|(start, end)| region(path, start, end, RejectReason::NarrowSection)),
        );
    }
    regions.extend(edge_regions(path));

    debug!(
        "analyze: {} points, avg curvature {:.3}, max {:.3}, {} sharp, {} narrow",
        n,
        average_curvature,
        max_curvature,
        regions.iter().filter(|r| r.reason == RejectReason::SharpCurve).count(),
        regions.iter().filter(|r| r.reason == RejectReason::NarrowSection).count(),
    );

    GeometryAnalysis {
        curvature,
        regions,
        average_curvature,
        max_curvature,
    }
}

/// Turning angle per unit distance at each point, smoothed.
///
/// The first and last point have no interior neighbors and are always 0.
/// Degenerate (zero-length) segments give 0 rather than an error.
pub fn curvature_profile(path: &PathModel) -> Vec<f64> {
    let points = path.points();
    let n = points.len();
    if n < 3 {
        return vec![0.0; n];
    }

    let mut raw = vec![0.0; n];
    for i in 1..n - 1 {
        let v1 = points[i] - points[i - 1];
        let v2 = points[i + 1] - points[i];
        let (l1, l2) = (v1.hypot(), v2.hypot());
        if l1 == 0.0 || l2 == 0.0 {
            continue;
        }
        raw[i] = geom::angle_between_deg(v1, v2) / ((l1 + l2) / 2.0);
    }

    let mut smoothed = geom::smooth3(&raw);
    smoothed[0] = 0.0;
    smoothed[n - 1] = 0.0;
    smoothed
}

/// Maximal runs of consecutive indices satisfying `pred`, as inclusive ranges.
fn runs<'a, T: Copy + 'a>(
    values: &'a [T],
    pred: impl Fn(T) -> bool + 'a,
) -> impl Iterator<Item = (usize, usize)> + 'a {
    let mut i = 0;
    std::iter::from_fn(move || {
        while i < values.len() && !pred(values[i]) {
            i += 1;
        }
        if i >= values.len() {
            return None;
        }
        let start = i;
        while i < values.len() && pred(values[i]) {
            i += 1;
        }
        Some((start, i - 1))
    })
}

fn region(path: &PathModel, start: usize, end: usize, reason: RejectReason) -> RejectedRegion {
    RejectedRegion {
        start,
        end,
        length: path.length_between(start, end),
        reason,
    }
}

/// The first and last `EDGE_FRACTION` of the path by arclength.
///
/// Each region runs up to and including the point where the accumulated
/// length first reaches the edge length.
fn edge_regions(path: &PathModel) -> [RejectedRegion; 2] {
    let n = path.len();
    let total = path.total_length();
    let edge = total * EDGE_FRACTION;
    let cumulative = path.cumulative();

    let head_end = cumulative.iter().position(|&c| c >= edge).unwrap_or(n - 1);
    let tail_start = cumulative.iter().rposition(|&c| total - c >= edge).unwrap_or(0);

    [
        region(path, 0, head_end, RejectReason::PathEdge),
        region(path, tail_start, n - 1, RejectReason::PathEdge),
    ]
}
