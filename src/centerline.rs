//! Cross-section centerline extraction for ribbon-shaped polygons.
//!
//! Approximates the spine of a river polygon without a true medial-axis
//! solver:
//!
//! 1. Pick the dominant axis (larger bounding-box extent).
//! 2. Sweep evenly spaced lines perpendicular to it across the polygon.
//! 3. For each line, intersect every ring edge and keep the extreme hits;
//!    their midpoint is a centerline point and their spread the width.
//! 4. Smooth the samples with a window-3 moving average.

use kurbo::Point;
use log::{debug, trace};
use serde::Serialize;

use crate::error::LabelError;
use crate::geom;

/// One centerline point with the ribbon width measured through it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CenterlineSample {
    pub point: Point,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Extract an ordered centerline from a closed polygon ring.
///
/// The ring needs no explicit closing vertex; a trailing duplicate of the
/// first vertex is dropped. At most `max_samples` cross-sections are taken,
/// and never more than half the vertex count.
pub fn extract(ring: &[Point], max_samples: usize) -> Result<Vec<CenterlineSample>, LabelError> {
    let ring = match ring {
        [first, .., last] if ring.len() > 3 && first == last => &ring[..ring.len() - 1],
        _ => ring,
    };
    if ring.len() < 3 {
        return Err(LabelError::InvalidGeometry(format!(
            "polygon needs at least 3 vertices, got {}",
            ring.len()
        )));
    }
    if let Some(i) = ring.iter().position(|p| !p.is_finite()) {
        return Err(LabelError::InvalidGeometry(format!(
            "vertex {} has a non-finite coordinate",
            i
        )));
    }

    let bbox = geom::bounds(ring);
    let axis = if bbox.width() >= bbox.height() { Axis::X } else { Axis::Y };
    let (lo, extent) = match axis {
        Axis::X => (bbox.x0, bbox.width()),
        Axis::Y => (bbox.y0, bbox.height()),
    };
    let count = max_samples.min(ring.len() / 2);
    debug!(
        "centerline: {} vertices, {:?}-dominant extent {:.1}, {} cross-sections",
        ring.len(),
        axis,
        extent,
        count
    );

    let raw: Vec<CenterlineSample> = (0..count)
        .filter_map(|k| {
            // Slice centers: evenly spaced, never grazing the extreme vertices.
            let position = lo + extent * (k as f64 + 0.5) / count as f64;
            let sample = cross_section(ring, axis, position);
            if sample.is_none() {
                trace!("centerline: skipped cross-section at {:.2}", position);
            }
            sample
        })
        .collect();

    if raw.is_empty() {
        return Err(LabelError::CenterlineExtractionFailed);
    }
    Ok(smooth_samples(&raw))
}

/// Intersect the line `axis == position` with every ring edge.
///
/// Returns `None` when fewer than two edges are hit.
fn cross_section(ring: &[Point], axis: Axis, position: f64) -> Option<CenterlineSample> {
    let n = ring.len();
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut hits = 0usize;

    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        // (along, across) in the sweep's frame.
        let (a_along, a_across, b_along, b_across) = match axis {
            Axis::X => (a.x, a.y, b.x, b.y),
            Axis::Y => (a.y, a.x, b.y, b.x),
        };
        let denom = b_along - a_along;
        if denom == 0.0 {
            continue;
        }
        let t = (position - a_along) / denom;
        if !(0.0..=1.0).contains(&t) {
            continue;
        }
        let across = a_across + t * (b_across - a_across);
        min = min.min(across);
        max = max.max(across);
        hits += 1;
    }

    if hits < 2 {
        return None;
    }
    let mid = (min + max) / 2.0;
    let point = match axis {
        Axis::X => Point::new(position, mid),
        Axis::Y => Point::new(mid, position),
    };
    Some(CenterlineSample {
        point,
        width: max - min,
    })
}

/// Window-3 moving average over x, y and width independently.
fn smooth_samples(samples: &[CenterlineSample]) -> Vec<CenterlineSample> {
    let xs = geom::smooth3(&samples.iter().map(|s| s.point.x).collect::<Vec<_>>());
    let ys = geom::smooth3(&samples.iter().map(|s| s.point.y).collect::<Vec<_>>());
    let ws = geom::smooth3(&samples.iter().map(|s| s.width).collect::<Vec<_>>());
    xs.into_iter()
        .zip(ys)
        .zip(ws)
        .map(|((x, y), width)| CenterlineSample {
            point: Point::new(x, y),
            width,
        })
        .collect()
}
