//! Per-glyph positioning along a path.
//!
//! Each character is centered on its own slot of arclength and rotated
//! to the direction of the segment it lands on.

use kurbo::Point;
use serde::Serialize;

use crate::config::FontSpec;
use crate::error::LabelError;
use crate::geom;
use crate::path::PathModel;

/// Source of glyph advance widths.
///
/// Text measurement belongs to the caller (a font rasterizer, a canvas
/// API, a lookup table); this crate never shapes text itself.
pub trait GlyphMetrics {
    fn advance_width(&self, ch: char, font_size: f64, font_family: &str) -> f64;
}

impl<F> GlyphMetrics for F
where
    F: Fn(char, f64, &str) -> f64,
{
    fn advance_width(&self, ch: char, font_size: f64, font_family: &str) -> f64 {
        self(ch, font_size, font_family)
    }
}

/// Every glyph advances by `em_ratio × font_size`, whitespace included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub em_ratio: f64,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self { em_ratio: 0.6 }
    }
}

impl GlyphMetrics for MonospaceMetrics {
    fn advance_width(&self, _ch: char, font_size: f64, _font_family: &str) -> f64 {
        self.em_ratio * font_size
    }
}

/// One positioned character.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlyphPlacement {
    pub character: char,
    pub x: f64,
    pub y: f64,
    /// Direction of travel at the glyph, in radians.
    pub angle: f64,
    pub advance: f64,
}

/// Total arclength the label occupies, letter spacing included.
pub fn measure_text(text: &str, metrics: &impl GlyphMetrics, font: &FontSpec) -> f64 {
    let advances: f64 = text
        .chars()
        .map(|ch| metrics.advance_width(ch, font.size, &font.family))
        .sum();
    let gaps = text.chars().count().saturating_sub(1) as f64;
    advances + gaps * font.letter_spacing
}

/// Position each character of `text` along `path`, starting at point
/// `start_index`.
///
/// Labels running past the end of the path are clamped to the last point
/// and take the last segment's direction.
pub fn place(
    text: &str,
    path: &PathModel,
    start_index: usize,
    metrics: &impl GlyphMetrics,
    font: &FontSpec,
) -> Result<Vec<GlyphPlacement>, LabelError> {
    let points = path.points();
    let n = points.len();
    if n == 0 {
        return Err(LabelError::InvalidPath("path has no points".to_string()));
    }
    if start_index >= n {
        return Err(LabelError::InvalidPath(format!(
            "start index {} is outside 0..={}",
            start_index,
            n - 1
        )));
    }

    let cumulative = path.cumulative();
    let origin = cumulative[start_index];
    // Current segment is `seg → seg + 1`.
    let mut seg = start_index.min(n.saturating_sub(2));
    let mut offset = 0.0;
    let mut glyphs = Vec::with_capacity(text.len());

    for ch in text.chars() {
        let advance = metrics.advance_width(ch, font.size, &font.family);
        let target = origin + offset + advance / 2.0;

        while seg + 2 < n && cumulative[seg + 1] < target {
            seg += 1;
        }
        // A target landing exactly on a repeated point still needs a direction.
        while seg + 2 < n && cumulative[seg + 1] == cumulative[seg] {
            seg += 1;
        }

        let (position, angle) = if n < 2 {
            (points[0], 0.0)
        } else if target >= path.total_length() {
            (points[n - 1], heading_into(points, n - 1))
        } else {
            let (a, b) = (points[seg], points[seg + 1]);
            let span = cumulative[seg + 1] - cumulative[seg];
            let t = if span > 0.0 {
                ((target - cumulative[seg]) / span).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let angle = if a == b {
                heading_into(points, seg + 1)
            } else {
                geom::heading(a, b)
            };
            (a.lerp(b, t), angle)
        };

        glyphs.push(GlyphPlacement {
            character: ch,
            x: position.x,
            y: position.y,
            angle,
            advance,
        });
        offset += advance + font.letter_spacing;
    }

    Ok(glyphs)
}

/// Direction of the last non-degenerate segment ending at or before
/// point `end`. A path of repeated points has direction 0.
fn heading_into(points: &[Point], end: usize) -> f64 {
    (1..=end)
        .rev()
        .find(|&i| points[i - 1] != points[i])
        .map_or(0.0, |i| geom::heading(points[i - 1], points[i]))
}
