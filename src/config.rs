use serde::Serialize;

/// All placement parameters in one struct.
/// Adjustable at runtime (for editor sliders) and built from CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementConfig {
    // -- Analysis --
    /// Smoothed curvature (degrees per unit distance) above which a point
    /// is part of a sharp-curve region.
    pub curvature_threshold: f64,
    /// Ribbon width below which a point is part of a narrow section.
    pub min_width: f64,

    // -- Centerline --
    /// Upper bound on cross-section samples taken along a polygon.
    /// The effective count is also capped at half the vertex count.
    pub max_centerline_samples: usize,

    // -- Text --
    /// Font passed through to the glyph metrics capability.
    pub font: FontSpec,
}

/// Font parameters handed to [`GlyphMetrics`](crate::GlyphMetrics).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontSpec {
    /// Font size in path units.
    pub size: f64,
    /// Family name, opaque to this crate.
    pub family: String,
    /// Extra space inserted between consecutive glyph slots.
    pub letter_spacing: f64,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            size: 16.0,
            family: "sans-serif".to_string(),
            letter_spacing: 0.0,
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            curvature_threshold: 30.0,
            min_width: 10.0,
            max_centerline_samples: 100,
            font: FontSpec::default(),
        }
    }
}
