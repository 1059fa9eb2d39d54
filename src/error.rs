use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while building a path or placing a label.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum LabelError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("centerline extraction failed: no usable cross-sections")]
    CenterlineExtractionFailed,

    #[error("invalid path: {0}")]
    InvalidPath(String),
}

/// Non-fatal outcome of a placement pass.
///
/// The scorer still returns its best-effort answer; the caller decides
/// whether to truncate, shrink the font or drop the label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PlacementWarning {
    /// The label is longer than every usable window.
    /// `available` is the length of the longest usable run returned instead.
    NoFittingPlacement { required: f64, available: f64 },
    /// Every point of the path falls in a rejected region.
    NoUsablePath,
}

impl fmt::Display for PlacementWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementWarning::NoFittingPlacement { required, available } => write!(
                f,
                "text exceeds available space ({:.1} needed, longest usable run {:.1})",
                required, available
            ),
            PlacementWarning::NoUsablePath => write!(f, "entire path is problematic"),
        }
    }
}
