//! Metrics and error types for the viewport transform.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which side of the transform a set of metrics describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsKind {
    Image,
    Viewport,
}

impl std::fmt::Display for MetricsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsKind::Image => f.write_str("image"),
            MetricsKind::Viewport => f.write_str("viewport"),
        }
    }
}

/// Error types for transform construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// Zero, negative or non-finite dimensions.
    #[error("Invalid {kind} metrics: {width}x{height}")]
    InvalidMetrics {
        kind: MetricsKind,
        width: f64,
        height: f64,
    },

    /// Scale or origin that cannot describe a usable mapping.
    #[error("Invalid transform: scale {scale}, origin ({origin_x}, {origin_y})")]
    InvalidTransform {
        scale: f64,
        origin_x: f64,
        origin_y: f64,
    },
}

fn check_extent(kind: MetricsKind, width: f64, height: f64) -> Result<(), TransformError> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(TransformError::InvalidMetrics {
            kind,
            width,
            height,
        })
    }
}

/// Dimensions of the loaded photo, in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageMetrics {
    /// Natural width of the photo in pixels.
    pub width: f64,
    /// Natural height of the photo in pixels.
    pub height: f64,
}

impl ImageMetrics {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), TransformError> {
        check_extent(MetricsKind::Image, self.width, self.height)
    }
}

impl From<(u32, u32)> for ImageMetrics {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width as f64, height as f64)
    }
}

/// Dimensions of the hosting container, in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportMetrics {
    /// Container width in screen pixels.
    pub width: f64,
    /// Container height in screen pixels.
    pub height: f64,
}

impl ViewportMetrics {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), TransformError> {
        check_extent(MetricsKind::Viewport, self.width, self.height)
    }
}

/// Screen rectangle occupied by the scaled photo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Left edge of the scaled photo.
    pub x: f64,
    /// Top edge of the scaled photo.
    pub y: f64,
    /// Displayed width.
    pub width: f64,
    /// Displayed height.
    pub height: f64,
}
