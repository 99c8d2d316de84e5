//! Fit-to-viewport mapping between pixel space and screen space.
//!
//! # Algorithm
//!
//! The photo is scaled uniformly so that it fits entirely inside the viewport,
//! then centered. Along the dimension that does not fill the viewport the
//! photo is letterboxed.
//!
//! ```text
//! scale    = min(viewport_w / image_w, viewport_h / image_h)
//! origin_x = viewport_w / 2 - scale * image_w / 2
//! origin_y = viewport_h / 2 - scale * image_h / 2
//!
//! screen   = origin + pixel * scale
//! pixel    = (screen - origin) / scale
//! ```

use serde::{Deserialize, Serialize};

use super::{ImageMetrics, MetricsKind, Placement, TransformError, ViewportMetrics};
use crate::geometry::{Footprint, Point};

/// Uniform scale plus screen-space offset of the photo's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransform {
    scale: f64,
    origin: Point,
}

impl ViewportTransform {
    /// Compute the fit-to-viewport transform for `image` inside `viewport`.
    ///
    /// # Errors
    ///
    /// Returns `TransformError::InvalidMetrics` if either set of metrics has a
    /// zero, negative or non-finite extent. This usually means the container
    /// has not been laid out yet. The same error, naming the image, is
    /// returned when the two extents are so far apart that the scale
    /// underflows to zero or overflows to infinity.
    pub fn fit(image: ImageMetrics, viewport: ViewportMetrics) -> Result<Self, TransformError> {
        image.validate()?;
        viewport.validate()?;

        let x_ratio = viewport.width / image.width;
        let y_ratio = viewport.height / image.height;
        let scale = x_ratio.min(y_ratio);

        let origin = Point::new(
            viewport.width / 2.0 - scale * image.width / 2.0,
            viewport.height / 2.0 - scale * image.height / 2.0,
        );
        if !(scale.is_finite() && scale > 0.0 && origin.is_finite()) {
            return Err(TransformError::InvalidMetrics {
                kind: MetricsKind::Image,
                width: image.width,
                height: image.height,
            });
        }

        tracing::debug!(
            scale,
            origin_x = origin.x,
            origin_y = origin.y,
            "recomputed viewport transform"
        );

        Ok(Self { scale, origin })
    }

    /// Build a transform from a known scale and origin.
    pub fn from_parts(scale: f64, origin: Point) -> Result<Self, TransformError> {
        if !(scale.is_finite() && scale > 0.0 && origin.is_finite()) {
            return Err(TransformError::InvalidTransform {
                scale,
                origin_x: origin.x,
                origin_y: origin.y,
            });
        }
        Ok(Self { scale, origin })
    }

    /// Screen pixels per image pixel.
    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Screen position of the photo's top-left corner.
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Map a pixel-space point to screen space.
    #[inline]
    pub fn pixel_to_screen(&self, pt: Point) -> Point {
        self.origin + pt.scale(self.scale)
    }

    /// Map a screen-space point back to pixel space.
    #[inline]
    pub fn screen_to_pixel(&self, pt: Point) -> Point {
        (pt - self.origin).scale(1.0 / self.scale)
    }

    /// Top-left screen position for a marker centered on pixel point `pt`.
    pub fn marker_position(&self, pt: Point, footprint: Footprint) -> Point {
        footprint.center_on(self.pixel_to_screen(pt))
    }

    /// Pixel point under the center of a marker whose top-left is at `pos`.
    ///
    /// Exact inverse of [`ViewportTransform::marker_position`] for the same
    /// footprint.
    pub fn marker_pixel(&self, pos: Point, footprint: Footprint) -> Point {
        self.screen_to_pixel(footprint.anchor_of(pos))
    }

    /// Screen rectangle covered by the scaled photo.
    pub fn image_placement(&self, image: ImageMetrics) -> Placement {
        Placement {
            x: self.origin.x,
            y: self.origin.y,
            width: image.width * self.scale,
            height: image.height * self.scale,
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
