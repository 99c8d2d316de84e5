//! Mapping between photo pixels and the rendered viewport.
//!
//! # Coordinate Systems
//!
//! - **Pixel space**: the original, unscaled photo. Origin is its top-left
//!   corner, one unit per image pixel.
//! - **Screen space**: the hosting container. Origin is the container's
//!   top-left corner, one unit per CSS pixel.
//!
//! Only fit-to-viewport is supported: the photo is scaled uniformly to fit and
//! centered, with no rotation.
//!
//! # Lifecycle
//!
//! A [`ViewportTransform`] is derived from an [`ImageMetrics`] and a
//! [`ViewportMetrics`]. It must be recomputed whenever either changes. Metrics
//! are validated before any math runs; invalid metrics never produce a
//! transform.

mod types;
mod viewport;

pub use types::{ImageMetrics, MetricsKind, Placement, TransformError, ViewportMetrics};
pub use viewport::ViewportTransform;
