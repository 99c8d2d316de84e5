//! Landmark Core - coordinate engine for the landmark editor
//!
//! This crate maps a photo shown fit-to-viewport back to its original pixel
//! grid, and tracks two draggable landmarks (crown and chin) on top of it.
//! It has no UI dependency: a host supplies image and viewport metrics and
//! drag deltas, and receives screen positions through the render sinks.
//!
//! # Modules
//!
//! - `transform` - Fit-to-viewport transform between pixel and screen space
//! - `landmarks` - Crown/chin points, visibility rule and two-phase dragging
//! - `source` - Image references, header probing and load generations
//! - `editor` - The session tying load, resize, drag and render together
//! - `render` - Render and visibility sinks

pub mod config;
pub mod editor;
pub mod geometry;
pub mod landmarks;
pub mod render;
pub mod source;
pub mod transform;

pub use config::EditorConfig;
pub use editor::{EditorError, LandmarkEditor};
pub use geometry::{Footprint, Point};
pub use landmarks::{
    Landmark, LandmarkPoints, LandmarkSet, MarkerFootprints, ParseLandmarkError, Projection,
};
pub use render::{Element, RenderFrame, RenderSink, VisibilitySink};
pub use source::{
    decode_data_url, probe_metrics, CompletedLoad, DecodingSource, ImageLoadError,
    ImageReference, ImageSource, LoadOutcome, LoadToken, PendingLoad,
};
pub use transform::{ImageMetrics, Placement, TransformError, ViewportMetrics, ViewportTransform};
