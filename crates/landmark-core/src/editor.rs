//! The editor session: photo, viewport, transform and landmarks together.
//!
//! # Event Flow
//!
//! 1. `begin_load` issues a [`LoadToken`]; the host loads the photo.
//! 2. `complete_load` stores the image metrics, recomputes the transform and
//!    places the initial landmarks, unless a newer load has started.
//! 3. `resize` recomputes the transform when the container changes.
//! 4. `drag_move` / `drag_end` move a marker and commit it to pixel space.
//! 5. `render` pushes the current state into the sinks.
//!
//! All calls arrive on one event loop; there is no locking.

use thiserror::Error;

use crate::config::EditorConfig;
use crate::geometry::{Footprint, Point};
use crate::landmarks::{Landmark, LandmarkPoints, LandmarkSet, ParseLandmarkError};
use crate::render::{Element, RenderSink, VisibilitySink};
use crate::source::{CompletedLoad, ImageLoadError, LoadOutcome, LoadToken};
use crate::transform::{ImageMetrics, TransformError, ViewportMetrics, ViewportTransform};

/// Errors surfaced to the editor's host.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    ImageLoad(#[from] ImageLoadError),

    #[error(transparent)]
    Landmark(#[from] ParseLandmarkError),
}

/// State for one photo being annotated with crown and chin markers.
#[derive(Debug, Clone, Default)]
pub struct LandmarkEditor {
    config: EditorConfig,
    image: Option<ImageMetrics>,
    viewport: Option<ViewportMetrics>,
    transform: Option<ViewportTransform>,
    landmarks: LandmarkSet,
    generation: u64,
}

impl LandmarkEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn image(&self) -> Option<ImageMetrics> {
        self.image
    }

    pub fn viewport(&self) -> Option<ViewportMetrics> {
        self.viewport
    }

    /// The last successfully computed transform.
    pub fn transform(&self) -> Option<&ViewportTransform> {
        self.transform.as_ref()
    }

    pub fn landmarks(&self) -> &LandmarkSet {
        &self.landmarks
    }

    pub fn is_visible(&self) -> bool {
        self.landmarks.is_visible()
    }

    /// Update the rendered size of a marker element.
    ///
    /// A drag in progress keeps its marker centered on the same spot.
    pub fn set_footprint(&mut self, which: Landmark, footprint: Footprint) {
        let previous = self.config.footprints.get(which);
        self.config.footprints.set(which, footprint);
        if let Some(transform) = self.transform.as_ref() {
            self.landmarks
                .rebase_drag(which, (transform, previous), (transform, footprint));
        }
    }

    /// Start a new load. Every previously issued token becomes stale.
    pub fn begin_load(&mut self) -> LoadToken {
        self.generation = self.generation.wrapping_add(1);
        LoadToken(self.generation)
    }

    pub fn is_current(&self, token: LoadToken) -> bool {
        token.0 == self.generation
    }

    /// Apply the result of the load identified by `token`.
    ///
    /// A stale result is dropped and reported as [`LoadOutcome::Stale`]. A
    /// failed load is returned as an error and leaves the landmarks alone. On
    /// success the metrics are stored, the transform is recomputed if the
    /// viewport is known, and `initial` becomes the landmark set.
    ///
    /// # Errors
    ///
    /// `EditorError::ImageLoad` for a failed current load, and
    /// `EditorError::Transform` if the loaded image has unusable dimensions.
    pub fn complete_load(
        &mut self,
        token: LoadToken,
        result: Result<ImageMetrics, ImageLoadError>,
        initial: LandmarkPoints,
    ) -> Result<LoadOutcome, EditorError> {
        if !self.is_current(token) {
            tracing::debug!(
                token = token.0,
                current = self.generation,
                "discarding stale image load"
            );
            return Ok(LoadOutcome::Stale);
        }

        let image = result?;
        image.validate().inspect_err(|e| tracing::warn!("{e}"))?;
        let transform = self
            .viewport
            .map(|viewport| ViewportTransform::fit(image, viewport))
            .transpose()
            .inspect_err(|e| tracing::warn!("{e}"))?;

        self.image = Some(image);
        self.landmarks.set_points(initial);
        if let Some(transform) = transform {
            self.install(transform);
        }
        Ok(LoadOutcome::Applied)
    }

    /// [`LandmarkEditor::complete_load`] for a resolved [`CompletedLoad`].
    pub fn apply(
        &mut self,
        completed: CompletedLoad,
        initial: LandmarkPoints,
    ) -> Result<LoadOutcome, EditorError> {
        self.complete_load(completed.token, completed.result, initial)
    }

    /// Record new container dimensions and recompute the transform.
    ///
    /// Invalid metrics are rejected and the previous viewport and transform
    /// stay in use. A drag in progress follows the photo to its new place.
    pub fn resize(&mut self, viewport: ViewportMetrics) -> Result<(), EditorError> {
        viewport.validate().inspect_err(|e| tracing::warn!("{e}"))?;
        let transform = self
            .image
            .map(|image| ViewportTransform::fit(image, viewport))
            .transpose()
            .inspect_err(|e| tracing::warn!("{e}"))?;

        self.viewport = Some(viewport);
        if let Some(transform) = transform {
            self.install(transform);
        }
        Ok(())
    }

    /// Switch to `transform`, moving live drags from the old screen space.
    fn install(&mut self, transform: ViewportTransform) {
        if let Some(previous) = self.transform.replace(transform) {
            for which in Landmark::ALL {
                let footprint = self.config.footprints.get(which);
                self.landmarks
                    .rebase_drag(which, (&previous, footprint), (&transform, footprint));
            }
        }
    }

    /// Push the current state into `sink`.
    ///
    /// Markers are shown only when a transform exists and the landmark set is
    /// visible; otherwise both are hidden and left where they were.
    pub fn render<S: RenderSink + VisibilitySink>(&self, sink: &mut S) {
        let (Some(transform), Some(image)) = (self.transform.as_ref(), self.image) else {
            sink.set_markers_visible(false);
            return;
        };

        let photo = transform.image_placement(image);
        sink.size_photo(photo.width, photo.height);
        sink.place(Element::Photo, Point::new(photo.x, photo.y));

        if !self.landmarks.is_visible() {
            sink.set_markers_visible(false);
            return;
        }

        let projection = self
            .landmarks
            .project_all(transform, &self.config.footprints);
        for which in Landmark::ALL {
            if let Some(at) = projection.get(which) {
                sink.place(Element::Marker(which), at);
            }
        }
        sink.set_markers_visible(true);
    }

    /// Move a marker by a screen-space delta.
    ///
    /// Returns the marker's new top-left screen position, or `None` when
    /// there is no transform yet or the marker is unset.
    pub fn drag_move(&mut self, which: Landmark, delta: Point) -> Option<Point> {
        let transform = self.transform.as_ref()?;
        let footprint = self.config.footprints.get(which);
        self.landmarks
            .apply_screen_delta(which, delta, transform, footprint)
    }

    /// Finish dragging a marker and commit it to pixel space.
    ///
    /// Returns the new pixel-space point, or `None` if no drag was active.
    pub fn drag_end(&mut self, which: Landmark) -> Option<Point> {
        let footprint = self.config.footprints.get(which);
        let Some(transform) = self.transform.as_ref() else {
            self.landmarks.cancel_drag(which);
            return None;
        };

        if self.config.restrict_to_viewport {
            if let Some(viewport) = self.viewport {
                self.landmarks.confine_drag(which, viewport, footprint);
            }
        }
        self.landmarks.commit_drag(which, transform, footprint)
    }

    /// Replace the landmark points, e.g. after a new detection.
    pub fn set_landmarks(&mut self, points: LandmarkPoints) {
        self.landmarks.set_points(points);
    }
}
