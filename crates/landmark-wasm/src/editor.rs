//! Landmark editor WASM bindings.
//!
//! The browser owns the DOM: it measures the container, decodes or fetches
//! the photo, turns pointer events into drag deltas and applies the frames
//! returned by `render()`. Everything else lives in `landmark-core`.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const editor = new JsLandmarkEditor({ restrictToViewport: true });
//! editor.resize(container.clientWidth, container.clientHeight);
//!
//! const token = editor.begin_load();
//! const landmarks = await detect(photo);
//! if (editor.load_data_url(token, photo, landmarks)) {
//!   applyFrame(editor.render());
//! }
//!
//! // Drag handlers
//! onmove: (e) => {
//!   editor.drag_move(e.target.dataset.landmark, e.dx, e.dy);
//!   applyFrame(editor.render());
//! },
//! onend: (e) => editor.drag_end(e.target.dataset.landmark),
//! ```

use futures::FutureExt;
use landmark_core::{
    CompletedLoad, DecodingSource, EditorConfig, EditorError, Footprint, ImageLoadError,
    ImageMetrics, ImageReference, ImageSource, LandmarkEditor, LandmarkPoints, LoadOutcome,
    LoadToken, PendingLoad, Point, RenderFrame, ViewportMetrics,
};
use wasm_bindgen::prelude::*;

use crate::types::{from_js_or_default, landmark_from_str, outcome_applied, to_js, to_js_error};

/// A landmark editor session for JavaScript.
#[wasm_bindgen]
pub struct JsLandmarkEditor {
    inner: LandmarkEditor,
}

#[wasm_bindgen]
impl JsLandmarkEditor {
    /// Create an editor. `config` may be omitted to use the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsLandmarkEditor, JsValue> {
        let config: EditorConfig = from_js_or_default(config)?;
        Ok(Self::from_config(config))
    }

    /// Start loading a new photo. Returns the token to complete it with.
    pub fn begin_load(&mut self) -> u64 {
        self.inner.begin_load().0
    }

    /// Complete a load from encoded image bytes.
    ///
    /// Returns `false` if a newer load has started since `token` was issued.
    pub fn load_bytes(
        &mut self,
        token: u64,
        bytes: &[u8],
        landmarks: JsValue,
    ) -> Result<bool, JsValue> {
        let points: LandmarkPoints = from_js_or_default(landmarks)?;
        let reference = ImageReference::Bytes(bytes.to_vec());
        self.decode_load(token, reference, points)
            .map_err(to_js_error)
    }

    /// Complete a load from a data URL (or a bare base64 payload).
    pub fn load_data_url(
        &mut self,
        token: u64,
        url: &str,
        landmarks: JsValue,
    ) -> Result<bool, JsValue> {
        let points: LandmarkPoints = from_js_or_default(landmarks)?;
        let reference = ImageReference::DataUrl(url.to_string());
        self.decode_load(token, reference, points)
            .map_err(to_js_error)
    }

    /// Complete a load whose dimensions the host measured itself.
    pub fn complete_load(
        &mut self,
        token: u64,
        width: f64,
        height: f64,
        landmarks: JsValue,
    ) -> Result<bool, JsValue> {
        let points: LandmarkPoints = from_js_or_default(landmarks)?;
        self.finish_load(token, Ok(ImageMetrics::new(width, height)), points)
            .map_err(to_js_error)
    }

    /// Report a failed load. Throws unless the load was already stale.
    pub fn fail_load(&mut self, token: u64, message: &str) -> Result<bool, JsValue> {
        let error = ImageLoadError::Source(message.to_string());
        self.finish_load(token, Err(error), LandmarkPoints::default())
            .map_err(to_js_error)
    }

    /// Record new container dimensions.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.inner
            .resize(ViewportMetrics::new(width, height))
            .map_err(to_js_error)
    }

    /// Replace both landmarks with `{ crownPoint, chinPoint }`.
    pub fn set_landmarks(&mut self, landmarks: JsValue) -> Result<(), JsValue> {
        let points: LandmarkPoints = from_js_or_default(landmarks)?;
        self.inner.set_landmarks(points);
        Ok(())
    }

    /// Current landmarks in pixel space as `{ crownPoint, chinPoint }`.
    pub fn landmarks(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.landmarks().points())
    }

    /// Set the measured size of a marker element.
    pub fn set_footprint(&mut self, which: &str, width: f64, height: f64) -> Result<(), JsValue> {
        self.footprint_named(which, width, height)
            .map_err(to_js_error)
    }

    /// Render the current state as `{ photo, crown, chin, markersVisible }`.
    pub fn render(&self) -> Result<JsValue, JsValue> {
        to_js(&self.frame())
    }

    /// Apply a drag delta. Returns the marker's new screen position or `null`.
    pub fn drag_move(&mut self, which: &str, dx: f64, dy: f64) -> Result<JsValue, JsValue> {
        let moved = self.move_named(which, dx, dy).map_err(to_js_error)?;
        to_js(&moved)
    }

    /// End a drag. Returns the committed pixel position or `null`.
    pub fn drag_end(&mut self, which: &str) -> Result<JsValue, JsValue> {
        let committed = self.end_named(which).map_err(to_js_error)?;
        to_js(&committed)
    }

    /// Whether the markers should currently be shown.
    #[wasm_bindgen(getter)]
    pub fn visible(&self) -> bool {
        self.inner.is_visible()
    }

    /// Screen pixels per image pixel, if a transform is available.
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> Option<f64> {
        self.inner.transform().map(|t| t.scale())
    }
}

impl JsLandmarkEditor {
    pub(crate) fn from_config(config: EditorConfig) -> Self {
        Self {
            inner: LandmarkEditor::new(config),
        }
    }

    fn decode_load(
        &mut self,
        token: u64,
        reference: ImageReference,
        points: LandmarkPoints,
    ) -> Result<bool, EditorError> {
        let pending = PendingLoad::new(LoadToken(token), reference);
        let completed = resolve_now(&DecodingSource, pending);
        self.finish_load(completed.token.0, completed.result, points)
    }

    fn finish_load(
        &mut self,
        token: u64,
        result: Result<ImageMetrics, ImageLoadError>,
        points: LandmarkPoints,
    ) -> Result<bool, EditorError> {
        let outcome = self
            .inner
            .complete_load(LoadToken(token), result, points)?;
        if outcome == LoadOutcome::Applied {
            tracing::info!(scale = ?self.scale(), "photo loaded");
        }
        Ok(outcome_applied(outcome))
    }

    fn footprint_named(&mut self, which: &str, width: f64, height: f64) -> Result<(), EditorError> {
        let which = landmark_from_str(which)?;
        self.inner.set_footprint(which, Footprint::new(width, height));
        Ok(())
    }

    fn move_named(&mut self, which: &str, dx: f64, dy: f64) -> Result<Option<Point>, EditorError> {
        let which = landmark_from_str(which)?;
        Ok(self.inner.drag_move(which, Point::new(dx, dy)))
    }

    fn end_named(&mut self, which: &str) -> Result<Option<Point>, EditorError> {
        let which = landmark_from_str(which)?;
        Ok(self.inner.drag_end(which))
    }

    fn frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::default();
        self.inner.render(&mut frame);
        frame
    }
}

/// Run a load against a source that completes without suspending.
///
/// A source that would have to wait is reported as a failed load; hosts with
/// truly asynchronous loaders measure the image themselves and call
/// `complete_load`.
fn resolve_now<S: ImageSource + ?Sized>(source: &S, pending: PendingLoad) -> CompletedLoad {
    let token = pending.token;
    pending
        .resolve(source)
        .now_or_never()
        .unwrap_or_else(|| CompletedLoad {
            token,
            result: Err(ImageLoadError::Source(
                "image source did not complete synchronously".to_string(),
            )),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> JsLandmarkEditor {
        let mut editor = JsLandmarkEditor::from_config(EditorConfig::default());
        editor
            .inner
            .resize(ViewportMetrics::new(400.0, 200.0))
            .unwrap();
        let token = editor.begin_load();
        let points = LandmarkPoints::new(
            Some(Point::new(500.0, 200.0)),
            Some(Point::new(500.0, 800.0)),
        );
        assert!(editor
            .finish_load(token, Ok(ImageMetrics::new(1000.0, 1000.0)), points)
            .unwrap());
        editor
    }

    #[test]
    fn test_load_sets_scale() {
        let editor = loaded();
        assert!((editor.scale().unwrap() - 0.2).abs() < 1e-12);
        assert!(editor.visible());
    }

    #[test]
    fn test_stale_load_returns_false() {
        let mut editor = loaded();
        let old = editor.begin_load();
        editor.begin_load();
        let applied = editor
            .finish_load(old, Ok(ImageMetrics::new(10.0, 10.0)), LandmarkPoints::default())
            .unwrap();
        assert!(!applied);
    }

    #[test]
    fn test_failed_load_is_error() {
        let mut editor = loaded();
        let token = editor.begin_load();
        let result = editor.finish_load(
            token,
            Err(ImageLoadError::Source("404".into())),
            LandmarkPoints::default(),
        );
        assert_eq!(result.unwrap_err().to_string(), "Image source error: 404");
    }

    #[test]
    fn test_frame_letterboxed() {
        let editor = loaded();
        let frame = editor.frame();
        let photo = frame.photo.unwrap();
        assert!((photo.x - 100.0).abs() < 1e-9);
        assert!(photo.y.abs() < 1e-9);
        assert!(frame.markers_visible);
    }

    #[test]
    fn test_drag_by_name() {
        let mut editor = loaded();
        let moved = editor.move_named("crown", 10.0, 0.0).unwrap();
        assert!(moved.is_some());

        let committed = editor.end_named("crown").unwrap().unwrap();
        // 10 screen px at scale 0.2 is 50 image px
        assert!((committed.x - 550.0).abs() < 1e-9);
        assert!((committed.y - 200.0).abs() < 1e-9);
    }

    /// 1x1 PNG.
    const PNG_1X1: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_decode_load_from_data_url() {
        let mut editor = loaded();
        let token = editor.begin_load();
        let applied = editor
            .decode_load(token, ImageReference::DataUrl(PNG_1X1.into()), LandmarkPoints::default())
            .unwrap();
        assert!(applied);
        assert_eq!(editor.inner.image(), Some(ImageMetrics::new(1.0, 1.0)));
        // 1x1 photo in a 400x200 viewport
        assert_eq!(editor.scale(), Some(200.0));
        assert!(!editor.visible());
    }

    #[test]
    fn test_decode_load_rejects_garbage() {
        let mut editor = loaded();
        let token = editor.begin_load();
        let result = editor.decode_load(
            token,
            ImageReference::Bytes(b"not an image".to_vec()),
            LandmarkPoints::default(),
        );
        assert!(matches!(
            result,
            Err(EditorError::ImageLoad(ImageLoadError::UnsupportedFormat))
        ));
        assert!(editor.visible());
    }

    #[test]
    fn test_decode_load_stale() {
        let mut editor = loaded();
        let old = editor.begin_load();
        editor.begin_load();
        let applied = editor
            .decode_load(old, ImageReference::DataUrl("data:,".into()), LandmarkPoints::default())
            .unwrap();
        assert!(!applied);
    }

    #[test]
    fn test_resolve_now_reports_suspended_source() {
        struct Pending;

        #[async_trait::async_trait(?Send)]
        impl ImageSource for Pending {
            async fn load(&self, _: &ImageReference) -> Result<ImageMetrics, ImageLoadError> {
                futures::future::pending().await
            }
        }

        let load = PendingLoad::new(LoadToken(7), ImageReference::Bytes(Vec::new()));
        let completed = resolve_now(&Pending, load);
        assert_eq!(completed.token, LoadToken(7));
        assert!(matches!(completed.result, Err(ImageLoadError::Source(_))));
    }

    #[test]
    fn test_unknown_landmark_name() {
        let mut editor = loaded();
        let err = editor.move_named("nose", 1.0, 1.0).unwrap_err();
        assert_eq!(err.to_string(), "Unknown landmark: nose");
    }

    #[test]
    fn test_footprint_by_name() {
        let mut editor = loaded();
        editor.footprint_named("chin", 0.0, 0.0).unwrap();
        let chin = editor.frame().chin.unwrap();
        // origin (100, 0) + 500 * 0.2, 800 * 0.2
        assert!((chin.x - 200.0).abs() < 1e-9);
        assert!((chin.y - 160.0).abs() < 1e-9);
    }
}
