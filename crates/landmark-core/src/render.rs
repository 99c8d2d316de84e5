//! Output side of the editor: where elements go and whether markers show.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::landmarks::Landmark;
use crate::transform::Placement;

/// An element the editor positions on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Photo,
    Marker(Landmark),
}

/// Positions elements on screen. Translation only.
pub trait RenderSink {
    /// Move `element` so its top-left corner is at `at`.
    fn place(&mut self, element: Element, at: Point);

    /// Set the rendered size of the photo.
    fn size_photo(&mut self, width: f64, height: f64);
}

/// Shows or hides both markers together.
pub trait VisibilitySink {
    fn set_markers_visible(&mut self, visible: bool);
}

/// A sink that records one rendered frame.
///
/// Hosts that cannot be called back synchronously (such as a browser talking
/// to WASM) render into a frame and apply it themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    /// Where the photo was placed and how large it is drawn.
    pub photo: Option<Placement>,
    /// Top-left screen position of the crown marker.
    pub crown: Option<Point>,
    /// Top-left screen position of the chin marker.
    pub chin: Option<Point>,
    /// Whether both markers are shown.
    pub markers_visible: bool,
}

impl RenderSink for RenderFrame {
    fn place(&mut self, element: Element, at: Point) {
        match element {
            Element::Photo => {
                let photo = self.photo.get_or_insert(Placement {
                    x: 0.0,
                    y: 0.0,
                    width: 0.0,
                    height: 0.0,
                });
                photo.x = at.x;
                photo.y = at.y;
            }
            Element::Marker(Landmark::Crown) => self.crown = Some(at),
            Element::Marker(Landmark::Chin) => self.chin = Some(at),
        }
    }

    fn size_photo(&mut self, width: f64, height: f64) {
        let photo = self.photo.get_or_insert(Placement {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        });
        photo.width = width;
        photo.height = height;
    }
}

impl VisibilitySink for RenderFrame {
    fn set_markers_visible(&mut self, visible: bool) {
        self.markers_visible = visible;
    }
}
