//! The crown and chin landmarks.
//!
//! Landmarks are stored in pixel space, which is the source of truth. While a
//! marker is being dragged its position is tracked in screen space instead, so
//! the motion follows the pointer at full screen resolution. The screen
//! position is converted back to pixel space once, when the drag ends.
//!
//! ```text
//! Unset --set_initial--> Placed --commit_drag--> Placed
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Footprint, Point};
use crate::transform::{ViewportMetrics, ViewportTransform};

/// A named point of interest on the photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Landmark {
    /// Top of the head.
    Crown,
    /// Bottom of the chin.
    Chin,
}

impl Landmark {
    pub const ALL: [Landmark; 2] = [Landmark::Crown, Landmark::Chin];

    pub fn as_str(self) -> &'static str {
        match self {
            Landmark::Crown => "crown",
            Landmark::Chin => "chin",
        }
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a landmark name is neither `crown` nor `chin`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown landmark: {0}")]
pub struct ParseLandmarkError(pub String);

impl FromStr for Landmark {
    type Err = ParseLandmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crown" => Ok(Landmark::Crown),
            "chin" => Ok(Landmark::Chin),
            other => Err(ParseLandmarkError(other.to_string())),
        }
    }
}

/// Landmark positions as exchanged with a detection service.
///
/// Serialized as `{"crownPoint": {"x": .., "y": ..}, "chinPoint": ..}`.
/// Missing or null entries mean the landmark is unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkPoints {
    /// Crown position in pixel space.
    #[serde(default)]
    pub crown_point: Option<Point>,
    /// Chin position in pixel space.
    #[serde(default)]
    pub chin_point: Option<Point>,
}

impl LandmarkPoints {
    pub fn new(crown_point: Option<Point>, chin_point: Option<Point>) -> Self {
        Self {
            crown_point,
            chin_point,
        }
    }

    pub fn get(&self, which: Landmark) -> Option<Point> {
        match which {
            Landmark::Crown => self.crown_point,
            Landmark::Chin => self.chin_point,
        }
    }
}

/// Rendered size of each marker element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerFootprints {
    /// Size of the crown marker element.
    #[serde(rename = "crownFootprint", default)]
    pub crown: Footprint,
    /// Size of the chin marker element.
    #[serde(rename = "chinFootprint", default)]
    pub chin: Footprint,
}

impl MarkerFootprints {
    pub fn get(&self, which: Landmark) -> Footprint {
        match which {
            Landmark::Crown => self.crown,
            Landmark::Chin => self.chin,
        }
    }

    pub fn set(&mut self, which: Landmark, footprint: Footprint) {
        match which {
            Landmark::Crown => self.crown = footprint,
            Landmark::Chin => self.chin = footprint,
        }
    }
}

/// Screen-space marker positions (top-left corners) ready for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Crown marker position, `None` if unset.
    pub crown: Option<Point>,
    /// Chin marker position, `None` if unset.
    pub chin: Option<Point>,
}

impl Projection {
    pub fn get(&self, which: Landmark) -> Option<Point> {
        match which {
            Landmark::Crown => self.crown,
            Landmark::Chin => self.chin,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct MarkerSlot {
    /// Committed position in pixel space.
    pixel: Option<Point>,
    /// Screen position of an in-progress drag.
    live: Option<Point>,
}

/// Crown and chin positions plus any in-progress drag.
#[derive(Debug, Clone, Default)]
pub struct LandmarkSet {
    crown: MarkerSlot,
    chin: MarkerSlot,
}

impl LandmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, which: Landmark) -> &MarkerSlot {
        match which {
            Landmark::Crown => &self.crown,
            Landmark::Chin => &self.chin,
        }
    }

    fn slot_mut(&mut self, which: Landmark) -> &mut MarkerSlot {
        match which {
            Landmark::Crown => &mut self.crown,
            Landmark::Chin => &mut self.chin,
        }
    }

    /// Replace both pixel-space points. Any drag in progress is discarded.
    pub fn set_initial(&mut self, crown: Option<Point>, chin: Option<Point>) {
        self.crown = MarkerSlot {
            pixel: crown,
            live: None,
        };
        self.chin = MarkerSlot {
            pixel: chin,
            live: None,
        };
    }

    pub fn set_points(&mut self, points: LandmarkPoints) {
        self.set_initial(points.crown_point, points.chin_point);
    }

    /// Committed pixel-space point for `which`.
    pub fn get(&self, which: Landmark) -> Option<Point> {
        self.slot(which).pixel
    }

    pub fn points(&self) -> LandmarkPoints {
        LandmarkPoints::new(self.crown.pixel, self.chin.pixel)
    }

    /// Whether the markers should be shown.
    ///
    /// Both points must be present and every coordinate strictly positive. A
    /// coordinate of exactly zero counts as missing, and one bad point hides
    /// both markers.
    pub fn is_visible(&self) -> bool {
        fn usable(p: Option<Point>) -> bool {
            matches!(p, Some(p) if p.x > 0.0 && p.y > 0.0)
        }
        usable(self.crown.pixel) && usable(self.chin.pixel)
    }

    /// Screen positions for both markers.
    ///
    /// A marker being dragged reports its live screen position rather than a
    /// re-projection of its committed point.
    pub fn project_all(
        &self,
        transform: &ViewportTransform,
        footprints: &MarkerFootprints,
    ) -> Projection {
        let project = |which: Landmark| {
            let slot = self.slot(which);
            slot.live.or_else(|| {
                slot.pixel
                    .map(|p| transform.marker_position(p, footprints.get(which)))
            })
        };
        Projection {
            crown: project(Landmark::Crown),
            chin: project(Landmark::Chin),
        }
    }

    /// Move a marker by a screen-space drag delta.
    ///
    /// The first move of a drag starts from the projection of the committed
    /// point; later moves accumulate onto the live screen position. Pixel
    /// space is not touched until [`LandmarkSet::commit_drag`].
    ///
    /// Returns the new screen position, or `None` if the marker is unset.
    pub fn apply_screen_delta(
        &mut self,
        which: Landmark,
        delta: Point,
        transform: &ViewportTransform,
        footprint: Footprint,
    ) -> Option<Point> {
        let slot = self.slot_mut(which);
        let start = match slot.live {
            Some(live) => live,
            None => transform.marker_position(slot.pixel?, footprint),
        };
        let next = start + delta;
        slot.live = Some(next);
        Some(next)
    }

    /// Keep the live position of a dragged marker inside `bounds`.
    ///
    /// The whole footprint must fit; a footprint larger than the bounds is
    /// pinned to the top-left edge.
    pub fn confine_drag(&mut self, which: Landmark, bounds: ViewportMetrics, footprint: Footprint) {
        if let Some(live) = self.slot_mut(which).live.as_mut() {
            let max_x = (bounds.width - footprint.width).max(0.0);
            let max_y = (bounds.height - footprint.height).max(0.0);
            live.x = live.x.max(0.0).min(max_x);
            live.y = live.y.max(0.0).min(max_y);
        }
    }

    /// Finish a drag and store the resulting pixel-space point.
    ///
    /// Returns the new pixel point, or `None` if no drag was in progress.
    pub fn commit_drag(
        &mut self,
        which: Landmark,
        transform: &ViewportTransform,
        footprint: Footprint,
    ) -> Option<Point> {
        let slot = self.slot_mut(which);
        let live = slot.live.take()?;
        let pixel = transform.marker_pixel(live, footprint);
        slot.pixel = Some(pixel);

        tracing::debug!(landmark = %which, x = pixel.x, y = pixel.y, "committed landmark");
        Some(pixel)
    }

    /// Carry an in-progress drag over to a new transform or footprint.
    ///
    /// The live position is mapped to pixel space with the old transform and
    /// footprint, then projected again with the new ones, so the marker stays
    /// over the same spot of the photo. Does nothing if no drag is active.
    pub fn rebase_drag(
        &mut self,
        which: Landmark,
        from: (&ViewportTransform, Footprint),
        to: (&ViewportTransform, Footprint),
    ) {
        if let Some(live) = self.slot_mut(which).live.as_mut() {
            let pixel = from.0.marker_pixel(*live, from.1);
            *live = to.0.marker_position(pixel, to.1);
        }
    }

    /// Drop an in-progress drag without changing the committed point.
    pub fn cancel_drag(&mut self, which: Landmark) {
        self.slot_mut(which).live = None;
    }

    pub fn live_position(&self, which: Landmark) -> Option<Point> {
        self.slot(which).live
    }

    pub fn is_dragging(&self, which: Landmark) -> bool {
        self.slot(which).live.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> ViewportTransform {
        ViewportTransform::from_parts(0.5, Point::new(10.0, 10.0)).unwrap()
    }

    #[test]
    fn test_landmark_names() {
        assert_eq!("crown".parse::<Landmark>(), Ok(Landmark::Crown));
        assert_eq!("chin".parse::<Landmark>(), Ok(Landmark::Chin));
        assert_eq!(Landmark::Chin.to_string(), "chin");

        let err = "nose".parse::<Landmark>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown landmark: nose");
    }

    #[test]
    fn test_new_set_is_unset_and_hidden() {
        let set = LandmarkSet::new();
        assert_eq!(set.get(Landmark::Crown), None);
        assert_eq!(set.get(Landmark::Chin), None);
        assert!(!set.is_visible());
    }

    #[test]
    fn test_zero_coordinate_hides_both() {
        let mut set = LandmarkSet::new();
        set.set_initial(Some(Point::new(0.0, 500.0)), Some(Point::new(300.0, 900.0)));
        assert!(!set.is_visible());
    }

    #[test]
    fn test_valid_points_visible() {
        let mut set = LandmarkSet::new();
        set.set_initial(
            Some(Point::new(1136.017, 621.6124)),
            Some(Point::new(1136.017, 1701.095)),
        );
        assert!(set.is_visible());
    }

    #[test]
    fn test_missing_point_hides_both() {
        let mut set = LandmarkSet::new();
        set.set_initial(Some(Point::new(10.0, 10.0)), None);
        assert!(!set.is_visible());
    }

    #[test]
    fn test_negative_and_nan_hidden() {
        let mut set = LandmarkSet::new();
        set.set_initial(Some(Point::new(-1.0, 10.0)), Some(Point::new(10.0, 10.0)));
        assert!(!set.is_visible());

        set.set_initial(Some(Point::new(10.0, 10.0)), Some(Point::new(10.0, f64::NAN)));
        assert!(!set.is_visible());
    }

    #[test]
    fn test_project_all() {
        let mut set = LandmarkSet::new();
        set.set_initial(Some(Point::new(500.0, 500.0)), None);

        let footprints = MarkerFootprints::default();
        let proj = set.project_all(&transform(), &footprints);
        assert_eq!(proj.crown, Some(Point::new(250.0, 250.0)));
        assert_eq!(proj.chin, None);
    }

    #[test]
    fn test_drag_commit() {
        let t = transform();
        let fp = Footprint::new(20.0, 20.0);
        let mut set = LandmarkSet::new();
        set.set_initial(Some(Point::new(500.0, 500.0)), Some(Point::new(500.0, 900.0)));

        let initial = t.marker_position(Point::new(500.0, 500.0), fp);
        let delta = Point::new(30.0, -10.0);

        let moved = set.apply_screen_delta(Landmark::Crown, delta, &t, fp);
        assert_eq!(moved, Some(initial + delta));
        // Pixel space untouched until commit
        assert_eq!(set.get(Landmark::Crown), Some(Point::new(500.0, 500.0)));

        let committed = set.commit_drag(Landmark::Crown, &t, fp);
        let expected = t.marker_pixel(initial + delta, fp);
        assert_eq!(committed, Some(expected));
        assert_eq!(set.get(Landmark::Crown), Some(Point::new(560.0, 480.0)));
        assert!(!set.is_dragging(Landmark::Crown));

        // Other marker unaffected
        assert_eq!(set.get(Landmark::Chin), Some(Point::new(500.0, 900.0)));
    }

    #[test]
    fn test_moves_accumulate_in_screen_space() {
        let t = transform();
        let fp = Footprint::new(20.0, 20.0);
        let mut set = LandmarkSet::new();
        set.set_initial(Some(Point::new(500.0, 500.0)), None);

        set.apply_screen_delta(Landmark::Crown, Point::new(1.0, 2.0), &t, fp);
        set.apply_screen_delta(Landmark::Crown, Point::new(3.0, 4.0), &t, fp);
        assert_eq!(
            set.live_position(Landmark::Crown),
            Some(Point::new(254.0, 256.0))
        );

        // The live position is what gets rendered mid-drag
        let proj = set.project_all(&t, &MarkerFootprints::default());
        assert_eq!(proj.crown, Some(Point::new(254.0, 256.0)));
    }

    #[test]
    fn test_drag_unset_marker_is_ignored() {
        let t = transform();
        let mut set = LandmarkSet::new();
        let moved = set.apply_screen_delta(Landmark::Chin, Point::new(5.0, 5.0), &t, Footprint::default());
        assert_eq!(moved, None);
        assert_eq!(set.commit_drag(Landmark::Chin, &t, Footprint::default()), None);
        assert_eq!(set.get(Landmark::Chin), None);
    }

    #[test]
    fn test_commit_without_drag_is_noop() {
        let t = transform();
        let mut set = LandmarkSet::new();
        set.set_initial(Some(Point::new(500.0, 500.0)), None);
        assert_eq!(set.commit_drag(Landmark::Crown, &t, Footprint::default()), None);
        assert_eq!(set.get(Landmark::Crown), Some(Point::new(500.0, 500.0)));
    }

    #[test]
    fn test_cancel_drag_keeps_committed_point() {
        let t = transform();
        let fp = Footprint::default();
        let mut set = LandmarkSet::new();
        set.set_initial(Some(Point::new(500.0, 500.0)), None);

        set.apply_screen_delta(Landmark::Crown, Point::new(40.0, 40.0), &t, fp);
        set.cancel_drag(Landmark::Crown);
        assert!(!set.is_dragging(Landmark::Crown));
        assert_eq!(set.get(Landmark::Crown), Some(Point::new(500.0, 500.0)));
    }

    #[test]
    fn test_set_initial_discards_drag() {
        let t = transform();
        let fp = Footprint::default();
        let mut set = LandmarkSet::new();
        set.set_initial(Some(Point::new(500.0, 500.0)), None);
        set.apply_screen_delta(Landmark::Crown, Point::new(40.0, 40.0), &t, fp);

        set.set_initial(Some(Point::new(100.0, 100.0)), None);
        assert!(!set.is_dragging(Landmark::Crown));
        assert_eq!(set.commit_drag(Landmark::Crown, &t, fp), None);
    }

    #[test]
    fn test_confine_drag() {
        let t = transform();
        let fp = Footprint::new(20.0, 20.0);
        let bounds = ViewportMetrics::new(300.0, 200.0);
        let mut set = LandmarkSet::new();
        set.set_initial(Some(Point::new(500.0, 500.0)), Some(Point::new(100.0, 100.0)));

        set.apply_screen_delta(Landmark::Crown, Point::new(1000.0, -1000.0), &t, fp);
        set.confine_drag(Landmark::Crown, bounds, fp);
        assert_eq!(
            set.live_position(Landmark::Crown),
            Some(Point::new(280.0, 0.0))
        );

        // No drag in progress: nothing to confine
        set.confine_drag(Landmark::Chin, bounds, fp);
        assert_eq!(set.live_position(Landmark::Chin), None);
    }

    #[test]
    fn test_rebase_drag_to_new_transform() {
        let old = transform();
        let new = ViewportTransform::from_parts(1.0, Point::ZERO).unwrap();
        let fp = Footprint::new(20.0, 20.0);
        let mut set = LandmarkSet::new();
        set.set_initial(Some(Point::new(500.0, 500.0)), Some(Point::new(100.0, 100.0)));

        // (250, 250) + (10, 0): center (270, 260) is pixel (520, 500)
        set.apply_screen_delta(Landmark::Crown, Point::new(10.0, 0.0), &old, fp);
        set.rebase_drag(Landmark::Crown, (&old, fp), (&new, fp));
        assert_eq!(
            set.live_position(Landmark::Crown),
            Some(Point::new(510.0, 490.0))
        );
        assert_eq!(
            set.commit_drag(Landmark::Crown, &new, fp),
            Some(Point::new(520.0, 500.0))
        );

        // Idle markers are left alone
        set.rebase_drag(Landmark::Chin, (&old, fp), (&new, fp));
        assert!(!set.is_dragging(Landmark::Chin));
    }

    #[test]
    fn test_rebase_drag_to_new_footprint() {
        let t = transform();
        let small = Footprint::new(20.0, 20.0);
        let large = Footprint::new(60.0, 40.0);
        let mut set = LandmarkSet::new();
        set.set_initial(Some(Point::new(500.0, 500.0)), None);

        set.apply_screen_delta(Landmark::Crown, Point::new(10.0, 0.0), &t, small);
        set.rebase_drag(Landmark::Crown, (&t, small), (&t, large));
        // Same center (270, 260), larger box
        assert_eq!(
            set.live_position(Landmark::Crown),
            Some(Point::new(240.0, 240.0))
        );
        assert_eq!(
            set.commit_drag(Landmark::Crown, &t, large),
            Some(Point::new(520.0, 500.0))
        );
    }

    #[test]
    fn test_landmark_points_json() {
        let json = r#"{"crownPoint": {"x": 1136, "y": 621}, "chinPoint": null}"#;
        let points: LandmarkPoints = serde_json::from_str(json).unwrap();
        assert_eq!(points.crown_point, Some(Point::new(1136.0, 621.0)));
        assert_eq!(points.chin_point, None);

        let empty: LandmarkPoints = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, LandmarkPoints::default());

        let mut set = LandmarkSet::new();
        set.set_points(points);
        let out = serde_json::to_value(set.points()).unwrap();
        assert_eq!(out["crownPoint"]["x"], 1136.0);
        assert!(out["chinPoint"].is_null());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
