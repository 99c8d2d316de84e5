//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::landmarks::MarkerFootprints;

/// Settings for a [`crate::LandmarkEditor`].
///
/// Every field has a default, so hosts only pass what they change:
///
/// ```json
/// { "crownFootprint": { "width": 24, "height": 24 }, "restrictToViewport": false }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Marker element sizes, used to center markers on their points.
    #[serde(flatten)]
    pub footprints: MarkerFootprints,
    /// Keep a dropped marker entirely inside the viewport.
    pub restrict_to_viewport: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            footprints: MarkerFootprints::default(),
            restrict_to_viewport: true,
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
