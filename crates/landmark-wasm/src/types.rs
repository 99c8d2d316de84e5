//! Conversions between JavaScript values and core types.

use landmark_core::{Landmark, LoadOutcome};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Convert any displayable error into a JavaScript string error.
pub(crate) fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Deserialize a JS object, treating `undefined` and `null` as the default.
pub(crate) fn from_js_or_default<T>(value: JsValue) -> Result<T, JsValue>
where
    T: DeserializeOwned + Default,
{
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(to_js_error)
}

/// Serialize a value into a plain JS object.
pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(to_js_error)
}

/// JS receives `true` when a load was applied and `false` when it was stale.
pub(crate) fn outcome_applied(outcome: LoadOutcome) -> bool {
    matches!(outcome, LoadOutcome::Applied)
}

/// Look up a landmark by its JS name (`"crown"` or `"chin"`).
pub(crate) fn landmark_from_str(name: &str) -> Result<Landmark, landmark_core::ParseLandmarkError> {
    name.trim().to_ascii_lowercase().parse()
}
