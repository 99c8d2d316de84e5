//! Landmark WASM - WebAssembly bindings for the landmark editor
//!
//! This crate exposes the `landmark-core` editor session to JavaScript. The
//! page keeps ownership of the DOM and event wiring; this crate owns the
//! coordinate math and landmark state.
//!
//! # Module Structure
//!
//! - `editor` - The `JsLandmarkEditor` session
//! - `types` - Conversions between JS values and core types
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsLandmarkEditor } from '@landmark/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const editor = new JsLandmarkEditor();
//! editor.resize(container.clientWidth, container.clientHeight);
//! ```

use wasm_bindgen::prelude::*;

mod editor;
mod types;

// Re-export public types
pub use editor::JsLandmarkEditor;

/// Initialize the WASM module (called automatically on load).
///
/// Routes panics and `tracing` output to the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // A second init (e.g. hot reload) keeps the existing subscriber
    let _ = tracing_wasm::try_set_as_global_default();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
