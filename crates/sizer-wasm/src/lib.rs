//! Sizer WASM - WebAssembly bindings for the sizer resize pipeline
//!
//! This crate exposes sizer-core's resizer to JavaScript/TypeScript.
//!
//! # Module Structure
//!
//! - `resize` - `JsResizer`, format detection and plan inspection
//! - `types` - Conversion of JS option/config objects and errors
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsResizer } from '@sizer/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const resizer = new JsResizer();
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const jpeg = resizer.resize(bytes, { width: 400, gravity: 'north' });
//! ```

use wasm_bindgen::prelude::*;

mod resize;
mod types;

pub use resize::{detect_format, plan_resize, JsResizer};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
