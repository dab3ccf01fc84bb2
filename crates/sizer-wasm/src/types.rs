//! Conversions between JavaScript values and the core request types.
//!
//! Options objects use the same camelCase field names as the core serde
//! types, e.g. `{ width: 400, height: 300, crop: true, gravity: "north" }`.
//! Missing fields take their defaults; `undefined` or `null` means "all
//! defaults".

use sizer_core::{EngineConfig, ImageFormat, ResizeRequest};
use wasm_bindgen::prelude::*;

/// Build a JavaScript `Error` carrying `message`.
pub(crate) fn js_error(message: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

/// Parse a resize options object.
pub(crate) fn request_from_js(options: JsValue) -> Result<ResizeRequest, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(ResizeRequest::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| js_error(format!("Invalid resize options: {e}")))
}

/// Parse an engine configuration object and validate its limits.
pub(crate) fn config_from_js(config: JsValue) -> Result<EngineConfig, JsValue> {
    let config: EngineConfig = if config.is_undefined() || config.is_null() {
        EngineConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)
            .map_err(|e| js_error(format!("Invalid engine config: {e}")))?
    };
    config.validated().map_err(js_error)
}

/// Parse a format name as returned by `detect_format`.
pub(crate) fn format_from_name(name: &str) -> Result<ImageFormat, String> {
    match name.to_ascii_lowercase().as_str() {
        "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
        "png" => Ok(ImageFormat::Png),
        other => Err(format!("unsupported image format: {other}")),
    }
}
