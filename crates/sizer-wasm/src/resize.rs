//! Resize bindings.
//!
//! # Functions
//!
//! - [`JsResizer`] - Resizer bound to one engine configuration
//! - [`detect_format`] - Classify bytes by their magic number
//! - [`plan_resize`] - Compute the scale plan for known dimensions
//!
//! # Example
//!
//! ```typescript
//! import { JsResizer, detect_format } from '@sizer/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! if (detect_format(bytes)) {
//!   const resizer = new JsResizer({ maxAlloc: 64 * 1024 * 1024 });
//!   const jpeg = resizer.resize(bytes, { width: 400, height: 300, crop: true });
//! }
//! ```

use sizer_core::{ImageBackend, ImageFormat, ResizeRequest, Resizer, ScalePlan};
use wasm_bindgen::prelude::*;

use crate::types::{config_from_js, format_from_name, js_error, request_from_js};

/// A resizer with its own engine limits.
///
/// Create one per page or worker and reuse it; it keeps no state between calls.
#[wasm_bindgen]
pub struct JsResizer {
    inner: Resizer<ImageBackend>,
}

#[wasm_bindgen]
impl JsResizer {
    /// Create a resizer. `config` may be omitted for the default budgets
    /// (100 MiB, 500 live rasters) and no hard allocation limit.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsResizer, JsValue> {
        let config = config_from_js(config)?;
        Ok(JsResizer {
            inner: Resizer::new(ImageBackend::new(config)),
        })
    }

    /// Resize JPEG or PNG `bytes` and return the JPEG result.
    ///
    /// # Errors
    ///
    /// Throws an `Error` for unknown formats, corrupt input, invalid options
    /// or when a raster would exceed the configured `maxAlloc`.
    pub fn resize(&self, bytes: &[u8], options: JsValue) -> Result<Vec<u8>, JsValue> {
        let request = request_from_js(options)?;
        self.inner.resize_bytes(bytes, &request).map_err(js_error)
    }

    /// Number of rasters currently held by this resizer's engine.
    #[wasm_bindgen(getter)]
    pub fn live_rasters(&self) -> usize {
        self.inner.backend().live_rasters()
    }
}

/// Detect the format of encoded bytes from their first two bytes.
///
/// Returns `"jpeg"`, `"png"` or `undefined`.
#[wasm_bindgen]
pub fn detect_format(bytes: &[u8]) -> Option<String> {
    ImageFormat::sniff(bytes).map(|f| f.name().to_string())
}

/// Compute the scale plan for an image of `width` x `height` in `format`.
///
/// Returns an object `{ factor, shrinkOnLoad, integralShrink, residual,
/// outputWidth, outputHeight }`.
#[wasm_bindgen]
pub fn plan_resize(
    width: u32,
    height: u32,
    format: &str,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let request = request_from_js(options)?;
    let plan = plan_for(width, height, format, &request).map_err(js_error)?;
    serde_wasm_bindgen::to_value(&plan).map_err(js_error)
}

pub(crate) fn plan_for(
    width: u32,
    height: u32,
    format: &str,
    request: &ResizeRequest,
) -> Result<ScalePlan, String> {
    if width == 0 || height == 0 {
        return Err(format!("invalid dimensions {width}x{height}"));
    }
    let format = format_from_name(format)?;
    Ok(ScalePlan::compute(width, height, format, request))
}
