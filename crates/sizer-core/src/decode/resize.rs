//! Residual affine resampling.
//!
//! Applies a uniform sub-integral scale on both axes with one of the
//! supported interpolation kernels. Returns a new `DecodedImage` without
//! modifying the input.

use super::{DecodeError, DecodedImage};
use crate::options::Interpolator;

/// Output dimensions of a uniform scale, rounded and at least 1x1.
pub fn affine_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let scaled = |size: u32| -> u32 { ((size as f64 * scale).round() as u32).max(1) };
    (scaled(width), scaled(height))
}

/// Scale an image by `scale` on both axes.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if `scale` is not a positive finite number.
pub fn affine(
    image: &DecodedImage,
    scale: f64,
    interpolator: Interpolator,
) -> Result<DecodedImage, DecodeError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(DecodeError::InvalidFormat);
    }

    let (width, height) = affine_dimensions(image.width(), image.height(), scale);

    // Fast path: if dimensions match, just clone
    if (width, height) == image.dimensions() {
        return Ok(image.clone());
    }

    let resized = image
        .as_dynamic()
        .resize_exact(width, height, interpolator.to_image_filter());
    Ok(DecodedImage::new(resized))
}
