//! Integral box shrink.
//!
//! Averages `xshrink` x `yshrink` blocks of the source. The output size is
//! rounded to the nearest pixel, so it may differ from the exact quotient;
//! callers recompute their residual scale from the result.

use super::{DecodeError, DecodedImage};

/// Output dimensions of an integral shrink.
pub fn shrunk_dimensions(width: u32, height: u32, xshrink: u32, yshrink: u32) -> (u32, u32) {
    let round_div = |size: u32, by: u32| -> u32 {
        let by = by.max(1) as u64;
        (((size as u64 + by / 2) / by) as u32).max(1)
    };
    (round_div(width, xshrink), round_div(height, yshrink))
}

/// Shrink an image by integral factors on each axis.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if a factor is zero.
pub fn shrink(
    image: &DecodedImage,
    xshrink: u32,
    yshrink: u32,
) -> Result<DecodedImage, DecodeError> {
    if xshrink == 0 || yshrink == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    // Fast path: factor 1 on both axes is a copy
    if xshrink == 1 && yshrink == 1 {
        return Ok(image.clone());
    }

    let (width, height) = shrunk_dimensions(image.width(), image.height(), xshrink, yshrink);
    Ok(DecodedImage::new(
        image.as_dynamic().thumbnail_exact(width, height),
    ))
}
