//! Embedding an image on a larger canvas (letterboxing).
//!
//! The canvas keeps the source's pixel layout; the added area is filled
//! according to the [`Extend`] policy on every band, alpha included.

use image::{DynamicImage, ImageBuffer, Pixel, Primitive};

use crate::decode::{DecodeError, DecodedImage};
use crate::options::Extend;

/// Centred placement of a `width` x `height` image in a `canvas_width` x
/// `canvas_height` canvas. Integer division truncates towards zero.
pub fn centre_offsets(
    width: u32,
    height: u32,
    canvas_width: u32,
    canvas_height: u32,
) -> (i64, i64) {
    (
        (canvas_width as i64 - width as i64) / 2,
        (canvas_height as i64 - height as i64) / 2,
    )
}

/// Place `image` at (`left`, `top`) on a new `width` x `height` canvas.
///
/// Parts of the image that fall outside the canvas are clipped.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the canvas is empty.
pub fn embed(
    image: &DecodedImage,
    left: i64,
    top: i64,
    width: u32,
    height: u32,
    extend: Extend,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    if left == 0 && top == 0 && (width, height) == image.dimensions() {
        return Ok(image.clone());
    }

    macro_rules! placed {
        ($variant:ident, $src:expr) => {
            DynamicImage::$variant(place($src, left, top, width, height, extend))
        };
    }

    let canvas = match image.as_dynamic() {
        DynamicImage::ImageLuma8(src) => placed!(ImageLuma8, src),
        DynamicImage::ImageLumaA8(src) => placed!(ImageLumaA8, src),
        DynamicImage::ImageRgb8(src) => placed!(ImageRgb8, src),
        DynamicImage::ImageRgba8(src) => placed!(ImageRgba8, src),
        DynamicImage::ImageLuma16(src) => placed!(ImageLuma16, src),
        DynamicImage::ImageLumaA16(src) => placed!(ImageLumaA16, src),
        DynamicImage::ImageRgb16(src) => placed!(ImageRgb16, src),
        DynamicImage::ImageRgba16(src) => placed!(ImageRgba16, src),
        DynamicImage::ImageRgb32F(src) => placed!(ImageRgb32F, src),
        DynamicImage::ImageRgba32F(src) => placed!(ImageRgba32F, src),
        other => placed!(ImageRgba8, &other.to_rgba8()),
    };

    Ok(DecodedImage::new(canvas))
}

fn place<P: Pixel>(
    src: &ImageBuffer<P, Vec<P::Subpixel>>,
    left: i64,
    top: i64,
    width: u32,
    height: u32,
    extend: Extend,
) -> ImageBuffer<P, Vec<P::Subpixel>> {
    let band = match extend {
        Extend::Black => P::Subpixel::DEFAULT_MIN_VALUE,
        Extend::White => P::Subpixel::DEFAULT_MAX_VALUE,
    };
    let bands = vec![band; P::CHANNEL_COUNT as usize];
    let fill = *P::from_slice(&bands);

    let mut canvas = ImageBuffer::from_pixel(width, height, fill);
    image::imageops::replace(&mut canvas, src, left, top);
    canvas
}
