//! Colour normalization ahead of encoding.

use crate::decode::DecodedImage;

/// Convert any pixel layout to 8-bit sRGB.
///
/// Grey is expanded to three bands, 16-bit and float samples are scaled to
/// 8 bits and alpha is dropped. Already-normalized images are returned as a
/// copy.
pub fn to_srgb(image: &DecodedImage) -> DecodedImage {
    match image.as_dynamic() {
        image::DynamicImage::ImageRgb8(rgb) => DecodedImage::from_rgb_image(rgb.clone()),
        other => DecodedImage::from_rgb_image(other.to_rgb8()),
    }
}
