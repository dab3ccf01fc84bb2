//! Core types for image decoding.

use image::{ColorType, DynamicImage};
use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The decoder does not accept this format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The decoder hit the configured allocation limit.
    #[error("Decoding exceeds memory limit: {0}")]
    LimitExceeded(String),

    /// The decoder produced an image with a zero dimension.
    #[error("Decoded image has empty dimensions {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
}

impl From<image::ImageError> for DecodeError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Limits(e) => DecodeError::LimitExceeded(e.to_string()),
            image::ImageError::Unsupported(_) => DecodeError::InvalidFormat,
            other => DecodeError::CorruptedFile(other.to_string()),
        }
    }
}

impl From<jpeg_decoder::Error> for DecodeError {
    fn from(err: jpeg_decoder::Error) -> Self {
        match err {
            jpeg_decoder::Error::Unsupported(_) => DecodeError::InvalidFormat,
            other => DecodeError::CorruptedFile(other.to_string()),
        }
    }
}

/// A decoded raster in whatever pixel layout the decoder produced.
///
/// PNG input may be grey, grey+alpha, RGB or RGBA at 8 or 16 bits; the
/// layout is kept until the colour normalization stage.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    image: DynamicImage,
}

impl DecodedImage {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Create a DecodedImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        Self::new(DynamicImage::ImageRgb8(img))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn color(&self) -> ColorType {
        self.image.color()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }
}

/// Bytes needed for a `width` x `height` raster of `color`.
pub fn raster_bytes(width: u32, height: u32, color: ColorType) -> u64 {
    width as u64 * height as u64 * color.bytes_per_pixel() as u64
}
