//! Input format detection by magic bytes.
//!
//! Only two signatures are recognised. Exactly two bytes are consumed for
//! the check before the rest of the stream is read into memory.

use std::io::{self, Read};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JPEG start-of-image marker.
pub const MARKER_JPEG: [u8; 2] = [0xFF, 0xD8];

/// First two bytes of the PNG signature.
pub const MARKER_PNG: [u8; 2] = [0x89, 0x50];

/// Failure to obtain a recognisable input.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unknown image format")]
    Unknown,

    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Classify a 2-byte prefix. Anything shorter or unrecognised is `None`.
    pub fn sniff(prefix: &[u8]) -> Option<Self> {
        match prefix {
            [a, b, ..] => match [*a, *b] {
                MARKER_JPEG => Some(ImageFormat::Jpeg),
                MARKER_PNG => Some(ImageFormat::Png),
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether the decoder can deliver a 1/2, 1/4 or 1/8 scale raster directly.
    ///
    /// Shrink-on-load skips gamma-correct resampling, which is accepted for
    /// JPEG only.
    pub fn supports_shrink_on_load(self) -> bool {
        matches!(self, ImageFormat::Jpeg)
    }

    pub fn name(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
        }
    }

    pub(crate) fn to_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
        }
    }
}

/// Read a whole encoded image from `reader`, classifying it first.
///
/// A short stream is reported as [`FormatError::Unknown`]; an unrecognised
/// prefix fails before the remainder is read.
pub fn read_source<R: Read>(mut reader: R) -> Result<(ImageFormat, Vec<u8>), FormatError> {
    let mut prefix = Vec::with_capacity(2);
    (&mut reader).take(2).read_to_end(&mut prefix)?;

    let format = ImageFormat::sniff(&prefix).ok_or(FormatError::Unknown)?;

    let mut bytes = prefix;
    reader.read_to_end(&mut bytes)?;
    Ok((format, bytes))
}
