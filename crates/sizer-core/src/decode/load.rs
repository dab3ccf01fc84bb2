//! Decoding of JPEG and PNG buffers, with optional shrink-on-load.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageReader, RgbImage};
use jpeg_decoder::PixelFormat;
use tracing::trace;

use super::{raster_bytes, DecodeError, DecodedImage, ImageFormat};

/// Scale denominators a JPEG decoder can apply while decoding.
pub const SHRINK_ON_LOAD_FACTORS: [u32; 3] = [8, 4, 2];

/// Decode an encoded buffer of a known format.
///
/// `shrink_on_load` is the decoder hint (1, 2, 4 or 8). For JPEG it selects
/// the decoder's scaled IDCT, so the full-size raster is never built and the
/// result is `ceil(size / shrink)` on each axis. Other formats ignore the
/// hint.
///
/// # Errors
///
/// Returns `DecodeError::LimitExceeded` if decoding would allocate past
/// `limits`, `DecodeError::CorruptedFile` for malformed data.
pub fn decode_image(
    bytes: &[u8],
    format: ImageFormat,
    shrink_on_load: u32,
    limits: image::Limits,
) -> Result<DecodedImage, DecodeError> {
    if shrink_on_load > 1 && format.supports_shrink_on_load() {
        if let Some(img) = decode_jpeg_scaled(bytes, shrink_on_load, &limits)? {
            return Ok(img);
        }
    }

    let img = decode_full(bytes, format, limits)?;
    if shrink_on_load <= 1 || !format.supports_shrink_on_load() {
        return Ok(DecodedImage::new(img));
    }

    // Only reached for JPEG layouts the scaled decoder cannot deliver.
    let (width, height) = shrink_on_load_dimensions(img.width(), img.height(), shrink_on_load);
    Ok(DecodedImage::new(img.thumbnail_exact(width, height)))
}

fn decode_full(
    bytes: &[u8],
    format: ImageFormat,
    limits: image::Limits,
) -> Result<DynamicImage, DecodeError> {
    let mut reader = ImageReader::with_format(Cursor::new(bytes), format.to_image_format());
    reader.limits(limits);

    let img = reader.decode()?;
    if img.width() == 0 || img.height() == 0 {
        return Err(DecodeError::EmptyImage {
            width: img.width(),
            height: img.height(),
        });
    }
    Ok(img)
}

/// Decode a JPEG at `1/shrink` scale with the DCT-domain downscaler.
///
/// Returns `Ok(None)` when the stream has a layout the scaled path does not
/// produce (16-bit grey, CMYK) or the decoder picks another size; the
/// caller then decodes in full.
fn decode_jpeg_scaled(
    bytes: &[u8],
    shrink: u32,
    limits: &image::Limits,
) -> Result<Option<DecodedImage>, DecodeError> {
    let mut decoder = jpeg_decoder::Decoder::new(Cursor::new(bytes));
    decoder.read_info()?;
    let Some(info) = decoder.info() else {
        return Ok(None);
    };
    if info.width == 0 || info.height == 0 {
        return Err(DecodeError::EmptyImage {
            width: info.width.into(),
            height: info.height.into(),
        });
    }

    let color = match info.pixel_format {
        PixelFormat::L8 => image::ColorType::L8,
        PixelFormat::RGB24 => image::ColorType::Rgb8,
        _ => return Ok(None),
    };

    let expected = shrink_on_load_dimensions(info.width.into(), info.height.into(), shrink);
    let (Ok(req_width), Ok(req_height)) = (u16::try_from(expected.0), u16::try_from(expected.1))
    else {
        return Ok(None);
    };
    let (width, height) = decoder.scale(req_width, req_height)?;
    let (width, height) = (u32::from(width), u32::from(height));
    if (width, height) != expected {
        trace!(width, height, shrink, "scaled decode size mismatch, decoding in full");
        return Ok(None);
    }

    let bytes_needed = raster_bytes(width, height, color);
    if let Some(max_alloc) = limits.max_alloc {
        if bytes_needed > max_alloc {
            return Err(DecodeError::LimitExceeded(format!(
                "{width}x{height} scaled decode needs {bytes_needed} bytes, limit is {max_alloc}"
            )));
        }
    }

    let pixels = decoder.decode()?;
    let short = || DecodeError::CorruptedFile("scaled decode returned a short buffer".to_string());
    let img = match color {
        image::ColorType::L8 => {
            DynamicImage::ImageLuma8(GrayImage::from_raw(width, height, pixels).ok_or_else(short)?)
        }
        _ => DynamicImage::ImageRgb8(RgbImage::from_raw(width, height, pixels).ok_or_else(short)?),
    };
    Ok(Some(DecodedImage::new(img)))
}

/// Natural dimensions of an encoded buffer, read from its header only.
///
/// # Errors
///
/// Returns `DecodeError::CorruptedFile` if the header cannot be parsed and
/// `DecodeError::EmptyImage` for a zero-sized image.
pub fn probe_dimensions(bytes: &[u8], format: ImageFormat) -> Result<(u32, u32), DecodeError> {
    let (width, height) =
        ImageReader::with_format(Cursor::new(bytes), format.to_image_format()).into_dimensions()?;
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage { width, height });
    }
    Ok((width, height))
}

/// Dimensions a JPEG decoder delivers when scaling by `1/shrink`.
pub fn shrink_on_load_dimensions(width: u32, height: u32, shrink: u32) -> (u32, u32) {
    let shrink = shrink.max(1);
    (width.div_ceil(shrink), height.div_ceil(shrink))
}
