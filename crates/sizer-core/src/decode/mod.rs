//! Image decoding and pixel-level scaling primitives.
//!
//! This module provides functionality for:
//! - Detecting the input format from its magic bytes
//! - Decoding JPEG and PNG buffers, with JPEG shrink-on-load
//! - Integral box shrinking
//! - Residual affine resampling
//!
//! These are the primitives behind [`crate::backend::ImageBackend`]. The
//! resize planner never calls them directly.
//!
//! # Examples
//!
//! ```ignore
//! use sizer_core::decode::{decode_image, read_source};
//!
//! let (format, bytes) = read_source(std::fs::File::open("photo.jpg")?)?;
//! let image = decode_image(&bytes, format, 1, image::Limits::default())?;
//! println!("Decoded {}x{} image", image.width(), image.height());
//! ```

mod format;
mod load;
mod resize;
mod shrink;
mod types;

pub use format::{read_source, FormatError, ImageFormat, MARKER_JPEG, MARKER_PNG};
pub use load::{decode_image, probe_dimensions, shrink_on_load_dimensions, SHRINK_ON_LOAD_FACTORS};
pub use resize::{affine, affine_dimensions};
pub use shrink::{shrink, shrunk_dimensions};
pub use types::{raster_bytes, DecodeError, DecodedImage};
