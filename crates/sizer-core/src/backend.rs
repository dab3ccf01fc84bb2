//! Imaging backends.
//!
//! The resize pipeline decides *what* to do; a [`Backend`] does the pixel
//! work. Every operation borrows its input and returns a new raster, so the
//! pipeline controls each handle's lifetime: a raster is released when the
//! stage that owns it returns, on success and error paths alike.
//!
//! [`ImageBackend`] is the built-in implementation on top of the `image`
//! crate. It counts live rasters and their bytes against the
//! [`EngineConfig`] budgets, logging when a budget is exceeded, and refuses
//! only allocations above the opt-in `max_alloc`.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::config::EngineConfig;
use crate::decode::{self, raster_bytes, DecodedImage, ImageFormat};
use crate::encode;
use crate::options::{Extend, Interpolator};
use crate::pipeline::ResizeError;
use crate::transform;

/// A decoded raster owned by one resize call.
pub trait ImageHandle {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

/// Pixel-level collaborators used by the resize pipeline.
pub trait Backend {
    type Raster: ImageHandle;

    /// Natural size of an encoded image without decoding its pixels.
    fn probe(&self, bytes: &[u8], format: ImageFormat) -> Result<(u32, u32), ResizeError>;

    /// Decode `bytes`, letting the decoder shrink by `shrink_on_load` (1, 2, 4 or 8).
    fn decode(
        &self,
        bytes: &[u8],
        format: ImageFormat,
        shrink_on_load: u32,
    ) -> Result<Self::Raster, ResizeError>;

    /// Box-shrink by integral factors.
    fn shrink(
        &self,
        raster: &Self::Raster,
        xshrink: u32,
        yshrink: u32,
    ) -> Result<Self::Raster, ResizeError>;

    /// Uniform resample by `scale` on both axes.
    fn affine(
        &self,
        raster: &Self::Raster,
        scale: f64,
        interpolator: Interpolator,
    ) -> Result<Self::Raster, ResizeError>;

    fn extract_area(
        &self,
        raster: &Self::Raster,
        left: u32,
        top: u32,
        width: u32,
        height: u32,
    ) -> Result<Self::Raster, ResizeError>;

    /// Place `raster` at (`left`, `top`) on a `width` x `height` canvas filled per `extend`.
    fn embed(
        &self,
        raster: &Self::Raster,
        left: i64,
        top: i64,
        width: u32,
        height: u32,
        extend: Extend,
    ) -> Result<Self::Raster, ResizeError>;

    /// Convert to 8-bit sRGB.
    fn to_srgb(&self, raster: &Self::Raster) -> Self::Raster;

    fn encode_jpeg(&self, raster: &Self::Raster, quality: u8) -> Result<Vec<u8>, ResizeError>;
}

/// Raster produced by [`ImageBackend`].
///
/// Counts itself in the backend's live-raster total until dropped.
#[derive(Debug)]
pub struct Raster {
    image: DecodedImage,
    _live: LiveGuard,
}

impl ImageHandle for Raster {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Rasters and bytes currently alive across all calls on one backend.
#[derive(Debug, Default)]
struct LiveTotals {
    rasters: AtomicUsize,
    bytes: AtomicU64,
}

#[derive(Debug)]
struct LiveGuard {
    totals: Arc<LiveTotals>,
    bytes: u64,
}

impl LiveGuard {
    /// Count one raster of `bytes`; returns the guard and the new totals.
    fn acquire(totals: &Arc<LiveTotals>, bytes: u64) -> (Self, usize, u64) {
        let rasters = totals.rasters.fetch_add(1, Ordering::AcqRel) + 1;
        let live_bytes = totals.bytes.fetch_add(bytes, Ordering::AcqRel) + bytes;
        let guard = Self {
            totals: Arc::clone(totals),
            bytes,
        };
        (guard, rasters, live_bytes)
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.totals.rasters.fetch_sub(1, Ordering::AcqRel);
        self.totals.bytes.fetch_sub(self.bytes, Ordering::AcqRel);
    }
}

/// Backend on top of the `image` crate.
#[derive(Debug)]
pub struct ImageBackend {
    config: EngineConfig,
    live: Arc<LiveTotals>,
}

impl Default for ImageBackend {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ImageBackend {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            live: Arc::new(LiveTotals::default()),
        }
    }

    /// Number of rasters currently alive.
    pub fn live_rasters(&self) -> usize {
        self.live.rasters.load(Ordering::Acquire)
    }

    /// Pixel bytes held by the rasters currently alive.
    pub fn live_bytes(&self) -> u64 {
        self.live.bytes.load(Ordering::Acquire)
    }

    fn wrap(&self, image: DecodedImage) -> Raster {
        let bytes = raster_bytes(image.width(), image.height(), image.color());
        let (live, rasters, live_bytes) = LiveGuard::acquire(&self.live, bytes);
        if rasters > self.config.max_objects || live_bytes > self.config.max_memory {
            debug!(
                rasters,
                live_bytes,
                max_objects = self.config.max_objects,
                max_memory = self.config.max_memory,
                "live rasters over engine budget"
            );
        }
        Raster { image, _live: live }
    }

    fn check_alloc(&self, width: u32, height: u32, raster: &Raster) -> Result<(), ResizeError> {
        let Some(max_alloc) = self.config.max_alloc else {
            return Ok(());
        };
        let bytes = raster_bytes(width, height, raster.image.color());
        if bytes > max_alloc {
            return Err(ResizeError::ResourceLimit(format!(
                "{width}x{height} raster needs {bytes} bytes, limit is {max_alloc}"
            )));
        }
        Ok(())
    }
}

impl Backend for ImageBackend {
    type Raster = Raster;

    fn probe(&self, bytes: &[u8], format: ImageFormat) -> Result<(u32, u32), ResizeError> {
        Ok(decode::probe_dimensions(bytes, format)?)
    }

    fn decode(
        &self,
        bytes: &[u8],
        format: ImageFormat,
        shrink_on_load: u32,
    ) -> Result<Raster, ResizeError> {
        let image =
            decode::decode_image(bytes, format, shrink_on_load, self.config.decoder_limits())?;
        Ok(self.wrap(image))
    }

    fn shrink(&self, raster: &Raster, xshrink: u32, yshrink: u32) -> Result<Raster, ResizeError> {
        let image = decode::shrink(&raster.image, xshrink, yshrink)
            .map_err(|e| ResizeError::Shrink(e.to_string()))?;
        Ok(self.wrap(image))
    }

    fn affine(
        &self,
        raster: &Raster,
        scale: f64,
        interpolator: Interpolator,
    ) -> Result<Raster, ResizeError> {
        let (width, height) = decode::affine_dimensions(raster.width(), raster.height(), scale);
        self.check_alloc(width, height, raster)?;

        let image = decode::affine(&raster.image, scale, interpolator)
            .map_err(|e| ResizeError::Resample(e.to_string()))?;
        Ok(self.wrap(image))
    }

    fn extract_area(
        &self,
        raster: &Raster,
        left: u32,
        top: u32,
        width: u32,
        height: u32,
    ) -> Result<Raster, ResizeError> {
        let image = transform::extract_area(&raster.image, left, top, width, height)
            .map_err(|e| ResizeError::Extract(e.to_string()))?;
        Ok(self.wrap(image))
    }

    fn embed(
        &self,
        raster: &Raster,
        left: i64,
        top: i64,
        width: u32,
        height: u32,
        extend: Extend,
    ) -> Result<Raster, ResizeError> {
        self.check_alloc(width, height, raster)?;

        let image = transform::embed(&raster.image, left, top, width, height, extend)
            .map_err(|e| ResizeError::Embed(e.to_string()))?;
        Ok(self.wrap(image))
    }

    fn to_srgb(&self, raster: &Raster) -> Raster {
        self.wrap(transform::to_srgb(&raster.image))
    }

    fn encode_jpeg(&self, raster: &Raster, quality: u8) -> Result<Vec<u8>, ResizeError> {
        Ok(encode::encode_image(&raster.image, quality)?)
    }
}
