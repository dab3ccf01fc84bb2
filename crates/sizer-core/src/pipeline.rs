//! The resize pipeline.
//!
//! [`Resizer`] runs one request through the stages in a fixed order:
//!
//! 1. sniff the format and read the input into memory
//! 2. probe the natural size and compute a [`ScalePlan`]
//! 3. decode (with the shrink-on-load hint), then integral shrink or copy
//! 4. recompute the residual from the raster actually produced
//! 5. affine resample by the residual, or copy when it is zero
//! 6. crop, embed or copy to reach the target box
//! 7. normalize to sRGB and encode as JPEG
//!
//! A stage's input raster is dropped as soon as its output exists. On a
//! failure every raster still held goes out of scope with the early return,
//! so none outlive the call.

use std::io::Read;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::backend::{Backend, ImageBackend, ImageHandle};
use crate::decode::{read_source, DecodeError, FormatError, ImageFormat};
use crate::encode::EncodeError;
use crate::options::ResizeRequest;
use crate::plan::{Placement, ScalePlan};

/// Pipeline stage a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Read,
    Sniff,
    Decode,
    Shrink,
    Resample,
    Extract,
    Embed,
    Encode,
    Limits,
}

/// Errors that abort a resize.
#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("failed to read input: {0}")]
    Io(#[source] std::io::Error),

    #[error("unknown image format")]
    UnknownFormat,

    #[error("decode failed: {0}")]
    Decode(DecodeError),

    #[error("shrink failed: {0}")]
    Shrink(String),

    #[error("affine resample failed: {0}")]
    Resample(String),

    #[error("extract area failed: {0}")]
    Extract(String),

    #[error("embed failed: {0}")]
    Embed(String),

    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("resource limit exceeded: {0}")]
    ResourceLimit(String),
}

impl ResizeError {
    pub fn stage(&self) -> Stage {
        match self {
            ResizeError::Io(_) => Stage::Read,
            ResizeError::UnknownFormat => Stage::Sniff,
            ResizeError::Decode(_) => Stage::Decode,
            ResizeError::Shrink(_) => Stage::Shrink,
            ResizeError::Resample(_) => Stage::Resample,
            ResizeError::Extract(_) => Stage::Extract,
            ResizeError::Embed(_) => Stage::Embed,
            ResizeError::Encode(_) => Stage::Encode,
            ResizeError::ResourceLimit(_) => Stage::Limits,
        }
    }
}

impl From<FormatError> for ResizeError {
    fn from(err: FormatError) -> Self {
        match err {
            FormatError::Unknown => ResizeError::UnknownFormat,
            FormatError::Io(e) => ResizeError::Io(e),
        }
    }
}

impl From<DecodeError> for ResizeError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::LimitExceeded(msg) => ResizeError::ResourceLimit(msg),
            other => ResizeError::Decode(other),
        }
    }
}

/// Resizes encoded images into JPEG thumbnails.
///
/// Holds no per-call state; one instance can serve many threads when the
/// backend is `Sync`.
#[derive(Debug, Default)]
pub struct Resizer<B = ImageBackend> {
    backend: B,
}

impl<B: Backend> Resizer<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read a whole JPEG or PNG stream and resize it per `request`.
    ///
    /// Only two bytes are read before the format is known; an unrecognised
    /// prefix fails with [`ResizeError::UnknownFormat`] without reading on.
    pub fn resize<R: Read>(
        &self,
        reader: R,
        request: &ResizeRequest,
    ) -> Result<Vec<u8>, ResizeError> {
        let result = read_source(reader)
            .map_err(ResizeError::from)
            .and_then(|(format, bytes)| self.run(format, &bytes, request));

        if let Err(err) = &result {
            warn!(stage = ?err.stage(), error = %err, "resize failed");
        }
        result
    }

    pub fn resize_bytes(
        &self,
        bytes: &[u8],
        request: &ResizeRequest,
    ) -> Result<Vec<u8>, ResizeError> {
        self.resize(bytes, request)
    }

    /// The plan a resize of `bytes` would start from, without touching pixels.
    pub fn plan(&self, bytes: &[u8], request: &ResizeRequest) -> Result<ScalePlan, ResizeError> {
        let format = ImageFormat::sniff(bytes).ok_or(ResizeError::UnknownFormat)?;
        let (width, height) = self.backend.probe(bytes, format)?;
        Ok(ScalePlan::compute(width, height, format, request))
    }

    fn run(
        &self,
        format: ImageFormat,
        bytes: &[u8],
        request: &ResizeRequest,
    ) -> Result<Vec<u8>, ResizeError> {
        let started = tracing::enabled!(tracing::Level::DEBUG).then(Instant::now);

        let (in_width, in_height) = self.backend.probe(bytes, format)?;
        let mut plan = ScalePlan::compute(in_width, in_height, format, request);
        debug!(
            format = format.name(),
            in_width,
            in_height,
            ?request,
            ?plan,
            "resize planned"
        );

        let decoded = self.backend.decode(bytes, format, plan.shrink_on_load)?;
        trace!(
            width = decoded.width(),
            height = decoded.height(),
            shrink_on_load = plan.shrink_on_load,
            "decoded"
        );

        let shrunk = if plan.integral_shrink > 1 {
            let factor = plan.integral_shrink;
            let out = self.backend.shrink(&decoded, factor, factor)?;
            drop(decoded);
            out
        } else {
            decoded
        };
        let (shrunk_width, shrunk_height) = shrunk.dimensions();
        plan.recompute_residual(shrunk_width, shrunk_height, request.crop);
        trace!(
            width = shrunk_width,
            height = shrunk_height,
            residual = plan.residual,
            "shrunk"
        );

        let affined = if plan.residual != 0.0 {
            let out = self
                .backend
                .affine(&shrunk, plan.residual, request.interpolator)?;
            drop(shrunk);
            out
        } else {
            shrunk
        };
        let (affined_width, affined_height) = affined.dimensions();
        trace!(width = affined_width, height = affined_height, "affined");

        let placement = Placement::decide(
            affined_width,
            affined_height,
            plan.output_width,
            plan.output_height,
            request.crop,
            request.gravity,
        );
        let placed = match placement {
            Placement::Copy => affined,
            Placement::Crop {
                left,
                top,
                width,
                height,
            } => {
                let out = self
                    .backend
                    .extract_area(&affined, left, top, width, height)?;
                drop(affined);
                out
            }
            Placement::Embed {
                left,
                top,
                width,
                height,
            } => {
                let out = self
                    .backend
                    .embed(&affined, left, top, width, height, request.extend)?;
                drop(affined);
                out
            }
        };
        (plan.output_width, plan.output_height) =
            placement.output_size(affined_width, affined_height);
        trace!(?placement, width = placed.width(), height = placed.height(), "placed");

        let normalized = self.backend.to_srgb(&placed);
        drop(placed);
        let encoded = self
            .backend
            .encode_jpeg(&normalized, request.effective_quality())?;

        if let Some(started) = started {
            debug!(
                width = plan.output_width,
                height = plan.output_height,
                bytes = encoded.len(),
                elapsed = ?started.elapsed(),
                "resize done"
            );
        }
        Ok(encoded)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================


/// Dimension-only backend shared by the property tests.
#[cfg(test)]
mod tests_support {
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::options::{Extend, Interpolator};

    pub struct SizeOnly {
        width: u32,
        height: u32,
        live: Arc<AtomicI64>,
    }

    impl ImageHandle for SizeOnly {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }
    }

    impl Drop for SizeOnly {
        fn drop(&mut self) {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    pub struct SizeOnlyBackend {
        natural: (u32, u32),
        live: Arc<AtomicI64>,
    }

    impl SizeOnlyBackend {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                natural: (width, height),
                live: Arc::new(AtomicI64::new(0)),
            }
        }

        pub fn live(&self) -> i64 {
            self.live.load(Ordering::SeqCst)
        }

        fn raster(&self, width: u32, height: u32) -> SizeOnly {
            self.live.fetch_add(1, Ordering::SeqCst);
            SizeOnly {
                width: width.max(1),
                height: height.max(1),
                live: Arc::clone(&self.live),
            }
        }
    }

    impl Backend for SizeOnlyBackend {
        type Raster = SizeOnly;

        fn probe(&self, _: &[u8], _: ImageFormat) -> Result<(u32, u32), ResizeError> {
            Ok(self.natural)
        }

        fn decode(&self, _: &[u8], _: ImageFormat, shrink: u32) -> Result<SizeOnly, ResizeError> {
            let (w, h) = self.natural;
            Ok(self.raster(w.div_ceil(shrink), h.div_ceil(shrink)))
        }

        fn shrink(&self, r: &SizeOnly, x: u32, y: u32) -> Result<SizeOnly, ResizeError> {
            let (w, h) = crate::decode::shrunk_dimensions(r.width, r.height, x, y);
            Ok(self.raster(w, h))
        }

        fn affine(
            &self,
            r: &SizeOnly,
            scale: f64,
            _: Interpolator,
        ) -> Result<SizeOnly, ResizeError> {
            let (w, h) = crate::decode::affine_dimensions(r.width, r.height, scale);
            Ok(self.raster(w, h))
        }

        fn extract_area(
            &self,
            r: &SizeOnly,
            left: u32,
            top: u32,
            width: u32,
            height: u32,
        ) -> Result<SizeOnly, ResizeError> {
            if left + width > r.width || top + height > r.height {
                return Err(ResizeError::Extract("window outside image".into()));
            }
            Ok(self.raster(width, height))
        }

        fn embed(
            &self,
            _: &SizeOnly,
            _: i64,
            _: i64,
            width: u32,
            height: u32,
            _: Extend,
        ) -> Result<SizeOnly, ResizeError> {
            Ok(self.raster(width, height))
        }

        fn to_srgb(&self, r: &SizeOnly) -> SizeOnly {
            self.raster(r.width, r.height)
        }

        fn encode_jpeg(&self, r: &SizeOnly, _: u8) -> Result<Vec<u8>, ResizeError> {
            Ok(format!("{}x{}", r.width, r.height).into_bytes())
        }
    }
}
