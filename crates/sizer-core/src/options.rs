//! Caller-facing resize options.
//!
//! A [`ResizeRequest`] is immutable for the duration of one resize call.
//! All types here are `serde` types using camelCase field names so hosts
//! (the WASM bindings, JSON configs) can pass them through unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Quality used when the request leaves `quality` unset (0).
pub const DEFAULT_QUALITY: u8 = 100;

/// Interpolation kernel for the residual affine pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolator {
    /// Bicubic (Catmull-Rom) interpolation.
    #[default]
    Bicubic,
    /// Bilinear interpolation.
    Bilinear,
    /// Edge-preserving interpolation for strong downscales.
    Nohalo,
}

impl Interpolator {
    /// Name recognised by the resampling backend.
    pub fn name(self) -> &'static str {
        match self {
            Interpolator::Bicubic => "bicubic",
            Interpolator::Bilinear => "bilinear",
            Interpolator::Nohalo => "nohalo",
        }
    }

    /// Convert to the image crate's filter.
    ///
    /// The image crate has no nohalo kernel; Lanczos3 is the closest
    /// sharp, low-ringing filter it offers.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Interpolator::Bicubic => image::imageops::FilterType::CatmullRom,
            Interpolator::Bilinear => image::imageops::FilterType::Triangle,
            Interpolator::Nohalo => image::imageops::FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for Interpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Interpolator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bicubic" => Ok(Interpolator::Bicubic),
            "bilinear" => Ok(Interpolator::Bilinear),
            "nohalo" => Ok(Interpolator::Nohalo),
            other => Err(format!("unknown interpolator '{other}'")),
        }
    }
}

/// Fill policy for the area added when a fitted image is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extend {
    /// Every band (including alpha) set to zero.
    #[default]
    Black,
    /// Every band (including alpha) set to its maximum.
    White,
}

/// Crop anchor used when the resized image overflows the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gravity {
    #[default]
    #[serde(alias = "center")]
    Centre,
    North,
    East,
    South,
    West,
}

/// Target size and framing for one resize call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResizeRequest {
    /// Target width in pixels (0 = unconstrained)
    pub width: u32,
    /// Target height in pixels (0 = unconstrained)
    pub height: u32,
    /// Fill the box and crop the overflow instead of fitting and padding
    pub crop: bool,
    /// Allow output larger than the input's natural size
    pub enlarge: bool,
    /// Pad colour when fitting
    pub extend: Extend,
    /// Kernel for the residual affine pass
    pub interpolator: Interpolator,
    /// Crop anchor
    pub gravity: Gravity,
    /// JPEG quality (1-100, 0 = default of 100)
    pub quality: u8,
    /// Let JPEG input be decoded at 1/2, 1/4 or 1/8 scale
    pub shrink_on_load: bool,
}

impl Default for ResizeRequest {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            crop: false,
            enlarge: false,
            extend: Extend::default(),
            interpolator: Interpolator::default(),
            gravity: Gravity::default(),
            quality: 0,
            shrink_on_load: true,
        }
    }
}

impl ResizeRequest {
    /// Request a fixed box of `width` x `height` (either may be 0).
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_crop(mut self, crop: bool) -> Self {
        self.crop = crop;
        self
    }

    pub fn with_enlarge(mut self, enlarge: bool) -> Self {
        self.enlarge = enlarge;
        self
    }

    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_extend(mut self, extend: Extend) -> Self {
        self.extend = extend;
        self
    }

    pub fn with_interpolator(mut self, interpolator: Interpolator) -> Self {
        self.interpolator = interpolator;
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_shrink_on_load(mut self, shrink_on_load: bool) -> Self {
        self.shrink_on_load = shrink_on_load;
        self
    }

    /// Quality handed to the encoder: unset becomes 100, the rest is clamped to 1-100.
    pub fn effective_quality(&self) -> u8 {
        if self.quality == 0 {
            DEFAULT_QUALITY
        } else {
            self.quality.min(100)
        }
    }
}
