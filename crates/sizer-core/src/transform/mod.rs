//! Placement and colour transforms applied after scaling.
//!
//! This module provides the pixel operations behind the placement and
//! normalization stages of a resize.
//!
//! # Placement
//!
//! When the scaled image does not match the target box exactly:
//! 1. Crop mode keeps a gravity-anchored window ([`crop_offsets`], [`extract_area`])
//! 2. Fit mode centres the image on a filled canvas ([`centre_offsets`], [`embed`])
//!
//! # Coordinate System
//!
//! - Offsets and sizes are in pixels
//! - Origin is top-left corner

mod colour;
mod crop;
mod embed;

pub use colour::to_srgb;
pub use crop::{crop_offsets, extract_area};
pub use embed::{centre_offsets, embed};
