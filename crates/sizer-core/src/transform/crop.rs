//! Gravity-directed cropping.
//!
//! When a resized image overflows the target box, the visible window is
//! chosen by a [`Gravity`]: the centre (default) or one edge.
//!
//! # Coordinate System
//!
//! - (0, 0) = top-left corner
//! - Offsets and sizes are in pixels of the image being cropped
//!
//! # Example
//!
//! ```ignore
//! // Keep the top 400x300 of a 400x500 image, centred horizontally
//! let (left, top) = crop_offsets(400, 500, 400, 300, Gravity::North);
//! let cropped = extract_area(&image, left, top, 400, 300)?;
//! ```

use crate::decode::{DecodeError, DecodedImage};
use crate::options::Gravity;

/// Top-left corner of a `out_width` x `out_height` window inside a
/// `in_width` x `in_height` image for the given gravity.
///
/// Centred axes round half a pixel towards the far edge. The window size is
/// clamped to the image first, so the window always lies inside it.
pub fn crop_offsets(
    in_width: u32,
    in_height: u32,
    out_width: u32,
    out_height: u32,
    gravity: Gravity,
) -> (u32, u32) {
    let spare_x = in_width.saturating_sub(out_width);
    let spare_y = in_height.saturating_sub(out_height);
    let centre_x = (spare_x + 1) / 2;
    let centre_y = (spare_y + 1) / 2;

    match gravity {
        Gravity::North => (centre_x, 0),
        Gravity::East => (spare_x, centre_y),
        Gravity::South => (centre_x, spare_y),
        Gravity::West => (0, centre_y),
        Gravity::Centre => (centre_x, centre_y),
    }
}

/// Extract a pixel rectangle from an image.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the rectangle is empty or extends
/// past the image bounds.
pub fn extract_area(
    image: &DecodedImage,
    left: u32,
    top: u32,
    width: u32,
    height: u32,
) -> Result<DecodedImage, DecodeError> {
    let right = left as u64 + width as u64;
    let bottom = top as u64 + height as u64;
    if width == 0
        || height == 0
        || right > image.width() as u64
        || bottom > image.height() as u64
    {
        return Err(DecodeError::InvalidFormat);
    }

    // Fast path: full area returns a clone
    if left == 0 && top == 0 && (width, height) == image.dimensions() {
        return Ok(image.clone());
    }

    Ok(DecodedImage::new(
        image.as_dynamic().crop_imm(left, top, width, height),
    ))
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn gravity_strategy() -> impl Strategy<Value = Gravity> {
        prop_oneof![
            Just(Gravity::Centre),
            Just(Gravity::North),
            Just(Gravity::East),
            Just(Gravity::South),
            Just(Gravity::West),
        ]
    }

    /// Strategy for (image size, window size) with the window inside the image.
    fn window_strategy() -> impl Strategy<Value = (u32, u32, u32, u32)> {
        (1u32..=2000, 1u32..=2000).prop_flat_map(|(w, h)| (Just(w), Just(h), 1..=w, 1..=h))
    }

    proptest! {
        /// Property: The crop window never leaves the image.
        #[test]
        fn prop_window_inside_image(
            (in_w, in_h, out_w, out_h) in window_strategy(),
            gravity in gravity_strategy(),
        ) {
            let (left, top) = crop_offsets(in_w, in_h, out_w, out_h, gravity);
            prop_assert!(left + out_w <= in_w);
            prop_assert!(top + out_h <= in_h);
        }

        /// Property: Edge gravities move the window along one axis only.
        #[test]
        fn prop_edge_gravity_shifts_one_axis(
            (in_w, in_h, out_w, out_h) in window_strategy(),
        ) {
            let centre = crop_offsets(in_w, in_h, out_w, out_h, Gravity::Centre);
            let north = crop_offsets(in_w, in_h, out_w, out_h, Gravity::North);
            let south = crop_offsets(in_w, in_h, out_w, out_h, Gravity::South);
            let east = crop_offsets(in_w, in_h, out_w, out_h, Gravity::East);
            let west = crop_offsets(in_w, in_h, out_w, out_h, Gravity::West);

            prop_assert_eq!(north.0, centre.0);
            prop_assert_eq!(south.0, centre.0);
            prop_assert_eq!(east.1, centre.1);
            prop_assert_eq!(west.1, centre.1);
            prop_assert_eq!(north.1, 0);
            prop_assert_eq!(west.0, 0);
            prop_assert_eq!(south.1, in_h - out_h);
            prop_assert_eq!(east.0, in_w - out_w);
        }

        /// Property: Extracting at the computed offsets yields exactly the window size.
        #[test]
        fn prop_extract_matches_window(
            (in_w, in_h) in (1u32..=64, 1u32..=64),
            (fw, fh) in (0.1f64..=1.0, 0.1f64..=1.0),
            gravity in gravity_strategy(),
        ) {
            let out_w = ((in_w as f64 * fw) as u32).max(1);
            let out_h = ((in_h as f64 * fh) as u32).max(1);
            let img = DecodedImage::from_rgb_image(image::RgbImage::new(in_w, in_h));
            let (left, top) = crop_offsets(in_w, in_h, out_w, out_h, gravity);
            let cropped = extract_area(&img, left, top, out_w, out_h).unwrap();
            prop_assert_eq!(cropped.dimensions(), (out_w, out_h));
        }
    }
}
