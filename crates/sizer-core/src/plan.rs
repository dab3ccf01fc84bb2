//! Resize planning.
//!
//! Turns an input's natural size and a [`ResizeRequest`] into a
//! [`ScalePlan`]: the overall scale factor, how much of it the decoder can
//! absorb (shrink-on-load), the integral box shrink that follows and the
//! residual affine scale that finishes the job.
//!
//! Scalers round, so the plan is not trusted blindly: after every stage the
//! pipeline calls [`ScalePlan::recompute_residual`] with the dimensions it
//! actually got, and [`Placement::decide`] compares the final size with the
//! target instead of re-reading the request.
//!
//! # Example
//!
//! ```ignore
//! let req = ResizeRequest::new(400, 300).with_crop(true);
//! let plan = ScalePlan::compute(4000, 3000, ImageFormat::Jpeg, &req);
//! assert_eq!(plan.shrink_on_load, 8);
//! assert_eq!(plan.integral_shrink, 1);
//! assert_eq!(plan.residual, 0.8);
//! ```

use serde::Serialize;

use crate::decode::{ImageFormat, SHRINK_ON_LOAD_FACTORS};
use crate::options::{Gravity, ResizeRequest};
use crate::transform::{centre_offsets, crop_offsets};

/// Working scale state threaded through one resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalePlan {
    /// Input size / output size still to be applied after decoding
    pub factor: f64,
    /// Decoder scale denominator (1, 2, 4 or 8)
    pub shrink_on_load: u32,
    /// Integral box shrink applied after decoding (>= 1)
    pub integral_shrink: u32,
    /// Scale left for the affine pass; 0 means copy unchanged
    pub residual: f64,
    pub output_width: u32,
    pub output_height: u32,
}

/// `floor(factor)`, never below 1.
pub fn integral_shrink_of(factor: f64) -> u32 {
    (factor.floor() as u32).max(1)
}

impl ScalePlan {
    /// The plan that leaves an image at its natural size.
    pub fn identity(width: u32, height: u32) -> Self {
        Self {
            factor: 1.0,
            shrink_on_load: 1,
            integral_shrink: 1,
            residual: 0.0,
            output_width: width,
            output_height: height,
        }
    }

    /// Full plan: target dimensions, then the shrink-on-load split.
    pub fn compute(
        in_width: u32,
        in_height: u32,
        format: ImageFormat,
        request: &ResizeRequest,
    ) -> Self {
        let mut plan = Self::for_dimensions(in_width, in_height, request);
        plan.apply_shrink_on_load(format, request.shrink_on_load);
        plan
    }

    /// Target size and overall factor for an input of the given natural size.
    ///
    /// - Both sides fixed: fill the box when cropping (`min` factor), fit
    ///   inside it otherwise (`max` factor).
    /// - Width only: height follows from the width ratio.
    /// - Height only: the factor is `in_width / height`, mirroring the
    ///   requested height onto the width axis.
    /// - Neither: identity.
    ///
    /// Unless enlargement is allowed, an input smaller than the target on
    /// either axis collapses the plan to the identity at natural size.
    pub fn for_dimensions(in_width: u32, in_height: u32, request: &ResizeRequest) -> Self {
        let in_w = in_width as f64;
        let in_h = in_height as f64;

        let (factor, out_width, out_height) = match (request.width, request.height) {
            (w, h) if w > 0 && h > 0 => {
                let xf = in_w / w as f64;
                let yf = in_h / h as f64;
                let factor = if request.crop { xf.min(yf) } else { xf.max(yf) };
                (factor, w, h)
            }
            (w, _) if w > 0 => {
                let factor = in_w / w as f64;
                (factor, w, floor_dimension(in_h / factor))
            }
            (_, h) if h > 0 => {
                let factor = in_w / h as f64;
                (factor, floor_dimension(in_w / factor), h)
            }
            _ => (1.0, in_width, in_height),
        };

        if !request.enlarge && (in_width < out_width || in_height < out_height) {
            return Self::identity(in_width, in_height);
        }

        let integral_shrink = integral_shrink_of(factor);
        Self {
            factor,
            shrink_on_load: 1,
            integral_shrink,
            residual: integral_shrink as f64 / factor,
            output_width: out_width,
            output_height: out_height,
        }
    }

    /// Move as much of the integral shrink as possible into the decoder.
    ///
    /// Picks the largest of 8, 4, 2 not above the integral shrink, divides
    /// the factor by it and re-derives the integral/residual split. Formats
    /// without shrink-on-load, or callers that disabled it, keep the plan.
    pub fn apply_shrink_on_load(&mut self, format: ImageFormat, enabled: bool) {
        self.shrink_on_load = 1;
        if !enabled || !format.supports_shrink_on_load() {
            return;
        }

        let Some(&divisor) = SHRINK_ON_LOAD_FACTORS
            .iter()
            .find(|&&d| self.integral_shrink >= d)
        else {
            return;
        };

        self.shrink_on_load = divisor;
        self.factor = (self.factor / divisor as f64).max(1.0);
        self.integral_shrink = integral_shrink_of(self.factor);
        self.residual = self.integral_shrink as f64 / self.factor;
    }

    /// Re-derive the residual from the raster the previous stage produced.
    ///
    /// Zero when the raster already has the target size. Otherwise the
    /// per-axis ratios are combined with `max` when cropping (cover the box)
    /// and `min` when fitting (stay inside it).
    pub fn recompute_residual(&mut self, actual_width: u32, actual_height: u32, crop: bool) {
        if (actual_width, actual_height) == (self.output_width, self.output_height) {
            self.residual = 0.0;
            return;
        }

        let rx = self.output_width as f64 / actual_width.max(1) as f64;
        let ry = self.output_height as f64 / actual_height.max(1) as f64;
        self.residual = if crop { rx.max(ry) } else { rx.min(ry) };
    }

    /// Whether the plan leaves the image untouched.
    pub fn is_identity(&self) -> bool {
        self.shrink_on_load == 1 && self.integral_shrink == 1 && self.residual == 0.0
    }
}

fn floor_dimension(value: f64) -> u32 {
    (value.floor() as u32).max(1)
}

/// How the scaled image is reconciled with the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum Placement {
    /// Already the right size.
    Copy,
    /// Keep a window of the scaled image.
    Crop {
        left: u32,
        top: u32,
        width: u32,
        height: u32,
    },
    /// Centre the scaled image on a filled canvas.
    Embed {
        left: i64,
        top: i64,
        width: u32,
        height: u32,
    },
}

impl Placement {
    /// Choose the placement for a scaled image of `width` x `height`.
    ///
    /// When cropping, the window is clamped to the scaled image so it never
    /// reaches outside it.
    pub fn decide(
        width: u32,
        height: u32,
        target_width: u32,
        target_height: u32,
        crop: bool,
        gravity: Gravity,
    ) -> Self {
        if (width, height) == (target_width, target_height) {
            return Placement::Copy;
        }

        if crop {
            let out_width = target_width.min(width);
            let out_height = target_height.min(height);
            let (left, top) = crop_offsets(width, height, out_width, out_height, gravity);
            Placement::Crop {
                left,
                top,
                width: out_width,
                height: out_height,
            }
        } else {
            let (left, top) = centre_offsets(width, height, target_width, target_height);
            Placement::Embed {
                left,
                top,
                width: target_width,
                height: target_height,
            }
        }
    }

    /// Size of the placed image.
    pub fn output_size(&self, width: u32, height: u32) -> (u32, u32) {
        match *self {
            Placement::Copy => (width, height),
            Placement::Crop { width, height, .. } | Placement::Embed { width, height, .. } => {
                (width, height)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(width: u32, height: u32) -> ResizeRequest {
        ResizeRequest::new(width, height)
    }

    #[test]
    fn test_neither_fixed_is_identity() {
        let plan = ScalePlan::for_dimensions(800, 600, &req(0, 0));
        assert_eq!(plan.factor, 1.0);
        assert_eq!(plan.integral_shrink, 1);
        assert_eq!((plan.output_width, plan.output_height), (800, 600));
    }

    #[test]
    fn test_both_fixed_crop_uses_min_factor() {
        let plan = ScalePlan::for_dimensions(4000, 2000, &req(400, 400).with_crop(true));
        // xf = 10, yf = 5
        assert_eq!(plan.factor, 5.0);
        assert_eq!(plan.integral_shrink, 5);
        assert_eq!(plan.residual, 1.0);
        assert_eq!((plan.output_width, plan.output_height), (400, 400));
    }

    #[test]
    fn test_both_fixed_fit_uses_max_factor() {
        let plan = ScalePlan::for_dimensions(4000, 2000, &req(400, 400));
        assert_eq!(plan.factor, 10.0);
        assert_eq!(plan.integral_shrink, 10);
        assert_eq!((plan.output_width, plan.output_height), (400, 400));
    }

    #[test]
    fn test_width_only_preserves_aspect() {
        let plan = ScalePlan::for_dimensions(800, 600, &req(400, 0));
        assert_eq!(plan.factor, 2.0);
        assert_eq!((plan.output_width, plan.output_height), (400, 300));
    }

    #[test]
    fn test_width_only_floors_height() {
        let plan = ScalePlan::for_dimensions(1000, 667, &req(300, 0));
        // 667 / (1000 / 300) = 200.1
        assert_eq!((plan.output_width, plan.output_height), (300, 200));
    }

    #[test]
    fn test_height_only_scales_from_width() {
        let plan = ScalePlan::for_dimensions(800, 600, &req(0, 400));
        // factor = in_width / height
        assert_eq!(plan.factor, 2.0);
        assert_eq!((plan.output_width, plan.output_height), (400, 400));
    }

    #[test]
    fn test_derived_dimension_never_zero() {
        let plan = ScalePlan::for_dimensions(1000, 1, &req(10, 0));
        assert_eq!((plan.output_width, plan.output_height), (10, 1));
    }

    #[test]
    fn test_enlargement_refused() {
        let plan = ScalePlan::for_dimensions(100, 100, &req(400, 400));
        assert_eq!(plan, ScalePlan::identity(100, 100));
        assert!(plan.is_identity());
    }

    #[test]
    fn test_enlargement_refused_on_one_axis() {
        // Wide enough, not tall enough
        let plan = ScalePlan::for_dimensions(1000, 100, &req(400, 200).with_crop(true));
        assert_eq!((plan.output_width, plan.output_height), (1000, 100));
        assert_eq!(plan.residual, 0.0);
    }

    #[test]
    fn test_enlargement_allowed() {
        let plan = ScalePlan::for_dimensions(100, 100, &req(400, 400).with_enlarge(true));
        assert_eq!(plan.factor, 0.25);
        assert_eq!(plan.integral_shrink, 1);
        assert_eq!(plan.residual, 4.0);
        assert_eq!((plan.output_width, plan.output_height), (400, 400));
    }

    #[test]
    fn test_shrink_on_load_jpeg() {
        let request = req(400, 300).with_crop(true);
        let plan = ScalePlan::compute(4000, 3000, ImageFormat::Jpeg, &request);
        assert_eq!(plan.shrink_on_load, 8);
        assert_eq!(plan.factor, 1.25);
        assert_eq!(plan.integral_shrink, 1);
        assert_eq!(plan.residual, 0.8);
    }

    #[test]
    fn test_shrink_on_load_picks_largest_divisor() {
        let cases = [(2.5, 2, 1.25), (4.0, 4, 1.0), (7.9, 4, 1.975), (20.0, 8, 2.5)];
        for (factor, divisor, reduced) in cases {
            let in_width = (factor * 400.0) as u32;
            let plan = ScalePlan::compute(in_width, in_width, ImageFormat::Jpeg, &req(400, 0));
            assert_eq!(plan.shrink_on_load, divisor, "factor {factor}");
            assert!((plan.factor - reduced).abs() < 1e-9, "factor {factor}");
            assert_eq!(plan.integral_shrink, integral_shrink_of(reduced));
        }
    }

    #[test]
    fn test_shrink_on_load_not_below_two() {
        let plan = ScalePlan::compute(700, 700, ImageFormat::Jpeg, &req(400, 0));
        assert_eq!(plan.shrink_on_load, 1);
        assert_eq!(plan.factor, 1.75);
    }

    #[test]
    fn test_shrink_on_load_png_unchanged() {
        let request = req(400, 300).with_crop(true);
        let plan = ScalePlan::compute(4000, 3000, ImageFormat::Png, &request);
        assert_eq!(plan.shrink_on_load, 1);
        assert_eq!(plan.factor, 10.0);
        assert_eq!(plan.integral_shrink, 10);
    }

    #[test]
    fn test_shrink_on_load_disabled() {
        let request = req(400, 300).with_shrink_on_load(false);
        let plan = ScalePlan::compute(4000, 3000, ImageFormat::Jpeg, &request);
        assert_eq!(plan.shrink_on_load, 1);
        assert_eq!(plan.integral_shrink, 10);
    }

    #[test]
    fn test_recompute_residual_exact_size() {
        let mut plan = ScalePlan::for_dimensions(4000, 3000, &req(400, 300));
        plan.recompute_residual(400, 300, false);
        assert_eq!(plan.residual, 0.0);
    }

    #[test]
    fn test_recompute_residual_crop_takes_max() {
        let mut plan = ScalePlan::for_dimensions(1000, 500, &req(300, 300).with_crop(true));
        plan.recompute_residual(500, 250, true);
        // rx = 0.6, ry = 1.2
        assert_eq!(plan.residual, 1.2);
    }

    #[test]
    fn test_recompute_residual_fit_takes_min() {
        let mut plan = ScalePlan::for_dimensions(1000, 500, &req(300, 300));
        plan.recompute_residual(334, 167, false);
        assert!((plan.residual - 300.0 / 334.0).abs() < 1e-12);
    }

    #[test]
    fn test_placement_copy() {
        assert_eq!(
            Placement::decide(400, 300, 400, 300, true, Gravity::North),
            Placement::Copy
        );
    }

    #[test]
    fn test_placement_crop_gravity() {
        let placement = Placement::decide(400, 500, 400, 300, true, Gravity::South);
        assert_eq!(
            placement,
            Placement::Crop {
                left: 0,
                top: 200,
                width: 400,
                height: 300
            }
        );
    }

    #[test]
    fn test_placement_crop_clamps_window() {
        let placement = Placement::decide(399, 500, 400, 300, true, Gravity::Centre);
        assert_eq!(
            placement,
            Placement::Crop {
                left: 0,
                top: 100,
                width: 399,
                height: 300
            }
        );
        assert_eq!(placement.output_size(399, 500), (399, 300));
    }

    #[test]
    fn test_placement_embed_centred() {
        let placement = Placement::decide(400, 225, 400, 400, false, Gravity::East);
        assert_eq!(
            placement,
            Placement::Embed {
                left: 0,
                top: 87,
                width: 400,
                height: 400
            }
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
