//! Sizer Core - resize planning and JPEG thumbnailing
//!
//! This crate turns a JPEG or PNG input and a target box into a correctly
//! sized, framed and colour-normalized JPEG, doing as little decode and
//! resampling work as the scale allows.

pub mod backend;
pub mod config;
pub mod decode;
pub mod encode;
pub mod options;
pub mod pipeline;
pub mod plan;
pub mod transform;

pub use backend::{Backend, ImageBackend, ImageHandle};
pub use config::{ConfigError, EngineConfig};
pub use decode::ImageFormat;
pub use options::{Extend, Gravity, Interpolator, ResizeRequest};
pub use pipeline::{ResizeError, Resizer, Stage};
pub use plan::{Placement, ScalePlan};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resizer_thumbnails_png() {
        let mut png = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            300,
            200,
            image::Rgba([10, 200, 30, 128]),
        ))
        .write_to(&mut png, image::ImageFormat::Png)
        .unwrap();

        let resizer = Resizer::<ImageBackend>::default();
        let request = ResizeRequest::new(150, 150)
            .with_crop(true)
            .with_gravity(Gravity::West)
            .with_quality(85);
        let jpeg = resizer.resize(png.get_ref().as_slice(), &request).unwrap();

        let out = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((out.width(), out.height()), (150, 150));
        assert_eq!(out.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_plan_is_reachable_from_root() {
        let plan = ScalePlan::compute(
            800,
            600,
            ImageFormat::Png,
            &ResizeRequest::new(400, 0),
        );
        assert_eq!((plan.output_width, plan.output_height), (400, 300));
        assert_eq!(plan.integral_shrink, 2);
    }
}
