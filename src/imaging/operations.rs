//! High-level image operations.
//!
//! These functions combine calculations with backend execution: they plan
//! the geometry, ask the backend to draw it, and encode the result.

use super::backend::{BackendError, RasterBackend, SourceImage};
use super::calculations::{needs_upscale, plan_draw};
use super::params::FitMode;
use crate::targets::PixelSize;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// One encoded icon.
#[derive(Debug, Clone)]
pub struct Rasterized {
    pub size: PixelSize,
    pub png: Vec<u8>,
    /// The source was smaller than the target on at least one axis.
    pub upscaled: bool,
}

/// Render `source` at `target_w × target_h` pixels with the given fit mode.
///
/// Fractional targets are rounded to the nearest pixel (minimum 1).
pub fn rasterize(
    backend: &impl RasterBackend,
    source: &SourceImage,
    target_w: f64,
    target_h: f64,
    fit: FitMode,
) -> Result<Rasterized> {
    let source_dims = source.dimensions().as_tuple();
    let params = plan_draw(source_dims, target_w, target_h, fit);
    let size = PixelSize::new(params.canvas_width, params.canvas_height);

    let canvas = backend.draw(source, &params)?;
    let png = backend.encode_png(&canvas)?;

    Ok(Rasterized {
        size,
        png,
        upscaled: needs_upscale(source_dims, size),
    })
}

/// [`rasterize`] for an integer pixel size.
pub fn rasterize_size(
    backend: &impl RasterBackend,
    source: &SourceImage,
    size: PixelSize,
    fit: FitMode,
) -> Result<Rasterized> {
    rasterize(backend, source, size.width as f64, size.height as f64, fit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::RustBackend;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::params::Rect;
    use crate::test_helpers::{encode_as, gradient};
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    fn real_source(width: u32, height: u32) -> SourceImage {
        RustBackend::new()
            .decode(&encode_as(&gradient(width, height), ImageFormat::Png), None)
            .unwrap()
    }

    fn decode_png(png: &[u8]) -> RgbaImage {
        image::load_from_memory(png).unwrap().to_rgba8()
    }

    fn edge_pixels(img: &RgbaImage) -> Vec<u8> {
        let (w, h) = img.dimensions();
        let mut alphas = Vec::new();
        for x in 0..w {
            alphas.push(img.get_pixel(x, 0)[3]);
            alphas.push(img.get_pixel(x, h - 1)[3]);
        }
        for y in 0..h {
            alphas.push(img.get_pixel(0, y)[3]);
            alphas.push(img.get_pixel(w - 1, y)[3]);
        }
        alphas
    }

    #[test]
    fn rasterize_draws_then_encodes() {
        let backend = MockBackend::with_source(512, 256);
        let source = backend.decode(b"src", None).unwrap();

        let out = rasterize_size(&backend, &source, PixelSize::square(58), FitMode::Cover).unwrap();
        assert_eq!(out.size, PixelSize::square(58));
        assert!(!out.upscaled);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 3);
        assert_eq!(
            ops[1],
            RecordedOp::Draw {
                canvas: (58, 58),
                src: Rect::new(128, 0, 256, 256),
                dst: Rect::sized(58, 58),
                blur: None,
            }
        );
        assert_eq!(
            ops[2],
            RecordedOp::Encode {
                width: 58,
                height: 58
            }
        );
    }

    #[test]
    fn small_source_reports_upscale_and_keeps_target_size() {
        let backend = RustBackend::new();
        let source = real_source(10, 10);

        let out = rasterize_size(&backend, &source, PixelSize::square(100), FitMode::Cover).unwrap();
        assert!(out.upscaled);
        assert_eq!(decode_png(&out.png).dimensions(), (100, 100));
    }

    #[test]
    fn cover_output_has_no_transparent_edges() {
        let backend = RustBackend::new();
        for (w, h) in [(300, 120), (120, 300)] {
            let source = real_source(w, h);
            let out =
                rasterize_size(&backend, &source, PixelSize::square(40), FitMode::Cover).unwrap();
            let img = decode_png(&out.png);
            assert_eq!(img.dimensions(), (40, 40));
            assert!(edge_pixels(&img).iter().all(|&a| a == 255), "{w}x{h}");
        }
    }

    #[test]
    fn contain_output_has_transparent_letterbox() {
        let backend = RustBackend::new();
        let source = real_source(300, 100);

        let out = rasterize_size(&backend, &source, PixelSize::square(60), FitMode::Contain).unwrap();
        let img = decode_png(&out.png);
        assert_eq!(img.dimensions(), (60, 60));

        // 60 wide, 20 tall content band centered at y = 20..40
        assert_eq!(img.get_pixel(30, 0)[3], 0);
        assert_eq!(img.get_pixel(30, 59)[3], 0);
        assert_eq!(img.get_pixel(30, 19), &image::Rgba([0, 0, 0, 0]));
        assert_eq!(img.get_pixel(0, 30)[3], 255);
        assert_eq!(img.get_pixel(59, 30)[3], 255);
    }

    #[test]
    fn rectangular_target_uses_both_dimensions() {
        let backend = RustBackend::new();
        let source = real_source(64, 64);

        let out =
            rasterize_size(&backend, &source, PixelSize::new(400, 240), FitMode::Cover).unwrap();
        assert_eq!(decode_png(&out.png).dimensions(), (400, 240));
    }

    #[test]
    fn transparent_background_keeps_edge_color() {
        // White logo on a fully transparent black background.
        let logo = RgbaImage::from_fn(200, 200, |x, y| {
            if (50..150).contains(&x) && (50..150).contains(&y) {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        let source = RustBackend::new()
            .decode(&encode_as(&DynamicImage::ImageRgba8(logo), ImageFormat::Png), None)
            .unwrap();

        let out = rasterize_size(&RustBackend::new(), &source, PixelSize::square(29), FitMode::Cover)
            .unwrap();
        let img = decode_png(&out.png);

        let edges: Vec<_> = img.pixels().filter(|p| p[3] > 0 && p[3] < 255).collect();
        assert!(!edges.is_empty());
        for pixel in edges {
            assert_eq!(&pixel.0[..3], &[255, 255, 255], "{pixel:?}");
        }
    }
}
