//! Pure Rust raster backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (content sniffing) | `image::ImageReader::with_guessed_format` |
//! | Decode (declared format) | `image::load_from_memory_with_format` |
//! | Crop | `image::DynamicImage::crop_imm` |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Composite | `image::imageops::replace` onto a transparent canvas |
//! | Blur | `image::imageops::fast_blur` (box approximation of a Gaussian) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//!
//! Resize, composite and blur all run on premultiplied `Rgba32F` pixels.
//! Filtering straight alpha drags the color of fully transparent pixels
//! (usually black) into antialiased edges and blurred margins.
//!
//! Animated inputs (GIF, APNG, animated WebP) decode to their first frame.

use super::backend::{BackendError, DecodeStrategy, RasterBackend, SourceImage};
use super::params::DrawParams;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::{self, FilterType};
use image::{
    DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, ImageReader, Rgba, Rgba32FImage,
    RgbaImage,
};
use log::debug;
use std::io::Cursor;

/// Backend built on the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_sniffed(bytes: &[u8]) -> Result<DynamicImage, String> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| e.to_string())?
        .decode()
        .map_err(|e| e.to_string())
}

fn decode_hinted(bytes: &[u8], format: ImageFormat) -> Result<DynamicImage, String> {
    image::load_from_memory_with_format(bytes, format).map_err(|e| e.to_string())
}

fn ensure_drawable(image: DynamicImage) -> Result<DynamicImage, BackendError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(BackendError::Decode(format!(
            "image has empty dimensions {}x{}",
            image.width(),
            image.height()
        )));
    }
    Ok(image)
}

fn premultiply(image: &mut Rgba32FImage) {
    for pixel in image.pixels_mut() {
        let alpha = pixel[3];
        for channel in &mut pixel.0[..3] {
            *channel *= alpha;
        }
    }
}

/// Back to straight 8-bit RGBA. Lanczos overshoot is clamped here.
fn unpremultiply(image: &Rgba32FImage) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = a.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return Rgba([0, 0, 0, 0]);
        }
        let channel = |c: f32| ((c / alpha).clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([channel(r), channel(g), channel(b), (alpha * 255.0).round() as u8])
    })
}

impl RasterBackend for RustBackend {
    fn decode(&self, bytes: &[u8], hint: Option<ImageFormat>) -> Result<SourceImage, BackendError> {
        let sniff_err = match decode_sniffed(bytes) {
            Ok(image) => {
                return Ok(SourceImage::new(
                    ensure_drawable(image)?,
                    DecodeStrategy::Sniffed,
                ));
            }
            Err(e) => e,
        };

        let Some(format) = hint else {
            return Err(BackendError::Decode(sniff_err));
        };
        debug!("content sniffing failed ({sniff_err}), retrying as {format:?}");

        let image = decode_hinted(bytes, format)
            .map_err(|e| BackendError::Decode(format!("{sniff_err}; as {format:?}: {e}")))?;
        Ok(SourceImage::new(
            ensure_drawable(image)?,
            DecodeStrategy::Hinted(format),
        ))
    }

    fn draw(&self, source: &SourceImage, params: &DrawParams) -> Result<RgbaImage, BackendError> {
        let (src, dst) = (params.src, params.dst);
        if src.width == 0 || src.height == 0 || dst.width == 0 || dst.height == 0 {
            return Err(BackendError::Draw(format!(
                "empty rectangle: src {src:?}, dst {dst:?}"
            )));
        }

        let mut cropped = source
            .image
            .crop_imm(src.x, src.y, src.width, src.height)
            .to_rgba32f();
        premultiply(&mut cropped);
        let scaled = imageops::resize(&cropped, dst.width, dst.height, FilterType::Lanczos3);

        let canvas = if (dst.x, dst.y) == (0, 0)
            && scaled.dimensions() == (params.canvas_width, params.canvas_height)
        {
            scaled
        } else {
            let mut canvas = Rgba32FImage::new(params.canvas_width, params.canvas_height);
            imageops::replace(&mut canvas, &scaled, dst.x as i64, dst.y as i64);
            canvas
        };

        let canvas = match params.blur {
            Some(sigma) => imageops::fast_blur(&canvas, sigma),
            None => canvas,
        };
        Ok(unpremultiply(&canvas))
    }

    fn encode_png(&self, canvas: &RgbaImage) -> Result<Vec<u8>, BackendError> {
        let mut out = Vec::new();
        PngEncoder::new_with_quality(&mut out, CompressionType::Default, PngFilterType::Adaptive)
            .write_image(
                canvas.as_raw(),
                canvas.width(),
                canvas.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| BackendError::Encode(e.to_string()))?;
        Ok(out)
    }
}
