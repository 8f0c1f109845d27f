//! Raster backend trait and shared types.
//!
//! The [`RasterBackend`] trait defines the three primitives the pipeline
//! needs: decode a source once, draw it onto a canvas, and encode a canvas
//! as PNG. Geometry is decided elsewhere (see
//! [`calculations`](super::calculations)); the backend only executes it.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording [`tests::MockBackend`].

use super::params::DrawParams;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Draw failed: {0}")]
    Draw(String),
    #[error("PNG encode failed: {0}")]
    Encode(String),
}

/// Natural size of a decoded source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Which decode path produced a [`SourceImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStrategy {
    /// Format detected from the content's magic bytes.
    Sniffed,
    /// Format taken from the declared MIME type / extension.
    Hinted(ImageFormat),
}

impl fmt::Display for DecodeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeStrategy::Sniffed => f.write_str("sniffed"),
            DecodeStrategy::Hinted(format) => write!(f, "hinted ({format:?})"),
        }
    }
}

/// A decoded, drawable source image with known dimensions.
///
/// Callers never see which strategy decoded it except for logging; every
/// backend operation takes this one type.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub image: DynamicImage,
    pub strategy: DecodeStrategy,
}

impl SourceImage {
    pub fn new(image: DynamicImage, strategy: DecodeStrategy) -> Self {
        Self { image, strategy }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.image.width(),
            height: self.image.height(),
        }
    }
}

/// Trait for raster backends.
pub trait RasterBackend {
    /// Decode encoded bytes. `hint` is the format implied by the input's
    /// declared type, used when content sniffing fails.
    fn decode(&self, bytes: &[u8], hint: Option<ImageFormat>) -> Result<SourceImage, BackendError>;

    /// Execute one draw onto a fresh transparent canvas.
    fn draw(&self, source: &SourceImage, params: &DrawParams) -> Result<RgbaImage, BackendError>;

    /// Losslessly encode a canvas as PNG.
    fn encode_png(&self, canvas: &RgbaImage) -> Result<Vec<u8>, BackendError>;
}
