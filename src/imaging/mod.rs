//! Image processing, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (sniffed), `load_from_memory_with_format` (fallback) |
//! | **Cover / contain** | crop + premultiplied Lanczos3 resize onto a transparent canvas |
//! | **Layer blur** | `image::imageops::fast_blur` |
//! | **Encode** | `PngEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for fit-mode and layer geometry (unit testable)
//! - **Parameters**: Data structures describing a draw
//! - **Backend**: [`RasterBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
pub mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, DecodeStrategy, Dimensions, RasterBackend, SourceImage};
pub use operations::{Rasterized, rasterize, rasterize_size};
pub use params::{DrawParams, FitMode, Rect};
pub use rust_backend::RustBackend;
