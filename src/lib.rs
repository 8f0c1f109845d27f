//! # Assetic
//!
//! Generates a complete app-icon asset catalog from a single source image.
//! One picture in, one `AppIcon.appiconset.zip` out: every icon slot the
//! selected Apple platforms need, plus the `Contents.json` that tells the
//! asset catalog which file fills which slot.
//!
//! # Pipeline
//!
//! A run is a straight line with no stage manifests in between:
//!
//! ```text
//! source file ─► validate ─► resolve targets ─► decode once
//!                                                   │
//!          ┌────────────────────────────────────────┘
//!          ▼
//!   render each target (cached by pixel size) ─► Contents.json
//!          │
//!          ├─► solid image stack (visionOS, optional, best effort)
//!          ▼
//!        zip archive
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Static table of icon slots: idiom, point size, scales |
//! | [`targets`] | Platform selection and expansion of the catalog into concrete targets |
//! | [`input`] | Source validation: MIME type, size limit, read |
//! | [`imaging`] | Decode, draw, and PNG-encode behind the `RasterBackend` trait |
//! | [`cache`] | Per-run render cache keyed by pixel size, with revocable preview handles |
//! | [`manifest`] | `Contents.json` document |
//! | [`stack`] | visionOS solid image stack layers |
//! | [`archive`] | Folder layout and zip writer |
//! | [`generate`] | Run orchestration, error taxonomy, advisories, telemetry |
//! | [`config`] | `assetic.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Decode Once, Render Per Pixel Size
//!
//! The source is decoded a single time per run. Many slots share a pixel size
//! (`40x40@3x` and `60x60@2x` are both 120×120), so rendering goes through a
//! [`cache::RenderCache`] keyed by the structured `(width, height)` pair. Each
//! distinct size is drawn and encoded exactly once.
//!
//! ## Geometry Separate From Pixels
//!
//! Crop and letterbox rectangles are computed by pure functions in
//! [`imaging::calculations`] and handed to the backend as plain parameters.
//! The geometry is unit-tested without touching a pixel, and the backend can
//! be swapped for a recording mock in pipeline tests.
//!
//! ## Pure-Rust Imaging
//!
//! The production backend uses the `image` crate (Lanczos3 resampling, PNG
//! encoding). No system libraries, no external tools.

pub mod archive;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod generate;
pub mod imaging;
pub mod input;
pub mod manifest;
pub mod output;
pub mod stack;
pub mod targets;

#[cfg(test)]
pub(crate) mod test_helpers;
