//! Source image intake and validation.
//!
//! Everything here runs before any processing starts: a rejected input never
//! creates partial state, and the caller can simply retry with another file.
//!
//! - Inputs larger than [`MAX_INPUT_BYTES`] are rejected. For files this is
//!   checked from filesystem metadata, before the file is read.
//! - The declared type must be an `image/*` MIME type. For files the type is
//!   derived from the extension.
//! - GIF sources are accepted with an advisory: only the first frame is used.

use image::ImageFormat;
use std::path::Path;
use thiserror::Error;

/// 25 MiB.
pub const MAX_INPUT_BYTES: u64 = 25 * 1024 * 1024;

const UNKNOWN_MIME: &str = "application/octet-stream";

#[derive(Error, Debug)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported file type ({mime}) — please select an image.")]
    UnsupportedType { mime: String },
    #[error("File too large ({}) — max {}.", human(.size), human(.max))]
    TooLarge { size: u64, max: u64 },
}

/// Human-readable byte count: `0 B`, `512 B`, `1.5 KB`, `25.0 MB`, `120 MB`.
pub fn humanize_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if value >= 100.0 {
        format!("{:.0} {}", value, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

fn human(bytes: &u64) -> String {
    humanize_bytes(*bytes)
}

/// MIME type implied by a file extension, or `application/octet-stream`.
pub fn mime_for_path(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|f| f.to_mime_type())
        .unwrap_or(UNKNOWN_MIME)
}

fn check_size(size: u64) -> Result<(), InputError> {
    if size > MAX_INPUT_BYTES {
        return Err(InputError::TooLarge {
            size,
            max: MAX_INPUT_BYTES,
        });
    }
    Ok(())
}

fn check_mime(mime: &str) -> Result<(), InputError> {
    if !mime.starts_with("image/") {
        return Err(InputError::UnsupportedType {
            mime: mime.to_string(),
        });
    }
    Ok(())
}

/// A validated source image, not yet decoded.
#[derive(Debug, Clone)]
pub struct SourceInput {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl SourceInput {
    /// Validate and wrap in-memory bytes with a declared MIME type.
    pub fn from_bytes(
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, InputError> {
        let mime = mime.into();
        check_mime(&mime)?;
        check_size(bytes.len() as u64)?;
        Ok(Self {
            name: name.into(),
            mime,
            bytes,
        })
    }

    /// Validate a file, then read it.
    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        let mime = mime_for_path(path);
        check_mime(mime)?;
        check_size(std::fs::metadata(path)?.len())?;

        let bytes = std::fs::read(path)?;
        // The file may have grown between the metadata check and the read.
        check_size(bytes.len() as u64)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            mime: mime.to_string(),
            bytes,
        })
    }

    /// Format implied by the declared type; the decode fallback.
    pub fn format_hint(&self) -> Option<ImageFormat> {
        ImageFormat::from_mime_type(&self.mime)
    }

    /// Formats that may carry several frames, of which only the first is used.
    pub fn may_be_animated(&self) -> bool {
        self.mime == "image/gif"
    }
}
