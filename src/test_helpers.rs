//! Shared test utilities: synthetic images and recording collaborators.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let bytes = encode_as(&gradient(64, 64), ImageFormat::Png);
//! let input = SourceInput::from_bytes("icon.png", "image/png", bytes).unwrap();
//! ```

use crate::archive::{ArchiveError, ArchiveLayout, ArchiveWriter};
use crate::generate::{RunSummary, Telemetry, TelemetryError};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use std::sync::Mutex;

// =========================================================================
// Synthetic images
// =========================================================================

/// Opaque RGB gradient so crops and letterboxes are distinguishable.
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}

/// Encode an image in the given format.
pub fn encode_as(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, format).unwrap();
    out.into_inner()
}

// =========================================================================
// Recording collaborators
// =========================================================================

/// Archive writer that keeps the last layout and returns a fixed blob.
#[derive(Default)]
pub struct RecordingArchiver {
    pub layouts: Mutex<Vec<ArchiveLayout>>,
    pub fail: bool,
}

impl RecordingArchiver {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn last_layout(&self) -> ArchiveLayout {
        self.layouts
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("archiver was never called")
    }
}

impl ArchiveWriter for RecordingArchiver {
    fn write(&self, layout: &ArchiveLayout) -> Result<Vec<u8>, ArchiveError> {
        self.layouts.lock().unwrap().push(layout.clone());
        if self.fail {
            return Err(ArchiveError::Write("recording archiver told to fail".into()));
        }
        Ok(b"ZIP".to_vec())
    }
}

/// Telemetry sink that records every notification.
#[derive(Default)]
pub struct RecordingTelemetry {
    pub successes: Mutex<Vec<RunSummary>>,
    pub failures: Mutex<Vec<RunSummary>>,
    pub fail: bool,
}

impl Telemetry for RecordingTelemetry {
    fn success(&self, summary: &RunSummary) -> Result<(), TelemetryError> {
        self.successes.lock().unwrap().push(summary.clone());
        if self.fail {
            return Err(TelemetryError("blocked".into()));
        }
        Ok(())
    }

    fn failure(&self, summary: &RunSummary) -> Result<(), TelemetryError> {
        self.failures.lock().unwrap().push(summary.clone());
        if self.fail {
            return Err(TelemetryError("blocked".into()));
        }
        Ok(())
    }
}
