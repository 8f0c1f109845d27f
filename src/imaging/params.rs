//! Parameter types for image operations.
//!
//! These structs describe *what* to draw, not *how*. The pure geometry in
//! [`calculations`](super::calculations) produces them; the
//! [`backend`](super::backend) executes them.
//!
//! ## Types
//!
//! - [`FitMode`] — `cover` (center-crop to fill) or `contain` (letterbox to fit).
//! - [`Rect`] — integer rectangle in source or canvas pixel space.
//! - [`DrawParams`] — one draw: source rect → destination rect on a
//!   transparent canvas, with optional blur.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Image fit policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale to fill the target, center-crop the overflow.
    #[default]
    Cover,
    /// Scale to fit inside the target, transparent border.
    Contain,
}

impl FitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FitMode::Cover => "cover",
            FitMode::Contain => "contain",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integer rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin.
    pub fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }
}

/// A single draw: crop `src` out of the source, scale it into `dst` on a
/// fully transparent `canvas_width × canvas_height` canvas, then blur the
/// whole canvas when `blur` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParams {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub src: Rect,
    pub dst: Rect,
    /// Gaussian sigma in pixels. `None` skips the blur pass entirely.
    pub blur: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_mode_defaults_to_cover() {
        assert_eq!(FitMode::default(), FitMode::Cover);
    }

    #[test]
    fn fit_mode_parses_lowercase_names() {
        use clap::ValueEnum;
        assert_eq!(FitMode::from_str("cover", false).unwrap(), FitMode::Cover);
        assert_eq!(FitMode::from_str("contain", false).unwrap(), FitMode::Contain);
        assert!(FitMode::from_str("stretch", false).is_err());
    }

    #[test]
    fn fit_mode_serde_matches_display() {
        let json = serde_json::to_string(&FitMode::Contain).unwrap();
        assert_eq!(json, "\"contain\"");
        assert_eq!(FitMode::Contain.to_string(), "contain");
    }
}
