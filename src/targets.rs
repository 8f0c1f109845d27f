//! Target resolution: platform selection → ordered list of icon targets.
//!
//! A target is one (catalog row, scale) pair. Resolution is a pure function of
//! the catalog and the selection; no images are touched.

use crate::catalog::{IconDefinition, Idiom, LogicalSize};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User-selectable platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Iphone,
    Ipad,
    Mac,
    Watch,
    Tv,
    Vision,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Iphone,
        Platform::Ipad,
        Platform::Mac,
        Platform::Watch,
        Platform::Tv,
        Platform::Vision,
    ];

    /// Display name used in CLI output and telemetry.
    pub fn os_name(self) -> &'static str {
        match self {
            Platform::Iphone => "iOS",
            Platform::Ipad => "iPadOS",
            Platform::Mac => "macOS",
            Platform::Watch => "watchOS",
            Platform::Tv => "tvOS",
            Platform::Vision => "visionOS",
        }
    }
}

/// One flag per selectable platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformSelection {
    pub iphone: bool,
    pub ipad: bool,
    pub mac: bool,
    pub watch: bool,
    pub tv: bool,
    pub vision: bool,
}

impl PlatformSelection {
    /// Selection with exactly the given platforms enabled.
    pub fn only(platforms: &[Platform]) -> Self {
        let mut selection = Self::default();
        for &p in platforms {
            selection.set(p, true);
        }
        selection
    }

    pub fn set(&mut self, platform: Platform, enabled: bool) {
        match platform {
            Platform::Iphone => self.iphone = enabled,
            Platform::Ipad => self.ipad = enabled,
            Platform::Mac => self.mac = enabled,
            Platform::Watch => self.watch = enabled,
            Platform::Tv => self.tv = enabled,
            Platform::Vision => self.vision = enabled,
        }
    }

    pub fn is_enabled(&self, platform: Platform) -> bool {
        match platform {
            Platform::Iphone => self.iphone,
            Platform::Ipad => self.ipad,
            Platform::Mac => self.mac,
            Platform::Watch => self.watch,
            Platform::Tv => self.tv,
            Platform::Vision => self.vision,
        }
    }

    /// The App Store icon ships with any platform that has a store listing
    /// using the 1024pt marketing slot.
    pub fn marketing(&self) -> bool {
        self.iphone || self.ipad || self.mac || self.vision
    }

    pub fn includes(&self, idiom: Idiom) -> bool {
        match idiom {
            Idiom::Iphone => self.iphone,
            Idiom::Ipad => self.ipad,
            Idiom::IosMarketing => self.marketing(),
            Idiom::Mac => self.mac,
            Idiom::Watch => self.watch,
            Idiom::Tv => self.tv,
            Idiom::Vision => self.vision,
        }
    }

    pub fn enabled(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|&p| self.is_enabled(p))
            .collect()
    }
}

/// Pixel dimensions of a rendered image. Also the render cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn square(side: u32) -> Self {
        Self::new(side, side)
    }
}

impl fmt::Display for PixelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

/// Round a (possibly fractional) pixel dimension to the nearest integer, never below 1.
pub fn round_pixels(value: f64) -> u32 {
    value.round().max(1.0) as u32
}

/// One icon to generate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSpec {
    pub idiom: Idiom,
    pub size: LogicalSize,
    pub scale: u32,
}

impl TargetSpec {
    pub fn pixel_size(&self) -> PixelSize {
        PixelSize::new(
            round_pixels(self.size.width * self.scale as f64),
            round_pixels(self.size.height * self.scale as f64),
        )
    }

    /// `"2x"` style label used in the manifest and filename.
    pub fn scale_label(&self) -> String {
        format!("{}x", self.scale)
    }

    /// `AppIcon-{size}@{scale}.png`, with the size label unmodified.
    pub fn filename(&self) -> String {
        format!("AppIcon-{}@{}.png", self.size.label, self.scale_label())
    }
}

/// Expand the catalog into targets for the selected platforms.
///
/// Preserves catalog order, then scale order within each row. An empty
/// result is valid and means nothing was selected.
pub fn resolve_targets(
    catalog: &[IconDefinition],
    selection: &PlatformSelection,
) -> Vec<TargetSpec> {
    catalog
        .iter()
        .filter(|d| selection.includes(d.idiom))
        .flat_map(|d| {
            d.scales.iter().map(move |&scale| TargetSpec {
                idiom: d.idiom,
                size: d.size,
                scale,
            })
        })
        .collect()
}
