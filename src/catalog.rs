//! Built-in icon definition catalog.
//!
//! The catalog is plain static data: one row per (idiom, logical size) with
//! the scale factors an asset catalog expects for that slot. Row order is the
//! order targets are generated in, and therefore the order of `Contents.json`.
//!
//! ```text
//! iphone         20 29 40 60              @2x @3x
//! ipad           20 29 40 76              @1x @2x
//! ipad           83.5                     @2x
//! ios-marketing  1024                     @1x
//! mac            16 32 128 256 512        @1x @2x
//! watch          48 55 86 98              @2x
//! tv             400x240 1280x768         @1x
//! vision         16 32 64 128 256 512     @1x @2x
//! vision         1024                     @1x
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform/device category tag as written in `Contents.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Idiom {
    #[serde(rename = "iphone")]
    Iphone,
    #[serde(rename = "ipad")]
    Ipad,
    /// App Store icon. Not selectable on its own; see
    /// [`PlatformSelection::marketing`](crate::targets::PlatformSelection::marketing).
    #[serde(rename = "ios-marketing")]
    IosMarketing,
    #[serde(rename = "mac")]
    Mac,
    #[serde(rename = "watch")]
    Watch,
    #[serde(rename = "tv")]
    Tv,
    #[serde(rename = "vision")]
    Vision,
}

impl Idiom {
    pub fn as_str(self) -> &'static str {
        match self {
            Idiom::Iphone => "iphone",
            Idiom::Ipad => "ipad",
            Idiom::IosMarketing => "ios-marketing",
            Idiom::Mac => "mac",
            Idiom::Watch => "watch",
            Idiom::Tv => "tv",
            Idiom::Vision => "vision",
        }
    }
}

impl fmt::Display for Idiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nominal point size of an icon slot.
///
/// `label` is the literal catalog string (`"83.5x83.5"`) and is never
/// reformatted; it appears verbatim in filenames and the manifest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogicalSize {
    pub label: &'static str,
    pub width: f64,
    pub height: f64,
}

impl LogicalSize {
    const fn square(label: &'static str, points: f64) -> Self {
        Self {
            label,
            width: points,
            height: points,
        }
    }

    const fn rect(label: &'static str, width: f64, height: f64) -> Self {
        Self {
            label,
            width,
            height,
        }
    }
}

/// One catalog row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconDefinition {
    pub idiom: Idiom,
    pub size: LogicalSize,
    /// Integer scale factors, no duplicates.
    pub scales: &'static [u32],
}

const fn def(idiom: Idiom, size: LogicalSize, scales: &'static [u32]) -> IconDefinition {
    IconDefinition {
        idiom,
        size,
        scales,
    }
}

const X1: &[u32] = &[1];
const X2: &[u32] = &[2];
const X1_X2: &[u32] = &[1, 2];
const X2_X3: &[u32] = &[2, 3];

/// The icon catalog, in generation order.
pub static ICON_DEFINITIONS: &[IconDefinition] = &[
    // iPhone
    def(Idiom::Iphone, LogicalSize::square("20x20", 20.0), X2_X3),
    def(Idiom::Iphone, LogicalSize::square("29x29", 29.0), X2_X3),
    def(Idiom::Iphone, LogicalSize::square("40x40", 40.0), X2_X3),
    def(Idiom::Iphone, LogicalSize::square("60x60", 60.0), X2_X3),
    // iPad
    def(Idiom::Ipad, LogicalSize::square("20x20", 20.0), X1_X2),
    def(Idiom::Ipad, LogicalSize::square("29x29", 29.0), X1_X2),
    def(Idiom::Ipad, LogicalSize::square("40x40", 40.0), X1_X2),
    def(Idiom::Ipad, LogicalSize::square("76x76", 76.0), X1_X2),
    def(Idiom::Ipad, LogicalSize::square("83.5x83.5", 83.5), X2),
    // App Store
    def(Idiom::IosMarketing, LogicalSize::square("1024x1024", 1024.0), X1),
    // macOS
    def(Idiom::Mac, LogicalSize::square("16x16", 16.0), X1_X2),
    def(Idiom::Mac, LogicalSize::square("32x32", 32.0), X1_X2),
    def(Idiom::Mac, LogicalSize::square("128x128", 128.0), X1_X2),
    def(Idiom::Mac, LogicalSize::square("256x256", 256.0), X1_X2),
    def(Idiom::Mac, LogicalSize::square("512x512", 512.0), X1_X2),
    // watchOS
    def(Idiom::Watch, LogicalSize::square("48x48", 48.0), X2),
    def(Idiom::Watch, LogicalSize::square("55x55", 55.0), X2),
    def(Idiom::Watch, LogicalSize::square("86x86", 86.0), X2),
    def(Idiom::Watch, LogicalSize::square("98x98", 98.0), X2),
    // tvOS
    def(Idiom::Tv, LogicalSize::rect("400x240", 400.0, 240.0), X1),
    def(Idiom::Tv, LogicalSize::rect("1280x768", 1280.0, 768.0), X1),
    // visionOS
    def(Idiom::Vision, LogicalSize::square("16x16", 16.0), X1_X2),
    def(Idiom::Vision, LogicalSize::square("32x32", 32.0), X1_X2),
    def(Idiom::Vision, LogicalSize::square("64x64", 64.0), X1_X2),
    def(Idiom::Vision, LogicalSize::square("128x128", 128.0), X1_X2),
    def(Idiom::Vision, LogicalSize::square("256x256", 256.0), X1_X2),
    def(Idiom::Vision, LogicalSize::square("512x512", 512.0), X1_X2),
    def(Idiom::Vision, LogicalSize::square("1024x1024", 1024.0), X1),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn parse_label(label: &str) -> (f64, f64) {
        let (w, h) = label.split_once('x').unwrap();
        (w.parse().unwrap(), h.parse().unwrap())
    }

    #[test]
    fn labels_match_numeric_dimensions() {
        for d in ICON_DEFINITIONS {
            assert_eq!(
                parse_label(d.size.label),
                (d.size.width, d.size.height),
                "label mismatch for {} {}",
                d.idiom,
                d.size.label
            );
        }
    }

    #[test]
    fn sizes_unique_per_idiom() {
        let mut seen = HashSet::new();
        for d in ICON_DEFINITIONS {
            assert!(
                seen.insert((d.idiom, d.size.label)),
                "duplicate {} {}",
                d.idiom,
                d.size.label
            );
        }
    }

    #[test]
    fn scale_lists_have_no_duplicates_and_are_positive() {
        for d in ICON_DEFINITIONS {
            let unique: HashSet<_> = d.scales.iter().collect();
            assert_eq!(unique.len(), d.scales.len());
            assert!(d.scales.iter().all(|&s| s >= 1));
        }
    }

    #[test]
    fn idiom_serializes_as_catalog_tag() {
        assert_eq!(
            serde_json::to_string(&Idiom::IosMarketing).unwrap(),
            "\"ios-marketing\""
        );
        assert_eq!(Idiom::Vision.to_string(), "vision");
    }

    #[test]
    fn catalog_row_count() {
        assert_eq!(ICON_DEFINITIONS.len(), 28);
    }
}
