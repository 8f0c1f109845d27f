//! `Contents.json` for `AppIcon.appiconset`.
//!
//! The document is consumed by asset-catalog tooling, so the shape is fixed:
//!
//! ```json
//! {
//!   "images": [
//!     {
//!       "idiom": "iphone",
//!       "size": "20x20",
//!       "filename": "AppIcon-20x20@2x.png",
//!       "scale": "2x"
//!     }
//!   ],
//!   "info": {
//!     "version": 1,
//!     "author": "xcode"
//!   }
//! }
//! ```
//!
//! Field order follows struct declaration order. Output is 2-space indented
//! with no trailing newline.

use crate::targets::TargetSpec;
use serde::{Deserialize, Serialize};

pub const MANIFEST_FILENAME: &str = "Contents.json";
pub const FORMAT_VERSION: u32 = 1;
pub const AUTHOR: &str = "xcode";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub idiom: String,
    pub size: String,
    pub filename: String,
    pub scale: String,
}

impl ManifestEntry {
    pub fn for_target(target: &TargetSpec) -> Self {
        Self {
            idiom: target.idiom.as_str().to_string(),
            size: target.size.label.to_string(),
            filename: target.filename(),
            scale: target.scale_label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestInfo {
    pub version: u32,
    pub author: String,
}

impl Default for ManifestInfo {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            author: AUTHOR.to_string(),
        }
    }
}

/// The complete `Contents.json` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contents {
    pub images: Vec<ManifestEntry>,
    pub info: ManifestInfo,
}

impl Contents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the entry for `target`. Call in processing order.
    pub fn push(&mut self, target: &TargetSpec) -> &ManifestEntry {
        self.images.push(ManifestEntry::for_target(target));
        &self.images[self.images.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ICON_DEFINITIONS;
    use crate::targets::{Platform, PlatformSelection, resolve_targets};

    fn contents_for(platforms: &[Platform]) -> Contents {
        let mut contents = Contents::new();
        for t in resolve_targets(ICON_DEFINITIONS, &PlatformSelection::only(platforms)) {
            contents.push(&t);
        }
        contents
    }

    #[test]
    fn exact_bytes_for_single_entry() {
        let targets = resolve_targets(ICON_DEFINITIONS, &PlatformSelection::only(&[Platform::Iphone]));
        let mut contents = Contents::new();
        contents.push(&targets[0]);

        let json = String::from_utf8(contents.to_json_bytes().unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{
  "images": [
    {
      "idiom": "iphone",
      "size": "20x20",
      "filename": "AppIcon-20x20@2x.png",
      "scale": "2x"
    }
  ],
  "info": {
    "version": 1,
    "author": "xcode"
  }
}"#
        );
    }

    #[test]
    fn empty_manifest_still_has_info() {
        let json = String::from_utf8(Contents::new().to_json_bytes().unwrap()).unwrap();
        assert_eq!(
            json,
            "{\n  \"images\": [],\n  \"info\": {\n    \"version\": 1,\n    \"author\": \"xcode\"\n  }\n}"
        );
    }

    #[test]
    fn entries_mirror_target_order() {
        let platforms = [Platform::Ipad, Platform::Watch];
        let targets = resolve_targets(ICON_DEFINITIONS, &PlatformSelection::only(&platforms));
        let contents = contents_for(&platforms);

        assert_eq!(contents.len(), targets.len());
        for (entry, target) in contents.images.iter().zip(&targets) {
            assert_eq!(entry.filename, target.filename());
            assert_eq!(entry.idiom, target.idiom.as_str());
        }
    }

    #[test]
    fn decimal_size_kept_verbatim() {
        let contents = contents_for(&[Platform::Ipad]);
        let entry = contents
            .images
            .iter()
            .find(|e| e.size == "83.5x83.5")
            .unwrap();
        assert_eq!(entry.filename, "AppIcon-83.5x83.5@2x.png");
        assert_eq!(entry.scale, "2x");
    }

    #[test]
    fn roundtrips_through_serde() {
        let contents = contents_for(&[Platform::Mac]);
        let bytes = contents.to_json_bytes().unwrap();
        let parsed: Contents = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, contents);
    }
}
