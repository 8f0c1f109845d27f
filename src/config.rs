//! Configuration module.
//!
//! Handles loading, validating, and merging `assetic.toml`. Stock defaults are
//! the base layer; a user file overrides only the keys it names, and command
//! line flags override both.
//!
//! ## Config File Location
//!
//! `assetic.toml` is read from the current directory unless `--config <PATH>`
//! names another file. A missing file in the current directory is not an
//! error; a missing file named with `--config` is.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! output = "AppIcon.appiconset.zip"  # Where the archive is written
//! fit = "cover"                      # cover | contain
//!
//! [platforms]
//! iphone = true
//! ipad = true
//! mac = true
//! watch = false
//! tv = false
//! vision = false
//!
//! [vision_stack]
//! enabled = false                    # Needs platforms.vision as well
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. To add Apple Watch icons to the default set:
//!
//! ```toml
//! [platforms]
//! watch = true
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::generate::DEFAULT_ARCHIVE_NAME;
use crate::imaging::FitMode;
use crate::targets::PlatformSelection;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILENAME: &str = "assetic.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `assetic.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Archive path, relative to the working directory.
    pub output: String,
    /// How the source is fitted into each icon canvas.
    pub fit: FitMode,
    /// Platforms to generate icons for.
    pub platforms: PlatformSelection,
    /// visionOS solid image stack.
    pub vision_stack: VisionStackConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output: DEFAULT_ARCHIVE_NAME.to_string(),
            fit: FitMode::Cover,
            platforms: PlatformSelection {
                iphone: true,
                ipad: true,
                mac: true,
                ..PlatformSelection::default()
            },
            vision_stack: VisionStackConfig::default(),
        }
    }
}

impl AppConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.trim().is_empty() {
            return Err(ConfigError::Validation("output must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisionStackConfig {
    pub enabled: bool,
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AppConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist, `Err` if it exists but
/// can't be read or parsed.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `assetic.toml` from `dir`, falling back to stock defaults.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    let overlay = load_raw_config(&dir.join(CONFIG_FILENAME))?;
    resolve_config(stock_defaults_value(), overlay)
}

/// Load an explicitly named config file. The file must exist.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// Returns a fully-commented stock `assetic.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Assetic Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# assetic reads ./assetic.toml, or the file given with --config.
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# Where the generated archive is written.
output = "AppIcon.appiconset.zip"

# How the source image is fitted into each icon:
#   cover   - scale to fill, cropping the overflow (centered)
#   contain - scale to fit, leaving transparent margins
fit = "cover"

# ---------------------------------------------------------------------------
# Platforms
# ---------------------------------------------------------------------------
# The App Store marketing icon (1024x1024) is added automatically whenever
# iphone, ipad, mac or vision is enabled.
[platforms]
iphone = true
ipad = true
mac = true
watch = false
tv = false
vision = false

# ---------------------------------------------------------------------------
# visionOS solid image stack
# ---------------------------------------------------------------------------
# Adds AppIcon.solidimagestack/ with three depth layers at 1x and 2x.
# Only takes effect when platforms.vision is enabled. Best effort: a failure
# here never fails the run.
[vision_stack]
enabled = false
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::Platform;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_config_selects_apple_core_platforms() {
        let config = AppConfig::default();
        assert_eq!(
            config.platforms.enabled(),
            vec![Platform::Iphone, Platform::Ipad, Platform::Mac]
        );
        assert_eq!(config.fit, FitMode::Cover);
        assert_eq!(config.output, "AppIcon.appiconset.zip");
        assert!(!config.vision_stack.enabled);
    }

    #[test]
    fn parse_partial_config() {
        let config: AppConfig = toml::from_str(
            r#"
fit = "contain"
"#,
        )
        .unwrap();
        assert_eq!(config.fit, FitMode::Contain);
        // Unspecified values should be defaults
        assert!(config.platforms.iphone);
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn load_config_merges_platforms_over_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[platforms]
watch = true
mac = false
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(
            config.platforms.enabled(),
            vec![Platform::Iphone, Platform::Ipad, Platform::Watch]
        );
    }

    #[test]
    fn load_config_full_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
output = "build/icons.zip"
fit = "contain"

[platforms]
iphone = false
ipad = false
mac = false
watch = false
tv = true
vision = true

[vision_stack]
enabled = true
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.output, "build/icons.zip");
        assert_eq!(config.fit, FitMode::Contain);
        assert_eq!(
            config.platforms.enabled(),
            vec![Platform::Tv, Platform::Vision]
        );
        assert!(config.vision_stack.enabled);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_file_requires_existing_file() {
        let tmp = TempDir::new().unwrap();
        let result = load_config_file(&tmp.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_file_reads_named_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("icons.toml");
        fs::write(&path, "output = \"x.zip\"\n").unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.output, "x.zip");
        assert!(config.platforms.ipad);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"fit = "cover""#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"fit = "contain""#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("fit").unwrap().as_str(), Some("contain"));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[platforms]
iphone = true
watch = false
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[platforms]
watch = true
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let platforms = merged.get("platforms").unwrap();
        assert_eq!(platforms.get("watch").unwrap().as_bool(), Some(true));
        // iphone preserved from base
        assert_eq!(platforms.get("iphone").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value = toml::from_str(
            r#"
a = 1
b = 2
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(r#"a = 10"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(10));
        assert_eq!(merged.get("b").unwrap().as_integer(), Some(2));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<AppConfig, _> = toml::from_str(r#"outptu = "a.zip""#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_platform_rejected() {
        let toml_str = r#"
[platforms]
android = true
"#;
        let result: Result<AppConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_fit_mode_rejected() {
        let result: Result<AppConfig, _> = toml::from_str(r#"fit = "stretch""#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[vision_stack]
enable = true
"#,
        )
        .unwrap();

        assert!(load_config(tmp.path()).is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_empty_output() {
        let config = AppConfig {
            output: "  ".into(),
            ..AppConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("output"));
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let overlay: toml::Value = toml::from_str(r#"output = """#).unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // stock_config_toml / stock_defaults_value tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: AppConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        assert!(content.contains("[platforms]"));
        assert!(content.contains("[vision_stack]"));
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.is_table());
        assert_eq!(val.get("fit").unwrap().as_str(), Some("cover"));
        assert!(val.get("platforms").is_some());
        assert!(val.get("vision_stack").is_some());
    }
}
