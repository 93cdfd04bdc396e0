//! Resizer configuration.
//!
//! Handles loading, validating, and merging a `downscale.toml` file on top of
//! the stock defaults. Every key is optional; a file only needs the values it
//! wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! output_dir = "scaled"     # Where scaled_<name> files are written
//! quality = 100             # JPEG quality (0-100) when no --quality is given
//! filter = "nearest"        # Resampling filter: nearest | triangle
//!
//! [output]
//! naming = "overwrite"      # overwrite | content-hash
//! atomic = false            # Write to a temp file, then rename
//!
//! [metadata]
//! copy = true               # Copy EXIF tags onto the scaled file
//! on_failure = "fail"       # fail | warn
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::ResampleFilter;
use crate::metadata::MetadataFailure;
use crate::naming::NamingPolicy;
use crate::writer::WriteOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Resizer configuration loaded from TOML.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizerConfig {
    /// Directory receiving scaled files. Relative paths resolve against the
    /// working directory.
    pub output_dir: PathBuf,
    /// Default JPEG quality (0-100).
    pub quality: u32,
    /// Resampling filter.
    pub filter: ResampleFilter,
    /// Destination naming and write mode.
    pub output: OutputConfig,
    /// Metadata carry-over.
    pub metadata: MetadataConfig,
}

impl Default for ResizerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("scaled"),
            quality: 100,
            filter: ResampleFilter::default(),
            output: OutputConfig::default(),
            metadata: MetadataConfig::default(),
        }
    }
}

impl ResizerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quality > 100 {
            return Err(ConfigError::Validation("quality must be 0-100".into()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output_dir must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            naming: self.output.naming,
            atomic: self.output.atomic,
        }
    }
}

/// Destination naming and write mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub naming: NamingPolicy,
    /// Temp file + rename instead of writing the destination in place.
    pub atomic: bool,
}

/// Metadata carry-over settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataConfig {
    pub copy: bool,
    pub on_failure: MetadataFailure,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            copy: true,
            on_failure: MetadataFailure::default(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ResizerConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
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

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ResizerConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ResizerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the resizer config.
///
/// `None` yields the validated stock defaults. An explicit path must exist.
pub fn load_config(path: Option<&Path>) -> Result<ResizerConfig, ConfigError> {
    let overlay = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Some(toml::from_str::<toml::Value>(&content)?)
        }
        None => None,
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# downscale configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Directory that receives scaled_<name> files. Must exist before a resize;
# the CLI creates it on demand.
output_dir = "scaled"

# JPEG quality (0 = worst, 100 = best) used when --quality is not given.
# Ignored for images with transparency, which are always written as PNG.
quality = 100

# Resampling filter: "nearest" (plain pixel scaling) or "triangle" (bilinear).
filter = "nearest"

# ---------------------------------------------------------------------------
# Output files
# ---------------------------------------------------------------------------
[output]
# "overwrite":    scaled_<name>; sources sharing a basename share a destination.
# "content-hash": scaled_<digest>_<name>; digest of the encoded bytes.
naming = "overwrite"

# Write to a temporary file in output_dir and rename it into place.
atomic = false

# ---------------------------------------------------------------------------
# Metadata
# ---------------------------------------------------------------------------
[metadata]
# Copy EXIF tags (orientation, camera, timestamps) onto the scaled file.
copy = true

# When copying fails: "fail" aborts the resize, "warn" logs and continues.
on_failure = "fail"
"##
}
