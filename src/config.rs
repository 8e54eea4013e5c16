//! Batch configuration.
//!
//! Handles loading and validating an optional `frame.toml`. Every key has a
//! default, so the file only needs the values it changes, and command-line
//! flags override whatever the file says.
//!
//! ## Config File Location
//!
//! By default the file is looked up in the input directory, next to the
//! photos it applies to. `--config` points at a file anywhere else.
//!
//! ```text
//! input/
//! ├── frame.toml           # optional
//! ├── beach.jpg
//! └── dog.png
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [frame]
//! aspect = "1:1"            # W:H or square / portrait / story / landscape
//! thickness = "5%"          # pixels ("60") or percent of the short side ("5%")
//! color = "white"           # CSS name, #hex, rgb(), hsl()
//! quality = 95              # JPEG quality (1-100)
//! label = "frame"           # photo.jpg -> photo-frame.jpg
//!
//! [processing]
//! max_workers = 4           # Max parallel workers (omit for auto, capped at 8)
//! on_error = "continue"     # or "abort"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::batch::ErrorPolicy;
use crate::imaging::{FrameSettings, Quality};
use crate::naming::is_valid_label;
use crate::params::{ParamError, Thickness, resolve_aspect_ratio, resolve_color};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the input directory.
pub const CONFIG_FILE_NAME: &str = "frame.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Param(#[from] ParamError),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Contents of `frame.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameConfig {
    /// How each image is framed.
    pub frame: FrameSection,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

/// Frame parameters as text, exactly as a user writes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameSection {
    pub aspect: String,
    pub thickness: String,
    pub color: String,
    pub quality: u32,
    pub label: String,
}

impl Default for FrameSection {
    fn default() -> Self {
        Self {
            aspect: "1:1".to_string(),
            thickness: "5%".to_string(),
            color: "white".to_string(),
            quality: 95,
            label: "frame".to_string(),
        }
    }
}

impl FrameSection {
    /// Parse every field into strict values.
    pub fn settings(&self) -> Result<FrameSettings, ConfigError> {
        let aspect = resolve_aspect_ratio(&self.aspect)?;
        let thickness = Thickness::parse(&self.thickness)?;
        let color = resolve_color(&self.color)?;
        if !(1..=100).contains(&self.quality) {
            return Err(ConfigError::Validation(format!(
                "quality must be 1-100, got {}",
                self.quality
            )));
        }
        if !is_valid_label(&self.label) {
            return Err(ConfigError::Validation(format!(
                "label must be non-empty without path separators or dots: {:?}",
                self.label
            )));
        }
        Ok(FrameSettings {
            aspect,
            thickness,
            color,
            quality: Quality::new(self.quality),
        })
    }

    /// Replace fields with any values given on the command line.
    pub fn apply(&mut self, overrides: &FrameOverrides) {
        if let Some(aspect) = &overrides.aspect {
            self.aspect = aspect.clone();
        }
        if let Some(thickness) = &overrides.thickness {
            self.thickness = thickness.clone();
        }
        if let Some(color) = &overrides.color {
            self.color = color.clone();
        }
        if let Some(quality) = overrides.quality {
            self.quality = quality;
        }
        if let Some(label) = &overrides.label {
            self.label = label.clone();
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOverrides {
    pub aspect: Option<String>,
    pub thickness: Option<String>,
    pub color: Option<String>,
    pub quality: Option<u32>,
    pub label: Option<String>,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent, uses the number of CPU cores, capped at 8.
    pub max_workers: Option<usize>,
    /// What happens to the batch when one file fails.
    pub on_error: ErrorPolicy,
}

impl FrameConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.frame.settings()?;
        if self.processing.max_workers == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_workers must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading
// =============================================================================

/// Load `frame.toml` from the given directory.
///
/// Returns the defaults if the file doesn't exist.
pub fn load_config(dir: &Path) -> Result<FrameConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(FrameConfig::default());
    }
    load_config_file(&config_path)
}

/// Load and validate a specific config file. The file must exist.
pub fn load_config_file(path: &Path) -> Result<FrameConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: FrameConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `frame.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Frame Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the input folder as frame.toml, or pass it with
# --config. Command-line flags override values set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Frame
# ---------------------------------------------------------------------------
[frame]
# Target aspect ratio of every output image.
# Either W:H (e.g. "4:5", "3:2") or a preset:
#   square = 1:1, portrait = 4:5, story = 9:16, landscape = 16:9
aspect = "1:1"

# Border added on all four sides, on top of the aspect padding.
# A plain number is pixels ("60"); a percentage is taken from each image's
# shorter side ("5%").
thickness = "5%"

# Border color: CSS name, #rgb, #rrggbb, rgb(...) or hsl(...).
color = "white"

# JPEG quality (1 = worst, 100 = best). PNG and WebP output is lossless.
quality = 95

# Inserted before the extension: photo.jpg -> photo-frame.jpg.
# Must not be empty.
label = "frame"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers.
# Omit or comment out to auto-detect (= number of CPU cores, at most 8).
# max_workers = 4

# What to do when one image fails to decode or encode:
#   "continue" - record it, frame the rest, exit non-zero at the end
#   "abort"    - stop starting new images and fail immediately
on_error = "continue"
"##
}
