// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Sketch configuration, loadable from JSON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors raised while loading or validating a [`SketchConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read sketch config '{}': {source}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// The JSON was malformed or had the wrong shape.
    #[error("failed to parse sketch config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of range.
    #[error("invalid sketch config: {0}")]
    Invalid(String),
}

/// Settings a sketch starts with.
///
/// Every field has a default, so a JSON document only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Window title, for windowed runners.
    pub title: String,
    /// Initial surface width.
    pub width: u32,
    /// Initial surface height.
    pub height: u32,
    /// Frames per second the driver aims for.
    pub target_frame_rate: f32,
    /// Deliver platform auto-repeat key presses.
    pub key_repeat: bool,
    /// Start in the looping state. When `false`, one frame is drawn after
    /// setup and the sketch then waits for `redraw()` or `loop()`.
    pub start_looping: bool,
    /// The surface is laid out by a parent and must not draw before its
    /// first size is known.
    pub parent_sized: bool,
    /// Maximum distance, in surface units, a pointer may travel between
    /// press and release for the release to count as a click.
    pub click_slop: f32,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            title: "easel".to_string(),
            width: 100,
            height: 100,
            target_frame_rate: 60.0,
            key_repeat: false,
            start_looping: true,
            parent_sized: false,
            click_slop: 8.0,
        }
    }
}

impl SketchConfig {
    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded sketch config from '{}'.", path.display());
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target_frame_rate.is_finite() && self.target_frame_rate > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "target_frame_rate must be positive, got {}",
                self.target_frame_rate
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "surface size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.click_slop.is_finite() && self.click_slop >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "click_slop must be non-negative, got {}",
                self.click_slop
            )));
        }
        Ok(())
    }
}
