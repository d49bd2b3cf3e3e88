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

//! Controller configuration and its RON loader.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading an [`OptimizerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configuration text is not valid RON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// The configuration parsed but holds inconsistent values.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables for the quality controller.
///
/// Every field has a default, so a configuration file only needs to name
/// the values it overrides:
///
/// ```ron
/// (
///     memory_budget_mb: 256.0,
///     tick_interval_ms: 1000,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Period of the adjustment step.
    pub tick_interval_ms: u64,
    /// Period of the memory sampling step.
    pub memory_interval_ms: u64,
    /// Memory usage above which the controller degrades to the floor.
    pub memory_budget_mb: f32,
    /// Fraction of the budget that must be free before upgrading.
    pub upgrade_memory_ratio: f32,
    /// Smoothed fps below which the controller degrades to the floor.
    pub severe_fps: f32,
    /// Smoothed fps below which texture quality steps down one tier.
    pub moderate_fps: f32,
    /// Smoothed fps at or above which an upgrade may happen.
    pub upgrade_fps: f32,
    /// Frame samples required before fps-based decisions are made.
    pub min_frame_samples: usize,
    /// Whether periodic adjustment runs at all.
    pub adaptive: bool,
    /// Draw calls per frame above which diagnostics raise a recommendation.
    pub draw_call_warning: u32,
    /// Triangles per frame above which diagnostics raise a recommendation.
    pub triangle_warning: u64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2000,
            memory_interval_ms: 1000,
            memory_budget_mb: 100.0,
            upgrade_memory_ratio: 0.7,
            severe_fps: 30.0,
            moderate_fps: 45.0,
            upgrade_fps: 60.0,
            min_frame_samples: 10,
            adaptive: true,
            draw_call_warning: 1000,
            triangle_warning: 1_000_000,
        }
    }
}

impl OptimizerConfig {
    /// Memory usage below which an upgrade is allowed.
    pub fn upgrade_memory_mb(&self) -> f32 {
        self.memory_budget_mb * self.upgrade_memory_ratio
    }

    /// Parses a configuration from RON text and validates it.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: OptimizerConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a RON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&text)?;
        log::debug!("Loaded optimizer config from '{}'.", path.display());
        Ok(config)
    }

    /// Checks that intervals are non-zero and thresholds are ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 || self.memory_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick and memory intervals must be non-zero".into(),
            ));
        }
        if !(self.memory_budget_mb > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "memory_budget_mb must be positive, got {}",
                self.memory_budget_mb
            )));
        }
        if !(self.upgrade_memory_ratio > 0.0 && self.upgrade_memory_ratio <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "upgrade_memory_ratio must be in (0, 1], got {}",
                self.upgrade_memory_ratio
            )));
        }
        if !(self.severe_fps < self.moderate_fps && self.moderate_fps <= self.upgrade_fps) {
            return Err(ConfigError::Invalid(format!(
                "fps thresholds must ascend (severe {} < moderate {} <= upgrade {})",
                self.severe_fps, self.moderate_fps, self.upgrade_fps
            )));
        }
        Ok(())
    }
}
