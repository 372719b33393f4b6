// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Viewer configuration.
//!
//! Read from `$TRACKLAY_CONFIG`, or `tracklay.yaml` in the working
//! directory. Every field is optional.

use crate::playback::DetectionSettings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV_VAR: &str = "TRACKLAY_CONFIG";

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tracklay.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Milliseconds between pose detection passes
    pub detection_interval_ms: u64,
    /// Joints at or below this confidence are treated as missing
    pub min_joint_confidence: f32,
    pub show_markers: bool,
    pub show_skeleton: bool,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            detection_interval_ms: 200,
            min_joint_confidence: crate::models::pose::DEFAULT_MIN_CONFIDENCE,
            show_markers: true,
            show_skeleton: true,
            window_width: 1280.0,
            window_height: 720.0,
        }
    }
}

impl ViewerConfig {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Load from the usual locations, falling back to defaults when no
    /// file exists or it cannot be read.
    pub fn discover() -> Self {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_or_default(&path)
    }

    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn detection_settings(&self) -> DetectionSettings {
        DetectionSettings {
            interval: Duration::from_millis(self.detection_interval_ms.max(1)),
            min_confidence: self.min_joint_confidence,
        }
    }
}
