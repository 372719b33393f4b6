// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay document import and export.
//!
//! Overlays are normally JSON. YAML is accepted as well and chosen by file
//! extension, mirroring how documents are written back out.

use crate::models::{DecodeError, OverlayDocument};
use anyhow::{Context, Result};
use std::path::Path;

/// Supported overlay file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayFormat {
    Json,
    Yaml,
}

impl OverlayFormat {
    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, DecodeError> {
        let extension = path.extension().and_then(|s| s.to_str());
        match extension.map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            _ => Err(DecodeError::UnsupportedFormat(format!("{:?}", extension))),
        }
    }
}

/// Decode an overlay from raw bytes in the given format.
pub fn decode_overlay(bytes: &[u8], format: OverlayFormat) -> Result<OverlayDocument, DecodeError> {
    match format {
        OverlayFormat::Json => OverlayDocument::from_json_slice(bytes),
        OverlayFormat::Yaml => OverlayDocument::from_yaml_slice(bytes),
    }
}

/// Import an overlay file. Nothing is returned unless the whole document
/// decodes.
pub fn import_overlay(path: &Path) -> Result<OverlayDocument, DecodeError> {
    let format = OverlayFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    decode_overlay(&bytes, format)
}

/// Export an overlay to JSON format.
pub fn export_json(doc: &OverlayDocument, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(doc)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Export an overlay to YAML format.
pub fn export_yaml(doc: &OverlayDocument, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(doc)?;
    std::fs::write(path, yaml).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Export an overlay in the format implied by the path's extension.
pub fn export_overlay(doc: &OverlayDocument, path: &Path) -> Result<()> {
    match OverlayFormat::from_path(path)? {
        OverlayFormat::Json => export_json(doc, path),
        OverlayFormat::Yaml => export_yaml(doc, path),
    }
}
