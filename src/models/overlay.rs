// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tracking overlay document.
//!
//! An overlay describes a player roster and time-stamped, normalized
//! position tracks that are drawn over a video. Documents are immutable:
//! editing a player produces a new document that shares the tracks and
//! events of the old one.

use super::color::Rgb;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while decoding an overlay document.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid overlay JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid overlay YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("player id {0} appears more than once in the roster")]
    DuplicatePlayer(i64),
    #[error("unsupported overlay format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to read overlay: {0}")]
    Io(#[from] std::io::Error),
}

/// A roster entry. `id` is the join key to [`Track::id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDef {
    pub id: i64,
    /// Hex color such as `"#ff0000"`; may be absent or malformed.
    pub color: Option<String>,
    pub label: Option<String>,
}

/// A single timestamped position, normalized to the frame (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Seconds relative to the start of playback.
    pub t: f64,
    pub x: f64,
    pub y: f64,
}

/// One entity's position samples. Points are not guaranteed to be sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: i64,
    pub points: Vec<TrackPoint>,
}

/// A discrete, informational event. Not drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub t: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub player_id: Option<i64>,
    pub note: Option<String>,
}

/// A single edit to a roster entry.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEdit {
    Label(String),
    Color(Rgb),
}

/// A parsed overlay file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayDocument {
    /// Nominal source frame rate. Advisory only.
    pub fps: f64,
    pub players: Arc<Vec<PlayerDef>>,
    pub tracks: Arc<Vec<Track>>,
    pub events: Option<Arc<Vec<Event>>>,
}

impl OverlayDocument {
    /// Decode an overlay from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let doc: Self = serde_json::from_slice(bytes)?;
        doc.validated()
    }

    /// Decode an overlay from YAML bytes. Invalid UTF-8 is an error.
    pub fn from_yaml_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let doc: Self = serde_yaml::from_slice(bytes)?;
        doc.validated()
    }

    /// Decode an overlay from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DecodeError> {
        let doc: Self = serde_yaml::from_str(yaml)?;
        doc.validated()
    }

    fn validated(self) -> Result<Self, DecodeError> {
        let mut seen = HashSet::with_capacity(self.players.len());
        for player in self.players.iter() {
            if !seen.insert(player.id) {
                return Err(DecodeError::DuplicatePlayer(player.id));
            }
        }
        Ok(self)
    }

    /// Return a new document with one roster entry edited, or `None` if
    /// `index` is out of range. Tracks and events are shared with `self`.
    pub fn apply_edit(&self, index: usize, edit: PlayerEdit) -> Option<Self> {
        let current = self.players.get(index)?;
        let replacement = match edit {
            PlayerEdit::Label(label) => PlayerDef {
                label: Some(label),
                ..current.clone()
            },
            PlayerEdit::Color(color) => PlayerDef {
                color: Some(color.to_hex()),
                ..current.clone()
            },
        };

        let mut players = self.players.as_ref().clone();
        players[index] = replacement;

        Some(Self {
            fps: self.fps,
            players: Arc::new(players),
            tracks: Arc::clone(&self.tracks),
            events: self.events.clone(),
        })
    }

    /// Shorthand for [`PlayerEdit::Label`].
    pub fn with_player_label(&self, index: usize, label: impl Into<String>) -> Option<Self> {
        self.apply_edit(index, PlayerEdit::Label(label.into()))
    }

    /// Shorthand for [`PlayerEdit::Color`].
    pub fn with_player_color(&self, index: usize, color: Rgb) -> Option<Self> {
        self.apply_edit(index, PlayerEdit::Color(color))
    }

    /// Latest timestamp across all tracks and events, or 0 when empty.
    pub fn duration(&self) -> f64 {
        let track_times = self.tracks.iter().flat_map(|t| t.points.iter().map(|p| p.t));
        let event_times = self.events.iter().flat_map(|e| e.iter().map(|e| e.t));
        track_times
            .chain(event_times)
            .filter(|t| t.is_finite())
            .fold(0.0, f64::max)
    }

    pub fn event_count(&self) -> usize {
        self.events.as_ref().map_or(0, |e| e.len())
    }

    /// One-line description for the metadata panel.
    pub fn summary(&self) -> String {
        format!(
            "FPS: {}, Players: {}, Tracks: {}, Events: {}",
            self.fps,
            self.players.len(),
            self.tracks.len(),
            self.event_count()
        )
    }
}
