// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-track marker styling from the player roster.

use crate::models::{PlayerDef, Rgb};

/// Marker color used when a track has no usable roster color.
pub const DEFAULT_MARKER_COLOR: Rgb = Rgb::RED;

/// Resolved appearance of a track's marker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackStyle {
    pub color: Rgb,
    pub label: String,
}

/// Look up the color and label for `track_id`.
///
/// The first roster entry with a matching id is used. An absent or
/// malformed color falls back to [`DEFAULT_MARKER_COLOR`]; an absent label
/// (or no matching entry) falls back to the id in decimal.
pub fn resolve_style(players: &[PlayerDef], track_id: i64) -> TrackStyle {
    match players.iter().find(|p| p.id == track_id) {
        Some(player) => TrackStyle {
            color: player
                .color
                .as_deref()
                .and_then(Rgb::from_hex)
                .unwrap_or(DEFAULT_MARKER_COLOR),
            label: player
                .label
                .clone()
                .unwrap_or_else(|| player.id.to_string()),
        },
        None => TrackStyle {
            color: DEFAULT_MARKER_COLOR,
            label: track_id.to_string(),
        },
    }
}
