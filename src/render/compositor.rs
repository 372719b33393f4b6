// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame compositor.
//!
//! Turns an overlay document and a playback time into an ordered list of
//! drawing primitives. The output depends only on the inputs, so the same
//! document, time and viewport always produce the same frame.

use super::palette::resolve_style;
use super::resolver::resolve;
use crate::models::{OverlayDocument, Point, Rgb};
use crate::util::Viewport;

/// Radius of a track marker, in device-independent pixels.
pub const MARKER_RADIUS: f64 = 10.0;

/// Font size of a marker label.
pub const LABEL_FONT_SIZE: f64 = 10.0;

/// Label text color.
pub const LABEL_COLOR: Rgb = Rgb::WHITE;

/// Something to draw, in pixel space. Primitives are painted in order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawPrimitive {
    Circle {
        center: Point,
        radius: f64,
        fill: Rgb,
    },
    Text {
        anchor: Point,
        text: String,
        size: f64,
        fill: Rgb,
    },
}

/// Composite every track at time `t`.
pub fn composite(doc: &OverlayDocument, t: f64, viewport: Viewport) -> Vec<DrawPrimitive> {
    let mut primitives = Vec::with_capacity(doc.tracks.len() * 2);
    composite_into(doc, t, viewport, &mut primitives);
    primitives
}

/// Like [`composite`], but reuses `out` (which is cleared first).
pub fn composite_into(doc: &OverlayDocument, t: f64, viewport: Viewport, out: &mut Vec<DrawPrimitive>) {
    out.clear();
    for track in doc.tracks.iter() {
        let Some(position) = resolve(track, t) else {
            continue;
        };
        let center = viewport.to_pixels(position);
        let style = resolve_style(&doc.players, track.id);

        out.push(DrawPrimitive::Circle {
            center,
            radius: MARKER_RADIUS,
            fill: style.color,
        });
        out.push(DrawPrimitive::Text {
            anchor: center,
            text: style.label,
            size: LABEL_FONT_SIZE,
            fill: LABEL_COLOR,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerDef, Track, TrackPoint};
    use std::sync::Arc;

    fn doc() -> OverlayDocument {
        OverlayDocument {
            fps: 25.0,
            players: Arc::new(vec![PlayerDef {
                id: 1,
                color: Some("#00ff00".to_string()),
                label: Some("Alice".to_string()),
            }]),
            tracks: Arc::new(vec![
                Track {
                    id: 1,
                    points: vec![
                        TrackPoint { t: 0.0, x: 0.5, y: 0.5 },
                        TrackPoint { t: 2.0, x: 0.1, y: 0.1 },
                    ],
                },
                Track { id: 42, points: vec![] },
                Track {
                    id: 99,
                    points: vec![TrackPoint { t: 1.0, x: 0.25, y: 0.75 }],
                },
            ]),
            events: None,
        }
    }

    #[test]
    fn test_composite_order_and_mapping() {
        let frame = composite(&doc(), 0.4, Viewport::new(200.0, 100.0));

        assert_eq!(
            frame,
            vec![
                DrawPrimitive::Circle {
                    center: Point::new(100.0, 50.0),
                    radius: MARKER_RADIUS,
                    fill: Rgb::GREEN,
                },
                DrawPrimitive::Text {
                    anchor: Point::new(100.0, 50.0),
                    text: "Alice".to_string(),
                    size: LABEL_FONT_SIZE,
                    fill: LABEL_COLOR,
                },
                DrawPrimitive::Circle {
                    center: Point::new(50.0, 75.0),
                    radius: MARKER_RADIUS,
                    fill: Rgb::RED,
                },
                DrawPrimitive::Text {
                    anchor: Point::new(50.0, 75.0),
                    text: "99".to_string(),
                    size: LABEL_FONT_SIZE,
                    fill: LABEL_COLOR,
                },
            ]
        );
    }

    #[test]
    fn test_composite_follows_time() {
        let frame = composite(&doc(), 1.6, Viewport::new(100.0, 100.0));
        assert!(matches!(
            frame[0],
            DrawPrimitive::Circle { center, .. } if center == Point::new(10.0, 10.0)
        ));
    }

    #[test]
    fn test_composite_is_deterministic() {
        let document = doc();
        let viewport = Viewport::new(640.0, 360.0);
        for t in [0.0, 0.7, 1.0, 5.0] {
            assert_eq!(composite(&document, t, viewport), composite(&document, t, viewport));
        }
    }

    #[test]
    fn test_composite_into_clears_buffer() {
        let mut buffer = composite(&doc(), 0.0, Viewport::new(10.0, 10.0));
        let empty = OverlayDocument {
            tracks: Arc::new(vec![]),
            ..doc()
        };
        composite_into(&empty, 0.0, Viewport::new(10.0, 10.0), &mut buffer);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_edited_label_shows_up() {
        let edited = doc().with_player_label(0, "Ali").unwrap();
        let frame = composite(&edited, 0.0, Viewport::new(10.0, 10.0));
        assert!(matches!(&frame[1], DrawPrimitive::Text { text, .. } if text == "Ali"));
    }
}
