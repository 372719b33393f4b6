// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for the background frame and the tracking overlay.
//!
//! The canvas fits the background image (if any) into the available space,
//! then composites track markers and pose skeletons over it in that order.

use crate::models::{OverlayDocument, PersonPose, Rgb};
use crate::render::skeleton::{SKELETON_COLOR, SKELETON_LINE_WIDTH};
use crate::render::{composite_into, composite_skeleton, DrawPrimitive};
use crate::util::Viewport;

/// What to draw on top of the background this frame.
pub struct CanvasLayers<'a> {
    pub overlay: Option<&'a OverlayDocument>,
    pub time: f64,
    pub poses: &'a [PersonPose],
    pub show_markers: bool,
    pub show_skeleton: bool,
}

/// Display the canvas. `primitives` is a scratch buffer reused across frames.
pub fn show(
    ui: &mut egui::Ui,
    background: &Option<egui::TextureHandle>,
    background_size: Option<(u32, u32)>,
    layers: &CanvasLayers<'_>,
    primitives: &mut Vec<DrawPrimitive>,
) {
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);
    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);
        let available = ui.available_rect_before_wrap();
        let frame_rect = match background_size {
            Some((w, h)) if w > 0 && h > 0 => fit_rect(available, w as f32 / h as f32),
            _ => available,
        };
        ui.allocate_rect(available, egui::Sense::hover());

        let painter = ui.painter_at(available);
        if let Some(texture) = background {
            painter.image(
                texture.id(),
                frame_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        if layers.overlay.is_none() && layers.poses.is_empty() {
            painter.text(
                available.center(),
                egui::Align2::CENTER_CENTER,
                "File → Open Overlay... to load tracking data",
                egui::FontId::proportional(16.0),
                egui::Color32::from_gray(180),
            );
            return;
        }

        let viewport = Viewport::new(frame_rect.width() as f64, frame_rect.height() as f64);
        let origin = frame_rect.min.to_vec2();

        if layers.show_markers {
            if let Some(doc) = layers.overlay {
                composite_into(doc, layers.time, viewport, primitives);
                paint_primitives(&painter, primitives, origin);
            }
        }

        if layers.show_skeleton {
            let stroke = egui::Stroke::new(SKELETON_LINE_WIDTH as f32, color32(SKELETON_COLOR));
            for segment in composite_skeleton(layers.poses, viewport) {
                painter.line_segment(
                    [
                        egui::pos2(segment.from.x as f32, segment.from.y as f32) + origin,
                        egui::pos2(segment.to.x as f32, segment.to.y as f32) + origin,
                    ],
                    stroke,
                );
            }
        }
    });
}

/// Largest rect with the given aspect ratio centered in `outer`.
fn fit_rect(outer: egui::Rect, aspect: f32) -> egui::Rect {
    let outer_aspect = outer.width() / outer.height();
    let size = if aspect > outer_aspect {
        // Wider - fit to width
        egui::vec2(outer.width(), outer.width() / aspect)
    } else {
        egui::vec2(outer.height() * aspect, outer.height())
    };
    egui::Rect::from_center_size(outer.center(), size)
}

/// Paint primitives in order, offset by `origin`.
fn paint_primitives(painter: &egui::Painter, primitives: &[DrawPrimitive], origin: egui::Vec2) {
    for primitive in primitives {
        match primitive {
            DrawPrimitive::Circle { center, radius, fill } => {
                let pos = egui::pos2(center.x as f32, center.y as f32) + origin;
                painter.circle_filled(pos, *radius as f32, color32(*fill));
            }
            DrawPrimitive::Text { anchor, text, size, fill } => {
                let pos = egui::pos2(anchor.x as f32, anchor.y as f32) + origin;
                painter.text(
                    pos,
                    egui::Align2::CENTER_CENTER,
                    text,
                    egui::FontId::proportional(*size as f32),
                    color32(*fill),
                );
            }
        }
    }
}

pub fn color32(rgb: Rgb) -> egui::Color32 {
    let [r, g, b] = rgb.to_u8();
    egui::Color32::from_rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_rect_wide_image() {
        let outer = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(400.0, 400.0));
        let fitted = fit_rect(outer, 2.0);
        assert_eq!(fitted.size(), egui::vec2(400.0, 200.0));
        assert_eq!(fitted.min, egui::pos2(0.0, 100.0));
    }

    #[test]
    fn test_fit_rect_tall_image() {
        let outer = egui::Rect::from_min_size(egui::pos2(10.0, 0.0), egui::vec2(400.0, 200.0));
        let fitted = fit_rect(outer, 0.5);
        assert_eq!(fitted.size(), egui::vec2(100.0, 200.0));
        assert_eq!(fitted.center(), outer.center());
    }

    #[test]
    fn test_color32() {
        assert_eq!(color32(Rgb::RED), egui::Color32::from_rgb(255, 0, 0));
    }
}
