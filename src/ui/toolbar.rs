// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with layer toggles and overlay metadata.

use crate::models::OverlayDocument;

/// Display the toolbar. Toggles are edited in place.
pub fn show(
    ui: &mut egui::Ui,
    show_markers: &mut bool,
    show_skeleton: &mut bool,
    overlay: Option<&OverlayDocument>,
) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Layers:");
        ui.separator();
        ui.checkbox(show_markers, "● Tracks");
        ui.checkbox(show_skeleton, "⟋ Skeleton");
        ui.separator();

        let meta = match overlay {
            Some(doc) => doc.summary(),
            None => "No overlay loaded".to_string(),
        };
        ui.label(egui::RichText::new(meta).italics().weak());
    });
}
