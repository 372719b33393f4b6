// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Player roster panel.
//!
//! Lists every roster entry with an editable label and color. Edits are
//! reported back as actions; the panel never mutates the document.

use crate::models::{OverlayDocument, PlayerEdit, Rgb};
use crate::render::palette::DEFAULT_MARKER_COLOR;

/// Result of properties panel interaction.
pub enum PropertiesAction {
    None,
    EditPlayer(usize, PlayerEdit),
}

/// Display the roster editor.
pub fn show(ui: &mut egui::Ui, overlay: Option<&OverlayDocument>) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    let Some(doc) = overlay else {
        ui.label(
            egui::RichText::new("Load an overlay to edit player labels and colours.")
                .small()
                .weak(),
        );
        return action;
    };

    ui.heading("Player Labels & Colours");
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        for (index, player) in doc.players.iter().enumerate() {
            ui.horizontal(|ui| {
                ui.monospace(format!("#{}", player.id));

                let mut label = player.label.clone().unwrap_or_default();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut label)
                        .hint_text("Label")
                        .desired_width(120.0),
                );
                if response.changed() {
                    action = PropertiesAction::EditPlayer(index, PlayerEdit::Label(label));
                }

                let mut rgb = player
                    .color
                    .as_deref()
                    .and_then(Rgb::from_hex)
                    .unwrap_or(DEFAULT_MARKER_COLOR)
                    .to_array();
                if ui.color_edit_button_rgb(&mut rgb).changed() {
                    action = PropertiesAction::EditPlayer(index, PlayerEdit::Color(Rgb::from_array(rgb)));
                }
            });
        }
    });

    action
}
