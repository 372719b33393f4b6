// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback transport and timeline scrubber.

/// Result of timeline interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineAction {
    None,
    /// Restart playback from the beginning.
    Play,
    Pause,
    Seek(f64),
}

/// Display play/pause controls and a scrubber over `[0, duration]`.
pub fn show(ui: &mut egui::Ui, current_time: f64, duration: f64, playing: bool) -> TimelineAction {
    let mut action = TimelineAction::None;

    ui.horizontal(|ui| {
        if ui.button("▶ Play").clicked() {
            action = TimelineAction::Play;
        }
        if ui.add_enabled(playing, egui::Button::new("⏸ Pause")).clicked() {
            action = TimelineAction::Pause;
        }

        ui.separator();

        let mut t = current_time;
        let slider = egui::Slider::new(&mut t, 0.0..=duration.max(0.0))
            .suffix(" s")
            .fixed_decimals(2);
        ui.spacing_mut().slider_width = (ui.available_width() - 80.0).max(100.0);
        if ui.add(slider).changed() {
            action = TimelineAction::Seek(t);
        }
    });

    action
}
