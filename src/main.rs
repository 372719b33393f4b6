// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tracklay - tracking overlay viewer
//!
//! A desktop application that plays back player tracking overlays and
//! pose skeletons on top of video frames.

use anyhow::Result;
use tracklay::app::TracklayApp;
use tracklay::config::ViewerConfig;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = ViewerConfig::discover();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Tracklay - Tracking Overlay Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "Tracklay",
        options,
        Box::new(|_cc| Ok(Box::new(TracklayApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
