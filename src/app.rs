// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the current overlay document, drives the
//! playback clock on every repaint, and collects poses from the detection
//! loop when one is attached.

use crate::config::ViewerConfig;
use crate::io::media::{self, LoadedImage};
use crate::io::serialization;
use crate::models::{OverlayDocument, PersonPose, PlayerEdit};
use crate::playback::{ClockObserver, DetectionLoop, FrameSource, PoseEstimator, SimulatedClock};
use crate::render::DrawPrimitive;
use crate::ui::{canvas, properties, timeline, toolbar};
use crate::util::LatestValue;
#[cfg(feature = "video-opencv")]
use std::path::Path;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

/// Undo/redo over whole document snapshots.
///
/// Snapshots share their tracks and events, so keeping many is cheap.
pub struct History {
    /// Undo stack (past documents)
    undo_stack: Vec<OverlayDocument>,
    /// Redo stack (documents undone)
    redo_stack: Vec<OverlayDocument>,
    /// Maximum history size
    max_size: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: 50,
        }
    }

    /// Save the document being replaced by an edit.
    pub fn push(&mut self, previous: OverlayDocument) {
        self.undo_stack.push(previous);
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    pub fn undo(&mut self, current: OverlayDocument) -> Option<OverlayDocument> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    pub fn redo(&mut self, current: OverlayDocument) -> Option<OverlayDocument> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

/// Which field an edit touched, for merging consecutive edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditTarget {
    Label(usize),
    Color(usize),
}

impl EditTarget {
    fn of(index: usize, edit: &PlayerEdit) -> Self {
        match edit {
            PlayerEdit::Label(_) => Self::Label(index),
            PlayerEdit::Color(_) => Self::Color(index),
        }
    }
}

/// Result of a background load.
enum Loaded {
    Overlay(PathBuf, OverlayDocument),
    Image(LoadedImage),
}

/// Overlay state that is not tied to the GUI: the current document, its
/// edit history and the clock it is played against.
pub struct OverlaySession {
    document: Option<OverlayDocument>,
    history: History,
    last_edit: Option<EditTarget>,
    clock: Arc<SimulatedClock>,
    observer: ClockObserver,
}

impl Default for OverlaySession {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlaySession {
    pub fn new() -> Self {
        Self {
            document: None,
            history: History::new(),
            last_edit: None,
            clock: Arc::new(SimulatedClock::new()),
            observer: ClockObserver::new(),
        }
    }

    pub fn document(&self) -> Option<&OverlayDocument> {
        self.document.as_ref()
    }

    pub fn clock(&self) -> Arc<SimulatedClock> {
        Arc::clone(&self.clock)
    }

    /// Install a freshly decoded document, replacing the old one wholesale.
    pub fn install(&mut self, doc: OverlayDocument) {
        self.clock.set_duration(Some(doc.duration()));
        self.clock.pause();
        self.clock.seek(0.0);
        self.history.clear();
        self.last_edit = None;
        self.document = Some(doc);
        self.observer.start(self.clock.clone());
    }

    pub fn close(&mut self) {
        self.observer.stop();
        self.clock.pause();
        self.clock.set_duration(None);
        self.history.clear();
        self.last_edit = None;
        self.document = None;
    }

    /// Apply a roster edit. Consecutive edits to the same field (e.g.
    /// typing, or dragging a color picker) form one undo step.
    pub fn edit_player(&mut self, index: usize, edit: PlayerEdit) -> bool {
        let Some(current) = self.document.as_ref() else {
            return false;
        };
        let target = EditTarget::of(index, &edit);
        let Some(edited) = current.apply_edit(index, edit) else {
            log::warn!("Ignoring edit for missing player index {}", index);
            return false;
        };
        if let Some(previous) = self.document.replace(edited) {
            if self.last_edit != Some(target) {
                self.history.push(previous);
            }
        }
        self.last_edit = Some(target);
        true
    }

    pub fn undo(&mut self) -> bool {
        self.step(|history, current| history.undo(current))
    }

    pub fn redo(&mut self) -> bool {
        self.step(|history, current| history.redo(current))
    }

    fn step(&mut self, f: impl FnOnce(&mut History, OverlayDocument) -> Option<OverlayDocument>) -> bool {
        let Some(current) = self.document.take() else {
            return false;
        };
        let fallback = current.clone();
        let (doc, changed) = match f(&mut self.history, current) {
            Some(doc) => (doc, true),
            None => (fallback, false),
        };
        self.document = Some(doc);
        self.last_edit = None;
        changed
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Sample the playback clock for this redraw. Playback pauses itself
    /// once it reaches the end of the overlay.
    pub fn tick(&mut self) -> f64 {
        if self.clock.is_playing() && self.clock.is_finished() {
            self.clock.pause();
        }
        self.observer.tick();
        self.observer.current_time()
    }

    /// Detach from the clock while the view is hidden, reattach when shown.
    pub fn set_active(&mut self, active: bool) {
        if !active {
            self.observer.stop();
        } else if self.document.is_some() && !self.observer.is_running() {
            self.observer.start(self.clock.clone());
        }
    }

    /// Restart playback from the beginning.
    pub fn play(&self) {
        if self.document.is_none() {
            return;
        }
        self.clock.seek(0.0);
        self.clock.play();
    }

    pub fn pause(&self) {
        self.clock.pause();
    }

    /// Play or pause from the current position. Does nothing without a
    /// document, since there is nothing to play.
    pub fn toggle_playback(&self) -> bool {
        if self.document.is_none() {
            return false;
        }
        if self.clock.is_playing() {
            self.clock.pause();
        } else {
            if self.clock.is_finished() {
                self.clock.seek(0.0);
            }
            self.clock.play();
        }
        true
    }

    pub fn seek(&self, t: f64) {
        self.clock.seek(t);
    }
}

/// Main application state.
pub struct TracklayApp {
    session: OverlaySession,

    /// Path the current overlay was loaded from
    overlay_path: Option<PathBuf>,

    /// Background frame texture
    background: Option<egui::TextureHandle>,

    /// Background dimensions (width, height)
    background_size: Option<(u32, u32)>,

    /// Pose detection loop, if a detector was attached
    detection: Option<DetectionLoop>,

    /// Where the detection loop publishes
    pose_updates: Option<LatestValue<Vec<PersonPose>>>,

    /// Last successful detection, redrawn until replaced
    poses: Vec<PersonPose>,

    /// Scratch buffer for composited primitives
    primitives: Vec<DrawPrimitive>,

    show_markers: bool,
    show_skeleton: bool,

    config: ViewerConfig,

    /// Receiver for background loading
    loader: Option<Receiver<Result<Loaded, String>>>,

    /// Loading state message
    loading_message: Option<String>,
}

impl TracklayApp {
    /// Create a viewer with no overlay loaded.
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            session: OverlaySession::new(),
            overlay_path: None,
            background: None,
            background_size: None,
            detection: None,
            pose_updates: None,
            poses: Vec::new(),
            primitives: Vec::new(),
            show_markers: config.show_markers,
            show_skeleton: config.show_skeleton,
            config,
            loader: None,
            loading_message: None,
        }
    }

    /// Attach an external pose detector. Frames are pulled from `source`
    /// at the playback clock's current time.
    pub fn attach_pose_detection(&mut self, source: Box<dyn FrameSource>, estimator: Box<dyn PoseEstimator>) {
        let detection = DetectionLoop::new(
            self.session.clock(),
            source,
            estimator,
            self.config.detection_settings(),
        );
        self.pose_updates = Some(detection.output());
        self.detection = Some(detection);
        self.poses.clear();
    }

    /// Attach a pose detector that reads frames from a video file.
    #[cfg(feature = "video-opencv")]
    pub fn attach_video_pose_detection(
        &mut self,
        video: &Path,
        estimator: Box<dyn PoseEstimator>,
    ) -> anyhow::Result<()> {
        let source = media::VideoFrameSource::open(video)?;
        log::info!("Pose detection reads frames from {}", video.display());
        self.attach_pose_detection(Box::new(source), estimator);
        Ok(())
    }

    /// Load an overlay file on a background thread.
    fn open_overlay(&mut self, path: PathBuf) {
        self.spawn_loader("Loading overlay...", move || {
            let doc = serialization::import_overlay(&path)
                .map_err(|e| format!("Failed to load overlay {}: {}", path.display(), e))?;
            log::info!(
                "Loaded overlay {} ({} players, {} tracks)",
                path.display(),
                doc.players.len(),
                doc.tracks.len()
            );
            Ok(Loaded::Overlay(path, doc))
        });
    }

    /// Load a background image on a background thread.
    fn open_background(&mut self, path: PathBuf) {
        self.spawn_loader("Loading image...", move || {
            let image = media::load_image(&path)
                .map_err(|e| format!("Failed to load image: {:#}", e))?;
            log::info!("Loaded image: {} ({}x{})", path.display(), image.width, image.height);
            Ok(Loaded::Image(image))
        });
    }

    fn spawn_loader(&mut self, message: &str, job: impl FnOnce() -> Result<Loaded, String> + Send + 'static) {
        let (sender, receiver) = channel();
        self.loader = Some(receiver);
        self.loading_message = Some(message.to_string());
        std::thread::spawn(move || {
            let _ = sender.send(job());
        });
    }

    fn poll_loader(&mut self, ctx: &egui::Context) {
        let Some(ref receiver) = self.loader else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };
        self.loader = None;
        self.loading_message = None;

        match result {
            Ok(Loaded::Overlay(path, doc)) => {
                self.session.install(doc);
                self.overlay_path = Some(path);
            }
            Ok(Loaded::Image(image)) => {
                let size = [image.width as usize, image.height as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &image.pixels);
                let texture = ctx.load_texture("background", color_image, egui::TextureOptions::LINEAR);
                self.background = Some(texture);
                self.background_size = Some((image.width, image.height));
            }
            // The previous overlay (if any) stays in place.
            Err(e) => log::error!("{}", e),
        }
    }

    /// Export the current overlay to a file.
    fn export_overlay(&self, path: PathBuf) {
        if let Some(doc) = self.session.document() {
            match serialization::export_overlay(doc, &path) {
                Ok(()) => log::info!("Exported overlay to {}", path.display()),
                Err(e) => log::error!("Failed to export overlay: {:#}", e),
            }
        }
    }

    fn close_overlay(&mut self) {
        self.session.close();
        self.overlay_path = None;
        log::info!("Closed overlay");
    }

    /// Start or stop both pipelines to match visibility and the toggles.
    fn sync_pipelines(&mut self, visible: bool) {
        self.session.set_active(visible);

        if let Some(ref mut detection) = self.detection {
            let wanted = visible && self.show_skeleton;
            if wanted && !detection.is_running() {
                detection.start();
            } else if !wanted && detection.is_running() {
                detection.stop();
            }
        }
        if let Some(ref updates) = self.pose_updates {
            if let Some(poses) = updates.take() {
                self.poses = poses;
            }
        }
    }

    fn default_export_name(&self, extension: &str) -> String {
        self.overlay_path
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|stem| format!("{}.{}", stem.to_string_lossy(), extension))
            .unwrap_or_else(|| format!("overlay.{}", extension))
    }

    fn menu_bar(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.menu_button("File", |ui| {
            if ui.button("Open Overlay...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Overlay", &["json", "yaml", "yml"])
                    .pick_file()
                {
                    self.open_overlay(path);
                }
                ui.close_menu();
            }
            if ui.button("Open Background Image...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "tiff", "tif"])
                    .pick_file()
                {
                    self.open_background(path);
                }
                ui.close_menu();
            }
            ui.separator();
            let has_overlay = self.session.document().is_some();
            ui.add_enabled_ui(has_overlay, |ui| {
                ui.menu_button("Export Overlay", |ui| {
                    if ui.button("Export as JSON...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .set_file_name(self.default_export_name("json"))
                            .save_file()
                        {
                            self.export_overlay(path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Export as YAML...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("YAML", &["yaml", "yml"])
                            .set_file_name(self.default_export_name("yaml"))
                            .save_file()
                        {
                            self.export_overlay(path);
                        }
                        ui.close_menu();
                    }
                });
                if ui.button("Close Overlay").clicked() {
                    self.close_overlay();
                    ui.close_menu();
                }
            });
            ui.separator();
            if ui.button("Quit").clicked() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.menu_button("Edit", |ui| {
            let can_undo = self.session.history().can_undo();
            if ui.add_enabled(can_undo, egui::Button::new("Undo (Ctrl+Z)")).clicked() {
                if self.session.undo() {
                    log::info!("Undo from menu");
                }
                ui.close_menu();
            }
            let can_redo = self.session.history().can_redo();
            if ui.add_enabled(can_redo, egui::Button::new("Redo (Ctrl+Shift+Z)")).clicked() {
                if self.session.redo() {
                    log::info!("Redo from menu");
                }
                ui.close_menu();
            }
        });
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // Leave keys alone while a label is being typed.
        if ctx.wants_keyboard_input() {
            return;
        }
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z) && !i.modifiers.shift)
            && self.session.undo()
        {
            log::info!("Undo");
        }
        if ctx.input(|i| {
            (i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                || (i.modifiers.command && i.key_pressed(egui::Key::Y))
        }) && self.session.redo()
        {
            log::info!("Redo");
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.session.toggle_playback();
        }
    }
}

impl eframe::App for TracklayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loader(ctx);

        let visible = !ctx.input(|i| i.viewport().minimized.unwrap_or(false));
        self.sync_pipelines(visible);
        let time = self.session.tick();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| self.menu_bar(ctx, ui));
        });

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            toolbar::show(
                ui,
                &mut self.show_markers,
                &mut self.show_skeleton,
                self.session.document(),
            );
        });

        let clock = self.session.clock();
        let duration = self.session.document().map_or(0.0, |d| d.duration());
        let timeline_action = egui::TopBottomPanel::bottom("timeline")
            .show(ctx, |ui| timeline::show(ui, time, duration, clock.is_playing()))
            .inner;
        match timeline_action {
            timeline::TimelineAction::Play => self.session.play(),
            timeline::TimelineAction::Pause => self.session.pause(),
            timeline::TimelineAction::Seek(t) => self.session.seek(t),
            timeline::TimelineAction::None => {}
        }

        let properties_action = egui::SidePanel::right("properties")
            .default_width(250.0)
            .show(ctx, |ui| properties::show(ui, self.session.document()))
            .inner;
        if let properties::PropertiesAction::EditPlayer(index, edit) = properties_action {
            self.session.edit_player(index, edit);
        }

        self.handle_shortcuts(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(ref message) = self.loading_message {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.spinner();
                        ui.add_space(10.0);
                        ui.label(
                            egui::RichText::new(message)
                                .size(16.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                    });
                });
                return;
            }
            let layers = canvas::CanvasLayers {
                overlay: self.session.document(),
                time,
                poses: &self.poses,
                show_markers: self.show_markers,
                show_skeleton: self.show_skeleton,
            };
            canvas::show(ui, &self.background, self.background_size, &layers, &mut self.primitives);
        });

        // Keep redrawing while anything moves.
        if self.loading_message.is_some() || clock.is_playing() {
            ctx.request_repaint();
        } else if self.detection.as_ref().map_or(false, |d| d.is_running()) {
            ctx.request_repaint_after(self.config.detection_settings().interval);
        }
    }
}
