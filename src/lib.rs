// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tracklay - tracking overlay viewer.
//!
//! Renders player position tracks and pose skeletons over video, in step
//! with playback. The rendering engine in [`render`] is independent of the
//! GUI and can be driven directly.

pub mod app;
pub mod config;
pub mod io;
pub mod models;
pub mod playback;
pub mod render;
pub mod ui;
pub mod util;
