// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data models for overlays and poses.

pub mod color;
pub mod overlay;
pub mod point;
pub mod pose;

pub use color::Rgb;
pub use overlay::{DecodeError, Event, OverlayDocument, PlayerDef, PlayerEdit, Track, TrackPoint};
pub use point::Point;
pub use pose::{DetectedPerson, Joint, JointObservation, PersonPose};
