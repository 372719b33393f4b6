// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The two periodic pipelines that feed the overlay: the redraw-rate clock
//! observer and the slower pose detection loop.

pub mod clock;
pub mod detection;

pub use clock::{ClockObserver, PlaybackClock, SimulatedClock};
pub use detection::{DetectionLoop, DetectionSettings, FrameSource, PoseEstimator};
