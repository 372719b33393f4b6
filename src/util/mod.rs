// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Small shared helpers.

pub mod geometry;
pub mod latest;

pub use geometry::Viewport;
pub use latest::LatestValue;
