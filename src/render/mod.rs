// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay rendering engine.
//!
//! Pure functions from documents and poses to drawing primitives. Nothing
//! here touches the GUI, so frames can be built and checked in tests.

pub mod compositor;
pub mod palette;
pub mod resolver;
pub mod skeleton;

pub use compositor::{composite, composite_into, DrawPrimitive};
pub use palette::{resolve_style, TrackStyle};
pub use resolver::resolve;
pub use skeleton::{composite_skeleton, LineSegment};
