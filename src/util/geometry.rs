// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides utilities for coordinate transformations between
//! pixel coordinates and normalized coordinates.

use crate::models::Point;

/// The drawable area, in device-independent pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Map a normalized point into this viewport.
    pub fn to_pixels(&self, point: Point) -> Point {
        denormalize_coordinates(point, self.width, self.height)
    }
}

/// Convert pixel coordinates to normalized coordinates (0.0 to 1.0).
pub fn normalize_coordinates(pixel_x: f64, pixel_y: f64, width: f64, height: f64) -> Point {
    Point {
        x: pixel_x / width,
        y: pixel_y / height,
    }
}

/// Convert normalized coordinates to pixel coordinates.
pub fn denormalize_coordinates(point: Point, width: f64, height: f64) -> Point {
    Point {
        x: point.x * width,
        y: point.y * height,
    }
}
