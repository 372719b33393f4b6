// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Skeleton compositor.
//!
//! Connects each person's joints with a fixed set of limb polylines.
//! Missing joints sit at the origin sentinel and are still connected.

use crate::models::{Joint, PersonPose, Point, Rgb};
use crate::util::Viewport;

/// Stroke color for skeleton lines.
pub const SKELETON_COLOR: Rgb = Rgb::GREEN;

/// Stroke width for skeleton lines.
pub const SKELETON_LINE_WIDTH: f64 = 2.0;

/// Limb polylines, each drawn as two connected segments.
pub const SKELETON_PATHS: [[Joint; 3]; 6] = [
    // Torso
    [Joint::Neck, Joint::LeftShoulder, Joint::LeftHip],
    [Joint::Neck, Joint::RightShoulder, Joint::RightHip],
    // Arms
    [Joint::LeftShoulder, Joint::LeftElbow, Joint::LeftWrist],
    [Joint::RightShoulder, Joint::RightElbow, Joint::RightWrist],
    // Legs
    [Joint::LeftHip, Joint::LeftKnee, Joint::LeftAnkle],
    [Joint::RightHip, Joint::RightKnee, Joint::RightAnkle],
];

/// Segments emitted per person.
pub const SEGMENTS_PER_PERSON: usize = SKELETON_PATHS.len() * 2;

/// A straight line in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub from: Point,
    pub to: Point,
}

/// Build the skeleton lines for every person, mapped into `viewport`.
pub fn composite_skeleton(people: &[PersonPose], viewport: Viewport) -> Vec<LineSegment> {
    let mut segments = Vec::with_capacity(people.len() * SEGMENTS_PER_PERSON);
    for person in people {
        for path in &SKELETON_PATHS {
            for pair in path.windows(2) {
                segments.push(LineSegment {
                    from: viewport.to_pixels(person.get(pair[0])),
                    to: viewport.to_pixels(person.get(pair[1])),
                });
            }
        }
    }
    segments
}
