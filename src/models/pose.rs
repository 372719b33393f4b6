// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Body pose data as consumed by the skeleton renderer.
//!
//! Pose detection itself happens elsewhere. A detector reports joint
//! observations in vision coordinates (origin bottom-left, y up) with a
//! confidence each; [`PersonPose::from_observations`] turns them into
//! frame-normalized points, replacing weak or missing joints with
//! [`Point::ZERO`].

use super::point::Point;

/// Confidence a joint must exceed to be kept.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.1;

/// The 14 joints used by the skeleton, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Joint {
    Nose = 0,
    Neck = 1,
    LeftShoulder = 2,
    LeftElbow = 3,
    LeftWrist = 4,
    RightShoulder = 5,
    RightElbow = 6,
    RightWrist = 7,
    LeftHip = 8,
    LeftKnee = 9,
    LeftAnkle = 10,
    RightHip = 11,
    RightKnee = 12,
    RightAnkle = 13,
}

impl Joint {
    pub const COUNT: usize = 14;

    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::Nose,
        Joint::Neck,
        Joint::LeftShoulder,
        Joint::LeftElbow,
        Joint::LeftWrist,
        Joint::RightShoulder,
        Joint::RightElbow,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::LeftKnee,
        Joint::LeftAnkle,
        Joint::RightHip,
        Joint::RightKnee,
        Joint::RightAnkle,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// A single joint as reported by a pose detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointObservation {
    /// Normalized x, left to right.
    pub x: f64,
    /// Normalized y, bottom to top.
    pub y: f64,
    pub confidence: f32,
}

impl JointObservation {
    pub fn new(x: f64, y: f64, confidence: f32) -> Self {
        Self { x, y, confidence }
    }
}

/// One detected person: up to 14 joint observations, indexed by [`Joint`].
pub type DetectedPerson = [Option<JointObservation>; Joint::COUNT];

/// A person's joints in frame-normalized coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonPose {
    pub joints: [Point; Joint::COUNT],
}

impl PersonPose {
    pub fn new(joints: [Point; Joint::COUNT]) -> Self {
        Self { joints }
    }

    /// Convert detector output, flipping y and substituting the origin for
    /// joints that are missing or not above `min_confidence`.
    pub fn from_observations(person: &DetectedPerson, min_confidence: f32) -> Self {
        let mut joints = [Point::ZERO; Joint::COUNT];
        for (slot, observation) in joints.iter_mut().zip(person.iter()) {
            if let Some(obs) = observation {
                if obs.confidence > min_confidence {
                    *slot = Point::new(obs.x, 1.0 - obs.y);
                }
            }
        }
        Self { joints }
    }

    pub fn get(&self, joint: Joint) -> Point {
        self.joints[joint.index()]
    }

    /// Whether a joint was replaced by the origin sentinel.
    pub fn is_missing(&self, joint: Joint) -> bool {
        self.get(joint) == Point::ZERO
    }
}

impl Default for PersonPose {
    fn default() -> Self {
        Self {
            joints: [Point::ZERO; Joint::COUNT],
        }
    }
}
