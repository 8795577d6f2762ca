//! Pose landmark types
//!
//! Landmarks follow the MediaPipe Pose layout (33 points). Face points
//! (0..=10) are present in every frame but never read by the game.

use serde::{Deserialize, Serialize};

use crate::consts::POSE_LANDMARK_COUNT;

/// A single tracked joint estimate (normalized image coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// 0-1, left to right in the (mirrored) camera frame
    pub x: f32,
    /// 0-1, top to bottom
    pub y: f32,
    /// Relative depth estimate
    pub z: f32,
    /// Detection confidence, 0-1
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self {
            x,
            y,
            z,
            visibility,
        }
    }
}

/// Body joints used by the game, named instead of raw indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joint {
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

impl Joint {
    /// Index into a MediaPipe Pose landmark list
    pub const fn index(self) -> usize {
        match self {
            Joint::LeftShoulder => 11,
            Joint::RightShoulder => 12,
            Joint::LeftElbow => 13,
            Joint::RightElbow => 14,
            Joint::LeftWrist => 15,
            Joint::RightWrist => 16,
            Joint::LeftHip => 23,
            Joint::RightHip => 24,
            Joint::LeftKnee => 25,
            Joint::RightKnee => 26,
            Joint::LeftAnkle => 27,
            Joint::RightAnkle => 28,
            Joint::LeftHeel => 29,
            Joint::RightHeel => 30,
            Joint::LeftFootIndex => 31,
            Joint::RightFootIndex => 32,
        }
    }

    /// Same joint on the other side of the body
    pub const fn mirrored(self) -> Joint {
        match self {
            Joint::LeftShoulder => Joint::RightShoulder,
            Joint::RightShoulder => Joint::LeftShoulder,
            Joint::LeftElbow => Joint::RightElbow,
            Joint::RightElbow => Joint::LeftElbow,
            Joint::LeftWrist => Joint::RightWrist,
            Joint::RightWrist => Joint::LeftWrist,
            Joint::LeftHip => Joint::RightHip,
            Joint::RightHip => Joint::LeftHip,
            Joint::LeftKnee => Joint::RightKnee,
            Joint::RightKnee => Joint::LeftKnee,
            Joint::LeftAnkle => Joint::RightAnkle,
            Joint::RightAnkle => Joint::LeftAnkle,
            Joint::LeftHeel => Joint::RightHeel,
            Joint::RightHeel => Joint::LeftHeel,
            Joint::LeftFootIndex => Joint::RightFootIndex,
            Joint::RightFootIndex => Joint::LeftFootIndex,
        }
    }
}

/// One completed pose inference result. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseSnapshot {
    landmarks: Vec<Landmark>,
}

impl PoseSnapshot {
    /// Wrap a landmark list; `None` if it is too short to hold every body joint
    pub fn new(landmarks: Vec<Landmark>) -> Option<Self> {
        if landmarks.len() < POSE_LANDMARK_COUNT {
            return None;
        }
        Some(Self { landmarks })
    }

    /// Decode a flat `[x, y, z, visibility, ...]` buffer (as sent from JS)
    pub fn from_flat(data: &[f32]) -> Option<Self> {
        if data.len() % 4 != 0 {
            return None;
        }
        let landmarks = data
            .chunks_exact(4)
            .map(|c| Landmark::new(c[0], c[1], c[2], c[3]))
            .collect();
        Self::new(landmarks)
    }

    pub fn get(&self, joint: Joint) -> &Landmark {
        &self.landmarks[joint.index()]
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Swap left/right joints and mirror x. Used to check gesture symmetry.
    pub fn mirrored(&self) -> Self {
        let mut landmarks: Vec<Landmark> = self
            .landmarks
            .iter()
            .map(|l| Landmark {
                x: 1.0 - l.x,
                ..*l
            })
            .collect();
        for joint in LEFT_JOINTS {
            landmarks.swap(joint.index(), joint.mirrored().index());
        }
        Self { landmarks }
    }
}

const LEFT_JOINTS: [Joint; 8] = [
    Joint::LeftShoulder,
    Joint::LeftElbow,
    Joint::LeftWrist,
    Joint::LeftHip,
    Joint::LeftKnee,
    Joint::LeftAnkle,
    Joint::LeftHeel,
    Joint::LeftFootIndex,
];
