//! Normalized landmark points and the hand/face landmark sets built from them.
//!
//! Coordinates are in image space normalized to `[0, 1]`, with `y` growing
//! downward. Every geometric rule in the classifier relies on that convention.

use crate::constants::{FACE_LANDMARK_COUNT, HAND_LANDMARK_COUNT};

/// Hand landmark indices (MediaPipe hand model convention)
pub mod hand {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// Face mesh landmark indices
pub mod face {
    /// Tip of the nose, the horizontal reference for head turns
    pub const NOSE_TIP: usize = 1;
}

/// A normalized 2D keypoint
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LandmarkPoint {
    /// Horizontal coordinate, 0 = left edge
    pub x: f32,
    /// Vertical coordinate, 0 = top edge
    pub y: f32,
}

impl LandmarkPoint {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[must_use]
    pub fn distance(&self, other: &Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Vector pointing from `self` to `other`
    #[must_use]
    pub fn vector_to(&self, other: &Self) -> (f32, f32) {
        (other.x - self.x, other.y - self.y)
    }
}

impl From<(f32, f32)> for LandmarkPoint {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Landmarks of a single detected hand
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HandLandmarks {
    /// Keypoints in model order
    pub points: Vec<LandmarkPoint>,
    /// Presence score reported by the model (1.0 when unknown)
    pub score: f32,
}

impl HandLandmarks {
    #[must_use]
    pub fn new(points: Vec<LandmarkPoint>) -> Self {
        Self { points, score: 1.0 }
    }

    /// Whether the set has enough points to be classified
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.points.len() >= HAND_LANDMARK_COUNT
    }
}

/// Landmarks of a single detected face
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FaceLandmarks {
    /// Keypoints in model order
    pub points: Vec<LandmarkPoint>,
    /// Presence score reported by the model (1.0 when unknown)
    pub score: f32,
}

impl FaceLandmarks {
    #[must_use]
    pub fn new(points: Vec<LandmarkPoint>) -> Self {
        Self { points, score: 1.0 }
    }

    #[must_use]
    pub fn nose_tip(&self) -> Option<LandmarkPoint> {
        self.points.get(face::NOSE_TIP).copied()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.points.len() >= FACE_LANDMARK_COUNT
    }
}
