//! Landmark sources: anything that turns a frame into hand and face keypoints.
//!
//! The event loop only sees the [`LandmarkSource`] trait. The bundled
//! implementation runs MediaPipe landmark exports through ONNX Runtime on the
//! whole frame and keeps at most one hand and one face.

use crate::{
    config::ModelConfig,
    constants::{
        FACE_LANDMARK_COUNT, FACE_MODEL_INPUT_SIZE, HAND_LANDMARK_COUNT, HAND_MODEL_INPUT_SIZE,
        LANDMARK_MODEL_COORDS,
    },
    landmark_model::{LandmarkDetection, LandmarkModel, LandmarkModelSpec},
    landmarks::{FaceLandmarks, HandLandmarks},
    Result,
};
use log::debug;
use opencv::core::Mat;

/// Produces normalized landmarks for a frame
pub trait LandmarkSource {
    /// Hands found in the frame, best first
    fn detect_hands(&mut self, frame: &Mat) -> Result<Vec<HandLandmarks>>;

    /// Faces found in the frame, best first
    fn detect_faces(&mut self, frame: &Mat) -> Result<Vec<FaceLandmarks>>;
}

/// Landmark source backed by ONNX hand and face mesh models
pub struct OnnxLandmarkSource {
    hand_model: LandmarkModel,
    face_model: LandmarkModel,
    hand_threshold: f32,
    face_threshold: f32,
}

/// Input/output layout of the hand landmark export
pub const HAND_MODEL_SPEC: LandmarkModelSpec = LandmarkModelSpec {
    input_size: HAND_MODEL_INPUT_SIZE,
    num_landmarks: HAND_LANDMARK_COUNT,
    coords_per_landmark: LANDMARK_MODEL_COORDS,
};

/// Input/output layout of the face mesh export
pub const FACE_MODEL_SPEC: LandmarkModelSpec = LandmarkModelSpec {
    input_size: FACE_MODEL_INPUT_SIZE,
    num_landmarks: FACE_LANDMARK_COUNT,
    coords_per_landmark: LANDMARK_MODEL_COORDS,
};

impl OnnxLandmarkSource {
    /// Load both models
    ///
    /// # Errors
    ///
    /// Returns an error if either model cannot be loaded.
    pub fn new(config: &ModelConfig) -> Result<Self> {
        Ok(Self {
            hand_model: LandmarkModel::new(&config.hand_landmarks, "hand_landmarks", HAND_MODEL_SPEC)?,
            face_model: LandmarkModel::new(&config.face_landmarks, "face_landmarks", FACE_MODEL_SPEC)?,
            hand_threshold: config.hand_presence_threshold,
            face_threshold: config.face_presence_threshold,
        })
    }
}

/// Keep a detection only if it clears the presence threshold
fn accept(detection: LandmarkDetection, threshold: f32, kind: &str) -> Option<LandmarkDetection> {
    if detection.score >= threshold {
        Some(detection)
    } else {
        debug!("{kind} rejected: presence {:.2} < {threshold:.2}", detection.score);
        None
    }
}

impl LandmarkSource for OnnxLandmarkSource {
    fn detect_hands(&mut self, frame: &Mat) -> Result<Vec<HandLandmarks>> {
        let detection = self.hand_model.detect(frame)?;
        Ok(accept(detection, self.hand_threshold, "hand")
            .map(|d| HandLandmarks {
                points: d.points,
                score: d.score,
            })
            .into_iter()
            .collect())
    }

    fn detect_faces(&mut self, frame: &Mat) -> Result<Vec<FaceLandmarks>> {
        let detection = self.face_model.detect(frame)?;
        Ok(accept(detection, self.face_threshold, "face")
            .map(|d| FaceLandmarks {
                points: d.points,
                score: d.score,
            })
            .into_iter()
            .collect())
    }
}
