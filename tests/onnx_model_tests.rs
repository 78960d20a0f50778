//! Tests for ONNX landmark model loading and inference

use gesture_spotify::{
    config::ModelConfig,
    controller::GestureController,
    dispatcher::CommandDispatcher,
    landmark_model::LandmarkModel,
    landmark_source::{LandmarkSource, OnnxLandmarkSource, FACE_MODEL_SPEC, HAND_MODEL_SPEC},
    landmarks::FaceLandmarks,
    playback::SpotifyClient,
    Result,
};
use opencv::core::{Mat, Scalar, CV_8UC3};
use std::path::Path;
use std::time::Instant;

fn gray_frame() -> Result<Mat> {
    Ok(Mat::new_rows_cols_with_default(
        480,
        640,
        CV_8UC3,
        Scalar::new(128.0, 128.0, 128.0, 0.0),
    )?)
}

#[test]
#[ignore = "Requires ONNX models"]
fn test_load_hand_landmark_model() -> Result<()> {
    let model_path = "assets/hand_landmarks.onnx";
    assert!(Path::new(model_path).exists(), "Hand landmark model not found");
    let model = LandmarkModel::new(model_path, "hand", HAND_MODEL_SPEC)?;
    assert_eq!(model.spec().input_size, HAND_MODEL_SPEC.input_size);
    Ok(())
}

#[test]
#[ignore = "Requires ONNX models"]
fn test_face_landmark_inference() -> Result<()> {
    let model = LandmarkModel::new("assets/face_landmarks.onnx", "face", FACE_MODEL_SPEC)?;
    let detection = model.detect(&gray_frame()?)?;
    assert_eq!(detection.points.len(), FACE_MODEL_SPEC.num_landmarks);
    assert!((0.0..=1.0).contains(&detection.score));
    Ok(())
}

#[test]
#[ignore = "Requires ONNX models"]
fn test_pipeline_on_blank_frame() -> Result<()> {
    let mut source = OnnxLandmarkSource::new(&ModelConfig::default())?;
    let frame = gray_frame()?;

    // A flat gray frame should not contain a hand
    let hands = source.detect_hands(&frame)?;
    assert!(hands.is_empty());

    let nose_x = source
        .detect_faces(&frame)?
        .first()
        .and_then(FaceLandmarks::nose_tip)
        .map(|p| p.x);

    let mut controller: GestureController<SpotifyClient> =
        GestureController::with_dispatcher(CommandDispatcher::not_ready("test"));
    let outcome = controller.step(hands.first(), nose_x, Instant::now());
    assert_eq!(outcome.action, None);
    Ok(())
}
