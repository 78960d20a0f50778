use crate::{
    landmarks::LandmarkPoint,
    utils::image_conversion::frame_to_nhwc_tensor,
    Error, Result,
};
use ndarray::{Array4, CowArray};
use opencv::core::Mat;
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

/// Shape of a landmark model's input and output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandmarkModelSpec {
    /// Square input side in pixels
    pub input_size: i32,
    /// Landmarks produced per detection
    pub num_landmarks: usize,
    /// Values per landmark in the output tensor (x, y[, z])
    pub coords_per_landmark: usize,
}

/// Raw landmark inference result
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkDetection {
    /// Normalized points in model order
    pub points: Vec<LandmarkPoint>,
    /// Presence probability, 1.0 when the model has no presence output
    pub score: f32,
}

/// Landmark regressor using `ONNX` Runtime
pub struct LandmarkModel {
    session: Session,
    spec: LandmarkModelSpec,
}

impl LandmarkModel {
    /// Load a landmark model from an `ONNX` file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The model file does not exist
    /// - The ONNX model file cannot be loaded
    /// - The model has no inputs or outputs
    /// - The ONNX runtime environment cannot be created
    pub fn new<P: AsRef<Path>>(model_path: P, name: &str, spec: LandmarkModelSpec) -> Result<Self> {
        log::info!(
            "Initializing {} landmark model: {}",
            name,
            model_path.as_ref().display()
        );
        if !model_path.as_ref().exists() {
            return Err(Error::ModelError(format!(
                "{name} model not found: {}",
                model_path.as_ref().display()
            )));
        }

        let environment = Arc::new(
            Environment::builder()
                .with_name(name)
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        if session.inputs.is_empty() {
            return Err(Error::ModelInputError("Model has no inputs".to_string()));
        }
        if session.outputs.is_empty() {
            return Err(Error::ModelOutputError("Model has no outputs".to_string()));
        }

        Ok(Self { session, spec })
    }

    #[must_use]
    pub const fn spec(&self) -> &LandmarkModelSpec {
        &self.spec
    }

    /// Run the model on a whole BGR frame
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing or inference fails, or the output
    /// holds fewer values than the model spec requires.
    pub fn detect(&self, frame: &Mat) -> Result<LandmarkDetection> {
        let input = frame_to_nhwc_tensor(frame, self.spec.input_size)?;
        let (marks, presence) = self.forward(input)?;
        let points = decode_landmarks(&marks, &self.spec)?;
        Ok(LandmarkDetection {
            points,
            score: presence.map_or(1.0, presence_probability),
        })
    }

    /// Run inference, returning landmark values and the optional presence value
    fn forward(&self, input: Array4<f32>) -> Result<(Vec<f32>, Option<f32>)> {
        let cow_array = CowArray::from(input.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;

        let outputs = self.session.run(vec![input_tensor])?;
        let mut outputs = outputs.into_iter();

        let marks_output = outputs
            .next()
            .ok_or_else(|| Error::ModelOutputError("No output from model".to_string()))?;
        let marks_tensor = marks_output.try_extract::<f32>()?;
        let marks_view = marks_tensor.view();
        let marks = marks_view.iter().copied().collect::<Vec<f32>>();

        let presence = match outputs.next() {
            Some(value) => {
                let tensor = value.try_extract::<f32>()?;
                let view = tensor.view();
                let first = view.iter().next().copied();
                first
            }
            None => None,
        };

        Ok((marks, presence))
    }
}

/// Convert flat model output into normalized points
///
/// Model coordinates are in input pixels and are divided by the input size.
///
/// # Errors
///
/// Returns an error if `values` is too short for the spec.
#[allow(clippy::cast_precision_loss)] // Input sizes are small integers
pub fn decode_landmarks(values: &[f32], spec: &LandmarkModelSpec) -> Result<Vec<LandmarkPoint>> {
    let stride = spec.coords_per_landmark;
    if stride < 2 {
        return Err(Error::ModelDataFormatError(format!(
            "Landmarks need at least 2 coordinates, got {stride}"
        )));
    }
    let needed = spec.num_landmarks * stride;
    if values.len() < needed {
        return Err(Error::ModelOutputError(format!(
            "Expected {needed} landmark values, got {}",
            values.len()
        )));
    }

    let scale = spec.input_size as f32;
    Ok(values[..needed]
        .chunks_exact(stride)
        .map(|c| LandmarkPoint::new(c[0] / scale, c[1] / scale))
        .collect())
}

/// Interpret a presence output as a probability
///
/// Values outside `[0, 1]` are treated as logits.
#[must_use]
pub fn presence_probability(raw: f32) -> f32 {
    if (0.0..=1.0).contains(&raw) {
        raw
    } else {
        1.0 / (1.0 + (-raw).exp())
    }
}
