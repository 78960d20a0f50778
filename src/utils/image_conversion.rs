//! Image conversion from OpenCV frames to landmark model input tensors.

use crate::{Error, Result};
use ndarray::Array4;
use opencv::core::{Mat, Size, Vec3f, CV_32F};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;

/// Convert a BGR frame into a `[1, size, size, 3]` RGB tensor scaled to `[0, 1]`
///
/// The frame is stretched to a square input, so normalized model outputs map
/// straight back onto the whole frame.
///
/// # Errors
/// * Returns error if the frame is empty or `size` is not positive
/// * Returns error if resizing or color conversion fails
#[allow(clippy::cast_sign_loss)] // `size` is checked positive
pub fn frame_to_nhwc_tensor(frame: &Mat, size: i32) -> Result<Array4<f32>> {
    if frame.empty() {
        return Err(Error::InvalidInput("Empty frame".to_string()));
    }
    if size <= 0 {
        return Err(Error::InvalidInput(format!("Invalid model input size: {size}")));
    }

    let mut resized = Mat::default();
    imgproc::resize(
        frame,
        &mut resized,
        Size::new(size, size),
        0.0,
        0.0,
        InterpolationFlags::INTER_LINEAR as i32,
    )?;

    let mut rgb = Mat::default();
    imgproc::cvt_color(&resized, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;

    let mut float_image = Mat::default();
    rgb.convert_to(&mut float_image, CV_32F, 1.0 / 255.0, 0.0)?;

    let side = size as usize;
    let mut data = Vec::with_capacity(side * side * 3);
    for row in 0..size {
        for col in 0..size {
            let pixel = float_image.at_2d::<Vec3f>(row, col)?;
            data.extend_from_slice(&[pixel[0], pixel[1], pixel[2]]);
        }
    }

    Array4::from_shape_vec((1, side, side, 3), data)
        .map_err(|e| Error::ModelDataFormatError(format!("Failed to create input tensor: {e}")))
}
