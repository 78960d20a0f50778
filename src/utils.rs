//! Utility functions for image processing and coordinate transformations.

pub mod image_conversion;

use crate::landmarks::LandmarkPoint;
use opencv::core::Point;

/// Map a normalized coordinate onto a pixel index within `0..extent`
#[must_use]
#[allow(clippy::cast_precision_loss)] // Frame sizes are far below f32 precision limits
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
pub fn pixel_coord(value: f32, extent: i32) -> i32 {
    let max = (extent - 1).max(0);
    if !value.is_finite() {
        return 0;
    }
    ((value * extent as f32) as i32).clamp(0, max)
}

/// Map a normalized landmark onto a frame of `width` x `height` pixels
#[must_use]
pub fn to_pixel(point: &LandmarkPoint, width: i32, height: i32) -> Point {
    Point::new(pixel_coord(point.x, width), pixel_coord(point.y, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_coord() {
        assert_eq!(pixel_coord(0.0, 640), 0);
        assert_eq!(pixel_coord(0.5, 640), 320);
        assert_eq!(pixel_coord(1.0, 640), 639);
    }

    #[test]
    fn test_pixel_coord_out_of_range() {
        assert_eq!(pixel_coord(-0.2, 640), 0);
        assert_eq!(pixel_coord(1.7, 480), 479);
        assert_eq!(pixel_coord(f32::NAN, 480), 0);
        assert_eq!(pixel_coord(0.5, 0), 0);
    }

    #[test]
    fn test_to_pixel() {
        let p = to_pixel(&LandmarkPoint::new(0.25, 0.75), 400, 200);
        assert_eq!((p.x, p.y), (100, 150));
    }
}
