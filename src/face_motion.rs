//! Face motion detection for head-turn track skipping.
//!
//! The detector keeps a short sliding window of nose-tip `x` positions and
//! compares the mean of the older half with the mean of the newer half. A
//! sustained horizontal shift beyond the threshold fires `Next Track`
//! (rightward) or `Previous Track` (leftward), clears the window and locks the
//! detector out for a fixed duration.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::{
    constants::{FACE_HISTORY_SIZE, FACE_LOCKOUT_SECS, FACE_MOTION_THRESHOLD},
    gesture::GestureLabel,
};

/// Stateful detector for horizontal head motion
#[derive(Debug, Clone)]
pub struct FaceMotionDetector {
    window_size: usize,
    threshold: f32,
    lockout: Duration,
    positions: VecDeque<f32>,
    locked_until: Option<Instant>,
}

impl Default for FaceMotionDetector {
    fn default() -> Self {
        Self::new(
            FACE_HISTORY_SIZE,
            FACE_MOTION_THRESHOLD,
            Duration::from_secs_f64(FACE_LOCKOUT_SECS),
        )
    }
}

impl FaceMotionDetector {
    /// Create a new face motion detector
    ///
    /// `window_size` is the number of samples compared; the first and second
    /// halves are averaged separately.
    #[must_use]
    pub fn new(window_size: usize, threshold: f32, lockout: Duration) -> Self {
        Self {
            window_size,
            threshold,
            lockout,
            positions: VecDeque::with_capacity(window_size),
            locked_until: None,
        }
    }

    /// Whether detection is suppressed at `now`
    #[must_use]
    pub fn is_locked(&self, now: Instant) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    /// Instant at which the current lockout ends, if any
    #[must_use]
    pub const fn locked_until(&self) -> Option<Instant> {
        self.locked_until
    }

    /// Feed the nose-tip `x` of the current frame (or `None` without a face).
    ///
    /// Returns `None` while locked out, without touching the history.
    pub fn update(&mut self, nose_x: Option<f32>, now: Instant) -> GestureLabel {
        if self.is_locked(now) {
            return GestureLabel::None;
        }

        let Some(x) = nose_x else {
            return GestureLabel::Unknown;
        };

        if self.window_size == 0 {
            return GestureLabel::Unknown;
        }
        if self.positions.len() >= self.window_size {
            self.positions.pop_front();
        }
        self.positions.push_back(x);

        // Need full window to compare halves
        let Some(diff) = self.displacement() else {
            return GestureLabel::Unknown;
        };

        if diff.abs() > self.threshold {
            self.locked_until = Some(now + self.lockout);
            self.positions.clear();
            log::debug!("Face motion {diff:+.3} exceeded threshold, locked for {:?}", self.lockout);
            if diff > 0.0 {
                GestureLabel::NextTrack
            } else {
                GestureLabel::PreviousTrack
            }
        } else {
            GestureLabel::Unknown
        }
    }

    /// Mean of the newer half minus mean of the older half, once the window is full
    #[must_use]
    pub fn displacement(&self) -> Option<f32> {
        if self.window_size < 2 || self.positions.len() < self.window_size {
            return None;
        }
        let half = self.window_size / 2;
        let start = Self::mean(self.positions.iter().take(half), half);
        let end = Self::mean(self.positions.iter().skip(self.window_size - half), half);
        Some(end - start)
    }

    /// Current position history, oldest first
    #[must_use]
    pub const fn history(&self) -> &VecDeque<f32> {
        &self.positions
    }

    /// Clear history and lockout
    pub fn reset(&mut self) {
        self.positions.clear();
        self.locked_until = None;
    }

    #[allow(clippy::cast_precision_loss)] // Window sizes are tiny
    fn mean<'a>(values: impl Iterator<Item = &'a f32>, count: usize) -> f32 {
        values.sum::<f32>() / count as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_full_is_unknown() {
        let mut detector = FaceMotionDetector::default();
        let t0 = Instant::now();
        for i in 0..9 {
            assert_eq!(detector.update(Some(0.1 * i as f32), t0), GestureLabel::Unknown);
        }
        assert_eq!(detector.history().len(), 9);
        assert!(detector.displacement().is_none());
    }

    #[test]
    fn test_leftward_motion_is_previous_track() {
        let mut detector = FaceMotionDetector::default();
        let t0 = Instant::now();
        let samples = [0.7, 0.7, 0.7, 0.7, 0.7, 0.5, 0.5, 0.5, 0.5, 0.5];
        let labels: Vec<_> = samples.iter().map(|&x| detector.update(Some(x), t0)).collect();
        assert_eq!(labels[9], GestureLabel::PreviousTrack);
        assert!(detector.history().is_empty());
        assert!(detector.is_locked(t0));
    }

    #[test]
    fn test_absent_face_does_not_mutate() {
        let mut detector = FaceMotionDetector::default();
        let t0 = Instant::now();
        detector.update(Some(0.5), t0);
        assert_eq!(detector.update(None, t0), GestureLabel::Unknown);
        assert_eq!(detector.history().len(), 1);
    }

    #[test]
    fn test_reset() {
        let mut detector = FaceMotionDetector::new(4, 0.1, Duration::from_secs(3));
        let t0 = Instant::now();
        for x in [0.0, 0.0, 0.5, 0.5] {
            detector.update(Some(x), t0);
        }
        assert!(detector.is_locked(t0));
        detector.reset();
        assert!(!detector.is_locked(t0));
        assert!(detector.history().is_empty());
    }
}
