//! Static hand gesture classification from 21 hand landmarks.
//!
//! Rules are evaluated in a fixed priority order and the first match wins:
//!
//! 1. Like Song: thumb and index bases close together, tips spread apart at a
//!    wide angle, middle/ring/pinky folded
//! 2. Pause: all four fingers extended
//! 3. Play: index and middle extended
//! 4. Shuffle: index and pinky extended
//! 5. Volume Up / Volume Down: thumb up or down with every finger folded
//!
//! Anything else is `Unknown`. A finger counts as extended when its tip sits
//! above (smaller `y` than) its PIP joint.

use crate::{
    constants::{ANGLE_EPSILON, HAND_LANDMARK_COUNT, LIKE_BASE_DISTANCE, LIKE_MIN_ANGLE_DEG, LIKE_TIP_DISTANCE},
    gesture::GestureLabel,
    landmarks::{hand, HandLandmarks, LandmarkPoint},
};

/// Geometric limits for the Like Song pinch-and-open shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LikeSongThresholds {
    /// Upper bound for the thumb IP to index PIP distance
    pub max_base_distance: f32,
    /// Lower bound for the thumb tip to index tip distance
    pub min_tip_distance: f32,
    /// Lower bound for the thumb/index angle, in degrees
    pub min_angle_deg: f32,
}

impl Default for LikeSongThresholds {
    fn default() -> Self {
        Self {
            max_base_distance: LIKE_BASE_DISTANCE,
            min_tip_distance: LIKE_TIP_DISTANCE,
            min_angle_deg: LIKE_MIN_ANGLE_DEG,
        }
    }
}

/// Extension state of each digit for one hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerStates {
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
    pub thumb_up: bool,
    pub thumb_down: bool,
}

impl FingerStates {
    /// Compute finger states; `lm` must hold at least 21 points.
    #[must_use]
    pub fn from_landmarks(lm: &[LandmarkPoint]) -> Self {
        let extended = |tip: usize, pip: usize| lm[tip].y < lm[pip].y;
        Self {
            index: extended(hand::INDEX_TIP, hand::INDEX_PIP),
            middle: extended(hand::MIDDLE_TIP, hand::MIDDLE_PIP),
            ring: extended(hand::RING_TIP, hand::RING_PIP),
            pinky: extended(hand::PINKY_TIP, hand::PINKY_PIP),
            thumb_up: lm[hand::THUMB_TIP].y < lm[hand::THUMB_IP].y,
            thumb_down: lm[hand::THUMB_TIP].y > lm[hand::THUMB_IP].y,
        }
    }

    #[must_use]
    pub const fn all_extended(&self) -> bool {
        self.index && self.middle && self.ring && self.pinky
    }

    #[must_use]
    pub const fn any_extended(&self) -> bool {
        self.index || self.middle || self.ring || self.pinky
    }

    /// Middle, ring and pinky all folded
    #[must_use]
    pub const fn others_folded(&self) -> bool {
        !self.middle && !self.ring && !self.pinky
    }
}

/// Angle in degrees between two vectors
#[must_use]
pub fn angle_between(v1: (f32, f32), v2: (f32, f32)) -> f32 {
    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let magnitude = v1.0.hypot(v1.1) * v2.0.hypot(v2.1);
    let cos_angle = (dot / (magnitude + ANGLE_EPSILON)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// Rule-based classifier for static hand poses
#[derive(Debug, Clone, Copy, Default)]
pub struct HandGestureClassifier {
    thresholds: LikeSongThresholds,
}

impl HandGestureClassifier {
    #[must_use]
    pub const fn new(thresholds: LikeSongThresholds) -> Self {
        Self { thresholds }
    }

    #[must_use]
    pub const fn thresholds(&self) -> &LikeSongThresholds {
        &self.thresholds
    }

    /// Classify a landmark set; fewer than 21 points gives `Unknown`.
    #[must_use]
    pub fn classify(&self, lm: &[LandmarkPoint]) -> GestureLabel {
        if lm.len() < HAND_LANDMARK_COUNT {
            return GestureLabel::Unknown;
        }

        let fingers = FingerStates::from_landmarks(lm);

        if fingers.others_folded() && self.is_like_shape(lm) {
            return GestureLabel::LikeSong;
        }
        if fingers.all_extended() {
            return GestureLabel::Pause;
        }
        if fingers.index && fingers.middle && !fingers.ring && !fingers.pinky {
            return GestureLabel::Play;
        }
        if fingers.index && fingers.pinky && !fingers.middle && !fingers.ring {
            return GestureLabel::Shuffle;
        }
        if fingers.thumb_up && !fingers.any_extended() {
            return GestureLabel::VolumeUp;
        }
        if fingers.thumb_down && !fingers.any_extended() {
            return GestureLabel::VolumeDown;
        }

        GestureLabel::Unknown
    }

    /// Classify an optional detection; no hand gives `No Hand`.
    #[must_use]
    pub fn classify_hand(&self, hand: Option<&HandLandmarks>) -> GestureLabel {
        hand.map_or(GestureLabel::NoHand, |h| self.classify(&h.points))
    }

    fn is_like_shape(&self, lm: &[LandmarkPoint]) -> bool {
        let thumb_mid = &lm[hand::THUMB_IP];
        let thumb_tip = &lm[hand::THUMB_TIP];
        let index_mid = &lm[hand::INDEX_PIP];
        let index_tip = &lm[hand::INDEX_TIP];

        let base_distance = thumb_mid.distance(index_mid);
        let tip_distance = thumb_tip.distance(index_tip);
        let angle = angle_between(thumb_mid.vector_to(thumb_tip), index_mid.vector_to(index_tip));

        base_distance < self.thresholds.max_base_distance
            && tip_distance > self.thresholds.min_tip_distance
            && angle > self.thresholds.min_angle_deg
    }
}

/// Classify with the default thresholds
#[must_use]
pub fn classify_static_gesture(lm: &[LandmarkPoint]) -> GestureLabel {
    HandGestureClassifier::default().classify(lm)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Open palm: every fingertip well above its PIP joint, thumb beside the index.
    fn open_palm() -> Vec<LandmarkPoint> {
        let mut lm = vec![LandmarkPoint::new(0.5, 0.8); HAND_LANDMARK_COUNT];
        for (pip, tip, x) in [
            (hand::INDEX_PIP, hand::INDEX_TIP, 0.40),
            (hand::MIDDLE_PIP, hand::MIDDLE_TIP, 0.48),
            (hand::RING_PIP, hand::RING_TIP, 0.56),
            (hand::PINKY_PIP, hand::PINKY_TIP, 0.64),
        ] {
            lm[pip] = LandmarkPoint::new(x, 0.5);
            lm[tip] = LandmarkPoint::new(x, 0.3);
        }
        lm[hand::THUMB_IP] = LandmarkPoint::new(0.3, 0.6);
        lm[hand::THUMB_TIP] = LandmarkPoint::new(0.25, 0.55);
        lm
    }

    fn fold(lm: &mut [LandmarkPoint], pip: usize, tip: usize) {
        lm[tip].y = lm[pip].y + 0.1;
    }

    #[test]
    fn test_angle_between() {
        assert!((angle_between((1.0, 0.0), (0.0, 1.0)) - 90.0).abs() < 1e-3);
        assert!(angle_between((1.0, 0.0), (1.0, 0.0)) < 1.0);
        assert!((angle_between((1.0, 0.0), (-1.0, 0.0)) - 180.0).abs() < 0.5);
        // Zero-length vector must not produce NaN
        assert!(angle_between((0.0, 0.0), (1.0, 0.0)).is_finite());
    }

    #[test]
    fn test_too_few_points() {
        assert_eq!(classify_static_gesture(&[]), GestureLabel::Unknown);
        assert_eq!(classify_static_gesture(&open_palm()[..20]), GestureLabel::Unknown);
    }

    #[test]
    fn test_open_palm_is_pause() {
        assert_eq!(classify_static_gesture(&open_palm()), GestureLabel::Pause);
    }

    #[test]
    fn test_finger_states() {
        let mut lm = open_palm();
        fold(&mut lm, hand::RING_PIP, hand::RING_TIP);
        let fingers = FingerStates::from_landmarks(&lm);
        assert!(fingers.index && fingers.middle && fingers.pinky);
        assert!(!fingers.ring);
        assert!(fingers.thumb_up && !fingers.thumb_down);
        assert!(!fingers.all_extended());
        assert!(!fingers.others_folded());
    }

    #[test]
    fn test_no_hand() {
        let classifier = HandGestureClassifier::default();
        assert_eq!(classifier.classify_hand(None), GestureLabel::NoHand);
        let hand = HandLandmarks::new(open_palm());
        assert_eq!(classifier.classify_hand(Some(&hand)), GestureLabel::Pause);
    }
}
