//! Per-frame gesture arbitration, action cooldown and dispatch.
//!
//! [`GestureController`] holds everything the event loop needs between frames
//! except the camera and the landmark models, so a full iteration can be
//! driven from tests with synthetic landmarks and timestamps.

use crate::{
    dispatcher::{CommandDispatcher, DispatchOutcome},
    face_motion::FaceMotionDetector,
    gesture::GestureLabel,
    hand_classifier::HandGestureClassifier,
    landmarks::HandLandmarks,
    playback::PlaybackService,
};
use log::debug;
use std::time::{Duration, Instant};

/// Global minimum interval between dispatched actions
#[derive(Debug, Clone)]
pub struct ActionCooldown {
    interval: Duration,
    last_action: Option<Instant>,
}

impl ActionCooldown {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_action: None,
        }
    }

    /// Whether strictly more than `interval` has passed since the last action
    #[must_use]
    pub fn ready(&self, now: Instant) -> bool {
        self.last_action
            .map_or(true, |last| now.saturating_duration_since(last) > self.interval)
    }

    /// Claim the slot if ready, restarting the cooldown clock
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        if self.ready(now) {
            self.last_action = Some(now);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

/// Pick the action for a frame; face motion wins over hand poses.
#[must_use]
pub fn arbitrate(face: GestureLabel, hand: GestureLabel) -> Option<GestureLabel> {
    if face.is_actionable() {
        Some(face)
    } else if hand.is_actionable() {
        Some(hand)
    } else {
        None
    }
}

/// Result of one controller step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub hand: GestureLabel,
    pub face: GestureLabel,
    /// Actionable gesture selected for this frame, dispatched or not
    pub action: Option<GestureLabel>,
    /// Set when the action passed the cooldown and was handed to the dispatcher
    pub dispatch: Option<DispatchOutcome>,
}

impl StepOutcome {
    #[must_use]
    pub const fn dispatched(&self) -> bool {
        self.dispatch.is_some()
    }
}

/// Detectors, cooldown and dispatcher threaded through each loop iteration
pub struct GestureController<P> {
    classifier: HandGestureClassifier,
    face_detector: FaceMotionDetector,
    cooldown: ActionCooldown,
    dispatcher: CommandDispatcher<P>,
    last_action: Option<GestureLabel>,
}

impl<P: PlaybackService> GestureController<P> {
    pub fn new(
        classifier: HandGestureClassifier,
        face_detector: FaceMotionDetector,
        cooldown: ActionCooldown,
        dispatcher: CommandDispatcher<P>,
    ) -> Self {
        Self {
            classifier,
            face_detector,
            cooldown,
            dispatcher,
            last_action: None,
        }
    }

    /// Controller with default thresholds around `dispatcher`
    pub fn with_dispatcher(dispatcher: CommandDispatcher<P>) -> Self {
        Self::new(
            HandGestureClassifier::default(),
            FaceMotionDetector::default(),
            ActionCooldown::new(Duration::from_secs_f64(crate::constants::ACTION_COOLDOWN_SECS)),
            dispatcher,
        )
    }

    /// Whether face landmarks are unnecessary at `now`
    #[must_use]
    pub fn face_locked(&self, now: Instant) -> bool {
        self.face_detector.is_locked(now)
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.dispatcher.is_ready()
    }

    /// Last action handed to the dispatcher
    #[must_use]
    pub const fn last_action(&self) -> Option<GestureLabel> {
        self.last_action
    }

    pub const fn dispatcher(&self) -> &CommandDispatcher<P> {
        &self.dispatcher
    }

    pub const fn face_detector(&self) -> &FaceMotionDetector {
        &self.face_detector
    }

    /// Run one iteration: classify, arbitrate, gate on cooldown, dispatch.
    ///
    /// Gestures arriving during the cooldown are dropped, never queued.
    pub fn step(&mut self, hand: Option<&HandLandmarks>, nose_x: Option<f32>, now: Instant) -> StepOutcome {
        let hand_label = self.classifier.classify_hand(hand);
        let face_label = self.face_detector.update(nose_x, now);
        debug!("hand={hand_label} face={face_label}");

        let action = arbitrate(face_label, hand_label);
        let dispatch = match action {
            Some(label) if self.cooldown.try_acquire(now) => {
                log::info!("Executing command: {label}");
                self.last_action = Some(label);
                Some(self.dispatcher.dispatch(label))
            }
            Some(label) => {
                debug!("{label} dropped during cooldown");
                None
            }
            None => None,
        };

        StepOutcome {
            hand: hand_label,
            face: face_label,
            action,
            dispatch,
        }
    }
}
