//! Webcam gesture control for Spotify playback.
//!
//! Each camera frame goes through the same pipeline:
//! 1. Hand and face landmarks are extracted (ONNX Runtime via `OpenCV` frames)
//! 2. The hand pose is classified into a static gesture
//! 3. Horizontal nose movement is checked for a next/previous swipe
//! 4. Face motion wins over the hand gesture, and a global cooldown gates
//!    how often commands reach the playback service
//!
//! Everything after landmark extraction is plain data and can be driven
//! without a camera.
//!
//! # Examples
//!
//! ## Classifying a hand pose
//!
//! ```
//! use gesture_spotify::{hand_classifier::HandGestureClassifier, landmarks::LandmarkPoint};
//!
//! let classifier = HandGestureClassifier::default();
//! let too_few = vec![LandmarkPoint::new(0.5, 0.5); 5];
//! assert_eq!(classifier.classify(&too_few).as_str(), "Unknown");
//! ```
//!
//! ## Face motion
//!
//! ```
//! use gesture_spotify::{face_motion::FaceMotionDetector, gesture::GestureLabel};
//! use std::time::Instant;
//!
//! let mut detector = FaceMotionDetector::default();
//! let now = Instant::now();
//! for x in [0.0, 0.0, 0.0, 0.0, 0.0, 0.15, 0.15, 0.15, 0.15] {
//!     assert_eq!(detector.update(Some(x), now), GestureLabel::Unknown);
//! }
//! assert_eq!(detector.update(Some(0.15), now), GestureLabel::NextTrack);
//! assert_eq!(detector.update(Some(0.15), now), GestureLabel::None);
//! ```
//!
//! ## Full loop
//!
//! ```no_run
//! use gesture_spotify::app::{AppConfig, GestureApp};
//! use gesture_spotify::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut app = GestureApp::new(AppConfig {
//!     config: Config::from_file("config.yaml")?,
//!     dry_run: false,
//! })?;
//! app.run()?;
//! # Ok(())
//! # }
//! ```

/// Gesture labels shared by every stage
pub mod gesture;

/// Normalized hand and face landmark types
pub mod landmarks;

/// Static hand pose classification
pub mod hand_classifier;

/// Horizontal head swipe detection
pub mod face_motion;

/// ONNX landmark regressors
pub mod landmark_model;

/// Frame to landmark extraction
pub mod landmark_source;

/// Spotify Web API client
pub mod playback;

/// Gesture to playback command mapping
pub mod dispatcher;

/// Per-frame arbitration and cooldown
pub mod controller;

/// Persisted OAuth token record
pub mod token;

/// OAuth PKCE authorization flow
pub mod auth;

/// Utility functions for image processing and coordinate transformations
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
