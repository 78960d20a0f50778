//! Configuration management for the gesture playback controller

use crate::{
    constants::{
        ACTION_COOLDOWN_SECS, DEFAULT_FACE_PRESENCE, DEFAULT_HAND_PRESENCE, DEFAULT_TOKEN_PATH, DEFAULT_VOLUME,
        FACE_HISTORY_SIZE, FACE_LOCKOUT_SECS, FACE_MOTION_THRESHOLD, LIKE_BASE_DISTANCE, LIKE_MIN_ANGLE_DEG,
        LIKE_TIP_DISTANCE, SPOTIFY_ACCOUNTS_BASE, SPOTIFY_API_BASE, SPOTIFY_SCOPE, VOLUME_STEP,
    },
    controller::ActionCooldown,
    face_motion::FaceMotionDetector,
    hand_classifier::{HandGestureClassifier, LikeSongThresholds},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Webcam configuration
    pub camera: CameraConfig,

    /// Landmark model configuration
    pub models: ModelConfig,

    /// Static hand gesture thresholds
    pub hand: HandConfig,

    /// Face motion detection configuration
    pub face_motion: FaceMotionConfig,

    /// Command dispatch configuration
    pub dispatch: DispatchConfig,

    /// Spotify API and authorization settings
    pub spotify: SpotifyConfig,

    /// Display configuration
    pub display: DisplayConfig,
}

/// Webcam parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera index
    pub index: i32,

    /// Mirror frames horizontally before detection
    pub flip_horizontal: bool,

    /// Capture buffer size (1 keeps latency low)
    pub buffer_size: u32,
}

/// Landmark model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the hand landmark ONNX model
    pub hand_landmarks: PathBuf,

    /// Path to the face mesh ONNX model
    pub face_landmarks: PathBuf,

    /// Minimum hand presence score (0.0-1.0)
    pub hand_presence_threshold: f32,

    /// Minimum face presence score (0.0-1.0)
    pub face_presence_threshold: f32,
}

/// Like Song geometry thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandConfig {
    /// Maximum thumb IP to index PIP distance
    pub like_base_distance: f32,

    /// Minimum thumb tip to index tip distance
    pub like_tip_distance: f32,

    /// Minimum thumb/index angle in degrees
    pub like_min_angle_deg: f32,
}

/// Face motion detector parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceMotionConfig {
    /// Number of nose positions compared (split in two halves)
    pub window_size: usize,

    /// Horizontal displacement that fires a gesture
    pub threshold: f32,

    /// Lockout after a fired gesture, in seconds
    pub lockout_secs: f64,
}

/// Dispatch parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Minimum seconds between two dispatched actions
    pub action_cooldown_secs: f64,

    /// Volume change per gesture
    pub volume_step: u8,

    /// Volume assumed when none is reported
    pub default_volume: u8,
}

/// Spotify settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotifyConfig {
    /// Token record written by `spotify-auth`
    pub token_path: PathBuf,

    /// Web API base URL
    pub api_base: String,

    /// Accounts service base URL
    pub accounts_base: String,

    /// Application client id
    pub client_id: String,

    /// Registered redirect URI
    pub redirect_uri: String,

    /// Requested scopes
    pub scope: String,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show the camera window
    pub enabled: bool,

    /// Window title
    pub window_title: String,

    /// Draw detected landmarks on the frame
    pub draw_landmarks: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            flip_horizontal: true,
            buffer_size: 1,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            hand_landmarks: PathBuf::from("assets/hand_landmarks.onnx"),
            face_landmarks: PathBuf::from("assets/face_landmarks.onnx"),
            hand_presence_threshold: DEFAULT_HAND_PRESENCE,
            face_presence_threshold: DEFAULT_FACE_PRESENCE,
        }
    }
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            like_base_distance: LIKE_BASE_DISTANCE,
            like_tip_distance: LIKE_TIP_DISTANCE,
            like_min_angle_deg: LIKE_MIN_ANGLE_DEG,
        }
    }
}

impl Default for FaceMotionConfig {
    fn default() -> Self {
        Self {
            window_size: FACE_HISTORY_SIZE,
            threshold: FACE_MOTION_THRESHOLD,
            lockout_secs: FACE_LOCKOUT_SECS,
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            action_cooldown_secs: ACTION_COOLDOWN_SECS,
            volume_step: VOLUME_STEP,
            default_volume: DEFAULT_VOLUME,
        }
    }
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            api_base: SPOTIFY_API_BASE.to_string(),
            accounts_base: SPOTIFY_ACCOUNTS_BASE.to_string(),
            client_id: String::new(),
            redirect_uri: String::new(),
            scope: SPOTIFY_SCOPE.to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_title: "Gesture Controlled Spotify".to_string(),
            draw_landmarks: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Build the hand classifier from configuration
    #[must_use]
    pub fn hand_classifier(&self) -> HandGestureClassifier {
        HandGestureClassifier::new(LikeSongThresholds {
            max_base_distance: self.hand.like_base_distance,
            min_tip_distance: self.hand.like_tip_distance,
            min_angle_deg: self.hand.like_min_angle_deg,
        })
    }

    /// Build the face motion detector from configuration
    #[must_use]
    pub fn face_motion_detector(&self) -> FaceMotionDetector {
        FaceMotionDetector::new(
            self.face_motion.window_size,
            self.face_motion.threshold,
            Duration::from_secs_f64(self.face_motion.lockout_secs),
        )
    }

    /// Build the global action cooldown from configuration
    #[must_use]
    pub fn action_cooldown(&self) -> ActionCooldown {
        ActionCooldown::new(Duration::from_secs_f64(self.dispatch.action_cooldown_secs))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Validate presence thresholds
        if !(0.0..=1.0).contains(&self.models.hand_presence_threshold) {
            return Err(Error::ConfigError(
                "Hand presence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.models.face_presence_threshold) {
            return Err(Error::ConfigError(
                "Face presence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }

        // Validate hand geometry
        let hand = &self.hand;
        if !(hand.like_base_distance > 0.0 && hand.like_base_distance <= 1.0)
            || !(hand.like_tip_distance > 0.0 && hand.like_tip_distance <= 1.0)
        {
            return Err(Error::ConfigError(
                "Like Song distances must be in (0.0, 1.0]".to_string(),
            ));
        }
        if !(0.0..180.0).contains(&hand.like_min_angle_deg) {
            return Err(Error::ConfigError(
                "Like Song angle must be between 0 and 180 degrees".to_string(),
            ));
        }

        // Validate face motion
        if self.face_motion.window_size < 2 || self.face_motion.window_size % 2 != 0 {
            return Err(Error::ConfigError(
                "Face motion window size must be even and at least 2".to_string(),
            ));
        }
        if !(self.face_motion.threshold > 0.0 && self.face_motion.threshold <= 1.0) {
            return Err(Error::ConfigError(
                "Face motion threshold must be in (0.0, 1.0]".to_string(),
            ));
        }
        if !(self.face_motion.lockout_secs.is_finite() && self.face_motion.lockout_secs > 0.0) {
            return Err(Error::ConfigError("Face motion lockout must be positive".to_string()));
        }

        // Validate dispatch
        if !(self.dispatch.action_cooldown_secs.is_finite() && self.dispatch.action_cooldown_secs > 0.0) {
            return Err(Error::ConfigError("Action cooldown must be positive".to_string()));
        }
        if !(1..=100).contains(&self.dispatch.volume_step) {
            return Err(Error::ConfigError(
                "Volume step must be between 1 and 100".to_string(),
            ));
        }
        if self.dispatch.default_volume > 100 {
            return Err(Error::ConfigError(
                "Default volume must be at most 100".to_string(),
            ));
        }

        Ok(())
    }

    /// Check that both landmark models exist on disk
    pub fn validate_models(&self) -> Result<()> {
        for (name, path) in [
            ("Hand landmark", &self.models.hand_landmarks),
            ("Face landmark", &self.models.face_landmarks),
        ] {
            if !path.exists() {
                return Err(Error::ConfigError(format!(
                    "{name} model not found: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Gesture Controlled Spotify Configuration

# Webcam
camera:
  index: 0
  flip_horizontal: true
  buffer_size: 1

# Landmark models
models:
  hand_landmarks: "assets/hand_landmarks.onnx"
  face_landmarks: "assets/face_landmarks.onnx"
  hand_presence_threshold: 0.7
  face_presence_threshold: 0.5

# Like Song geometry
hand:
  like_base_distance: 0.08
  like_tip_distance: 0.1
  like_min_angle_deg: 60.0

# Head-turn track skipping
face_motion:
  window_size: 10
  threshold: 0.1
  lockout_secs: 3.0

# Command dispatch
dispatch:
  action_cooldown_secs: 3.0
  volume_step: 15
  default_volume: 50

# Spotify
spotify:
  token_path: "token_info.json"
  api_base: "https://api.spotify.com/v1"
  accounts_base: "https://accounts.spotify.com"
  client_id: ""
  redirect_uri: ""
  scope: "user-modify-playback-state user-read-playback-state user-library-modify"

# Display
display:
  enabled: true
  window_title: "Gesture Controlled Spotify"
  draw_landmarks: false
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed = Config::from_yaml("dispatch:\n  volume_step: 10\n").unwrap();
        assert_eq!(parsed.dispatch.volume_step, 10);
        assert_eq!(parsed.dispatch.default_volume, DEFAULT_VOLUME);
        assert_eq!(parsed.face_motion.window_size, FACE_HISTORY_SIZE);
    }

    #[test]
    fn test_invalid_window_size() {
        let mut config = Config::default();
        config.face_motion.window_size = 7;
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_invalid_volume_step() {
        let mut config = Config::default();
        config.dispatch.volume_step = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(Config::from_yaml("camera: [1, 2"), Err(Error::ConfigError(_))));
    }
}
