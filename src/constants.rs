//! Constants used throughout the application

/// Number of points in a hand landmark set
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Number of points produced by the face mesh model
pub const FACE_LANDMARK_COUNT: usize = 468;

/// Coordinates emitted per landmark by the ONNX exports (x, y, z)
pub const LANDMARK_MODEL_COORDS: usize = 3;

/// Hand landmark model input size
pub const HAND_MODEL_INPUT_SIZE: i32 = 224;

/// Face mesh model input size
pub const FACE_MODEL_INPUT_SIZE: i32 = 192;

/// Like Song: thumb IP to index PIP distance must stay below this
pub const LIKE_BASE_DISTANCE: f32 = 0.08;

/// Like Song: thumb tip to index tip distance must exceed this
pub const LIKE_TIP_DISTANCE: f32 = 0.1;

/// Like Song: minimum angle between thumb and index vectors (degrees)
pub const LIKE_MIN_ANGLE_DEG: f32 = 60.0;

/// Guards the angle computation against zero-length vectors
pub const ANGLE_EPSILON: f32 = 1e-6;

/// Number of nose positions kept by the face motion detector
pub const FACE_HISTORY_SIZE: usize = 10;

/// Horizontal displacement (normalized) that fires a motion gesture
pub const FACE_MOTION_THRESHOLD: f32 = 0.10;

/// Face motion lockout after a fired gesture (seconds)
pub const FACE_LOCKOUT_SECS: f64 = 3.0;

/// Global cooldown between dispatched actions (seconds)
pub const ACTION_COOLDOWN_SECS: f64 = 3.0;

/// Volume change per gesture (percentage points)
pub const VOLUME_STEP: u8 = 15;

/// Volume assumed when the service reports none
pub const DEFAULT_VOLUME: u8 = 50;

/// Default minimum presence score for a hand
pub const DEFAULT_HAND_PRESENCE: f32 = 0.7;

/// Default minimum presence score for a face
pub const DEFAULT_FACE_PRESENCE: f32 = 0.5;

/// Permissions requested from the authorization server
pub const SPOTIFY_SCOPE: &str = "user-modify-playback-state user-read-playback-state user-library-modify";

/// Web API base URL
pub const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";

/// Accounts service base URL
pub const SPOTIFY_ACCOUNTS_BASE: &str = "https://accounts.spotify.com";

/// Default location of the persisted token record
pub const DEFAULT_TOKEN_PATH: &str = "token_info.json";
