//! Error types for the gesture playback controller.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` operation failed
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// `ONNX` Runtime inference failed
    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(#[from] ort::OrtError),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport failed before a response was received
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model loading or inference error
    #[error("Model error: {0}")]
    ModelError(String),

    /// Model input configuration error
    #[error("Model input error: {0}")]
    ModelInputError(String),

    /// Model output processing error
    #[error("Model output error: {0}")]
    ModelOutputError(String),

    /// Model data shape or format error
    #[error("Model data format error: {0}")]
    ModelDataFormatError(String),

    /// Token record is absent or unusable
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Playback service answered with a non-success status
    #[error("Playback service error ({status}): {message}")]
    Service {
        /// HTTP status code returned by the service
        status: u16,
        /// Error message reported by the service
        message: String,
    },

    /// Playback service has no device to control
    #[error("No active playback device")]
    NoActiveDevice,

    /// Authorization flow failed
    #[error("Authorization error: {0}")]
    Auth(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Whether this error came from the playback service or its transport.
    ///
    /// Such errors are swallowed by the dispatcher; the next qualifying
    /// gesture retries the same intent.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Json(_) | Self::Service { .. } | Self::NoActiveDevice
        )
    }
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        let err = Error::Service {
            status: 403,
            message: "Player command failed: Premium required".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Playback service error (403): Player command failed: Premium required"
        );
        assert!(err.is_transient());
    }

    #[test]
    fn test_credential_error_is_not_transient() {
        let err = Error::MissingCredential("token_info.json not found".to_string());
        assert!(!err.is_transient());
        assert!(err.to_string().contains("token_info.json"));
    }
}
