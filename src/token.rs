//! Persisted OAuth token record.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Token record written by the authorization flow and read at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Bearer token for the Web API
    pub access_token: String,

    /// Token type, normally "Bearer"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Lifetime of the access token in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,

    /// Token used to obtain a new access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Granted scopes, space separated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Unix time (seconds) at which the token was obtained
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obtained_at: Option<u64>,
}

impl TokenRecord {
    /// Load a token record from a JSON file
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if the file is absent, is not valid
    /// JSON, or holds an empty access token.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::MissingCredential(format!("{} could not be read: {e}", path.display()))
        })?;
        Self::from_json(&content)
            .map_err(|e| Error::MissingCredential(format!("{}: {e}", path.display())))
    }

    /// Parse a token record from JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the access token is empty.
    pub fn from_json(content: &str) -> Result<Self> {
        let record: Self = serde_json::from_str(content)?;
        if record.access_token.trim().is_empty() {
            return Err(Error::MissingCredential("access token is empty".to_string()));
        }
        Ok(record)
    }

    /// Save the record as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Stamp the record with the current time
    #[must_use]
    pub fn stamped_now(mut self) -> Self {
        self.obtained_at = Some(unix_now());
        self
    }

    /// Whether the access token has expired at `now` (Unix seconds).
    ///
    /// Records without timing information are assumed valid.
    #[must_use]
    pub fn is_expired(&self, now: u64) -> bool {
        match (self.obtained_at, self.expires_in) {
            (Some(obtained), Some(lifetime)) => now >= obtained.saturating_add(lifetime),
            _ => false,
        }
    }
}

/// Current Unix time in seconds
#[must_use]
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_response() {
        let json = r#"{
            "access_token": "BQD-abc",
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "AQC-xyz",
            "scope": "user-read-playback-state"
        }"#;
        let record = TokenRecord::from_json(json).unwrap();
        assert_eq!(record.access_token, "BQD-abc");
        assert_eq!(record.expires_in, Some(3600));
        assert_eq!(record.obtained_at, None);
        assert!(!record.is_expired(u64::MAX));
    }

    #[test]
    fn test_empty_access_token_rejected() {
        let result = TokenRecord::from_json(r#"{"access_token": ""}"#);
        assert!(matches!(result, Err(Error::MissingCredential(_))));
    }

    #[test]
    fn test_missing_access_token_rejected() {
        assert!(TokenRecord::from_json(r#"{"refresh_token": "abc"}"#).is_err());
    }

    #[test]
    fn test_expiry() {
        let record = TokenRecord {
            access_token: "tok".to_string(),
            token_type: None,
            expires_in: Some(3600),
            refresh_token: None,
            scope: None,
            obtained_at: Some(1_000),
        };
        assert!(!record.is_expired(4_599));
        assert!(record.is_expired(4_600));
    }

    #[test]
    fn test_load_missing_file() {
        let result = TokenRecord::load("/nonexistent/token_info.json");
        assert!(matches!(result, Err(Error::MissingCredential(_))));
    }
}
