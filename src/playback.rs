//! Playback-control service interface and its Spotify Web API client.

use crate::{constants::SPOTIFY_API_BASE, token::TokenRecord, Error, Result};
use log::debug;
use reqwest::{
    blocking::{Client, RequestBuilder, Response},
    header::CONTENT_LENGTH,
    StatusCode,
};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Device currently receiving playback commands
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Device {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    /// Volume in percent; absent for devices without volume control
    #[serde(default)]
    pub volume_percent: Option<u8>,
}

/// Currently playing item
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Track {
    /// Track identifier; local files have none
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

/// Snapshot returned by `GET /me/player`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct PlaybackState {
    #[serde(default)]
    pub device: Option<Device>,
    #[serde(default)]
    pub item: Option<Track>,
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub shuffle_state: bool,
}

impl PlaybackState {
    /// Volume of the active device, if reported
    #[must_use]
    pub fn volume(&self) -> Option<u8> {
        self.device.as_ref().and_then(|d| d.volume_percent)
    }

    /// Identifier of the playing track, if any
    #[must_use]
    pub fn track_id(&self) -> Option<&str> {
        self.item.as_ref().and_then(|t| t.id.as_deref())
    }
}

/// Operations offered by a remote playback-control service
pub trait PlaybackService {
    /// Current playback, or `None` when nothing is playing anywhere
    fn current_playback(&self) -> Result<Option<PlaybackState>>;

    fn start_playback(&self) -> Result<()>;

    fn pause_playback(&self) -> Result<()>;

    fn next_track(&self) -> Result<()>;

    fn previous_track(&self) -> Result<()>;

    /// Set absolute volume, 0..=100
    fn set_volume(&self, percent: u8) -> Result<()>;

    fn set_shuffle(&self, state: bool) -> Result<()>;

    /// Add tracks to the user's liked collection
    fn save_tracks(&self, ids: &[String]) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    reason: Option<String>,
}

/// Blocking Spotify Web API client
pub struct SpotifyClient {
    http: Client,
    api_base: String,
    access_token: String,
}

impl SpotifyClient {
    /// Create a client with a bearer token
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(access_token: impl Into<String>, api_base: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    /// Create a client from a persisted token record
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if the record cannot be loaded.
    pub fn from_token_file<P: AsRef<Path>>(path: P, api_base: Option<&str>) -> Result<Self> {
        let record = TokenRecord::load(path)?;
        Self::new(record.access_token, api_base.unwrap_or(SPOTIFY_API_BASE))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.bearer_auth(&self.access_token).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(api_error(status, &body))
    }

    /// Send a player command with an empty body
    fn command(&self, request: RequestBuilder) -> Result<()> {
        self.send(request.header(CONTENT_LENGTH, 0))?;
        Ok(())
    }
}

/// Map an error response to a library error
pub(crate) fn api_error(status: StatusCode, body: &str) -> Error {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
    if parsed
        .as_ref()
        .and_then(|b| b.error.reason.as_deref())
        .is_some_and(|reason| reason == "NO_ACTIVE_DEVICE")
    {
        return Error::NoActiveDevice;
    }
    let message = parsed.map_or_else(|| body.trim().to_string(), |b| b.error.message);
    Error::Service {
        status: status.as_u16(),
        message,
    }
}

impl PlaybackService for SpotifyClient {
    fn current_playback(&self) -> Result<Option<PlaybackState>> {
        let response = self.send(self.http.get(self.url("/me/player")))?;
        if response.status() == StatusCode::NO_CONTENT {
            debug!("No active playback");
            return Ok(None);
        }
        let text = response.text()?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn start_playback(&self) -> Result<()> {
        self.command(self.http.put(self.url("/me/player/play")))
    }

    fn pause_playback(&self) -> Result<()> {
        self.command(self.http.put(self.url("/me/player/pause")))
    }

    fn next_track(&self) -> Result<()> {
        self.command(self.http.post(self.url("/me/player/next")))
    }

    fn previous_track(&self) -> Result<()> {
        self.command(self.http.post(self.url("/me/player/previous")))
    }

    fn set_volume(&self, percent: u8) -> Result<()> {
        let percent = percent.min(100).to_string();
        self.command(
            self.http
                .put(self.url("/me/player/volume"))
                .query(&[("volume_percent", percent.as_str())]),
        )
    }

    fn set_shuffle(&self, state: bool) -> Result<()> {
        let state = if state { "true" } else { "false" };
        self.command(self.http.put(self.url("/me/player/shuffle")).query(&[("state", state)]))
    }

    fn save_tracks(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let body = serde_json::json!({ "ids": ids });
        self.send(self.http.put(self.url("/me/tracks")).json(&body))?;
        Ok(())
    }
}
