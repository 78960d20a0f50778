//! Maps gesture labels to playback commands and executes them.
//!
//! Dispatch never fails from the caller's point of view: service errors are
//! logged and reported through [`DispatchOutcome`] so the event loop keeps
//! running.

use crate::{
    constants::{DEFAULT_VOLUME, VOLUME_STEP},
    gesture::GestureLabel,
    playback::{PlaybackService, PlaybackState, SpotifyClient},
    Result,
};
use log::{error, info, warn};
use std::fmt;
use std::path::Path;

/// A single remote playback-control call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackCommand {
    Play,
    Pause,
    NextTrack,
    PreviousTrack,
    SetVolume(u8),
    SetShuffle(bool),
    SaveTrack(String),
}

impl fmt::Display for PlaybackCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Play => write!(f, "start playback"),
            Self::Pause => write!(f, "pause playback"),
            Self::NextTrack => write!(f, "skip to next track"),
            Self::PreviousTrack => write!(f, "skip to previous track"),
            Self::SetVolume(v) => write!(f, "set volume to {v}%"),
            Self::SetShuffle(s) => write!(f, "set shuffle {s}"),
            Self::SaveTrack(id) => write!(f, "save track {id}"),
        }
    }
}

/// What happened to a dispatch request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The command was sent and accepted
    Executed(PlaybackCommand),
    /// Nothing to do (e.g. Like Song with no playing track)
    Skipped,
    /// The service call failed; the error was logged
    Failed(String),
    /// No credential was loaded
    NotReady,
    /// Label has no command
    NotActionable,
}

impl DispatchOutcome {
    #[must_use]
    pub const fn is_executed(&self) -> bool {
        matches!(self, Self::Executed(_))
    }
}

/// Apply `delta` to the current volume, clamped to 0..=100.
///
/// `current` falls back to `default` when the service reports no volume.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped into 0..=100
pub fn adjusted_volume(current: Option<u8>, delta: i16, default: u8) -> u8 {
    let base = i16::from(current.unwrap_or(default));
    (base + delta).clamp(0, 100) as u8
}

/// Executes playback commands for actionable gestures
pub struct CommandDispatcher<P> {
    service: Option<P>,
    volume_step: u8,
    default_volume: u8,
}

impl<P: PlaybackService> CommandDispatcher<P> {
    /// Create a ready dispatcher around a service
    pub fn new(service: P) -> Self {
        Self {
            service: Some(service),
            volume_step: VOLUME_STEP,
            default_volume: DEFAULT_VOLUME,
        }
    }

    /// Create an inert dispatcher that refuses every command
    pub fn not_ready(reason: &str) -> Self {
        error!("Playback control unavailable: {reason}");
        Self {
            service: None,
            volume_step: VOLUME_STEP,
            default_volume: DEFAULT_VOLUME,
        }
    }

    /// Override the volume step and fallback volume
    #[must_use]
    pub fn with_volume(mut self, step: u8, default: u8) -> Self {
        self.volume_step = step;
        self.default_volume = default.min(100);
        self
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.service.is_some()
    }

    /// Borrow the underlying service
    pub fn service(&self) -> Option<&P> {
        self.service.as_ref()
    }

    /// Resolve the command for `label` given the current playback state.
    ///
    /// Returns `None` for non-actionable labels and for Like Song without a
    /// playing track.
    #[must_use]
    pub fn resolve(&self, label: GestureLabel, state: Option<&PlaybackState>) -> Option<PlaybackCommand> {
        let step = i16::from(self.volume_step);
        let volume = state.and_then(PlaybackState::volume);
        match label {
            GestureLabel::Play => Some(PlaybackCommand::Play),
            GestureLabel::Pause => Some(PlaybackCommand::Pause),
            GestureLabel::NextTrack => Some(PlaybackCommand::NextTrack),
            GestureLabel::PreviousTrack => Some(PlaybackCommand::PreviousTrack),
            GestureLabel::VolumeUp => Some(PlaybackCommand::SetVolume(adjusted_volume(
                volume,
                step,
                self.default_volume,
            ))),
            GestureLabel::VolumeDown => Some(PlaybackCommand::SetVolume(adjusted_volume(
                volume,
                -step,
                self.default_volume,
            ))),
            GestureLabel::Shuffle => Some(PlaybackCommand::SetShuffle(true)),
            GestureLabel::LikeSong => state
                .and_then(PlaybackState::track_id)
                .map(|id| PlaybackCommand::SaveTrack(id.to_string())),
            GestureLabel::Unknown | GestureLabel::NoHand | GestureLabel::None => None,
        }
    }

    /// Perform the playback call for `label`, swallowing service errors.
    pub fn dispatch(&self, label: GestureLabel) -> DispatchOutcome {
        if !label.is_actionable() {
            return DispatchOutcome::NotActionable;
        }
        let Some(service) = &self.service else {
            warn!("Not authenticated, ignoring {label}");
            return DispatchOutcome::NotReady;
        };

        match self.try_dispatch(service, label) {
            Ok(Some(command)) => {
                info!("{label}: {command}");
                DispatchOutcome::Executed(command)
            }
            Ok(None) => {
                info!("{label}: nothing to do");
                DispatchOutcome::Skipped
            }
            Err(e) if e.is_transient() => {
                warn!("Error executing {label}: {e}");
                DispatchOutcome::Failed(e.to_string())
            }
            Err(e) => {
                error!("Error executing {label}: {e}");
                DispatchOutcome::Failed(e.to_string())
            }
        }
    }

    fn try_dispatch(&self, service: &P, label: GestureLabel) -> Result<Option<PlaybackCommand>> {
        let state = if needs_state(label) {
            service.current_playback()?
        } else {
            None
        };

        let Some(command) = self.resolve(label, state.as_ref()) else {
            return Ok(None);
        };

        match &command {
            PlaybackCommand::Play => service.start_playback()?,
            PlaybackCommand::Pause => service.pause_playback()?,
            PlaybackCommand::NextTrack => service.next_track()?,
            PlaybackCommand::PreviousTrack => service.previous_track()?,
            PlaybackCommand::SetVolume(v) => service.set_volume(*v)?,
            PlaybackCommand::SetShuffle(s) => service.set_shuffle(*s)?,
            PlaybackCommand::SaveTrack(id) => service.save_tracks(std::slice::from_ref(id))?,
        }
        Ok(Some(command))
    }
}

impl CommandDispatcher<SpotifyClient> {
    /// Build a dispatcher from the persisted token record.
    ///
    /// A missing or malformed record yields a not-ready dispatcher rather than
    /// an error.
    pub fn from_token_file<P: AsRef<Path>>(path: P, api_base: &str) -> Self {
        match SpotifyClient::from_token_file(path, Some(api_base)) {
            Ok(client) => {
                info!("Spotify client ready");
                Self::new(client)
            }
            Err(e) => Self::not_ready(&e.to_string()),
        }
    }
}

/// Labels whose command depends on the current playback state
const fn needs_state(label: GestureLabel) -> bool {
    matches!(
        label,
        GestureLabel::VolumeUp | GestureLabel::VolumeDown | GestureLabel::LikeSong
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::{Device, Track};

    struct NoopService;

    impl PlaybackService for NoopService {
        fn current_playback(&self) -> Result<Option<PlaybackState>> {
            Ok(None)
        }
        fn start_playback(&self) -> Result<()> {
            Ok(())
        }
        fn pause_playback(&self) -> Result<()> {
            Ok(())
        }
        fn next_track(&self) -> Result<()> {
            Ok(())
        }
        fn previous_track(&self) -> Result<()> {
            Ok(())
        }
        fn set_volume(&self, _percent: u8) -> Result<()> {
            Ok(())
        }
        fn set_shuffle(&self, _state: bool) -> Result<()> {
            Ok(())
        }
        fn save_tracks(&self, _ids: &[String]) -> Result<()> {
            Ok(())
        }
    }

    fn state(volume: Option<u8>, track: Option<&str>) -> PlaybackState {
        PlaybackState {
            device: Some(Device {
                id: Some("dev".to_string()),
                name: "Desktop".to_string(),
                is_active: true,
                volume_percent: volume,
            }),
            item: track.map(|id| Track {
                id: Some(id.to_string()),
                name: "Song".to_string(),
            }),
            is_playing: true,
            shuffle_state: false,
        }
    }

    #[test]
    fn test_adjusted_volume() {
        assert_eq!(adjusted_volume(Some(40), 15, 50), 55);
        assert_eq!(adjusted_volume(Some(95), 15, 50), 100);
        assert_eq!(adjusted_volume(Some(10), -15, 50), 0);
        assert_eq!(adjusted_volume(None, 15, 50), 65);
        assert_eq!(adjusted_volume(None, -15, 50), 35);
    }

    #[test]
    fn test_resolve_commands() {
        let dispatcher = CommandDispatcher::new(NoopService);
        let playing = state(Some(70), Some("track1"));
        assert_eq!(dispatcher.resolve(GestureLabel::Play, None), Some(PlaybackCommand::Play));
        assert_eq!(
            dispatcher.resolve(GestureLabel::VolumeUp, Some(&playing)),
            Some(PlaybackCommand::SetVolume(85))
        );
        assert_eq!(
            dispatcher.resolve(GestureLabel::Shuffle, None),
            Some(PlaybackCommand::SetShuffle(true))
        );
        assert_eq!(
            dispatcher.resolve(GestureLabel::LikeSong, Some(&playing)),
            Some(PlaybackCommand::SaveTrack("track1".to_string()))
        );
        assert_eq!(dispatcher.resolve(GestureLabel::LikeSong, None), None);
        assert_eq!(dispatcher.resolve(GestureLabel::Unknown, Some(&playing)), None);
    }

    #[test]
    fn test_custom_volume_step() {
        let dispatcher = CommandDispatcher::new(NoopService).with_volume(10, 30);
        assert_eq!(
            dispatcher.resolve(GestureLabel::VolumeDown, None),
            Some(PlaybackCommand::SetVolume(20))
        );
    }

    #[test]
    fn test_not_ready_refuses() {
        let dispatcher: CommandDispatcher<NoopService> = CommandDispatcher::not_ready("no token");
        assert!(!dispatcher.is_ready());
        assert_eq!(dispatcher.dispatch(GestureLabel::Play), DispatchOutcome::NotReady);
    }

    #[test]
    fn test_non_actionable_label() {
        let dispatcher = CommandDispatcher::new(NoopService);
        assert_eq!(dispatcher.dispatch(GestureLabel::NoHand), DispatchOutcome::NotActionable);
    }
}
