//! Gesture labels shared by the detectors, the controller and the dispatcher.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Result of classifying one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureLabel {
    Play,
    Pause,
    NextTrack,
    PreviousTrack,
    VolumeUp,
    VolumeDown,
    Shuffle,
    LikeSong,
    /// Input present but matching no rule
    Unknown,
    /// No hand in the frame
    NoHand,
    /// Detector locked out
    None,
}

impl GestureLabel {
    /// All labels, in declaration order
    pub const ALL: [Self; 11] = [
        Self::Play,
        Self::Pause,
        Self::NextTrack,
        Self::PreviousTrack,
        Self::VolumeUp,
        Self::VolumeDown,
        Self::Shuffle,
        Self::LikeSong,
        Self::Unknown,
        Self::NoHand,
        Self::None,
    ];

    /// Whether the label maps to a playback command
    #[must_use]
    pub const fn is_actionable(self) -> bool {
        !matches!(self, Self::Unknown | Self::NoHand | Self::None)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::Pause => "Pause",
            Self::NextTrack => "Next Track",
            Self::PreviousTrack => "Previous Track",
            Self::VolumeUp => "Volume Up",
            Self::VolumeDown => "Volume Down",
            Self::Shuffle => "Shuffle",
            Self::LikeSong => "Like Song",
            Self::Unknown => "Unknown",
            Self::NoHand => "No Hand",
            Self::None => "None",
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GestureLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown gesture label: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(GestureLabel::NextTrack.to_string(), "Next Track");
        assert_eq!(GestureLabel::LikeSong.to_string(), "Like Song");
        assert_eq!(GestureLabel::NoHand.to_string(), "No Hand");
    }

    #[test]
    fn test_parse_labels() {
        for label in GestureLabel::ALL {
            assert_eq!(label.as_str().parse::<GestureLabel>().unwrap(), label);
        }
        assert_eq!("volume up".parse::<GestureLabel>().unwrap(), GestureLabel::VolumeUp);
        assert!("Wave".parse::<GestureLabel>().is_err());
    }

    #[test]
    fn test_actionable_subset() {
        let actionable: Vec<_> = GestureLabel::ALL.into_iter().filter(|l| l.is_actionable()).collect();
        assert_eq!(actionable.len(), 8);
        assert!(!GestureLabel::Unknown.is_actionable());
        assert!(!GestureLabel::NoHand.is_actionable());
        assert!(!GestureLabel::None.is_actionable());
    }
}
