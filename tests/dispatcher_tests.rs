//! Gesture to playback command execution against a recording service


use gesture_spotify::{
    dispatcher::{CommandDispatcher, DispatchOutcome, PlaybackCommand},
    gesture::GestureLabel,
    playback::PlaybackState,
};
use test_helpers::{playing, Call, RecordingService};

fn calls_for(service: RecordingService, label: GestureLabel) -> (DispatchOutcome, Vec<Call>) {
    let dispatcher = CommandDispatcher::new(service);
    let outcome = dispatcher.dispatch(label);
    let calls = dispatcher.service().map(RecordingService::calls).unwrap_or_default();
    (outcome, calls)
}

#[test]
fn test_simple_commands_skip_state_read() {
    for (label, call) in [
        (GestureLabel::Play, Call::Play),
        (GestureLabel::Pause, Call::Pause),
        (GestureLabel::NextTrack, Call::Next),
        (GestureLabel::PreviousTrack, Call::Previous),
        (GestureLabel::Shuffle, Call::Shuffle(true)),
    ] {
        let (outcome, calls) = calls_for(RecordingService::default(), label);
        assert!(outcome.is_executed(), "{label}");
        assert_eq!(calls, vec![call]);
    }
}

#[test]
fn test_volume_steps() {
    let (_, calls) = calls_for(
        RecordingService::with_state(playing(Some(40), None)),
        GestureLabel::VolumeUp,
    );
    assert_eq!(calls, vec![Call::CurrentPlayback, Call::Volume(55)]);

    let (_, calls) = calls_for(
        RecordingService::with_state(playing(Some(10), None)),
        GestureLabel::VolumeDown,
    );
    assert_eq!(calls, vec![Call::CurrentPlayback, Call::Volume(0)]);
}

#[test]
fn test_volume_defaults_without_device() {
    let (outcome, calls) = calls_for(RecordingService::default(), GestureLabel::VolumeUp);
    assert_eq!(outcome, DispatchOutcome::Executed(PlaybackCommand::SetVolume(65)));
    assert_eq!(calls.last(), Some(&Call::Volume(65)));

    let no_device = PlaybackState {
        device: None,
        ..playing(None, Some("t"))
    };
    let (_, calls) = calls_for(RecordingService::with_state(no_device), GestureLabel::VolumeDown);
    assert_eq!(calls.last(), Some(&Call::Volume(35)));
}

#[test]
fn test_custom_volume_step() {
    let dispatcher =
        CommandDispatcher::new(RecordingService::with_state(playing(Some(50), None))).with_volume(5, 50);
    assert_eq!(
        dispatcher.dispatch(GestureLabel::VolumeDown),
        DispatchOutcome::Executed(PlaybackCommand::SetVolume(45))
    );
}

#[test]
fn test_like_song() {
    let (outcome, calls) = calls_for(
        RecordingService::with_state(playing(Some(50), Some("4uLU6hMCjMI75M1A2tKUQC"))),
        GestureLabel::LikeSong,
    );
    assert!(outcome.is_executed());
    assert_eq!(
        calls,
        vec![
            Call::CurrentPlayback,
            Call::Save(vec!["4uLU6hMCjMI75M1A2tKUQC".to_string()])
        ]
    );
}

#[test]
fn test_like_song_without_track_is_skipped() {
    let (outcome, calls) = calls_for(RecordingService::default(), GestureLabel::LikeSong);
    assert_eq!(outcome, DispatchOutcome::Skipped);
    assert_eq!(calls, vec![Call::CurrentPlayback]);

    // Local files carry no track id
    let (outcome, _) = calls_for(
        RecordingService::with_state(playing(Some(50), None)),
        GestureLabel::LikeSong,
    );
    assert_eq!(outcome, DispatchOutcome::Skipped);
}

#[test]
fn test_service_errors_are_swallowed() {
    let (outcome, calls) = calls_for(RecordingService::failing(), GestureLabel::NextTrack);
    assert!(matches!(outcome, DispatchOutcome::Failed(_)));
    assert_eq!(calls, vec![Call::Next]);
}

#[test]
fn test_non_actionable_labels() {
    for label in [GestureLabel::Unknown, GestureLabel::NoHand, GestureLabel::None] {
        let (outcome, calls) = calls_for(RecordingService::default(), label);
        assert_eq!(outcome, DispatchOutcome::NotActionable);
        assert!(calls.is_empty());
    }
}

#[test]
fn test_not_ready_refuses() {
    let dispatcher: CommandDispatcher<RecordingService> = CommandDispatcher::not_ready("missing token");
    assert!(!dispatcher.is_ready());
    assert_eq!(dispatcher.dispatch(GestureLabel::Play), DispatchOutcome::NotReady);
}
