// Tests for the single-consumer event dispatcher

use voiceprompt::event::{self, SessionEvent, StopReason};

#[tokio::test]
async fn dispatcher_applies_events_in_order() {
    let (events, rx) = event::channel();
    let (ui, handle) = event::spawn_dispatcher(rx);

    events.post(SessionEvent::PromptReady("Describe your morning.".to_string()));
    events.post(SessionEvent::RecordingStarted { countdown: 30 });
    events.post(SessionEvent::CountdownTick(29));
    events.post(SessionEvent::CountdownTick(28));
    events.post(SessionEvent::RecordingStopped {
        reason: StopReason::Requested,
    });

    // Closing the channel lets the dispatcher drain and exit.
    drop(events);
    handle.await.unwrap();

    let state = ui.read().await;
    assert_eq!(state.prompt, "Describe your morning.");
    assert_eq!(state.time_left, 28);
    assert!(!state.is_recording);
}

#[tokio::test]
async fn fetch_failure_replaces_prompt_text() {
    let (events, rx) = event::channel();
    let (ui, handle) = event::spawn_dispatcher(rx);

    events.post(SessionEvent::PromptFailed("transport failure: refused".to_string()));

    drop(events);
    handle.await.unwrap();

    let state = ui.read().await;
    assert_eq!(state.prompt, "Error: transport failure: refused");
}

#[tokio::test]
async fn initial_state_shows_invitation_text() {
    let (_events, rx) = event::channel();
    let (ui, _handle) = event::spawn_dispatcher(rx);

    let state = ui.read().await;
    assert_eq!(state.prompt, "Press the button to get a fun prompt!");
    assert_eq!(state.time_left, 0);
    assert!(!state.is_recording);
}
