//! Session event channel and dispatcher
//!
//! Background work (the prompt fetch, the countdown ticker, recording
//! transitions) never touches presentation state directly. It posts
//! `SessionEvent`s onto a single channel; one dispatcher task applies them
//! to a shared `UiState` snapshot. This makes the ordering contract
//! explicit: no two state mutations race, and a completion arriving after
//! the consumer is gone is silently dropped.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::info;

/// Why a recording stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Explicit stop request.
    Requested,
    /// Countdown reached zero.
    Expired,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Prompt fetch succeeded; payload is the content string verbatim.
    PromptReady(String),
    /// Prompt fetch failed; payload is a human-readable message.
    PromptFailed(String),
    /// Countdown value after a tick.
    CountdownTick(u32),
    RecordingStarted { countdown: u32 },
    RecordingStopped { reason: StopReason },
}

/// Presentation-facing snapshot the dispatcher keeps up to date.
#[derive(Debug, Clone, Serialize)]
pub struct UiState {
    pub prompt: String,
    pub time_left: u32,
    pub is_recording: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            prompt: "Press the button to get a fun prompt!".to_string(),
            time_left: 0,
            is_recording: false,
        }
    }
}

/// Posting half of the event channel. Cheap to clone.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl EventSender {
    /// Post an event. A closed channel means the consumer has been torn
    /// down; late completions are dropped rather than surfaced.
    pub fn post(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }
}

pub fn channel() -> (EventSender, mpsc::UnboundedReceiver<SessionEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, rx)
}

/// Spawn the single-consumer dispatcher applying events to a shared
/// `UiState`. Returns the state handle and the task handle.
pub fn spawn_dispatcher(
    mut rx: mpsc::UnboundedReceiver<SessionEvent>,
) -> (Arc<RwLock<UiState>>, JoinHandle<()>) {
    let state = Arc::new(RwLock::new(UiState::default()));
    let dispatch_state = Arc::clone(&state);

    let handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let mut ui = dispatch_state.write().await;
            match event {
                SessionEvent::PromptReady(text) => {
                    ui.prompt = text;
                }
                SessionEvent::PromptFailed(message) => {
                    // Mirrors the user-visible behavior: the error message
                    // takes the place of the prompt text.
                    ui.prompt = format!("Error: {}", message);
                }
                SessionEvent::CountdownTick(remaining) => {
                    ui.time_left = remaining;
                }
                SessionEvent::RecordingStarted { countdown } => {
                    ui.is_recording = true;
                    ui.time_left = countdown;
                }
                SessionEvent::RecordingStopped { reason } => {
                    ui.is_recording = false;
                    info!("Recording stopped ({:?})", reason);
                }
            }
        }
    });

    (state, handle)
}
