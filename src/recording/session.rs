use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::capture::{AudioFrame, CaptureDevice, CaptureError};
use super::slot::SlotWriter;
use crate::event::{EventSender, SessionEvent, StopReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingState {
    Idle,
    Recording,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RecordingError {
    #[error("already recording")]
    AlreadyRecording,

    #[error("failed to acquire capture device: {0}")]
    Acquisition(#[from] CaptureError),

    #[error("failed to open artifact slot: {0}")]
    Slot(String),
}

/// Configuration for a recording session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The single artifact slot; each recording overwrites it.
    pub slot_path: PathBuf,

    /// Answer window in seconds.
    /// Default: 30
    pub countdown_secs: u32,

    /// Sample rate of the artifact
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono, 2 = stereo)
    pub channels: u16,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            slot_path: PathBuf::from("response.wav"),
            countdown_secs: 30,
            sample_rate: 44100,
            channels: 2,
        }
    }
}

/// Snapshot of the session for status queries.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub state: RecordingState,
    pub countdown: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub artifact_path: PathBuf,
}

/// A timed recording session.
///
/// States: {Idle, Recording}, initially Idle, reusable across runs.
/// `start()` acquires the exclusive capture device, opens the artifact
/// slot and arms a 1 Hz countdown; when the countdown reaches zero the
/// session stops itself exactly as an explicit `stop()` would. The tick
/// schedule is cancelled on every exit path: explicit stop, countdown
/// expiry, and teardown.
#[derive(Clone)]
pub struct RecordingSession {
    config: SessionConfig,
    inner: Arc<Mutex<Inner>>,
    events: EventSender,
}

struct Inner {
    state: RecordingState,
    countdown: u32,
    started_at: Option<DateTime<Utc>>,
    capture: Box<dyn CaptureDevice>,
    tick_task: Option<JoinHandle<()>>,
    writer_task: Option<JoinHandle<()>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        // Teardown exit path: never leak a ticker into a discarded session.
        if let Some(task) = self.tick_task.take() {
            task.abort();
        }
        if let Some(task) = self.writer_task.take() {
            task.abort();
        }
    }
}

impl RecordingSession {
    pub fn new(config: SessionConfig, capture: Box<dyn CaptureDevice>, events: EventSender) -> Self {
        Self {
            config,
            inner: Arc::new(Mutex::new(Inner {
                state: RecordingState::Idle,
                countdown: 0,
                started_at: None,
                capture,
                tick_task: None,
                writer_task: None,
            })),
            events,
        }
    }

    /// Start recording into the artifact slot and arm the countdown.
    ///
    /// From Recording this rejects with `AlreadyRecording`: the countdown
    /// keeps running and the held device is untouched.
    pub async fn start(&self) -> Result<(), RecordingError> {
        let mut inner = self.inner.lock().await;

        if inner.state == RecordingState::Recording {
            warn!("start() while already recording");
            return Err(RecordingError::AlreadyRecording);
        }

        let frames = inner.capture.acquire().await?;

        let writer = match SlotWriter::create(
            &self.config.slot_path,
            self.config.sample_rate,
            self.config.channels,
        ) {
            Ok(w) => w,
            Err(e) => {
                // The slot never opened; give the device back and stay Idle.
                if let Err(re) = inner.capture.release().await {
                    warn!("Failed to release capture device after slot error: {}", re);
                }
                return Err(RecordingError::Slot(e.to_string()));
            }
        };

        inner.state = RecordingState::Recording;
        inner.countdown = self.config.countdown_secs;
        inner.started_at = Some(Utc::now());
        inner.writer_task = Some(spawn_writer(frames, writer));
        inner.tick_task = Some(self.spawn_ticker());

        info!(
            "Recording started: {} ({}s window, device: {})",
            self.config.slot_path.display(),
            self.config.countdown_secs,
            inner.capture.name()
        );

        self.events.post(SessionEvent::RecordingStarted {
            countdown: self.config.countdown_secs,
        });

        Ok(())
    }

    /// Advance the countdown by one second. No-op while Idle. Reaching
    /// zero performs the same transition as an explicit `stop()`.
    pub async fn tick(&self) -> RecordingState {
        let mut inner = self.inner.lock().await;

        if inner.state != RecordingState::Recording {
            return RecordingState::Idle;
        }

        inner.countdown = inner.countdown.saturating_sub(1);
        self.events.post(SessionEvent::CountdownTick(inner.countdown));

        if inner.countdown == 0 {
            self.stop_locked(&mut inner, StopReason::Expired).await;
        }

        inner.state
    }

    /// Stop recording, finalize the artifact, cancel the tick schedule.
    /// Idempotent: calling while Idle is a no-op.
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;

        if inner.state != RecordingState::Recording {
            return;
        }

        self.stop_locked(&mut inner, StopReason::Requested).await;
    }

    pub async fn status(&self) -> SessionStatus {
        let inner = self.inner.lock().await;

        SessionStatus {
            state: inner.state,
            countdown: inner.countdown,
            started_at: inner.started_at,
            artifact_path: self.config.slot_path.clone(),
        }
    }

    async fn stop_locked(&self, inner: &mut Inner, reason: StopReason) {
        inner.state = RecordingState::Idle;

        if let Err(e) = inner.capture.release().await {
            warn!("Failed to release capture device: {}", e);
        }

        // Releasing the device closed the frame channel; the writer task
        // drains remaining frames and finalizes the slot.
        if let Some(task) = inner.writer_task.take() {
            if let Err(e) = task.await {
                error!("Artifact writer task panicked: {}", e);
            }
        }

        // On the expiry path this aborts the task we are running inside;
        // abort only lands at the next await, so the tick completes.
        if let Some(task) = inner.tick_task.take() {
            task.abort();
        }

        info!("Recording stopped ({:?})", reason);

        self.events.post(SessionEvent::RecordingStopped { reason });
    }

    fn spawn_ticker(&self) -> JoinHandle<()> {
        let session = self.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first interval tick completes immediately; the countdown
            // starts one second after start().
            interval.tick().await;

            loop {
                interval.tick().await;
                if session.tick().await == RecordingState::Idle {
                    break;
                }
            }
        })
    }
}

fn spawn_writer(mut frames: mpsc::Receiver<AudioFrame>, mut writer: SlotWriter) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            if let Err(e) = writer.write_frame(&frame) {
                // Device failure mid-recording leaves a truncated artifact.
                error!("Failed to write audio frame: {}", e);
                break;
            }
        }

        if let Err(e) = writer.finalize() {
            warn!("Failed to finalize artifact: {}", e);
        }
    })
}
