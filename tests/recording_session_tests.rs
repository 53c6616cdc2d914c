// Integration tests for the timed recording session
//
// These tests drive the Idle/Recording state machine directly through
// start/tick/stop and verify the countdown, the single-slot artifact
// semantics, and the exclusive capture device contract.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::mpsc;
use voiceprompt::event::{self, SessionEvent, StopReason};
use voiceprompt::recording::{
    AudioFrame, CaptureDevice, CaptureError, RecordingError, RecordingSession, RecordingState,
    SessionConfig,
};

/// Scriptable capture device: fails on demand, counts acquisitions, and
/// hands the test a sender to feed frames through.
struct StubCapture {
    fail_with: Option<CaptureError>,
    acquires: Arc<AtomicUsize>,
    frame_tx: Arc<Mutex<Option<mpsc::Sender<AudioFrame>>>>,
}

impl StubCapture {
    fn new() -> (Self, Arc<AtomicUsize>, Arc<Mutex<Option<mpsc::Sender<AudioFrame>>>>) {
        let acquires = Arc::new(AtomicUsize::new(0));
        let frame_tx = Arc::new(Mutex::new(None));
        let stub = Self {
            fail_with: None,
            acquires: Arc::clone(&acquires),
            frame_tx: Arc::clone(&frame_tx),
        };
        (stub, acquires, frame_tx)
    }

    fn failing(err: CaptureError) -> Self {
        Self {
            fail_with: Some(err),
            acquires: Arc::new(AtomicUsize::new(0)),
            frame_tx: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl CaptureDevice for StubCapture {
    async fn acquire(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }

        self.acquires.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel(64);
        *self.frame_tx.lock().unwrap() = Some(tx);
        Ok(rx)
    }

    async fn release(&mut self) -> Result<(), CaptureError> {
        // Dropping the sender closes the frame channel.
        self.frame_tx.lock().unwrap().take();
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.frame_tx.lock().unwrap().is_some()
    }

    fn name(&self) -> &str {
        "stub"
    }
}

fn frame(samples: usize) -> AudioFrame {
    AudioFrame {
        samples: vec![100i16; samples],
        sample_rate: 44100,
        channels: 2,
    }
}

fn test_config(dir: &TempDir) -> SessionConfig {
    SessionConfig {
        slot_path: dir.path().join("response.wav"),
        countdown_secs: 30,
        sample_rate: 44100,
        channels: 2,
    }
}

#[tokio::test]
async fn countdown_expiry_auto_stops_exactly_once() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let (stub, acquires, _frames) = StubCapture::new();
    let (events, mut rx) = event::channel();

    let session = RecordingSession::new(test_config(&temp_dir), Box::new(stub), events);

    session.start().await?;

    // Drive the full 30-second window by hand.
    for _ in 0..30 {
        session.tick().await;
    }

    let status = session.status().await;
    assert_eq!(status.state, RecordingState::Idle);
    assert_eq!(status.countdown, 0);
    assert_eq!(acquires.load(Ordering::SeqCst), 1);

    // An extra stop afterwards is a no-op.
    session.stop().await;

    let mut stops = 0;
    while let Ok(event) = rx.try_recv() {
        if let SessionEvent::RecordingStopped { reason } = event {
            assert_eq!(reason, StopReason::Expired);
            stops += 1;
        }
    }
    assert_eq!(stops, 1, "auto-stop should fire exactly once");

    Ok(())
}

#[tokio::test]
async fn tick_never_goes_negative() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let (stub, _, _) = StubCapture::new();
    let (events, _rx) = event::channel();

    let session = RecordingSession::new(test_config(&temp_dir), Box::new(stub), events);

    session.start().await?;
    for _ in 0..45 {
        session.tick().await;
    }

    assert_eq!(session.status().await.countdown, 0);
    Ok(())
}

#[tokio::test]
async fn tick_while_idle_is_noop() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let (stub, _, _) = StubCapture::new();
    let (events, _rx) = event::channel();

    let session = RecordingSession::new(test_config(&temp_dir), Box::new(stub), events);

    assert_eq!(session.tick().await, RecordingState::Idle);
    assert_eq!(session.status().await.countdown, 0);
    Ok(())
}

#[tokio::test]
async fn restart_resets_countdown_and_overwrites_slot() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let (stub, _, frame_tx) = StubCapture::new();
    let (events, _rx) = event::channel();

    let config = test_config(&temp_dir);
    let slot_path = config.slot_path.clone();
    let session = RecordingSession::new(config, Box::new(stub), events);

    // First run: two frames, 200 samples total.
    session.start().await?;
    {
        let tx = frame_tx.lock().unwrap().clone().unwrap();
        tx.send(frame(100)).await?;
        tx.send(frame(100)).await?;
    }
    session.tick().await;
    session.tick().await;
    session.stop().await;

    let first_len = hound::WavReader::open(&slot_path)?.len();
    assert_eq!(first_len, 200);

    // Second run: the slot is overwritten, not appended, and the
    // countdown resets to the full window.
    session.start().await?;
    assert_eq!(session.status().await.countdown, 30);
    assert_eq!(session.status().await.state, RecordingState::Recording);
    {
        let tx = frame_tx.lock().unwrap().clone().unwrap();
        tx.send(frame(40)).await?;
    }
    session.stop().await;

    let second_len = hound::WavReader::open(&slot_path)?.len();
    assert_eq!(second_len, 40, "slot should hold only the new recording");

    Ok(())
}

#[tokio::test]
async fn start_while_recording_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let (stub, acquires, _frames) = StubCapture::new();
    let (events, _rx) = event::channel();

    let session = RecordingSession::new(test_config(&temp_dir), Box::new(stub), events);

    session.start().await?;
    session.tick().await;
    session.tick().await;

    let err = session.start().await.unwrap_err();
    assert!(matches!(err, RecordingError::AlreadyRecording));

    // The countdown keeps its value and the device was not re-acquired.
    assert_eq!(session.status().await.countdown, 28);
    assert_eq!(acquires.load(Ordering::SeqCst), 1);

    session.stop().await;
    Ok(())
}

#[tokio::test]
async fn failed_acquire_leaves_session_idle() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let stub = StubCapture::failing(CaptureError::DeviceBusy);
    let (events, _rx) = event::channel();

    let session = RecordingSession::new(test_config(&temp_dir), Box::new(stub), events);

    let err = session.start().await.unwrap_err();
    assert!(matches!(
        err,
        RecordingError::Acquisition(CaptureError::DeviceBusy)
    ));

    let status = session.status().await;
    assert_eq!(status.state, RecordingState::Idle);
    assert_eq!(status.countdown, 0);

    // No tick schedule was armed: the countdown must stay put across a
    // full timer period.
    tokio::time::sleep(std::time::Duration::from_millis(1200)).await;
    assert_eq!(session.status().await.countdown, 0);

    // start() fails before opening the slot, so no artifact appears.
    assert!(!test_config(&temp_dir).slot_path.exists());

    Ok(())
}

#[tokio::test]
async fn ticker_runs_on_wall_clock() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let (stub, _, _) = StubCapture::new();
    let (events, _rx) = event::channel();

    let session = RecordingSession::new(test_config(&temp_dir), Box::new(stub), events);

    session.start().await?;
    assert_eq!(session.status().await.countdown, 30);

    // After a bit over one second the session's own schedule has ticked.
    tokio::time::sleep(std::time::Duration::from_millis(1300)).await;
    let countdown = session.status().await.countdown;
    assert!(countdown < 30, "ticker should have fired, got {countdown}");

    session.stop().await;
    Ok(())
}

#[tokio::test]
async fn dropping_session_while_recording_does_not_panic() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let (stub, _, _) = StubCapture::new();
    let (events, rx) = event::channel();

    let session = RecordingSession::new(test_config(&temp_dir), Box::new(stub), events);
    session.start().await?;

    // Teardown path: consumer and session vanish mid-recording. The tick
    // schedule is aborted by the session's own cleanup.
    drop(rx);
    drop(session);

    tokio::time::sleep(std::time::Duration::from_millis(1200)).await;
    Ok(())
}
