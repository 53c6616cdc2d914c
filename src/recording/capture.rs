use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CaptureError {
    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("capture device busy")]
    DeviceBusy,

    #[error("capture backend failed: {0}")]
    Backend(String),
}

/// Exclusive audio capture resource.
///
/// Only one holder may be active at a time; `acquire()` while active is
/// `DeviceBusy`. Platform capture (CoreAudio, WASAPI, ...) lives behind
/// this seam in the embedding application — the crate ships only
/// `SilenceCapture` for demos and tests.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Acquire the device and start capturing.
    ///
    /// Returns a channel receiver that will receive audio frames until
    /// `release()` is called.
    async fn acquire(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError>;

    /// Stop capturing and release the device. Closing the frame channel
    /// signals downstream writers to finalize.
    async fn release(&mut self) -> Result<(), CaptureError>;

    /// Check if the device is currently held.
    fn is_active(&self) -> bool;

    /// Device name for logging
    fn name(&self) -> &str;
}

/// In-tree capture device emitting 100 ms frames of silence.
pub struct SilenceCapture {
    sample_rate: u32,
    channels: u16,
    feed_task: Option<JoinHandle<()>>,
}

impl SilenceCapture {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            feed_task: None,
        }
    }
}

#[async_trait]
impl CaptureDevice for SilenceCapture {
    async fn acquire(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        if self.feed_task.is_some() {
            return Err(CaptureError::DeviceBusy);
        }

        let (tx, rx) = mpsc::channel(16);
        let sample_rate = self.sample_rate;
        let channels = self.channels;
        let samples_per_frame = (sample_rate as usize / 10) * channels as usize;

        self.feed_task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(100));
            loop {
                interval.tick().await;
                let frame = AudioFrame {
                    samples: vec![0i16; samples_per_frame],
                    sample_rate,
                    channels,
                };
                if tx.send(frame).await.is_err() {
                    break;
                }
            }
        }));

        Ok(rx)
    }

    async fn release(&mut self) -> Result<(), CaptureError> {
        if let Some(task) = self.feed_task.take() {
            // Aborting drops the frame sender, closing the channel. Await
            // the cancellation so the channel is closed before we return.
            task.abort();
            let _ = task.await;
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.feed_task.is_some()
    }

    fn name(&self) -> &str {
        "silence"
    }
}
