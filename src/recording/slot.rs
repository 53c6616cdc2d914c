use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::capture::AudioFrame;

/// Writes "the current recording" to one well-known file.
///
/// Creating the writer truncates whatever the previous session left in
/// the slot — overwrite, never append. A mid-recording failure leaves a
/// truncated artifact; that is accepted, not corrected.
pub struct SlotWriter {
    writer: Option<hound::WavWriter<BufWriter<File>>>,
    path: PathBuf,
    samples_written: usize,
}

impl SlotWriter {
    pub fn create(path: impl AsRef<Path>, sample_rate: u32, channels: u16) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create artifact directory")?;
            }
        }

        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let writer = hound::WavWriter::create(&path, spec)
            .with_context(|| format!("Failed to create artifact slot: {:?}", path))?;

        info!(
            "Artifact slot opened: {} ({}Hz, {} channels)",
            path.display(),
            sample_rate,
            channels
        );

        Ok(Self {
            writer: Some(writer),
            path,
            samples_written: 0,
        })
    }

    pub fn write_frame(&mut self, frame: &AudioFrame) -> Result<()> {
        if let Some(writer) = &mut self.writer {
            for &sample in &frame.samples {
                writer
                    .write_sample(sample)
                    .context("Failed to write sample to artifact slot")?;
            }
            self.samples_written += frame.samples.len();
        }

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn samples_written(&self) -> usize {
        self.samples_written
    }

    pub fn finalize(mut self) -> Result<PathBuf> {
        if let Some(writer) = self.writer.take() {
            writer.finalize().context("Failed to finalize artifact slot")?;
        }

        info!(
            "Artifact finalized: {} ({} samples)",
            self.path.display(),
            self.samples_written
        );

        Ok(std::mem::take(&mut self.path))
    }
}

impl Drop for SlotWriter {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            if let Err(e) = writer.finalize() {
                warn!("Failed to finalize artifact slot on drop: {}", e);
            }
        }
    }
}
