//! Timed recording sessions
//!
//! This module provides the `RecordingSession` abstraction that manages:
//! - Exclusive acquisition of an audio capture device
//! - Writing the single fixed artifact slot (overwritten per session)
//! - The 30-second countdown with auto-stop at zero
//! - State-change events for the presentation layer

pub mod capture;
pub mod session;
pub mod slot;

pub use capture::{AudioFrame, CaptureDevice, CaptureError, SilenceCapture};
pub use session::{RecordingError, RecordingSession, RecordingState, SessionConfig, SessionStatus};
pub use slot::SlotWriter;
