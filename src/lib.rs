pub mod config;
pub mod event;
pub mod http;
pub mod prompt;
pub mod recording;

pub use config::Config;
pub use event::{EventSender, SessionEvent, StopReason, UiState};
pub use http::{create_router, AppState};
pub use prompt::{extract_content, FetchError, PromptFetcher, PromptRequest};
pub use recording::{
    AudioFrame, CaptureDevice, CaptureError, RecordingError, RecordingSession, RecordingState,
    SessionConfig, SessionStatus, SilenceCapture, SlotWriter,
};
