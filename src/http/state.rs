use crate::event::{EventSender, UiState};
use crate::prompt::PromptFetcher;
use crate::recording::RecordingSession;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The one recording session this service owns
    pub session: RecordingSession,

    /// Chat-completion client
    pub fetcher: Arc<PromptFetcher>,

    /// Dispatcher-maintained presentation snapshot
    pub ui: Arc<RwLock<UiState>>,

    /// Posting half of the session event channel
    pub events: EventSender,
}
