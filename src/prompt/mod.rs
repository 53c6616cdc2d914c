//! Prompt fetching from an OpenAI-compatible chat-completion endpoint
//!
//! One outbound POST per user action, single attempt, no retries. The
//! request template asks for a short conversational prompt answerable in
//! 30 seconds; the response's `choices[0].message.content` is surfaced
//! verbatim.

mod fetcher;
mod parse;
mod request;

pub use fetcher::PromptFetcher;
pub use parse::extract_content;
pub use request::{ChatMessage, PromptRequest};

/// Failure taxonomy for a single fetch attempt. Every variant is terminal;
/// a retry requires a fresh user-initiated fetch.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("no data received")]
    EmptyResponse,

    #[error("unable to parse response")]
    Parse {
        /// Raw response body, kept for diagnostic logging by the caller.
        raw: String,
    },
}
