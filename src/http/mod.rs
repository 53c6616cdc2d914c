//! HTTP API standing in for the presentation layer
//!
//! The surrounding UI binds to these routes:
//! - POST /prompt/fetch - Trigger a prompt fetch
//! - POST /recording/start - Start the timed recording
//! - POST /recording/stop - Stop the recording (idempotent)
//! - POST /recording/toggle - The single record button

//! - GET /status - Prompt text, countdown, recording state
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
