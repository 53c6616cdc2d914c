use super::state::AppState;
use crate::event::UiState;
use crate::recording::{RecordingError, RecordingState, SessionStatus};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use tracing::{error, info};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Presentation snapshot (prompt text, time left, recording flag)
    #[serde(flatten)]
    pub ui: UiState,
    pub session: SessionStatus,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /prompt/fetch
/// Trigger a prompt fetch; the result lands in the status snapshot.
pub async fn fetch_prompt(State(state): State<AppState>) -> impl IntoResponse {
    info!("Prompt fetch requested");

    state.fetcher.clone().spawn_fetch(state.events.clone());

    (
        StatusCode::ACCEPTED,
        Json(ActionResponse {
            status: "fetching".to_string(),
            message: "Prompt fetch started".to_string(),
        }),
    )
}

/// POST /recording/start
/// Start the timed recording
pub async fn start_recording(State(state): State<AppState>) -> impl IntoResponse {
    match state.session.start().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ActionResponse {
                status: "recording".to_string(),
                message: "Recording started".to_string(),
            }),
        )
            .into_response(),
        Err(RecordingError::AlreadyRecording) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Already recording".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to start recording: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to start recording: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// POST /recording/toggle
/// The single record button: stop when recording, start otherwise.
pub async fn toggle_recording(State(state): State<AppState>) -> impl IntoResponse {
    if state.session.status().await.state == RecordingState::Recording {
        return stop_recording(State(state)).await.into_response();
    }

    start_recording(State(state)).await.into_response()
}

/// POST /recording/stop
/// Stop the recording; a no-op when idle.
pub async fn stop_recording(State(state): State<AppState>) -> impl IntoResponse {
    state.session.stop().await;

    (
        StatusCode::OK,
        Json(ActionResponse {
            status: "stopped".to_string(),
            message: "Recording stopped".to_string(),
        }),
    )
}

/// GET /status
/// Current prompt text, countdown and recording state
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let ui = state.ui.read().await.clone();
    let session = state.session.status().await;

    (StatusCode::OK, Json(StatusResponse { ui, session }))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
