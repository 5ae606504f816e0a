use super::state::AppState;
use crate::session::{SessionConfig, SessionStats, TranscriptSession};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    /// Optional session ID (if not provided, generate UUID)
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StopSessionResponse {
    pub session_id: String,
    pub status: String,
    pub message: String,
    pub stats: SessionStats,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /sessions/start
/// Start consuming a new session's transcript event stream
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> impl IntoResponse {
    let session_id = req
        .session_id
        .unwrap_or_else(|| format!("classroom-{}", uuid::Uuid::new_v4()));

    info!("Starting transcript session: {}", session_id);

    // Check if already active
    {
        let sessions = state.sessions.read().await;
        if sessions.contains_key(&session_id) {
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: format!("Session {} is already active", session_id),
                }),
            )
                .into_response();
        }
    }

    let config = SessionConfig {
        session_id: session_id.clone(),
        nats_url: state.nats_url.clone(),
        reveal_chars_per_sec: state.reveal_chars_per_sec,
    };

    let session = match TranscriptSession::new(config).await {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("Failed to create session: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to create session: {}", e),
                }),
            )
                .into_response();
        }
    };

    if let Err(e) = session.start().await {
        error!("Failed to start session: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to start session: {}", e),
            }),
        )
            .into_response();
    }

    {
        let mut sessions = state.sessions.write().await;
        sessions.insert(session_id.clone(), session);
    }

    info!("Session started successfully: {}", session_id);

    (
        StatusCode::OK,
        Json(StartSessionResponse {
            session_id: session_id.clone(),
            status: "active".to_string(),
            message: format!("Session {} started", session_id),
        }),
    )
        .into_response()
}

/// POST /sessions/stop/:session_id
/// Stop a session and return its final statistics
pub async fn stop_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    info!("Stopping transcript session: {}", session_id);

    let session = {
        let mut sessions = state.sessions.write().await;
        sessions.remove(&session_id)
    };

    match session {
        Some(session) => match session.stop().await {
            Ok(stats) => {
                info!("Session stopped successfully: {}", session_id);
                (
                    StatusCode::OK,
                    Json(StopSessionResponse {
                        session_id: session_id.clone(),
                        status: "stopped".to_string(),
                        message: "Session stopped".to_string(),
                        stats,
                    }),
                )
                    .into_response()
            }
            Err(e) => {
                error!("Failed to stop session: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: format!("Failed to stop session: {}", e),
                    }),
                )
                    .into_response()
            }
        },
        None => {
            error!("Session {} not found", session_id);
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Session {} not found", session_id),
                }),
            )
                .into_response()
        }
    }
}

/// GET /sessions/:session_id/status
/// Get statistics for a session
pub async fn get_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&session_id) {
        Some(session) => match session.get_stats().await {
            Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
            Err(e) => {
                error!("Failed to get stats: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: format!("Failed to get stats: {}", e),
                    }),
                )
                    .into_response()
            }
        },
        None => session_not_found(&session_id),
    }
}

/// GET /sessions/:session_id/segments
/// Raw transcript state snapshot (segments, cursor, stats)
pub async fn get_session_segments(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&session_id) {
        Some(session) => (StatusCode::OK, Json(session.snapshot().await)).into_response(),
        None => session_not_found(&session_id),
    }
}

/// GET /sessions/:session_id/transcript
/// Chat-style grouped transcript view
pub async fn get_session_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&session_id) {
        Some(session) => (StatusCode::OK, Json(session.grouped_view().await)).into_response(),
        None => session_not_found(&session_id),
    }
}

/// GET /sessions/:session_id/timeline
/// Speaking-timeline view (null when nothing to draw)
pub async fn get_session_timeline(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&session_id) {
        Some(session) => (StatusCode::OK, Json(session.timeline_view().await)).into_response(),
        None => session_not_found(&session_id),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

fn session_not_found(session_id: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Session {} not found", session_id),
        }),
    )
        .into_response()
}
