//! Health check handler

use axum::{extract::State, Json};
use crate::{models::responses::HealthResponse, state::AppState};

/// GET /api/health
///
/// Reports liveness and the number of live sessions.
///
/// # Example
/// ```bash
/// curl http://localhost:8080/api/health
/// # Returns: {"status":"ok","activeSessions":0}
/// ```
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let active_sessions = state.sessions.len();
    tracing::debug!(active_sessions, "Health check requested");

    Json(HealthResponse {
        status: "ok".to_string(),
        active_sessions,
    })
}
