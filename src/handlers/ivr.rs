//! IVR call-flow handlers
//!
//! Handlers follow the thin-layer pattern: they log, delegate to
//! [`IvrService`](crate::services::ivr::IvrService), and return its response.

use axum::{
    extract::{Path, State},
    Json,
};
use crate::{
    error::{Error, Result},
    models::{requests::IvrRequest, responses::IvrResponse},
    state::AppState,
};

// ============================================================================
// CREATE SESSION
// ============================================================================

/// POST /api/ivr/session
///
/// Creates a session and connects the call. The response carries the new
/// `sessionId` and the authentication-method prompt.
///
/// # HTTP Status Codes
/// - `200 OK`: Session created
pub async fn create_session(State(state): State<AppState>) -> Result<Json<IvrResponse>> {
    tracing::info!(operation = "create_session", "Creating IVR session");

    let response = state
        .ivr
        .create_session()
        .await
        .inspect_err(|e| log_handler_error("create_session", e))?;

    Ok(Json(response))
}

// ============================================================================
// PROCESS INPUT
// ============================================================================

/// POST /api/ivr/process
///
/// Feeds one caller input to a session.
///
/// # Request Body
/// ```json
/// { "sessionId": "...", "userInput": "1", "inputType": "DTMF" }
/// ```
///
/// # HTTP Status Codes
/// - `200 OK`: Input processed (including unrecognized input, which re-prompts)
/// - `400 BAD_REQUEST`: Missing session id or unacceptable input
/// - `404 NOT_FOUND`: Session unknown, ended or evicted
pub async fn process_input(
    State(state): State<AppState>,
    Json(request): Json<IvrRequest>,
) -> Result<Json<IvrResponse>> {
    tracing::info!(
        operation = "process_input",
        request = ?request,
        "Processing IVR input",
    );

    let response = state
        .ivr
        .process_input(&request)
        .await
        .inspect_err(|e| log_handler_error("process_input", e))?;

    Ok(Json(response))
}

// ============================================================================
// GET SESSION
// ============================================================================

/// GET /api/ivr/session/{session_id}
///
/// Returns the current prompt of a live session.
///
/// # HTTP Status Codes
/// - `200 OK`: Session found
/// - `404 NOT_FOUND`: Session unknown, ended or evicted
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<IvrResponse>> {
    tracing::debug!(operation = "get_session", session_id = %session_id, "Getting session state");

    let response = state
        .ivr
        .current_state(&session_id)
        .await
        .inspect_err(|e| log_handler_error("get_session", e))?;

    Ok(Json(response))
}

// ============================================================================
// END SESSION
// ============================================================================

/// DELETE /api/ivr/session/{session_id}
///
/// Ends a session. Ending the same session again reports 404.
///
/// # HTTP Status Codes
/// - `200 OK`: Session ended
/// - `404 NOT_FOUND`: Session unknown or already ended
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<IvrResponse>> {
    tracing::info!(operation = "end_session", session_id = %session_id, "Ending IVR session");

    let response = state
        .ivr
        .end_session(&session_id)
        .await
        .inspect_err(|e| log_handler_error("end_session", e))?;

    Ok(Json(response))
}

fn log_handler_error(operation: &str, e: &Error) {
    match e {
        Error::Validation(_) | Error::InvalidInput { .. } | Error::SessionNotFound(_) => {
            tracing::warn!(operation = operation, error = %e, "Handler operation failed");
        }
        _ => {
            tracing::error!(operation = operation, error = %e, "Handler operation failed");
        }
    }
}
