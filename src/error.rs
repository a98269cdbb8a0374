use thiserror::Error;

// Import Axum types for HTTP response conversion
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::responses::IvrResponse;
use crate::services::ivr::state_machine::TransitionError;

/// The custom error type for the application.
#[derive(Debug, Error)]
pub enum Error {
    /// A request rejected at the boundary (missing or malformed field).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Caller input for a known session that cannot be accepted.
    #[error("Invalid input for session {session_id}: {message}")]
    InvalidInput { session_id: String, message: String },

    /// The session was never created, already ended, or evicted.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// The transition table is inconsistent. Fatal at startup.
    #[error("Invalid transition table: {0}")]
    TransitionTable(#[from] TransitionError),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// An I/O error (listener bind, serve).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, Error>` to simplify function signatures.
pub type Result<T> = std::result::Result<T, Error>;

/// Convert custom Error to HTTP response
///
/// Every error is rendered as an IVR response carrying `errorMessage`, so
/// clients parse a single body shape.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = match &self {
            Error::Validation(msg) => IvrResponse::error(None, msg.clone()),
            Error::InvalidInput { session_id, message } => {
                IvrResponse::error(Some(session_id.clone()), message.clone())
            }
            Error::SessionNotFound(session_id) => {
                IvrResponse::error(Some(session_id.clone()), "Session not found")
            }
            Error::TransitionTable(_) | Error::Config(_) | Error::Io(_) | Error::Internal(_) => {
                tracing::error!(error = %self, "Request failed with internal error");
                IvrResponse::error(None, "Internal server error")
            }
        };

        let status = match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Error::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Error::TransitionTable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(body)).into_response()
    }
}
