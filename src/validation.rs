//! Boundary validation of IVR requests.
//!
//! Requests are checked here before they reach the registry or the engine.

use crate::error::{Error, Result};
use crate::services::ivr::session::SessionId;

/// Longest raw input accepted from a caller.
pub const MAX_INPUT_LENGTH: usize = 64;

/// Validates and parses a session id from a request.
///
/// A missing or blank id is a validation error. A value that is not a
/// session id at all cannot name a live session, so it is reported as not
/// found.
///
/// # Examples
/// ```
/// use ivr::validation::validate_session_id;
/// use ivr::error::Error;
///
/// assert!(matches!(validate_session_id(None), Err(Error::Validation(_))));
/// assert!(matches!(validate_session_id(Some("nope")), Err(Error::SessionNotFound(_))));
/// ```
pub fn validate_session_id(raw: Option<&str>) -> Result<SessionId> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(Error::Validation("Session ID is required".to_string()));
    }

    raw.parse()
        .map_err(|_| Error::SessionNotFound(raw.to_string()))
}

/// Validates raw caller input. Absent input is treated as empty.
pub fn validate_user_input<'a>(session_id: &SessionId, raw: Option<&'a str>) -> Result<&'a str> {
    let input = raw.unwrap_or_default();

    if input.chars().count() > MAX_INPUT_LENGTH {
        return Err(Error::InvalidInput {
            session_id: session_id.to_string(),
            message: format!("Input is too long (max {} characters)", MAX_INPUT_LENGTH),
        });
    }

    if input.chars().any(char::is_control) {
        return Err(Error::InvalidInput {
            session_id: session_id.to_string(),
            message: "Input contains invalid characters".to_string(),
        });
    }

    Ok(input)
}
