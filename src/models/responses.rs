use crate::services::ivr::prompts::project;
use crate::services::ivr::state_machine::IvrState;
use serde::{Deserialize, Serialize};

/// Reply rendered after every IVR operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IvrResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_state: Option<IvrState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_message: Option<String>,
    pub authenticated: bool,
    pub call_ended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl IvrResponse {
    /// The prompt for a session resting in `state`.
    pub fn for_state(session_id: impl Into<String>, state: IvrState) -> Self {
        let prompt = project(state);
        Self {
            session_id: Some(session_id.into()),
            current_state: Some(state),
            next_action: Some(prompt.next_action.to_string()),
            prompt_message: Some(prompt.prompt_message.to_string()),
            authenticated: prompt.authenticated,
            call_ended: prompt.call_ended,
            error_message: None,
        }
    }

    /// An error body, with the session id when the caller supplied one.
    pub fn error(session_id: Option<String>, message: impl Into<String>) -> Self {
        Self {
            session_id,
            error_message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Reply to an explicit end-session request.
    pub fn ended(session_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            current_state: Some(IvrState::EndCall),
            next_action: Some("END_CALL".to_string()),
            prompt_message: Some("Session ended".to_string()),
            authenticated: false,
            call_ended: true,
            error_message: None,
        }
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub active_sessions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_state_uses_prompt_copy() {
        let response = IvrResponse::for_state("abc", IvrState::MainMenu);
        assert_eq!(response.current_state, Some(IvrState::MainMenu));
        assert_eq!(response.next_action.as_deref(), Some("COLLECT_MENU_SELECTION"));
        assert!(response.authenticated);
        assert!(!response.call_ended);
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(IvrResponse::for_state("abc", IvrState::SsnPrompt)).unwrap();
        assert_eq!(json["sessionId"], "abc");
        assert_eq!(json["currentState"], "SSN_PROMPT");
        assert_eq!(json["nextAction"], "COLLECT_SSN");
        assert_eq!(json["authenticated"], false);
        assert!(json.get("errorMessage").is_none());

        let json = serde_json::to_value(IvrResponse::error(None, "Session ID is required")).unwrap();
        assert_eq!(json["errorMessage"], "Session ID is required");
        assert!(json.get("sessionId").is_none());
    }
}
