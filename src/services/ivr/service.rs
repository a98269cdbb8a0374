//! Session-level IVR operations used by the HTTP handlers.
//!
//! Every operation that touches a session holds its lock from lookup to
//! response rendering, so a reply always reflects the state its own dispatch
//! committed.

use super::input::map_input;
use super::registry::SessionRegistry;
use super::state_machine::{IvrEvent, IvrStateMachine};
use crate::error::Result;
use crate::models::requests::IvrRequest;
use crate::models::responses::IvrResponse;
use crate::validation::{validate_session_id, validate_user_input};
use std::sync::Arc;

pub struct IvrService {
    registry: Arc<SessionRegistry>,
    machine: Arc<IvrStateMachine>,
}

impl IvrService {
    pub fn new(registry: Arc<SessionRegistry>, machine: Arc<IvrStateMachine>) -> Self {
        Self { registry, machine }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn machine(&self) -> &Arc<IvrStateMachine> {
        &self.machine
    }

    /// Creates a session and connects the call.
    pub async fn create_session(&self) -> Result<IvrResponse> {
        let session_id = self.registry.create();
        let mut session = self.registry.lock(&session_id).await?;

        self.machine
            .dispatch(&mut session, IvrEvent::CallConnected, None)
            .await;

        tracing::info!(
            session_id = %session_id,
            state = %session.current_state(),
            "Created new IVR session",
        );

        Ok(IvrResponse::for_state(
            session_id.to_string(),
            session.current_state(),
        ))
    }

    /// Maps caller input to an event and dispatches it.
    ///
    /// Input that means nothing in the current state re-prompts with the
    /// current state's copy. Reaching `END_CALL` ends the session.
    pub async fn process_input(&self, request: &IvrRequest) -> Result<IvrResponse> {
        let session_id = validate_session_id(request.session_id.as_deref())?;
        let mut session = self.registry.lock(&session_id).await?;
        let input = validate_user_input(&session_id, request.user_input.as_deref())?;

        let current_state = session.current_state();
        tracing::info!(
            session_id = %session_id,
            state = %current_state,
            input_type = request.input_type.as_deref().unwrap_or("UNKNOWN"),
            "Processing input",
        );

        let Some(mapped) = map_input(current_state, input) else {
            tracing::debug!(
                session_id = %session_id,
                state = %current_state,
                "Input not recognized, re-prompting",
            );
            session.touch();
            return Ok(IvrResponse::for_state(session_id.to_string(), current_state));
        };

        let outcome = self
            .machine
            .dispatch(&mut session, mapped.event, mapped.payload.as_deref())
            .await;
        let new_state = outcome.state();

        if outcome.is_rejected() {
            session.touch();
        } else if new_state.is_terminal() {
            session.close();
            self.registry.discard(&session_id);
            tracing::info!(session_id = %session_id, "Call ended, session removed");
        }

        Ok(IvrResponse::for_state(session_id.to_string(), new_state))
    }

    /// Renders the current state of a live session.
    pub async fn current_state(&self, raw_session_id: &str) -> Result<IvrResponse> {
        let session_id = validate_session_id(Some(raw_session_id))?;
        let session = self.registry.lock(&session_id).await?;

        Ok(IvrResponse::for_state(
            session_id.to_string(),
            session.current_state(),
        ))
    }

    /// Ends a session on the caller's request.
    pub async fn end_session(&self, raw_session_id: &str) -> Result<IvrResponse> {
        let session_id = validate_session_id(Some(raw_session_id))?;
        self.registry.end(&session_id).await?;

        Ok(IvrResponse::ended(session_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::services::authentication::DemoAuthBackend;
    use crate::services::ivr::actions::ActionExecutor;
    use crate::services::ivr::state_machine::{IvrState, TransitionTable};
    use std::time::Duration;

    fn service() -> IvrService {
        let executor = ActionExecutor::new(Arc::new(DemoAuthBackend::new()), Duration::from_secs(2));
        IvrService::new(
            Arc::new(SessionRegistry::new(50)),
            Arc::new(IvrStateMachine::new(TransitionTable::new(), executor)),
        )
    }

    fn input(session_id: &str, raw: &str) -> IvrRequest {
        IvrRequest {
            session_id: Some(session_id.to_string()),
            user_input: Some(raw.to_string()),
            input_type: Some("DTMF".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_session_connects_call() {
        let service = service();
        let response = service.create_session().await.unwrap();

        assert_eq!(response.current_state, Some(IvrState::AuthenticationMethod));
        assert_eq!(response.next_action.as_deref(), Some("COLLECT_AUTH_METHOD"));
        assert_eq!(service.registry().len(), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_input_reprompts() {
        let service = service();
        let session_id = service.create_session().await.unwrap().session_id.unwrap();

        let response = service.process_input(&input(&session_id, "7")).await.unwrap();

        assert_eq!(response.current_state, Some(IvrState::AuthenticationMethod));
        assert!(response.error_message.is_none());
    }

    #[tokio::test]
    async fn test_end_call_removes_session() {
        let service = service();
        let session_id = service.create_session().await.unwrap().session_id.unwrap();

        for raw in ["1", "123-45-6789"] {
            service.process_input(&input(&session_id, raw)).await.unwrap();
        }
        let response = service.process_input(&input(&session_id, "0")).await.unwrap();

        assert_eq!(response.current_state, Some(IvrState::EndCall));
        assert!(response.call_ended);
        assert!(service.registry().is_empty());
        assert!(matches!(
            service.process_input(&input(&session_id, "1")).await,
            Err(Error::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_end_session_twice() {
        let service = service();
        let session_id = service.create_session().await.unwrap().session_id.unwrap();

        let response = service.end_session(&session_id).await.unwrap();
        assert!(response.call_ended);
        assert!(matches!(
            service.end_session(&session_id).await,
            Err(Error::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_session_id() {
        let service = service();
        let request = IvrRequest {
            user_input: Some("1".to_string()),
            ..IvrRequest::default()
        };

        assert!(matches!(
            service.process_input(&request).await,
            Err(Error::Validation(_))
        ));
    }
}
