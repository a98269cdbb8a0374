//! Actions attached to transitions of the IVR call flow.
//!
//! An action runs to completion inside the dispatch that triggered it and
//! reports the internal outcome event (if any) the engine must relay through
//! the transition's target state. Calls to the authentication backend are
//! bounded by a time budget; exceeding it is a failure like any other fault.

use super::session::Credentials;
use super::state_machine::IvrEvent;
use crate::services::authentication::{mask_card_number, mask_ssn, AuthBackend, AuthError, AuthOutcome};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Identifies the action attached to a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    /// Store the SSN and check it with the backend.
    ValidateSsn,
    /// Store the card number; checked later together with the PIN.
    StoreCardNumber,
    /// Store the PIN and check it with the stored card number.
    ValidatePinAndCard,
}

impl ActionId {
    /// Outcome events this action may produce. The transition table must
    /// accept each of them in the transition's target state.
    pub fn possible_outcomes(self) -> &'static [IvrEvent] {
        match self {
            Self::ValidateSsn | Self::ValidatePinAndCard => &[
                IvrEvent::AuthenticationSuccess,
                IvrEvent::AuthenticationFailure,
            ],
            Self::StoreCardNumber => &[],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ValidateSsn => "validate_ssn",
            Self::StoreCardNumber => "store_card_number",
            Self::ValidatePinAndCard => "validate_pin_and_card",
        }
    }
}

/// Faults raised while running an action. The engine turns every one of
/// them into an `AUTHENTICATION_FAILURE` outcome.
#[derive(Debug, Clone, Error)]
pub enum ActionError {
    #[error("Action {action} requires a payload")]
    MissingPayload { action: &'static str },

    #[error("No card number on record for PIN validation")]
    MissingCardNumber,

    #[error("Authentication backend did not answer within {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Backend(#[from] AuthError),
}

/// Runs transition actions against an authentication backend.
#[derive(Clone)]
pub struct ActionExecutor {
    backend: Arc<dyn AuthBackend>,
    timeout: Duration,
}

impl ActionExecutor {
    pub fn new(backend: Arc<dyn AuthBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `action` to completion.
    ///
    /// Returns the outcome event to relay, or `None` for actions whose
    /// transition is unconditional. On error the credentials are left marked
    /// unauthenticated.
    pub async fn execute(
        &self,
        action: ActionId,
        credentials: &mut Credentials,
        payload: Option<&str>,
    ) -> Result<Option<IvrEvent>, ActionError> {
        let result = match action {
            ActionId::ValidateSsn => self.validate_ssn(credentials, payload).await,
            ActionId::StoreCardNumber => Self::store_card_number(credentials, payload),
            ActionId::ValidatePinAndCard => self.validate_pin_and_card(credentials, payload).await,
        };

        if result.is_err() {
            credentials.mark_unauthenticated();
        }
        result
    }

    async fn validate_ssn(
        &self,
        credentials: &mut Credentials,
        payload: Option<&str>,
    ) -> Result<Option<IvrEvent>, ActionError> {
        let ssn = payload.ok_or(ActionError::MissingPayload {
            action: ActionId::ValidateSsn.name(),
        })?;
        tracing::debug!(ssn = %mask_ssn(ssn), "Validating SSN");

        credentials.set_ssn(ssn);
        let outcome = self
            .bounded(self.backend.authenticate_by_ssn(ssn))
            .await?;

        Ok(Some(Self::apply_outcome(credentials, outcome)))
    }

    fn store_card_number(
        credentials: &mut Credentials,
        payload: Option<&str>,
    ) -> Result<Option<IvrEvent>, ActionError> {
        let card_number = payload.ok_or(ActionError::MissingPayload {
            action: ActionId::StoreCardNumber.name(),
        })?;
        tracing::debug!(card = %mask_card_number(card_number), "Storing card number");

        credentials.set_card_number(card_number);
        Ok(None)
    }

    async fn validate_pin_and_card(
        &self,
        credentials: &mut Credentials,
        payload: Option<&str>,
    ) -> Result<Option<IvrEvent>, ActionError> {
        let pin = payload.ok_or(ActionError::MissingPayload {
            action: ActionId::ValidatePinAndCard.name(),
        })?;
        credentials.set_pin(pin);

        let card_number = credentials
            .card_number()
            .ok_or(ActionError::MissingCardNumber)?
            .to_string();
        tracing::debug!(card = %mask_card_number(&card_number), "Validating card and PIN");

        let outcome = self
            .bounded(self.backend.authenticate_by_card_and_pin(&card_number, pin))
            .await?;

        Ok(Some(Self::apply_outcome(credentials, outcome)))
    }

    async fn bounded<F>(&self, call: F) -> Result<AuthOutcome, ActionError>
    where
        F: Future<Output = Result<AuthOutcome, AuthError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ActionError::Timeout(self.timeout)),
        }
    }

    fn apply_outcome(credentials: &mut Credentials, outcome: AuthOutcome) -> IvrEvent {
        match outcome.into_customer_id() {
            Some(customer_id) => {
                tracing::info!(customer_id = %customer_id, "Authentication successful");
                credentials.mark_authenticated(customer_id);
                IvrEvent::AuthenticationSuccess
            }
            None => {
                tracing::info!("Authentication rejected");
                credentials.mark_unauthenticated();
                IvrEvent::AuthenticationFailure
            }
        }
    }
}
