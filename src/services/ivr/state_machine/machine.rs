//! The IVR state machine interpreter.
//!
//! [`IvrStateMachine::dispatch`] looks up the transition for a session's
//! current state, runs the attached action synchronously, relays the action's
//! outcome (and the `AUTHENTICATED` auto-advance) through the table within the
//! same call, and commits exactly one resting state to the session.

use super::{
    event::IvrEvent,
    state::IvrState,
    transition::{Transition, MAX_RELAY_HOPS},
    TransitionTable,
};
use crate::services::ivr::actions::ActionExecutor;
use crate::services::ivr::session::Session;
use chrono::{DateTime, Utc};

/// A log entry recording one transition taken during a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionLog {
    pub from: IvrState,
    pub event: IvrEvent,
    pub to: IvrState,
    pub timestamp: DateTime<Utc>,
}

impl TransitionLog {
    /// Creates a new transition log entry.
    pub fn new(from: IvrState, event: IvrEvent, to: IvrState) -> Self {
        Self {
            from,
            event,
            to,
            timestamp: Utc::now(),
        }
    }
}

/// The result of an accepted dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    /// The resting state before the dispatch
    pub from: IvrState,
    /// The resting state committed by the dispatch
    pub new_state: IvrState,
    /// Whether the state actually changed
    pub state_changed: bool,
    /// Number of table transitions taken, relay hops included
    pub hops: usize,
}

/// What happened to a dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The event matched a transition and a new state was committed.
    Applied(StateTransition),
    /// The event is not valid in the current state; nothing changed.
    Rejected { state: IvrState, event: IvrEvent },
}

impl DispatchOutcome {
    /// The session's resting state after the dispatch.
    pub fn state(&self) -> IvrState {
        match self {
            Self::Applied(transition) => transition.new_state,
            Self::Rejected { state, .. } => *state,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Interprets the transition table for IVR sessions.
///
/// The machine itself is stateless and shared by every session; the caller
/// serializes dispatches on one session by holding its lock.
pub struct IvrStateMachine {
    transition_table: TransitionTable,
    executor: ActionExecutor,
}

impl IvrStateMachine {
    pub fn new(transition_table: TransitionTable, executor: ActionExecutor) -> Self {
        Self {
            transition_table,
            executor,
        }
    }

    /// Returns a reference to the transition table.
    pub fn transition_table(&self) -> &TransitionTable {
        &self.transition_table
    }

    /// Delivers `event` to `session`.
    ///
    /// Relay states (`VALIDATING`, `AUTHENTICATED`) are resolved before this
    /// returns, so the committed state is always a resting state. An action
    /// fault is logged and treated as an `AUTHENTICATION_FAILURE` outcome.
    pub async fn dispatch(
        &self,
        session: &mut Session,
        event: IvrEvent,
        payload: Option<&str>,
    ) -> DispatchOutcome {
        let from = session.current_state();
        let session_id = session.id();

        let Some(entry) = self.transition_table.get(from, event) else {
            tracing::debug!(
                session_id = %session_id,
                state = %from,
                event = %event,
                "Transition rejected",
            );
            return DispatchOutcome::Rejected { state: from, event };
        };

        let mut transition: Transition = *entry;
        let mut payload = payload;
        let mut state = from;
        let mut steps = Vec::with_capacity(2);

        loop {
            steps.push(TransitionLog::new(state, transition.event, transition.to));
            state = transition.to;

            let mut next_event = match transition.action {
                Some(action) => {
                    match self
                        .executor
                        .execute(action, session.credentials_mut(), payload)
                        .await
                    {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            tracing::error!(
                                session_id = %session_id,
                                action = action.name(),
                                error = %e,
                                "Action failed, treating as authentication failure",
                            );
                            Some(IvrEvent::AuthenticationFailure)
                        }
                    }
                }
                None => None,
            };
            payload = None;

            if next_event.is_none() && state == IvrState::Authenticated {
                next_event = Some(IvrEvent::AuthenticationSuccess);
            }

            let Some(next_event) = next_event else {
                break;
            };

            if steps.len() >= MAX_RELAY_HOPS {
                tracing::error!(
                    session_id = %session_id,
                    state = %state,
                    "Relay limit reached, stopping dispatch",
                );
                break;
            }

            match self.transition_table.get(state, next_event) {
                Some(next) => transition = *next,
                None => {
                    tracing::error!(
                        session_id = %session_id,
                        state = %state,
                        event = %next_event,
                        "No transition for internal outcome",
                    );
                    break;
                }
            }
        }

        let hops = steps.len();
        session.commit(state, steps);

        tracing::info!(
            session_id = %session_id,
            from = %from,
            to = %state,
            event = %event,
            hops,
            "State transition committed",
        );

        DispatchOutcome::Applied(StateTransition {
            from,
            new_state: state,
            state_changed: state != from,
            hops,
        })
    }
}
