//! Per-caller session record.
//!
//! A [`Session`] holds the single authoritative state of one caller's call
//! flow together with the typed credential scratch space carried between the
//! authentication transitions. Sessions are owned by the
//! [`SessionRegistry`](super::registry::SessionRegistry) and only mutated
//! through the engine's commit step while the per-session lock is held.

use super::state_machine::{IvrState, TransitionLog};
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque, randomly generated (UUID v4) session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Credentials collected while the caller authenticates.
///
/// Raw values are kept as [`SecretString`] so they never show up in `Debug`
/// output or logs. They live only as long as the owning session.
#[derive(Debug, Default)]
pub struct Credentials {
    ssn: Option<SecretString>,
    card_number: Option<SecretString>,
    pin: Option<SecretString>,
    authenticated: bool,
    customer_id: Option<String>,
}

impl Credentials {
    pub fn ssn(&self) -> Option<&str> {
        self.ssn.as_ref().map(|s| s.expose_secret())
    }

    pub fn card_number(&self) -> Option<&str> {
        self.card_number.as_ref().map(|s| s.expose_secret())
    }

    pub fn pin(&self) -> Option<&str> {
        self.pin.as_ref().map(|s| s.expose_secret())
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    pub fn set_ssn(&mut self, ssn: &str) {
        self.ssn = Some(SecretString::from(ssn.to_string()));
    }

    pub fn set_card_number(&mut self, card_number: &str) {
        self.card_number = Some(SecretString::from(card_number.to_string()));
    }

    pub fn set_pin(&mut self, pin: &str) {
        self.pin = Some(SecretString::from(pin.to_string()));
    }

    /// Records a successful authentication attempt.
    pub fn mark_authenticated(&mut self, customer_id: String) {
        self.authenticated = true;
        self.customer_id = Some(customer_id);
    }

    /// Records a failed (or aborted) authentication attempt.
    pub fn mark_unauthenticated(&mut self) {
        self.authenticated = false;
        self.customer_id = None;
    }
}

/// One caller's end-to-end interaction.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    current_state: IvrState,
    credentials: Credentials,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    version: u64,
    history: VecDeque<TransitionLog>,
    history_limit: usize,
    closed: bool,
}

impl Session {
    /// Creates a session in the initial state.
    pub fn new(id: SessionId, history_limit: usize) -> Self {
        let now = Utc::now();
        Self {
            id,
            current_state: IvrState::INITIAL,
            credentials: Credentials::default(),
            created_at: now,
            last_activity: now,
            version: 0,
            history: VecDeque::with_capacity(history_limit.min(64)),
            history_limit,
            closed: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn current_state(&self) -> IvrState {
        self.current_state
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn credentials_mut(&mut self) -> &mut Credentials {
        &mut self.credentials
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Number of committed dispatches.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> &VecDeque<TransitionLog> {
        &self.history
    }

    /// True once the session was ended or evicted. A closed session accepts
    /// no further dispatches even if a caller still holds its handle.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
    }

    /// Refreshes the idle timer.
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Returns true if nothing happened on the session for at least `max_idle`.
    pub fn is_idle(&self, max_idle: Duration) -> bool {
        Utc::now() - self.last_activity >= max_idle
    }

    /// Commits the resolved state of one dispatch together with the
    /// transitions taken to reach it.
    pub(crate) fn commit(&mut self, new_state: IvrState, steps: Vec<TransitionLog>) {
        self.current_state = new_state;
        self.version += 1;
        self.history.extend(steps);
        while self.history.len() > self.history_limit {
            self.history.pop_front();
        }
        self.touch();
    }
}
