use crate::{
    config::Config,
    error::Result,
    services::authentication::AuthBackend,
    services::ivr::{
        actions::ActionExecutor,
        state_machine::{IvrStateMachine, TransitionTable},
        IvrService, SessionRegistry,
    },
};
use std::sync::Arc;

/// Application state shared across all HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Session-level IVR operations
    pub ivr: Arc<IvrService>,
    /// Registry of live sessions, shared with the eviction worker
    pub sessions: Arc<SessionRegistry>,
    /// Loaded configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState instance
    ///
    /// Validates the transition table; an inconsistent table is a startup
    /// error.
    ///
    /// # Arguments
    /// * `config` - Loaded configuration
    /// * `backend` - Authentication backend used by the credential checks
    pub fn new(config: Config, backend: Arc<dyn AuthBackend>) -> Result<Self> {
        let table = TransitionTable::new();
        table.validate()?;

        let executor = ActionExecutor::new(backend, config.auth.timeout());
        let machine = Arc::new(IvrStateMachine::new(table, executor));
        let sessions = Arc::new(SessionRegistry::new(config.sessions.history_limit));
        let ivr = Arc::new(IvrService::new(Arc::clone(&sessions), machine));

        Ok(Self {
            ivr,
            sessions,
            config: Arc::new(config),
        })
    }
}
