//! Registry of live IVR sessions.
//!
//! Lookups, inserts and removals go through a sharded [`DashMap`], so work on
//! different sessions never contends on one lock. Each session sits behind
//! its own [`tokio::sync::Mutex`]; dispatch, end and eviction all acquire
//! that lock, which serializes everything that touches one session.

use super::session::{Session, SessionId};
use crate::error::{Error, Result};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Shared handle to one session.
pub type SessionHandle = Arc<Mutex<Session>>;

pub struct SessionRegistry {
    sessions: DashMap<SessionId, SessionHandle>,
    history_limit: usize,
}

impl SessionRegistry {
    pub fn new(history_limit: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            history_limit,
        }
    }

    /// Creates a session in the initial state and returns its id.
    pub fn create(&self) -> SessionId {
        let id = SessionId::new();
        let session = Session::new(id, self.history_limit);
        self.sessions.insert(id, Arc::new(Mutex::new(session)));
        tracing::debug!(session_id = %id, "Session created");
        id
    }

    /// Returns the handle of a live session.
    pub fn get(&self, id: &SessionId) -> Result<SessionHandle> {
        // Clone the Arc out so no shard guard outlives this call.
        self.sessions
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))
    }

    /// Acquires the per-session lock.
    ///
    /// Fails with `SessionNotFound` if the session is unknown, or if it was
    /// ended or evicted while this caller waited for the lock.
    pub async fn lock(&self, id: &SessionId) -> Result<OwnedMutexGuard<Session>> {
        let handle = self.get(id)?;
        let guard = handle.lock_owned().await;
        if guard.is_closed() {
            return Err(Error::SessionNotFound(id.to_string()));
        }
        Ok(guard)
    }

    /// Ends a session. A second `end` on the same id reports not found.
    pub async fn end(&self, id: &SessionId) -> Result<()> {
        let handle = self.get(id)?;
        let mut session = handle.lock().await;
        if session.is_closed() {
            return Err(Error::SessionNotFound(id.to_string()));
        }
        session.close();
        self.remove_entry(id, &handle);
        tracing::info!(session_id = %id, "Session ended");
        Ok(())
    }

    /// Drops the registry entry of a session the caller already closed under
    /// its lock.
    pub(crate) fn discard(&self, id: &SessionId) {
        self.sessions.remove(id);
    }

    /// Ends every session idle for at least `max_idle` and returns their ids.
    ///
    /// Each candidate is re-checked under its own lock, so a session that
    /// received input while the sweep waited is kept.
    pub async fn evict_idle(&self, max_idle: chrono::Duration) -> Vec<SessionId> {
        let candidates: Vec<(SessionId, SessionHandle)> = self
            .sessions
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();

        let mut evicted = Vec::new();
        for (id, handle) in candidates {
            let mut session = handle.lock().await;
            if session.is_closed() || !session.is_idle(max_idle) {
                continue;
            }
            session.close();
            self.remove_entry(&id, &handle);
            tracing::info!(
                session_id = %id,
                state = %session.current_state(),
                "Evicted idle session",
            );
            evicted.push(id);
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    fn remove_entry(&self, id: &SessionId, handle: &SessionHandle) {
        self.sessions
            .remove_if(id, |_, current| Arc::ptr_eq(current, handle));
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ivr::state_machine::IvrState;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_create_and_get() {
        let registry = SessionRegistry::new(10);
        let id = registry.create();

        assert!(registry.contains(&id));
        assert_eq!(registry.len(), 1);

        let session = registry.lock(&id).await.unwrap();
        assert_eq!(session.id(), id);
        assert_eq!(session.current_state(), IvrState::Welcome);
    }

    #[tokio::test]
    async fn test_get_unknown_session() {
        let registry = SessionRegistry::new(10);
        let result = registry.get(&SessionId::new());
        assert!(matches!(result, Err(Error::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_end_twice() {
        let registry = SessionRegistry::new(10);
        let id = registry.create();

        assert_ok!(registry.end(&id).await);
        assert_err!(registry.end(&id).await);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_stale_handle_sees_closed_session() {
        let registry = SessionRegistry::new(10);
        let id = registry.create();
        let handle = registry.get(&id).unwrap();

        registry.end(&id).await.unwrap();

        assert!(handle.lock().await.is_closed());
        assert!(matches!(registry.lock(&id).await, Err(Error::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_evict_idle() {
        let registry = SessionRegistry::new(10);
        let idle = registry.create();

        let evicted = registry.evict_idle(chrono::Duration::zero()).await;
        assert_eq!(evicted, vec![idle]);
        assert!(!registry.contains(&idle));

        let fresh = registry.create();
        let evicted = registry.evict_idle(chrono::Duration::minutes(5)).await;
        assert!(evicted.is_empty());
        assert!(registry.contains(&fresh));
    }

    #[tokio::test]
    async fn test_eviction_waits_for_session_lock() {
        let registry = Arc::new(SessionRegistry::new(10));
        let id = registry.create();

        let guard = registry.lock(&id).await.unwrap();
        let sweeper = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.evict_idle(chrono::Duration::zero()).await })
        };

        tokio::task::yield_now().await;
        assert!(registry.contains(&id), "eviction must not bypass the session lock");
        drop(guard);

        let evicted = sweeper.await.unwrap();
        assert_eq!(evicted, vec![id]);
    }
}
