//! Stub authentication backends for fault and concurrency tests.

use async_trait::async_trait;
use ivr::services::authentication::{AuthBackend, AuthError, AuthOutcome, DemoAuthBackend};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Always faults.
pub struct FailingBackend;

#[async_trait]
impl AuthBackend for FailingBackend {
    async fn authenticate_by_ssn(&self, _ssn: &str) -> Result<AuthOutcome, AuthError> {
        Err(AuthError::Unavailable("customer database offline".to_string()))
    }

    async fn authenticate_by_card_and_pin(
        &self,
        _card_number: &str,
        _pin: &str,
    ) -> Result<AuthOutcome, AuthError> {
        Err(AuthError::Backend("card network error".to_string()))
    }
}

/// Never answers within any reasonable time budget.
pub struct SlowBackend;

#[async_trait]
impl AuthBackend for SlowBackend {
    async fn authenticate_by_ssn(&self, _ssn: &str) -> Result<AuthOutcome, AuthError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(AuthOutcome::authenticated("CUST001"))
    }

    async fn authenticate_by_card_and_pin(
        &self,
        _card_number: &str,
        _pin: &str,
    ) -> Result<AuthOutcome, AuthError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(AuthOutcome::authenticated("CUST001"))
    }
}

/// Demo backend whose SSN checks wait until the gate is opened.
pub struct GatedBackend {
    inner: DemoAuthBackend,
    pub entered: Arc<Notify>,
    pub gate: Arc<Notify>,
}

impl GatedBackend {
    pub fn new() -> Self {
        Self {
            inner: DemoAuthBackend::new(),
            entered: Arc::new(Notify::new()),
            gate: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl AuthBackend for GatedBackend {
    async fn authenticate_by_ssn(&self, ssn: &str) -> Result<AuthOutcome, AuthError> {
        self.entered.notify_one();
        self.gate.notified().await;
        self.inner.authenticate_by_ssn(ssn).await
    }

    async fn authenticate_by_card_and_pin(
        &self,
        card_number: &str,
        pin: &str,
    ) -> Result<AuthOutcome, AuthError> {
        self.inner.authenticate_by_card_and_pin(card_number, pin).await
    }
}
