use crate::services::ivr::SessionRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info};

/// Background worker that ends sessions idle for longer than `idle_timeout`
///
/// Each candidate is ended under its own session lock, so eviction never
/// races an in-flight dispatch on the same session.
pub async fn session_eviction_worker(
    registry: Arc<SessionRegistry>,
    idle_timeout: chrono::Duration,
    sweep_interval: Duration,
    mut shutdown_rx: tokio::sync::broadcast::Receiver<()>,
) {
    let mut sweep = interval(sweep_interval);
    info!(
        idle_timeout_seconds = idle_timeout.num_seconds(),
        sweep_interval_seconds = sweep_interval.as_secs(),
        "Session eviction worker started",
    );

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                info!("Session eviction worker shutting down");
                break;
            }
            _ = sweep.tick() => {
                let evicted = registry.evict_idle(idle_timeout).await;
                if evicted.is_empty() {
                    debug!(active_sessions = registry.len(), "No idle sessions to evict");
                } else {
                    info!(
                        evicted = evicted.len(),
                        active_sessions = registry.len(),
                        "Evicted idle sessions",
                    );
                }
            }
        }
    }

    info!("Session eviction worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast;

    #[tokio::test]
    async fn test_worker_evicts_and_stops() {
        let registry = Arc::new(SessionRegistry::new(10));
        let id = registry.create();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let worker = tokio::spawn(session_eviction_worker(
            Arc::clone(&registry),
            chrono::Duration::zero(),
            Duration::from_millis(10),
            shutdown_rx,
        ));

        for _ in 0..50 {
            if !registry.contains(&id) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(!registry.contains(&id));

        shutdown_tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(1), worker)
            .await
            .expect("worker did not stop")
            .unwrap();
    }
}
