use ivr::{
    build_router, load_config, services::authentication::DemoAuthBackend,
    workers::session_eviction_worker, AppState,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    tracing::info!("Loaded configuration:\n{}", config);

    let backend = Arc::new(DemoAuthBackend::new());
    let state = AppState::new(config.clone(), backend)?;

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let eviction = tokio::spawn(session_eviction_worker(
        Arc::clone(&state.sessions),
        config.sessions.idle_timeout(),
        config.sessions.sweep_interval(),
        shutdown_rx,
    ));

    let app = build_router(state);
    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "IVR server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(());
    if let Err(e) = eviction.await {
        tracing::warn!(error = %e, "Session eviction worker did not stop cleanly");
    }

    tracing::info!("IVR server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
