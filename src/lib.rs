pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod validation;
pub mod workers;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Load configuration from environment variables
pub fn load_config() -> Result<Config> {
    Ok(Config::load()?)
}

/// Build the HTTP router with all API routes
pub fn build_router(state: AppState) -> Router {
    let ivr_routes = Router::new()
        .route("/session", post(handlers::ivr::create_session))
        .route("/process", post(handlers::ivr::process_input))
        .route(
            "/session/{session_id}",
            get(handlers::ivr::get_session).delete(handlers::ivr::end_session),
        );

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/ivr", ivr_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
