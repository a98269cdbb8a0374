use ivr::services::authentication::{AuthBackend, DemoAuthBackend};
use ivr::{build_router, AppState, Config};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;

/// HTTP test application wrapper
///
/// Manages an Axum server running on a random port for HTTP testing.
/// Each test gets its own server instance (and its own session registry) to
/// allow parallel test execution.
pub struct TestApp {
    /// Server base URL (e.g., "http://127.0.0.1:54321")
    pub address: String,
    /// HTTP client for making requests
    pub client: Client,
    /// Application state shared with the server
    pub state: AppState,
}

impl TestApp {
    /// Create a new HTTP test app backed by the demo customers
    ///
    /// # Example
    /// ```rust
    /// #[tokio::test]
    /// async fn test_health_endpoint() {
    ///     let app = TestApp::new().await;
    ///
    ///     let response = app.client
    ///         .get(app.url("/api/health"))
    ///         .send()
    ///         .await
    ///         .unwrap();
    ///
    ///     assert_eq!(response.status(), 200);
    /// }
    /// ```
    pub async fn new() -> Self {
        Self::with_backend(Arc::new(DemoAuthBackend::new())).await
    }

    /// Create a test app with a custom authentication backend
    pub async fn with_backend(backend: Arc<dyn AuthBackend>) -> Self {
        let mut config = Config::default();
        config.auth.timeout_ms = 500;

        let state = AppState::new(config, backend).expect("Failed to build application state");
        let app = build_router(state.clone());

        // Bind to random port (port 0 tells OS to assign available port)
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{port}");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            address,
            client,
            state,
        }
    }

    /// Get the full URL for an API endpoint
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Creates a session and returns its id together with the response body
    pub async fn create_session(&self) -> (String, Value) {
        let response = self
            .client
            .post(self.url("/api/ivr/session"))
            .send()
            .await
            .expect("Failed to create session");
        assert_eq!(response.status(), 200);

        let body: Value = response.json().await.unwrap();
        let session_id = body["sessionId"].as_str().unwrap().to_string();
        (session_id, body)
    }

    /// Sends one caller input and returns the status code and response body
    pub async fn process(&self, session_id: &str, input: &str) -> (u16, Value) {
        let response = self
            .client
            .post(self.url("/api/ivr/process"))
            .json(&serde_json::json!({
                "sessionId": session_id,
                "userInput": input,
                "inputType": "DTMF",
            }))
            .send()
            .await
            .expect("Failed to process input");

        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    /// Sends a sequence of inputs, asserting each is accepted, and returns
    /// the last response body
    pub async fn process_all(&self, session_id: &str, inputs: &[&str]) -> Value {
        let mut last = Value::Null;
        for input in inputs {
            let (status, body) = self.process(session_id, input).await;
            assert_eq!(status, 200, "input {input:?} failed: {body}");
            last = body;
        }
        last
    }
}
