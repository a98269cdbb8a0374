use serde::{Deserialize, Serialize};

use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub sessions: SessionConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Sessions with no input for this long are evicted.
    pub idle_timeout_seconds: u64,
    /// Period of the eviction sweep.
    pub sweep_interval_seconds: u64,
    /// Transitions kept in each session's log.
    pub history_limit: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Time budget for one authentication backend call.
    pub timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            // Override with environment variables using `IVR__` prefix and `__` separator
            // e.g., IVR__SERVER__PORT=9090
            .add_source(
                config::Environment::with_prefix("IVR")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl ServerConfig {
    /// Address the HTTP listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.idle_timeout_seconds as i64)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds.max(1))
    }
}

impl AuthConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_seconds: 300,
            sweep_interval_seconds: 30,
            history_limit: 50,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { timeout_ms: 2000 }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(&self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "Error serializing config"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.sessions.idle_timeout(), chrono::Duration::minutes(5));
        assert_eq!(config.sessions.sweep_interval(), Duration::from_secs(30));
        assert_eq!(config.auth.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_display_is_json() {
        let rendered = Config::default().to_string();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["server"]["port"], 8080);
        assert_eq!(value["sessions"]["history_limit"], 50);
    }
}
