use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Everything the server reads from the environment, resolved once at startup.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Default OpenAI key; a key sent with a request takes precedence.
    pub openai_api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API.
    pub openai_base_url: String,
    /// Chat model used for summaries.
    pub openai_model: String,
    /// Timeout for one LLM request.
    pub openai_timeout_secs: u64,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("openai_timeout_secs", &self.openai_timeout_secs)
            .finish()
    }
}

impl ServerConfig {
    /// Build config from environment variables (call [`load_dotenv`] first).
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `CTXWINDOW_HOST` | `0.0.0.0` |
    /// | `CTXWINDOW_PORT` | `8000` |
    /// | `OPENAI_API_KEY` | unset (mock summaries) |
    /// | `OPENAI_BASE_URL` | `https://api.openai.com` |
    /// | `OPENAI_MODEL` | `gpt-3.5-turbo` |
    /// | `OPENAI_TIMEOUT_SECS` | `60` |
    ///
    /// Empty values count as unset.
    pub fn from_env() -> Self {
        Self {
            host: env_or("CTXWINDOW_HOST", "0.0.0.0"),
            port: env_parse("CTXWINDOW_PORT", 8000),
            openai_api_key: env_opt("OPENAI_API_KEY"),
            openai_base_url: env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            openai_model: env_or("OPENAI_MODEL", DEFAULT_MODEL),
            openai_timeout_secs: env_parse("OPENAI_TIMEOUT_SECS", 60),
        }
    }

    /// `host:port` to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// LLM request timeout.
    pub fn openai_timeout(&self) -> Duration {
        Duration::from_secs(self.openai_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            openai_api_key: None,
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            openai_model: DEFAULT_MODEL.to_string(),
            openai_timeout_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_binds_all_interfaces() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.openai_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ServerConfig {
            openai_api_key: Some("sk-secret".into()),
            ..ServerConfig::default()
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
