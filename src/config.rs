use anyhow::{bail, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Heritage backend (empty disables the remote backend)
    pub heritage_api_url: String,

    // Translation (empty disables remote translation)
    pub translation_api_url: String,
    pub translation_model: String,

    // Network
    pub request_timeout: Duration,

    // Language slot
    pub language_store_path: String,
    pub staleness_poll_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);
        if request_timeout_secs == 0 {
            bail!("REQUEST_TIMEOUT_SECS must be greater than zero");
        }

        let staleness_poll_ms: u64 = std::env::var("STALENESS_POLL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(1000);

        Ok(Self {
            // Heritage backend
            heritage_api_url: std::env::var("HERITAGE_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),

            // Translation - Ollama-style generate endpoint
            translation_api_url: std::env::var("TRANSLATION_API_URL")
                .unwrap_or_else(|_| "http://localhost:11434/api/generate".to_string()),
            translation_model: std::env::var("TRANSLATION_MODEL")
                .unwrap_or_else(|_| "llama3:8b".to_string()),

            // Network
            request_timeout: Duration::from_secs(request_timeout_secs),

            // Language slot
            language_store_path: std::env::var("LANGUAGE_STORE_PATH")
                .unwrap_or_else(|_| "data/language.json".to_string()),
            staleness_poll_interval: Duration::from_millis(staleness_poll_ms),
        })
    }

    /// Whether a remote heritage backend is configured
    pub fn backend_enabled(&self) -> bool {
        !self.heritage_api_url.trim().is_empty()
    }

    /// Whether a remote translation endpoint is configured
    pub fn translation_enabled(&self) -> bool {
        !self.translation_api_url.trim().is_empty()
    }
}
