//! Client configuration.
//!
//! Environment-driven with compiled defaults. The CLI loads `.env` via
//! dotenvy before reading; library consumers can construct the struct
//! directly.

use std::env;
use std::time::Duration;

use crate::constants::{FETCH_RETRY_DELAY_MS, FETCH_RETRY_LIMIT};

const DEFAULT_API_URL: &str = "http://localhost:8000";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const READ_TIMEOUT_SECS: u64 = 10;

/// Configuration for the API client and the managers above it.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Backend base URL, without the `/api` prefix.
    pub api_url: String,
    /// Overall client timeout applied at construction.
    pub request_timeout: Duration,
    /// Per-request timeout for read (listing/stats) endpoints.
    pub read_timeout: Duration,
    /// Retry count for transient read failures.
    pub retry_limit: u32,
    /// Fixed delay between retries.
    pub retry_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
            retry_limit: FETCH_RETRY_LIMIT,
            retry_delay: Duration::from_millis(FETCH_RETRY_DELAY_MS),
        }
    }
}

impl ClientConfig {
    /// Build from environment: EKOS_API_URL (or API_URL), with optional
    /// EKOS_READ_TIMEOUT_SECS and EKOS_RETRY_LIMIT overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("EKOS_API_URL").or_else(|_| env::var("API_URL")) {
            config.api_url = url;
        }
        if let Some(secs) = read_env_u64("EKOS_READ_TIMEOUT_SECS") {
            config.read_timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = read_env_u64("EKOS_RETRY_LIMIT") {
            config.retry_limit = limit as u32;
        }

        config
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

fn read_env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
