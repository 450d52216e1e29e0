//! Environment-driven configuration for the Mandrill provider.

use crate::error::{MailError, MailResult};
use crate::provider::mandrill::DEFAULT_BASE_URL;
use std::env;
use std::time::Duration;

/// Mandrill API configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MandrillConfig {
    /// Mandrill API base URL (defaults to production).
    pub base_url: String,
    /// Mandrill API key.
    pub api_key: String,
    /// Per-request timeout applied by the transport.
    pub timeout: Option<Duration>,
}

impl MandrillConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: None,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Expects:
    /// - `MANDRILL_API_KEY`
    /// - `MANDRILL_BASE_URL` (optional)
    /// - `MANDRILL_TIMEOUT_SECS` (optional)
    pub fn from_env() -> MailResult<Self> {
        let api_key = env_required("MANDRILL_API_KEY")?;
        let base_url = env_or_default("MANDRILL_BASE_URL", DEFAULT_BASE_URL);

        let timeout = match env::var("MANDRILL_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|e| {
                    MailError::ConfigError(format!(
                        "Failed to parse environment variable 'MANDRILL_TIMEOUT_SECS': {}",
                        e
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(Self {
            base_url,
            api_key,
            timeout,
        })
    }
}

/// Load an environment variable, falling back to `default`
pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Load an environment variable or fail with a configuration error
pub fn env_required(key: &str) -> MailResult<String> {
    env::var(key).map_err(|_| {
        MailError::ConfigError(format!("Environment variable '{}' is required but not set", key))
    })
}
