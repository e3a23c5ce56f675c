//! Stripe client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use subkit_core::{Error, Result};
use url::Url;

/// Stripe client configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct StripeConfig {
    /// Secret or restricted API key.
    #[serde(default)]
    pub api_key: String,
    /// API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_api_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

// The key stays out of logs.
impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_key", &"***")
            .field("api_url", &self.api_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl StripeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Read `STRIPE_SECRET_KEY` and `STRIPE_API_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| Error::Config("STRIPE_SECRET_KEY is not set".to_string()))?;

        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var("STRIPE_API_URL") {
            config.api_url = url;
        }
        Ok(config)
    }

    /// Point the client at a different host (test servers, proxies).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Rounded up to whole milliseconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_nanos().div_ceil(1_000_000);
        self.timeout_ms = u64::try_from(millis).unwrap_or(u64::MAX);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("Stripe API key is empty".to_string()));
        }

        let url = Url::parse(&self.api_url)
            .map_err(|e| Error::Config(format!("Invalid Stripe API URL {}: {}", self.api_url, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::Config(format!(
                "Stripe API URL must be http(s): {}",
                self.api_url
            )));
        }

        if self.timeout_ms == 0 {
            return Err(Error::Config("Stripe timeout must be positive".to_string()));
        }
        Ok(())
    }
}
