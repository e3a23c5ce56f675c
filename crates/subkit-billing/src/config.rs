//! Billing configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use subkit_core::{Error, Result};
use subkit_stripe::StripeConfig;
use subkit_trace::LoggingConfig;

/// Largest page the provider serves.
const MAX_PAGE_SIZE: u32 = 100;

/// Subscription manager settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Page size for list calls.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl ManagerConfig {
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Page size clamped to what the provider accepts.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default)]
    pub stripe: StripeConfig,
    #[serde(default)]
    pub manager: ManagerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BillingConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Install the global log subscriber described by `logging`.
    pub fn init_logging(&self) -> Result<()> {
        subkit_trace::init_logging(&self.logging).map_err(|e| Error::Config(e.to_string()))
    }

    /// Stripe settings from the environment, defaults elsewhere.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            stripe: StripeConfig::from_env()?,
            ..Default::default()
        })
    }
}
