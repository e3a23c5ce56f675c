//! Provisioning of Stripe gateway handles.

use crate::client::StripeGateway;
use crate::config::StripeConfig;
use async_trait::async_trait;
use std::sync::Arc;
use subkit_core::{GatewayProvider, Result, SubscriptionGateway};
use tracing::info;

/// Builds authenticated [`StripeGateway`] handles from a fixed configuration.
#[derive(Debug, Clone)]
pub struct StripeProvider {
    config: StripeConfig,
}

impl StripeProvider {
    pub fn new(config: StripeConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(StripeConfig::from_env()?))
    }
}

#[async_trait]
impl GatewayProvider for StripeProvider {
    async fn connect(&self) -> Result<Arc<dyn SubscriptionGateway>> {
        let gateway: Arc<dyn SubscriptionGateway> =
            Arc::new(StripeGateway::new(self.config.clone())?);
        info!(api_url = %self.config.base_url(), "Stripe gateway provisioned");
        Ok(gateway)
    }
}
