//! Test helper functions and utilities.

use std::sync::Arc;
use subkit_billing::{ManagerConfig, SubscriptionManager};
use subkit_stripe::{StripeConfig, StripeProvider};
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "sk_test_subkit";

/// A Stripe stand-in plus the configuration pointing at it.
pub struct StripeStub {
    pub server: MockServer,
}

impl StripeStub {
    pub async fn start() -> Self {
        crate::init_test_logging();
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn config(&self) -> StripeConfig {
        StripeConfig::new(TEST_API_KEY).with_api_url(self.server.uri())
    }

    /// Manager wired to this stub through the Stripe provider.
    pub fn manager(&self) -> SubscriptionManager {
        self.manager_with(ManagerConfig::default())
    }

    pub fn manager_with(&self, config: ManagerConfig) -> SubscriptionManager {
        SubscriptionManager::with_config(Arc::new(StripeProvider::new(self.config())), config)
    }

    /// Number of requests received so far.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }

    /// Decoded form bodies of every POST received so far.
    pub async fn form_bodies(&self) -> Vec<Vec<(String, String)>> {
        let requests = self.server.received_requests().await.unwrap_or_default();
        requests
            .iter()
            .filter(|r| r.method.as_str() == "POST")
            .map(|r| decode_form(&r.body))
            .collect()
    }
}

fn decode_form(body: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(body).into_owned().collect()
}

/// Look up a form field by key.
pub fn field<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
    form.iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
