//! Stripe SDK client implementing the subscription gateway.

use crate::config::StripeConfig;
use crate::wire::{self, SearchParams, SearchResult};
use async_trait::async_trait;
use std::future::Future;
use stripe::generated::billing::subscription::SubscriptionProrationBehavior;
use stripe::{
    CancelSubscription, Client, CreateSubscription, CreateSubscriptionAutomaticTax,
    CreateSubscriptionItems, CustomerId, Scheduled, StripeError, SubscriptionId,
    UpdateSubscriptionItems,
};
use subkit_core::{
    CreateSubscriptionRequest, Error, ListPage, ListSubscriptions, ProrationBehavior, Result,
    SearchPage, SearchSubscriptions, Subscription, SubscriptionGateway, TrialEnd,
    UpdateSubscription,
};
use tracing::{debug, info, warn};

const SEARCH_PATH: &str = "/subscriptions/search";

/// Stripe subscription gateway.
pub struct StripeGateway {
    config: StripeConfig,
    client: Client,
}

impl StripeGateway {
    /// Create a new gateway, validating the configuration.
    pub fn new(config: StripeConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::from_url(config.base_url(), config.api_key.clone());
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Run one SDK call under the configured timeout.
    async fn send<T, F>(&self, operation: &'static str, subject: &str, call: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, StripeError>>,
    {
        match tokio::time::timeout(self.config.timeout(), call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(map_stripe_error(e, operation, subject)),
            Err(_) => {
                warn!(
                    operation,
                    subject = %subject,
                    timeout_ms = self.config.timeout_ms,
                    "Stripe request timed out"
                );
                Err(Error::Network(format!(
                    "Stripe {} timed out after {}ms",
                    operation, self.config.timeout_ms
                )))
            }
        }
    }
}

/// Ids are interpolated into request paths; anything else cannot name a subscription.
fn subscription_id(id: &str) -> Result<SubscriptionId> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(Error::NotFound(id.to_string()));
    }
    id.parse().map_err(|_| Error::NotFound(id.to_string()))
}

fn scheduled(trial_end: TrialEnd) -> Scheduled {
    match trial_end {
        TrialEnd::Now => Scheduled::now(),
        TrialEnd::At(at) => Scheduled::Timestamp(at.timestamp()),
    }
}

fn proration(behavior: ProrationBehavior) -> SubscriptionProrationBehavior {
    match behavior {
        ProrationBehavior::CreateProrations => SubscriptionProrationBehavior::CreateProrations,
        ProrationBehavior::None => SubscriptionProrationBehavior::None,
        ProrationBehavior::AlwaysInvoice => SubscriptionProrationBehavior::AlwaysInvoice,
    }
}

fn map_stripe_error(error: StripeError, operation: &str, subject: &str) -> Error {
    let mapped = match error {
        StripeError::Stripe(request) => {
            let message = request
                .message
                .unwrap_or_else(|| "Unknown error".to_string());
            let code = request.code.map(|c| format!("{c:?}"));

            match request.http_status {
                401 | 403 => Error::Authentication(message),
                404 => Error::NotFound(subject.to_string()),
                429 => Error::RateLimited(message),
                status @ 400..=499 => Error::InvalidRequest {
                    status,
                    code,
                    message,
                },
                status => Error::Provider { status, message },
            }
        }
        StripeError::QueryStringSerialize(e) => {
            Error::Serialization(format!("Failed to serialize request: {e}"))
        }
        StripeError::JSONSerialize(e) => Error::Serialization(e.to_string()),
        StripeError::UnsupportedVersion => {
            Error::Config("Unsupported Stripe API version".to_string())
        }
        StripeError::ClientError(msg) => Error::Network(msg),
        StripeError::Timeout => Error::Network("Request timed out".to_string()),
    };

    warn!(operation, subject = %subject, error = %mapped, "Stripe request failed");
    mapped
}

#[async_trait]
impl SubscriptionGateway for StripeGateway {
    async fn create(&self, request: &CreateSubscriptionRequest) -> Result<Subscription> {
        let customer = request
            .customer_id
            .parse::<CustomerId>()
            .map_err(|_| Error::InvalidRequest {
                status: 400,
                code: None,
                message: format!("Invalid customer ID: {}", request.customer_id),
            })?;

        let mut params = CreateSubscription::new(customer);
        params.items = Some(
            request
                .price_ids
                .iter()
                .map(|price| CreateSubscriptionItems {
                    price: Some(price.clone()),
                    ..Default::default()
                })
                .collect(),
        );
        params.metadata = Some(request.metadata.clone());
        params.default_payment_method = request.default_payment_method.as_deref();
        params.trial_end = request.trial_end.map(scheduled);
        params.automatic_tax = Some(CreateSubscriptionAutomaticTax {
            enabled: request.automatic_tax,
            ..Default::default()
        });

        let created = self
            .send(
                "create_subscription",
                &request.customer_id,
                stripe::Subscription::create(&self.client, params),
            )
            .await?;
        let subscription = wire::subscription(created);

        info!(
            subscription_id = %subscription.id,
            customer_id = %subscription.customer_id,
            "Stripe subscription created"
        );
        Ok(subscription)
    }

    async fn retrieve(&self, id: &str) -> Result<Subscription> {
        let sub_id = subscription_id(id)?;
        let raw = self
            .send(
                "get_subscription",
                id,
                stripe::Subscription::retrieve(&self.client, &sub_id, &[]),
            )
            .await?;
        debug!(subscription_id = %id, "Stripe subscription retrieved");
        Ok(wire::subscription(raw))
    }

    async fn list(&self, params: &ListSubscriptions) -> Result<ListPage<Subscription>> {
        let customer = match &params.customer_id {
            Some(id) => match id.parse::<CustomerId>() {
                Ok(customer) => Some(customer),
                Err(_) => {
                    debug!(customer_id = %id, "Unknown customer id format, nothing to list");
                    return Ok(ListPage {
                        data: Vec::new(),
                        has_more: false,
                    });
                }
            },
            None => None,
        };

        let mut query = stripe::ListSubscriptions::new();
        query.customer = customer;
        query.limit = Some(u64::from(params.limit));
        query.status = params.status.map(wire::status_filter);
        query.starting_after = params
            .starting_after
            .as_deref()
            .map(subscription_id)
            .transpose()?;

        let list = self
            .send(
                "list_subscriptions",
                "subscriptions",
                stripe::Subscription::list(&self.client, &query),
            )
            .await?;
        debug!(count = list.data.len(), has_more = list.has_more, "Stripe subscriptions listed");
        Ok(wire::list_page(list))
    }

    async fn search(&self, params: &SearchSubscriptions) -> Result<SearchPage<Subscription>> {
        let query = SearchParams {
            query: &params.query,
            limit: u64::from(params.limit),
            page: params.page.as_deref(),
        };

        let result = self
            .send(
                "search_subscriptions",
                "subscriptions",
                self.client.get_query::<SearchResult, _>(SEARCH_PATH, &query),
            )
            .await?;
        debug!(query = %params.query, count = result.data.len(), "Stripe subscriptions searched");
        Ok(wire::search_page(result))
    }

    async fn update(&self, id: &str, request: &UpdateSubscription) -> Result<Subscription> {
        let sub_id = subscription_id(id)?;

        let mut params = stripe::UpdateSubscription::new();
        params.items = request.items.as_ref().map(|items| {
            items
                .iter()
                .map(|item| UpdateSubscriptionItems {
                    id: item.id.clone(),
                    price: item.price_id.clone(),
                    quantity: item.quantity,
                    deleted: item.deleted.then_some(true),
                    ..Default::default()
                })
                .collect()
        });
        params.cancel_at_period_end = request.cancel_at_period_end;
        params.trial_end = request.trial_end.map(scheduled);
        params.metadata = request.metadata.clone();
        params.default_payment_method = request.default_payment_method.as_deref();
        params.proration_behavior = request.proration_behavior.map(proration);

        let raw = self
            .send(
                "update_subscription",
                id,
                stripe::Subscription::update(&self.client, &sub_id, params),
            )
            .await?;
        let subscription = wire::subscription(raw);

        info!(subscription_id = %id, status = %subscription.status, "Stripe subscription updated");
        Ok(subscription)
    }

    async fn cancel(&self, id: &str) -> Result<Subscription> {
        let sub_id = subscription_id(id)?;
        let raw = self
            .send(
                "cancel_subscription",
                id,
                stripe::Subscription::cancel(&self.client, &sub_id, CancelSubscription::default()),
            )
            .await?;
        info!(subscription_id = %id, "Stripe subscription canceled");
        Ok(wire::subscription(raw))
    }
}
