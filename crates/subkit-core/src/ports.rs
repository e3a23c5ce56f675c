//! Port traits (hexagonal architecture).
//!
//! These traits define the interfaces between the subscription manager and
//! the billing provider adapters.

use crate::Result;
use crate::request::{
    CreateSubscriptionRequest, ListPage, ListSubscriptions, NewSubscription, SearchPage,
    SearchSubscriptions, UpdateSubscription,
};
use crate::subscription::Subscription;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Remote subscription resource.
///
/// Calls addressing a single subscription by id return
/// [`Error::NotFound`](crate::Error::NotFound) when the provider does not
/// know it.
#[async_trait]
pub trait SubscriptionGateway: Send + Sync {
    /// Create a subscription.
    async fn create(&self, request: &CreateSubscriptionRequest) -> Result<Subscription>;

    /// Retrieve a subscription by ID.
    async fn retrieve(&self, id: &str) -> Result<Subscription>;

    /// List one page of subscriptions.
    async fn list(&self, params: &ListSubscriptions) -> Result<ListPage<Subscription>>;

    /// Run a search query and return one page of matches.
    async fn search(&self, params: &SearchSubscriptions) -> Result<SearchPage<Subscription>>;

    /// Update a subscription.
    async fn update(&self, id: &str, request: &UpdateSubscription) -> Result<Subscription>;

    /// Cancel a subscription immediately.
    async fn cancel(&self, id: &str) -> Result<Subscription>;
}

/// Provisions authenticated gateway handles.
#[async_trait]
pub trait GatewayProvider: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn SubscriptionGateway>>;
}

/// Subscription management operations.
///
/// Not-found surfaces as `None` (or `false` for [`is_active`]); every other
/// failure is returned as an error.
///
/// [`is_active`]: SubscriptionService::is_active
#[async_trait]
pub trait SubscriptionService: Send + Sync {
    /// Subscribe a customer to a price. `None` when the provider rejects the request.
    async fn create(&self, new: NewSubscription) -> Result<Option<Subscription>>;

    async fn get_by_id(&self, subscription_id: &str) -> Result<Option<Subscription>>;

    /// The customer's most recent subscription that is not canceled, or
    /// failing that the most recent one of any status.
    async fn get_by_customer_id(&self, customer_id: &str) -> Result<Option<Subscription>>;

    async fn get_by_user_id(&self, user_id: &str) -> Result<Option<Subscription>>;

    /// Every subscription, optionally only those with status `active`.
    async fn get_all(&self, active_only: bool) -> Result<Vec<Subscription>>;

    async fn update(
        &self,
        subscription_id: &str,
        options: UpdateSubscription,
    ) -> Result<Option<Subscription>>;

    async fn update_price(
        &self,
        subscription_id: &str,
        price_id: &str,
    ) -> Result<Option<Subscription>>;

    async fn update_billing_anchor(
        &self,
        subscription_id: &str,
        anchor: DateTime<Utc>,
    ) -> Result<Option<Subscription>>;

    async fn update_billing_anchor_for_all(
        &self,
        anchor: DateTime<Utc>,
    ) -> Result<Vec<Subscription>>;

    async fn cancel_by_id(&self, subscription_id: &str) -> Result<Option<Subscription>>;

    async fn cancel_by_user_id(&self, user_id: &str) -> Result<Option<Subscription>>;

    async fn cancel_at_period_end(&self, subscription_id: &str) -> Result<Option<Subscription>>;

    async fn reactivate(&self, subscription_id: &str) -> Result<Option<Subscription>>;

    async fn cancel_all(&self) -> Result<Vec<Subscription>>;

    async fn is_active(&self, subscription_id: &str) -> Result<bool>;
}
