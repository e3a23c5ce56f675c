//! Subscription manager.

use crate::config::{BillingConfig, ManagerConfig};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use subkit_core::{
    GatewayProvider, ItemUpdate, ListSubscriptions, NewSubscription, ProrationBehavior, Result,
    SearchQuery, SearchSubscriptions, StatusFilter, Subscription, SubscriptionGateway,
    SubscriptionService, TrialEnd, UpdateSubscription,
};
use subkit_stripe::StripeProvider;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Create, read, update and cancel operations over provider-owned
/// subscriptions.
///
/// The gateway handle is provisioned on first use and shared by every
/// later call. Concurrent first calls provision it once; a failed
/// provisioning is not cached and is retried by the next call.
///
/// Dropping an operation's future aborts its outstanding request.
pub struct SubscriptionManager {
    provider: Arc<dyn GatewayProvider>,
    gateway: OnceCell<Arc<dyn SubscriptionGateway>>,
    config: ManagerConfig,
}

impl SubscriptionManager {
    pub fn new(provider: Arc<dyn GatewayProvider>) -> Self {
        Self::with_config(provider, ManagerConfig::default())
    }

    pub fn with_config(provider: Arc<dyn GatewayProvider>, config: ManagerConfig) -> Self {
        Self {
            provider,
            gateway: OnceCell::new(),
            config,
        }
    }

    /// Manager backed by Stripe.
    pub fn from_config(config: &BillingConfig) -> Self {
        Self::with_config(
            Arc::new(StripeProvider::new(config.stripe.clone())),
            config.manager.clone(),
        )
    }

    /// Whether a gateway handle is currently cached.
    pub fn is_connected(&self) -> bool {
        self.gateway.initialized()
    }

    /// Drop the cached gateway handle; the next call provisions a new one.
    pub fn release(&mut self) {
        if self.gateway.take().is_some() {
            debug!("Subscription gateway released");
        }
    }

    async fn gateway(&self) -> Result<&Arc<dyn SubscriptionGateway>> {
        self.gateway
            .get_or_try_init(|| async {
                debug!("Provisioning subscription gateway");
                self.provider.connect().await
            })
            .await
    }

    async fn apply(
        &self,
        subscription_id: &str,
        mut options: UpdateSubscription,
    ) -> Result<Option<Subscription>> {
        options.proration_behavior = Some(ProrationBehavior::None);
        let gateway = self.gateway().await?;
        found(gateway.update(subscription_id, &options).await)
    }
}

/// Map a not-found failure to `None`.
fn found<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl SubscriptionService for SubscriptionManager {
    async fn create(&self, new: NewSubscription) -> Result<Option<Subscription>> {
        let request = new.into_request();
        let gateway = self.gateway().await?;

        match gateway.create(&request).await {
            Ok(subscription) => {
                info!(
                    subscription_id = %subscription.id,
                    customer_id = %subscription.customer_id,
                    "Subscription created"
                );
                Ok(Some(subscription))
            }
            Err(e) if e.is_rejection() || e.is_not_found() => {
                warn!(customer_id = %request.customer_id, error = %e, "Subscription create rejected");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn get_by_id(&self, subscription_id: &str) -> Result<Option<Subscription>> {
        let gateway = self.gateway().await?;
        found(gateway.retrieve(subscription_id).await)
    }

    async fn get_by_customer_id(&self, customer_id: &str) -> Result<Option<Subscription>> {
        let gateway = self.gateway().await?;

        // The default listing omits canceled subscriptions.
        let live = ListSubscriptions::new(1).for_customer(customer_id);
        if let Some(subscription) = gateway.list(&live).await?.data.into_iter().next() {
            return Ok(Some(subscription));
        }

        let any = live.with_status(StatusFilter::All);
        let page = gateway.list(&any).await?;
        debug!(customer_id = %customer_id, found = !page.data.is_empty(), "No live subscription for customer");
        Ok(page.data.into_iter().next())
    }

    async fn get_by_user_id(&self, user_id: &str) -> Result<Option<Subscription>> {
        let params = SearchSubscriptions::new(SearchQuery::user_id(user_id).to_string(), 1);
        let page = self.gateway().await?.search(&params).await?;
        debug!(user_id = %user_id, found = !page.data.is_empty(), "Subscription lookup by user");
        Ok(page.data.into_iter().next())
    }

    async fn get_all(&self, active_only: bool) -> Result<Vec<Subscription>> {
        let gateway = self.gateway().await?;
        let mut params = ListSubscriptions::new(self.config.effective_page_size())
            .with_status(StatusFilter::All);
        let mut subscriptions = Vec::new();

        loop {
            let page = gateway.list(&params).await?;
            let cursor = page.data.last().map(|s| s.id.clone());
            subscriptions.extend(page.data);

            match cursor {
                Some(id) if page.has_more => params.starting_after = Some(id),
                _ => break,
            }
        }

        if active_only {
            subscriptions.retain(Subscription::is_active);
        }

        debug!(count = subscriptions.len(), active_only, "Subscriptions listed");
        Ok(subscriptions)
    }

    async fn update(
        &self,
        subscription_id: &str,
        options: UpdateSubscription,
    ) -> Result<Option<Subscription>> {
        self.apply(subscription_id, options).await
    }

    async fn update_price(
        &self,
        subscription_id: &str,
        price_id: &str,
    ) -> Result<Option<Subscription>> {
        let Some(current) = self.get_by_id(subscription_id).await? else {
            return Ok(None);
        };

        let item = match current.items.first() {
            Some(item) => ItemUpdate::replace_price(item.id.clone(), price_id),
            None => ItemUpdate::add_price(price_id),
        };

        info!(subscription_id = %subscription_id, price_id = %price_id, "Updating subscription price");
        self.apply(subscription_id, UpdateSubscription::new().with_items(vec![item]))
            .await
    }

    async fn update_billing_anchor(
        &self,
        subscription_id: &str,
        anchor: DateTime<Utc>,
    ) -> Result<Option<Subscription>> {
        info!(subscription_id = %subscription_id, anchor = %anchor, "Updating billing anchor");
        self.apply(
            subscription_id,
            UpdateSubscription::new().with_trial_end(TrialEnd::At(anchor)),
        )
        .await
    }

    async fn update_billing_anchor_for_all(
        &self,
        anchor: DateTime<Utc>,
    ) -> Result<Vec<Subscription>> {
        let subscriptions = self.get_all(true).await?;
        let mut updated = Vec::with_capacity(subscriptions.len());

        for (index, subscription) in subscriptions.iter().enumerate() {
            match self.update_billing_anchor(&subscription.id, anchor).await {
                Ok(Some(s)) => updated.push(s),
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        subscription_id = %subscription.id,
                        completed = index,
                        remaining = subscriptions.len() - index,
                        "Billing anchor update aborted"
                    );
                    return Err(e);
                }
            }
        }

        Ok(updated)
    }

    async fn cancel_by_id(&self, subscription_id: &str) -> Result<Option<Subscription>> {
        let gateway = self.gateway().await?;
        let canceled = found(gateway.cancel(subscription_id).await)?;
        if canceled.is_some() {
            info!(subscription_id = %subscription_id, "Subscription canceled");
        }
        Ok(canceled)
    }

    async fn cancel_by_user_id(&self, user_id: &str) -> Result<Option<Subscription>> {
        match self.get_by_user_id(user_id).await? {
            Some(subscription) => self.cancel_by_id(&subscription.id).await,
            None => {
                debug!(user_id = %user_id, "No subscription to cancel for user");
                Ok(None)
            }
        }
    }

    async fn cancel_at_period_end(&self, subscription_id: &str) -> Result<Option<Subscription>> {
        info!(subscription_id = %subscription_id, "Scheduling cancellation at period end");
        self.apply(
            subscription_id,
            UpdateSubscription::new().with_cancel_at_period_end(true),
        )
        .await
    }

    async fn reactivate(&self, subscription_id: &str) -> Result<Option<Subscription>> {
        info!(subscription_id = %subscription_id, "Reactivating subscription");
        self.apply(
            subscription_id,
            UpdateSubscription::new().with_cancel_at_period_end(false),
        )
        .await
    }

    async fn cancel_all(&self) -> Result<Vec<Subscription>> {
        let subscriptions = self.get_all(false).await?;
        let mut canceled = Vec::with_capacity(subscriptions.len());

        for (index, subscription) in subscriptions.iter().enumerate() {
            match self.cancel_by_id(&subscription.id).await {
                Ok(Some(s)) => canceled.push(s),
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        subscription_id = %subscription.id,
                        completed = index,
                        remaining = subscriptions.len() - index,
                        "Bulk cancellation aborted"
                    );
                    return Err(e);
                }
            }
        }

        info!(count = canceled.len(), "All subscriptions canceled");
        Ok(canceled)
    }

    async fn is_active(&self, subscription_id: &str) -> Result<bool> {
        Ok(self
            .get_by_id(subscription_id)
            .await?
            .is_some_and(|s| s.is_active()))
    }
}
