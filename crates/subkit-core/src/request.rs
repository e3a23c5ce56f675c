//! Request and paging types exchanged with a subscription gateway.

use crate::subscription::{Metadata, SubscriptionStatus, USER_ID_METADATA_KEY};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parameters for subscribing a customer to a single price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub customer_id: String,
    pub price_id: String,
    pub user_id: String,
    pub payment_method_id: Option<String>,
    pub trial_end: Option<DateTime<Utc>>,
}

impl NewSubscription {
    pub fn new(
        customer_id: impl Into<String>,
        price_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            price_id: price_id.into(),
            user_id: user_id.into(),
            payment_method_id: None,
            trial_end: None,
        }
    }

    pub fn with_payment_method(mut self, payment_method_id: impl Into<String>) -> Self {
        self.payment_method_id = Some(payment_method_id.into());
        self
    }

    pub fn with_trial_end(mut self, trial_end: DateTime<Utc>) -> Self {
        self.trial_end = Some(trial_end);
        self
    }

    /// Build the gateway request: one item, `userId` metadata, automatic tax off.
    pub fn into_request(self) -> CreateSubscriptionRequest {
        let mut metadata = Metadata::new();
        metadata.insert(USER_ID_METADATA_KEY.to_string(), self.user_id);

        CreateSubscriptionRequest {
            customer_id: self.customer_id,
            price_ids: vec![self.price_id],
            metadata,
            default_payment_method: self.payment_method_id,
            trial_end: self.trial_end.map(TrialEnd::At),
            automatic_tax: false,
        }
    }
}

/// Create request as sent to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSubscriptionRequest {
    pub customer_id: String,
    pub price_ids: Vec<String>,
    pub metadata: Metadata,
    pub default_payment_method: Option<String>,
    pub trial_end: Option<TrialEnd>,
    pub automatic_tax: bool,
}

/// Trial end: immediately, or at a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialEnd {
    Now,
    At(DateTime<Utc>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProrationBehavior {
    CreateProrations,
    None,
    AlwaysInvoice,
}

impl ProrationBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProrationBehavior::CreateProrations => "create_prorations",
            ProrationBehavior::None => "none",
            ProrationBehavior::AlwaysInvoice => "always_invoice",
        }
    }
}

/// Change to one subscription item. Without an `id` a new item is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUpdate {
    pub id: Option<String>,
    pub price_id: Option<String>,
    pub quantity: Option<u64>,
    pub deleted: bool,
}

impl ItemUpdate {
    /// Swap the price of an existing item.
    pub fn replace_price(item_id: impl Into<String>, price_id: impl Into<String>) -> Self {
        Self {
            id: Some(item_id.into()),
            price_id: Some(price_id.into()),
            quantity: None,
            deleted: false,
        }
    }

    pub fn add_price(price_id: impl Into<String>) -> Self {
        Self {
            id: None,
            price_id: Some(price_id.into()),
            quantity: None,
            deleted: false,
        }
    }
}

/// Update options; unset fields are left untouched by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSubscription {
    pub items: Option<Vec<ItemUpdate>>,
    pub cancel_at_period_end: Option<bool>,
    pub trial_end: Option<TrialEnd>,
    pub metadata: Option<Metadata>,
    pub default_payment_method: Option<String>,
    pub proration_behavior: Option<ProrationBehavior>,
}

impl UpdateSubscription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(mut self, items: Vec<ItemUpdate>) -> Self {
        self.items = Some(items);
        self
    }

    pub fn with_cancel_at_period_end(mut self, cancel: bool) -> Self {
        self.cancel_at_period_end = Some(cancel);
        self
    }

    pub fn with_trial_end(mut self, trial_end: TrialEnd) -> Self {
        self.trial_end = Some(trial_end);
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_default_payment_method(mut self, payment_method_id: impl Into<String>) -> Self {
        self.default_payment_method = Some(payment_method_id.into());
        self
    }

    pub fn with_proration_behavior(mut self, behavior: ProrationBehavior) -> Self {
        self.proration_behavior = Some(behavior);
        self
    }
}

/// Status filter for list calls. The provider omits canceled
/// subscriptions unless `All` is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(SubscriptionStatus),
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

/// Cursor-paginated list parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSubscriptions {
    pub customer_id: Option<String>,
    pub status: Option<StatusFilter>,
    pub limit: u32,
    pub starting_after: Option<String>,
}

impl ListSubscriptions {
    pub fn new(limit: u32) -> Self {
        Self {
            customer_id: None,
            status: None,
            limit,
            starting_after: None,
        }
    }

    pub fn for_customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = Some(status);
        self
    }

    pub fn starting_after(mut self, id: impl Into<String>) -> Self {
        self.starting_after = Some(id.into());
        self
    }
}

/// Search parameters; `page` is the token returned by the previous page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSubscriptions {
    pub query: String,
    pub limit: u32,
    pub page: Option<String>,
}

impl SearchSubscriptions {
    pub fn new(query: impl Into<String>, limit: u32) -> Self {
        Self {
            query: query.into(),
            limit,
            page: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub data: Vec<T>,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage<T> {
    pub data: Vec<T>,
    pub has_more: bool,
    pub next_page: Option<String>,
}
