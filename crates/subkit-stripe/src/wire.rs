//! Conversions between Stripe SDK resources and Subkit types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stripe::Expandable;
use subkit_core::{
    ListPage, SearchPage, StatusFilter, Subscription, SubscriptionItem, SubscriptionStatus,
};

/// Query of `GET /v1/subscriptions/search`.
#[derive(Debug, Serialize)]
pub(crate) struct SearchParams<'a> {
    pub query: &'a str,
    pub limit: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<&'a str>,
}

/// Page of `GET /v1/subscriptions/search`.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResult {
    pub data: Vec<stripe::Subscription>,
    #[serde(default)]
    pub has_more: bool,
    pub next_page: Option<String>,
}

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

pub(crate) fn status(status: stripe::SubscriptionStatus) -> SubscriptionStatus {
    match status {
        stripe::SubscriptionStatus::Active => SubscriptionStatus::Active,
        stripe::SubscriptionStatus::Canceled => SubscriptionStatus::Canceled,
        stripe::SubscriptionStatus::Incomplete => SubscriptionStatus::Incomplete,
        stripe::SubscriptionStatus::IncompleteExpired => SubscriptionStatus::IncompleteExpired,
        stripe::SubscriptionStatus::PastDue => SubscriptionStatus::PastDue,
        stripe::SubscriptionStatus::Trialing => SubscriptionStatus::Trialing,
        stripe::SubscriptionStatus::Unpaid => SubscriptionStatus::Unpaid,
        stripe::SubscriptionStatus::Paused => SubscriptionStatus::Paused,
    }
}

pub(crate) fn status_filter(filter: StatusFilter) -> stripe::SubscriptionStatusFilter {
    use stripe::SubscriptionStatusFilter as Filter;

    match filter {
        StatusFilter::All => Filter::All,
        StatusFilter::Only(status) => match status {
            SubscriptionStatus::Active => Filter::Active,
            SubscriptionStatus::PastDue => Filter::PastDue,
            SubscriptionStatus::Unpaid => Filter::Unpaid,
            SubscriptionStatus::Canceled => Filter::Canceled,
            SubscriptionStatus::Incomplete => Filter::Incomplete,
            SubscriptionStatus::IncompleteExpired => Filter::IncompleteExpired,
            SubscriptionStatus::Trialing => Filter::Trialing,
            SubscriptionStatus::Paused => Filter::Paused,
        },
    }
}

pub(crate) fn subscription(sub: stripe::Subscription) -> Subscription {
    let customer_id = match &sub.customer {
        Expandable::Id(id) => id.to_string(),
        Expandable::Object(customer) => customer.id.to_string(),
    };

    let items = sub
        .items
        .data
        .iter()
        .map(|item| SubscriptionItem {
            id: item.id.to_string(),
            price_id: item
                .price
                .as_ref()
                .map(|price| price.id.to_string())
                .unwrap_or_default(),
            quantity: item.quantity,
        })
        .collect();

    Subscription {
        id: sub.id.to_string(),
        customer_id,
        status: status(sub.status),
        cancel_at_period_end: sub.cancel_at_period_end,
        trial_end: sub.trial_end.and_then(timestamp),
        current_period_start: timestamp(sub.current_period_start),
        current_period_end: timestamp(sub.current_period_end),
        created: timestamp(sub.created),
        items,
        metadata: sub.metadata,
    }
}

pub(crate) fn list_page(list: stripe::List<stripe::Subscription>) -> ListPage<Subscription> {
    ListPage {
        data: list.data.into_iter().map(subscription).collect(),
        has_more: list.has_more,
    }
}

pub(crate) fn search_page(result: SearchResult) -> SearchPage<Subscription> {
    SearchPage {
        data: result.data.into_iter().map(subscription).collect(),
        has_more: result.has_more,
        next_page: result.next_page,
    }
}
