//! Stripe response bodies for tests.

use serde_json::{Value, json};

/// Factory for Stripe subscription objects.
pub struct SubscriptionFixture;

impl SubscriptionFixture {
    /// A subscription with one item and a `userId` tag, shaped like
    /// Stripe's full resource.
    pub fn new(id: &str, customer: &str, user_id: &str, status: &str) -> Value {
        json!({
            "id": id,
            "object": "subscription",
            "application": null,
            "application_fee_percent": null,
            "automatic_tax": {"enabled": false, "liability": null},
            "billing_cycle_anchor": 1767225600,
            "billing_cycle_anchor_config": null,
            "billing_thresholds": null,
            "cancel_at": null,
            "cancel_at_period_end": false,
            "canceled_at": null,
            "cancellation_details": null,
            "collection_method": "charge_automatically",
            "created": 1767225600,
            "currency": "usd",
            "current_period_end": 1769904000,
            "current_period_start": 1767225600,
            "customer": customer,
            "days_until_due": null,
            "default_payment_method": null,
            "default_source": null,
            "default_tax_rates": [],
            "description": null,
            "discount": null,
            "discounts": [],
            "ended_at": null,
            "invoice_settings": {"account_tax_ids": null, "issuer": {"type": "self"}},
            "items": {
                "object": "list",
                "data": [{
                    "id": format!("si_{}", id),
                    "object": "subscription_item",
                    "billing_thresholds": null,
                    "created": 1767225600,
                    "discounts": [],
                    "metadata": {},
                    "price": price("price_basic"),
                    "quantity": 1,
                    "subscription": id,
                    "tax_rates": []
                }],
                "has_more": false,
                "total_count": 1,
                "url": format!("/v1/subscription_items?subscription={}", id)
            },
            "latest_invoice": null,
            "livemode": false,
            "metadata": {"userId": user_id},
            "next_pending_invoice_item_invoice": null,
            "on_behalf_of": null,
            "pause_collection": null,
            "payment_settings": null,
            "pending_invoice_item_interval": null,
            "pending_setup_intent": null,
            "pending_update": null,
            "schedule": null,
            "start_date": 1767225600,
            "status": status,
            "test_clock": null,
            "transfer_data": null,
            "trial_end": null,
            "trial_settings": null,
            "trial_start": null
        })
    }

    pub fn active(id: &str, user_id: &str) -> Value {
        Self::new(id, &format!("cus_{}", user_id), user_id, "active")
    }

    pub fn with_status(mut subscription: Value, status: &str) -> Value {
        subscription["status"] = json!(status);
        subscription
    }

    pub fn with_field(mut subscription: Value, key: &str, value: Value) -> Value {
        subscription[key] = value;
        subscription
    }
}

/// A monthly recurring price.
pub fn price(id: &str) -> Value {
    json!({
        "id": id,
        "object": "price",
        "active": true,
        "billing_scheme": "per_unit",
        "created": 1767225600,
        "currency": "usd",
        "custom_unit_amount": null,
        "livemode": false,
        "lookup_key": null,
        "metadata": {},
        "nickname": null,
        "product": "prod_basic",
        "recurring": {
            "aggregate_usage": null,
            "interval": "month",
            "interval_count": 1,
            "trial_period_days": null,
            "usage_type": "licensed"
        },
        "tax_behavior": "unspecified",
        "tiers_mode": null,
        "transform_quantity": null,
        "type": "recurring",
        "unit_amount": 900,
        "unit_amount_decimal": "900"
    })
}

/// A list page.
pub fn list_page(data: Vec<Value>, has_more: bool) -> Value {
    json!({
        "object": "list",
        "url": "/v1/subscriptions",
        "data": data,
        "has_more": has_more
    })
}

/// A search result page.
pub fn search_page(data: Vec<Value>) -> Value {
    json!({
        "object": "search_result",
        "url": "/v1/subscriptions/search",
        "data": data,
        "has_more": false,
        "next_page": null
    })
}

/// A Stripe error body.
pub fn stripe_error(kind: &str, message: &str) -> Value {
    json!({"error": {"type": kind, "message": message}})
}

/// A declined-card error body.
pub fn card_declined() -> Value {
    json!({
        "error": {
            "type": "card_error",
            "code": "card_declined",
            "decline_code": "generic_decline",
            "message": "Your card was declined."
        }
    })
}
