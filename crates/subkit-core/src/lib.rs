//! Subkit Core
//!
//! Core domain types, port traits, and error handling for Subkit.
//! This crate has minimal dependencies and defines the shared vocabulary
//! used by the billing provider adapters and the subscription manager.

pub mod error;
pub mod ports;
pub mod request;
pub mod search;
pub mod subscription;

pub use error::{Error, Result};
pub use ports::{GatewayProvider, SubscriptionGateway, SubscriptionService};
pub use request::{
    CreateSubscriptionRequest, ItemUpdate, ListPage, ListSubscriptions, NewSubscription,
    ProrationBehavior, SearchPage, SearchSubscriptions, StatusFilter, TrialEnd,
    UpdateSubscription,
};
pub use search::SearchQuery;
pub use subscription::{
    Metadata, Subscription, SubscriptionItem, SubscriptionStatus, USER_ID_METADATA_KEY,
};
