//! Subscription management for Subkit.
//!
//! [`SubscriptionManager`] exposes create, read, update and cancel
//! operations over provider-owned subscriptions, delegating every call to
//! a lazily provisioned gateway handle.

pub mod config;
pub mod manager;

#[cfg(test)]
mod mock;

pub use config::{BillingConfig, ManagerConfig};
pub use manager::SubscriptionManager;
pub use subkit_core::SubscriptionService;
