#![recursion_limit = "256"]

//! Stripe subscription gateway for Subkit.
//!
//! Implements the [`SubscriptionGateway`](subkit_core::SubscriptionGateway)
//! port on the `async-stripe` client, and the
//! [`GatewayProvider`](subkit_core::GatewayProvider) that provisions it.

pub mod client;
pub mod config;
pub mod provider;
mod wire;

pub use client::StripeGateway;
pub use config::StripeConfig;
pub use provider::StripeProvider;
