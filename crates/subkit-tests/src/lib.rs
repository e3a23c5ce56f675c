#![recursion_limit = "256"]

//! Integration test infrastructure for Subkit.
//!
//! Runs the subscription manager against a `wiremock` server that
//! answers like Stripe's subscription API.
//!
//! # Usage
//!
//! ```ignore
//! use subkit_tests::StripeStub;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let stub = StripeStub::start().await;
//!     let manager = stub.manager();
//!     // Mount expectations on stub.server, then drive the manager.
//! }
//! ```

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;

/// Initialize test logging (call once per test binary).
pub fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,subkit_billing=debug,subkit_stripe=debug")),
        )
        .with_test_writer()
        .try_init();
}
