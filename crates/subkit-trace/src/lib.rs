//! Logging setup for Subkit.
//!
//! Installs a `tracing-subscriber` registry with an env filter and a
//! human-readable or JSON formatter.

pub mod logging;

pub use logging::{LogFormat, LoggingConfig, TraceError, init_logging};
