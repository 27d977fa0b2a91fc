//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber
//! - Resolve the log filter (RUST_LOG first, then configuration)

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `default_filter` applies only when `RUST_LOG` is unset or invalid.
pub fn init(default_filter: &str) {
    tracing_subscriber::registry()
        .with(resolve_filter(default_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn resolve_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}
