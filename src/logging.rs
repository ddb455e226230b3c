//! # Structured Logging Module
//!
//! Environment-aware structured logging for the batch jobs. Console output
//! is human readable; setting `HMC_LOG_JSON=true` switches to JSON lines for
//! log shippers. Uses `try_init` so repeated initialisation (tests, embedded
//! use) is harmless.

use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging. Log level comes from `RUST_LOG` with an
/// `info` default.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let json_output = std::env::var("HMC_LOG_JSON")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let result = if json_output {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .json()
                        .with_filter(filter),
                )
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_filter(filter),
                )
                .try_init()
        };

        if result.is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }
    });
}
