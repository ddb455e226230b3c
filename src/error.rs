//! # Structured Error Handling
//!
//! Error taxonomy for the connector core. Each upstream system gets its own
//! variant so call sites can decide whether a failure aborts the run (listing
//! fetch), is isolated to a partition (shop lookup) or to a single item
//! (strategy execution).

use thiserror::Error;

/// Errors produced by the connector core and its upstream clients.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The Mirakl operator API rejected or failed a request.
    #[error("Mirakl API error (status {status}): {message}")]
    MiraklApi { status: u16, message: String },

    /// The Hyperwallet REST API rejected or failed a request.
    #[error("Hyperwallet API error (status {status}): {message}")]
    HyperwalletApi { status: u16, message: String },

    /// Transport-level failure before any API-level response was obtained.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid or missing configuration (unknown program, bad env value, ...).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The alert channel failed to deliver a notification. Always swallowed
    /// at the notification boundary, never propagated by the pipeline.
    #[error("Notification error: {0}")]
    Notification(String),
}

pub type Result<T> = std::result::Result<T, ConnectorError>;
