//! # Connector Configuration
//!
//! Environment-aware configuration for the extraction and synchronization
//! jobs. Defaults are suitable for local development against the fixture
//! clients; every value can be overridden through `HMC_*` environment
//! variables. Parse failures surface as [`ConnectorError::Configuration`]
//! instead of silently falling back.

use crate::error::{ConnectorError, Result};
use std::collections::HashMap;
use std::time::Duration;

/// Top-level configuration consumed by the connector core.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    pub mirakl: MiraklConfig,
    pub hyperwallet: HyperwalletConfig,
    pub retry: RetryConfig,
    pub invoices: InvoicesConfig,
    pub alerts: AlertsConfig,
    /// Raw currency-priority specification, parsed by
    /// `sellers::currency::CurrencyPriorityConfig`.
    pub currency_priorities: String,
    /// Select the in-memory fixture clients instead of the HTTP clients.
    pub use_fixture_clients: bool,
}

/// Mirakl operator API access.
#[derive(Debug, Clone)]
pub struct MiraklConfig {
    pub base_url: String,
    pub operator_api_key: String,
}

/// Hyperwallet REST API access. `programs` maps a program name (as stored in
/// the shop's `hw-program` custom field) to its issuing program token.
#[derive(Debug, Clone)]
pub struct HyperwalletConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub programs: HashMap<String, String>,
}

/// Retry behaviour for per-item Hyperwallet operations. Attempt count and
/// delay are configuration, never hard-coded at call sites.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay: Duration,
}

/// Accounting-document extraction tuning.
#[derive(Debug, Clone)]
pub struct InvoicesConfig {
    /// Lookback window applied when searching accounting documents by
    /// explicit identifier. Must be wide enough to contain the requested
    /// documents.
    pub id_search_max_lookback_minutes: i64,
}

/// Alert channel settings. A missing webhook URL selects the log-only
/// notifier.
#[derive(Debug, Clone)]
pub struct AlertsConfig {
    pub webhook_url: Option<String>,
    pub from: String,
    pub to: String,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            mirakl: MiraklConfig {
                base_url: "https://operator.mirakl.net".to_string(),
                operator_api_key: String::new(),
            },
            hyperwallet: HyperwalletConfig {
                base_url: "https://api.sandbox.hyperwallet.com".to_string(),
                username: String::new(),
                password: String::new(),
                programs: HashMap::new(),
            },
            retry: RetryConfig {
                max_attempts: 3,
                delay: Duration::from_secs(2),
            },
            invoices: InvoicesConfig {
                id_search_max_lookback_minutes: 15,
            },
            alerts: AlertsConfig {
                webhook_url: None,
                from: "connector@hmc.local".to_string(),
                to: "operators@hmc.local".to_string(),
            },
            currency_priorities: String::new(),
            use_fixture_clients: false,
        }
    }
}

impl ConnectorConfig {
    /// Build the configuration from defaults plus `HMC_*` environment
    /// variable overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("HMC_MIRAKL_BASE_URL") {
            config.mirakl.base_url = url;
        }
        if let Ok(key) = std::env::var("HMC_MIRAKL_API_KEY") {
            config.mirakl.operator_api_key = key;
        }
        if let Ok(url) = std::env::var("HMC_HYPERWALLET_BASE_URL") {
            config.hyperwallet.base_url = url;
        }
        if let Ok(username) = std::env::var("HMC_HYPERWALLET_USERNAME") {
            config.hyperwallet.username = username;
        }
        if let Ok(password) = std::env::var("HMC_HYPERWALLET_PASSWORD") {
            config.hyperwallet.password = password;
        }
        if let Ok(programs) = std::env::var("HMC_HYPERWALLET_PROGRAMS") {
            config.hyperwallet.programs = parse_program_map(&programs)?;
        }
        if let Ok(attempts) = std::env::var("HMC_RETRY_MAX_ATTEMPTS") {
            config.retry.max_attempts = attempts.parse().map_err(|e| {
                ConnectorError::Configuration(format!("Invalid retry max attempts: {e}"))
            })?;
        }
        if let Ok(delay_ms) = std::env::var("HMC_RETRY_DELAY_MS") {
            let millis: u64 = delay_ms.parse().map_err(|e| {
                ConnectorError::Configuration(format!("Invalid retry delay: {e}"))
            })?;
            config.retry.delay = Duration::from_millis(millis);
        }
        if let Ok(minutes) = std::env::var("HMC_INVOICES_ID_SEARCH_LOOKBACK_MINUTES") {
            config.invoices.id_search_max_lookback_minutes = minutes.parse().map_err(|e| {
                ConnectorError::Configuration(format!("Invalid id-search lookback: {e}"))
            })?;
        }
        if let Ok(url) = std::env::var("HMC_ALERTS_WEBHOOK_URL") {
            config.alerts.webhook_url = Some(url);
        }
        if let Ok(from) = std::env::var("HMC_ALERTS_FROM") {
            config.alerts.from = from;
        }
        if let Ok(to) = std::env::var("HMC_ALERTS_TO") {
            config.alerts.to = to;
        }
        if let Ok(priorities) = std::env::var("HMC_CURRENCY_PRIORITIES") {
            config.currency_priorities = priorities;
        }
        if let Ok(fixture) = std::env::var("HMC_USE_FIXTURE_CLIENTS") {
            config.use_fixture_clients = fixture.parse().map_err(|e| {
                ConnectorError::Configuration(format!("Invalid fixture-clients flag: {e}"))
            })?;
        }

        Ok(config)
    }
}

/// Parse a `program=token,program=token` specification into the program map.
fn parse_program_map(spec: &str) -> Result<HashMap<String, String>> {
    let mut programs = HashMap::new();
    for entry in spec.split(',').filter(|e| !e.trim().is_empty()) {
        let (name, token) = entry.split_once('=').ok_or_else(|| {
            ConnectorError::Configuration(format!(
                "Invalid program mapping entry '{entry}', expected name=token"
            ))
        })?;
        programs.insert(name.trim().to_string(), token.trim().to_string());
    }
    Ok(programs)
}
