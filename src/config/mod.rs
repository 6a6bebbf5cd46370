use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::constants::{chain, monitor, oracle};
use crate::services::oracle::{FeedId, OracleStrategy};

pub mod validation;
pub use validation::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub private_key: String,
    pub contract_address: String,
    pub pyth_contract_address: String,
    pub hermes_url: String,
    pub price_feed_id: FeedId,
    pub oracle_strategy: OracleStrategy,
    pub request_timeout_secs: u64,
    pub gas_limit: u64,
    pub monitor: MonitorConfig,
}

/// Price monitor settings
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub enabled: bool,
    pub duration_secs: u64,
    pub poll_interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            duration_secs: monitor::DEFAULT_DURATION_SECS,
            poll_interval_secs: monitor::DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl MonitorConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

/// Settings the `deploy` helper needs; nothing else is required for it
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub pyth_contract_address: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if it exists
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rpc_url = validation::require(&lookup, "RPC_URL")?;
        let private_key = validation::require(&lookup, "PRIVATE_KEY")?;
        let contract_address = validation::require(&lookup, "CONTRACT_ADDRESS")?;

        let price_feed_id = lookup("PRICE_FEED_ID")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| oracle::DEFAULT_PRICE_FEED_ID.to_string());
        let price_feed_id = FeedId::from_str(&price_feed_id).map_err(|e| {
            ConfigError::ValidationFailed(format!("PRICE_FEED_ID is invalid: {}", e))
        })?;

        let oracle_strategy = match lookup("ORACLE_STRATEGY").filter(|v| !v.trim().is_empty()) {
            Some(raw) => OracleStrategy::from_str(&raw).map_err(ConfigError::ValidationFailed)?,
            None => OracleStrategy::Native,
        };

        Ok(Config {
            rpc_url,
            private_key,
            contract_address,
            pyth_contract_address: lookup("PYTH_CONTRACT_ADDRESS")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| oracle::DEFAULT_PYTH_CONTRACT_ADDRESS.to_string()),
            hermes_url: lookup("HERMES_URL")
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| oracle::DEFAULT_HERMES_URL.to_string()),
            price_feed_id,
            oracle_strategy,
            request_timeout_secs: parse_or(
                &lookup,
                "ORACLE_REQUEST_TIMEOUT_SECS",
                oracle::DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
            gas_limit: parse_or(&lookup, "GAS_LIMIT", chain::DEFAULT_GAS_LIMIT),
            monitor: MonitorConfig {
                enabled: parse_or(&lookup, "MONITOR_ENABLED", false),
                duration_secs: parse_or(
                    &lookup,
                    "MONITOR_DURATION_SECS",
                    monitor::DEFAULT_DURATION_SECS,
                ),
                poll_interval_secs: parse_or(
                    &lookup,
                    "MONITOR_POLL_INTERVAL_SECS",
                    monitor::DEFAULT_POLL_INTERVAL_SECS,
                ),
            },
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl DeployConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            pyth_contract_address: env::var("PYTH_CONTRACT_ADDRESS")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| oracle::DEFAULT_PYTH_CONTRACT_ADDRESS.to_string()),
        }
    }
}

/// Parse an optional value, falling back to the default when unset or malformed
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Invalid {} value '{}', using default", key, raw);
                default
            }
        },
        None => default,
    }
}
