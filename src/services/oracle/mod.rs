//! Oracle Client
//!
//! Fetches signed price updates from the Hermes price service. The fetch path is an
//! explicit strategy chosen once at startup: the native v2 endpoints with a single
//! fallback to the legacy REST API, or the REST API alone.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use futures::stream::BoxStream;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

pub mod hermes;
pub mod rest;
pub mod types;

pub use hermes::HermesClient;
pub use rest::LegacyRestClient;
pub use types::{FeedId, PriceObservation, PriceUpdate, UpdatePayload};

use crate::error::{RelayError, Result};

/// Stream of observations pushed by the price service
pub type ObservationStream = BoxStream<'static, Result<PriceObservation>>;

/// How price updates are obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleStrategy {
    /// Native v2 endpoints, falling back to the REST API once on failure
    Native,
    /// Legacy REST endpoints only
    RestFallback,
}

impl OracleStrategy {
    /// Whether the strategy can open a push subscription
    pub fn supports_streaming(&self) -> bool {
        matches!(self, OracleStrategy::Native)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OracleStrategy::Native => "native",
            OracleStrategy::RestFallback => "rest",
        }
    }
}

impl FromStr for OracleStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "native" | "sdk" | "native-sdk" => Ok(OracleStrategy::Native),
            "rest" | "rest-fallback" => Ok(OracleStrategy::RestFallback),
            other => Err(format!(
                "unknown oracle strategy '{}', expected 'native' or 'rest'",
                other
            )),
        }
    }
}

impl fmt::Display for OracleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Oracle client shared by the relay workflow and the price monitor
#[derive(Clone)]
pub struct OracleClient {
    strategy: OracleStrategy,
    hermes: HermesClient,
    rest: LegacyRestClient,
}

impl OracleClient {
    pub fn new(base_url: &str, strategy: OracleStrategy, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(request_timeout).build()?;
        let base_url = base_url.trim_end_matches('/');

        Ok(Self {
            strategy,
            hermes: HermesClient::new(client.clone(), base_url),
            rest: LegacyRestClient::new(client, base_url),
        })
    }

    pub fn strategy(&self) -> OracleStrategy {
        self.strategy
    }

    /// Fetch the latest signed update for one feed
    pub async fn fetch_update(&self, feed_id: &FeedId) -> Result<PriceUpdate> {
        let update = match self.strategy {
            OracleStrategy::Native => match self.hermes.fetch_update(feed_id).await {
                Ok(update) => update,
                Err(e) => {
                    warn!("Native price fetch failed: {}. Falling back to REST API", e);
                    self.rest.fetch_update(feed_id).await?
                }
            },
            OracleStrategy::RestFallback => self.rest.fetch_update(feed_id).await?,
        };

        info!(
            "Fetched {} update for {}: price={} ± {} ({} payload(s), {} bytes)",
            update.source,
            feed_id,
            update.observation.decoded_price(),
            update.observation.decoded_conf(),
            update.payload.len(),
            update.payload.total_bytes()
        );

        Ok(update)
    }

    /// Latest observation only, without attestation data
    pub async fn latest_observation(&self, feed_id: &FeedId) -> Result<PriceObservation> {
        match self.strategy {
            OracleStrategy::Native => match self.hermes.latest_observation(feed_id).await {
                Ok(observation) => Ok(observation),
                Err(e) => {
                    warn!("Native price query failed: {}. Falling back to REST API", e);
                    self.rest.latest_observation(feed_id).await
                }
            },
            OracleStrategy::RestFallback => self.rest.latest_observation(feed_id).await,
        }
    }

    /// Open a push subscription that lasts at most `max_duration`
    pub async fn subscribe(
        &self,
        feed_id: &FeedId,
        max_duration: Duration,
    ) -> Result<ObservationStream> {
        if !self.strategy.supports_streaming() {
            return Err(RelayError::StreamUnsupported(self.strategy.as_str()));
        }
        self.hermes.stream_observations(feed_id, max_duration).await
    }
}

/// Map non-success statuses to `RelayError::OracleStatus`
pub(crate) fn check_status(response: Response, endpoint: &str) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(RelayError::OracleStatus {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    base_url: &str,
    path: &str,
    query: &[(&str, String)],
) -> Result<T> {
    let url = format!("{}{}", base_url, path);
    let response = client.get(&url).query(query).send().await?;
    let response = check_status(response, path)?;
    response
        .json::<T>()
        .await
        .map_err(|e| RelayError::Decode(format!("invalid response from {}: {}", path, e)))
}
