use reqwest::Client;
use tracing::debug;

use super::types::{FeedId, PriceObservation, PriceUpdate, RawPriceFeed, UpdatePayload};
use super::{get_json, OracleStrategy};
use crate::constants::oracle::{LATEST_PRICE_FEEDS_PATH, LATEST_VAAS_PATH};
use crate::error::{RelayError, Result};

/// Client for the price service's legacy REST API
#[derive(Clone)]
pub struct LegacyRestClient {
    client: Client,
    base_url: String,
}

impl LegacyRestClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn ids_query(feed_ids: &[FeedId]) -> Vec<(&'static str, String)> {
        feed_ids
            .iter()
            .map(|id| ("ids[]", id.as_unprefixed().to_string()))
            .collect()
    }

    pub async fn latest_price_feeds(&self, feed_ids: &[FeedId]) -> Result<Vec<RawPriceFeed>> {
        get_json(
            &self.client,
            &self.base_url,
            LATEST_PRICE_FEEDS_PATH,
            &Self::ids_query(feed_ids),
        )
        .await
    }

    /// Raw signed attestations, base64 encoded
    pub async fn latest_vaas(&self, feed_ids: &[FeedId]) -> Result<Vec<String>> {
        get_json(
            &self.client,
            &self.base_url,
            LATEST_VAAS_PATH,
            &Self::ids_query(feed_ids),
        )
        .await
    }

    pub async fn latest_observation(&self, feed_id: &FeedId) -> Result<PriceObservation> {
        let feeds = self.latest_price_feeds(std::slice::from_ref(feed_id)).await?;
        feeds
            .iter()
            .find(|feed| feed_id.matches(&feed.id))
            .ok_or_else(|| RelayError::FeedNotFound(feed_id.to_string()))?
            .to_observation()
    }

    pub async fn fetch_update(&self, feed_id: &FeedId) -> Result<PriceUpdate> {
        let observation = self.latest_observation(feed_id).await?;

        let vaas = self.latest_vaas(std::slice::from_ref(feed_id)).await?;
        if vaas.is_empty() {
            return Err(RelayError::EmptyPayload(feed_id.to_string()));
        }
        debug!("Decoding {} attestation(s) from REST API", vaas.len());

        Ok(PriceUpdate {
            observation,
            payload: UpdatePayload::from_base64(&vaas)?,
            source: OracleStrategy::RestFallback,
        })
    }
}
