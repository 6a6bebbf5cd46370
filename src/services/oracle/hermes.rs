use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};
use reqwest::Client;
use tracing::debug;

use super::types::{FeedId, LatestUpdatesResponse, PriceObservation, PriceUpdate, UpdatePayload};
use super::{check_status, get_json, ObservationStream, OracleStrategy};
use crate::constants::oracle::{LATEST_UPDATES_PATH, STREAM_UPDATES_PATH};
use crate::error::{RelayError, Result};

/// Client for the price service's native v2 update endpoints
#[derive(Clone)]
pub struct HermesClient {
    client: Client,
    base_url: String,
}

impl HermesClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn update_query(feed_ids: &[FeedId]) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&'static str, String)> =
            feed_ids.iter().map(|id| ("ids[]", id.to_string())).collect();
        query.push(("encoding", "hex".to_string()));
        query.push(("parsed", "true".to_string()));
        query
    }

    /// Latest signed updates plus their parsed observations
    pub async fn latest_updates(&self, feed_ids: &[FeedId]) -> Result<LatestUpdatesResponse> {
        get_json(
            &self.client,
            &self.base_url,
            LATEST_UPDATES_PATH,
            &Self::update_query(feed_ids),
        )
        .await
    }

    pub async fn latest_observation(&self, feed_id: &FeedId) -> Result<PriceObservation> {
        let response = self.latest_updates(std::slice::from_ref(feed_id)).await?;
        response
            .find_feed(feed_id)
            .ok_or_else(|| RelayError::FeedNotFound(feed_id.to_string()))?
            .to_observation()
    }

    pub async fn fetch_update(&self, feed_id: &FeedId) -> Result<PriceUpdate> {
        let response = self.latest_updates(std::slice::from_ref(feed_id)).await?;

        let observation = response
            .find_feed(feed_id)
            .ok_or_else(|| RelayError::FeedNotFound(feed_id.to_string()))?
            .to_observation()?;

        let payload = match response.binary.as_ref().filter(|b| !b.data.is_empty()) {
            Some(binary) if binary.encoding.eq_ignore_ascii_case("base64") => {
                UpdatePayload::from_base64(&binary.data)?
            }
            Some(binary) => UpdatePayload::from_hex(&binary.data)?,
            None => {
                // No pre-serialized update: fall back to per-feed attestations
                let attestations: Vec<&str> = response
                    .parsed
                    .iter()
                    .filter_map(|feed| feed.vaa.as_deref())
                    .collect();
                if attestations.is_empty() {
                    return Err(RelayError::EmptyPayload(feed_id.to_string()));
                }
                debug!("Serializing {} per-feed attestations", attestations.len());
                UpdatePayload::from_base64(&attestations)?
            }
        };

        Ok(PriceUpdate {
            observation,
            payload,
            source: OracleStrategy::Native,
        })
    }

    /// Subscribe to the server-sent-events price stream
    ///
    /// The request timeout is replaced by `max_duration`, so the stream ends on its own
    /// once the caller's window has passed.
    pub async fn stream_observations(
        &self,
        feed_id: &FeedId,
        max_duration: Duration,
    ) -> Result<ObservationStream> {
        let url = format!("{}{}", self.base_url, STREAM_UPDATES_PATH);
        let response = self
            .client
            .get(&url)
            .query(&Self::update_query(std::slice::from_ref(feed_id)))
            .timeout(max_duration)
            .send()
            .await?;
        let response = check_status(response, STREAM_UPDATES_PATH)?;

        let feed_id = feed_id.clone();
        let observations = sse_data_events(response.bytes_stream()).map(move |event| {
            let data = event?;
            let update: LatestUpdatesResponse = serde_json::from_str(&data)
                .map_err(|e| RelayError::Decode(format!("invalid stream event: {}", e)))?;
            update
                .find_feed(&feed_id)
                .ok_or_else(|| RelayError::FeedNotFound(feed_id.to_string()))?
                .to_observation()
        });

        Ok(observations.boxed())
    }
}

/// Split a server-sent-events body into the payloads of its `data:` lines
fn sse_data_events<S, B>(body: S) -> impl Stream<Item = Result<String>> + Send + 'static
where
    S: Stream<Item = reqwest::Result<B>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    stream::unfold(
        (Box::pin(body), Vec::<u8>::new()),
        |(mut body, mut buffer)| async move {
            loop {
                if let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    let line = String::from_utf8_lossy(&line);
                    if let Some(data) = line.trim_end().strip_prefix("data:") {
                        let data = data.trim().to_string();
                        if !data.is_empty() {
                            return Some((Ok(data), (body, buffer)));
                        }
                    }
                    continue;
                }

                match body.next().await {
                    Some(Ok(chunk)) => buffer.extend_from_slice(chunk.as_ref()),
                    Some(Err(e)) => return Some((Err(RelayError::from(e)), (body, buffer))),
                    None => return None,
                }
            }
        },
    )
}
