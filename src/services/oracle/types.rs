use std::fmt;
use std::str::FromStr;

use alloy::primitives::Bytes;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use super::OracleStrategy;
use crate::error::{RelayError, Result};
use crate::utils::{decode_base64, decode_hex, to_prefixed_hex};

/// 32-byte price feed identifier, stored as 64 lowercase hex digits without prefix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedId(String);

impl FeedId {
    /// Identifier as the legacy REST API reports it (no `0x`)
    pub fn as_unprefixed(&self) -> &str {
        &self.0
    }

    /// Whether an identifier from an oracle response names this feed
    pub fn matches(&self, other: &str) -> bool {
        let other = other.trim();
        let other = other.strip_prefix("0x").unwrap_or(other);
        self.0.eq_ignore_ascii_case(other)
    }
}

impl FromStr for FeedId {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != 64 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(RelayError::Decode(format!(
                "feed id must be 32 bytes of hex, got '{}'",
                s
            )));
        }

        Ok(FeedId(digits.to_ascii_lowercase()))
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.0)
    }
}

/// A single price observation as published by the oracle network
#[derive(Debug, Clone, PartialEq)]
pub struct PriceObservation {
    pub feed_id: FeedId,
    pub price: i64,
    pub conf: u64,
    pub expo: i32,
    /// Unix seconds
    pub publish_time: i64,
}

impl PriceObservation {
    /// Exact `price × 10^expo`, when it fits a decimal
    pub fn price_decimal(&self) -> Option<Decimal> {
        scale(self.price, self.expo)
    }

    /// `price × 10^expo` as a float, for display and percent changes
    pub fn decoded_price(&self) -> f64 {
        self.price_decimal()
            .and_then(|d| d.to_f64())
            .unwrap_or_else(|| self.price as f64 * 10f64.powi(self.expo))
    }

    /// Confidence interval scaled with the same exponent as the price
    pub fn decoded_conf(&self) -> f64 {
        i64::try_from(self.conf)
            .ok()
            .and_then(|conf| scale(conf, self.expo))
            .and_then(|d| d.to_f64())
            .unwrap_or_else(|| self.conf as f64 * 10f64.powi(self.expo))
    }

    pub fn publish_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.publish_time, 0)
    }
}

fn scale(mantissa: i64, expo: i32) -> Option<Decimal> {
    if expo <= 0 {
        let scale = expo.unsigned_abs();
        if scale > 28 {
            return None;
        }
        Decimal::try_from_i128_with_scale(mantissa as i128, scale).ok()
    } else {
        let factor = 10i64.checked_pow(expo.unsigned_abs())?;
        Decimal::from(mantissa).checked_mul(Decimal::from(factor))
    }
}

/// Signed attestation blobs, passed unmodified from fetch to submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePayload(Vec<Vec<u8>>);

impl UpdatePayload {
    pub fn new(blobs: Vec<Vec<u8>>) -> Result<Self> {
        if blobs.is_empty() || blobs.iter().any(|b| b.is_empty()) {
            return Err(RelayError::Decode("update payload is empty".to_string()));
        }
        Ok(UpdatePayload(blobs))
    }

    /// Serialize each feed's base64 attestation individually
    pub fn from_base64<S: AsRef<str>>(attestations: &[S]) -> Result<Self> {
        let blobs = attestations
            .iter()
            .map(|vaa| decode_base64(vaa.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(blobs)
    }

    /// Decode a pre-serialized hex update
    pub fn from_hex<S: AsRef<str>>(chunks: &[S]) -> Result<Self> {
        let blobs = chunks
            .iter()
            .map(|chunk| decode_hex(chunk.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(blobs)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `0x`-prefixed hex strings, one per blob
    pub fn as_hex(&self) -> Vec<String> {
        self.0.iter().map(|b| to_prefixed_hex(b)).collect()
    }

    /// ABI `bytes[]` argument
    pub fn to_call_data(&self) -> Vec<Bytes> {
        self.0.iter().cloned().map(Bytes::from).collect()
    }

    pub fn total_bytes(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }
}

/// A fetched update ready for submission
#[derive(Debug, Clone)]
pub struct PriceUpdate {
    pub observation: PriceObservation,
    pub payload: UpdatePayload,
    /// Path that produced this update
    pub source: OracleStrategy,
}

// --- Wire formats ---

#[derive(Debug, Clone, Deserialize)]
pub struct RawPrice {
    #[serde(deserialize_with = "from_str_or_number")]
    pub price: i64,
    #[serde(deserialize_with = "from_str_or_number")]
    pub conf: u64,
    pub expo: i32,
    pub publish_time: i64,
}

/// Price feed entry shared by the native `parsed` list and the legacy REST API
#[derive(Debug, Clone, Deserialize)]
pub struct RawPriceFeed {
    pub id: String,
    pub price: RawPrice,
    #[serde(default)]
    pub ema_price: Option<RawPrice>,
    /// Base64 attestation, present when the service attaches one per feed
    #[serde(default)]
    pub vaa: Option<String>,
}

impl RawPriceFeed {
    pub fn to_observation(&self) -> Result<PriceObservation> {
        Ok(PriceObservation {
            feed_id: FeedId::from_str(&self.id)?,
            price: self.price.price,
            conf: self.price.conf,
            expo: self.price.expo,
            publish_time: self.price.publish_time,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BinaryUpdate {
    pub encoding: String,
    #[serde(default)]
    pub data: Vec<String>,
}

/// Body of the native latest-update endpoint and of each stream event
#[derive(Debug, Clone, Deserialize)]
pub struct LatestUpdatesResponse {
    #[serde(default)]
    pub binary: Option<BinaryUpdate>,
    #[serde(default)]
    pub parsed: Vec<RawPriceFeed>,
}

impl LatestUpdatesResponse {
    pub fn find_feed(&self, feed_id: &FeedId) -> Option<&RawPriceFeed> {
        self.parsed.iter().find(|feed| feed_id.matches(&feed.id))
    }
}

fn from_str_or_number<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Number(T),
        Text(String),
    }

    match Raw::<T>::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
