// Oracle Client Integration Test
// Exercises the native fetch path and its single REST fallback against a mocked
// Hermes service.

mod common;

use std::str::FromStr;
use std::time::Duration;

use price_relay::error::RelayError;
use price_relay::services::oracle::{FeedId, OracleClient, OracleStrategy};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{latest_updates_body, legacy_feeds_body, FEED_ID, VAA_BASE64, VAA_HEX};

fn feed() -> FeedId {
    FeedId::from_str(FEED_ID).expect("valid feed id")
}

fn client(server: &MockServer, strategy: OracleStrategy) -> OracleClient {
    OracleClient::new(&server.uri(), strategy, Duration::from_secs(5))
        .expect("oracle client should build")
}

async fn mount_legacy(server: &MockServer, price: i64, expo: i32, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/latest_price_feeds"))
        .and(query_param("ids[]", FEED_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(legacy_feeds_body(price, expo)))
        .expect(expected_calls)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/latest_vaas"))
        .and(query_param("ids[]", FEED_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([VAA_BASE64])))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_native_path_uses_binary_update() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/updates/price/latest"))
        .and(query_param("ids[]", format!("0x{}", FEED_ID)))
        .and(query_param("encoding", "hex"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(latest_updates_body(612_345_678_901, -8)),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_legacy(&server, 1, 0, 0).await;

    let update = client(&server, OracleStrategy::Native)
        .fetch_update(&feed())
        .await
        .expect("native fetch should succeed");

    assert_eq!(update.source, OracleStrategy::Native);
    assert_eq!(update.payload.as_hex(), vec![VAA_HEX.to_string()]);
    assert!((update.observation.decoded_price() - 6123.45678901).abs() < 1e-9);
    assert_eq!(update.observation.publish_time, 1_700_000_000);
}

#[tokio::test]
async fn test_native_path_serializes_per_feed_attestations() {
    let server = MockServer::start().await;

    let body = json!({
        "parsed": [{
            "id": FEED_ID,
            "price": common::raw_price(250_000, -2),
            "vaa": VAA_BASE64
        }]
    });
    Mock::given(method("GET"))
        .and(path("/v2/updates/price/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;
    mount_legacy(&server, 1, 0, 0).await;

    let update = client(&server, OracleStrategy::Native)
        .fetch_update(&feed())
        .await
        .expect("per-feed serialization should succeed");

    assert_eq!(update.source, OracleStrategy::Native);
    assert_eq!(update.payload.as_hex(), vec![VAA_HEX.to_string()]);
    assert!((update.observation.decoded_price() - 2500.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_native_failure_falls_back_to_rest_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/updates/price/latest"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    mount_legacy(&server, 300_012_345_678, -8, 1).await;

    let update = client(&server, OracleStrategy::Native)
        .fetch_update(&feed())
        .await
        .expect("fallback should succeed");

    assert_eq!(update.source, OracleStrategy::RestFallback);
    assert!(!update.payload.is_empty());
    for blob in update.payload.as_hex() {
        assert!(blob.starts_with("0x"));
        assert!(blob.len() > 2);
    }
    assert_eq!(update.payload.as_hex(), vec![VAA_HEX.to_string()]);
    assert!((update.observation.decoded_price() - 3000.12345678).abs() < 1e-9);
    // MockServer verifies the `expect` counts when dropped
}

#[tokio::test]
async fn test_missing_feed_triggers_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/updates/price/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"parsed": []})))
        .expect(1)
        .mount(&server)
        .await;
    mount_legacy(&server, 42, 0, 1).await;

    let update = client(&server, OracleStrategy::Native)
        .fetch_update(&feed())
        .await
        .expect("fallback should succeed");

    assert_eq!(update.source, OracleStrategy::RestFallback);
    assert_eq!(update.observation.decoded_price(), 42.0);
}

#[tokio::test]
async fn test_rest_strategy_skips_native_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/updates/price/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(latest_updates_body(1, 0)))
        .expect(0)
        .mount(&server)
        .await;
    mount_legacy(&server, 7, 0, 1).await;

    let update = client(&server, OracleStrategy::RestFallback)
        .fetch_update(&feed())
        .await
        .expect("rest fetch should succeed");

    assert_eq!(update.source, OracleStrategy::RestFallback);
    assert_eq!(update.observation.decoded_price(), 7.0);
}

#[tokio::test]
async fn test_both_paths_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/updates/price/latest"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/latest_price_feeds"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, OracleStrategy::Native)
        .fetch_update(&feed())
        .await
        .expect_err("both paths should fail");

    assert!(matches!(
        err,
        RelayError::OracleStatus { status: 502, .. }
    ));
}

#[tokio::test]
async fn test_empty_vaa_list_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/latest_price_feeds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(legacy_feeds_body(1, 0)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/latest_vaas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = client(&server, OracleStrategy::RestFallback)
        .fetch_update(&feed())
        .await
        .expect_err("empty attestation list should fail");

    assert!(matches!(err, RelayError::EmptyPayload(_)));
}

#[tokio::test]
async fn test_request_timeout_is_enforced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/latest_price_feeds"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(legacy_feeds_body(1, 0))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = OracleClient::new(
        &server.uri(),
        OracleStrategy::RestFallback,
        Duration::from_millis(200),
    )
    .expect("oracle client should build");

    let err = client
        .latest_observation(&feed())
        .await
        .expect_err("slow response should time out");

    match err {
        RelayError::Http(e) => assert!(e.is_timeout()),
        other => panic!("expected a timeout, got {:?}", other),
    }
}
