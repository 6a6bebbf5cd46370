// Price Monitor Integration Test
// Bounded monitoring window in both polling and streaming modes.

mod common;

use std::str::FromStr;
use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use price_relay::services::oracle::{FeedId, OracleClient, OracleStrategy};
use price_relay::services::{PriceMonitor, PriceMonitorConfig};

use common::{latest_updates_body, legacy_feeds_body, FEED_ID};

fn monitor(server: &MockServer, strategy: OracleStrategy, duration: Duration) -> PriceMonitor {
    PriceMonitor::new(
        OracleClient::new(&server.uri(), strategy, Duration::from_secs(2))
            .expect("oracle client should build"),
        FeedId::from_str(FEED_ID).expect("valid feed id"),
        PriceMonitorConfig {
            duration,
            poll_interval: Duration::from_millis(100),
        },
    )
}

#[tokio::test]
async fn test_polling_survives_failures_and_stops_on_time() {
    let server = MockServer::start().await;

    // First poll fails, the rest succeed
    Mock::given(method("GET"))
        .and(path("/api/latest_price_feeds"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/latest_price_feeds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(legacy_feeds_body(250_000, -2)))
        .with_priority(2)
        .mount(&server)
        .await;

    let duration = Duration::from_millis(600);
    let started = Instant::now();
    let report = monitor(&server, OracleStrategy::RestFallback, duration)
        .run()
        .await;
    let elapsed = started.elapsed();

    assert!(!report.streamed);
    assert!(report.failed_polls >= 1);
    assert!(!report.samples.is_empty());
    assert!(elapsed >= duration);
    assert!(elapsed < duration + Duration::from_millis(500), "ran for {:?}", elapsed);

    let first = &report.samples[0];
    assert_eq!(first.change_pct, None);
    assert!((first.observation.decoded_price() - 2500.0).abs() < 1e-9);
    assert!(report.samples.iter().skip(1).all(|s| s.change_pct == Some(0.0)));
}

#[tokio::test]
async fn test_streaming_reports_percent_change() {
    let server = MockServer::start().await;

    let events = [
        latest_updates_body(100_000, -2),
        latest_updates_body(110_000, -2),
    ];
    let body: String = events
        .iter()
        .map(|event| format!("data: {}\n\n", event))
        .collect();
    Mock::given(method("GET"))
        .and(path("/v2/updates/price/stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(body),
        )
        .expect(1)
        .mount(&server)
        .await;
    // Polled once the stream closes
    Mock::given(method("GET"))
        .and(path("/v2/updates/price/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(latest_updates_body(110_000, -2)))
        .mount(&server)
        .await;

    let report = monitor(&server, OracleStrategy::Native, Duration::from_millis(400))
        .run()
        .await;

    assert!(report.streamed);
    assert!(report.samples.len() >= 2);
    assert!((report.samples[0].observation.decoded_price() - 1000.0).abs() < 1e-9);
    let change = report.samples[1].change_pct.expect("second sample has a change");
    assert!((change - 10.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_stream_failure_falls_back_to_polling() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/updates/price/stream"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/updates/price/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(latest_updates_body(4_200, 0)))
        .mount(&server)
        .await;

    let report = monitor(&server, OracleStrategy::Native, Duration::from_millis(350))
        .run()
        .await;

    assert!(!report.streamed);
    assert!(!report.samples.is_empty());
    assert_eq!(report.samples[0].observation.decoded_price(), 4200.0);
}

#[tokio::test]
async fn test_unreachable_oracle_yields_empty_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "unavailable"})))
        .mount(&server)
        .await;

    let report = monitor(&server, OracleStrategy::RestFallback, Duration::from_millis(300))
        .run()
        .await;

    assert!(report.samples.is_empty());
    assert!(report.failed_polls >= 1);
}
