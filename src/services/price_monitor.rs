//! Price Monitor Service
//!
//! Watches one price feed for a bounded window and logs every price together with
//! its percent change since the previous sample. Uses the push stream when the
//! oracle strategy supports it and polls otherwise.

use std::time::Duration;

use futures::StreamExt;
use tokio::time::{interval, sleep_until, timeout_at, Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::config::MonitorConfig;
use crate::services::oracle::{FeedId, ObservationStream, OracleClient, PriceObservation};

/// Price monitor configuration
#[derive(Debug, Clone)]
pub struct PriceMonitorConfig {
    /// Wall-clock window after which the monitor stops
    pub duration: Duration,
    /// Delay between polls when not streaming
    pub poll_interval: Duration,
}

impl Default for PriceMonitorConfig {
    fn default() -> Self {
        MonitorConfig::default().into()
    }
}

impl From<MonitorConfig> for PriceMonitorConfig {
    fn from(config: MonitorConfig) -> Self {
        Self {
            duration: config.duration(),
            poll_interval: config.poll_interval(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PriceSample {
    pub observation: PriceObservation,
    /// Percent change from the previous sample
    pub change_pct: Option<f64>,
}

/// What the monitor saw during its window
#[derive(Debug, Clone, Default)]
pub struct MonitorReport {
    pub samples: Vec<PriceSample>,
    pub failed_polls: usize,
    pub streamed: bool,
}

/// `None` when there is no meaningful base to compare against
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// Price monitor service
#[derive(Clone)]
pub struct PriceMonitor {
    oracle: OracleClient,
    feed_id: FeedId,
    config: PriceMonitorConfig,
}

impl PriceMonitor {
    pub fn new(oracle: OracleClient, feed_id: FeedId, config: PriceMonitorConfig) -> Self {
        Self {
            oracle,
            feed_id,
            config,
        }
    }

    /// Run until the configured duration elapses
    pub async fn run(&self) -> MonitorReport {
        let deadline = Instant::now() + self.config.duration;
        let mut report = MonitorReport::default();

        info!(
            "Starting price monitor for {} ({}s window)",
            self.feed_id,
            self.config.duration.as_secs_f64()
        );

        if self.oracle.strategy().supports_streaming() {
            match timeout_at(deadline, self.oracle.subscribe(&self.feed_id, self.config.duration)).await {
                Ok(Ok(stream)) => {
                    report.streamed = true;
                    self.consume_stream(stream, deadline, &mut report).await;
                }
                Ok(Err(e)) => warn!("Price stream unavailable: {}. Polling instead", e),
                Err(_) => {}
            }
        }

        if Instant::now() < deadline {
            self.poll_until(deadline, &mut report).await;
        }

        info!(
            "Price monitor finished: {} samples, {} failed polls",
            report.samples.len(),
            report.failed_polls
        );
        report
    }

    async fn consume_stream(
        &self,
        mut stream: ObservationStream,
        deadline: Instant,
        report: &mut MonitorReport,
    ) {
        loop {
            match timeout_at(deadline, stream.next()).await {
                Err(_) => return,
                Ok(None) => {
                    warn!("Price stream closed early, switching to polling");
                    return;
                }
                Ok(Some(Ok(observation))) => self.record(report, observation),
                Ok(Some(Err(e))) => {
                    warn!("Price stream error: {}", e);
                    report.failed_polls += 1;
                }
            }
        }
    }

    async fn poll_until(&self, deadline: Instant, report: &mut MonitorReport) {
        let mut ticker = interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = sleep_until(deadline) => break,
                _ = ticker.tick() => {
                    match timeout_at(deadline, self.oracle.latest_observation(&self.feed_id)).await {
                        Err(_) => break,
                        Ok(Ok(observation)) => self.record(report, observation),
                        Ok(Err(e)) => {
                            // A failed poll never ends the window
                            warn!("Price poll failed: {}", e);
                            report.failed_polls += 1;
                        }
                    }
                }
            }
        }
    }

    fn record(&self, report: &mut MonitorReport, observation: PriceObservation) {
        let price = observation.decoded_price();
        let change_pct = report
            .samples
            .last()
            .and_then(|previous| percent_change(previous.observation.decoded_price(), price));

        match change_pct {
            Some(change) => info!("📈 {} = {} ({:+.4}%)", self.feed_id, price, change),
            None => info!("📈 {} = {}", self.feed_id, price),
        }

        report.samples.push(PriceSample {
            observation,
            change_pct,
        });
    }
}
