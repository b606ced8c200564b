//! Pipeline counters
//!
//! Counts flow through the pipeline per feed and rejection reason, exposed
//! via the Prometheus exporter when a metrics port is configured.

use crate::feed::FeedId;
use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint
pub fn install_exporter(port: u16) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()?;
    tracing::info!(port, "Prometheus exporter listening");
    Ok(())
}

pub fn tick_accepted(feed: FeedId) {
    counter!("ticks_accepted_total", "feed" => feed.as_str()).increment(1);
}

/// `reason` is one of "decode", "normalize", "price"
pub fn tick_rejected(feed: FeedId, reason: &'static str) {
    counter!("ticks_rejected_total", "feed" => feed.as_str(), "reason" => reason).increment(1);
}

pub fn sink_failure(feed: FeedId) {
    counter!("sink_failures_total", "feed" => feed.as_str()).increment(1);
}

pub fn push_ok() {
    counter!("broadcast_pushes_total").increment(1);
}

pub fn push_failure() {
    counter!("broadcast_push_failures_total").increment(1);
}
