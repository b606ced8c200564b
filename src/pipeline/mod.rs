//! Pipeline supervision and lifecycle
//!
//! Wires the shared cache, hub, and sink together, starts the feed
//! connectors, the broadcast loop, and the optional verifier as
//! independent tasks, and propagates one shutdown signal to all of them.
//! A dead feed session ends that connector only; the broadcast loop keeps
//! running on whatever the cache holds.

mod broadcast;

pub use broadcast::Broadcaster;

use crate::cache::PriceCache;
use crate::config::Config;
use crate::feed::{BinanceFeed, FeedConnector, FeedProtocol, FinnhubFeed};
use crate::hub::{GroupHub, SubscriberHub};
use crate::sink::{NullSink, PgSink, TickSink};
use crate::verify::PriceVerifier;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct Pipeline {
    config: Config,
    cache: Arc<PriceCache>,
    hub: Arc<GroupHub>,
    sink: Arc<dyn TickSink>,
}

impl Pipeline {
    /// Wire up the shared state. Connects the persistence pool when
    /// enabled; persistence enabled without a reachable database is a
    /// startup error.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let sink: Arc<dyn TickSink> = if config.persistence.enabled {
            if config.persistence.database_url.is_empty() {
                anyhow::bail!("persistence enabled but persistence.database_url is not set");
            }
            Arc::new(PgSink::connect(&config.persistence.database_url).await?)
        } else {
            Arc::new(NullSink)
        };

        let cache = Arc::new(PriceCache::new());
        let hub = Arc::new(GroupHub::new(sink.clone()));

        Ok(Self {
            config,
            cache,
            hub,
            sink,
        })
    }

    /// Shared cache handle for readers outside the pipeline
    /// (health endpoints, verification).
    pub fn cache(&self) -> Arc<PriceCache> {
        self.cache.clone()
    }

    /// Hub handle for the subscriber transport to join groups on.
    pub fn hub(&self) -> Arc<GroupHub> {
        self.hub.clone()
    }

    /// Run until the shutdown signal fires and every task has unwound.
    ///
    /// A connector whose mandatory configuration is missing is skipped
    /// with an error log; the rest of the pipeline still runs.
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        let mut tasks: Vec<(&'static str, JoinHandle<()>)> = Vec::new();

        if self.config.finnhub.enabled {
            let feed = FinnhubFeed::new(&self.config.finnhub);
            self.start_connector(feed, shutdown.clone(), &mut tasks);
        } else {
            tracing::info!("finnhub connector disabled");
        }

        if self.config.binance.enabled {
            let feed = BinanceFeed::new(&self.config.binance);
            self.start_connector(feed, shutdown.clone(), &mut tasks);
        } else {
            tracing::info!("binance connector disabled");
        }

        let broadcaster = Broadcaster::new(
            self.cache.clone(),
            self.hub.clone() as Arc<dyn SubscriberHub>,
            Duration::from_millis(self.config.broadcast.interval_ms),
        );
        tasks.push(("broadcast", tokio::spawn(broadcaster.run(shutdown.clone()))));

        if self.config.verify.enabled {
            let verifier = PriceVerifier::new(&self.config.verify, self.cache.clone());
            tasks.push(("verify", tokio::spawn(verifier.run(shutdown.clone()))));
        }

        for (name, task) in tasks {
            match task.await {
                Ok(()) => tracing::info!(task = name, "task finished"),
                Err(e) => tracing::error!(task = name, error = %e, "task panicked"),
            }
        }

        Ok(())
    }

    /// Spawn one feed connector, unless its configuration prevents it
    /// from starting at all.
    fn start_connector<P: FeedProtocol>(
        &self,
        protocol: P,
        shutdown: watch::Receiver<bool>,
        tasks: &mut Vec<(&'static str, JoinHandle<()>)>,
    ) {
        let feed = protocol.id();
        if let Err(e) = protocol.endpoint() {
            tracing::error!(%feed, error = %e, "connector not started");
            return;
        }

        let connector = FeedConnector::new(protocol, self.cache.clone(), self.sink.clone());
        let handle = tokio::spawn(async move {
            match connector.run(shutdown).await {
                Ok(()) => tracing::info!(%feed, "connector stopped"),
                // session loss is final for this connector; no reconnect
                // policy exists yet
                Err(e) => tracing::error!(%feed, error = %e, "feed session ended"),
            }
        });
        tasks.push((feed.as_str(), handle));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::PriceTick;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn test_config() -> Config {
        toml::from_str(
            r#"
            [finnhub]
            enabled = false
            symbols = ["BINANCE:BTCUSDT"]

            [binance]
            enabled = false
            symbols = ["btcusdt"]

            [broadcast]
            interval_ms = 10

            [telemetry]
            log_level = "info"
        "#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_pipeline_runs_and_stops_with_all_feeds_disabled() {
        let pipeline = Pipeline::new(test_config()).await.unwrap();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(pipeline.run(shutdown_rx));
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("pipeline did not stop")
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_shared_handles_feed_the_running_broadcast_loop() {
        let pipeline = Pipeline::new(test_config()).await.unwrap();
        let cache = pipeline.cache();
        let hub = pipeline.hub();
        let mut rx = hub.join("carol", "BINANCE:BTCUSDT").await;

        cache
            .upsert(PriceTick {
                symbol: "BINANCE:BTCUSDT".to_string(),
                price: dec!(67000),
                bid: None,
                ask: None,
                observed_at: Utc::now(),
            })
            .await;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(pipeline.run(shutdown_rx));

        // a tick written through the external cache handle reaches a
        // subscriber joined through the external hub handle
        let delivered = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("no broadcast within deadline")
            .unwrap();
        assert_eq!(delivered.symbol, "BINANCE:BTCUSDT");
        assert_eq!(delivered.price, dec!(67000));

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("pipeline did not stop")
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_credential_skips_connector_not_pipeline() {
        let mut config = test_config();
        config.finnhub.enabled = true;
        config.finnhub.api_key = None;
        // ensure the env fallback cannot supply a key for this test
        std::env::remove_var("FINNHUB_API_KEY");

        let pipeline = Pipeline::new(config).await.unwrap();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(pipeline.run(shutdown_rx));
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();

        // the broadcast loop still ran and the pipeline unwound cleanly
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("pipeline did not stop")
            .unwrap()
            .unwrap();
    }
}
