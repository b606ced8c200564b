//! Fixed-cadence fan-out loop
//!
//! Snapshots the price cache every period and pushes each symbol's latest
//! tick to that symbol's subscriber group. A failing symbol never stalls
//! the rest of the cycle or the next period.

use crate::cache::PriceCache;
use crate::hub::SubscriberHub;
use crate::telemetry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

pub struct Broadcaster {
    cache: Arc<PriceCache>,
    hub: Arc<dyn SubscriberHub>,
    period: Duration,
}

impl Broadcaster {
    pub fn new(cache: Arc<PriceCache>, hub: Arc<dyn SubscriberHub>, period: Duration) -> Self {
        Self { cache, hub, period }
    }

    /// Run until the shutdown signal fires. Cancellation is observed
    /// between cycles, never mid-push.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    tracing::info!("broadcast loop stopping");
                    return;
                }
                _ = ticker.tick() => {
                    self.run_once().await;
                }
            }
        }
    }

    /// One broadcast cycle: snapshot, then push per symbol.
    pub async fn run_once(&self) {
        let snapshot = self.cache.snapshot().await;
        for (symbol, tick) in snapshot {
            match self.hub.push_to_group(&symbol, &tick).await {
                Ok(()) => telemetry::push_ok(),
                Err(e) => {
                    tracing::warn!(error = %e, symbol = %symbol, "broadcast push failed");
                    telemetry::push_failure();
                }
            }
        }
    }
}
