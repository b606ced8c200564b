//! Latest-price cache
//!
//! The single shared mutable object in the pipeline. Every feed connector
//! writes to it, the broadcast loop and ad-hoc readers read from it, and
//! nothing else coordinates the two sides. Entries are overwritten in place
//! (last writer wins in processing order) and never evicted; staleness is
//! the reader's concern.

use crate::feed::PriceTick;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct PriceCache {
    inner: RwLock<HashMap<String, PriceTick>>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any existing entry for the tick's symbol.
    ///
    /// Atomic with respect to readers: no reader ever observes a partially
    /// written tick.
    pub async fn upsert(&self, tick: PriceTick) {
        let mut map = self.inner.write().await;
        map.insert(tick.symbol.clone(), tick);
    }

    pub async fn get(&self, symbol: &str) -> Option<PriceTick> {
        self.inner.read().await.get(symbol).cloned()
    }

    /// Point-in-time copy of every entry. Each entry is internally
    /// consistent; cross-entry consistency is not promised, since the feeds
    /// are independent.
    pub async fn snapshot(&self) -> HashMap<String, PriceTick> {
        self.inner.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
