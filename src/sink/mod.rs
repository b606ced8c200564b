//! Persistence sink contract
//!
//! The pipeline records every accepted tick and every subscriber membership
//! change through this trait. Sink failures are reported by the caller and
//! never block or roll back the cache update.

mod postgres;

pub use postgres::PgSink;

use crate::error::SinkError;
use crate::feed::PriceTick;
use crate::hub::SubscriptionAudit;
use async_trait::async_trait;

#[async_trait]
pub trait TickSink: Send + Sync {
    /// Durably record one accepted tick.
    async fn record_tick(&self, tick: &PriceTick) -> Result<(), SinkError>;

    /// Record one subscriber membership change.
    async fn record_audit(&self, audit: &SubscriptionAudit) -> Result<(), SinkError>;
}

/// Sink used when persistence is disabled.
#[derive(Debug, Default)]
pub struct NullSink;

#[async_trait]
impl TickSink for NullSink {
    async fn record_tick(&self, _tick: &PriceTick) -> Result<(), SinkError> {
        Ok(())
    }

    async fn record_audit(&self, _audit: &SubscriptionAudit) -> Result<(), SinkError> {
        Ok(())
    }
}
