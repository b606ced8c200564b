//! Postgres-backed persistence sink

use super::TickSink;
use crate::error::SinkError;
use crate::feed::PriceTick;
use crate::hub::SubscriptionAudit;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

/// Records ticks and subscription audits to Postgres.
/// Schema lives under `migrations/`.
pub struct PgSink {
    pool: PgPool,
}

impl PgSink {
    /// Connect a pool to the given database URL.
    pub async fn connect(database_url: &str) -> Result<Self, SinkError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl TickSink for PgSink {
    async fn record_tick(&self, tick: &PriceTick) -> Result<(), SinkError> {
        sqlx::query(
            r#"
            INSERT INTO price_ticks (id, symbol, price, bid, ask, observed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&tick.symbol)
        .bind(tick.price)
        .bind(tick.bid)
        .bind(tick.ask)
        .bind(tick.observed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn record_audit(&self, audit: &SubscriptionAudit) -> Result<(), SinkError> {
        sqlx::query(
            r#"
            INSERT INTO subscription_audits (id, user_id, symbol, action, at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&audit.user_id)
        .bind(&audit.symbol)
        .bind(audit.action.as_str())
        .bind(audit.at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
