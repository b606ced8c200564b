//! Subscriber groups and the fan-out contract
//!
//! The broadcast loop pushes each symbol's latest tick to that symbol's
//! group through [`SubscriberHub`]. [`GroupHub`] is the in-process
//! implementation: one broadcast channel per symbol, membership changes
//! audited through the persistence sink. The wire protocol carrying ticks
//! to real clients sits behind this trait and is out of scope here.

use crate::error::{PushError, SinkError};
use crate::feed::PriceTick;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Push primitive required by the broadcast loop
#[async_trait]
pub trait SubscriberHub: Send + Sync {
    /// Best-effort delivery of one tick to every member of the symbol's
    /// group. A symbol with no group or no members is not an error.
    async fn push_to_group(&self, symbol: &str, tick: &PriceTick) -> Result<(), PushError>;
}

/// Membership change kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Subscribe,
    Unsubscribe,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Subscribe => "subscribe",
            AuditAction::Unsubscribe => "unsubscribe",
        }
    }
}

/// One recorded membership change
#[derive(Debug, Clone)]
pub struct SubscriptionAudit {
    pub user_id: String,
    pub symbol: String,
    pub action: AuditAction,
    pub at: DateTime<Utc>,
}

impl SubscriptionAudit {
    pub fn new(user_id: impl Into<String>, symbol: impl Into<String>, action: AuditAction) -> Self {
        Self {
            user_id: user_id.into(),
            symbol: symbol.into(),
            action,
            at: Utc::now(),
        }
    }
}

/// Per-group channel capacity; slow consumers lag rather than block the loop
const GROUP_CAPACITY: usize = 64;

/// In-process subscriber hub keyed by canonical symbol
pub struct GroupHub {
    groups: RwLock<HashMap<String, broadcast::Sender<PriceTick>>>,
    sink: Arc<dyn crate::sink::TickSink>,
}

impl GroupHub {
    pub fn new(sink: Arc<dyn crate::sink::TickSink>) -> Self {
        Self {
            groups: RwLock::new(HashMap::new()),
            sink,
        }
    }

    /// Join a symbol's group, creating it on first join. The membership
    /// change is audited; audit failures are logged and do not block the
    /// join.
    pub async fn join(&self, user_id: &str, symbol: &str) -> broadcast::Receiver<PriceTick> {
        let rx = {
            let mut groups = self.groups.write().await;
            groups
                .entry(symbol.to_string())
                .or_insert_with(|| broadcast::channel(GROUP_CAPACITY).0)
                .subscribe()
        };
        tracing::info!(user = user_id, symbol, "subscriber joined group");
        self.audit(user_id, symbol, AuditAction::Subscribe).await;
        rx
    }

    /// Record leaving a group. Dropping the receiver ends delivery; this
    /// only audits the membership change.
    pub async fn leave(&self, user_id: &str, symbol: &str) {
        tracing::info!(user = user_id, symbol, "subscriber left group");
        self.audit(user_id, symbol, AuditAction::Unsubscribe).await;
    }

    async fn audit(&self, user_id: &str, symbol: &str, action: AuditAction) {
        let audit = SubscriptionAudit::new(user_id, symbol, action);
        if let Err(e) = self.record(&audit).await {
            tracing::warn!(error = %e, user = user_id, symbol, "failed to record subscription audit");
        }
    }

    async fn record(&self, audit: &SubscriptionAudit) -> Result<(), SinkError> {
        self.sink.record_audit(audit).await
    }
}

#[async_trait]
impl SubscriberHub for GroupHub {
    async fn push_to_group(&self, symbol: &str, tick: &PriceTick) -> Result<(), PushError> {
        let groups = self.groups.read().await;
        if let Some(group) = groups.get(symbol) {
            // send only fails when no receiver is currently joined
            let _ = group.send(tick.clone());
        }
        Ok(())
    }
}
