//! Feed data types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A normalized price observation, immutable once constructed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    /// Canonical symbol key (e.g. "BINANCE:BTCUSDT")
    pub symbol: String,
    /// Last trade or ticker price, always positive
    pub price: Decimal,
    /// Best bid, when the originating feed supplies one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid: Option<Decimal>,
    /// Best ask, when the originating feed supplies one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask: Option<Decimal>,
    /// Local timestamp assigned at normalization time, not by the feed
    pub observed_at: DateTime<Utc>,
}

/// A raw price tuple decoded from one feed message, prior to
/// normalization and validation
#[derive(Debug, Clone, PartialEq)]
pub struct RawTick {
    pub native_symbol: String,
    pub price: Decimal,
    pub bid: Option<Decimal>,
    pub ask: Option<Decimal>,
}

/// One decoded wire message
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Zero or more raw price tuples
    Ticks(Vec<RawTick>),
    /// Protocol control message, optionally demanding an immediate reply
    /// on the same connection (e.g. Finnhub's ping/pong)
    Control { reply: Option<String> },
}
