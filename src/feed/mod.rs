//! Feed connectors
//!
//! One connector per upstream feed, each owning one streaming connection.
//! Per-feed protocol variance (handshake-required vs handshake-free,
//! nested-array vs flat-object payloads) lives in a [`FeedProtocol`]
//! implementation per feed; the generic [`FeedConnector`] drives the
//! connect/subscribe/receive loop for all of them.

mod binance;
mod connector;
mod finnhub;
mod types;

pub use binance::BinanceFeed;
pub use connector::FeedConnector;
pub use finnhub::FinnhubFeed;
pub use types::{Frame, PriceTick, RawTick};

use crate::error::FeedError;
use std::fmt;

/// Identifies which upstream feed a message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedId {
    Finnhub,
    Binance,
}

impl FeedId {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedId::Finnhub => "finnhub",
            FeedId::Binance => "binance",
        }
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-feed protocol capabilities
///
/// Implementations are pure with respect to the wire: the connector owns
/// all I/O, so decode logic stays trivially unit-testable.
pub trait FeedProtocol: Send + Sync + 'static {
    fn id(&self) -> FeedId;

    /// WebSocket endpoint to connect to. Missing mandatory configuration
    /// (e.g. a feed credential) surfaces here and prevents the connector
    /// from starting.
    fn endpoint(&self) -> Result<String, FeedError>;

    /// Subscription frames sent once after connecting, in order. Empty for
    /// feeds that encode the instruments in the endpoint itself.
    fn subscribe_frames(&self) -> Vec<String>;

    /// Decode one wire message into a [`Frame`].
    fn decode(&self, text: &str) -> Result<Frame, FeedError>;
}
