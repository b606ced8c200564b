//! Finnhub WebSocket feed protocol
//!
//! Requires an API key and an explicit subscription handshake per symbol.
//! Trade payloads nest an array of observations under a `data` key;
//! `{"type":"ping"}` control frames require an immediate `{"type":"pong"}`
//! reply to keep the connection alive.

use super::{FeedId, FeedProtocol, Frame, RawTick};
use crate::config::FinnhubConfig;
use crate::error::FeedError;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Inbound Finnhub frame
#[derive(Debug, Deserialize)]
struct FinnhubFrame {
    /// Frame type: "trade", "ping", ...
    #[serde(rename = "type")]
    kind: String,
    /// Trade observations, present on "trade" frames
    #[serde(default)]
    data: Vec<FinnhubTrade>,
}

/// One trade observation inside a "trade" frame
#[derive(Debug, Deserialize)]
struct FinnhubTrade {
    /// Native symbol, already exchange-prefixed (e.g. "BINANCE:BTCUSDT")
    #[serde(rename = "s")]
    symbol: String,
    /// Last trade price
    #[serde(rename = "p")]
    price: Decimal,
}

const PONG_FRAME: &str = r#"{"type":"pong"}"#;

/// Finnhub feed protocol
pub struct FinnhubFeed {
    url: String,
    api_key: Option<String>,
    symbols: Vec<String>,
}

impl FinnhubFeed {
    /// Build the protocol from configuration. The API key is resolved from
    /// the config file or the `FINNHUB_API_KEY` environment variable.
    pub fn new(config: &FinnhubConfig) -> Self {
        Self {
            url: config.url.clone(),
            api_key: config.resolve_api_key(),
            symbols: config.symbols.clone(),
        }
    }
}

impl FeedProtocol for FinnhubFeed {
    fn id(&self) -> FeedId {
        FeedId::Finnhub
    }

    fn endpoint(&self) -> Result<String, FeedError> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            FeedError::MissingConfig(
                "finnhub api key (set finnhub.api_key or FINNHUB_API_KEY)".to_string(),
            )
        })?;
        Ok(format!("{}?token={}", self.url, key))
    }

    fn subscribe_frames(&self) -> Vec<String> {
        self.symbols
            .iter()
            .map(|symbol| {
                serde_json::json!({ "type": "subscribe", "symbol": symbol }).to_string()
            })
            .collect()
    }

    fn decode(&self, text: &str) -> Result<Frame, FeedError> {
        let frame: FinnhubFrame =
            serde_json::from_str(text).map_err(|e| FeedError::Decode(e.to_string()))?;

        match frame.kind.as_str() {
            "trade" => Ok(Frame::Ticks(
                frame
                    .data
                    .into_iter()
                    .map(|trade| RawTick {
                        native_symbol: trade.symbol,
                        price: trade.price,
                        bid: None,
                        ask: None,
                    })
                    .collect(),
            )),
            "ping" => Ok(Frame::Control {
                reply: Some(PONG_FRAME.to_string()),
            }),
            other => Err(FeedError::Decode(format!(
                "unrecognized finnhub frame type {:?}",
                other
            ))),
        }
    }
}
