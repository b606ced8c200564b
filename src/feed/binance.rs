//! Binance WebSocket feed protocol
//!
//! Streams 24-hour ticker updates for the configured symbols. The
//! instruments are encoded in the connection target itself, so no
//! subscription handshake is needed; each message is a single flat object.

use super::{FeedId, FeedProtocol, Frame, RawTick};
use crate::config::BinanceConfig;
use crate::error::FeedError;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Flat 24hr ticker payload (one per message)
#[derive(Debug, Deserialize)]
struct BinanceTicker {
    /// Event type, "24hrTicker" for the ticker stream
    #[serde(rename = "e")]
    event: String,
    /// Native symbol, a bare pair (e.g. "BTCUSDT")
    #[serde(rename = "s")]
    symbol: String,
    /// Last price
    #[serde(rename = "c")]
    last_price: Decimal,
    /// Best bid price
    #[serde(rename = "b")]
    bid: Option<Decimal>,
    /// Best ask price
    #[serde(rename = "a")]
    ask: Option<Decimal>,
}

/// Binance feed protocol
pub struct BinanceFeed {
    url: String,
    symbols: Vec<String>,
}

impl BinanceFeed {
    pub fn new(config: &BinanceConfig) -> Self {
        Self {
            url: config.url.clone(),
            symbols: config
                .symbols
                .iter()
                .map(|s| s.to_ascii_lowercase())
                .collect(),
        }
    }
}

impl FeedProtocol for BinanceFeed {
    fn id(&self) -> FeedId {
        FeedId::Binance
    }

    fn endpoint(&self) -> Result<String, FeedError> {
        if self.symbols.is_empty() {
            return Err(FeedError::MissingConfig(
                "binance symbols (set binance.symbols)".to_string(),
            ));
        }
        let streams = self
            .symbols
            .iter()
            .map(|s| format!("{}@ticker", s))
            .collect::<Vec<_>>()
            .join("/");
        Ok(format!("{}/ws/{}", self.url, streams))
    }

    fn subscribe_frames(&self) -> Vec<String> {
        vec![]
    }

    fn decode(&self, text: &str) -> Result<Frame, FeedError> {
        let ticker: BinanceTicker =
            serde_json::from_str(text).map_err(|e| FeedError::Decode(e.to_string()))?;

        if ticker.event != "24hrTicker" {
            return Err(FeedError::Decode(format!(
                "unrecognized binance event {:?}",
                ticker.event
            )));
        }

        Ok(Frame::Ticks(vec![RawTick {
            native_symbol: ticker.symbol,
            price: ticker.last_price,
            bid: ticker.bid,
            ask: ticker.ask,
        }]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn feed() -> BinanceFeed {
        BinanceFeed {
            url: "wss://stream.binance.com:9443".to_string(),
            symbols: vec!["btcusdt".to_string(), "ethusdt".to_string()],
        }
    }

    #[test]
    fn test_endpoint_encodes_instruments() {
        assert_eq!(
            feed().endpoint().unwrap(),
            "wss://stream.binance.com:9443/ws/btcusdt@ticker/ethusdt@ticker"
        );
    }

    #[test]
    fn test_symbols_lowercased_from_config() {
        let config = BinanceConfig {
            enabled: true,
            url: "wss://stream.binance.com:9443".to_string(),
            symbols: vec!["BTCUSDT".to_string()],
        };
        let feed = BinanceFeed::new(&config);
        assert_eq!(
            feed.endpoint().unwrap(),
            "wss://stream.binance.com:9443/ws/btcusdt@ticker"
        );
    }

    #[test]
    fn test_endpoint_without_symbols_is_config_error() {
        let feed = BinanceFeed {
            symbols: vec![],
            ..feed()
        };
        assert!(matches!(feed.endpoint(), Err(FeedError::MissingConfig(_))));
    }

    #[test]
    fn test_no_subscription_handshake() {
        assert!(feed().subscribe_frames().is_empty());
    }

    #[test]
    fn test_decode_ticker() {
        let msg = r#"{
            "e": "24hrTicker", "E": 1704067200000, "s": "BTCUSDT",
            "c": "67123.45", "b": "67123.40", "a": "67123.50",
            "o": "66000.00", "h": "68000.00", "l": "65500.00"
        }"#;
        let Frame::Ticks(ticks) = feed().decode(msg).unwrap() else {
            panic!("expected ticks");
        };
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].native_symbol, "BTCUSDT");
        assert_eq!(ticks[0].price, dec!(67123.45));
        assert_eq!(ticks[0].bid, Some(dec!(67123.40)));
        assert_eq!(ticks[0].ask, Some(dec!(67123.50)));
    }

    #[test]
    fn test_decode_other_event_rejected() {
        let msg = r#"{"e":"24hrMiniTicker","s":"BTCUSDT","c":"67123.45"}"#;
        assert!(matches!(feed().decode(msg), Err(FeedError::Decode(_))));
    }

    #[test]
    fn test_decode_invalid_json() {
        assert!(matches!(
            feed().decode("{{"),
            Err(FeedError::Decode(_))
        ));
    }
}
