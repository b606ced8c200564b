//! Symbol normalization
//!
//! Each feed reports instruments in its own native form; everything past
//! the connectors keys on the canonical `EXCHANGE:PAIR` form. This module
//! is the single place that mapping lives. [`normalize`] is pure: same
//! input, same output, no I/O, no clock.

use crate::error::NormalizeError;
use crate::feed::FeedId;

/// Map a feed-native symbol to its canonical `EXCHANGE:PAIR` key.
///
/// Finnhub reports exchange-prefixed symbols (`BINANCE:BTCUSDT`); the
/// shape is validated and uppercased. Binance reports bare pairs
/// (`BTCUSDT`); the pair is uppercased and prefixed with `BINANCE:`.
pub fn normalize(feed: FeedId, native: &str) -> Result<String, NormalizeError> {
    let native = native.trim();
    if native.is_empty() {
        return Err(NormalizeError::Empty);
    }

    match feed {
        FeedId::Finnhub => {
            let (exchange, pair) = native
                .split_once(':')
                .ok_or_else(|| NormalizeError::BadShape(native.to_string()))?;
            if exchange.is_empty() || pair.is_empty() {
                return Err(NormalizeError::BadShape(native.to_string()));
            }
            check_charset(exchange)?;
            check_charset(pair)?;
            Ok(format!(
                "{}:{}",
                exchange.to_ascii_uppercase(),
                pair.to_ascii_uppercase()
            ))
        }
        FeedId::Binance => {
            if native.contains(':') {
                return Err(NormalizeError::BadShape(native.to_string()));
            }
            check_charset(native)?;
            Ok(format!("BINANCE:{}", native.to_ascii_uppercase()))
        }
    }
}

fn check_charset(part: &str) -> Result<(), NormalizeError> {
    if part
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        Ok(())
    } else {
        Err(NormalizeError::InvalidChars(part.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_input_same_output() {
        let a = normalize(FeedId::Finnhub, "BINANCE:BTCUSDT");
        let b = normalize(FeedId::Finnhub, "BINANCE:BTCUSDT");
        assert_eq!(a, b);
        assert_eq!(a.unwrap(), "BINANCE:BTCUSDT");
    }

    #[test]
    fn test_finnhub_uppercases_both_parts() {
        assert_eq!(
            normalize(FeedId::Finnhub, "binance:btcusdt").unwrap(),
            "BINANCE:BTCUSDT"
        );
    }

    #[test]
    fn test_finnhub_without_colon_rejected() {
        assert_eq!(
            normalize(FeedId::Finnhub, "no-colon"),
            Err(NormalizeError::BadShape("no-colon".to_string()))
        );
    }

    #[test]
    fn test_finnhub_empty_exchange_or_pair_rejected() {
        assert!(matches!(
            normalize(FeedId::Finnhub, ":BTCUSDT"),
            Err(NormalizeError::BadShape(_))
        ));
        assert!(matches!(
            normalize(FeedId::Finnhub, "BINANCE:"),
            Err(NormalizeError::BadShape(_))
        ));
    }

    #[test]
    fn test_binance_bare_pair_gets_prefix() {
        assert_eq!(
            normalize(FeedId::Binance, "BTCUSDT").unwrap(),
            "BINANCE:BTCUSDT"
        );
    }

    #[test]
    fn test_binance_lowercase_uppercased() {
        assert_eq!(
            normalize(FeedId::Binance, "btcusdt").unwrap(),
            "BINANCE:BTCUSDT"
        );
    }

    #[test]
    fn test_binance_prefixed_input_rejected() {
        assert!(matches!(
            normalize(FeedId::Binance, "BINANCE:BTCUSDT"),
            Err(NormalizeError::BadShape(_))
        ));
    }

    #[test]
    fn test_empty_and_whitespace_rejected() {
        assert_eq!(normalize(FeedId::Finnhub, ""), Err(NormalizeError::Empty));
        assert_eq!(normalize(FeedId::Binance, "   "), Err(NormalizeError::Empty));
    }

    #[test]
    fn test_stray_characters_rejected() {
        assert!(matches!(
            normalize(FeedId::Finnhub, "BINANCE:BTC/USDT"),
            Err(NormalizeError::InvalidChars(_))
        ));
        assert!(matches!(
            normalize(FeedId::Binance, "btc usdt"),
            Err(NormalizeError::InvalidChars(_))
        ));
        // underscore and dot are part of real listings
        assert_eq!(
            normalize(FeedId::Finnhub, "OANDA:EUR_USD").unwrap(),
            "OANDA:EUR_USD"
        );
    }
}
