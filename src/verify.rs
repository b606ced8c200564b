//! Reference-price verification
//!
//! Periodically cross-checks cached Binance-sourced prices against the
//! Binance REST ticker endpoint and logs drift above the configured
//! threshold. Purely diagnostic; fetch failures never affect the pipeline.

use crate::cache::PriceCache;
use crate::config::VerifyConfig;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Binance REST ticker response
#[derive(Debug, Deserialize)]
struct ReferencePrice {
    #[allow(dead_code)]
    symbol: String,
    price: Decimal,
}

/// Computed divergence between our cache and the reference
#[derive(Debug, Clone, PartialEq)]
pub struct Drift {
    pub symbol: String,
    pub ours: Decimal,
    pub reference: Decimal,
    pub difference: Decimal,
    pub difference_pct: Decimal,
}

pub struct PriceVerifier {
    http: reqwest::Client,
    rest_url: String,
    max_drift_pct: Decimal,
    period: Duration,
    cache: Arc<PriceCache>,
}

impl PriceVerifier {
    pub fn new(config: &VerifyConfig, cache: Arc<PriceCache>) -> Self {
        Self {
            http: reqwest::Client::new(),
            rest_url: config.rest_url.clone(),
            max_drift_pct: config.max_drift_pct,
            period: Duration::from_secs(config.interval_secs),
            cache,
        }
    }

    /// Run until the shutdown signal fires.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    tracing::info!("price verifier stopping");
                    return;
                }
                _ = ticker.tick() => {
                    self.verify_cycle().await;
                }
            }
        }
    }

    async fn verify_cycle(&self) {
        for (symbol, tick) in self.cache.snapshot().await {
            // only Binance-listed pairs have a reference to check against
            let Some(pair) = symbol.strip_prefix("BINANCE:") else {
                continue;
            };

            match self.fetch_reference(pair).await {
                Ok(reference) => {
                    let drift = Self::drift(&symbol, tick.price, reference);
                    if drift.difference_pct > self.max_drift_pct {
                        tracing::warn!(
                            symbol = %drift.symbol,
                            ours = %drift.ours,
                            reference = %drift.reference,
                            drift_pct = %drift.difference_pct,
                            "cached price diverges from reference"
                        );
                    } else {
                        tracing::debug!(
                            symbol = %drift.symbol,
                            drift_pct = %drift.difference_pct,
                            "reference check passed"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(symbol = %symbol, error = %e, "reference price fetch failed");
                }
            }
        }
    }

    async fn fetch_reference(&self, pair: &str) -> anyhow::Result<Decimal> {
        let url = format!(
            "{}/api/v3/ticker/price?symbol={}",
            self.rest_url,
            pair.to_ascii_uppercase()
        );
        let response: ReferencePrice = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.price)
    }

    fn drift(symbol: &str, ours: Decimal, reference: Decimal) -> Drift {
        let difference = (ours - reference).abs();
        let difference_pct = if reference.is_zero() {
            Decimal::ZERO
        } else {
            difference / reference * Decimal::ONE_HUNDRED
        };
        Drift {
            symbol: symbol.to_string(),
            ours,
            reference,
            difference,
            difference_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_drift_math() {
        let drift = PriceVerifier::drift("BINANCE:BTCUSDT", dec!(101), dec!(100));
        assert_eq!(drift.difference, dec!(1));
        assert_eq!(drift.difference_pct, dec!(1));
    }

    #[test]
    fn test_drift_is_absolute() {
        let below = PriceVerifier::drift("BINANCE:BTCUSDT", dec!(99), dec!(100));
        let above = PriceVerifier::drift("BINANCE:BTCUSDT", dec!(101), dec!(100));
        assert_eq!(below.difference, above.difference);
    }

    #[test]
    fn test_drift_zero_reference() {
        let drift = PriceVerifier::drift("BINANCE:BTCUSDT", dec!(50), dec!(0));
        assert_eq!(drift.difference_pct, Decimal::ZERO);
    }

    #[test]
    fn test_reference_price_parses_binance_response() {
        let json = r#"{"symbol":"BTCUSDT","price":"67123.45000000"}"#;
        let parsed: ReferencePrice = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.price, dec!(67123.45000000));
    }
}
