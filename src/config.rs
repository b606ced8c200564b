//! Configuration types for tick-relay

use rust_decimal::Decimal;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub finnhub: FinnhubConfig,
    pub binance: BinanceConfig,
    #[serde(default)]
    pub broadcast: BroadcastConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub verify: VerifyConfig,
    pub telemetry: TelemetryConfig,
}

/// Finnhub feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FinnhubConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_finnhub_url")]
    pub url: String,
    /// API key; falls back to the FINNHUB_API_KEY environment variable
    #[serde(default)]
    pub api_key: Option<String>,
    /// Native symbols to subscribe to (e.g. "BINANCE:BTCUSDT")
    pub symbols: Vec<String>,
}

impl FinnhubConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("FINNHUB_API_KEY").ok().filter(|k| !k.is_empty()))
    }
}

/// Binance feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_binance_url")]
    pub url: String,
    /// Bare pairs to stream (e.g. "btcusdt")
    pub symbols: Vec<String>,
}

/// Broadcast loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastConfig {
    /// Fan-out period in milliseconds
    #[serde(default = "default_broadcast_interval_ms")]
    pub interval_ms: u64,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_broadcast_interval_ms(),
        }
    }
}

/// Persistence sink configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersistenceConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub database_url: String,
}

/// Reference-price verification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_verify_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_verify_rest_url")]
    pub rest_url: String,
    /// Drift above this percentage is logged at warn level
    #[serde(default = "default_max_drift_pct")]
    pub max_drift_pct: Decimal,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: default_verify_interval_secs(),
            rest_url: default_verify_rest_url(),
            max_drift_pct: default_max_drift_pct(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// Prometheus scrape port; exporter disabled when absent
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_true() -> bool {
    true
}
fn default_finnhub_url() -> String {
    "wss://ws.finnhub.io".to_string()
}
fn default_binance_url() -> String {
    "wss://stream.binance.com:9443".to_string()
}
fn default_broadcast_interval_ms() -> u64 {
    500
}
fn default_verify_interval_secs() -> u64 {
    60
}
fn default_verify_rest_url() -> String {
    "https://api.binance.com".to_string()
}
fn default_max_drift_pct() -> Decimal {
    Decimal::new(5, 1) // 0.5%
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            [finnhub]
            api_key = "secret"
            symbols = ["BINANCE:BTCUSDT", "BINANCE:ETHUSDT"]

            [binance]
            symbols = ["btcusdt"]

            [broadcast]
            interval_ms = 250

            [persistence]
            enabled = true
            database_url = "postgres://localhost/tickrelay"

            [verify]
            enabled = true
            interval_secs = 30
            max_drift_pct = 1.0

            [telemetry]
            log_level = "info"
            metrics_port = 9090
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.finnhub.enabled);
        assert_eq!(config.finnhub.symbols.len(), 2);
        assert_eq!(config.binance.url, "wss://stream.binance.com:9443");
        assert_eq!(config.broadcast.interval_ms, 250);
        assert!(config.persistence.enabled);
        assert_eq!(config.verify.max_drift_pct, dec!(1.0));
        assert_eq!(config.telemetry.metrics_port, Some(9090));
    }

    #[test]
    fn test_config_defaults() {
        let toml = r#"
            [finnhub]
            symbols = ["BINANCE:BTCUSDT"]

            [binance]
            symbols = ["btcusdt"]

            [telemetry]
            log_level = "debug"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.finnhub.url, "wss://ws.finnhub.io");
        assert_eq!(config.broadcast.interval_ms, 500);
        assert!(!config.persistence.enabled);
        assert!(!config.verify.enabled);
        assert_eq!(config.verify.interval_secs, 60);
        assert_eq!(config.verify.max_drift_pct, dec!(0.5));
        assert!(config.telemetry.metrics_port.is_none());
    }

    #[test]
    fn test_resolve_api_key_prefers_config() {
        let config = FinnhubConfig {
            enabled: true,
            url: default_finnhub_url(),
            api_key: Some("from-config".to_string()),
            symbols: vec![],
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("from-config"));
    }

    #[test]
    fn test_resolve_api_key_ignores_empty() {
        let config = FinnhubConfig {
            enabled: true,
            url: default_finnhub_url(),
            api_key: Some(String::new()),
            symbols: vec![],
        };
        // empty string in config never counts as a credential
        assert_ne!(config.resolve_api_key().as_deref(), Some(""));
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }
}
