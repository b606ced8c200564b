//! Error types
//!
//! One type per failure domain, so call sites can tell a per-message
//! discard (decode, normalize, validation) from a session- or
//! startup-level failure (connection, configuration, sink).

use thiserror::Error;

/// A native symbol that cannot be mapped to the canonical key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("empty symbol")]
    Empty,
    #[error("symbol {0:?} does not match the shape this feed reports")]
    BadShape(String),
    #[error("symbol {0:?} contains characters outside [A-Za-z0-9_.]")]
    InvalidChars(String),
}

/// Failure in a feed connector or its protocol
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error("missing configuration: {0}")]
    MissingConfig(String),
    #[error("send failed: {0}")]
    Send(String),
}

/// Persistence sink failure
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// Failed delivery to one subscriber group
#[derive(Debug, Error)]
#[error("push to group {symbol} failed: {reason}")]
pub struct PushError {
    pub symbol: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_error_names_the_group() {
        let e = PushError {
            symbol: "BINANCE:BTCUSDT".to_string(),
            reason: "transport down".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "push to group BINANCE:BTCUSDT failed: transport down"
        );
    }

    #[test]
    fn test_normalize_error_carries_through_feed_error() {
        let e = FeedError::from(NormalizeError::BadShape("no-colon".to_string()));
        assert!(e.to_string().contains("no-colon"));
    }
}
