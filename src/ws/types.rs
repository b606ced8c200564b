//! WebSocket session types

use thiserror::Error;

/// WebSocket session configuration
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// URL to connect to; may carry credentials in the query string
    pub url: String,
}

impl WsConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// URL with any query string stripped, safe for logging
    pub fn display_url(&self) -> &str {
        self.url.split('?').next().unwrap_or(&self.url)
    }
}

/// Messages surfaced to the session consumer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WsMessage {
    /// Inbound text frame
    Text(String),
    /// Connection established
    Connected,
    /// Session ended (peer close, error, or stream end)
    Disconnected,
}

/// WebSocket session errors
#[derive(Debug, Clone, Error)]
pub enum WsError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("send failed: {0}")]
    SendFailed(String),
}
