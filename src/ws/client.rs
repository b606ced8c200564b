//! WebSocket session client

use super::types::{WsConfig, WsError, WsMessage};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// Opens one WebSocket session and bridges it onto channels.
pub struct WsClient {
    config: WsConfig,
}

impl WsClient {
    pub fn new(config: WsConfig) -> Self {
        Self { config }
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Open the session in a background task.
    ///
    /// Returns a receiver for inbound messages and connection events, and a
    /// sender for outbound text frames. Outbound frames queued before the
    /// connection is established are flushed once it is. The session ends
    /// when the peer closes, an error occurs, the shutdown signal fires, or
    /// both channel ends are dropped; a final [`WsMessage::Disconnected`] is
    /// always delivered on a best-effort basis.
    pub fn connect(
        &self,
        shutdown: watch::Receiver<bool>,
    ) -> (mpsc::Receiver<WsMessage>, mpsc::Sender<String>) {
        let (msg_tx, msg_rx) = mpsc::channel(1024);
        let (send_tx, send_rx) = mpsc::channel(256);
        let config = self.config.clone();

        tokio::spawn(async move {
            if let Err(e) = Self::run_session(&config, &msg_tx, send_rx, shutdown).await {
                tracing::warn!(url = %config.display_url(), error = %e, "WebSocket session ended with error");
            }
            let _ = msg_tx.send(WsMessage::Disconnected).await;
        });

        (msg_rx, send_tx)
    }

    async fn run_session(
        config: &WsConfig,
        tx: &mpsc::Sender<WsMessage>,
        mut send_rx: mpsc::Receiver<String>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), WsError> {
        tracing::info!(url = %config.display_url(), "Connecting to WebSocket");

        let (ws_stream, _response) = connect_async(&config.url)
            .await
            .map_err(|e| WsError::ConnectionFailed(e.to_string()))?;

        let (mut write, mut read) = ws_stream.split();

        tracing::info!(url = %config.display_url(), "WebSocket connected");

        if tx.send(WsMessage::Connected).await.is_err() {
            return Ok(());
        }

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(());
                }

                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if tx.send(WsMessage::Text(text)).await.is_err() {
                                tracing::debug!("Receiver dropped, closing session");
                                return Ok(());
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            write.send(Message::Pong(data)).await
                                .map_err(|e| WsError::SendFailed(e.to_string()))?;
                        }
                        Some(Ok(Message::Close(_))) => {
                            tracing::info!("Received close frame");
                            return Ok(());
                        }
                        Some(Ok(_)) => {
                            // binary and pong frames carry nothing for us
                        }
                        Some(Err(e)) => {
                            return Err(WsError::ConnectionFailed(e.to_string()));
                        }
                        None => {
                            return Err(WsError::ConnectionFailed("stream ended unexpectedly".into()));
                        }
                    }
                }

                out = send_rx.recv() => {
                    match out {
                        Some(text) => {
                            write.send(Message::Text(text)).await
                                .map_err(|e| WsError::SendFailed(e.to_string()))?;
                        }
                        None => {
                            // sender dropped, close the session
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_client_creation() {
        let client = WsClient::new(WsConfig::new("wss://example.com"));
        assert_eq!(client.url(), "wss://example.com");
    }

    #[tokio::test]
    async fn test_connection_failure_surfaces_disconnect() {
        let client = WsClient::new(WsConfig::new("wss://invalid.localhost.test:12345"));
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let (mut rx, _tx) = client.connect(shutdown_rx);

        let msg = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("test timed out");
        assert_eq!(msg, Some(WsMessage::Disconnected));
    }
}
