//! Generic feed connector
//!
//! Drives one [`FeedProtocol`] over one WebSocket session: connect, send
//! any subscription frames, then receive until the session ends or
//! shutdown is signaled. Accepted ticks go to the price cache and the
//! persistence sink as two independent side effects; no per-message
//! failure ever terminates the loop.

use super::{FeedProtocol, Frame, PriceTick, RawTick};
use crate::cache::PriceCache;
use crate::error::FeedError;
use crate::sink::TickSink;
use crate::symbol;
use crate::telemetry;
use crate::ws::{WsClient, WsConfig, WsMessage};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

pub struct FeedConnector<P: FeedProtocol> {
    protocol: P,
    cache: Arc<PriceCache>,
    sink: Arc<dyn TickSink>,
}

impl<P: FeedProtocol> FeedConnector<P> {
    pub fn new(protocol: P, cache: Arc<PriceCache>, sink: Arc<dyn TickSink>) -> Self {
        Self {
            protocol,
            cache,
            sink,
        }
    }

    /// Run one feed session to completion.
    ///
    /// Returns `Ok(())` on cancellation, `Err` if the session could not be
    /// established or dropped. The error is scoped to this connector; the
    /// caller decides what a dead session means for the rest of the
    /// pipeline.
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> Result<(), FeedError> {
        let url = self.protocol.endpoint()?;
        let client = WsClient::new(WsConfig::new(url));
        let (ws_rx, ws_tx) = client.connect(shutdown.clone());

        for frame in self.protocol.subscribe_frames() {
            ws_tx
                .send(frame)
                .await
                .map_err(|e| FeedError::Send(e.to_string()))?;
        }

        self.run_message_loop(ws_rx, ws_tx, shutdown).await
    }

    async fn run_message_loop(
        &self,
        mut ws_rx: mpsc::Receiver<WsMessage>,
        ws_tx: mpsc::Sender<String>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), FeedError> {
        let feed = self.protocol.id();
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    tracing::info!(%feed, "connector shutting down");
                    return Ok(());
                }

                msg = ws_rx.recv() => match msg {
                    Some(WsMessage::Text(text)) => {
                        self.handle_message(&text, &ws_tx).await;
                    }
                    Some(WsMessage::Connected) => {
                        tracing::info!(%feed, "feed connected");
                    }
                    Some(WsMessage::Disconnected) | None => {
                        if *shutdown.borrow() {
                            return Ok(());
                        }
                        return Err(FeedError::Connection("feed session ended".to_string()));
                    }
                },
            }
        }
    }

    async fn handle_message(&self, text: &str, ws_tx: &mpsc::Sender<String>) {
        let feed = self.protocol.id();
        let frame = match self.protocol.decode(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(%feed, error = %e, "discarding undecodable message");
                telemetry::tick_rejected(feed, "decode");
                return;
            }
        };

        match frame {
            Frame::Control { reply } => {
                if let Some(reply) = reply {
                    if let Err(e) = ws_tx.send(reply).await {
                        tracing::warn!(%feed, error = %e, "failed to queue control reply");
                    }
                }
            }
            Frame::Ticks(raws) => {
                for raw in raws {
                    self.accept(raw).await;
                }
            }
        }
    }

    /// Normalize, validate, and apply one raw tuple.
    ///
    /// Cache upsert and sink write are independent: a sink failure is
    /// logged and does not undo the cache update.
    async fn accept(&self, raw: RawTick) {
        let feed = self.protocol.id();

        let canonical = match symbol::normalize(feed, &raw.native_symbol) {
            Ok(canonical) => canonical,
            Err(e) => {
                tracing::warn!(%feed, native = %raw.native_symbol, error = %e, "discarding tick with unrecognized symbol");
                telemetry::tick_rejected(feed, "normalize");
                return;
            }
        };

        if raw.price <= Decimal::ZERO {
            tracing::warn!(%feed, symbol = %canonical, price = %raw.price, "discarding tick with non-positive price");
            telemetry::tick_rejected(feed, "price");
            return;
        }

        let tick = PriceTick {
            symbol: canonical,
            price: raw.price,
            bid: raw.bid,
            ask: raw.ask,
            observed_at: Utc::now(),
        };

        self.cache.upsert(tick.clone()).await;
        telemetry::tick_accepted(feed);
        tracing::debug!(%feed, symbol = %tick.symbol, price = %tick.price, "tick accepted");

        if let Err(e) = self.sink.record_tick(&tick).await {
            tracing::warn!(%feed, symbol = %tick.symbol, error = %e, "persistence write failed");
            telemetry::sink_failure(feed);
        }
    }
}
