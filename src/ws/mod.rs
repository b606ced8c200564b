//! WebSocket session handling
//!
//! One session per connect call: inbound text surfaces on a channel,
//! outbound text is accepted on a channel, and transport-level pings are
//! answered in place. A dropped session ends the channel; reconnect policy
//! is the caller's concern.

mod client;
mod types;

pub use client::WsClient;
pub use types::{WsConfig, WsError, WsMessage};
