//! tick-relay: real-time market data ingestion and fan-out
//!
//! This library provides the core components for:
//! - Feed connectors for Finnhub and Binance WebSocket streams
//! - Symbol normalization to canonical EXCHANGE:PAIR keys
//! - A concurrent latest-price cache shared by all connectors
//! - Fixed-cadence broadcast to per-symbol subscriber groups
//! - Optional Postgres persistence of accepted ticks and
//!   subscription audits
//! - Reference-price verification against the Binance REST API

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod hub;
pub mod pipeline;
pub mod sink;
pub mod symbol;
pub mod telemetry;
pub mod verify;
pub mod ws;
