//! Telemetry module
//!
//! Structured logging and pipeline counters

mod logging;
mod metrics;

pub use logging::init_logging;
pub use metrics::{
    push_failure, push_ok, sink_failure, tick_accepted, tick_rejected,
};

use crate::config::TelemetryConfig;

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level)?;

    if let Some(port) = config.metrics_port {
        metrics::install_exporter(port)?;
    }

    Ok(())
}
