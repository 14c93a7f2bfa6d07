//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize the metrics exporter when enabled
//! - Bind the listener last, so traffic only arrives once everything is ready
//!
//! Any error here is fatal to the process.

use std::net::SocketAddr;

use crate::config::StubConfig;
use crate::net::{Listener, ListenerError};
use crate::observability::metrics;

/// Bring up the process-wide resources described by `config`.
pub async fn start(config: &StubConfig) -> Result<Listener, ListenerError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        bind_port = config.listener.bind_port,
        delay_secs = config.transmitter.delay_secs,
        policy = %config.transmitter.policy,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    Listener::bind(&config.listener).await
}
