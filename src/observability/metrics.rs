//! Metrics collection and exposition.
//!
//! # Metrics
//! - `pager_messages_total` (counter): finalized connections by outcome
//! - `pager_read_errors_total` (counter): read phases that ended in an error
//! - `pager_active_connections` (gauge): connections currently open
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, address = %addr, "Failed to install metrics exporter"),
    }
}

pub fn record_message(outcome: &'static str) {
    metrics::counter!("pager_messages_total", "outcome" => outcome).increment(1);
}

pub fn record_read_error(kind: &'static str) {
    metrics::counter!("pager_read_errors_total", "kind" => kind).increment(1);
}

pub fn set_active_connections(count: u64) {
    metrics::gauge!("pager_active_connections").set(count as f64);
}
