//! The driver loop: accept one connection, serve it to completion, repeat.

use tokio::sync::{broadcast, mpsc};
use tracing::Instrument;

use crate::config::TransmitterConfig;
use crate::net::{ConnectionTracker, Listener};
use crate::transmitter::handler::{handle_connection, Report};

/// Driver loop states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Waiting in `accept`.
    Idle,
    /// Finalizing exactly one connection.
    Serving,
}

/// Serial transmitter server.
///
/// Connections are served one at a time; the next `accept` only happens
/// after the previous connection has been logged, paced and closed.
pub struct TransmitterServer {
    config: TransmitterConfig,
    tracker: ConnectionTracker,
    reports: Option<mpsc::UnboundedSender<Report>>,
}

impl TransmitterServer {
    pub fn new(config: TransmitterConfig) -> Self {
        Self {
            config,
            tracker: ConnectionTracker::new(),
            reports: None,
        }
    }

    /// Also send every finished connection's report to `tx`.
    pub fn with_reports(mut self, tx: mpsc::UnboundedSender<Report>) -> Self {
        self.reports = Some(tx);
        self
    }

    /// Handle on the connection accounting shared with the loop.
    pub fn tracker(&self) -> ConnectionTracker {
        self.tracker.clone()
    }

    /// Run until `shutdown` fires (or its sender is dropped).
    ///
    /// A shutdown while serving drops the current connection without
    /// finishing its delay.
    pub async fn run(self, listener: Listener, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            address = %listener.local_addr(),
            policy = %self.config.policy,
            delay_secs = self.config.delay_secs,
            "Transmitter ready"
        );

        let mut state = DriverState::Idle;
        loop {
            tracing::trace!(?state, "Driver state");

            let accepted = tokio::select! {
                res = listener.accept() => res,
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
            };

            let (stream, peer) = match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(error = %e, "Accept failed");
                    continue;
                }
            };

            state = DriverState::Serving;
            tracing::trace!(?state, "Driver state");
            let guard = self.tracker.track();
            let span = tracing::info_span!("connection", id = %guard.id(), peer = %peer);
            let serving = handle_connection(stream, peer, guard, &self.config).instrument(span);

            let report = tokio::select! {
                report = serving => report,
                _ = shutdown.recv() => {
                    tracing::warn!(peer_addr = %peer, "Shutdown while serving; connection dropped");
                    break;
                }
            };
            state = DriverState::Idle;

            if let Some(tx) = &self.reports {
                let _ = tx.send(report);
            }
        }

        tracing::info!(
            released = self.tracker.released_count(),
            "Transmitter stopped"
        );
    }
}
