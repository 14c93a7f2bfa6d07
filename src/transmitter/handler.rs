//! Per-connection handling: read, then finalize exactly once.
//!
//! # Responsibilities
//! - Drain the connection into a message buffer
//! - Finalize on every exit path of the read phase:
//!   classify → log → pace → close
//!
//! # Design Decisions
//! - `OpenConnection` owns the stream and its tracker guard; `finalize`
//!   consumes it, so the socket is closed once and only once
//! - A dropped handler future (shutdown) still closes the socket via `Drop`

use std::net::SocketAddr;

use tokio::io::AsyncRead;

use crate::config::TransmitterConfig;
use crate::message::{read_message, Classification, ReadError};
use crate::net::{ConnectionGuard, ConnectionId};
use crate::observability::metrics;

/// What happened to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub connection_id: ConnectionId,
    pub peer: SocketAddr,
    /// Everything decoded before the read phase ended.
    pub raw: String,
    pub classification: Classification,
    /// Rendered read error, if the read phase failed.
    pub read_error: Option<String>,
}

/// A connection that has been accepted and not yet finalized.
pub struct OpenConnection<S> {
    stream: S,
    peer: SocketAddr,
    guard: ConnectionGuard,
    message: String,
}

impl<S> OpenConnection<S>
where
    S: AsyncRead + Unpin,
{
    pub fn new(stream: S, peer: SocketAddr, guard: ConnectionGuard) -> Self {
        Self {
            stream,
            peer,
            guard,
            message: String::new(),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.guard.id()
    }

    /// Read phase. The outcome is handed to `finalize` instead of being
    /// propagated, so an error never skips finalization.
    async fn read(&mut self, config: &TransmitterConfig) -> Result<usize, ReadError> {
        read_message(
            &mut self.stream,
            config.read_chunk_size,
            config.max_message_bytes,
            &mut self.message,
        )
        .await
    }

    /// Classify, log, wait out the pacing delay, then close.
    async fn finalize(self, read_result: Result<usize, ReadError>, config: &TransmitterConfig) -> Report {
        let read_error = match read_result {
            Ok(bytes) => {
                tracing::debug!(bytes, "Peer closed the stream");
                None
            }
            Err(e) => {
                let kind = match e {
                    ReadError::Io(_) => "io",
                    ReadError::TooLarge { .. } => "too_large",
                    ReadError::Decode { .. } => "decode",
                };
                metrics::record_read_error(kind);
                tracing::warn!(error = %e, "Read phase ended with an error");
                Some(e.to_string())
            }
        };

        let classification = config.policy.classify_raw(&self.message);
        log_outcome(&classification, &self.message);
        metrics::record_message(classification.label());

        tokio::time::sleep(config.delay()).await;

        let OpenConnection {
            stream,
            peer,
            guard,
            message,
        } = self;
        let connection_id = guard.id();
        drop(stream);
        drop(guard);

        Report {
            connection_id,
            peer,
            raw: message,
            classification,
            read_error,
        }
    }
}

fn log_outcome(classification: &Classification, raw: &str) {
    match classification {
        Classification::Valid { cap_code, message } => {
            tracing::info!(cap_code = %cap_code, "Message to Pager {}: {}", cap_code, message);
        }
        Classification::Invalid(reason) => {
            tracing::info!(reason = reason.label(), "Invalid message ({}): {:?}", reason, raw);
        }
    }
}

/// Serve one connection from accept to close.
pub async fn handle_connection<S>(
    stream: S,
    peer: SocketAddr,
    guard: ConnectionGuard,
    config: &TransmitterConfig,
) -> Report
where
    S: AsyncRead + Unpin,
{
    tracing::info!(peer_addr = %peer, "connection from {}", peer);

    let mut connection = OpenConnection::new(stream, peer, guard);
    let read_result = connection.read(config).await;
    connection.finalize(read_result, config).await
}
