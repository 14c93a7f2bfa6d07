//! Sending side of the wire protocol, as used by paging dispatchers.

use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::message::{encode_transmission, FrameError};

#[derive(Debug, Error)]
pub enum TransmitError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("transmitter {address} is not reachable: {source}")]
    Unreachable {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("transmitter {address} did not accept a connection within {timeout:?}")]
    Timeout { address: String, timeout: Duration },

    #[error("transmitter broke the connection during transmission: {0}")]
    Broken(#[source] std::io::Error),
}

/// Connect to `address`, write one framed message and close.
///
/// No reply is expected; the transmitter never writes back.
pub async fn transmit(
    address: &str,
    cap_code: u16,
    text: &str,
    connect_timeout: Duration,
) -> Result<(), TransmitError> {
    let wire = encode_transmission(cap_code, text)?;

    let mut stream = match tokio::time::timeout(connect_timeout, TcpStream::connect(address)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(source)) => {
            return Err(TransmitError::Unreachable {
                address: address.to_string(),
                source,
            })
        }
        Err(_) => {
            return Err(TransmitError::Timeout {
                address: address.to_string(),
                timeout: connect_timeout,
            })
        }
    };

    stream
        .write_all(wire.as_bytes())
        .await
        .map_err(TransmitError::Broken)?;
    stream.shutdown().await.map_err(TransmitError::Broken)?;

    tracing::debug!(address, cap_code, bytes = wire.len(), "Message handed to transmitter");
    Ok(())
}
