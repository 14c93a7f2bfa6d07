//! TCP listener for the transmitter socket.
//!
//! # Responsibilities
//! - Bind to the configured address and port exactly once
//! - Listen with a small backlog so excess peers are refused by the kernel
//! - Accept incoming TCP connections

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use tokio::net::{TcpListener, TcpSocket, TcpStream};

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    /// Failed to accept connection.
    #[error("Failed to accept: {0}")]
    Accept(#[source] std::io::Error),
}

/// Startup line naming the bound address and port.
pub fn banner(addr: SocketAddr) -> String {
    format!("starting up on {} port {}", addr.ip(), addr.port())
}

/// The transmitter's listening socket.
///
/// Owned by the driver loop; the socket is closed when this value is dropped.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
    local_addr: SocketAddr,
}

impl Listener {
    /// Bind to the configured address and start listening.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let display = format!("{}:{}", config.bind_address, config.bind_port);
        let bind_err = |source: std::io::Error| ListenerError::Bind {
            address: display.clone(),
            source,
        };

        let ip: IpAddr = config
            .bind_address
            .parse()
            .map_err(|e| bind_err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)))?;
        let addr = SocketAddr::new(ip, config.bind_port);

        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .map_err(bind_err)?;

        #[cfg(unix)]
        socket.set_reuseaddr(true).map_err(bind_err)?;

        socket.bind(addr).map_err(bind_err)?;
        let inner = socket.listen(config.backlog).map_err(bind_err)?;
        let local_addr = inner.local_addr().map_err(bind_err)?;

        // Printed regardless of the log filter.
        println!("{}", banner(local_addr));
        tracing::debug!(address = %local_addr, backlog = config.backlog, "Listener bound");

        Ok(Self { inner, local_addr })
    }

    /// Wait for the next peer.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr), ListenerError> {
        let (stream, addr) = self.inner.accept().await.map_err(ListenerError::Accept)?;
        tracing::debug!(peer_addr = %addr, "Connection accepted");
        Ok((stream, addr))
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}
