//! Shared utilities for transmitter integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use pager_transmitter_stub::config::{ListenerConfig, MessagePolicy, TransmitterConfig};
use pager_transmitter_stub::lifecycle::Shutdown;
use pager_transmitter_stub::net::{ConnectionTracker, Listener};
use pager_transmitter_stub::transmitter::{Report, TransmitterServer};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A transmitter running on an ephemeral loopback port.
pub struct RunningStub {
    pub addr: SocketAddr,
    pub reports: mpsc::UnboundedReceiver<Report>,
    pub tracker: ConnectionTracker,
    pub shutdown: Shutdown,
    pub task: JoinHandle<()>,
}

impl RunningStub {
    /// Wait for the next finished connection.
    pub async fn next_report(&mut self) -> Report {
        tokio::time::timeout(Duration::from_secs(10), self.reports.recv())
            .await
            .expect("no report within 10s")
            .expect("server stopped")
    }
}

/// Start a stub with the given policy and delay.
pub async fn start_stub(policy: MessagePolicy, delay_secs: u64) -> RunningStub {
    let listener = Listener::bind(&ListenerConfig {
        bind_address: "127.0.0.1".into(),
        bind_port: 0,
        backlog: 1,
    })
    .await
    .unwrap();
    let addr = listener.local_addr();

    let (tx, reports) = mpsc::unbounded_channel();
    let server = TransmitterServer::new(TransmitterConfig {
        delay_secs,
        policy,
        read_chunk_size: 1024,
        max_message_bytes: 64 * 1024,
    })
    .with_reports(tx);
    let tracker = server.tracker();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let task = tokio::spawn(server.run(listener, rx));

    RunningStub {
        addr,
        reports,
        tracker,
        shutdown,
        task,
    }
}

/// Connect, write `bytes`, and close the write side.
#[allow(dead_code)]
pub async fn send_raw(addr: SocketAddr, bytes: &[u8]) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(bytes).await.unwrap();
    stream.shutdown().await.unwrap();
    stream
}
