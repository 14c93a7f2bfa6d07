//! Pager Transmitter Stub
//!
//! Stands in for a pager transmitter on the network.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────┐
//!                 │               TRANSMITTER STUB                   │
//!                 │                                                  │
//!   Dispatcher    │  ┌──────────┐   ┌──────────┐   ┌─────────────┐  │
//!   ──────────────┼─▶│   net    │──▶│ message  │──▶│ transmitter │  │
//!   <cap>\r<txt>  │  │ listener │   │ reader + │   │ log + delay │  │
//!   \r\r, close   │  │ backlog 1│   │ policy   │   │ + close     │  │
//!                 │  └──────────┘   └──────────┘   └──────┬──────┘  │
//!                 │        ▲                              │         │
//!                 │        └────────── next accept ◀──────┘         │
//!                 │                                                  │
//!                 │  config · observability · lifecycle              │
//!                 └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use pager_transmitter_stub::config::{self, MessagePolicy};
use pager_transmitter_stub::lifecycle::{signals, startup, Shutdown};
use pager_transmitter_stub::observability::logging;
use pager_transmitter_stub::TransmitterServer;

#[derive(Parser)]
#[command(name = "pager-transmitter-stub")]
#[command(about = "Receive-only stand-in for a pager transmitter", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "STUB_CONFIG")]
    config: Option<PathBuf>,

    /// Validation policy; overrides MESSAGE_POLICY and the config file.
    #[arg(short, long)]
    policy: Option<MessagePolicy>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match config::load_from_env(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    if let Some(policy) = cli.policy {
        config.transmitter.policy = policy;
    }

    logging::init(&config.observability.log_level);
    tracing::info!("pager-transmitter-stub v{} starting", env!("CARGO_PKG_VERSION"));

    let listener = match startup::start(&config).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    let shutdown = Shutdown::new();
    let server = TransmitterServer::new(config.transmitter.clone());
    let server_shutdown = shutdown.subscribe();

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::terminate_signal().await;
        trigger.trigger();
    });

    server.run(listener, server_shutdown).await;

    tracing::info!("Shutdown complete");
    Ok(())
}
