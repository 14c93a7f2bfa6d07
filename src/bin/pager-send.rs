use std::time::Duration;

use clap::Parser;
use pager_transmitter_stub::client::transmit;
use pager_transmitter_stub::message::{MAX_CAP_CODE, MIN_CAP_CODE};

#[derive(Parser)]
#[command(name = "pager-send")]
#[command(about = "Send a test message to a pager transmitter", long_about = None)]
struct Cli {
    /// Cap code of the receiving pager.
    #[arg(value_parser = clap::value_parser!(u16).range(MIN_CAP_CODE as i64..=MAX_CAP_CODE as i64))]
    cap: u16,

    /// Message body (ASCII).
    message: String,

    #[arg(short = 't', long, default_value = "127.0.0.1")]
    host: String,

    #[arg(short, long, env = "BIND_ON_PORT", default_value_t = 6000)]
    port: u16,

    /// Connect timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("pager_transmitter_stub={level}").into()),
        )
        .init();

    let address = format!("{}:{}", cli.host, cli.port);
    if cli.verbose {
        println!("Using transmitter at {address}");
    }

    if let Err(e) = transmit(&address, cli.cap, &cli.message, Duration::from_secs(cli.timeout)).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    println!("Successfully sent message to cap code {}", cli.cap);
    Ok(())
}
