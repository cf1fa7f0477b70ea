//! Harbor TUI entry point.

use clap::Parser;
use harbor_client::{IdentityStore, MemoryStorage};
use harbor_tui::{Bridge, Endpoint, Runtime, TerminalDriver};

/// Harbor terminal chat client
#[derive(Parser, Debug)]
#[command(name = "harbor-tui")]
#[command(about = "Terminal UI for the Harbor chat protocol")]
#[command(version)]
struct Args {
    /// Server address to connect to (host:port)
    ///
    /// If not provided, runs against an in-process demo server.
    #[arg(short, long)]
    server: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let endpoint = match args.server {
        Some(addr) => Endpoint::Tcp(addr),
        None => Endpoint::InProcess,
    };

    let driver = TerminalDriver::new(endpoint)?;
    let bridge = Bridge::new(IdentityStore::new(MemoryStorage::new()));

    Ok(Runtime::new(driver, bridge).run().await?)
}
