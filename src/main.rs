//! gate-proxy
//!
//! ```text
//!                         ┌──────────────────────────────────────────┐
//!   GET /sadfh9obdfe1     │                gate-proxy                │
//!  ───────────────────────┼─▶ header "abc" set? ── yes ──▶ 200 text  │
//!                         │          │                               │
//!                         │          no                              │
//!                         │          ▼                               │
//!                         │   director: http://127.0.0.1:5002        │
//!                         │             path → /sendsend ────────────┼──▶ upstream
//!  ◀──────────────────────┼── status, headers, body streamed back ◀──┼───
//!                         └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use gate_proxy::lifecycle::{resolve_config, signals, ConfigOverrides, Shutdown};
use gate_proxy::observability::logging::init_logging;
use gate_proxy::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "gate-proxy", version)]
#[command(about = "Header-gated reverse proxy", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,

    /// Upstream base URL, overrides `upstream.address`.
    #[arg(long)]
    upstream: Option<String>,

    /// Log level, overrides `observability.log_level`.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(
        cli.config.as_deref(),
        ConfigOverrides {
            bind_address: cli.bind,
            upstream_address: cli.upstream,
            log_level: cli.log_level,
        },
    )?;

    init_logging(&config.observability);

    tracing::info!("gate-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        gate_path = %config.gate.path,
        upstream = %config.upstream.address,
        upstream_path = %config.upstream.path,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::trigger_on_signal(shutdown.clone());

    HttpServer::new(config).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
