//! waf-gate
//!
//! Serves a demo echo application behind the request gate.
//!
//! ```text
//!     Client Request
//!     ──────────────▶ listener ─▶ gate middleware ─▶ echo handler
//!                                      │
//!                                      ▼
//!                            Redis EVALSHA (fingerprint)
//!                                      │
//!                     "blocked" ─▶ 403 Blocked
//!                     otherwise / error / timeout ─▶ pass through
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use waf_gate::config::{load_config, AppConfig};
use waf_gate::observability::{logging, metrics};
use waf_gate::{Gate, GateServer};

#[derive(Parser)]
#[command(name = "waf-gate")]
#[command(about = "HTTP request gate backed by a Redis rule evaluator", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_tracing(&config.observability.log_level);
    tracing::info!("waf-gate v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        timeout_ms = config.gate.timeout_ms,
        pool_size = ?config.gate.pool_size,
        trusted_proxies = config.gate.trusted_proxies.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Construction failure is fatal: no gate, no server.
    let gate = Arc::new(Gate::connect(config.gate.clone()).await?);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    GateServer::new(gate, &config.listener).run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
