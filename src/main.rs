//! Action router server.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                  ACTION ROUTER                    │
//!                      │                                                   │
//!     Client Request   │  ┌─────────┐   ┌──────────┐   ┌──────────────┐   │
//!     ─────────────────┼─▶│  http   │──▶│ security │──▶│   routing    │   │
//!                      │  │ server  │   │   gate   │   │  dispatcher  │   │
//!                      │  └─────────┘   └──────────┘   └──────┬───────┘   │
//!                      │                                      │           │
//!     Client Response  │                                      ▼           │
//!     ◀────────────────┼──────────────────────────────  controller action  │
//!                      │                                                   │
//!                      │  ┌─────────────────────────────────────────────┐ │
//!                      │  │ config (watch/reload) · observability ·     │ │
//!                      │  │ route cache · lifecycle                     │ │
//!                      │  └─────────────────────────────────────────────┘ │
//!                      └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use action_router::config::{load_config, RouterConfig};
use action_router::lifecycle::{signals, startup};
use action_router::observability::{logging, metrics};
use action_router::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "action-router")]
#[command(about = "Serve controller actions through a discovered route table", long_about = None)]
struct Args {
    /// Path to the TOML configuration file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "action-router starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        cache_path = %config.routing.cache_path.display(),
        debug = config.routing.debug,
        restricted = config.security.restricted,
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

    let services = startup::build_services(&config, |_| {});

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match &args.config {
        Some(path) => {
            let (watcher, rx) = action_router::config::ConfigWatcher::new(path);
            (Some(watcher.run()?), rx)
        }
        None => {
            let (_tx, rx) = mpsc::unbounded_channel();
            (None, rx)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, services);

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, config_updates, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
