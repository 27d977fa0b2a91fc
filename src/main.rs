//! Task CRUD service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────▶ http server ──▶ routing ──▶ tasks handler ──▶ store
//!                    (axum +        (route      (validation,      (collections,
//!                     middleware)    table)      timestamps)       JSON file)
//!     ◀───────────── response ◀──────────────────────┘
//!
//!     Cross-cutting: config · observability · lifecycle
//! ```

use std::path::PathBuf;

use clap::Parser;

use tasks_server::config::{load_config, ServerConfig};
use tasks_server::lifecycle::{self, signals, Shutdown};
use tasks_server::observability::logging;

#[derive(Parser)]
#[command(name = "tasks-server")]
#[command(about = "HTTP CRUD service for tasks backed by a JSON file", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the store file path.
    #[arg(short, long)]
    data: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if let Some(data) = args.data {
        config.storage.path = data;
    }

    logging::init(&config.observability.log_filter);

    tracing::info!("tasks-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        storage_path = %config.storage.path,
        config_file = ?args.config,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    lifecycle::run(config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
