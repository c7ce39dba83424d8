//! # nsb-daemon
//!
//! Serves the module namespace until Ctrl+C.

use anyhow::{Context, Result};
use nsb_daemon::{load_config, NamespaceDaemon};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config().context("Failed to load configuration")?;

    let mut daemon = NamespaceDaemon::start(config)?;

    info!("Namespace service is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    daemon.shutdown().await;

    Ok(())
}
