//! Relay daemon entry point.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use relay_node::{NodeConfig, RelayNode};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = NodeConfig::from_env()?;
    let node = RelayNode::start(config)?;
    info!("relay node ready; inbound surface available to the RPC boundary");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("shutdown signal received");

    node.shutdown().await;
    Ok(())
}
