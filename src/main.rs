// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use harbormaster::config::Config;
use harbormaster::get_cluster;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Harbormaster");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: poll_interval={:?}, default_timeout={:?}",
        config.poll_interval, config.default_timeout
    );

    // Connect and detect the platform
    let cluster = get_cluster(&config)
        .await
        .context("Failed to connect to the Kubernetes cluster")?;

    let version = cluster
        .server_version()
        .await
        .context("Failed to read the API server version")?;
    info!("Kubernetes API server version {}", version);
    info!("{}", cluster.platform().describe());

    println!("{}", serde_json::to_string_pretty(cluster.platform())?);
    Ok(())
}
