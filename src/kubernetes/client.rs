// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation and kubeconfig utilities

use crate::config::Config;
use crate::error::{Error, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use tracing::{debug, instrument};

/// Create a Kubernetes client from the connection configuration.
///
/// An inline kubeconfig wins over the environment; otherwise the config is
/// inferred (in-cluster service account or `KUBECONFIG`).
#[instrument(skip(config), fields(context = ?config.context))]
pub async fn create_client(config: &Config) -> Result<Client> {
    let client_config = build_kube_config(config).await?;
    debug!("Connecting to {}", client_config.cluster_url);

    Client::try_from(client_config)
        .map_err(|e| Error::Kubeconfig(format!("Failed to create client: {}", e)))
}

async fn build_kube_config(config: &Config) -> Result<KConfig> {
    let options = KubeConfigOptions {
        context: config.context.clone(),
        ..Default::default()
    };

    match (&config.kubeconfig_data, &config.context) {
        (Some(data), _) => {
            let kubeconfig = parse_kubeconfig(data)?;
            KConfig::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .map_err(|e| Error::Kubeconfig(format!("Failed to create config: {}", e)))
        }
        (None, Some(_)) => KConfig::from_kubeconfig(&options)
            .await
            .map_err(|e| Error::Kubeconfig(format!("Failed to load kubeconfig: {}", e))),
        (None, None) => KConfig::infer()
            .await
            .map_err(|e| Error::Kubeconfig(format!("Failed to infer config: {}", e))),
    }
}

/// Parse an inline kubeconfig document
fn parse_kubeconfig(data: &str) -> Result<Kubeconfig> {
    serde_yaml::from_str(data)
        .map_err(|e| Error::Kubeconfig(format!("Failed to parse kubeconfig: {}", e)))
}
