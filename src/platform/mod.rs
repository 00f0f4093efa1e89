// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes platform flavors and how to recognise them.
//!
//! Each flavor is a [`PlatformStrategy`]: a probe that inspects live node
//! state and a loader that reads the platform specific details (the
//! externally reachable addresses) once the flavor has been selected.

mod detector;

pub use detector::detect_platform;

use crate::constants::platform as markers;
use crate::error::{Error, Result};
use crate::kubernetes::accessor;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node;
use kube::{Api, Client};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// The cluster distributions the platform knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Kind,
    K3s,
    Ibm,
    Minikube,
    Generic,
}

impl PlatformKind {
    /// Detection order; `Generic` is the fallback and is never probed
    pub const SUPPORTED: [PlatformKind; 4] = [
        PlatformKind::Kind,
        PlatformKind::K3s,
        PlatformKind::Ibm,
        PlatformKind::Minikube,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PlatformKind::Kind => "kind",
            PlatformKind::K3s => "k3s",
            PlatformKind::Ibm => "ibm",
            PlatformKind::Minikube => "minikube",
            PlatformKind::Generic => "generic",
        }
    }

    /// Whether a single node carries this flavor's marker
    pub fn matches_node(&self, node: &Node) -> bool {
        let provider_id = node
            .spec
            .as_ref()
            .and_then(|s| s.provider_id.as_deref())
            .unwrap_or_default();
        let has_label = |key: &str| {
            node.metadata
                .labels
                .as_ref()
                .is_some_and(|l| l.contains_key(key))
        };

        match self {
            PlatformKind::Kind => provider_id.starts_with(markers::KIND_PROVIDER_PREFIX),
            PlatformKind::K3s => {
                provider_id.starts_with(markers::K3S_PROVIDER_PREFIX)
                    || node
                        .status
                        .as_ref()
                        .and_then(|s| s.node_info.as_ref())
                        .is_some_and(|info| info.kubelet_version.contains(markers::K3S_KUBELET_MARKER))
            }
            PlatformKind::Ibm => has_label(markers::IBM_WORKER_LABEL),
            PlatformKind::Minikube => has_label(markers::MINIKUBE_NAME_LABEL),
            PlatformKind::Generic => false,
        }
    }

    /// Node address type that is reachable from outside the cluster
    fn external_address_type(&self) -> Option<&'static str> {
        match self {
            PlatformKind::Kind | PlatformKind::K3s | PlatformKind::Minikube => Some("InternalIP"),
            PlatformKind::Ibm => Some("ExternalIP"),
            PlatformKind::Generic => None,
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved platform of the connected cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    kind: PlatformKind,
    external_ips: Vec<String>,
}

impl Platform {
    pub fn new(kind: PlatformKind, external_ips: Vec<String>) -> Self {
        Self { kind, external_ips }
    }

    pub fn generic() -> Self {
        Self::new(PlatformKind::Generic, Vec::new())
    }

    pub fn kind(&self) -> PlatformKind {
        self.kind
    }

    pub fn external_ips(&self) -> &[String] {
        &self.external_ips
    }

    /// Human readable summary
    pub fn describe(&self) -> String {
        if self.external_ips.is_empty() {
            format!("Detected kubernetes platform: {}", self.kind)
        } else {
            format!(
                "Detected kubernetes platform: {}, external IPs: {}",
                self.kind,
                self.external_ips.join(", ")
            )
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

/// A way of recognising a platform flavor and loading its details
#[async_trait]
pub trait PlatformStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Inspect the cluster; API failures count as "no match"
    async fn detect(&self, client: &Client) -> bool;

    /// Read the platform details, called once after selection
    async fn load(&self, client: &Client) -> Result<Platform>;
}

#[async_trait]
impl PlatformStrategy for PlatformKind {
    fn name(&self) -> &str {
        PlatformKind::name(self)
    }

    async fn detect(&self, client: &Client) -> bool {
        if *self == PlatformKind::Generic {
            return false;
        }

        let nodes: Api<Node> = Api::all(client.clone());
        match accessor::list(&nodes, None).await {
            Ok(nodes) => nodes.iter().any(|node| self.matches_node(node)),
            Err(e) => {
                debug!(platform = %self, error = %e, "Platform probe could not list nodes");
                false
            }
        }
    }

    async fn load(&self, client: &Client) -> Result<Platform> {
        let Some(address_type) = self.external_address_type() else {
            return Ok(Platform::new(*self, Vec::new()));
        };

        let nodes: Api<Node> = Api::all(client.clone());
        let nodes = accessor::list(&nodes, None)
            .await
            .map_err(|e| Error::PlatformLoad {
                platform: self.name().to_string(),
                message: e.to_string(),
            })?;

        Ok(Platform::new(*self, node_addresses(&nodes, address_type)))
    }
}

/// Addresses of the given type across all nodes, in node order without duplicates
fn node_addresses(nodes: &[Node], address_type: &str) -> Vec<String> {
    let mut ips: Vec<String> = Vec::new();
    let addresses = nodes
        .iter()
        .filter_map(|n| n.status.as_ref())
        .filter_map(|s| s.addresses.as_ref())
        .flatten()
        .filter(|a| a.type_ == address_type);

    for address in addresses {
        if !ips.contains(&address.address) {
            ips.push(address.address.clone());
        }
    }
    ips
}
