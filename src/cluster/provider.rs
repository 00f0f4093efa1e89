// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Process wide memoization of the cluster handle

use super::Cluster;
use crate::config::Config;
use crate::error::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

static CLUSTER: ClusterProvider = ClusterProvider::new();

/// Return the process wide cluster handle, connecting on first use.
///
/// Later calls return the same handle without reconnecting or detecting the
/// platform again. A failed connection is not remembered.
pub async fn get_cluster(config: &Config) -> Result<Arc<Cluster>> {
    CLUSTER
        .get_or_try_init(|| Cluster::connect(config))
        .await
}

/// Drop the process wide handle so the next [`get_cluster`] connects again
pub async fn reset_cluster() {
    CLUSTER.reset().await;
}

/// Lazily initialised slot for a [`Cluster`].
///
/// Concurrent first callers wait for the one running the initialisation and
/// then share its result.
pub struct ClusterProvider {
    slot: Mutex<Option<Arc<Cluster>>>,
}

impl ClusterProvider {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::const_new(None),
        }
    }

    pub async fn get_or_try_init<F, Fut>(&self, init: F) -> Result<Arc<Cluster>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Cluster>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(cluster) = slot.as_ref() {
            return Ok(cluster.clone());
        }

        debug!("Initialising cluster handle");
        let cluster = Arc::new(init().await?);
        *slot = Some(cluster.clone());
        Ok(cluster)
    }

    /// The cached handle, if any
    pub async fn get(&self) -> Option<Arc<Cluster>> {
        self.slot.lock().await.clone()
    }

    pub async fn reset(&self) {
        self.slot.lock().await.take();
    }
}

impl Default for ClusterProvider {
    fn default() -> Self {
        Self::new()
    }
}
