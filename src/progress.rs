// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Progress reporting for long waits
//!
//! Waits on the cluster handle can announce what they are waiting for and how
//! it ended. The sink is fire-and-forget and never changes the outcome.

use crate::error::Result;
use std::future::Future;
use tokio::time::Instant;
use tracing::{info, warn};

/// Progress update message
#[derive(Clone, Debug, PartialEq)]
pub enum ProgressUpdate {
    Started { message: String },
    Succeeded { message: String, elapsed_ms: u64 },
    Failed { message: String, error: String },
}

/// Presentation sink for progress updates
pub trait Progress: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// Renders progress updates as log lines
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl Progress for LogProgress {
    fn report(&self, update: ProgressUpdate) {
        match update {
            ProgressUpdate::Started { message } => info!("{}", message),
            ProgressUpdate::Succeeded {
                message,
                elapsed_ms,
            } => info!(elapsed_ms, "Done: {}", message),
            ProgressUpdate::Failed { message, error } => warn!(%error, "Failed: {}", message),
        }
    }
}

/// Run `operation`, reporting start and outcome to `progress` when given
pub async fn track<T, Fut>(progress: Option<&dyn Progress>, message: String, operation: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    let Some(progress) = progress else {
        return operation.await;
    };

    progress.report(ProgressUpdate::Started {
        message: message.clone(),
    });
    let start = Instant::now();
    let result = operation.await;

    match &result {
        Ok(_) => progress.report(ProgressUpdate::Succeeded {
            message,
            elapsed_ms: start.elapsed().as_millis() as u64,
        }),
        Err(e) => progress.report(ProgressUpdate::Failed {
            message,
            error: e.to_string(),
        }),
    }
    result
}
