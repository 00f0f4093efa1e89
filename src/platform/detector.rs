// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use super::{Platform, PlatformStrategy};
use crate::error::Result;
use kube::Client;
use tracing::{debug, info, instrument};

/// Select the first strategy whose probe matches and load it.
///
/// Probes run in order and stop at the first match. Without a match the
/// `fallback` is loaded. Exactly one `load` happens; its error is returned.
#[instrument(skip_all)]
pub async fn detect_platform<S>(client: &Client, strategies: &[S], fallback: &S) -> Result<Platform>
where
    S: PlatformStrategy,
{
    let mut selected = None;
    for strategy in strategies {
        if strategy.detect(client).await {
            selected = Some(strategy);
            break;
        }
        debug!(platform = strategy.name(), "Platform probe did not match");
    }

    let strategy = selected.unwrap_or_else(|| {
        debug!(platform = fallback.name(), "No platform probe matched, using fallback");
        fallback
    });

    let platform = strategy.load(client).await?;
    info!("{}", platform.describe());
    Ok(platform)
}
