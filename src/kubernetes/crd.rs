// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Waiting for a CustomResourceDefinition to become usable

use crate::convergence::conditions::{crd_established, crd_exists};
use crate::convergence::poll::{poll_immediate, PollSpec};
use crate::error::{Error, Result};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::Api;
use std::fmt;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Phases of a CRD wait; each phase gets the full timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrdWaitPhase {
    AwaitingExistence,
    AwaitingEstablished,
    Done,
}

impl fmt::Display for CrdWaitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrdWaitPhase::AwaitingExistence => write!(f, "awaiting-existence"),
            CrdWaitPhase::AwaitingEstablished => write!(f, "awaiting-established"),
            CrdWaitPhase::Done => write!(f, "done"),
        }
    }
}

/// Wait until the named CRD exists and then until it is established.
pub async fn wait_for_crd(
    api: &Api<CustomResourceDefinition>,
    name: &str,
    spec: PollSpec,
    cancel: &CancellationToken,
) -> Result<()> {
    wait_for_crd_with(
        name,
        spec,
        cancel,
        || crd_exists(api, name),
        || crd_established(api, name),
    )
    .await
}

/// Drive the two CRD phases with the given probes.
///
/// The established probe is never called if the existence phase fails.
pub async fn wait_for_crd_with<E, EFut, S, SFut>(
    name: &str,
    spec: PollSpec,
    cancel: &CancellationToken,
    mut exists: E,
    mut established: S,
) -> Result<()>
where
    E: FnMut() -> EFut,
    EFut: Future<Output = Result<bool>>,
    S: FnMut() -> SFut,
    SFut: Future<Output = Result<bool>>,
{
    let mut phase = CrdWaitPhase::AwaitingExistence;

    loop {
        debug!(crd = %name, %phase, "CRD wait phase");
        let outcome = match phase {
            CrdWaitPhase::AwaitingExistence => {
                poll_immediate(&format!("CRD {} to exist", name), spec, cancel, &mut exists).await
            }
            CrdWaitPhase::AwaitingEstablished => {
                poll_immediate(
                    &format!("CRD {} to be established", name),
                    spec,
                    cancel,
                    &mut established,
                )
                .await
            }
            CrdWaitPhase::Done => {
                info!("CRD {} is established", name);
                return Ok(());
            }
        };

        if let Err(source) = outcome {
            return Err(Error::CrdWait {
                crd: name.to_string(),
                phase,
                source: Box::new(source),
            });
        }

        phase = match phase {
            CrdWaitPhase::AwaitingExistence => CrdWaitPhase::AwaitingEstablished,
            _ => CrdWaitPhase::Done,
        };
    }
}
