// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace management utilities

use crate::constants::labels;
use crate::error::Result;
use crate::kubernetes::accessor;
use k8s_openapi::api::core::v1::Namespace;
use kube::{api::ObjectMeta, Api};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Check whether a namespace exists
pub async fn namespace_exists(api: &Api<Namespace>, name: &str) -> Result<bool> {
    Ok(accessor::get(api, name).await?.is_some())
}

/// Check whether a namespace exists and carries the platform ownership label
pub async fn namespace_exists_and_owned(api: &Api<Namespace>, name: &str) -> Result<bool> {
    let Some(namespace) = accessor::get(api, name).await? else {
        return Ok(false);
    };

    Ok(namespace
        .metadata
        .labels
        .as_ref()
        .and_then(|l| l.get(labels::DEPLOYMENT_KEY))
        .is_some_and(|v| v == labels::DEPLOYMENT_VALUE))
}

/// Ensure a namespace exists, create it with the given labels and annotations if it doesn't
#[instrument(skip(api, labels, annotations))]
pub async fn ensure_namespace(
    api: &Api<Namespace>,
    name: &str,
    labels: BTreeMap<String, String>,
    annotations: BTreeMap<String, String>,
) -> Result<()> {
    if namespace_exists(api, name).await? {
        debug!("Namespace {} already exists", name);
        return Ok(());
    }

    info!("Creating namespace {}", name);
    let ns = Namespace {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            labels: (!labels.is_empty()).then_some(labels),
            annotations: (!annotations.is_empty()).then_some(annotations),
            ..Default::default()
        },
        ..Default::default()
    };
    accessor::create(api, &ns).await?;
    info!("Namespace {} created successfully", name);
    Ok(())
}
