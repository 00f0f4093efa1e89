// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Condition evaluators for the resources orchestration steps wait on.
//!
//! Object predicates are plain [`Condition`] values so they can be checked
//! against fixtures. The async evaluators read the current state through an
//! `Api<K>` and reduce it to "satisfied" or "not yet", or fail hard.

use crate::error::Result;
use crate::kubernetes::accessor;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{Namespace, Pod, Secret};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::runtime::wait::{conditions, Condition};
use kube::Api;
use tracing::warn;

const STATUS_TRUE: &str = "True";

fn job_has_condition(job: &Job, types: &[&str]) -> bool {
    job.status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .is_some_and(|conditions| {
            conditions
                .iter()
                .any(|c| c.status == STATUS_TRUE && types.contains(&c.type_.as_str()))
        })
}

/// Job has a `Failed=True` condition
pub fn is_job_failed() -> impl Condition<Job> {
    |obj: Option<&Job>| obj.is_some_and(|job| job_has_condition(job, &["Failed"]))
}

/// Job reached a terminal state, either `Complete=True` or `Failed=True`
pub fn is_job_done() -> impl Condition<Job> {
    |obj: Option<&Job>| obj.is_some_and(|job| job_has_condition(job, &["Failed", "Complete"]))
}

/// Deployment has an `Available=True` condition
pub fn is_deployment_available() -> impl Condition<Deployment> {
    |obj: Option<&Deployment>| {
        obj.and_then(|d| d.status.as_ref())
            .and_then(|s| s.conditions.as_ref())
            .is_some_and(|conditions| {
                conditions
                    .iter()
                    .any(|c| c.type_ == "Available" && c.status == STATUS_TRUE)
            })
    }
}

pub async fn job_failed(api: &Api<Job>, name: &str) -> Result<bool> {
    let job = accessor::get_existing(api, name).await?;
    Ok(is_job_failed().matches_object(Some(&job)))
}

pub async fn job_done(api: &Api<Job>, name: &str) -> Result<bool> {
    let job = accessor::get_existing(api, name).await?;
    Ok(is_job_done().matches_object(Some(&job)))
}

pub async fn deployment_available(api: &Api<Deployment>, name: &str) -> Result<bool> {
    let deployment = accessor::get_existing(api, name).await?;
    Ok(is_deployment_available().matches_object(Some(&deployment)))
}

/// Satisfied once the namespace can no longer be read
pub async fn namespace_absent(api: &Api<Namespace>, name: &str) -> Result<bool> {
    Ok(accessor::get(api, name).await?.is_none())
}

/// Satisfied when no pod matches `selector`.
///
/// A failing list call also counts as "absent". Orchestration steps relied on
/// this when the namespace holding the pods is removed mid-wait, but it hides
/// real API failures, so the error is logged.
pub async fn pods_absent(api: &Api<Pod>, selector: &str) -> Result<bool> {
    match accessor::list(api, Some(selector)).await {
        Ok(pods) => Ok(pods.is_empty()),
        Err(e) => {
            warn!(selector, error = %e, "Listing pods failed, treating them as absent");
            Ok(true)
        }
    }
}

/// The secret once it exists, `None` while it has not been created yet
pub async fn secret_present(api: &Api<Secret>, name: &str) -> Result<Option<Secret>> {
    accessor::get(api, name).await
}

/// Satisfied once the definition object exists
pub async fn crd_exists(api: &Api<CustomResourceDefinition>, name: &str) -> Result<bool> {
    Ok(accessor::get(api, name).await?.is_some())
}

/// Satisfied once the definition reports `Established=True`; it must exist
pub async fn crd_established(api: &Api<CustomResourceDefinition>, name: &str) -> Result<bool> {
    let crd = accessor::get_existing(api, name).await?;
    Ok(conditions::is_crd_established().matches_object(Some(&crd)))
}
