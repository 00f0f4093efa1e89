// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The cluster handle: one client, one detected platform, and the waits
//! orchestration steps are built from.

mod provider;

pub use provider::{get_cluster, reset_cluster, ClusterProvider};

use crate::config::Config;
use crate::constants::{labels, resources};
use crate::convergence::conditions;
use crate::convergence::poll::{poll_immediate, poll_until, PollSpec};
use crate::error::{Error, Result};
use crate::kubernetes::{accessor, crd, create_client, namespaces};
use crate::platform::{detect_platform, Platform, PlatformKind, PlatformStrategy};
use crate::progress::{track, Progress};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Pod, Secret};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use k8s_openapi::ByteString;
use kube::api::{ApiResource, DynamicObject, GroupVersionKind, ObjectMeta};
use kube::{Api, Client};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// Connected cluster with its detected platform
pub struct Cluster {
    client: Client,
    platform: Platform,
    poll_interval: Duration,
}

impl fmt::Debug for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cluster")
            .field("platform", &self.platform)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

fn workspace_namespace_labels() -> BTreeMap<String, String> {
    BTreeMap::from([(
        labels::NAMESPACE_KEY.to_string(),
        labels::NAMESPACE_VALUE.to_string(),
    )])
}

fn api_user_secret_labels(role: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            labels::API_SECRET_KEY.to_string(),
            labels::API_SECRET_VALUE.to_string(),
        ),
        (labels::API_SECRET_ROLE_KEY.to_string(), role.to_string()),
    ])
}

impl Cluster {
    /// Connect using the configuration, then detect and load the platform
    #[instrument(skip(config))]
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = create_client(config).await?;
        info!("Connected to Kubernetes cluster");
        Self::from_client(client, config.poll_interval).await
    }

    /// Build a handle around an existing client using the supported platforms
    pub async fn from_client(client: Client, poll_interval: Duration) -> Result<Self> {
        Self::with_strategies(
            client,
            poll_interval,
            &PlatformKind::SUPPORTED,
            &PlatformKind::Generic,
        )
        .await
    }

    pub async fn with_strategies<S: PlatformStrategy>(
        client: Client,
        poll_interval: Duration,
        strategies: &[S],
        fallback: &S,
    ) -> Result<Self> {
        let platform = detect_platform(&client, strategies, fallback).await?;
        Ok(Self {
            client,
            platform,
            poll_interval,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    fn poll_spec(&self, timeout: Duration) -> PollSpec {
        PollSpec::new(self.poll_interval, timeout)
    }

    fn namespaces(&self) -> Api<Namespace> {
        Api::all(self.client.clone())
    }

    fn jobs(&self, namespace: &str) -> Api<Job> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn secrets(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn dynamic(&self, namespace: &str, kind: &str, plural: &str) -> Api<DynamicObject> {
        let gvk = GroupVersionKind::gvk(
            resources::APPLICATION_GROUP,
            resources::APPLICATION_VERSION,
            kind,
        );
        let resource = ApiResource::from_gvk_with_plural(&gvk, plural);
        Api::namespaced_with(self.client.clone(), namespace, &resource)
    }

    /// Dynamic client for the platform's application resources
    pub fn apps(&self, namespace: &str) -> Api<DynamicObject> {
        self.dynamic(namespace, resources::APP_KIND, resources::APPS)
    }

    /// Dynamic client for the platform's application chart resources
    pub fn app_charts(&self, namespace: &str) -> Api<DynamicObject> {
        self.dynamic(namespace, resources::APP_CHART_KIND, resources::APP_CHARTS)
    }

    /// Git version of the API server, e.g. `v1.30.2`
    pub async fn server_version(&self) -> Result<String> {
        let info = self
            .client
            .apiserver_version()
            .await
            .map_err(|e| Error::request("get", "server version", e))?;
        Ok(info.git_version)
    }

    pub async fn namespace_exists(&self, name: &str) -> Result<bool> {
        namespaces::namespace_exists(&self.namespaces(), name).await
    }

    pub async fn namespace_exists_and_owned(&self, name: &str) -> Result<bool> {
        namespaces::namespace_exists_and_owned(&self.namespaces(), name).await
    }

    /// Create the namespace unless it already exists
    pub async fn create_namespace(
        &self,
        name: &str,
        labels: BTreeMap<String, String>,
        annotations: BTreeMap<String, String>,
    ) -> Result<()> {
        namespaces::ensure_namespace(&self.namespaces(), name, labels, annotations).await
    }

    /// Create a namespace marked as a platform workspace
    pub async fn create_workspace_namespace(&self, name: &str) -> Result<()> {
        self.create_namespace(name, workspace_namespace_labels(), BTreeMap::new())
            .await
    }

    /// Pods in `namespace` matching the label selector; an empty selector matches all
    pub async fn list_pods(&self, namespace: &str, selector: &str) -> Result<Vec<Pod>> {
        accessor::list(&self.pods(namespace), Some(selector)).await
    }

    pub async fn list_jobs(&self, namespace: &str, selector: &str) -> Result<Vec<Job>> {
        accessor::list(&self.jobs(namespace), Some(selector)).await
    }

    pub async fn list_ingresses(&self, namespace: &str, selector: &str) -> Result<Vec<Ingress>> {
        let ingresses: Api<Ingress> = Api::namespaced(self.client.clone(), namespace);
        accessor::list(&ingresses, Some(selector)).await
    }

    pub async fn create_job(&self, namespace: &str, job: &Job) -> Result<Job> {
        accessor::create(&self.jobs(namespace), job).await
    }

    pub async fn delete_job(&self, namespace: &str, name: &str) -> Result<()> {
        accessor::delete(&self.jobs(namespace), name).await
    }

    pub async fn get_config_map(&self, namespace: &str, name: &str) -> Result<ConfigMap> {
        let config_maps: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
        accessor::get_existing(&config_maps, name).await
    }

    pub async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret> {
        accessor::get_existing(&self.secrets(namespace), name).await
    }

    /// Post a secret built entirely by the caller
    pub async fn create_secret(&self, namespace: &str, secret: &Secret) -> Result<Secret> {
        accessor::create(&self.secrets(namespace), secret).await
    }

    /// Post a new secret made of `data` and `labels`
    pub async fn create_labeled_secret(
        &self,
        namespace: &str,
        name: &str,
        data: BTreeMap<String, Vec<u8>>,
        labels: BTreeMap<String, String>,
    ) -> Result<Secret> {
        let secret = Secret {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                labels: Some(labels),
                ..Default::default()
            },
            data: Some(
                data.into_iter()
                    .map(|(k, v)| (k, ByteString(v)))
                    .collect(),
            ),
            ..Default::default()
        };
        self.create_secret(namespace, &secret).await
    }

    /// Store API user credentials, labelled with the user's role
    pub async fn create_api_user_secret(
        &self,
        namespace: &str,
        name: &str,
        data: BTreeMap<String, Vec<u8>>,
        role: &str,
    ) -> Result<Secret> {
        self.create_labeled_secret(namespace, name, data, api_user_secret_labels(role))
            .await
    }

    pub async fn list_api_user_secrets(&self, namespace: &str) -> Result<Vec<Secret>> {
        let selector = format!("{}={}", labels::API_SECRET_KEY, labels::API_SECRET_VALUE);
        accessor::list(&self.secrets(namespace), Some(&selector)).await
    }

    pub async fn delete_secret(&self, namespace: &str, name: &str) -> Result<()> {
        accessor::delete(&self.secrets(namespace), name).await
    }

    /// Single check whether the job has failed
    pub async fn is_job_failed(&self, namespace: &str, name: &str) -> Result<bool> {
        conditions::job_failed(&self.jobs(namespace), name).await
    }

    /// Wait until the job completed or failed
    #[instrument(skip(self, progress, cancel))]
    pub async fn wait_for_job_done(
        &self,
        namespace: &str,
        name: &str,
        timeout: Duration,
        progress: Option<&dyn Progress>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let jobs = self.jobs(namespace);
        let condition = format!("job {}/{} to finish", namespace, name);
        track(
            progress,
            format!("Waiting for job {} in {} to finish", name, namespace),
            poll_immediate(&condition, self.poll_spec(timeout), cancel, || {
                conditions::job_done(&jobs, name)
            }),
        )
        .await
    }

    /// Wait until the deployment reports itself available
    #[instrument(skip(self, progress, cancel))]
    pub async fn wait_for_deployment_completed(
        &self,
        namespace: &str,
        name: &str,
        timeout: Duration,
        progress: Option<&dyn Progress>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        let condition = format!("deployment {}/{} to be available", namespace, name);
        track(
            progress,
            format!("Waiting for deployment {} in {} to be ready", name, namespace),
            poll_immediate(&condition, self.poll_spec(timeout), cancel, || {
                conditions::deployment_available(&deployments, name)
            }),
        )
        .await
    }

    /// Wait until the namespace is gone
    #[instrument(skip(self, progress, cancel))]
    pub async fn wait_for_namespace_missing(
        &self,
        name: &str,
        timeout: Duration,
        progress: Option<&dyn Progress>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let namespaces = self.namespaces();
        let condition = format!("namespace {} to be deleted", name);
        track(
            progress,
            format!("Waiting for namespace {} to be deleted", name),
            poll_immediate(&condition, self.poll_spec(timeout), cancel, || {
                conditions::namespace_absent(&namespaces, name)
            }),
        )
        .await
    }

    /// Wait until no pod in `namespace` matches the selector
    #[instrument(skip(self, progress, cancel))]
    pub async fn wait_for_pod_by_selector_missing(
        &self,
        namespace: &str,
        selector: &str,
        timeout: Duration,
        progress: Option<&dyn Progress>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let pods = self.pods(namespace);
        let condition = format!("pods '{}' in {} to be deleted", selector, namespace);
        track(
            progress,
            format!("Waiting for pods '{}' in {} to be deleted", selector, namespace),
            poll_immediate(&condition, self.poll_spec(timeout), cancel, || {
                conditions::pods_absent(&pods, selector)
            }),
        )
        .await
    }

    /// Wait until something else created the secret and return it
    #[instrument(skip(self, progress, cancel))]
    pub async fn wait_for_secret(
        &self,
        namespace: &str,
        name: &str,
        timeout: Duration,
        progress: Option<&dyn Progress>,
        cancel: &CancellationToken,
    ) -> Result<Secret> {
        let secrets = self.secrets(namespace);
        let condition = format!("secret {}/{} to exist", namespace, name);
        track(
            progress,
            format!("Waiting for secret {} in {}", name, namespace),
            poll_until(&condition, self.poll_spec(timeout), cancel, || {
                conditions::secret_present(&secrets, name)
            }),
        )
        .await
    }

    /// Wait until the CRD exists and is established, each with the full timeout
    #[instrument(skip(self, progress, cancel))]
    pub async fn wait_for_crd(
        &self,
        name: &str,
        timeout: Duration,
        progress: Option<&dyn Progress>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let crds: Api<CustomResourceDefinition> = Api::all(self.client.clone());
        track(
            progress,
            format!("Waiting for CRD {} to be ready to use", name),
            crd::wait_for_crd(&crds, name, self.poll_spec(timeout), cancel),
        )
        .await
    }
}
