// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Label keys and values the platform puts on the objects it owns
pub mod labels {
    /// Marks a namespace as a platform workspace
    pub const NAMESPACE_KEY: &str = "app.kubernetes.io/component";
    pub const NAMESPACE_VALUE: &str = "harbormaster-namespace";
    /// Marks objects created by a platform deployment step
    pub const DEPLOYMENT_KEY: &str = "app.kubernetes.io/managed-by";
    pub const DEPLOYMENT_VALUE: &str = "harbormaster";
    /// Marks secrets holding API user credentials
    pub const API_SECRET_KEY: &str = "harbormaster.geeko.me/api-user-credentials";
    pub const API_SECRET_VALUE: &str = "true";
    pub const API_SECRET_ROLE_KEY: &str = "harbormaster.geeko.me/role";
}

/// Node markers used by platform detection
pub mod platform {
    pub const KIND_PROVIDER_PREFIX: &str = "kind://";
    pub const K3S_PROVIDER_PREFIX: &str = "k3s://";
    pub const K3S_KUBELET_MARKER: &str = "+k3s";
    pub const IBM_WORKER_LABEL: &str = "ibm-cloud.kubernetes.io/worker-id";
    pub const MINIKUBE_NAME_LABEL: &str = "minikube.k8s.io/name";
}

/// Dynamic client coordinates for application resources
pub mod resources {
    pub const APPLICATION_GROUP: &str = "application.harbormaster.io";
    pub const APPLICATION_VERSION: &str = "v1";
    pub const APPS: &str = "apps";
    pub const APP_KIND: &str = "App";
    pub const APP_CHARTS: &str = "appcharts";
    pub const APP_CHART_KIND: &str = "AppChart";
}

pub mod defaults {
    pub const POLL_INTERVAL_MS: u64 = 1000;
    pub const TIMEOUT_SECS: u64 = 300;
}
