// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation, resource access, namespaces and CRDs.

pub mod accessor;
pub mod client;
pub mod crd;
pub mod namespaces;

pub use client::create_client;
pub use crd::{wait_for_crd, CrdWaitPhase};
pub use namespaces::{ensure_namespace, namespace_exists, namespace_exists_and_owned};
