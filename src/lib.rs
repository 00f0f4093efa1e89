// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod cluster;
pub mod config;
pub mod constants;
pub mod convergence;
pub mod error;
pub mod kubernetes;
pub mod platform;
pub mod progress;

#[cfg(test)]
pub(crate) mod test_utils;

pub use cluster::{get_cluster, reset_cluster, Cluster};
pub use error::{Error, Result};
pub use platform::{Platform, PlatformKind};
