// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::defaults;
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Connection and polling configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Inline kubeconfig document, takes precedence over the inferred config
    pub kubeconfig_data: Option<String>,
    /// Kubeconfig context to use instead of the current one
    pub context: Option<String>,
    /// Interval between condition evaluations for all waits
    pub poll_interval: Duration,
    pub default_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            kubeconfig_data: None,
            context: None,
            poll_interval: Duration::from_millis(defaults::POLL_INTERVAL_MS),
            default_timeout: Duration::from_secs(defaults::TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let kubeconfig_data = non_empty_var("KUBECONFIG_DATA");
        let context = non_empty_var("KUBE_CONTEXT");

        let poll_interval_ms = parse_var("HARBORMASTER_POLL_INTERVAL_MS", defaults::POLL_INTERVAL_MS)?;
        if poll_interval_ms == 0 {
            anyhow::bail!("HARBORMASTER_POLL_INTERVAL_MS must be greater than zero");
        }
        let timeout_secs = parse_var("HARBORMASTER_TIMEOUT_SECS", defaults::TIMEOUT_SECS)?;

        Ok(Config {
            kubeconfig_data,
            context,
            poll_interval: Duration::from_millis(poll_interval_ms),
            default_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var(name: &str, default: u64) -> Result<u64> {
    match non_empty_var(name) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a non-negative integer, got '{}'", name, value)),
        None => Ok(default),
    }
}
