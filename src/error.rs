// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::kubernetes::crd::CrdWaitPhase;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to {operation} {target}: {source}")]
    Request {
        operation: &'static str,
        target: String,
        #[source]
        source: kube::Error,
    },

    #[error("Failed to load kubeconfig: {0}")]
    Kubeconfig(String),

    #[error("Failed to load {platform} platform: {message}")]
    PlatformLoad {
        platform: String,
        message: String,
    },

    #[error("Invalid poll interval {interval:?} for {condition}")]
    InvalidPollSpec {
        condition: String,
        interval: Duration,
    },

    #[error("Timed out after {waited:?} waiting for {condition}")]
    Timeout { condition: String, waited: Duration },

    #[error("Cancelled while waiting for {condition}")]
    Cancelled { condition: String },

    #[error("CRD {crd} wait failed while {phase}: {source}")]
    CrdWait {
        crd: String,
        phase: CrdWaitPhase,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap a kube error with the operation and resource it was issued for
    pub fn request(operation: &'static str, target: impl Into<String>, source: kube::Error) -> Self {
        Error::Request {
            operation,
            target: target.into(),
            source,
        }
    }

    /// True when the deadline elapsed, including a timed out CRD phase
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::CrdWait { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// True when the underlying API call reported 404
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Request { source, .. } => is_not_found(source),
            _ => false,
        }
    }
}

/// Check whether a kube error is an API 404
pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == 404)
}

pub type Result<T> = std::result::Result<T, Error>;
