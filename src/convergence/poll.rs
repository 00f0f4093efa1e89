// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Bounded polling of a condition until it holds, fails or runs out of time.

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Interval and overall budget of a single poll.
///
/// A zero timeout evaluates the condition exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSpec {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollSpec {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

/// Poll `condition` until it yields a value.
///
/// The condition runs immediately and then once per interval. It returns
/// `Ok(Some(value))` when satisfied, `Ok(None)` to keep waiting, or an error
/// that aborts the poll as-is. The last sleep is clamped to the remaining
/// budget, so the condition gets a final evaluation at the deadline before
/// [`Error::Timeout`] is returned. An evaluation still running at the deadline
/// is abandoned; each evaluation is allowed at least one interval, so the poll
/// ends no later than one interval past the timeout. Cancelling `cancel` ends the poll with
/// [`Error::Cancelled`].
pub async fn poll_until<T, F, Fut>(
    condition_name: &str,
    spec: PollSpec,
    cancel: &CancellationToken,
    mut condition: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    if spec.interval.is_zero() {
        return Err(Error::InvalidPollSpec {
            condition: condition_name.to_string(),
            interval: spec.interval,
        });
    }

    let start = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        // An evaluation may run until the deadline, but always gets at least one interval.
        let budget = spec
            .timeout
            .saturating_sub(start.elapsed())
            .max(spec.interval);
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled(condition_name)),
            outcome = condition() => outcome?,
            _ = sleep(budget) => {
                debug!(condition = %condition_name, attempts, "Condition evaluation overran the deadline");
                return Err(timed_out(condition_name, start.elapsed()));
            }
        };

        let elapsed = start.elapsed();
        if let Some(value) = outcome {
            debug!(
                condition = %condition_name,
                attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                "Condition satisfied"
            );
            return Ok(value);
        }

        if elapsed >= spec.timeout {
            return Err(timed_out(condition_name, elapsed));
        }

        let pause = spec.interval.min(spec.timeout - elapsed);
        trace!(condition = %condition_name, attempts, "Condition not yet satisfied");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled(condition_name)),
            _ = sleep(pause) => {}
        }
    }
}

/// Poll a boolean condition, see [`poll_until`].
pub async fn poll_immediate<F, Fut>(
    condition_name: &str,
    spec: PollSpec,
    cancel: &CancellationToken,
    mut condition: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    poll_until(condition_name, spec, cancel, || {
        let check = condition();
        async move { Ok(check.await?.then_some(())) }
    })
    .await
}

fn timed_out(condition_name: &str, waited: Duration) -> Error {
    Error::Timeout {
        condition: condition_name.to_string(),
        waited,
    }
}

fn cancelled(condition_name: &str) -> Error {
    Error::Cancelled {
        condition: condition_name.to_string(),
    }
}
