// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Driving eventually-consistent cluster state to a wanted condition.

pub mod conditions;
pub mod poll;

pub use poll::{poll_immediate, poll_until, PollSpec};
