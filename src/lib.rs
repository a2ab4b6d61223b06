// SPDX-FileCopyrightText: 2026 The cts-harness Authors
// SPDX-License-Identifier: Apache-2.0

//! Conformance Test Session Harness
//!
//! This crate drives conformance test cases on behalf of a host process
//! connected over a persistent WebSocket:
//!
//! - One JSON object per outbound message, in a fixed per-case order:
//!   `TEST_STARTED`, zero or more `TEST_HEARTBEAT`, `TEST_STATUS`, one or
//!   more `TEST_LOG`, `TEST_FINISHED`
//! - Periodic heartbeats (500 ms default) while a case executes, so the
//!   host can tell a long-running case from a stalled one
//! - Log payloads split to stay under the host's per-message byte ceiling
//! - A deferred-firing rate limiter for throttling arbitrary side effects
//!
//! The test bodies themselves are external; the execution seam is the
//! [`suite::TestCase`] / [`suite::TestSuite`] traits.

pub mod config;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod payload;
pub mod protocol;
pub mod recorder;
pub mod session;
pub mod suite;

pub use config::Config;
pub use error::HarnessError;
pub use limiter::RateLimiter;
pub use protocol::{OutboundMessage, RunRequest, TestStatus};
pub use session::SessionDriver;
pub use suite::{StaticSuite, TestCase, TestSuite};
