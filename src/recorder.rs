// SPDX-FileCopyrightText: 2026 The cts-harness Authors
// SPDX-License-Identifier: Apache-2.0

//! Result recorder seam and the heartbeat decorator.
//!
//! A test case reports through a [`CaseRecorder`]; the harness only reads
//! the accumulated report after the case completes. [`HeartbeatRecorder`]
//! wraps any recorder so that every recorded event also signals a
//! rate-limited heartbeat - the forwarded methods are enumerated
//! explicitly, there is no interception by reflection.

use crate::limiter::RateLimiter;
use crate::protocol::TestStatus;

/// Read-only outcome of one test case.
#[derive(Debug, Clone)]
pub struct CaseReport {
    pub status: TestStatus,
    pub duration_ms: f64,
    pub logs: Vec<String>,
}

/// Recorder interface a test case reports through while running.
pub trait CaseRecorder: Send {
    /// The case has begun executing.
    fn case_started(&mut self);
    /// Append one log entry.
    fn log(&mut self, message: &str);
    /// Record the final status and elapsed wall time.
    fn finish(&mut self, status: TestStatus, duration_ms: f64);
}

/// Recorder that buffers everything into a [`CaseReport`].
#[derive(Debug, Default)]
pub struct BufferRecorder {
    status: TestStatus,
    duration_ms: f64,
    logs: Vec<String>,
}

impl BufferRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the recorder into its report.
    pub fn into_report(self) -> CaseReport {
        CaseReport {
            status: self.status,
            duration_ms: self.duration_ms,
            logs: self.logs,
        }
    }
}

impl CaseRecorder for BufferRecorder {
    fn case_started(&mut self) {}

    fn log(&mut self, message: &str) {
        self.logs.push(message.to_string());
    }

    fn finish(&mut self, status: TestStatus, duration_ms: f64) {
        self.status = status;
        self.duration_ms = duration_ms;
    }
}

/// Decorator that signals a heartbeat before forwarding each recorder
/// call to the wrapped recorder.
///
/// The caller keeps a clone of the limiter to `start`/`stop` it around
/// the case's execution; the decorator only ever `invoke`s.
pub struct HeartbeatRecorder<R> {
    inner: R,
    heartbeat: RateLimiter<()>,
}

impl<R: CaseRecorder> HeartbeatRecorder<R> {
    pub fn new(inner: R, heartbeat: RateLimiter<()>) -> Self {
        Self { inner, heartbeat }
    }

    /// Unwrap the decorated recorder.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: CaseRecorder> CaseRecorder for HeartbeatRecorder<R> {
    fn case_started(&mut self) {
        self.heartbeat.invoke(());
        self.inner.case_started();
    }

    fn log(&mut self, message: &str) {
        self.heartbeat.invoke(());
        self.inner.log(message);
    }

    fn finish(&mut self, status: TestStatus, duration_ms: f64) {
        self.heartbeat.invoke(());
        self.inner.finish(status, duration_ms);
    }
}
