// SPDX-FileCopyrightText: 2026 The cts-harness Authors
// SPDX-License-Identifier: Apache-2.0

//! Test session driver.
//!
//! Runs the cases matched by a query strictly sequentially and emits the
//! per-case message protocol through one outbound channel. While a case
//! executes, a periodic timer emits `TEST_HEARTBEAT` so the host can tell
//! progress from a stall; the timer is cancelled on every exit path so a
//! heartbeat can never leak into the next case.
//!
//! The driver has no failure handling of its own: a case that fails still
//! produces the full STARTED..FINISHED sequence, so the host never waits
//! on a case it believes is running.

use crate::config::Config;
use crate::error::HarnessError;
use crate::payload::split_logs_with_budget;
use crate::protocol::OutboundMessage;
use crate::recorder::{BufferRecorder, CaseRecorder};
use crate::suite::{TestCase, TestSuite};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{info, trace};

/// Drives test cases and reports them over one outbound channel.
pub struct SessionDriver {
    outbound: mpsc::UnboundedSender<OutboundMessage>,
    heartbeat_interval: Duration,
    logs_max_bytes: usize,
}

/// Aborts the heartbeat task when dropped, which covers every exit path
/// of the per-case block, panics included.
struct HeartbeatGuard(JoinHandle<()>);

impl Drop for HeartbeatGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl SessionDriver {
    pub fn new(outbound: mpsc::UnboundedSender<OutboundMessage>, config: &Config) -> Self {
        Self {
            outbound,
            heartbeat_interval: config.heartbeat.interval(),
            logs_max_bytes: config.payload.logs_max_bytes,
        }
    }

    /// Run every case matched by `query`, awaiting each case's completion
    /// before starting the next.
    pub async fn run_query(
        &self,
        suite: &dyn TestSuite,
        query: &str,
        use_worker: bool,
    ) -> Result<(), HarnessError> {
        let cases = suite.load(query);
        info!(query, cases = cases.len(), use_worker, "starting test run");
        for case in cases {
            self.run_case(case.as_ref(), use_worker).await?;
        }
        Ok(())
    }

    async fn run_case(&self, case: &dyn TestCase, use_worker: bool) -> Result<(), HarnessError> {
        self.send(OutboundMessage::TestStarted)?;

        let report = {
            let _heartbeat = self.spawn_heartbeat(case.query());
            let mut recorder = BufferRecorder::new();
            recorder.case_started();
            let started = Instant::now();
            let status = case.run(&mut recorder, use_worker).await;
            let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
            recorder.finish(status, duration_ms);
            recorder.into_report()
            // heartbeat guard drops here, before any post-case message
        };

        info!(
            case = case.query(),
            status = %report.status,
            duration_ms = report.duration_ms,
            "case finished"
        );
        self.send(OutboundMessage::TestStatus {
            status: report.status,
            js_duration_ms: report.duration_ms,
        })?;
        for piece in split_logs_with_budget(&report.logs.join("\n\n"), self.logs_max_bytes) {
            self.send(OutboundMessage::TestLog { log: piece })?;
        }
        self.send(OutboundMessage::TestFinished)?;
        Ok(())
    }

    /// Start the periodic heartbeat for one case. The first tick lands a
    /// full interval after the case starts, not immediately.
    fn spawn_heartbeat(&self, case_query: &str) -> HeartbeatGuard {
        let outbound = self.outbound.clone();
        let period = self.heartbeat_interval;
        let case_query = case_query.to_string();
        HeartbeatGuard(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                trace!(case = %case_query, "heartbeat");
                if outbound.send(OutboundMessage::TestHeartbeat).is_err() {
                    break;
                }
            }
        }))
    }

    fn send(&self, message: OutboundMessage) -> Result<(), HarnessError> {
        self.outbound
            .send(message)
            .map_err(|_| HarnessError::ChannelClosed)
    }
}
