// SPDX-FileCopyrightText: 2026 The cts-harness Authors
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the conformance test harness.

use async_trait::async_trait;
use cts_harness::{
    config::Config,
    protocol::{OutboundMessage, TestStatus},
    recorder::CaseRecorder,
    session::SessionDriver,
    suite::{StaticSuite, TestCase},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_test::assert_ok;

struct ScriptedCase {
    query: &'static str,
    status: TestStatus,
    delay_ms: u64,
    log: String,
}

#[async_trait]
impl TestCase for ScriptedCase {
    fn query(&self) -> &str {
        self.query
    }

    async fn run(&self, recorder: &mut dyn CaseRecorder, _use_worker: bool) -> TestStatus {
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        if !self.log.is_empty() {
            recorder.log(&self.log);
        }
        self.status
    }
}

fn cts_like_suite() -> StaticSuite {
    let mut suite = StaticSuite::new();
    for (query, status, delay_ms, log) in [
        (
            "webgpu:api,operation,command_buffer:empty:",
            TestStatus::Pass,
            10,
            "",
        ),
        (
            "webgpu:api,operation,render_pass:clear:",
            TestStatus::Fail,
            10,
            "EXPECTATION FAILED: cleared to wrong color",
        ),
        (
            "webgpu:api,validation,buffer:size:",
            TestStatus::Skip,
            10,
            "",
        ),
    ] {
        suite.register(Arc::new(ScriptedCase {
            query,
            status,
            delay_ms,
            log: log.to_string(),
        }));
    }
    suite
}

fn drain(rx: &mut mpsc::UnboundedReceiver<OutboundMessage>) -> Vec<OutboundMessage> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}

#[tokio::test(start_paused = true)]
async fn wildcard_run_emits_one_pair_per_matched_case_in_order() {
    let suite = cts_like_suite();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let driver = SessionDriver::new(tx, &Config::default());

    assert_ok!(driver.run_query(&suite, "webgpu:api,operation,*", false).await);

    let messages = drain(&mut rx);

    // Two matched cases, each with the full STARTED..FINISHED sequence.
    let statuses: Vec<TestStatus> = messages
        .iter()
        .filter_map(|m| match m {
            OutboundMessage::TestStatus { status, .. } => Some(*status),
            _ => None,
        })
        .collect();
    assert_eq!(statuses, vec![TestStatus::Pass, TestStatus::Fail]);

    let starts = messages
        .iter()
        .filter(|m| **m == OutboundMessage::TestStarted)
        .count();
    let finishes = messages
        .iter()
        .filter(|m| **m == OutboundMessage::TestFinished)
        .count();
    assert_eq!((starts, finishes), (2, 2));

    // Per-case ordering: STARTED, STATUS, LOG+, FINISHED, then the next
    // case's STARTED. Heartbeats are absent for these sub-interval cases.
    let mut expecting_start = true;
    for message in &messages {
        match message {
            OutboundMessage::TestStarted => {
                assert!(expecting_start, "STARTED before previous case FINISHED");
                expecting_start = false;
            }
            OutboundMessage::TestFinished => {
                expecting_start = true;
            }
            OutboundMessage::TestHeartbeat => panic!("unexpected heartbeat: {messages:?}"),
            _ => {}
        }
    }
    assert!(expecting_start, "run ended mid-case");
}

#[tokio::test(start_paused = true)]
async fn unmatched_query_emits_nothing() {
    let suite = cts_like_suite();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let driver = SessionDriver::new(tx, &Config::default());

    assert_ok!(driver.run_query(&suite, "webgpu:shader,*", false).await);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn sequential_runs_share_one_channel_without_interleaving() {
    let suite = cts_like_suite();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let driver = SessionDriver::new(tx, &Config::default());

    assert_ok!(
        driver
            .run_query(&suite, "webgpu:api,validation,buffer:size:", false)
            .await
    );
    assert_ok!(
        driver
            .run_query(&suite, "webgpu:api,operation,command_buffer:empty:", false)
            .await
    );

    let messages = drain(&mut rx);
    let statuses: Vec<TestStatus> = messages
        .iter()
        .filter_map(|m| match m {
            OutboundMessage::TestStatus { status, .. } => Some(*status),
            _ => None,
        })
        .collect();
    assert_eq!(statuses, vec![TestStatus::Skip, TestStatus::Pass]);
}

#[tokio::test(start_paused = true)]
async fn heartbeat_interval_is_configurable() {
    let mut suite = StaticSuite::new();
    suite.register(Arc::new(ScriptedCase {
        query: "webgpu:api,operation,slow:one:",
        status: TestStatus::Pass,
        delay_ms: 350,
        log: String::new(),
    }));

    let mut config = Config::default();
    config.heartbeat.interval_ms = 100;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let driver = SessionDriver::new(tx, &config);

    assert_ok!(driver.run_query(&suite, "*", false).await);

    let heartbeats = drain(&mut rx)
        .iter()
        .filter(|m| **m == OutboundMessage::TestHeartbeat)
        .count();
    assert_eq!(heartbeats, 3, "350ms case at 100ms period ticks at 100/200/300");
}

#[tokio::test(start_paused = true)]
async fn every_outbound_frame_fits_the_payload_ceiling() {
    // The host-side websocket stack hard-rejects payloads over 72 638
    // bytes; serialized frames must stay under it even with JSON framing
    // and escaping overhead around the log fragments.
    let mut suite = StaticSuite::new();
    suite.register(Arc::new(ScriptedCase {
        query: "webgpu:api,operation,verbose:one:",
        status: TestStatus::Fail,
        delay_ms: 1,
        log: "x".repeat(150_000),
    }));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let driver = SessionDriver::new(tx, &Config::default());
    assert_ok!(driver.run_query(&suite, "*", false).await);

    for message in drain(&mut rx) {
        let frame = serde_json::to_string(&message).unwrap();
        assert!(frame.len() <= 72_638, "frame over host ceiling: {} bytes", frame.len());
    }
}
