// SPDX-FileCopyrightText: 2026 The cts-harness Authors
// SPDX-License-Identifier: Apache-2.0

//! Wire protocol between the harness and the host process.
//!
//! One JSON object per websocket message. Per test case the outbound
//! sequence is fixed: `TEST_STARTED`, zero or more `TEST_HEARTBEAT`,
//! `TEST_STATUS`, one or more `TEST_LOG` fragments, `TEST_FINISHED`.
//! The host never has to guess whether a case is still running: either a
//! heartbeat arrives or the sequence completes.

use serde::{Deserialize, Serialize};

/// Inbound run request: `{"q": <query string>, "w": <use worker>}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RunRequest {
    /// Test case filter query, e.g. `webgpu:api,operation,*`
    pub q: String,
    /// Execute cases on the worker path
    #[serde(default)]
    pub w: bool,
}

/// Final status of one test case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    Skip,
    Warn,
    #[default]
    NotRun,
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Fail => write!(f, "fail"),
            Self::Skip => write!(f, "skip"),
            Self::Warn => write!(f, "warn"),
            Self::NotRun => write!(f, "notrun"),
        }
    }
}

/// Outbound message, tagged by `type`.
///
/// `js_duration_ms` keeps the field name the host-side runner expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    #[serde(rename = "TEST_STARTED")]
    TestStarted,
    #[serde(rename = "TEST_HEARTBEAT")]
    TestHeartbeat,
    #[serde(rename = "TEST_STATUS")]
    TestStatus {
        status: TestStatus,
        js_duration_ms: f64,
    },
    #[serde(rename = "TEST_LOG")]
    TestLog { log: String },
    #[serde(rename = "TEST_FINISHED")]
    TestFinished,
}
