// SPDX-FileCopyrightText: 2026 The cts-harness Authors
// SPDX-License-Identifier: Apache-2.0

//! Configuration for the conformance test harness.
//!
//! Defaults match the host-side runner: a 500 ms heartbeat period and a
//! 72 000-byte log payload budget (the host's websocket stack rejects
//! payloads above 72 638 bytes).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the harness service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 127.0.0.1:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Heartbeat configuration
    #[serde(default)]
    pub heartbeat: HeartbeatConfig,

    /// Outbound payload configuration
    #[serde(default)]
    pub payload: PayloadConfig,
}

/// Heartbeat configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatConfig {
    /// Heartbeat period while a test case executes, in milliseconds
    /// (default: 500)
    #[serde(default = "default_heartbeat_interval_ms")]
    pub interval_ms: u64,
}

/// Outbound payload configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadConfig {
    /// Maximum UTF-8 byte size of a single log payload (default: 72000)
    #[serde(default = "default_logs_max_bytes")]
    pub logs_max_bytes: usize,
}

// Default value functions
fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_heartbeat_interval_ms() -> u64 {
    500
}

fn default_logs_max_bytes() -> usize {
    crate::payload::LOGS_MAX_BYTES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            heartbeat: HeartbeatConfig::default(),
            payload: PayloadConfig::default(),
        }
    }
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_heartbeat_interval_ms(),
        }
    }
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            logs_max_bytes: default_logs_max_bytes(),
        }
    }
}

impl HeartbeatConfig {
    /// Get the heartbeat period
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
