// SPDX-FileCopyrightText: 2026 The cts-harness Authors
// SPDX-License-Identifier: Apache-2.0

//! Conformance Test Session Harness
//!
//! Serves the WebSocket protocol a host process drives test runs through:
//!
//! - `GET /health`: liveness probe
//! - `GET /ws`: persistent socket; inbound `{"q": <query>, "w": <bool>}`
//!   run requests, outbound STARTED/HEARTBEAT/STATUS/LOG/FINISHED
//!   messages, one JSON object per frame
//!
//! The binary registers a small built-in smoke suite so the protocol can
//! be exercised end to end without the external test engine.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 127.0.0.1:8080)
//! - `HEARTBEAT_INTERVAL_MS`: Heartbeat period in milliseconds (default: 500)
//! - `LOGS_MAX_BYTES`: Per-message log payload budget (default: 72000)

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use async_trait::async_trait;
use cts_harness::{
    config::Config,
    handlers::{health, ws_upgrade, AppState},
    protocol::TestStatus,
    recorder::CaseRecorder,
    suite::{StaticSuite, TestCase},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        heartbeat_interval_ms = config.heartbeat.interval_ms,
        logs_max_bytes = config.payload.logs_max_bytes,
        "Starting conformance test harness"
    );

    // Create application state
    let state = Arc::new(AppState {
        suite: Arc::new(smoke_suite()),
        config: config.clone(),
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ws", get(ws_upgrade))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    Config {
        bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
        heartbeat: cts_harness::config::HeartbeatConfig {
            interval_ms: std::env::var("HEARTBEAT_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
        },
        payload: cts_harness::config::PayloadConfig {
            logs_max_bytes: std::env::var("LOGS_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(cts_harness::payload::LOGS_MAX_BYTES),
        },
    }
}

/// A fixed-outcome smoke case: optional delay, optional log lines.
struct SmokeCase {
    query: &'static str,
    status: TestStatus,
    delay: Duration,
    logs: &'static [&'static str],
}

#[async_trait]
impl TestCase for SmokeCase {
    fn query(&self) -> &str {
        self.query
    }

    async fn run(&self, recorder: &mut dyn CaseRecorder, _use_worker: bool) -> TestStatus {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        for log in self.logs {
            recorder.log(log);
        }
        self.status
    }
}

/// Built-in smoke suite exercising each protocol shape: a plain pass, a
/// skip, a failure with log output, and a slow case that outlives the
/// heartbeat interval.
fn smoke_suite() -> StaticSuite {
    let mut suite = StaticSuite::new();
    suite.register(Arc::new(SmokeCase {
        query: "harness:smoke,basic:pass:",
        status: TestStatus::Pass,
        delay: Duration::ZERO,
        logs: &[],
    }));
    suite.register(Arc::new(SmokeCase {
        query: "harness:smoke,basic:skip:",
        status: TestStatus::Skip,
        delay: Duration::ZERO,
        logs: &["skipped: no adapter available"],
    }));
    suite.register(Arc::new(SmokeCase {
        query: "harness:smoke,basic:fail:",
        status: TestStatus::Fail,
        delay: Duration::ZERO,
        logs: &["EXPECTATION FAILED: smoke failure, as requested"],
    }));
    suite.register(Arc::new(SmokeCase {
        query: "harness:smoke,timing:slow:",
        status: TestStatus::Pass,
        delay: Duration::from_millis(1200),
        logs: &["slept past two heartbeat intervals"],
    }));
    suite
}
