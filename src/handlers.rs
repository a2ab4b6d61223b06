// SPDX-FileCopyrightText: 2026 The cts-harness Authors
// SPDX-License-Identifier: Apache-2.0

//! HTTP and WebSocket handlers for the harness service.
//!
//! The host process connects to `/ws` and submits run requests as JSON
//! text frames; every outbound protocol message goes back over the same
//! socket, one JSON object per text frame. Runs execute one at a time per
//! socket. Malformed frames are logged and skipped - validating queries
//! is the sender's responsibility.

use crate::config::Config;
use crate::protocol::{OutboundMessage, RunRequest};
use crate::session::SessionDriver;
use crate::suite::TestSuite;
use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
    Json,
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Shared application state.
pub struct AppState {
    pub suite: Arc<dyn TestSuite>,
    pub config: Config,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "cts-harness",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// WebSocket upgrade endpoint.
pub async fn ws_upgrade(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one host connection until it closes.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    info!("host connected");
    let (mut sink, mut stream) = socket.split();

    // Single writer task drains the outbound channel into text frames, so
    // the socket is only ever written from one place.
    let (outbound, mut rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let writer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let text = match serde_json::to_string(&message) {
                Ok(text) => text,
                Err(err) => {
                    warn!(%err, "failed to serialize outbound message");
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let driver = SessionDriver::new(outbound, &state.config);
    while let Some(Ok(frame)) = stream.next().await {
        let text = match frame {
            Message::Text(text) => text,
            Message::Close(_) => break,
            other => {
                debug!(?other, "ignoring non-text frame");
                continue;
            }
        };
        let request: RunRequest = match parse_request(&text) {
            Ok(request) => request,
            Err(err) => {
                warn!(%err, "ignoring inbound frame");
                continue;
            }
        };
        info!(query = %request.q, use_worker = request.w, "run request received");
        if let Err(err) = driver
            .run_query(state.suite.as_ref(), &request.q, request.w)
            .await
        {
            warn!(%err, "test run aborted");
            break;
        }
    }

    writer.abort();
    info!("host disconnected");
}

fn parse_request(text: &str) -> Result<RunRequest, crate::error::HarnessError> {
    Ok(serde_json::from_str(text)?)
}
