// SPDX-FileCopyrightText: 2026 The cts-harness Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the conformance test harness.

use thiserror::Error;

/// Harness error types.
///
/// The driver itself performs no validation or recovery; these cover the
/// only failures it can observe directly.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The outbound message channel was closed (the socket writer is gone).
    #[error("outbound message channel closed")]
    ChannelClosed,

    /// An inbound run request failed to parse as JSON.
    #[error("malformed run request: {0}")]
    MalformedRequest(#[from] serde_json::Error),
}
