// SPDX-FileCopyrightText: 2026 The cts-harness Authors
// SPDX-License-Identifier: Apache-2.0

//! Log payload splitting.
//!
//! The host-side websocket stack rejects payloads larger than 72 638
//! bytes, so accumulated log text is split into pieces of at most
//! [`LOGS_MAX_BYTES`] before being sent as individual `TEST_LOG` messages.
//!
//! Sizes are measured in UTF-8 bytes but splits happen at character
//! midpoints, never inside a multi-byte sequence. For non-ASCII text that
//! can take more than one pass per oversized piece, so splitting iterates
//! to a fixed point rather than cutting greedily at the byte budget.

/// Maximum UTF-8 byte size of one log payload, kept a bit under the
/// host's 72 638-byte ceiling.
pub const LOGS_MAX_BYTES: usize = 72_000;

/// Split `full_logs` into in-order pieces of at most [`LOGS_MAX_BYTES`]
/// bytes each. Concatenating the pieces reconstructs the input exactly.
pub fn split_logs_for_payload(full_logs: &str) -> Vec<String> {
    split_logs_with_budget(full_logs, LOGS_MAX_BYTES)
}

/// Split `full_logs` against an explicit byte budget.
///
/// Every piece over budget is halved at its character midpoint until a
/// full pass over the pieces changes nothing. A single character whose
/// own encoding exceeds the budget is an unsplittable residual and is
/// passed through as-is.
pub fn split_logs_with_budget(full_logs: &str, max_bytes: usize) -> Vec<String> {
    let mut pieces: Vec<String> = vec![full_logs.to_string()];
    loop {
        let mut next = Vec::with_capacity(pieces.len());
        let mut changed = false;
        for piece in &pieces {
            let char_count = piece.chars().count();
            if piece.len() > max_bytes && char_count > 1 {
                let midpoint = char_count / 2;
                let byte_midpoint = piece
                    .char_indices()
                    .nth(midpoint)
                    .map(|(index, _)| index)
                    .unwrap_or(piece.len());
                let (head, tail) = piece.split_at(byte_midpoint);
                next.push(head.to_string());
                next.push(tail.to_string());
                changed = true;
            } else {
                next.push(piece.clone());
            }
        }
        if !changed {
            break;
        }
        pieces = next;
    }
    pieces
}
