// SPDX-FileCopyrightText: 2026 The cts-harness Authors
// SPDX-License-Identifier: Apache-2.0

//! Deferred-firing rate limiter.
//!
//! Throttles an arbitrary side-effecting action to at most one firing per
//! interval. Excess calls are deferred, not dropped outright: if the action
//! fired too recently, one firing is scheduled for when the interval has
//! passed, so the "it eventually runs" guarantee holds.
//!
//! Lifecycle: the limiter is inert until [`RateLimiter::start`] is called,
//! and [`RateLimiter::stop`] disables it again. Stop does not cancel the
//! deferred sleep itself; it bumps a generation counter that the deferred
//! task re-checks before firing, which tolerates timer primitives without
//! reliable cancellation.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

#[derive(Debug)]
struct LimiterState {
    /// Time of the most recent firing. `None` means the limiter is
    /// disabled and `invoke` no-ops.
    last_fire: Option<Instant>,
    /// Whether a deferred firing is currently scheduled. At most one
    /// deferred firing exists at a time.
    pending: bool,
    /// Bumped by `stop()`; a deferred firing only runs if the generation
    /// it captured is still current.
    generation: u64,
}

enum Decision {
    Drop,
    FireNow,
    Defer { delay: Duration, generation: u64 },
}

/// Rate limiter for a single action taking one argument of type `T`.
///
/// One instance per throttled action. Cloning shares the underlying state,
/// so a clone can `start`/`stop` a limiter whose `invoke` side lives
/// elsewhere (e.g. inside a recorder decorator).
pub struct RateLimiter<T> {
    interval: Duration,
    action: Arc<dyn Fn(T) + Send + Sync>,
    state: Arc<Mutex<LimiterState>>,
}

impl<T> Clone for RateLimiter<T> {
    fn clone(&self) -> Self {
        Self {
            interval: self.interval,
            action: Arc::clone(&self.action),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> std::fmt::Debug for RateLimiter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

fn lock(state: &Mutex<LimiterState>) -> std::sync::MutexGuard<'_, LimiterState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T: Send + 'static> RateLimiter<T> {
    /// Create a limiter for `action` with a minimum firing interval.
    ///
    /// The limiter starts disabled; call [`start`](Self::start) to enable.
    pub fn new(interval: Duration, action: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            interval,
            action: Arc::new(action),
            state: Arc::new(Mutex::new(LimiterState {
                last_fire: None,
                pending: false,
                generation: 0,
            })),
        }
    }

    /// Enable the limiter. Resets the interval clock to now; no firing.
    pub fn start(&self) {
        let mut state = lock(&self.state);
        state.last_fire = Some(Instant::now());
    }

    /// Disable the limiter and retroactively invalidate any deferred
    /// firing that is still in flight.
    pub fn stop(&self) {
        let mut state = lock(&self.state);
        state.generation = state.generation.wrapping_add(1);
        state.last_fire = None;
    }

    /// Request a firing of the action with `arg`.
    ///
    /// No-ops if the limiter is disabled or a deferred firing is already
    /// scheduled (the first deferred call's argument is the one that
    /// fires; later arguments are dropped until it resolves). Fires
    /// immediately when the interval has passed since the last firing,
    /// otherwise defers until it has.
    ///
    /// Must be called from within a tokio runtime; a deferred firing is a
    /// spawned sleep task.
    pub fn invoke(&self, arg: T) {
        let now = Instant::now();
        let decision = {
            let mut state = lock(&self.state);
            if state.pending {
                Decision::Drop
            } else if let Some(last) = state.last_fire {
                let elapsed = now.saturating_duration_since(last);
                if elapsed >= self.interval {
                    state.last_fire = Some(now);
                    Decision::FireNow
                } else {
                    state.pending = true;
                    Decision::Defer {
                        // One tick of slack so the re-check lands on the
                        // far side of the interval.
                        delay: self.interval - elapsed + Duration::from_millis(1),
                        generation: state.generation,
                    }
                }
            } else {
                Decision::Drop
            }
        };

        match decision {
            Decision::Drop => {}
            Decision::FireNow => (self.action)(arg),
            Decision::Defer { delay, generation } => {
                trace!(?delay, "deferring rate-limited firing");
                let state = Arc::clone(&self.state);
                let action = Arc::clone(&self.action);
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let fire = {
                        let mut state = lock(&state);
                        state.pending = false;
                        if state.generation == generation {
                            state.last_fire = Some(Instant::now());
                            true
                        } else {
                            false
                        }
                    };
                    if fire {
                        action(arg);
                    }
                });
            }
        }
    }
}
