// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Coalescing wakeup primitive.
//!
//! A notification carries no payload and no count: it only bumps an epoch so
//! that a sleeper which sampled an older epoch returns. Waiters sample the
//! epoch *before* evaluating readiness, so a notification racing with the
//! evaluation is never lost.

use parking_lot::{Condvar, Mutex};
use std::time::Instant;

/// Result of [`Notifier::wait_past`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WakeOutcome {
    /// The epoch moved past the sampled value.
    Notified,
    /// The deadline elapsed without a notification.
    TimedOut,
}

struct State {
    epoch: u64,
    sleepers: usize,
}

pub(crate) struct Notifier {
    state: Mutex<State>,
    cond: Condvar,
}

impl Notifier {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(State {
                epoch: 0,
                sleepers: 0,
            }),
            cond: Condvar::new(),
        }
    }

    /// Current epoch. Sample this before checking readiness.
    pub(crate) fn epoch(&self) -> u64 {
        self.state.lock().epoch
    }

    /// Signal that readiness may have changed.
    ///
    /// Never sleeps: only the short state lock is taken, and the condvar is
    /// only poked when somebody is actually parked.
    pub(crate) fn notify(&self) {
        let wake = {
            let mut state = self.state.lock();
            state.epoch = state.epoch.wrapping_add(1);
            state.sleepers > 0
        };
        if wake {
            self.cond.notify_all();
        }
    }

    /// Block until the epoch differs from `seen` or `deadline` passes.
    pub(crate) fn wait_past(&self, seen: u64, deadline: Option<Instant>) -> WakeOutcome {
        let mut state = self.state.lock();
        if state.epoch != seen {
            return WakeOutcome::Notified;
        }

        state.sleepers += 1;
        let outcome = loop {
            match deadline {
                Some(deadline) => {
                    let timed_out = self.cond.wait_until(&mut state, deadline).timed_out();
                    if state.epoch != seen {
                        break WakeOutcome::Notified;
                    }
                    if timed_out {
                        break WakeOutcome::TimedOut;
                    }
                }
                None => {
                    self.cond.wait(&mut state);
                    if state.epoch != seen {
                        break WakeOutcome::Notified;
                    }
                }
            }
        };
        state.sleepers -= 1;
        outcome
    }
}
