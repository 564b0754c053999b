// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Trigger - an origin's handle on one WaitSet registration
//!
//! A [`Trigger`] is returned by [`crate::WaitSet::attach`] and is meant to be
//! stored inside the origin it was attached for. The origin fires it whenever
//! the attached event happens; the WaitSet then re-evaluates every predicate.
//!
//! The handle only holds a weak reference to the WaitSet and a
//! generation-checked slot key. Once the WaitSet is gone, or the registration
//! has been detached, every operation degrades to a no-op instead of touching
//! released state.

use crate::rt::SlotKey;
use crate::waitset::WaitSetInner;
use std::fmt;
use std::sync::Weak;

/// Identity of one registration.
///
/// Two triggers are logically equal iff their identities are equal: same
/// WaitSet, same slot, same generation. An origin holding several triggers
/// compares the identity passed to its invalidation callback against each of
/// them to find the one that became invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerIdentity {
    waitset: u64,
    key: SlotKey,
}

impl TriggerIdentity {
    pub(crate) fn new(waitset: u64, key: SlotKey) -> Self {
        Self { waitset, key }
    }

    pub(crate) fn waitset(&self) -> u64 {
        self.waitset
    }

    pub(crate) fn key(&self) -> SlotKey {
        self.key
    }
}

impl fmt::Display for TriggerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ws{}/slot{}#{}",
            self.waitset, self.key.index, self.key.generation
        )
    }
}

/// Registration handle owned by an origin.
///
/// Dropping the trigger detaches it from its WaitSet.
pub struct Trigger {
    waitset: Weak<WaitSetInner>,
    identity: TriggerIdentity,
    trigger_id: u64,
}

impl Trigger {
    pub(crate) fn new(waitset: Weak<WaitSetInner>, identity: TriggerIdentity, trigger_id: u64) -> Self {
        Self {
            waitset,
            identity,
            trigger_id,
        }
    }

    /// Tell the WaitSet that the attached event may have become active.
    ///
    /// The signal carries no payload: a blocked `wait()` simply re-evaluates
    /// every predicate. Never blocks; no-op once the WaitSet is gone.
    pub fn trigger(&self) {
        if let Some(inner) = self.waitset.upgrade() {
            inner.notify();
        }
    }

    /// Evaluate the attached predicate right now.
    ///
    /// Returns `false` for an invalid trigger. Must not be called from inside
    /// a predicate.
    #[must_use]
    pub fn has_triggered(&self) -> bool {
        self.waitset
            .upgrade()
            .is_some_and(|inner| inner.evaluate(self.identity.key()))
    }

    /// `true` while the registration is still attached to a live WaitSet.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.waitset
            .upgrade()
            .is_some_and(|inner| inner.is_attached(self.identity.key()))
    }

    /// Logical group id given at attach time.
    #[must_use]
    pub fn trigger_id(&self) -> u64 {
        self.trigger_id
    }

    /// Identity of this registration.
    #[must_use]
    pub fn identity(&self) -> TriggerIdentity {
        self.identity
    }

    /// Whether `identity` designates this very registration.
    #[must_use]
    pub fn is_logical_equal_to(&self, identity: &TriggerIdentity) -> bool {
        self.identity == *identity
    }

    /// Detach from the WaitSet and become invalid. Idempotent.
    pub fn reset(&mut self) {
        if let Some(inner) = self.waitset.upgrade() {
            inner.detach(self.identity.key());
        }
        self.waitset = Weak::new();
    }

    /// Consume the trigger, detaching it.
    pub fn detach(self) {
        drop(self);
    }
}

impl Drop for Trigger {
    fn drop(&mut self) {
        self.reset();
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("trigger_id", &self.trigger_id)
            .field("identity", &self.identity)
            .finish()
    }
}
