// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-wait record of a ready trigger.

use crate::trigger::TriggerIdentity;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Type-erased origin as seen by the WaitSet.
pub type Origin = dyn Any + Send + Sync;

pub(crate) type ErasedCallback = Arc<dyn Fn(&Origin) + Send + Sync>;

/// What fired, who fired it, and what to run about it.
///
/// Produced by [`crate::WaitSet::wait`] for every trigger whose predicate was
/// true during the evaluation pass. The snapshot keeps the origin alive until
/// it is dropped, so handle it and let it go; it is not meant to be retained
/// across wait calls.
pub struct TriggerSnapshot {
    trigger_id: u64,
    identity: TriggerIdentity,
    origin: Arc<Origin>,
    callback: Option<ErasedCallback>,
}

impl TriggerSnapshot {
    pub(crate) fn new(
        trigger_id: u64,
        identity: TriggerIdentity,
        origin: Arc<Origin>,
        callback: Option<ErasedCallback>,
    ) -> Self {
        Self {
            trigger_id,
            identity,
            origin,
            callback,
        }
    }

    /// Logical group id given at attach time.
    #[must_use]
    pub fn trigger_id(&self) -> u64 {
        self.trigger_id
    }

    /// Identity of the registration that fired.
    #[must_use]
    pub fn identity(&self) -> TriggerIdentity {
        self.identity
    }

    /// Borrow the origin as `T`, if that is its concrete type.
    #[must_use]
    pub fn origin<T: Any>(&self) -> Option<&T> {
        self.origin.downcast_ref::<T>()
    }

    /// Shared handle on the origin as `T`, if that is its concrete type.
    #[must_use]
    pub fn origin_arc<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.origin).downcast::<T>().ok()
    }

    /// Whether this snapshot was produced by `candidate`.
    #[must_use]
    pub fn does_originate_from<T: Any>(&self, candidate: &T) -> bool {
        self.origin::<T>()
            .is_some_and(|origin| std::ptr::eq(origin, candidate))
    }

    /// Whether a callback was attached.
    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Run the attached callback with the origin.
    ///
    /// Returns `false` when no callback was attached.
    pub fn call(&self) -> bool {
        match &self.callback {
            Some(callback) => {
                callback(&*self.origin);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for TriggerSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerSnapshot")
            .field("trigger_id", &self.trigger_id)
            .field("identity", &self.identity)
            .field("has_callback", &self.callback.is_some())
            .finish_non_exhaustive()
    }
}
