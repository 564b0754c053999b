// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! UserTrigger - application-controlled origin
//!
//! The readiness of a [`UserTrigger`] is entirely under the control of the
//! application, which makes it handy for shutdown requests or for waking a
//! waiter on behalf of something that is not an origin itself.

use crate::error::Result;
use crate::trigger::{Trigger, TriggerIdentity};
use crate::waitset::WaitSet;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Manually-triggered origin.
pub struct UserTrigger {
    triggered: AtomicBool,
    trigger: Mutex<Option<Trigger>>,
}

impl UserTrigger {
    /// Create a new, untriggered and unattached user trigger.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            triggered: AtomicBool::new(false),
            trigger: Mutex::new(None),
        })
    }

    /// Attach to `waitset` under `trigger_id`.
    ///
    /// Re-attaching replaces (and detaches) the previous registration.
    pub fn attach_to(
        self: &Arc<Self>,
        waitset: &WaitSet,
        trigger_id: u64,
        callback: Option<fn(&UserTrigger)>,
    ) -> Result<()> {
        let trigger = waitset.attach(
            self,
            UserTrigger::has_triggered,
            UserTrigger::invalidate_trigger,
            trigger_id,
            callback,
        )?;

        let previous = self.trigger.lock().replace(trigger);
        drop(previous);
        Ok(())
    }

    /// Set the trigger and wake the attached WaitSet.
    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::Release);
        if let Some(trigger) = self.trigger.lock().as_ref() {
            trigger.trigger();
        }
    }

    /// Current trigger state.
    #[must_use]
    pub fn has_triggered(&self) -> bool {
        self.triggered.load(Ordering::Acquire)
    }

    /// Clear the trigger state.
    pub fn reset(&self) {
        self.triggered.store(false, Ordering::Release);
    }

    /// `true` while attached to a live WaitSet.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.trigger.lock().as_ref().is_some_and(Trigger::is_valid)
    }

    /// Detach from the WaitSet, if attached.
    pub fn detach(&self) {
        let trigger = self.trigger.lock().take();
        drop(trigger);
    }

    fn invalidate_trigger(&self, identity: TriggerIdentity) {
        let stale = {
            let mut slot = self.trigger.lock();
            if slot
                .as_ref()
                .is_some_and(|trigger| trigger.is_logical_equal_to(&identity))
            {
                slot.take()
            } else {
                None
            }
        };
        drop(stale);
    }
}
