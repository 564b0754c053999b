// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Demo origin offering two attachable events.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use waitset::{Trigger, TriggerIdentity, WaitSet};

/// Events an [`EventSource`] can attach to a WaitSet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEvent {
    PerformedAction,
    Activate,
}

/// Origin whose two events can each be attached to a WaitSet.
#[derive(Default)]
pub struct EventSource {
    activation_code: AtomicI64,
    has_performed_action: AtomicBool,
    is_activated: AtomicBool,
    action_trigger: Mutex<Option<Trigger>>,
    activate_trigger: Mutex<Option<Trigger>>,
}

impl EventSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fires ACTIVATE.
    pub fn activate(&self, activation_code: i64) {
        self.activation_code.store(activation_code, Ordering::Release);
        self.is_activated.store(true, Ordering::Release);
        Self::fire(&self.activate_trigger);
    }

    /// Fires PERFORMED_ACTION.
    pub fn perform_action(&self) {
        self.has_performed_action.store(true, Ordering::Release);
        Self::fire(&self.action_trigger);
    }

    pub fn activation_code(&self) -> i64 {
        self.activation_code.load(Ordering::Acquire)
    }

    pub fn has_performed_action(&self) -> bool {
        self.has_performed_action.load(Ordering::Acquire)
    }

    pub fn is_activated(&self) -> bool {
        self.is_activated.load(Ordering::Acquire)
    }

    /// Clear both events.
    pub fn reset(&self) {
        self.has_performed_action.store(false, Ordering::Release);
        self.is_activated.store(false, Ordering::Release);
    }

    /// Attach one event under `trigger_id`, keeping the returned trigger.
    pub fn attach_to_waitset(
        self: &Arc<Self>,
        waitset: &WaitSet,
        event: SourceEvent,
        trigger_id: u64,
        callback: Option<fn(&EventSource)>,
    ) -> waitset::Result<()> {
        let (predicate, slot): (fn(&EventSource) -> bool, _) = match event {
            SourceEvent::PerformedAction => {
                (EventSource::has_performed_action, &self.action_trigger)
            }
            SourceEvent::Activate => (EventSource::is_activated, &self.activate_trigger),
        };

        let trigger = waitset.attach(
            self,
            predicate,
            EventSource::unset_trigger,
            trigger_id,
            callback,
        )?;
        let previous = slot.lock().replace(trigger);
        drop(previous);
        Ok(())
    }

    pub fn call_on_action(_source: &EventSource) {
        println!("action performed");
    }

    // Called by the WaitSet when it goes away before we detached.
    fn unset_trigger(&self, identity: TriggerIdentity) {
        for slot in [&self.action_trigger, &self.activate_trigger] {
            let mut guard = slot.lock();
            if guard
                .as_ref()
                .is_some_and(|trigger| trigger.is_logical_equal_to(&identity))
            {
                let stale = guard.take();
                drop(guard);
                drop(stale);
                return;
            }
        }
    }

    fn fire(slot: &Mutex<Option<Trigger>>) {
        if let Some(trigger) = slot.lock().as_ref() {
            trigger.trigger();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_source_events_are_independent() {
        let ws = WaitSet::new();
        let source = EventSource::new();
        source
            .attach_to_waitset(&ws, SourceEvent::Activate, 0, None)
            .expect("attach activate");
        source
            .attach_to_waitset(&ws, SourceEvent::PerformedAction, 1, None)
            .expect("attach action");

        source.perform_action();
        let ready = ws.timed_wait(Duration::from_secs(1));
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].trigger_id(), 1);

        source.reset();
        source.activate(7);
        let ready = ws.timed_wait(Duration::from_secs(1));
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].trigger_id(), 0);
        assert_eq!(
            ready[0]
                .origin::<EventSource>()
                .map(EventSource::activation_code),
            Some(7)
        );
    }

    #[test]
    fn test_source_unsets_triggers_on_waitset_drop() {
        let ws = WaitSet::new();
        let source = EventSource::new();
        source
            .attach_to_waitset(&ws, SourceEvent::Activate, 0, None)
            .expect("attach activate");
        source
            .attach_to_waitset(&ws, SourceEvent::PerformedAction, 1, None)
            .expect("attach action");

        drop(ws);
        assert!(source.activate_trigger.lock().is_none());
        assert!(source.action_trigger.lock().is_none());

        // Safe to keep producing without a WaitSet
        source.activate(1);
        source.perform_action();
    }
}
