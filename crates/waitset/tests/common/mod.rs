// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared test origin: one object exposing two independently attachable events.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use waitset::{Trigger, TriggerIdentity, WaitSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    First,
    Second,
}

#[derive(Default)]
pub struct TwoEvents {
    first: AtomicBool,
    second: AtomicBool,
    first_trigger: Mutex<Option<Trigger>>,
    second_trigger: Mutex<Option<Trigger>>,
    pub invalidations: AtomicUsize,
    pub callbacks: AtomicUsize,
    pub predicate_calls: AtomicUsize,
}

impl TwoEvents {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn attach(
        self: &Arc<Self>,
        ws: &WaitSet,
        event: Event,
        id: u64,
        callback: Option<fn(&TwoEvents)>,
    ) -> waitset::Result<()> {
        match event {
            Event::First => {
                let trigger =
                    ws.attach(self, TwoEvents::first_set, TwoEvents::unset_trigger, id, callback)?;
                *self.first_trigger.lock() = Some(trigger);
            }
            Event::Second => {
                let trigger = ws.attach(
                    self,
                    TwoEvents::second_set,
                    TwoEvents::unset_trigger,
                    id,
                    callback,
                )?;
                *self.second_trigger.lock() = Some(trigger);
            }
        }
        Ok(())
    }

    /// Raise the flag without signalling.
    pub fn set(&self, event: Event) {
        self.flag(event).store(true, Ordering::Release);
    }

    /// Raise the flag and signal the WaitSet.
    pub fn fire(&self, event: Event) {
        self.set(event);
        self.signal(event);
    }

    pub fn signal(&self, event: Event) {
        if let Some(trigger) = self.slot(event).lock().as_ref() {
            trigger.trigger();
        }
    }

    pub fn reset(&self) {
        self.first.store(false, Ordering::Release);
        self.second.store(false, Ordering::Release);
    }

    pub fn has_trigger(&self, event: Event) -> bool {
        self.slot(event).lock().is_some()
    }

    pub fn identity(&self, event: Event) -> Option<TriggerIdentity> {
        self.slot(event).lock().as_ref().map(Trigger::identity)
    }

    pub fn take_trigger(&self, event: Event) -> Option<Trigger> {
        self.slot(event).lock().take()
    }

    pub fn count_callback(origin: &TwoEvents) {
        origin.callbacks.fetch_add(1, Ordering::SeqCst);
    }

    fn first_set(&self) -> bool {
        self.predicate_calls.fetch_add(1, Ordering::SeqCst);
        self.first.load(Ordering::Acquire)
    }

    fn second_set(&self) -> bool {
        self.predicate_calls.fetch_add(1, Ordering::SeqCst);
        self.second.load(Ordering::Acquire)
    }

    fn unset_trigger(&self, identity: TriggerIdentity) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        for event in [Event::First, Event::Second] {
            let stale = {
                let mut slot = self.slot(event).lock();
                if slot
                    .as_ref()
                    .is_some_and(|trigger| trigger.is_logical_equal_to(&identity))
                {
                    slot.take()
                } else {
                    None
                }
            };
            if stale.is_some() {
                drop(stale);
                return;
            }
        }
    }

    fn flag(&self, event: Event) -> &AtomicBool {
        match event {
            Event::First => &self.first,
            Event::Second => &self.second,
        }
    }

    fn slot(&self, event: Event) -> &Mutex<Option<Trigger>> {
        match event {
            Event::First => &self.first_trigger,
            Event::Second => &self.second_trigger,
        }
    }
}
