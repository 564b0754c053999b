// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! WaitSet - block until any attached trigger is ready
//!
//! Origins attach a readiness predicate under a logical id and keep the
//! returned [`Trigger`]. Firing a trigger only signals "something may be ready";
//! `wait()` then evaluates every attached predicate, in attachment order, and
//! returns a [`TriggerSnapshot`] for each one that is true. Readiness is
//! level-triggered: firing N times before a wait yields one snapshot, and a
//! predicate that is never cleared keeps being reported.
//!
//! # Lifetimes
//!
//! The WaitSet only holds weak references to origins, and triggers only hold
//! weak references to the WaitSet, so teardown order does not matter:
//!
//! - an origin dropped first takes its triggers with it (they detach on drop),
//!   and its predicate can never run again because the weak upgrade fails;
//! - a WaitSet dropped first calls every live origin's invalidation callback so
//!   it can clear the stored trigger.
//!
//! # Locking
//!
//! Predicates run under the registration lock. They must be total, cheap, and
//! must not call back into the WaitSet or its triggers. Callbacks (user and
//! invalidation) always run without the lock held.

use crate::config::WaitSetConfig;
use crate::error::{Error, Result};
use crate::rt::{Notifier, SlotKey, SlotTable, WakeOutcome};
use crate::snapshot::{ErasedCallback, Origin, TriggerSnapshot};
use crate::trigger::{Trigger, TriggerIdentity};
use parking_lot::Mutex;
use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

type ErasedPredicate = Box<dyn Fn(&Origin) -> bool + Send + Sync>;
type ErasedInvalidation = Box<dyn Fn(&Origin, TriggerIdentity) + Send + Sync>;

static NEXT_WAITSET_UID: AtomicU64 = AtomicU64::new(1);

/// WaitSet - wait for multiple triggers
///
/// Share it between threads behind an `Arc`; every method takes `&self`.
pub struct WaitSet {
    inner: Arc<WaitSetInner>,
}

struct Registration {
    trigger_id: u64,
    origin: Weak<Origin>,
    predicate: ErasedPredicate,
    on_invalidate: ErasedInvalidation,
    callback: Option<ErasedCallback>,
}

pub(crate) struct WaitSetInner {
    uid: u64,
    registrations: Mutex<SlotTable<Registration>>,
    notifier: Notifier,
}

impl WaitSet {
    /// Create a WaitSet with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::build(WaitSetConfig::default().capacity)
    }

    /// Create a WaitSet holding at most `capacity` triggers.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::from_config(&WaitSetConfig::with_capacity(capacity))
    }

    /// Create a WaitSet from a validated configuration.
    pub fn from_config(config: &WaitSetConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config.capacity))
    }

    fn build(capacity: usize) -> Self {
        let uid = NEXT_WAITSET_UID.fetch_add(1, Ordering::Relaxed);
        log::debug!("[waitset] created uid={} capacity={}", uid, capacity);

        Self {
            inner: Arc::new(WaitSetInner {
                uid,
                registrations: Mutex::new(SlotTable::new(capacity)),
                notifier: Notifier::new(),
            }),
        }
    }

    /// Attach an origin's event.
    ///
    /// - `predicate` answers "is this event currently active?" and must be total.
    /// - `on_invalidate` is called at most once, if this WaitSet is dropped while
    ///   the registration is still attached and the origin is still alive.
    /// - `trigger_id` is a caller-side grouping tag, not required to be unique.
    /// - `callback` is handed back through [`TriggerSnapshot::call`].
    ///
    /// The origin must store the returned [`Trigger`]; dropping it detaches.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExceeded`] when every slot is taken. The WaitSet is
    /// left unchanged.
    pub fn attach<O, P, I>(
        &self,
        origin: &Arc<O>,
        predicate: P,
        on_invalidate: I,
        trigger_id: u64,
        callback: Option<fn(&O)>,
    ) -> Result<Trigger>
    where
        O: Any + Send + Sync,
        P: Fn(&O) -> bool + Send + Sync + 'static,
        I: Fn(&O, TriggerIdentity) + Send + Sync + 'static,
    {
        let weak_origin: Weak<O> = Arc::downgrade(origin);

        let registration = Registration {
            trigger_id,
            origin: weak_origin,
            predicate: Box::new(move |origin: &Origin| {
                origin.downcast_ref::<O>().is_some_and(|o| predicate(o))
            }),
            on_invalidate: Box::new(move |origin: &Origin, identity: TriggerIdentity| {
                if let Some(o) = origin.downcast_ref::<O>() {
                    on_invalidate(o, identity);
                }
            }),
            callback: callback.map(|callback| {
                Arc::new(move |origin: &Origin| {
                    if let Some(o) = origin.downcast_ref::<O>() {
                        callback(o);
                    }
                }) as ErasedCallback
            }),
        };

        let mut registrations = self.inner.registrations.lock();
        let key = match registrations.insert(registration) {
            Ok(key) => key,
            Err(rejected) => {
                let capacity = registrations.capacity();
                drop(registrations);
                drop(rejected);
                log::warn!(
                    "[waitset] attach rejected uid={} trigger_id={}: capacity {} reached",
                    self.inner.uid,
                    trigger_id,
                    capacity
                );
                return Err(Error::CapacityExceeded { capacity });
            }
        };
        let attached = registrations.len();
        drop(registrations);

        let identity = self.inner.identity(key);
        log::debug!(
            "[waitset] attach {} trigger_id={} attached={}",
            identity,
            trigger_id,
            attached
        );

        // The predicate may already hold: make a blocked waiter look again.
        self.inner.notify();

        Ok(Trigger::new(Arc::downgrade(&self.inner), identity, trigger_id))
    }

    /// Detach a registration.
    ///
    /// Detaching something already detached, or a trigger belonging to another
    /// WaitSet, is a no-op. Returns whether a registration was removed.
    pub fn detach(&self, identity: &TriggerIdentity) -> bool {
        if identity.waitset() != self.inner.uid {
            return false;
        }
        self.inner.detach(identity.key())
    }

    /// Block until at least one attached predicate is true.
    ///
    /// Returns a snapshot for *every* true predicate, in attachment order.
    /// Never returns an empty vector.
    #[must_use]
    pub fn wait(&self) -> Vec<TriggerSnapshot> {
        self.wait_until(None)
    }

    /// Like [`wait`](Self::wait), but gives up after `timeout`.
    ///
    /// Returns an empty vector when nothing became ready in time.
    #[must_use]
    pub fn timed_wait(&self, timeout: Duration) -> Vec<TriggerSnapshot> {
        // A deadline that overflows `Instant` is as good as no deadline.
        self.wait_until(Instant::now().checked_add(timeout))
    }

    /// Evaluate every predicate once without blocking.
    #[must_use]
    pub fn try_wait(&self) -> Vec<TriggerSnapshot> {
        self.inner.collect_ready()
    }

    /// Wake blocked waiters so they re-evaluate.
    ///
    /// A waiter that finds nothing ready goes back to sleep.
    pub fn notify(&self) {
        self.inner.notify();
    }

    /// Number of attached triggers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.registrations.lock().len()
    }

    /// `true` if no trigger is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of attached triggers.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.registrations.lock().capacity()
    }

    fn wait_until(&self, deadline: Option<Instant>) -> Vec<TriggerSnapshot> {
        loop {
            // Sample before evaluating so a fire racing the pass is not lost.
            let epoch = self.inner.notifier.epoch();

            let ready = self.inner.collect_ready();
            if !ready.is_empty() {
                log::debug!(
                    "[waitset] wait returning uid={} ready={}",
                    self.inner.uid,
                    ready.len()
                );
                return ready;
            }

            if self.inner.notifier.wait_past(epoch, deadline) == WakeOutcome::TimedOut {
                return self.inner.collect_ready();
            }
        }
    }
}

impl Default for WaitSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WaitSet {
    fn drop(&mut self) {
        let drained = self.inner.registrations.lock().drain();
        if drained.is_empty() {
            return;
        }

        log::debug!(
            "[waitset] teardown uid={} invalidating {} trigger(s)",
            self.inner.uid,
            drained.len()
        );

        for (key, registration) in drained {
            let identity = self.inner.identity(key);
            match registration.origin.upgrade() {
                Some(origin) => (registration.on_invalidate)(&*origin, identity),
                None => log::debug!("[waitset] teardown {} origin already gone", identity),
            }
        }
    }
}

impl std::fmt::Debug for WaitSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitSet")
            .field("uid", &self.inner.uid)
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl WaitSetInner {
    fn identity(&self, key: SlotKey) -> TriggerIdentity {
        TriggerIdentity::new(self.uid, key)
    }

    pub(crate) fn notify(&self) {
        self.notifier.notify();
    }

    pub(crate) fn is_attached(&self, key: SlotKey) -> bool {
        self.registrations.lock().contains(key)
    }

    pub(crate) fn detach(&self, key: SlotKey) -> bool {
        let removed = self.registrations.lock().remove(key);
        match removed {
            Some(registration) => {
                log::debug!(
                    "[waitset] detach {} trigger_id={}",
                    self.identity(key),
                    registration.trigger_id
                );
                true
            }
            None => false,
        }
    }

    pub(crate) fn evaluate(&self, key: SlotKey) -> bool {
        let registrations = self.registrations.lock();
        let Some(registration) = registrations.get(key) else {
            return false;
        };
        let Some(origin) = registration.origin.upgrade() else {
            return false;
        };
        let ready = (registration.predicate)(&*origin);
        drop(registrations);
        // Released after unlocking: the last reference may run the origin's
        // teardown, which detaches.
        drop(origin);
        ready
    }

    fn collect_ready(&self) -> Vec<TriggerSnapshot> {
        let mut ready = Vec::new();
        let mut released: Vec<Arc<Origin>> = Vec::new();
        let mut orphaned = Vec::new();

        let mut registrations = self.registrations.lock();
        for (key, registration) in registrations.iter() {
            let Some(origin) = registration.origin.upgrade() else {
                orphaned.push(key);
                continue;
            };

            if (registration.predicate)(&*origin) {
                ready.push(TriggerSnapshot::new(
                    registration.trigger_id,
                    self.identity(key),
                    origin,
                    registration.callback.clone(),
                ));
            } else {
                released.push(origin);
            }
        }

        let pruned: Vec<Registration> = orphaned
            .iter()
            .filter_map(|&key| registrations.remove(key))
            .collect();
        drop(registrations);

        for key in orphaned {
            log::debug!(
                "[waitset] pruned {}: origin dropped while attached",
                self.identity(key)
            );
        }
        drop(pruned);
        drop(released);

        ready
    }
}
