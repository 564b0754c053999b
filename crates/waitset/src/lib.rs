// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # waitset - event multiplexing for independently-owned origins
//!
//! A single waiter blocks until any of several heterogeneous event sources
//! ("origins") becomes ready, then receives a [`TriggerSnapshot`] per ready
//! source describing what fired and, optionally, a callback to run.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::{Arc, Mutex};
//! use waitset::{Trigger, TriggerIdentity, WaitSet};
//!
//! struct Door {
//!     opened: AtomicBool,
//!     trigger: Mutex<Option<Trigger>>,
//! }
//!
//! impl Door {
//!     fn is_open(&self) -> bool {
//!         self.opened.load(Ordering::Acquire)
//!     }
//!
//!     fn open(&self) {
//!         self.opened.store(true, Ordering::Release);
//!         if let Some(trigger) = self.trigger.lock().unwrap().as_ref() {
//!             trigger.trigger();
//!         }
//!     }
//!
//!     fn unset_trigger(&self, identity: TriggerIdentity) {
//!         let mut slot = self.trigger.lock().unwrap();
//!         if slot.as_ref().is_some_and(|t| t.is_logical_equal_to(&identity)) {
//!             slot.take();
//!         }
//!     }
//! }
//!
//! let waitset = WaitSet::new();
//! let door = Arc::new(Door { opened: AtomicBool::new(false), trigger: Mutex::new(None) });
//!
//! let trigger = waitset.attach(&door, Door::is_open, Door::unset_trigger, 7, None)?;
//! *door.trigger.lock().unwrap() = Some(trigger);
//!
//! door.open();
//! for snapshot in waitset.wait() {
//!     assert_eq!(snapshot.trigger_id(), 7);
//!     snapshot.origin::<Door>().unwrap().opened.store(false, Ordering::Release);
//! }
//! # Ok::<(), waitset::Error>(())
//! ```
//!
//! ## Semantics
//!
//! - **Level-triggered**: `wait()` reports predicate state, not firing counts.
//!   The handler must clear the origin's readiness before the next wait.
//! - **Deterministic order**: snapshots come back in attachment order.
//! - **Teardown in any order**: origins are held weakly; a dropped WaitSet
//!   calls each live origin's invalidation callback once.
//!
//! ## Modules Overview
//!
//! - [`WaitSet`] - registry and blocking wait (start here)
//! - [`Trigger`] - the origin-side registration handle
//! - [`UserTrigger`] - ready-made, application-controlled origin
//! - [`config`] - capacity configuration

/// WaitSet configuration (capacity, environment overrides).
pub mod config;
mod error;
mod rt;
mod snapshot;
mod trigger;
mod user_trigger;
mod waitset;

pub use config::{WaitSetConfig, DEFAULT_CAPACITY};
pub use error::{Error, Result};
pub use snapshot::{Origin, TriggerSnapshot};
pub use trigger::{Trigger, TriggerIdentity};
pub use user_trigger::UserTrigger;
pub use waitset::WaitSet;
