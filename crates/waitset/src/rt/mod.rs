// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime primitives backing the WaitSet.
//!
//! - [`Notifier`]: payload-free, coalescing wakeup used by `Trigger::trigger()`.
//! - [`SlotTable`]: bounded, generation-checked storage for registrations.

mod notifier;
mod slots;

pub(crate) use notifier::{Notifier, WakeOutcome};
pub(crate) use slots::{SlotKey, SlotTable};
