// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounded slot table with generation-checked keys.
//!
//! Every insertion gets a fresh, never-zero generation. A [`SlotKey`] whose
//! slot has since been released (and possibly reused) no longer resolves, so
//! holders of stale keys observe "gone" instead of someone else's entry.
//! Live slots are also tracked in insertion order for deterministic iteration.

/// Index plus generation of an occupied slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SlotKey {
    pub(crate) index: usize,
    pub(crate) generation: u64,
}

struct Slot<T> {
    generation: u64,
    value: T,
}

pub(crate) struct SlotTable<T> {
    entries: Vec<Option<Slot<T>>>,
    free: Vec<usize>,
    order: Vec<usize>,
    next_generation: u64,
    capacity: usize,
}

impl<T> SlotTable<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            free: Vec::new(),
            order: Vec::with_capacity(capacity),
            next_generation: 1,
            capacity,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    /// Store `value`, handing it back untouched when the table is full.
    pub(crate) fn insert(&mut self, value: T) -> Result<SlotKey, T> {
        let index = if let Some(index) = self.free.pop() {
            index
        } else {
            let index = self.entries.len();
            if index >= self.capacity {
                return Err(value);
            }
            self.entries.push(None);
            index
        };

        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1).max(1);

        self.entries[index] = Some(Slot { generation, value });
        self.order.push(index);

        Ok(SlotKey { index, generation })
    }

    pub(crate) fn get(&self, key: SlotKey) -> Option<&T> {
        match self.entries.get(key.index) {
            Some(Some(slot)) if slot.generation == key.generation => Some(&slot.value),
            _ => None,
        }
    }

    pub(crate) fn contains(&self, key: SlotKey) -> bool {
        self.get(key).is_some()
    }

    /// Release the slot behind `key`. Stale or foreign keys are ignored.
    pub(crate) fn remove(&mut self, key: SlotKey) -> Option<T> {
        let entry = self.entries.get_mut(key.index)?;
        match entry {
            Some(slot) if slot.generation == key.generation => {}
            _ => return None,
        }

        let slot = entry.take()?;
        self.free.push(key.index);
        self.order.retain(|&index| index != key.index);
        Some(slot.value)
    }

    /// Live entries in insertion order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (SlotKey, &T)> + '_ {
        self.order.iter().filter_map(move |&index| {
            self.entries[index].as_ref().map(|slot| {
                (
                    SlotKey {
                        index,
                        generation: slot.generation,
                    },
                    &slot.value,
                )
            })
        })
    }

    /// Remove every entry, returned in insertion order.
    pub(crate) fn drain(&mut self) -> Vec<(SlotKey, T)> {
        let order = std::mem::take(&mut self.order);
        let mut drained = Vec::with_capacity(order.len());
        for index in order {
            if let Some(slot) = self.entries[index].take() {
                self.free.push(index);
                drained.push((
                    SlotKey {
                        index,
                        generation: slot.generation,
                    },
                    slot.value,
                ));
            }
        }
        drained
    }
}
