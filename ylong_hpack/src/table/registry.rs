// Copyright (c) 2023 Huawei Device Co., Ltd.
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Cross-context sharing of dynamic table entries.
//!
//! Many connections of one process tend to insert the same header fields into
//! their dynamic tables. A [`SharedRegistry`] keeps a single copy of each
//! distinct `(name, value)` pair and counts the tables holding it. The copy is
//! freed when the last holder evicts it.
//!
//! [`SharedRegistry`]: SharedRegistry

use core::fmt::{Debug, Formatter};
use core::ops::Deref;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::error::HpackError;
use crate::table::entry::{DynamicEntry, Entry, EntrySource};

type Slots = Mutex<HashMap<Arc<DynamicEntry>, usize>>;

/// A deduplicating store of dynamic table entries shared by many contexts.
///
/// Cloning a `SharedRegistry` gives another handle to the same store. All
/// lookups, insertions, removals and reference count updates happen under
/// one lock.
///
/// # Examples
///
/// ```
/// use ylong_hpack::{EntrySource, SharedRegistry};
///
/// let registry = SharedRegistry::new();
/// let first = registry.acquire(b"x-trace", b"on").unwrap();
/// let second = registry.acquire(b"x-trace", b"on").unwrap();
/// assert_eq!(registry.len(), 1);
/// assert_eq!(registry.references(b"x-trace", b"on"), 2);
///
/// drop(first);
/// drop(second);
/// assert!(registry.is_empty());
/// ```
#[derive(Clone, Default)]
pub struct SharedRegistry {
    slots: Arc<Slots>,
}

impl SharedRegistry {
    /// Creates an empty `SharedRegistry`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the number of distinct entries currently stored.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Checks whether no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    /// Gets how many holders share the given pair. Returns 0 if the pair is
    /// not stored.
    pub fn references(&self, name: &[u8], value: &[u8]) -> usize {
        let candidate = match DynamicEntry::new(name, value) {
            Ok(candidate) => candidate,
            Err(_) => return 0,
        };
        self.slots.lock().get(&candidate).copied().unwrap_or(0)
    }
}

impl EntrySource for SharedRegistry {
    fn acquire(&self, name: &[u8], value: &[u8]) -> Result<Entry, HpackError> {
        // Allocated outside the lock. Dropped again on a hit.
        let candidate = DynamicEntry::new(name, value)?;
        let mut slots = self.slots.lock();
        slots.try_reserve(1).map_err(|_| HpackError::OutOfMemory)?;

        let entry = match slots.get_key_value(&candidate) {
            Some((stored, refs)) => {
                trace!(references = refs + 1, "shared hpack entry reused");
                Arc::clone(stored)
            }
            None => Arc::new(candidate),
        };
        *slots.entry(Arc::clone(&entry)).or_insert(0) += 1;
        Ok(Entry::Shared(SharedEntry {
            entry,
            slots: Arc::clone(&self.slots),
        }))
    }
}

impl Debug for SharedRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedRegistry")
            .field("entries", &self.len())
            .finish()
    }
}

/// A handle to an entry stored in a [`SharedRegistry`]. Dropping it releases
/// one reference.
///
/// [`SharedRegistry`]: SharedRegistry
pub struct SharedEntry {
    entry: Arc<DynamicEntry>,
    slots: Arc<Slots>,
}

impl Deref for SharedEntry {
    type Target = DynamicEntry;

    fn deref(&self) -> &Self::Target {
        &self.entry
    }
}

impl Debug for SharedEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("SharedEntry").field(&*self.entry).finish()
    }
}

impl Drop for SharedEntry {
    fn drop(&mut self) {
        let mut slots = self.slots.lock();
        let released = match slots.get_mut(self.entry.as_ref()) {
            Some(refs) => {
                *refs -= 1;
                *refs == 0
            }
            None => false,
        };
        if released {
            slots.remove(self.entry.as_ref());
            trace!(size = self.entry.size(), "shared hpack entry released");
        }
    }
}
