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

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::HpackError;
use crate::table::entry::{entry_size, DynamicEntry, Entry, EntrySource, ExclusiveSource};
use crate::table::static_table::STATIC_TABLE_LEN;

/// The lowest index that addresses the dynamic table.
pub(crate) const DYNAMIC_INDEX_BEGIN: usize = STATIC_TABLE_LEN + 1;

/// The [`Dynamic Table`][dynamic_table] implementation of [HPACK].
///
/// [dynamic_table]: https://httpwg.org/specs/rfc7541.html#dynamic.table
/// [HPACK]: https://httpwg.org/specs/rfc7541.html
///
/// # Introduction
/// The dynamic table consists of a list of header fields maintained in
/// first-in, first-out order. The first and newest entry in a dynamic table is
/// at the lowest index, and the oldest entry of a dynamic table is at the
/// highest index.
///
/// The dynamic table is initially empty. Entries are added as each header block
/// is decompressed.
///
/// The dynamic table can contain duplicate entries (i.e., entries with the same
/// name and same value). Therefore, duplicate entries MUST NOT be treated as an
/// error by a decoder.
///
/// The size of the table never exceeds its maximum size. Entries are evicted
/// from the oldest end to make room for a new entry or to follow a smaller
/// maximum size.
pub(crate) struct DynamicTable {
    queue: VecDeque<Entry>,
    curr_size: usize,
    max_size: usize,
    source: Arc<dyn EntrySource>,
}

impl DynamicTable {
    /// Creates a `DynamicTable` whose entries are owned by this table alone.
    pub(crate) fn with_max_size(max_size: usize) -> Self {
        Self::with_source(max_size, Arc::new(ExclusiveSource))
    }

    /// Creates a `DynamicTable` whose entries come from `source`.
    pub(crate) fn with_source(max_size: usize, source: Arc<dyn EntrySource>) -> Self {
        Self {
            queue: VecDeque::new(),
            curr_size: 0,
            max_size,
            source,
        }
    }

    pub(crate) fn curr_size(&self) -> usize {
        self.curr_size
    }

    pub(crate) fn max_size(&self) -> usize {
        self.max_size
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    /// Gets the entry at an absolute `index`, where 62 is the newest entry.
    pub(crate) fn get(&self, index: usize) -> Result<&DynamicEntry, HpackError> {
        index
            .checked_sub(DYNAMIC_INDEX_BEGIN)
            .and_then(|pos| self.queue.get(pos))
            .map(|entry| &**entry)
            .ok_or(HpackError::InvalidDynamicIndex)
    }

    /// Finds the absolute index of the newest entry equal to `name` and
    /// `value`.
    pub(crate) fn find(&self, name: &[u8], value: &[u8]) -> Option<usize> {
        self.queue
            .iter()
            .position(|entry| entry.name() == name && entry.value() == value)
            .map(|pos| pos + DYNAMIC_INDEX_BEGIN)
    }

    /// Inserts a new entry as the newest one, evicting old entries as needed.
    ///
    /// An entry larger than the maximum size is rejected with `EntryTooLarge`
    /// and the table is left unchanged. So is an allocation failure.
    pub(crate) fn insert(&mut self, name: &[u8], value: &[u8]) -> Result<(), HpackError> {
        let size = entry_size(name, value);
        if size > self.max_size {
            debug!(
                size,
                max_size = self.max_size,
                "hpack entry larger than dynamic table"
            );
            return Err(HpackError::EntryTooLarge);
        }
        let entry = self.source.acquire(name, value)?;
        self.queue
            .try_reserve(1)
            .map_err(|_| HpackError::OutOfMemory)?;

        self.fit_size(size);
        self.curr_size += size;
        self.queue.push_front(entry);
        Ok(())
    }

    /// Updates `DynamicTable`'s maximum size, evicting entries that no longer
    /// fit.
    pub(crate) fn update_size(&mut self, max_size: usize) {
        debug!(
            from = self.max_size,
            to = max_size,
            "hpack dynamic table size updated"
        );
        self.max_size = max_size;
        self.fit_size(0);
    }

    /// Evicts the oldest entries until `reserved` more octets fit.
    fn fit_size(&mut self, reserved: usize) {
        while self.curr_size + reserved > self.max_size {
            let entry = match self.queue.pop_back() {
                Some(entry) => entry,
                None => break,
            };
            self.curr_size -= entry.size();
            trace!(
                size = entry.size(),
                remaining = self.queue.len(),
                "hpack entry evicted"
            );
        }
    }
}
