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

//! Storage of dynamic table entries.
//!
//! A dynamic table never allocates entries itself. It asks an [`EntrySource`]
//! for them, which decides whether an entry is owned by one table or shared
//! between many.
//!
//! [`EntrySource`]: EntrySource

use core::fmt::{Debug, Formatter};
use core::ops::Deref;

use crate::error::HpackError;
use crate::table::registry::SharedEntry;

/// Octets added to the length of name and value when accounting the size of an
/// entry.
pub(crate) const ENTRY_OVERHEAD: usize = 32;

/// Gets the accounting size of an entry with the given name and value.
pub(crate) fn entry_size(name: &[u8], value: &[u8]) -> usize {
    // RFC7541-4.1: The additional 32 octets account for an estimated
    // overhead associated with an entry.
    name.len()
        .saturating_add(value.len())
        .saturating_add(ENTRY_OVERHEAD)
}

/// An immutable name and value pair held by a dynamic table.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct DynamicEntry {
    name: Box<[u8]>,
    value: Box<[u8]>,
}

impl DynamicEntry {
    /// Copies `name` and `value` into a new entry. Returns `OutOfMemory` if
    /// the storage cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use ylong_hpack::DynamicEntry;
    ///
    /// let entry = DynamicEntry::new(b"custom-key", b"custom-header").unwrap();
    /// assert_eq!(entry.name(), b"custom-key");
    /// assert_eq!(entry.size(), 55);
    /// ```
    pub fn new(name: &[u8], value: &[u8]) -> Result<Self, HpackError> {
        Ok(Self {
            name: try_boxed(name)?,
            value: try_boxed(value)?,
        })
    }

    /// Gets the name of this entry.
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Gets the value of this entry.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Gets the size of this entry, which is the length of its name and value
    /// plus 32.
    pub fn size(&self) -> usize {
        entry_size(&self.name, &self.value)
    }
}

impl Debug for DynamicEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DynamicEntry")
            .field("name", &String::from_utf8_lossy(&self.name))
            .field("value", &String::from_utf8_lossy(&self.value))
            .finish()
    }
}

fn try_boxed(src: &[u8]) -> Result<Box<[u8]>, HpackError> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(src.len())
        .map_err(|_| HpackError::OutOfMemory)?;
    vec.extend_from_slice(src);
    Ok(vec.into_boxed_slice())
}

/// A dynamic table entry, either held by one table alone or shared through a
/// [`SharedRegistry`].
///
/// [`SharedRegistry`]: crate::SharedRegistry
#[derive(Debug)]
pub enum Entry {
    /// Owned by exactly one table and freed when evicted.
    Owned(Box<DynamicEntry>),
    /// Held through a registry, freed when the last holder releases it.
    Shared(SharedEntry),
}

impl Deref for Entry {
    type Target = DynamicEntry;

    fn deref(&self) -> &Self::Target {
        match self {
            Entry::Owned(entry) => &**entry,
            Entry::Shared(entry) => &**entry,
        }
    }
}

/// Allocation strategy for dynamic table entries.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use ylong_hpack::{Entry, EntrySource, ExclusiveSource, HpackLibrary};
///
/// let library = HpackLibrary::builder()
///     .entry_source(Arc::new(ExclusiveSource))
///     .build();
/// assert!(!library.is_shared());
///
/// let entry = ExclusiveSource.acquire(b"name", b"value").unwrap();
/// assert!(matches!(entry, Entry::Owned(_)));
/// ```
pub trait EntrySource: Send + Sync {
    /// Produces an entry holding a copy of `name` and `value`.
    fn acquire(&self, name: &[u8], value: &[u8]) -> Result<Entry, HpackError>;
}

/// An `EntrySource` that gives every table its own copy of each entry.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExclusiveSource;

impl EntrySource for ExclusiveSource {
    fn acquire(&self, name: &[u8], value: &[u8]) -> Result<Entry, HpackError> {
        DynamicEntry::new(name, value).map(|entry| Entry::Owned(Box::new(entry)))
    }
}
