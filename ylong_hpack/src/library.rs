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

//! Process-wide configuration shared by compression contexts.

use core::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::context::{Hpack, DEFAULT_HUFFMAN_LIMIT};
use crate::table::entry::{EntrySource, ExclusiveSource};
use crate::table::registry::SharedRegistry;

/// Settings shared by every context it creates: whether equal dynamic table
/// entries are shared across contexts, how entries are allocated and how long
/// a decoded Huffman string may grow.
///
/// Contexts keep what they need alive, so the library may be dropped before
/// the contexts it created.
///
/// # Examples
///
/// ```
/// use ylong_hpack::HpackLibrary;
///
/// let library = HpackLibrary::init(true);
/// let mut first = library.new_context(4096);
/// let mut second = library.new_context(4096);
///
/// let mut buf = [0u8; 64];
/// first.encode_header(b"x-shared", b"yes", &mut buf).unwrap();
/// second.encode_header(b"x-shared", b"yes", &mut buf).unwrap();
///
/// let registry = library.registry().unwrap();
/// assert_eq!(registry.len(), 1);
/// assert_eq!(registry.references(b"x-shared", b"yes"), 2);
/// ```
pub struct HpackLibrary {
    source: Arc<dyn EntrySource>,
    registry: Option<SharedRegistry>,
    huffman_limit: usize,
}

impl HpackLibrary {
    /// Creates an `HpackLibrary` with default settings. If `dynamic_share` is
    /// true, equal entries of all contexts created by this library share one
    /// copy.
    pub fn init(dynamic_share: bool) -> Self {
        Self::builder().dynamic_share(dynamic_share).build()
    }

    /// Creates a `LibraryBuilder` to configure an `HpackLibrary`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ylong_hpack::HpackLibrary;
    ///
    /// let library = HpackLibrary::builder()
    ///     .dynamic_share(true)
    ///     .huffman_limit(8192)
    ///     .build();
    /// assert!(library.is_shared());
    /// assert_eq!(library.huffman_limit(), 8192);
    /// ```
    pub fn builder() -> LibraryBuilder {
        LibraryBuilder::new()
    }

    /// Creates a context whose dynamic table holds at most `max_size` octets.
    pub fn new_context(&self, max_size: usize) -> Hpack {
        Hpack::with_source(max_size, Arc::clone(&self.source), self.huffman_limit)
    }

    /// Gets the registry holding shared entries, if sharing is enabled.
    pub fn registry(&self) -> Option<&SharedRegistry> {
        self.registry.as_ref()
    }

    /// Checks whether contexts of this library share equal entries.
    pub fn is_shared(&self) -> bool {
        self.registry.is_some()
    }

    /// Gets the bound on the decoded length of one Huffman string.
    pub fn huffman_limit(&self) -> usize {
        self.huffman_limit
    }
}

impl Default for HpackLibrary {
    fn default() -> Self {
        Self::init(false)
    }
}

impl Debug for HpackLibrary {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HpackLibrary")
            .field("registry", &self.registry)
            .field("huffman_limit", &self.huffman_limit)
            .finish()
    }
}

/// A builder which is used to construct an `HpackLibrary`.
pub struct LibraryBuilder {
    dynamic_share: bool,
    huffman_limit: usize,
    source: Option<Arc<dyn EntrySource>>,
}

impl LibraryBuilder {
    /// Creates a new, default `LibraryBuilder`. Sharing is disabled and
    /// Huffman strings may decode to 4096 octets.
    pub fn new() -> Self {
        Self {
            dynamic_share: false,
            huffman_limit: DEFAULT_HUFFMAN_LIMIT,
            source: None,
        }
    }

    /// Enables or disables sharing of equal entries between contexts.
    pub fn dynamic_share(mut self, dynamic_share: bool) -> Self {
        self.dynamic_share = dynamic_share;
        self
    }

    /// Sets the maximum decoded length of one Huffman string. Longer strings
    /// are rejected as invalid.
    pub fn huffman_limit(mut self, limit: usize) -> Self {
        self.huffman_limit = limit;
        self
    }

    /// Uses `source` to allocate dynamic table entries. This takes precedence
    /// over `dynamic_share`.
    pub fn entry_source(mut self, source: Arc<dyn EntrySource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Constructs an `HpackLibrary` by this `LibraryBuilder`.
    pub fn build(self) -> HpackLibrary {
        let (source, registry): (Arc<dyn EntrySource>, _) = match self.source {
            Some(source) => (source, None),
            None if self.dynamic_share => {
                let registry = SharedRegistry::new();
                (Arc::new(registry.clone()), Some(registry))
            }
            None => (Arc::new(ExclusiveSource), None),
        };
        HpackLibrary {
            source,
            registry,
            huffman_limit: self.huffman_limit,
        }
    }
}

impl Default for LibraryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
