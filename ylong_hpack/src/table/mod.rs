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

//! Static and dynamic tables of [HPACK].
//!
//! [HPACK]: https://httpwg.org/specs/rfc7541.html
//!
//! # Index Address Space
//! ```text
//!  <----------  Index Address Space ---------->
//!  <-- Static  Table -->  <-- Dynamic Table -->
//!  +---+-----------+---+  +---+-----------+---+
//!  | 1 |    ...    | s |  |s+1|    ...    |s+k|
//!  +---+-----------+---+  +---+-----------+---+
//!                         ^                   |
//!                         |                   V
//!                  Insertion Point      Dropping Point
//! ```
//! `s` is 61. Index 0 addresses nothing.

pub(crate) mod dynamic;
pub(crate) mod entry;
pub(crate) mod registry;
pub(crate) mod static_table;

use dynamic::DynamicTable;
use static_table::{StaticTable, STATIC_TABLE_LEN};

use crate::error::HpackError;

/// `TableSearcher` is used to find specified content in static and dynamic
/// tables.
pub(crate) struct TableSearcher<'a> {
    dynamic: &'a DynamicTable,
}

impl<'a> TableSearcher<'a> {
    pub(crate) fn new(dynamic: &'a DynamicTable) -> Self {
        Self { dynamic }
    }

    /// Searches the name of the field at `index` in static and dynamic tables.
    pub(crate) fn search_header_name(&self, index: usize) -> Result<&'a [u8], HpackError> {
        self.search_header(index).map(|(name, _)| name)
    }

    /// Searches the field at `index` in static and dynamic tables. A static
    /// entry without a fixed value yields an empty value.
    pub(crate) fn search_header(&self, index: usize) -> Result<(&'a [u8], &'a [u8]), HpackError> {
        if index <= STATIC_TABLE_LEN {
            return StaticTable::get(index)
                .map(|entry| (entry.name(), entry.value().unwrap_or_default()))
                .ok_or(HpackError::InvalidDynamicIndex);
        }
        let dynamic: &'a DynamicTable = self.dynamic;
        dynamic
            .get(index)
            .map(|entry| (entry.name(), entry.value()))
    }

    /// Searches an index that can represent `name` and `value`. A full match
    /// in the dynamic table is preferred over a name match in the static
    /// table. Static values are never compared.
    pub(crate) fn index(&self, name: &[u8], value: &[u8]) -> Option<TableIndex> {
        match (
            self.dynamic.find(name, value),
            StaticTable::index_of_name(name),
        ) {
            (Some(index), _) => Some(TableIndex::Header(index)),
            (None, Some(index)) => Some(TableIndex::HeaderName(index)),
            _ => None,
        }
    }
}

/// Result of a table search.
#[derive(Debug, Eq, PartialEq)]
pub(crate) enum TableIndex {
    /// Both name and value match.
    Header(usize),
    /// Only the name matches.
    HeaderName(usize),
}
