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

//! The [`Static Table`][static_table] implementation of [HPACK].
//!
//! [static_table]: https://httpwg.org/specs/rfc7541.html#static.table
//! [HPACK]: https://httpwg.org/specs/rfc7541.html
//!
//! The static table consists of a predefined list of 61 header fields. An
//! entry with an empty value only fixes the name.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Number of entries in the static table.
pub(crate) const STATIC_TABLE_LEN: usize = 61;

/// One entry of the static table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct StaticEntry {
    index: usize,
    name: &'static [u8],
    value: &'static [u8],
}

impl StaticEntry {
    const fn new(index: usize, name: &'static [u8], value: &'static [u8]) -> Self {
        Self { index, name, value }
    }

    pub(crate) fn name(&self) -> &'static [u8] {
        self.name
    }

    /// Gets the fixed value of this entry, `None` if only the name is fixed.
    pub(crate) fn value(&self) -> Option<&'static [u8]> {
        match self.value.is_empty() {
            true => None,
            false => Some(self.value),
        }
    }
}

/// Slot 0 is a placeholder so that slot `i` holds index `i`.
#[rustfmt::skip]
static STATIC_TABLE: [StaticEntry; STATIC_TABLE_LEN + 1] = [
    StaticEntry::new(0, b"", b""),
    StaticEntry::new(1, b":authority", b""),
    StaticEntry::new(2, b":method", b"GET"),
    StaticEntry::new(3, b":method", b"POST"),
    StaticEntry::new(4, b":path", b"/"),
    StaticEntry::new(5, b":path", b"/index.html"),
    StaticEntry::new(6, b":scheme", b"http"),
    StaticEntry::new(7, b":scheme", b"https"),
    StaticEntry::new(8, b":status", b"200"),
    StaticEntry::new(9, b":status", b"204"),
    StaticEntry::new(10, b":status", b"206"),
    StaticEntry::new(11, b":status", b"304"),
    StaticEntry::new(12, b":status", b"400"),
    StaticEntry::new(13, b":status", b"404"),
    StaticEntry::new(14, b":status", b"500"),
    StaticEntry::new(15, b"accept-charset", b""),
    StaticEntry::new(16, b"accept-encoding", b"gzip, deflate"),
    StaticEntry::new(17, b"accept-language", b""),
    StaticEntry::new(18, b"accept-ranges", b""),
    StaticEntry::new(19, b"accept", b""),
    StaticEntry::new(20, b"access-control-allow-origin", b""),
    StaticEntry::new(21, b"age", b""),
    StaticEntry::new(22, b"allow", b""),
    StaticEntry::new(23, b"authorization", b""),
    StaticEntry::new(24, b"cache-control", b""),
    StaticEntry::new(25, b"content-disposition", b""),
    StaticEntry::new(26, b"content-encoding", b""),
    StaticEntry::new(27, b"content-language", b""),
    StaticEntry::new(28, b"content-length", b""),
    StaticEntry::new(29, b"content-location", b""),
    StaticEntry::new(30, b"content-range", b""),
    StaticEntry::new(31, b"content-type", b""),
    StaticEntry::new(32, b"cookie", b""),
    StaticEntry::new(33, b"date", b""),
    StaticEntry::new(34, b"etag", b""),
    StaticEntry::new(35, b"expect", b""),
    StaticEntry::new(36, b"expires", b""),
    StaticEntry::new(37, b"from", b""),
    StaticEntry::new(38, b"host", b""),
    StaticEntry::new(39, b"if-match", b""),
    StaticEntry::new(40, b"if-modified-since", b""),
    StaticEntry::new(41, b"if-none-match", b""),
    StaticEntry::new(42, b"if-range", b""),
    StaticEntry::new(43, b"if-unmodified-since", b""),
    StaticEntry::new(44, b"last-modified", b""),
    StaticEntry::new(45, b"link", b""),
    StaticEntry::new(46, b"location", b""),
    StaticEntry::new(47, b"max-forwards", b""),
    StaticEntry::new(48, b"proxy-authenticate", b""),
    StaticEntry::new(49, b"proxy-authorization", b""),
    StaticEntry::new(50, b"range", b""),
    StaticEntry::new(51, b"referer", b""),
    StaticEntry::new(52, b"refresh", b""),
    StaticEntry::new(53, b"retry-after", b""),
    StaticEntry::new(54, b"server", b""),
    StaticEntry::new(55, b"set-cookie", b""),
    StaticEntry::new(56, b"strict-transport-security", b""),
    StaticEntry::new(57, b"transfer-encoding", b""),
    StaticEntry::new(58, b"user-agent", b""),
    StaticEntry::new(59, b"vary", b""),
    StaticEntry::new(60, b"via", b""),
    StaticEntry::new(61, b"www-authenticate", b""),
];

static NAME_INDEX: OnceLock<HashMap<&'static [u8], usize>> = OnceLock::new();

pub(crate) struct StaticTable;

impl StaticTable {
    /// Gets the entry at `index`. Index 0 and indices above 61 have no entry.
    pub(crate) fn get(index: usize) -> Option<StaticEntry> {
        match index {
            1..=STATIC_TABLE_LEN => Some(STATIC_TABLE[index]),
            _ => None,
        }
    }

    /// Finds the lowest index whose name equals `name`. Values are ignored.
    pub(crate) fn index_of_name(name: &[u8]) -> Option<usize> {
        NAME_INDEX
            .get_or_init(|| {
                let mut map = HashMap::with_capacity(STATIC_TABLE_LEN);
                for entry in &STATIC_TABLE[1..] {
                    map.entry(entry.name).or_insert(entry.index);
                }
                map
            })
            .get(name)
            .copied()
    }

    /// Finds the index of the entry matching both `name` and `value`.
    pub(crate) fn index_of(name: &[u8], value: &[u8]) -> Option<usize> {
        let first = Self::index_of_name(name)?;
        STATIC_TABLE[first..]
            .iter()
            .take_while(|entry| entry.name == name)
            .find(|entry| entry.value == value)
            .map(|entry| entry.index)
    }
}
