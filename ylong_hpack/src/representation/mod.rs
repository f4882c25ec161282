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

//! [Header Field Representation] implementation of [HPACK].
//!
//! [Header Field Representation]: https://www.rfc-editor.org/rfc/rfc7541.html#section-2.4
//! [HPACK]: https://httpwg.org/specs/rfc7541.html
//!
//! An encoded header field is either an index into the static or dynamic
//! table, or a literal whose name may itself be an index. Only literals with
//! incremental indexing are added to the dynamic table. Never-indexed literals
//! are also marked as sensitive. A separate instruction changes the maximum
//! size of the dynamic table.

mod decoder;
mod encoder;

pub(crate) use decoder::ReprDecoder;
pub use encoder::{encode_content_length, encode_header, encode_status};
pub(crate) use encoder::{to_lowercase, Indexed, Indexing, IndexingWithName};

use crate::string::Literal;

/// Definition and [binary format] of each of the different
/// [header field representations] and the [dynamic table size update]
/// instruction.
///
/// [binary format]: https://www.rfc-editor.org/rfc/rfc7541.html#section-6
/// [header field representations]: https://www.rfc-editor.org/rfc/rfc7541.html#section-3.2
/// [dynamic table size update]: https://www.rfc-editor.org/rfc/rfc7541.html#section-6.3
#[derive(Debug, Eq, PartialEq)]
pub(crate) enum Representation {
    /// # Binary Format
    /// `Indexed Header Field`:
    /// ```text
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 1 |        Index (7+)         |
    /// +---+---------------------------+
    /// ```
    Indexed { index: usize },

    /// # Binary Format
    /// `Literal Header Field with Incremental Indexing`:
    /// ```text
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 0 | 1 |      Index (6+)       |
    /// +---+---+-----------------------+
    /// | H |     Value Length (7+)     |
    /// +---+---------------------------+
    /// | Value String (Length octets)  |
    /// +-------------------------------+
    /// ```
    /// An index of 0 means that a name string precedes the value string.
    LiteralWithIndexing { name: Name, value: Literal },

    /// # Binary Format
    /// `Literal Header Field without Indexing`:
    /// ```text
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 0 | 0 | 0 | 0 |  Index (4+)   |
    /// +---+---+---+---+---------------+
    /// | H |     Value Length (7+)     |
    /// +---+---------------------------+
    /// | Value String (Length octets)  |
    /// +-------------------------------+
    /// ```
    LiteralWithoutIndexing { name: Name, value: Literal },

    /// # Binary Format
    /// `Literal Header Field Never Indexed`:
    /// ```text
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 0 | 0 | 0 | 1 |  Index (4+)   |
    /// +---+---+---+---+---------------+
    /// | H |     Value Length (7+)     |
    /// +---+---------------------------+
    /// | Value String (Length octets)  |
    /// +-------------------------------+
    /// ```
    LiteralNeverIndexed { name: Name, value: Literal },

    /// # Binary Format
    /// `Maximum Dynamic Table Size Change`:
    /// ```text
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 0 | 0 | 1 |   Max size (5+)   |
    /// +---+---+---+-------------------+
    /// ```
    SizeUpdate { max_size: usize },
}

/// Prefix bit of `Representation`. An integer is represented in two
/// parts: a prefix that fills the current octet and an optional list of octets
/// that are used if the integer value does not fit within the prefix.
///
/// # Binary Format
/// ```text
///   0   1   2   3   4   5   6   7
/// +---+---+---+---+---+---+---+---+
/// | PrefixBit |       Value       |
/// +---+---+---+-------------------+
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct PrefixBit(u8);

impl PrefixBit {
    pub(crate) const INDEXED: Self = Self(0x80);
    pub(crate) const LITERAL_WITH_INDEXING: Self = Self(0x40);
    pub(crate) const SIZE_UPDATE: Self = Self(0x20);
    pub(crate) const LITERAL_NEVER_INDEXED: Self = Self(0x10);
    pub(crate) const LITERAL_WITHOUT_INDEXING: Self = Self(0x00);

    /// Creates a `PrefixBit` from a byte. The interface will convert the
    /// incoming byte to the most suitable prefix bit.
    pub(crate) fn from_u8(byte: u8) -> Self {
        match byte {
            x if x >= 0x80 => Self::INDEXED,
            x if x >= 0x40 => Self::LITERAL_WITH_INDEXING,
            x if x >= 0x20 => Self::SIZE_UPDATE,
            x if x >= 0x10 => Self::LITERAL_NEVER_INDEXED,
            _ => Self::LITERAL_WITHOUT_INDEXING,
        }
    }

    /// Gets the pattern bits.
    pub(crate) fn bits(&self) -> u8 {
        self.0
    }

    /// Returns the corresponding `PrefixIndexMask` according to the current
    /// prefix bit.
    pub(crate) fn prefix_index_mask(&self) -> PrefixIndexMask {
        match self.0 {
            0x80 => PrefixIndexMask::INDEXED,
            0x40 => PrefixIndexMask::LITERAL_WITH_INDEXING,
            0x20 => PrefixIndexMask::SIZE_UPDATE,
            0x10 => PrefixIndexMask::LITERAL_NEVER_INDEXED,
            _ => PrefixIndexMask::LITERAL_WITHOUT_INDEXING,
        }
    }
}

/// Prefix index mask of `Representation`.
///
/// ```text
/// +---+---+---+---+---+---+---+---+
/// | 0 | 0 | 0 | 1 | 1 | 1 | 1 | 1 |
/// +---+---+---+---+---+---+---+---+
/// |<-      PrefixIndexMask      ->|
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct PrefixIndexMask(u8);

impl PrefixIndexMask {
    pub(crate) const INDEXED: Self = Self(0x7f);
    pub(crate) const LITERAL_WITH_INDEXING: Self = Self(0x3f);
    pub(crate) const SIZE_UPDATE: Self = Self(0x1f);
    pub(crate) const LITERAL_NEVER_INDEXED: Self = Self(0x0f);
    pub(crate) const LITERAL_WITHOUT_INDEXING: Self = Self(0x0f);

    /// Gets the width of the prefix in bits.
    pub(crate) fn prefix_bits(&self) -> u8 {
        self.0.count_ones() as u8
    }
}

/// Name of `Representation`. It can be represented as string literals or an
/// index.
#[derive(Debug, Eq, PartialEq)]
pub(crate) enum Name {
    Index(usize),
    Literal(Literal),
}
