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

//! [String Literal Representation] implementation of [HPACK].
//!
//! [String Literal Representation]: https://httpwg.org/specs/rfc7541.html#string.literal.representation
//! [HPACK]: https://httpwg.org/specs/rfc7541.html
//!
//! # Binary Format
//! ```text
//!   0   1   2   3   4   5   6   7
//! +---+---+---+---+---+---+---+---+
//! | H |    String Length (7+)     |
//! +---+---------------------------+
//! |  String Data (Length octets)  |
//! +-------------------------------+
//! ```

use core::ops::Range;

use crate::error::HpackError;
use crate::huffman::huffman_decode;
use crate::integer::{decode_integer, encode_integer};

const HUFFMAN_FLAG: u8 = 0x80;
const LENGTH_PREFIX: u8 = 7;

/// Location of a decoded string.
///
/// Raw strings are never copied, they stay in the input buffer. Huffman
/// strings are decoded into the caller's scratch buffer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Literal {
    /// Range into the input buffer.
    Input(Range<usize>),
    /// Range into the scratch buffer.
    Scratch(Range<usize>),
}

impl Literal {
    /// Moves a raw range forward by `offset`. Used when the literal was
    /// decoded from a sub-slice of the input.
    pub(crate) fn offset(self, offset: usize) -> Self {
        match self {
            Literal::Input(range) => Literal::Input(range.start + offset..range.end + offset),
            scratch => scratch,
        }
    }

    /// Gets the bytes of this literal.
    pub(crate) fn resolve<'a>(&self, input: &'a [u8], scratch: &'a [u8]) -> &'a [u8] {
        match self {
            Literal::Input(range) => &input[range.clone()],
            Literal::Scratch(range) => &scratch[range.clone()],
        }
    }
}

/// Decodes one string literal from the front of `buf`. Returns its location
/// and the number of bytes consumed.
///
/// A Huffman string is decoded into `scratch`, producing at most `limit`
/// bytes.
pub(crate) fn decode_string(
    buf: &[u8],
    scratch: &mut Vec<u8>,
    limit: usize,
) -> Result<(Literal, usize), HpackError> {
    let first = *buf.first().ok_or(HpackError::InsufficientInput)?;
    let (len, head) = decode_integer(buf, LENGTH_PREFIX)?;
    let end = head
        .checked_add(len)
        .filter(|end| *end <= buf.len())
        .ok_or(HpackError::InsufficientInput)?;

    if first & HUFFMAN_FLAG == 0 {
        return Ok((Literal::Input(head..end), end));
    }
    let start = scratch.len();
    if let Err(e) = huffman_decode(&buf[head..end], scratch, limit) {
        scratch.truncate(start);
        return Err(e.into());
    }
    Ok((Literal::Scratch(start..scratch.len()), end))
}

/// Writes `src` as a raw string literal into `dst`. Returns the number of
/// bytes written.
pub(crate) fn encode_string(src: &[u8], dst: &mut [u8]) -> Result<usize, HpackError> {
    let head = encode_integer(src.len(), LENGTH_PREFIX, 0x00, dst)?;
    let end = head + src.len();
    dst.get_mut(head..end)
        .ok_or(HpackError::InsufficientOutput)?
        .copy_from_slice(src);
    Ok(end)
}
