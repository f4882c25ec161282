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

//! [Integer Representation] implementation of [HPACK].
//!
//! [Integer Representation]: https://httpwg.org/specs/rfc7541.html#integer.representation
//! [HPACK]: https://httpwg.org/specs/rfc7541.html
//!
//! # Introduction
//! Integers are used to represent name indexes, header field indexes, table
//! sizes and string lengths. An integer occupies the low `N` bits of its first
//! octet (the prefix). Values that do not fit in the prefix continue in 7-bit
//! groups, low-order first, with the high bit of each octet marking that
//! another octet follows.

use core::cmp::Ordering;

use crate::error::HpackError;

/// Maximum number of continuation octets accepted after a saturated prefix.
/// Four octets carry 28 bits, which covers every table size and string length
/// the codec handles.
pub(crate) const MAX_CONTINUATION_BYTES: usize = 4;

/// `IntegerDecoder` implementation according to `Pseudocode to decode an
/// integer I` in `RFC7541 section-5.1`.
///
/// # Pseudocode
/// ```text
/// decode I from the next N bits
/// if I < 2^N - 1, return I
/// else
///     M = 0
///     repeat
///         B = next octet
///         I = I + (B & 127) * 2^M
///         M = M + 7
///     while B & 128 == 128
///     return I
/// ```
pub(crate) struct IntegerDecoder {
    value: usize,
    shift: u32,
    continuations: usize,
}

impl IntegerDecoder {
    /// Reads the prefix of the first byte. Returns the value directly if it
    /// fits in the prefix, otherwise returns a decoder waiting for
    /// continuation bytes.
    pub(crate) fn first_byte(byte: u8, mask: u8) -> Result<usize, Self> {
        let prefix = byte & mask;
        match prefix.cmp(&mask) {
            Ordering::Less => Ok(prefix as usize),
            _ => Err(Self {
                value: prefix as usize,
                shift: 0,
                continuations: 0,
            }),
        }
    }

    /// Feeds one continuation byte. Returns `Ok(Some(value))` once the last
    /// byte is seen and `Ok(None)` while more bytes are expected.
    pub(crate) fn next_byte(&mut self, byte: u8) -> Result<Option<usize>, HpackError> {
        self.continuations += 1;
        if self.continuations > MAX_CONTINUATION_BYTES {
            return Err(HpackError::InvalidInteger);
        }
        self.value = ((byte & 0x7f) as usize)
            .checked_shl(self.shift)
            .and_then(|res| res.checked_add(self.value))
            .ok_or(HpackError::InvalidInteger)?;
        self.shift += 7;
        match (byte & 0x80) == 0x00 {
            true => Ok(Some(self.value)),
            false => Ok(None),
        }
    }
}

/// Decodes a prefixed integer from the front of `buf`, using the low
/// `prefix_bits` bits of the first byte. Returns the value and the number of
/// bytes consumed.
///
/// An empty buffer yields `InsufficientInput`. A continuation that runs past
/// the end of `buf` or past `MAX_CONTINUATION_BYTES` yields `InvalidInteger`.
pub(crate) fn decode_integer(buf: &[u8], prefix_bits: u8) -> Result<(usize, usize), HpackError> {
    let (first, rest) = buf.split_first().ok_or(HpackError::InsufficientInput)?;
    let mut decoder = match IntegerDecoder::first_byte(*first, prefix_mask(prefix_bits)) {
        Ok(value) => return Ok((value, 1)),
        Err(decoder) => decoder,
    };
    for (idx, byte) in rest.iter().enumerate() {
        if let Some(value) = decoder.next_byte(*byte)? {
            return Ok((value, idx + 2));
        }
    }
    Err(HpackError::InvalidInteger)
}

/// `IntegerEncoder` implementation according to `Pseudocode to represent an
/// integer I` in `RFC7541 section-5.1`.
///
/// # Pseudocode
/// ```text
/// if I < 2^N - 1, encode I on N bits
/// else
///     encode (2^N - 1) on N bits
///     I = I - (2^N - 1)
///     while I >= 128
///          encode (I % 128 + 128) on 8 bits
///          I = I / 128
///     encode I on 8 bits
/// ```
pub(crate) struct IntegerEncoder {
    i: usize,
    mask: u8,
    pre: u8,
    state: IntegerEncodeState,
}

/// Enumeration of states that the `IntegerEncoder` needs to use.
enum IntegerEncodeState {
    First,
    Other,
    Finish,
}

impl IntegerEncoder {
    /// Creates a new `IntegerEncoder`. `pre` holds the pattern bits that sit
    /// above the prefix in the first byte.
    pub(crate) fn new(i: usize, mask: u8, pre: u8) -> Self {
        Self {
            i,
            mask,
            pre,
            state: IntegerEncodeState::First,
        }
    }

    /// Gets the next byte of the integer. If no remaining bytes are calculated,
    /// return `None`.
    pub(crate) fn next_byte(&mut self) -> Option<u8> {
        match self.state {
            IntegerEncodeState::First => {
                if self.i < self.mask as usize {
                    self.state = IntegerEncodeState::Finish;
                    return Some(self.pre | (self.i as u8));
                }
                self.i -= self.mask as usize;
                self.state = IntegerEncodeState::Other;
                Some(self.pre | self.mask)
            }
            IntegerEncodeState::Other => Some(if self.i >= 128 {
                let res = (self.i & 0x7f) as u8;
                self.i >>= 7;
                res | 0x80
            } else {
                self.state = IntegerEncodeState::Finish;
                (self.i & 0x7f) as u8
            }),
            IntegerEncodeState::Finish => None,
        }
    }

    /// Checks if calculation is over.
    pub(crate) fn is_finish(&self) -> bool {
        matches!(self.state, IntegerEncodeState::Finish)
    }
}

/// Encodes `value` as a prefixed integer into the front of `dst`. The bits of
/// `pattern` above the prefix are kept in the first byte. Returns the number
/// of bytes written, or `InsufficientOutput` if `dst` is too short.
pub(crate) fn encode_integer(
    value: usize,
    prefix_bits: u8,
    pattern: u8,
    dst: &mut [u8],
) -> Result<usize, HpackError> {
    let mask = prefix_mask(prefix_bits);
    let mut encoder = IntegerEncoder::new(value, mask, pattern & !mask);
    let mut written = 0;
    while let Some(byte) = encoder.next_byte() {
        let slot = dst.get_mut(written).ok_or(HpackError::InsufficientOutput)?;
        *slot = byte;
        written += 1;
    }
    debug_assert!(encoder.is_finish());
    Ok(written)
}

fn prefix_mask(prefix_bits: u8) -> u8 {
    debug_assert!((1..=8).contains(&prefix_bits));
    (0xffu16 >> (8 - prefix_bits as u16)) as u8
}
