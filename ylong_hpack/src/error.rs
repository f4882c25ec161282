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

//! Errors that may occur in this crate.
//!
//! Every fallible operation of the codec returns [`HpackError`]. Each variant
//! also has a stable negative integer code, so that callers which speak in
//! status codes can keep doing so through [`HpackError::code`] and
//! [`strerror`].
//!
//! [`HpackError`]: HpackError
//! [`HpackError::code`]: HpackError::code
//! [`strerror`]: strerror

use core::fmt::{Display, Formatter};
use std::error::Error;

/// Errors that may occur when encoding or decoding header fields.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum HpackError {
    /// Storage for a table entry could not be allocated.
    OutOfMemory,
    /// The input ended before a complete representation was read. The caller
    /// may retry with more bytes from the same offset.
    InsufficientInput,
    /// The output buffer is too small for the representation.
    InsufficientOutput,
    /// A prefixed integer is malformed or exceeds the continuation limit.
    InvalidInteger,
    /// A Huffman-coded string is malformed.
    InvalidHuffmanSequence,
    /// An entry is larger than the dynamic table capacity.
    EntryTooLarge,
    /// An index refers to no existing table slot.
    InvalidDynamicIndex,
}

impl HpackError {
    const ALL: [HpackError; 7] = [
        HpackError::OutOfMemory,
        HpackError::InsufficientInput,
        HpackError::InsufficientOutput,
        HpackError::InvalidInteger,
        HpackError::InvalidHuffmanSequence,
        HpackError::EntryTooLarge,
        HpackError::InvalidDynamicIndex,
    ];

    /// Gets the integer code of this error. All codes are negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use ylong_hpack::HpackError;
    ///
    /// assert_eq!(HpackError::OutOfMemory.code(), -1000);
    /// assert_eq!(HpackError::InvalidDynamicIndex.code(), -994);
    /// ```
    pub const fn code(self) -> i32 {
        match self {
            HpackError::OutOfMemory => -1000,
            HpackError::InsufficientInput => -999,
            HpackError::InsufficientOutput => -998,
            HpackError::InvalidInteger => -997,
            HpackError::InvalidHuffmanSequence => -996,
            HpackError::EntryTooLarge => -995,
            HpackError::InvalidDynamicIndex => -994,
        }
    }

    /// Converts an integer code back into an `HpackError`. Returns `None` for
    /// codes that do not name an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use ylong_hpack::HpackError;
    ///
    /// assert_eq!(HpackError::from_code(-999), Some(HpackError::InsufficientInput));
    /// assert_eq!(HpackError::from_code(0), None);
    /// ```
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|err| err.code() == code)
    }

    /// Gets a short human-readable description of this error.
    pub const fn description(self) -> &'static str {
        match self {
            HpackError::OutOfMemory => "not enough memory",
            HpackError::InsufficientInput => "not enough input",
            HpackError::InsufficientOutput => "not enough output",
            HpackError::InvalidInteger => "invalid decode int",
            HpackError::InvalidHuffmanSequence => "invalid decode huffman",
            HpackError::EntryTooLarge => "too long push entry",
            HpackError::InvalidDynamicIndex => "invalid dynamic index",
        }
    }
}

impl Display for HpackError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(HpackError::description(*self))
    }
}

impl Error for HpackError {}

/// Maps an integer status code to a message.
///
/// Known error codes get their own message, any other negative value is
/// reported as an invalid error code, and non-negative values mean success.
///
/// # Examples
///
/// ```
/// use ylong_hpack::strerror;
///
/// assert_eq!(strerror(-998), "not enough output");
/// assert_eq!(strerror(-1), "invalid error code");
/// assert_eq!(strerror(12), "OK");
/// ```
pub fn strerror(code: i32) -> &'static str {
    match HpackError::from_code(code) {
        Some(err) => err.description(),
        None if code < 0 => "invalid error code",
        None => "OK",
    }
}
