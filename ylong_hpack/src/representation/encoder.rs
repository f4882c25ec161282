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

use std::borrow::Cow;

use crate::error::HpackError;
use crate::integer::encode_integer;
use crate::representation::PrefixBit;
use crate::string::encode_string;
use crate::table::static_table::StaticTable;

/// Header name used by [`encode_status`].
const STATUS: &[u8] = b":status";
/// Header name used by [`encode_content_length`].
const CONTENT_LENGTH: &[u8] = b"content-length";

/// Encodes one header field into `dst` without any dynamic table.
///
/// The name is lowercased. If the static table knows the name, its index is
/// written, otherwise the name is written as a literal. The value is always a
/// literal. No representation produced here changes a peer's dynamic table.
///
/// Returns the number of bytes written, or `InsufficientOutput` if `dst` is too
/// short.
///
/// # Examples
///
/// ```
/// use ylong_hpack::encode_header;
///
/// let mut buf = [0u8; 32];
/// let len = encode_header(b"Accept", b"*/*", &mut buf).unwrap();
/// assert_eq!(&buf[..len], &[0x0f, 0x04, 0x03, b'*', b'/', b'*']);
/// ```
pub fn encode_header(name: &[u8], value: &[u8], dst: &mut [u8]) -> Result<usize, HpackError> {
    let name = to_lowercase(name);
    match StaticTable::index_of_name(&name) {
        Some(index) => {
            Indexing::new(PrefixBit::LITERAL_WITHOUT_INDEXING, index, value).encode(dst)
        }
        None => {
            IndexingWithName::new(PrefixBit::LITERAL_WITHOUT_INDEXING, &name, value).encode(dst)
        }
    }
}

/// Encodes a `:status` header field into `dst`.
///
/// Status codes present in the static table take one byte. Any other status
/// is encoded like [`encode_header`] would.
///
/// # Examples
///
/// ```
/// use ylong_hpack::encode_status;
///
/// let mut buf = [0u8; 8];
/// assert_eq!(encode_status(200, &mut buf), Ok(1));
/// assert_eq!(buf[0], 0x88);
/// ```
pub fn encode_status(status: u16, dst: &mut [u8]) -> Result<usize, HpackError> {
    let mut digits = [0u8; 20];
    let value = decimal(status as u64, &mut digits);
    match StaticTable::index_of(STATUS, value) {
        Some(index) => Indexed::new(index).encode(dst),
        None => encode_header(STATUS, value, dst),
    }
}

/// Encodes a `content-length` header field into `dst`. The output is the same
/// as `encode_header(b"content-length", len.to_string().as_bytes(), dst)`.
pub fn encode_content_length(len: u64, dst: &mut [u8]) -> Result<usize, HpackError> {
    let mut digits = [0u8; 20];
    let value = decimal(len, &mut digits);
    encode_header(CONTENT_LENGTH, value, dst)
}

/// Lowercases ASCII letters of a header name, borrowing when there is nothing
/// to change.
pub(crate) fn to_lowercase(name: &[u8]) -> Cow<'_, [u8]> {
    match name.iter().any(u8::is_ascii_uppercase) {
        true => Cow::Owned(name.to_ascii_lowercase()),
        false => Cow::Borrowed(name),
    }
}

/// Formats `value` in decimal into the tail of `buf`.
fn decimal(mut value: u64, buf: &mut [u8; 20]) -> &[u8] {
    let mut start = buf.len();
    loop {
        start -= 1;
        buf[start] = b'0' + (value % 10) as u8;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    &buf[start..]
}

/// `Indexed Header Field`, a single index into the static or dynamic table.
pub(crate) struct Indexed {
    index: usize,
}

impl Indexed {
    pub(crate) fn new(index: usize) -> Self {
        Self { index }
    }

    pub(crate) fn encode(&self, dst: &mut [u8]) -> Result<usize, HpackError> {
        let repr = PrefixBit::INDEXED;
        let prefix = repr.prefix_index_mask().prefix_bits();
        encode_integer(self.index, prefix, repr.bits(), dst)
    }
}

/// A literal header field whose name is an index.
pub(crate) struct Indexing<'a> {
    repr: PrefixBit,
    index: usize,
    value: &'a [u8],
}

impl<'a> Indexing<'a> {
    pub(crate) fn new(repr: PrefixBit, index: usize, value: &'a [u8]) -> Self {
        Self { repr, index, value }
    }

    pub(crate) fn encode(&self, dst: &mut [u8]) -> Result<usize, HpackError> {
        let prefix = self.repr.prefix_index_mask().prefix_bits();
        let head = encode_integer(self.index, prefix, self.repr.bits(), dst)?;
        let tail = encode_string(self.value, &mut dst[head..])?;
        Ok(head + tail)
    }
}

/// A literal header field whose name is a literal too.
pub(crate) struct IndexingWithName<'a> {
    repr: PrefixBit,
    name: &'a [u8],
    value: &'a [u8],
}

impl<'a> IndexingWithName<'a> {
    pub(crate) fn new(repr: PrefixBit, name: &'a [u8], value: &'a [u8]) -> Self {
        Self { repr, name, value }
    }

    pub(crate) fn encode(&self, dst: &mut [u8]) -> Result<usize, HpackError> {
        let prefix = self.repr.prefix_index_mask().prefix_bits();
        let mut len = encode_integer(0, prefix, self.repr.bits(), dst)?;
        len += encode_string(self.name, &mut dst[len..])?;
        len += encode_string(self.value, &mut dst[len..])?;
        Ok(len)
    }
}
