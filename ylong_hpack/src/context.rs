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

//! Per-connection compression context.

use core::fmt::{Debug, Formatter};
use std::sync::Arc;

use tracing::debug;

use crate::error::HpackError;
use crate::representation::{
    to_lowercase, Indexed, Indexing, IndexingWithName, Name, PrefixBit, ReprDecoder,
    Representation,
};
use crate::string::Literal;
use crate::table::dynamic::DynamicTable;
use crate::table::entry::{entry_size, EntrySource};
use crate::table::static_table::{StaticTable, STATIC_TABLE_LEN};
use crate::table::{TableIndex, TableSearcher};

/// Default maximum size of a dynamic table, in octets.
pub const DEFAULT_MAX_SIZE: usize = 4096;

/// Default bound on the decoded length of one Huffman string, in octets.
pub const DEFAULT_HUFFMAN_LIMIT: usize = 4096;

/// An HPACK compression context, holding the dynamic table of one side of a
/// connection.
///
/// Header fields are decoded one at a time with [`Hpack::decode_header`].
/// Decoded names and values borrow either the input or this context, so they
/// stay valid until the next call that mutates the context.
///
/// # Examples
///
/// ```
/// use ylong_hpack::{Decoded, Hpack};
///
/// let mut hpack = Hpack::new(4096);
/// match hpack.decode_header(&[0x82]).unwrap() {
///     Decoded::Header { field, consumed } => {
///         assert_eq!(field.name(), b":method");
///         assert_eq!(field.value(), b"GET");
///         assert_eq!(consumed, 1);
///     }
///     Decoded::SizeUpdate { .. } => unreachable!(),
/// }
/// ```
pub struct Hpack {
    table: DynamicTable,
    scratch: Vec<u8>,
    huffman_limit: usize,
    max_size_limit: usize,
}

impl Hpack {
    /// Creates a context whose dynamic table holds at most `max_size` octets.
    /// Entries of this context are never shared with other contexts.
    ///
    /// `max_size` is also the ceiling for size updates sent by the peer, the
    /// value advertised as `SETTINGS_HEADER_TABLE_SIZE`.
    pub fn new(max_size: usize) -> Self {
        Self {
            table: DynamicTable::with_max_size(max_size),
            scratch: Vec::new(),
            huffman_limit: DEFAULT_HUFFMAN_LIMIT,
            max_size_limit: max_size,
        }
    }

    pub(crate) fn with_source(
        max_size: usize,
        source: Arc<dyn EntrySource>,
        huffman_limit: usize,
    ) -> Self {
        Self {
            table: DynamicTable::with_source(max_size, source),
            scratch: Vec::new(),
            huffman_limit,
            max_size_limit: max_size,
        }
    }

    /// Gets the maximum size of the dynamic table.
    pub fn max_size(&self) -> usize {
        self.table.max_size()
    }

    /// Gets the largest maximum size a decoded size update may set.
    pub fn max_size_limit(&self) -> usize {
        self.max_size_limit
    }

    /// Gets the current size of the dynamic table, the sum of the sizes of its
    /// entries.
    pub fn size(&self) -> usize {
        self.table.curr_size()
    }

    /// Gets the number of entries in the dynamic table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Checks whether the dynamic table is empty.
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Sets the maximum size of the dynamic table. Entries that no longer fit
    /// are evicted, oldest first. The new size is also the new ceiling for
    /// decoded size updates.
    ///
    /// # Examples
    ///
    /// ```
    /// use ylong_hpack::Hpack;
    ///
    /// let mut hpack = Hpack::new(4096);
    /// let mut buf = [0u8; 64];
    /// hpack.encode_header(b"x-custom", b"1", &mut buf).unwrap();
    /// assert_eq!(hpack.len(), 1);
    ///
    /// hpack.set_max_size(0);
    /// assert!(hpack.is_empty());
    /// assert_eq!(hpack.max_size_limit(), 0);
    /// ```
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size_limit = max_size;
        self.table.update_size(max_size);
    }

    /// Gets the header field at `index` of the static or dynamic table.
    pub fn get(&self, index: usize) -> Result<HeaderField<'_>, HpackError> {
        TableSearcher::new(&self.table)
            .search_header(index)
            .map(|(name, value)| HeaderField::new(name, value, false))
    }

    /// Decodes one header field representation from the front of `buf`.
    ///
    /// A literal with incremental indexing is added to the dynamic table. A
    /// field too large for the table is still returned, the table is just left
    /// unchanged. A dynamic table size update changes the maximum size and
    /// produces no field. An update above `max_size_limit` is rejected with
    /// `InvalidInteger` and leaves the table unchanged.
    ///
    /// `InsufficientInput` means `buf` ends inside the representation. Nothing
    /// is changed in that case, so decoding may be retried from the same
    /// offset with more bytes. A prefixed integer cut short is reported as
    /// `InvalidInteger` instead.
    pub fn decode_header<'a>(&'a mut self, buf: &'a [u8]) -> Result<Decoded<'a>, HpackError> {
        self.scratch.clear();
        let mut decoder = ReprDecoder::new(buf, self.huffman_limit);
        let repr = decoder
            .decode(&mut self.scratch)
            .map_err(|e| log_decode_error(e, buf.len()))?;
        let consumed = decoder.consumed();

        let (name, value, never_indexed) = match repr {
            Representation::Indexed { index } => {
                let (name, value) = TableSearcher::new(&self.table)
                    .search_header(index)
                    .map_err(|e| log_decode_error(e, buf.len()))?;
                let field = HeaderField::new(name, value, false);
                return Ok(Decoded::Header { field, consumed });
            }
            Representation::SizeUpdate { max_size } => {
                if max_size > self.max_size_limit {
                    debug!(
                        max_size,
                        limit = self.max_size_limit,
                        "hpack size update above limit"
                    );
                    return Err(HpackError::InvalidInteger);
                }
                self.table.update_size(max_size);
                return Ok(Decoded::SizeUpdate { max_size, consumed });
            }
            Representation::LiteralWithIndexing { name, value } => {
                let name = self.name_octets(name)?;
                let scratch = self.scratch.as_slice();
                match self
                    .table
                    .insert(name.resolve(buf, scratch), value.resolve(buf, scratch))
                {
                    Ok(()) | Err(HpackError::EntryTooLarge) => {}
                    Err(e) => return Err(e),
                }
                (name, value, false)
            }
            Representation::LiteralWithoutIndexing { name, value } => {
                (self.name_octets(name)?, value, false)
            }
            Representation::LiteralNeverIndexed { name, value } => {
                (self.name_octets(name)?, value, true)
            }
        };

        let scratch = self.scratch.as_slice();
        let field = HeaderField::new(
            name.resolve(buf, scratch),
            value.resolve(buf, scratch),
            never_indexed,
        );
        Ok(Decoded::Header { field, consumed })
    }

    /// Encodes one header field into `dst`, using and updating the dynamic
    /// table of this context.
    ///
    /// The name is lowercased. A field already in the dynamic table becomes a
    /// single index. A name known to the static table is written as an index
    /// followed by the literal value, without indexing. Any other field is
    /// written with both name and value as literals and added to the dynamic
    /// table, unless it is too large for the table.
    ///
    /// Returns the number of bytes written. On `InsufficientOutput` the
    /// dynamic table is not changed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ylong_hpack::Hpack;
    ///
    /// let mut hpack = Hpack::new(4096);
    /// let mut buf = [0u8; 64];
    /// let first = hpack.encode_header(b"x-request-id", b"42", &mut buf).unwrap();
    /// assert_eq!(first, 17);
    ///
    /// let second = hpack.encode_header(b"x-request-id", b"42", &mut buf).unwrap();
    /// assert_eq!(&buf[..second], &[0xbe]);
    /// ```
    pub fn encode_header(
        &mut self,
        name: &[u8],
        value: &[u8],
        dst: &mut [u8],
    ) -> Result<usize, HpackError> {
        let name = to_lowercase(name);
        match TableSearcher::new(&self.table).index(&name, value) {
            Some(TableIndex::Header(index)) => Indexed::new(index).encode(dst),
            Some(TableIndex::HeaderName(index)) => {
                Indexing::new(PrefixBit::LITERAL_WITHOUT_INDEXING, index, value).encode(dst)
            }
            None if entry_size(&name, value) <= self.table.max_size() => {
                let len = IndexingWithName::new(PrefixBit::LITERAL_WITH_INDEXING, &name, value)
                    .encode(dst)?;
                self.table.insert(&name, value)?;
                Ok(len)
            }
            None => {
                IndexingWithName::new(PrefixBit::LITERAL_WITHOUT_INDEXING, &name, value).encode(dst)
            }
        }
    }

    /// Locates the name of a literal representation. Names taken from the
    /// dynamic table are copied into the scratch buffer, since an insertion
    /// may evict the entry they come from.
    fn name_octets(&mut self, name: Name) -> Result<Octets, HpackError> {
        match name {
            Name::Literal(literal) => Ok(Octets::Literal(literal)),
            Name::Index(index) if index <= STATIC_TABLE_LEN => StaticTable::get(index)
                .map(|entry| Octets::Static(entry.name()))
                .ok_or(HpackError::InvalidDynamicIndex),
            Name::Index(index) => {
                let name = TableSearcher::new(&self.table).search_header_name(index)?;
                let start = self.scratch.len();
                self.scratch.extend_from_slice(name);
                Ok(Octets::Literal(Literal::Scratch(start..self.scratch.len())))
            }
        }
    }
}

impl Default for Hpack {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}

impl Debug for Hpack {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hpack")
            .field("size", &self.size())
            .field("max_size", &self.max_size())
            .field("max_size_limit", &self.max_size_limit)
            .field("entries", &self.len())
            .finish()
    }
}

fn log_decode_error(err: HpackError, available: usize) -> HpackError {
    if err != HpackError::InsufficientInput {
        debug!(error = %err, available, "hpack decode failed");
    }
    err
}

/// Octets of a decoded name.
enum Octets {
    Static(&'static [u8]),
    Literal(Literal),
}

impl Octets {
    fn resolve<'a>(&self, input: &'a [u8], scratch: &'a [u8]) -> &'a [u8] {
        match self {
            Octets::Static(name) => name,
            Octets::Literal(literal) => literal.resolve(input, scratch),
        }
    }
}

/// A decoded header field. Name and value borrow the input buffer or the
/// context that decoded them.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct HeaderField<'a> {
    name: &'a [u8],
    value: &'a [u8],
    never_indexed: bool,
}

impl<'a> HeaderField<'a> {
    fn new(name: &'a [u8], value: &'a [u8], never_indexed: bool) -> Self {
        Self {
            name,
            value,
            never_indexed,
        }
    }

    /// Gets the name of this field.
    pub fn name(&self) -> &'a [u8] {
        self.name
    }

    /// Gets the value of this field.
    pub fn value(&self) -> &'a [u8] {
        self.value
    }

    /// Checks whether this field was sent as a never-indexed literal. Such
    /// fields should be re-encoded the same way by intermediaries.
    pub fn is_never_indexed(&self) -> bool {
        self.never_indexed
    }
}

impl Debug for HeaderField<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HeaderField")
            .field("name", &String::from_utf8_lossy(self.name))
            .field("value", &String::from_utf8_lossy(self.value))
            .field("never_indexed", &self.never_indexed)
            .finish()
    }
}

/// Result of [`Hpack::decode_header`].
///
/// [`Hpack::decode_header`]: Hpack::decode_header
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decoded<'a> {
    /// A header field was decoded.
    Header {
        field: HeaderField<'a>,
        consumed: usize,
    },
    /// The maximum size of the dynamic table was changed.
    SizeUpdate { max_size: usize, consumed: usize },
}

impl<'a> Decoded<'a> {
    /// Gets the number of bytes consumed from the input.
    pub fn consumed(&self) -> usize {
        match self {
            Decoded::Header { consumed, .. } | Decoded::SizeUpdate { consumed, .. } => *consumed,
        }
    }

    /// Gets the decoded field, `None` for a size update.
    pub fn field(&self) -> Option<HeaderField<'a>> {
        match self {
            Decoded::Header { field, .. } => Some(*field),
            Decoded::SizeUpdate { .. } => None,
        }
    }
}

#[cfg(test)]
mod ut_hpack {
    use crate::context::{Decoded, Hpack};
    use crate::error::HpackError;
    use crate::util::test_util::decode;

    /// Decodes every representation of a header block.
    fn decode_block(hpack: &mut Hpack, hex: &str) -> Vec<(Vec<u8>, Vec<u8>)> {
        let buf = decode(hex).unwrap();
        let mut fields = Vec::new();
        let mut pos = 0;
        while pos < buf.len() {
            let decoded = hpack.decode_header(&buf[pos..]).unwrap();
            if let Some(field) = decoded.field() {
                fields.push((field.name().to_vec(), field.value().to_vec()));
            }
            pos += decoded.consumed();
        }
        fields
    }

    macro_rules! hpack_test_case {
        ($hpack: expr, $hex: expr, { $($n: expr => $v: expr),* $(,)? }) => {
            let fields = decode_block(&mut $hpack, $hex);
            let expect: Vec<(Vec<u8>, Vec<u8>)> =
                vec![$(($n.as_bytes().to_vec(), $v.as_bytes().to_vec())),*];
            assert_eq!(fields, expect);
        };
    }

    macro_rules! check_table {
        ($hpack: expr, $size: expr, { $($index: expr => ($n: expr, $v: expr)),* $(,)? }) => {
            assert_eq!($hpack.size(), $size);
            let mut count = 0;
            $(
                let field = $hpack.get($index).unwrap();
                assert_eq!(field.name(), $n.as_bytes());
                assert_eq!(field.value(), $v.as_bytes());
                count += 1;
            )*
            assert_eq!($hpack.len(), count);
        };
    }

    /// UT test cases for `Hpack::decode_header` with the request examples of
    /// RFC7541.
    ///
    /// # Brief
    /// 1. Decodes C.3 (raw strings) and C.4 (Huffman strings) header blocks
    ///    in order, each sequence with its own context.
    /// 2. Checks the decoded fields and the dynamic table after each block.
    #[test]
    fn ut_hpack_decode_requests() {
        for blocks in [
            [
                "828684410f7777772e6578616d706c652e636f6d",
                "828684be58086e6f2d6361636865",
                "828785bf400a637573746f6d2d6b65790c637573746f6d2d76616c7565",
            ],
            [
                "828684418cf1e3c2e5f23a6ba0ab90f4ff",
                "828684be5886a8eb10649cbf",
                "828785bf408825a849e95ba97d7f8925a849e95bb8e8b4bf",
            ],
        ] {
            let mut hpack = Hpack::new(4096);

            // First Request
            hpack_test_case!(hpack, blocks[0], {
                ":method" => "GET",
                ":scheme" => "http",
                ":path" => "/",
                ":authority" => "www.example.com",
            });
            check_table!(hpack, 57, {
                62 => (":authority", "www.example.com"),
            });

            // Second Request
            hpack_test_case!(hpack, blocks[1], {
                ":method" => "GET",
                ":scheme" => "http",
                ":path" => "/",
                ":authority" => "www.example.com",
                "cache-control" => "no-cache",
            });
            check_table!(hpack, 110, {
                62 => ("cache-control", "no-cache"),
                63 => (":authority", "www.example.com"),
            });

            // Third Request
            hpack_test_case!(hpack, blocks[2], {
                ":method" => "GET",
                ":scheme" => "https",
                ":path" => "/index.html",
                ":authority" => "www.example.com",
                "custom-key" => "custom-value",
            });
            check_table!(hpack, 164, {
                62 => ("custom-key", "custom-value"),
                63 => ("cache-control", "no-cache"),
                64 => (":authority", "www.example.com"),
            });
        }
    }

    /// UT test cases for `Hpack::decode_header` with the response examples of
    /// RFC7541.
    ///
    /// # Brief
    /// 1. Decodes C.5 (raw strings) and C.6 (Huffman strings) header blocks
    ///    with a dynamic table of 256 octets.
    /// 2. Checks the decoded fields, the evictions and the dynamic table
    ///    after each block.
    #[test]
    fn ut_hpack_decode_responses() {
        for blocks in [
            [
                "4803333032580770726976617465611d4d6f6e2c203231204f637420323031332032303a31333a32\
                 3120474d546e1768747470733a2f2f7777772e6578616d706c652e636f6d",
                "4803333037c1c0bf",
                "88c1611d4d6f6e2c203231204f637420323031332032303a31333a323220474d54c05a04677a6970\
                 7738666f6f3d4153444a4b48514b425a584f5157454f50495541585157454f49553b206d61782d61\
                 67653d333630303b2076657273696f6e3d31",
            ],
            [
                "488264025885aec3771a4b6196d07abe941054d444a8200595040b8166e082a62d1bff6e919d29ad\
                 171863c78f0b97c8e9ae82ae43d3",
                "4883640effc1c0bf",
                "88c16196d07abe941054d444a8200595040b8166e084a62d1bffc05a839bd9ab77ad94e7821dd7f2\
                 e6c7b335dfdfcd5b3960d5af27087f3672c1ab270fb5291f9587316065c003ed4ee5b1063d5007",
            ],
        ] {
            let mut hpack = Hpack::new(256);

            // First Response
            hpack_test_case!(hpack, blocks[0], {
                ":status" => "302",
                "cache-control" => "private",
                "date" => "Mon, 21 Oct 2013 20:13:21 GMT",
                "location" => "https://www.example.com",
            });
            check_table!(hpack, 222, {
                62 => ("location", "https://www.example.com"),
                63 => ("date", "Mon, 21 Oct 2013 20:13:21 GMT"),
                64 => ("cache-control", "private"),
                65 => (":status", "302"),
            });

            // Second Response
            hpack_test_case!(hpack, blocks[1], {
                ":status" => "307",
                "cache-control" => "private",
                "date" => "Mon, 21 Oct 2013 20:13:21 GMT",
                "location" => "https://www.example.com",
            });
            check_table!(hpack, 222, {
                62 => (":status", "307"),
                63 => ("location", "https://www.example.com"),
                64 => ("date", "Mon, 21 Oct 2013 20:13:21 GMT"),
                65 => ("cache-control", "private"),
            });

            // Third Response
            hpack_test_case!(hpack, blocks[2], {
                ":status" => "200",
                "cache-control" => "private",
                "date" => "Mon, 21 Oct 2013 20:13:22 GMT",
                "location" => "https://www.example.com",
                "content-encoding" => "gzip",
                "set-cookie" => "foo=ASDJKHQKBZXOQWEOPIUAXQWEOIU; max-age=3600; version=1",
            });
            check_table!(hpack, 215, {
                62 => ("set-cookie", "foo=ASDJKHQKBZXOQWEOPIUAXQWEOIU; max-age=3600; version=1"),
                63 => ("content-encoding", "gzip"),
                64 => ("date", "Mon, 21 Oct 2013 20:13:22 GMT"),
            });
        }
    }

    /// UT test cases for decoding a single indexed field.
    ///
    /// # Brief
    /// 1. Decodes `0x82` with an empty context.
    /// 2. Checks the field, the consumed length and that the table is empty.
    #[test]
    fn ut_hpack_decode_indexed() {
        let mut hpack = Hpack::default();
        let decoded = hpack.decode_header(&[0x82, 0x86]).unwrap();
        assert_eq!(decoded.consumed(), 1);
        let field = decoded.field().unwrap();
        assert_eq!(field.name(), b":method");
        assert_eq!(field.value(), b"GET");
        assert!(!field.is_never_indexed());
        assert!(hpack.is_empty());

        // Static entries without a value decode to an empty value.
        let field = hpack.decode_header(&[0x81]).unwrap().field().unwrap();
        assert_eq!(field.name(), b":authority");
        assert_eq!(field.value(), b"");

        assert_eq!(hpack.decode_header(&[0x80]), Err(HpackError::InvalidDynamicIndex));
        assert_eq!(hpack.decode_header(&[0xbe]), Err(HpackError::InvalidDynamicIndex));
        assert_eq!(hpack.decode_header(&[]), Err(HpackError::InsufficientInput));
    }

    /// UT test cases for dynamic table size updates.
    ///
    /// # Brief
    /// 1. Fills a table, then decodes size updates to smaller sizes.
    /// 2. Checks the reported size and the evictions.
    #[test]
    fn ut_hpack_decode_size_update() {
        let mut hpack = Hpack::new(4096);
        decode_block(
            &mut hpack,
            "828684410f7777772e6578616d706c652e636f6d828684be58086e6f2d6361636865",
        );
        assert_eq!(hpack.size(), 110);

        // 0x3f 0x61 is a size update to 31 + 97 = 128.
        let decoded = hpack.decode_header(&[0x3f, 0x61]).unwrap();
        assert_eq!(
            decoded,
            Decoded::SizeUpdate {
                max_size: 128,
                consumed: 2
            }
        );
        assert_eq!(decoded.field(), None);
        assert_eq!(hpack.max_size(), 128);
        check_table!(hpack, 53, {
            62 => ("cache-control", "no-cache"),
        });

        let decoded = hpack.decode_header(&[0x20]).unwrap();
        assert_eq!(decoded.consumed(), 1);
        assert_eq!(hpack.max_size(), 0);
        assert!(hpack.is_empty());
        assert_eq!(hpack.size(), 0);
    }

    /// UT test cases for size updates above the negotiated limit.
    ///
    /// # Brief
    /// 1. Decodes size updates larger than the size the context was created
    ///    with.
    /// 2. Checks that they fail with `InvalidInteger` and leave the table as
    ///    it was.
    /// 3. Checks that an update to exactly the limit succeeds, and that
    ///    `set_max_size` moves the limit.
    #[test]
    fn ut_hpack_decode_size_update_limit() {
        let mut hpack = Hpack::new(4096);
        decode_block(&mut hpack, "400a637573746f6d2d6b65790d637573746f6d2d686561646572");
        assert_eq!(hpack.size(), 55);
        assert_eq!(hpack.max_size_limit(), 4096);

        // 31 + 268435425 = 268435456.
        assert_eq!(
            hpack.decode_header(&[0x3f, 0xe1, 0xff, 0xff, 0x7f]),
            Err(HpackError::InvalidInteger)
        );
        // 31 + 4066 = 4097.
        assert_eq!(
            hpack.decode_header(&[0x3f, 0xe2, 0x1f]),
            Err(HpackError::InvalidInteger)
        );
        assert_eq!(hpack.max_size(), 4096);
        check_table!(hpack, 55, {
            62 => ("custom-key", "custom-header"),
        });

        // 31 + 4065 = 4096.
        let decoded = hpack.decode_header(&[0x3f, 0xe1, 0x1f]).unwrap();
        assert_eq!(
            decoded,
            Decoded::SizeUpdate {
                max_size: 4096,
                consumed: 3
            }
        );

        hpack.set_max_size(8192);
        assert_eq!(hpack.max_size_limit(), 8192);
        let decoded = hpack.decode_header(&[0x3f, 0xe2, 0x1f]).unwrap();
        assert_eq!(decoded.consumed(), 3);
        assert_eq!(hpack.max_size(), 4097);
    }

    /// UT test cases for truncated input.
    ///
    /// # Brief
    /// 1. Decodes every proper prefix of a literal with incremental indexing.
    /// 2. Checks that each fails with `InsufficientInput` without touching the
    ///    dynamic table, and that the full input then succeeds.
    #[test]
    fn ut_hpack_decode_insufficient_input() {
        let buf = decode("400a637573746f6d2d6b65790c637573746f6d2d76616c7565").unwrap();
        let mut hpack = Hpack::new(4096);
        for end in 0..buf.len() {
            assert_eq!(
                hpack.decode_header(&buf[..end]),
                Err(HpackError::InsufficientInput)
            );
            assert!(hpack.is_empty());
        }
        assert_eq!(hpack.decode_header(&buf).unwrap().consumed(), buf.len());
        check_table!(hpack, 54, {
            62 => ("custom-key", "custom-value"),
        });
    }

    /// UT test cases for literals whose name refers to a dynamic entry.
    ///
    /// # Brief
    /// 1. Inserts an entry, then decodes literals naming it by index,
    ///    including an insertion that evicts that very entry.
    /// 2. Checks the decoded names and the table.
    #[test]
    fn ut_hpack_decode_dynamic_name() {
        // Room for exactly one `custom-key` entry.
        let mut hpack = Hpack::new(60);
        decode_block(
            &mut hpack,
            "400a637573746f6d2d6b65790c637573746f6d2d76616c7565",
        );
        check_table!(hpack, 54, {
            62 => ("custom-key", "custom-value"),
        });

        // Without indexing, name index 62.
        let buf = [0x0f, 0x2f, 0x01, b'a'];
        let field = hpack.decode_header(&buf).unwrap().field().unwrap();
        assert_eq!(field.name(), b"custom-key");
        assert_eq!(field.value(), b"a");

        // With indexing, name index 62. The new entry evicts the old one.
        let buf = [0x7e, 0x01, b'b'];
        let field = hpack.decode_header(&buf).unwrap().field().unwrap();
        assert_eq!(field.name(), b"custom-key");
        assert_eq!(field.value(), b"b");
        check_table!(hpack, 43, {
            62 => ("custom-key", "b"),
        });

        let buf = [0x0f, 0x30, 0x01, b'a'];
        assert_eq!(hpack.decode_header(&buf), Err(HpackError::InvalidDynamicIndex));
    }

    /// UT test cases for never-indexed literals.
    ///
    /// # Brief
    /// 1. Decodes a never-indexed literal (RFC7541 C.2.3).
    /// 2. Checks the field, the flag and that the table is unchanged.
    #[test]
    fn ut_hpack_decode_never_indexed() {
        let mut hpack = Hpack::new(4096);
        let buf = decode("100870617373776f726406736563726574").unwrap();
        let decoded = hpack.decode_header(&buf).unwrap();
        assert_eq!(decoded.consumed(), 17);
        let field = decoded.field().unwrap();
        assert_eq!(field.name(), b"password");
        assert_eq!(field.value(), b"secret");
        assert!(field.is_never_indexed());
        assert!(hpack.is_empty());
    }

    /// UT test cases for decoding a field larger than the dynamic table.
    ///
    /// # Brief
    /// 1. Decodes a literal with incremental indexing into a small table.
    /// 2. Checks that the field is returned and the table is unchanged.
    #[test]
    fn ut_hpack_decode_entry_too_large() {
        let mut hpack = Hpack::new(57);
        decode_block(&mut hpack, "410f7777772e6578616d706c652e636f6d");
        check_table!(hpack, 57, {
            62 => (":authority", "www.example.com"),
        });

        let buf = decode("400a637573746f6d2d6b657911637573746f6d2d76616c75652d6c6f6e67").unwrap();
        let field = hpack.decode_header(&buf).unwrap().field().unwrap();
        assert_eq!(field.name(), b"custom-key");
        assert_eq!(field.value(), b"custom-value-long");
        check_table!(hpack, 57, {
            62 => (":authority", "www.example.com"),
        });
    }

    /// UT test cases for `Hpack::encode_header`.
    ///
    /// # Brief
    /// 1. Encodes fields with a context, repeating some of them.
    /// 2. Checks the bytes and the dynamic table of the encoder.
    #[test]
    fn ut_hpack_encode_header() {
        let mut hpack = Hpack::new(4096);
        let mut buf = [0u8; 64];

        // Static names are never indexed by value.
        let len = hpack.encode_header(b":method", b"GET", &mut buf).unwrap();
        assert_eq!(&buf[..len], &[0x02, 0x03, b'G', b'E', b'T']);
        assert!(hpack.is_empty());

        let len = hpack
            .encode_header(b"Custom-Key", b"custom-value", &mut buf)
            .unwrap();
        assert_eq!(
            &buf[..len],
            decode("400a637573746f6d2d6b65790c637573746f6d2d76616c7565")
                .unwrap()
                .as_slice()
        );
        check_table!(hpack, 54, {
            62 => ("custom-key", "custom-value"),
        });

        let len = hpack
            .encode_header(b"custom-key", b"custom-value", &mut buf)
            .unwrap();
        assert_eq!(&buf[..len], &[0xbe]);

        // Same name, other value: a new entry.
        let len = hpack.encode_header(b"custom-key", b"x", &mut buf).unwrap();
        assert_eq!(len, 14);
        assert_eq!(buf[0], 0x40);
        check_table!(hpack, 97, {
            62 => ("custom-key", "x"),
            63 => ("custom-key", "custom-value"),
        });
    }

    /// UT test cases for `Hpack::encode_header` failures.
    ///
    /// # Brief
    /// 1. Encodes into a short buffer and into a context with a small table.
    /// 2. Checks the errors and that the table is left unchanged.
    #[test]
    fn ut_hpack_encode_header_error() {
        let mut hpack = Hpack::new(4096);
        let mut buf = [0u8; 8];
        assert_eq!(
            hpack.encode_header(b"custom-key", b"custom-value", &mut buf),
            Err(HpackError::InsufficientOutput)
        );
        assert!(hpack.is_empty());

        // Too large for the table: written without indexing.
        let mut hpack = Hpack::new(40);
        let mut buf = [0u8; 64];
        let len = hpack
            .encode_header(b"custom-key", b"custom-value", &mut buf)
            .unwrap();
        assert_eq!(len, 25);
        assert_eq!(buf[0], 0x00);
        assert!(hpack.is_empty());
    }

    /// UT test cases for encoding with one context and decoding with another.
    ///
    /// # Brief
    /// 1. Encodes a header list twice with one context.
    /// 2. Decodes the output with a second context.
    /// 3. Checks the fields and that both dynamic tables agree.
    #[test]
    fn ut_hpack_encode_decode() {
        let fields: [(&str, &str); 5] = [
            (":method", "GET"),
            (":path", "/index.html"),
            ("user-agent", "ylong"),
            ("x-trace", "abc"),
            ("x-trace", "abc"),
        ];
        let mut encoder = Hpack::new(4096);
        let mut decoder = Hpack::new(4096);
        for _ in 0..2 {
            let mut buf = vec![0u8; 256];
            let mut len = 0;
            for (name, value) in fields {
                len += encoder
                    .encode_header(name.as_bytes(), value.as_bytes(), &mut buf[len..])
                    .unwrap();
            }
            let decoded = decode_block(&mut decoder, &hex(&buf[..len]));
            let expect: Vec<(Vec<u8>, Vec<u8>)> = fields
                .iter()
                .map(|(n, v)| (n.as_bytes().to_vec(), v.as_bytes().to_vec()))
                .collect();
            assert_eq!(decoded, expect);
            assert_eq!(encoder.size(), decoder.size());
            assert_eq!(encoder.len(), 1);
            assert_eq!(decoder.get(62), encoder.get(62));
        }
    }

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}
