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

//! `ylong_hpack` provides [HPACK], the header compression format of `HTTP/2`.
//!
//! [HPACK]: https://httpwg.org/specs/rfc7541.html
//!
//! # Introduction
//! HPACK turns a list of header fields into compact bytes with three tools: a
//! predefined static table of common fields, a per-connection dynamic table of
//! recently seen fields, and a canonical Huffman code for strings.
//!
//! - [`Hpack`] is a compression context. It decodes header fields one at a
//!   time and can encode fields against its dynamic table.
//! - [`encode_header`], [`encode_status`] and [`encode_content_length`] encode
//!   fields without touching any dynamic table.
//! - [`HpackLibrary`] creates contexts that share settings and, optionally,
//!   the storage of equal dynamic table entries.
//!
//! Strings are always encoded raw. Huffman-coded strings are decoded.
//!
//! # Examples
//!
//! ```
//! use ylong_hpack::{encode_header, Hpack};
//!
//! let mut buf = [0u8; 64];
//! let len = encode_header(b"Content-Type", b"text/plain", &mut buf).unwrap();
//!
//! let mut hpack = Hpack::new(4096);
//! let field = hpack.decode_header(&buf[..len]).unwrap().field().unwrap();
//! assert_eq!(field.name(), b"content-type");
//! assert_eq!(field.value(), b"text/plain");
//! ```

mod context;
mod error;
mod huffman;
mod integer;
mod library;
mod representation;
mod string;
mod table;

pub(crate) mod util;

pub use context::{Decoded, HeaderField, Hpack, DEFAULT_HUFFMAN_LIMIT, DEFAULT_MAX_SIZE};
pub use error::{strerror, HpackError};
pub use library::{HpackLibrary, LibraryBuilder};
pub use representation::{encode_content_length, encode_header, encode_status};
pub use table::entry::{DynamicEntry, Entry, EntrySource, ExclusiveSource};
pub use table::registry::{SharedEntry, SharedRegistry};
