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

//! [Huffman coding] decoder of [HPACK].
//!
//! [Huffman coding]: https://en.wikipedia.org/wiki/Huffman_coding
//! [HPACK]: https://httpwg.org/specs/rfc7541.html
//!
//! # Huffman code in HPACK
//! There is a table of Huffman code in `RFC7541`. This [Huffman code] was
//! generated from statistics obtained on a large sample of HTTP headers. It is
//! a canonical Huffman code with some tweaking to ensure that no symbol has a
//! unique code length.
//!
//! The decoder consumes the input four bits at a time. The transition table is
//! derived from [`HUFFMAN_CODES`] the first time it is needed and shared by the
//! whole process afterwards.
//!
//! [Huffman Code]: https://www.rfc-editor.org/rfc/rfc7541.html#ref-HUFFMAN
//! [`HUFFMAN_CODES`]: consts::HUFFMAN_CODES

mod consts;

use std::sync::OnceLock;

use consts::{EOS, HUFFMAN_CODES};

use crate::error::HpackError;

/// The current position may be the end of the string.
const MAYBE_EOS: u8 = 0x1;
/// A symbol was produced by this transition.
const DECODED: u8 = 0x2;
/// The transition hits the EOS symbol, which must never appear in a string.
const ERROR: u8 = 0x4;

/// `(next state, decoded byte, flags)`.
type DecodeCell = (u8, u8, u8);

type DecodeTable = [[DecodeCell; 16]; 256];

static HUFFMAN_DECODE: OnceLock<Box<DecodeTable>> = OnceLock::new();

/// Possible errors in Huffman decoding operations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum HuffmanDecodeError {
    InvalidHuffmanCode,
    OutputTooLong,
}

impl From<HuffmanDecodeError> for HpackError {
    fn from(_: HuffmanDecodeError) -> Self {
        HpackError::InvalidHuffmanSequence
    }
}

/// Converts a Huffman code into a literal string at one time, and appends it
/// to `dst`. At most `limit` bytes may be appended.
pub(crate) fn huffman_decode(
    src: &[u8],
    dst: &mut Vec<u8>,
    limit: usize,
) -> Result<(), HuffmanDecodeError> {
    // Each cell of the decode table holds `State`, `Decoded Byte` and `Flags`.
    //
    // `State` names the node of the code tree reached by the bits consumed
    // since the last decoded symbol. The root is 0.
    //
    // `Flags` contains three bits: `MAYBE_EOS`(0x1), `DECODED`(0x2), `ERROR`(0x4).
    // `MAYBE_EOS` is set when the bits since the last symbol are a valid
    // padding, that is fewer than 8 bits and all of them 1.
    let table = decode_table();
    let end = dst.len().saturating_add(limit);
    let (mut state, mut flags) = (0u8, MAYBE_EOS);

    for byte in src.iter() {
        for nibble in [byte >> 4, byte & 0xf] {
            let (next, decoded, cell_flags) = table[state as usize][nibble as usize];
            (state, flags) = (next, cell_flags);
            if (flags & ERROR) == ERROR {
                return Err(HuffmanDecodeError::InvalidHuffmanCode);
            }
            if (flags & DECODED) == DECODED {
                if dst.len() >= end {
                    return Err(HuffmanDecodeError::OutputTooLong);
                }
                dst.push(decoded);
            }
        }
    }

    if (flags & MAYBE_EOS) == 0 {
        return Err(HuffmanDecodeError::InvalidHuffmanCode);
    }
    Ok(())
}

fn decode_table() -> &'static DecodeTable {
    HUFFMAN_DECODE.get_or_init(build_decode_table)
}

#[derive(Clone, Copy)]
enum Link {
    Vacant,
    Node(usize),
    Leaf(usize),
}

/// Binary code tree. Internal nodes become the states of the decoder.
struct CodeTree {
    links: Vec<[Link; 2]>,
    padding: Vec<bool>,
}

impl CodeTree {
    fn build() -> Self {
        let mut tree = CodeTree {
            links: vec![[Link::Vacant; 2]],
            padding: vec![true],
        };
        for (symbol, &(code, len)) in HUFFMAN_CODES.iter().enumerate() {
            let mut node = 0;
            for pos in 1..=len {
                let bit = ((code >> (len - pos)) & 1) as usize;
                if pos == len {
                    tree.links[node][bit] = Link::Leaf(symbol);
                    break;
                }
                node = match tree.links[node][bit] {
                    Link::Node(next) => next,
                    _ => tree.push_node(node, bit, pos),
                };
            }
        }
        tree
    }

    fn push_node(&mut self, parent: usize, bit: usize, depth: u8) -> usize {
        let next = self.links.len();
        self.links.push([Link::Vacant; 2]);
        self.padding.push(self.padding[parent] && bit == 1 && depth < 8);
        self.links[parent][bit] = Link::Node(next);
        next
    }
}

fn build_decode_table() -> Box<DecodeTable> {
    let tree = CodeTree::build();
    // 257 leaves in a full binary tree leave exactly 256 internal nodes.
    debug_assert_eq!(tree.links.len(), 256);

    let mut table = Box::new([[(0u8, 0u8, 0u8); 16]; 256]);
    for (state, row) in table.iter_mut().enumerate().take(tree.links.len()) {
        for (nibble, cell) in row.iter_mut().enumerate() {
            let (mut node, mut symbol, mut flags) = (state, 0u8, 0u8);
            for shift in (0..4).rev() {
                match tree.links[node][(nibble >> shift) & 1] {
                    Link::Node(next) => node = next,
                    Link::Leaf(sym) if sym < EOS => {
                        symbol = sym as u8;
                        flags |= DECODED;
                        node = 0;
                    }
                    _ => {
                        flags |= ERROR;
                        node = 0;
                        break;
                    }
                }
            }
            if (flags & ERROR) == 0 && tree.padding[node] {
                flags |= MAYBE_EOS;
            }
            *cell = (node as u8, symbol, flags);
        }
    }
    table
}
