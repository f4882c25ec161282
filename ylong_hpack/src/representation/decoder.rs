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

use crate::error::HpackError;
use crate::integer::decode_integer;
use crate::representation::{Name, PrefixBit, Representation};
use crate::string::{decode_string, Literal};

/// Decoder implementation for decoding a single [`Representation`] from the
/// front of a header block.
///
/// Raw strings are returned as ranges into the input. Huffman strings are
/// decoded into the scratch buffer given to [`ReprDecoder::decode`].
///
/// [`Representation`]: Representation
/// [`ReprDecoder::decode`]: ReprDecoder::decode
pub(crate) struct ReprDecoder<'a> {
    buf: &'a [u8],
    pos: usize,
    huffman_limit: usize,
}

impl<'a> ReprDecoder<'a> {
    /// Creates a new `ReprDecoder` over `buf`. Each Huffman string may decode
    /// to at most `huffman_limit` bytes.
    pub(crate) fn new(buf: &'a [u8], huffman_limit: usize) -> Self {
        Self {
            buf,
            pos: 0,
            huffman_limit,
        }
    }

    /// Gets the number of bytes consumed by the representations decoded so
    /// far.
    pub(crate) fn consumed(&self) -> usize {
        self.pos
    }

    /// Decodes the next representation. Returns `InsufficientInput` if the
    /// buffer ends before the representation does.
    pub(crate) fn decode(&mut self, scratch: &mut Vec<u8>) -> Result<Representation, HpackError> {
        let first = *self
            .buf
            .get(self.pos)
            .ok_or(HpackError::InsufficientInput)?;
        let repr = PrefixBit::from_u8(first);
        let index = self.integer(repr)?;

        match repr {
            PrefixBit::INDEXED => match index {
                0 => Err(HpackError::InvalidDynamicIndex),
                index => Ok(Representation::Indexed { index }),
            },
            PrefixBit::SIZE_UPDATE => Ok(Representation::SizeUpdate { max_size: index }),
            _ => {
                let name = match index {
                    0 => Name::Literal(self.string(scratch)?),
                    index => Name::Index(index),
                };
                let value = self.string(scratch)?;
                Ok(match repr {
                    PrefixBit::LITERAL_WITH_INDEXING => {
                        Representation::LiteralWithIndexing { name, value }
                    }
                    PrefixBit::LITERAL_NEVER_INDEXED => {
                        Representation::LiteralNeverIndexed { name, value }
                    }
                    _ => Representation::LiteralWithoutIndexing { name, value },
                })
            }
        }
    }

    fn integer(&mut self, repr: PrefixBit) -> Result<usize, HpackError> {
        let prefix = repr.prefix_index_mask().prefix_bits();
        let (value, len) = decode_integer(&self.buf[self.pos..], prefix)?;
        self.pos += len;
        Ok(value)
    }

    fn string(&mut self, scratch: &mut Vec<u8>) -> Result<Literal, HpackError> {
        let (literal, len) = decode_string(&self.buf[self.pos..], scratch, self.huffman_limit)?;
        let literal = literal.offset(self.pos);
        self.pos += len;
        Ok(literal)
    }
}
