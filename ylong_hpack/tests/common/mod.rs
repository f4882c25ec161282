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

use ylong_hpack::Hpack;

/// Converts a hex dump into bytes. Whitespace is ignored.
pub fn hex(str: &str) -> Vec<u8> {
    let digits: Vec<u8> = str.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    digits
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).unwrap();
            u8::from_str_radix(pair, 16).unwrap()
        })
        .collect()
}

/// Decodes a whole header block, skipping size updates.
pub fn decode_block(hpack: &mut Hpack, block: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut fields = Vec::new();
    let mut pos = 0;
    while pos < block.len() {
        let decoded = hpack.decode_header(&block[pos..]).unwrap();
        if let Some(field) = decoded.field() {
            fields.push((field.name().to_vec(), field.value().to_vec()));
        }
        pos += decoded.consumed();
    }
    fields
}

/// Builds an owned header list from string pairs.
#[allow(dead_code)]
pub fn fields(pairs: &[(&str, &str)]) -> Vec<(Vec<u8>, Vec<u8>)> {
    pairs
        .iter()
        .map(|(name, value)| (name.as_bytes().to_vec(), value.as_bytes().to_vec()))
        .collect()
}
