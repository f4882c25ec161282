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

//! Converts hex strings used by the RFC examples into bytes.

/// Decodes a hex string such as `"828684"` into bytes. Whitespace between
/// digit pairs is ignored so that the RFC dumps can be pasted as they are.
pub(crate) fn decode(str: &str) -> Option<Vec<u8>> {
    let digits = str
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>();
    if digits.len() % 2 != 0 {
        return None;
    }
    let mut vec = Vec::with_capacity(digits.len() / 2);
    let mut remained = digits.as_str();
    while !remained.is_empty() {
        let (left, right) = remained.split_at(2);
        match u8::from_str_radix(left, 16) {
            Ok(num) => vec.push(num),
            Err(_) => return None,
        }
        remained = right;
    }
    Some(vec)
}
