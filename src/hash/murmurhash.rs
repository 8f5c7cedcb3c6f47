// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use super::DEFAULT_SEED;
use super::Hash128;

/// The MurmurHash3 x64/128 variant: a fast, non-cryptographic, 128-bit hash function that has
/// excellent avalanche and 2-way bit independence properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MurmurHash3 {
    seed: u32,
}

impl MurmurHash3 {
    /// Creates an engine hashing with the given seed.
    pub const fn with_seed(seed: u32) -> Self {
        MurmurHash3 { seed }
    }

    /// Returns the seed.
    pub const fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for MurmurHash3 {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl Hash128 for MurmurHash3 {
    fn hash128(&self, bytes: &[u8]) -> (u64, u64) {
        mur3::murmurhash3_x64_128(bytes, self.seed)
    }
}
