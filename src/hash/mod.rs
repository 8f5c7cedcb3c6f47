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

//! 128-bit hash engines feeding the Bloom filter's double hashing.
//!
//! A filter never inspects its input beyond handing the raw bytes to a [`Hash128`] engine and
//! splitting the result into two 64-bit halves `(h1, h2)`. Any deterministic, well-mixed 128-bit
//! hash satisfies the contract; the crate ships [`MurmurHash3`] as the default.

mod murmurhash;

pub use self::murmurhash::MurmurHash3;

/// The seed 9001 is the prime the DataSketches family has long used for its update hashes.
///
/// The value itself carries no special meaning, but two filters can only be combined when they
/// hash with the same seed, so it is fixed here as the crate-wide default.
pub const DEFAULT_SEED: u32 = 9001;

/// A deterministic function from a byte buffer to a 128-bit value, split into two halves.
///
/// Implementations must:
/// - return the same pair for the same input bytes, every time;
/// - accept zero-length input;
/// - mix well enough that `h1` and `h2` can be treated as independent.
///
/// Cryptographic strength is not required.
///
/// Engines are compared with `PartialEq` before two filters are merged; engines that compare
/// equal must produce identical hashes.
pub trait Hash128 {
    /// Hashes `bytes` into two 64-bit halves.
    fn hash128(&self, bytes: &[u8]) -> (u64, u64);
}

impl<H: Hash128 + ?Sized> Hash128 for &H {
    fn hash128(&self, bytes: &[u8]) -> (u64, u64) {
        (**self).hash128(bytes)
    }
}
