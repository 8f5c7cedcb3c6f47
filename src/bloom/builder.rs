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

use tracing::debug;

use super::BloomFilter;
use crate::error::Error;
use crate::hash::Hash128;
use crate::hash::MurmurHash3;

/// Smallest accepted capacity, in bits.
pub const MIN_NUM_BITS: u64 = 1;
/// Largest accepted capacity, in bits (4 GiB of filter).
pub const MAX_NUM_BITS: u64 = 1u64 << 35;
/// Smallest accepted number of hash functions.
pub const MIN_NUM_HASHES: u16 = 1;
/// Largest accepted number of hash functions.
pub const MAX_NUM_HASHES: u16 = i16::MAX as u16;

/// Builder for creating [`BloomFilter`] instances.
///
/// The capacity is always given up front; the hash count is either derived from the expected
/// number of items or set explicitly:
/// - [`with_capacity()`](Self::with_capacity): fixed number of bits, then optionally
///   [`expected_items()`](Self::expected_items) or [`num_hashes()`](Self::num_hashes)
/// - [`with_accuracy()`](Self::with_accuracy): bits and hashes sized for a target false
///   positive probability
///
/// An explicit hash count always takes precedence over the expected item count.
#[derive(Debug, Clone)]
pub struct BloomFilterBuilder<H = MurmurHash3> {
    capacity_bits: u64,
    expected_items: u64,
    num_hashes: Option<u16>,
    /// `(max_items, fpp)` as given to `with_accuracy`, validated in `try_build`
    accuracy: Option<(u64, f64)>,
    hasher: H,
}

impl BloomFilterBuilder<MurmurHash3> {
    /// Creates a builder for a filter of exactly `capacity_bits` bits.
    ///
    /// Without further configuration the filter uses a single hash function.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomset::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_capacity(1000)
    ///     .expected_items(100)
    ///     .build();
    /// assert_eq!(filter.capacity(), 1000);
    /// assert_eq!(filter.num_hashes(), 6);
    /// ```
    pub fn with_capacity(capacity_bits: u64) -> Self {
        BloomFilterBuilder {
            capacity_bits,
            expected_items: 0,
            num_hashes: None,
            accuracy: None,
            hasher: MurmurHash3::default(),
        }
    }

    /// Creates a builder with optimal parameters for a target accuracy.
    ///
    /// Calculates the number of bits needed to hold `max_items` at false positive
    /// probability `fpp`, and derives the hash count from the result.
    ///
    /// Out-of-range arguments are reported when building: [`try_build`](Self::try_build)
    /// returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if
    /// `max_items` is 0 or `fpp` is not in (0.0, 1.0).
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomset::bloom::BloomFilterBuilder;
    /// // Sized for 10,000 items with 1% FPP
    /// let filter = BloomFilterBuilder::with_accuracy(10_000, 0.01)
    ///     .seed(42)
    ///     .build();
    /// assert!(filter.expected_fpp(10_000) < 0.011);
    /// ```
    pub fn with_accuracy(max_items: u64, fpp: f64) -> Self {
        let capacity_bits = if max_items > 0 && fpp > 0.0 && fpp < 1.0 {
            Self::suggest_num_bits(max_items, fpp)
        } else {
            0
        };

        let mut builder = Self::with_capacity(capacity_bits).expected_items(max_items);
        builder.accuracy = Some((max_items, fpp));
        builder
    }

    /// Sets a custom seed for the default MurmurHash3 engine (default: 9001).
    ///
    /// **Important**: Filters with different seeds cannot be merged.
    pub fn seed(self, seed: u32) -> Self {
        self.hasher(MurmurHash3::with_seed(seed))
    }

    // ========================================================================
    // Static Suggestion Methods
    // ========================================================================

    /// Suggests the number of bits for `max_items` items at false positive probability `fpp`.
    ///
    /// Formula: `m = -n * ln(p) / (ln(2)^2)`
    /// where n = max_items, p = fpp
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomset::bloom::BloomFilterBuilder;
    /// let bits = BloomFilterBuilder::suggest_num_bits(1000, 0.01);
    /// assert!(bits > 9000 && bits < 10000); // ~9586 bits
    /// ```
    pub fn suggest_num_bits(max_items: u64, fpp: f64) -> u64 {
        let n = max_items as f64;
        let ln2_squared = std::f64::consts::LN_2 * std::f64::consts::LN_2;

        let bits = (-n * fpp.ln() / ln2_squared).ceil() as u64;
        bits.clamp(MIN_NUM_BITS, MAX_NUM_BITS)
    }

    /// Suggests the number of hash functions for a filter of `capacity_bits` bits expected to
    /// hold `expected_items` items.
    ///
    /// Formula: `k = floor((m/n) * ln(2))`, at least 1,
    /// where m = capacity_bits, n = expected_items
    ///
    /// The continuous optimum `(m/n) * ln(2)` is rounded down, so the filter never pays for
    /// more hashes than the optimum. With no expected items there is nothing to optimize
    /// for and a single hash is used.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomset::bloom::BloomFilterBuilder;
    /// assert_eq!(BloomFilterBuilder::suggest_num_hashes(2500, 500), 3); // k ≈ 3.47
    /// assert_eq!(BloomFilterBuilder::suggest_num_hashes(1000, 100), 6); // k ≈ 6.93
    /// assert_eq!(BloomFilterBuilder::suggest_num_hashes(3600, 300), 8); // k ≈ 8.32
    /// assert_eq!(BloomFilterBuilder::suggest_num_hashes(3600, 0), 1);
    /// ```
    pub fn suggest_num_hashes(capacity_bits: u64, expected_items: u64) -> u16 {
        if expected_items == 0 {
            return MIN_NUM_HASHES;
        }

        let m = capacity_bits as f64;
        let n = expected_items as f64;

        let k = (m / n * std::f64::consts::LN_2).floor();
        k.clamp(f64::from(MIN_NUM_HASHES), f64::from(MAX_NUM_HASHES)) as u16
    }
}

impl<H: Hash128> BloomFilterBuilder<H> {
    /// Sets the number of items the filter is expected to hold.
    ///
    /// Used to derive the hash count with [`suggest_num_hashes`](BloomFilterBuilder::suggest_num_hashes)
    /// unless [`num_hashes()`](Self::num_hashes) is also given.
    pub fn expected_items(mut self, expected_items: u64) -> Self {
        self.expected_items = expected_items;
        self
    }

    /// Sets an explicit number of hash functions, bypassing the derivation from
    /// [`expected_items()`](Self::expected_items).
    pub fn num_hashes(mut self, num_hashes: u16) -> Self {
        self.num_hashes = Some(num_hashes);
        self
    }

    /// Replaces the hash engine.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomset::bloom::BloomFilterBuilder;
    /// # use bloomset::hash::Hash128;
    /// #[derive(Debug, Clone, PartialEq)]
    /// struct Fnv;
    ///
    /// impl Hash128 for Fnv {
    ///     fn hash128(&self, bytes: &[u8]) -> (u64, u64) {
    ///         let mut h = 0xcbf29ce484222325_u64;
    ///         for b in bytes {
    ///             h = (h ^ u64::from(*b)).wrapping_mul(0x100000001b3);
    ///         }
    ///         (h, h.rotate_left(32) | 1)
    ///     }
    /// }
    ///
    /// let mut filter = BloomFilterBuilder::with_capacity(256).hasher(Fnv).build();
    /// filter.insert("x");
    /// assert!(filter.contains("x"));
    /// ```
    pub fn hasher<G: Hash128>(self, hasher: G) -> BloomFilterBuilder<G> {
        BloomFilterBuilder {
            capacity_bits: self.capacity_bits,
            expected_items: self.expected_items,
            num_hashes: self.num_hashes,
            accuracy: self.accuracy,
            hasher,
        }
    }

    /// Builds the Bloom filter.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if:
    /// - [`with_accuracy()`](BloomFilterBuilder::with_accuracy) got zero items or an `fpp`
    ///   outside (0.0, 1.0)
    /// - the capacity is below [`MIN_NUM_BITS`] or above [`MAX_NUM_BITS`]
    /// - an explicit hash count is below [`MIN_NUM_HASHES`] or above [`MAX_NUM_HASHES`]
    pub fn try_build(self) -> Result<BloomFilter<H>, Error> {
        if let Some((max_items, fpp)) = self.accuracy {
            if max_items == 0 {
                return Err(Error::invalid_argument("max_items must be greater than 0"));
            }
            // written this way round so NaN is rejected too
            if !(fpp > 0.0 && fpp < 1.0) {
                return Err(Error::invalid_argument(format!(
                    "fpp must be between 0.0 and 1.0 (exclusive), got {fpp}"
                )));
            }
        }

        if !(MIN_NUM_BITS..=MAX_NUM_BITS).contains(&self.capacity_bits) {
            return Err(Error::invalid_argument(format!(
                "capacity_bits must be in [{MIN_NUM_BITS}, {MAX_NUM_BITS}], got {}",
                self.capacity_bits
            )));
        }

        let num_hashes = match self.num_hashes {
            Some(k) if (MIN_NUM_HASHES..=MAX_NUM_HASHES).contains(&k) => k,
            Some(k) => {
                return Err(Error::invalid_argument(format!(
                    "num_hashes must be in [{MIN_NUM_HASHES}, {MAX_NUM_HASHES}], got {k}"
                )));
            }
            None => BloomFilterBuilder::suggest_num_hashes(self.capacity_bits, self.expected_items),
        };

        debug!(
            capacity_bits = self.capacity_bits,
            expected_items = self.expected_items,
            num_hashes,
            explicit_num_hashes = self.num_hashes.is_some(),
            "created bloom filter"
        );
        Ok(BloomFilter::make(self.hasher, self.capacity_bits, num_hashes))
    }

    /// Builds the Bloom filter.
    ///
    /// The panicking version of [`try_build`](Self::try_build).
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid.
    pub fn build(self) -> BloomFilter<H> {
        match self.try_build() {
            Ok(filter) => filter,
            Err(err) => panic!("{err}"),
        }
    }
}
