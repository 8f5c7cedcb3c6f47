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

use tracing::warn;

use super::BitVector;
use super::BloomFilterBuilder;
use crate::error::Error;
use crate::hash::Hash128;
use crate::hash::MurmurHash3;

/// A Bloom filter for probabilistic set membership testing.
///
/// Provides fast membership queries with:
/// - No false negatives (inserted items always return `true`)
/// - Tunable false positive rate
/// - Constant space usage
///
/// Items are raw byte sequences. Use [`TypedBloomFilter`](super::TypedBloomFilter) to insert
/// fixed-width values such as integers and floats directly.
///
/// # Thread safety
///
/// Queries take `&self` and may run concurrently from any number of threads. Inserts and set
/// operations take `&mut self`, so sharing a filter between writers requires an external lock
/// (for example `RwLock<BloomFilter>`) or one filter per shard.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomFilter<H = MurmurHash3> {
    /// Hash engine producing the two base hashes
    hasher: H,
    /// Number of hash functions to use (k)
    num_hashes: u16,
    /// Count of bits set to 1 (for statistics)
    num_bits_set: u64,
    /// Bit array of exactly `capacity` bits (m)
    bits: BitVector,
}

impl BloomFilter<MurmurHash3> {
    /// Creates a filter of `capacity_bits` bits sized for `expected_items` insertions.
    ///
    /// The number of hash functions is derived with
    /// [`BloomFilterBuilder::suggest_num_hashes`]. The panicking version of
    /// [`try_new`](Self::try_new).
    ///
    /// # Panics
    ///
    /// Panics if `capacity_bits` is 0 or exceeds [`MAX_NUM_BITS`](super::MAX_NUM_BITS).
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomset::bloom::BloomFilter;
    /// let filter = BloomFilter::new(2500, 500);
    /// assert_eq!(filter.capacity(), 2500);
    /// assert_eq!(filter.num_hashes(), 3);
    /// ```
    pub fn new(capacity_bits: u64, expected_items: u64) -> Self {
        BloomFilterBuilder::with_capacity(capacity_bits)
            .expected_items(expected_items)
            .build()
    }

    /// Creates a filter of `capacity_bits` bits sized for `expected_items` insertions.
    ///
    /// # Errors
    ///
    /// If `capacity_bits` is 0 or exceeds [`MAX_NUM_BITS`](super::MAX_NUM_BITS), returns
    /// [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument).
    pub fn try_new(capacity_bits: u64, expected_items: u64) -> Result<Self, Error> {
        BloomFilterBuilder::with_capacity(capacity_bits)
            .expected_items(expected_items)
            .try_build()
    }

    /// Returns a builder for a filter of `capacity_bits` bits.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomset::bloom::BloomFilter;
    ///
    /// let filter = BloomFilter::builder(1000).num_hashes(4).seed(7).build();
    /// assert_eq!(filter.num_hashes(), 4);
    /// ```
    pub fn builder(capacity_bits: u64) -> BloomFilterBuilder {
        BloomFilterBuilder::with_capacity(capacity_bits)
    }
}

impl<H: Hash128> BloomFilter<H> {
    /// Callers must have validated `capacity_bits` and `num_hashes`.
    pub(super) fn make(hasher: H, capacity_bits: u64, num_hashes: u16) -> Self {
        BloomFilter {
            hasher,
            num_hashes,
            num_bits_set: 0,
            bits: BitVector::new(capacity_bits),
        }
    }

    // ========================================================================
    // Query Operations
    // ========================================================================

    /// Tests whether an item is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Item was **possibly** inserted (or false positive)
    /// - `false`: Item was **definitely not** inserted
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomset::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(1000, 100);
    /// assert!(!filter.contains("apple"));
    ///
    /// filter.insert("apple");
    /// assert!(filter.contains("apple"));
    /// ```
    pub fn contains(&self, item: impl AsRef<[u8]>) -> bool {
        if self.is_empty() {
            return false;
        }

        self.bit_indices(item).all(|index| self.bits.test(index))
    }

    /// Tests and inserts an item in a single operation.
    ///
    /// Returns whether the item was possibly already in the set before insertion.
    /// This hashes the item once, where `contains()` then `insert()` would hash it twice.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomset::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(1000, 100);
    ///
    /// assert!(!filter.contains_and_insert("apple")); // First insertion
    /// assert!(filter.contains_and_insert("apple")); // Now it's in the set
    /// ```
    pub fn contains_and_insert(&mut self, item: impl AsRef<[u8]>) -> bool {
        let indices = self.bit_indices(item);
        let mut was_present = true;
        for index in indices {
            if self.bits.set(index) {
                self.num_bits_set += 1;
                was_present = false;
            }
        }
        was_present
    }

    /// Returns the `k` bit positions an item maps to.
    ///
    /// Positions follow the double hashing scheme `(h1 + i * h2) mod capacity` for
    /// `i in 0..k`, where `(h1, h2)` is the item's 128-bit hash. Positions may repeat.
    pub fn bit_indices(&self, item: impl AsRef<[u8]>) -> BitIndices {
        let (h1, h2) = self.hasher.hash128(item.as_ref());
        BitIndices {
            h1,
            h2,
            next: 0,
            num_hashes: self.num_hashes,
            capacity_bits: self.bits.len(),
        }
    }

    // ========================================================================
    // Update Operations
    // ========================================================================

    /// Inserts an item into the filter.
    ///
    /// After insertion, `contains(item)` will always return `true`. Any byte sequence is
    /// accepted, including an empty one.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomset::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(1000, 100);
    ///
    /// filter.insert("apple");
    /// filter.insert(42_u64.to_le_bytes());
    /// filter.insert(b"");
    ///
    /// assert!(filter.contains("apple"));
    /// assert!(filter.contains(b""));
    /// ```
    pub fn insert(&mut self, item: impl AsRef<[u8]>) {
        self.contains_and_insert(item);
    }

    // ========================================================================
    // Set Operations
    // ========================================================================

    /// Merges another filter into this one via bitwise OR (union).
    ///
    /// After merging, this filter will recognize items from either filter
    /// (plus any false positives from either). `other` is left unchanged.
    ///
    /// # Errors
    ///
    /// If the filters are not compatible (different capacity, hash count or hash engine),
    /// returns [`ErrorKind::IncompatibleFilter`](crate::error::ErrorKind::IncompatibleFilter)
    /// and leaves both filters untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomset::bloom::BloomFilter;
    /// let mut f1 = BloomFilter::new(1000, 100);
    /// let mut f2 = BloomFilter::new(1000, 100);
    ///
    /// f1.insert("a");
    /// f2.insert("b");
    ///
    /// f1.union(&f2).unwrap();
    /// assert!(f1.contains("a"));
    /// assert!(f1.contains("b"));
    /// ```
    pub fn union(&mut self, other: &BloomFilter<H>) -> Result<(), Error>
    where
        H: PartialEq,
    {
        self.check_compatible(other, "union")?;
        self.bits.union_in_place(&other.bits);
        self.recount_bits_set();
        Ok(())
    }

    /// Intersects this filter with another via bitwise AND.
    ///
    /// The result approximates the intersection of the two sets: items present in both are
    /// always recognized, and an item present in neither can still be reported when the other
    /// items of the two filters happen to cover its bits.
    ///
    /// # Errors
    ///
    /// Same as [`union`](Self::union).
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomset::bloom::BloomFilter;
    /// let mut f1 = BloomFilter::new(1000, 100);
    /// let mut f2 = BloomFilter::new(1000, 100);
    ///
    /// f1.insert("a");
    /// f1.insert("b");
    /// f2.insert("b");
    /// f2.insert("c");
    ///
    /// f1.intersect(&f2).unwrap();
    /// assert!(f1.contains("b")); // In both
    /// ```
    pub fn intersect(&mut self, other: &BloomFilter<H>) -> Result<(), Error>
    where
        H: PartialEq,
    {
        self.check_compatible(other, "intersect")?;
        self.bits.intersect_in_place(&other.bits);
        self.recount_bits_set();
        Ok(())
    }

    /// Checks if two filters are compatible for merging.
    ///
    /// Filters are compatible if they have the same:
    /// - Capacity (number of bits)
    /// - Number of hash functions
    /// - Hash engine (including its seed)
    pub fn is_compatible(&self, other: &BloomFilter<H>) -> bool
    where
        H: PartialEq,
    {
        self.capacity() == other.capacity()
            && self.num_hashes == other.num_hashes
            && self.hasher == other.hasher
    }

    // ========================================================================
    // Statistics and Properties
    // ========================================================================

    /// Returns whether the filter is empty (no bits set).
    pub fn is_empty(&self) -> bool {
        self.num_bits_set == 0
    }

    /// Returns the number of bits set to 1.
    ///
    /// Useful for monitoring filter saturation.
    pub fn bits_used(&self) -> u64 {
        self.num_bits_set
    }

    /// Returns the total number of bits in the filter (capacity).
    pub fn capacity(&self) -> u64 {
        self.bits.len()
    }

    /// Returns the number of hash functions used.
    pub fn num_hashes(&self) -> u16 {
        self.num_hashes
    }

    /// Returns the hash engine.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Returns the underlying bit vector.
    pub fn bit_vector(&self) -> &BitVector {
        &self.bits
    }

    /// Returns the current load factor (fraction of bits set).
    ///
    /// Values near 0.5 indicate the filter is approaching saturation.
    /// Values above 0.5 indicate degraded false positive rates.
    pub fn load_factor(&self) -> f64 {
        self.num_bits_set as f64 / self.capacity() as f64
    }

    /// Estimates the current false positive probability from the fraction of set bits.
    ///
    /// A probe is a false positive when all `k` of its positions land on set bits, so the
    /// estimate is `load^k`. This assumes a uniform bit distribution.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powi(i32::from(self.num_hashes))
    }

    /// Returns the theoretical false positive probability after `num_items` distinct insertions.
    ///
    /// Formula: `(1 - (1 - 1/m)^(k * n))^k` where m = capacity, k = num_hashes, n = num_items.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomset::bloom::BloomFilter;
    /// let filter = BloomFilter::new(10_000, 1000);
    /// assert_eq!(filter.expected_fpp(0), 0.0);
    /// assert!(filter.expected_fpp(1000) < 0.01);
    /// assert!(filter.expected_fpp(5000) > filter.expected_fpp(1000));
    /// ```
    pub fn expected_fpp(&self, num_items: u64) -> f64 {
        let m = self.capacity() as f64;
        let k = self.num_hashes as f64;
        let n = num_items as f64;
        (1.0 - (1.0 - 1.0 / m).powf(k * n)).powf(k)
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    fn check_compatible(&self, other: &BloomFilter<H>, op: &'static str) -> Result<(), Error>
    where
        H: PartialEq,
    {
        let reason = if self.capacity() != other.capacity() {
            "capacities differ"
        } else if self.num_hashes != other.num_hashes {
            "hash counts differ"
        } else if self.hasher != other.hasher {
            "hash engines differ"
        } else {
            return Ok(());
        };

        warn!(
            op,
            reason,
            self_capacity = self.capacity(),
            other_capacity = other.capacity(),
            self_num_hashes = self.num_hashes,
            other_num_hashes = other.num_hashes,
            "rejected incompatible bloom filter"
        );
        Err(
            Error::incompatible_filter(format!("cannot {op} bloom filters: {reason}"))
                .with_context("self_capacity", self.capacity())
                .with_context("other_capacity", other.capacity())
                .with_context("self_num_hashes", self.num_hashes)
                .with_context("other_num_hashes", other.num_hashes),
        )
    }

    /// Recounts all set bits (used after set operations).
    fn recount_bits_set(&mut self) {
        self.num_bits_set = self.bits.count_ones();
    }
}

/// Iterator over the bit positions of one item, created by [`BloomFilter::bit_indices`].
#[derive(Debug, Clone)]
pub struct BitIndices {
    h1: u64,
    h2: u64,
    next: u16,
    num_hashes: u16,
    capacity_bits: u64,
}

impl Iterator for BitIndices {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.next >= self.num_hashes {
            return None;
        }
        // Use wrapping arithmetic to handle overflow
        let hash = self
            .h1
            .wrapping_add(u64::from(self.next).wrapping_mul(self.h2));
        self.next += 1;
        Some(hash % self.capacity_bits)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::from(self.num_hashes - self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitIndices {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_new() {
        let filter = BloomFilter::new(3600, 300);
        assert_eq!(filter.capacity(), 3600);
        assert_eq!(filter.num_hashes(), 8);
        assert!(filter.is_empty());
        assert_eq!(filter.bits_used(), 0);
    }

    #[test]
    fn test_try_new_zero_capacity() {
        let err = BloomFilter::try_new(0, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_insert_and_contains() {
        let mut filter = BloomFilter::new(1000, 100);

        assert!(!filter.contains("apple"));
        filter.insert("apple");
        assert!(filter.contains("apple"));
        assert!(!filter.is_empty());
        assert!(filter.bits_used() <= u64::from(filter.num_hashes()));
    }

    #[test]
    fn test_contains_and_insert() {
        let mut filter = BloomFilter::new(1000, 100);

        assert!(!filter.contains_and_insert(42_u64.to_le_bytes()));
        assert!(filter.contains_and_insert(42_u64.to_le_bytes()));
    }

    #[test]
    fn test_bit_indices_follow_double_hashing() {
        let filter = BloomFilter::builder(1009).num_hashes(5).build();
        let (h1, h2) = filter.hasher().hash128(b"item");

        let indices: Vec<u64> = filter.bit_indices(b"item").collect();
        assert_eq!(indices.len(), 5);
        for (i, index) in indices.iter().enumerate() {
            let expected = h1.wrapping_add((i as u64).wrapping_mul(h2)) % 1009;
            assert_eq!(*index, expected);
        }
    }

    #[test]
    fn test_bits_used_tracks_set_operations() {
        let mut f1 = BloomFilter::new(512, 16);
        let mut f2 = BloomFilter::new(512, 16);
        for i in 0..16_u32 {
            f1.insert(i.to_le_bytes());
        }
        for i in 8..24_u32 {
            f2.insert(i.to_le_bytes());
        }

        let mut union = f1.clone();
        union.union(&f2).unwrap();
        assert_eq!(union.bits_used(), union.bit_vector().count_ones());
        assert!(union.bits_used() >= f1.bits_used());

        let mut intersection = f1.clone();
        intersection.intersect(&f2).unwrap();
        assert_eq!(intersection.bits_used(), intersection.bit_vector().count_ones());
        assert!(intersection.bits_used() <= f1.bits_used());
    }

    /// Checks that union and intersection with `f2` are both rejected and leave
    /// both filters unchanged.
    fn assert_rejected(f1: &mut BloomFilter, f2: &BloomFilter, reason: &str) {
        let (f1_before, f2_before) = (f1.clone(), f2.clone());

        let err = f1.union(f2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompatibleFilter);
        assert!(err.message().contains(reason), "{err}");
        assert_eq!(*f1, f1_before);
        assert_eq!(*f2, f2_before);

        let err = f1.intersect(f2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompatibleFilter);
        assert!(err.message().contains(reason), "{err}");
        assert_eq!(*f1, f1_before);
        assert_eq!(*f2, f2_before);
    }

    #[test]
    fn test_incompatible_capacity() {
        let mut f1 = BloomFilter::builder(1000).num_hashes(3).build();
        let mut f2 = BloomFilter::builder(1024).num_hashes(3).build();
        f1.insert("a");
        f2.insert("b");

        assert_rejected(&mut f1, &f2, "capacities differ");
        assert!(f1.contains("a"));
    }

    #[test]
    fn test_incompatible_seed() {
        let mut f1 = BloomFilter::builder(1000).seed(1).build();
        let mut f2 = BloomFilter::builder(1000).seed(2).build();
        f1.insert("a");
        f2.insert("b");
        assert!(!f1.is_compatible(&f2));

        assert_rejected(&mut f1, &f2, "hash engines differ");
    }

    #[test]
    fn test_estimated_fpp_is_load_to_the_k() {
        // one item, one hash: exactly one of four bits is set
        let mut filter = BloomFilter::builder(4).num_hashes(1).build();
        filter.insert("a");
        assert_eq!(filter.bits_used(), 1);
        assert_eq!(filter.estimated_fpp(), 0.25);

        // a single bit means every probe hits it
        let mut filter = BloomFilter::builder(1).num_hashes(5).build();
        filter.insert("a");
        assert_eq!(filter.estimated_fpp(), 1.0);

        let mut filter = BloomFilter::builder(1000).num_hashes(3).build();
        for i in 0..100_u64 {
            filter.insert(i.to_le_bytes());
        }
        let load = filter.bits_used() as f64 / 1000.0;
        assert_eq!(filter.estimated_fpp(), load.powi(3));
        // a quarter of the bits set gives about 0.017; (1 - e^(-3 * load))^3 would be about 0.16
        assert!(filter.estimated_fpp() < 0.05);
        assert!((1.0 - (-3.0 * load).exp()).powi(3) > 0.1);
    }

    #[test]
    fn test_fpp_statistics() {
        let mut filter = BloomFilter::new(10_000, 1000);
        assert_eq!(filter.load_factor(), 0.0);
        assert_eq!(filter.estimated_fpp(), 0.0);

        for i in 0..1000_u64 {
            filter.insert(i.to_le_bytes());
        }
        let load = filter.load_factor();
        assert!(load > 0.3 && load < 0.6, "load factor {load}");
        assert!(filter.estimated_fpp() < 0.05);
        assert!(filter.expected_fpp(1000) < 0.05);
    }
}
