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

/// A fixed-length array of bits packed into `u64` words.
///
/// The length is chosen at construction and never changes. Copies are deep: cloning duplicates
/// the backing words, so mutating a clone never affects the original.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitVector {
    /// Number of addressable bits
    num_bits: u64,
    /// Length = ceil(num_bits / 64); bits past `num_bits` in the last word stay zero
    words: Box<[u64]>,
}

// A zero-length vector is rejected by `new`, so there is no empty state to report.
#[allow(clippy::len_without_is_empty)]
impl BitVector {
    /// Creates a vector of `num_bits` cleared bits.
    ///
    /// # Panics
    ///
    /// Panics if `num_bits` is 0.
    pub fn new(num_bits: u64) -> Self {
        assert!(num_bits > 0, "num_bits must be at least 1");
        let num_words = num_bits.div_ceil(64) as usize;
        BitVector {
            num_bits,
            words: vec![0u64; num_words].into_boxed_slice(),
        }
    }

    /// Returns the number of bits.
    pub fn len(&self) -> u64 {
        self.num_bits
    }

    /// Sets the bit at `index`, returning whether it was previously clear.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: u64) -> bool {
        let (word_index, mask) = self.locate(index);
        let word = &mut self.words[word_index];
        let was_clear = (*word & mask) == 0;
        *word |= mask;
        was_clear
    }

    /// Returns whether the bit at `index` is set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn test(&self, index: u64) -> bool {
        let (word_index, mask) = self.locate(index);
        (self.words[word_index] & mask) != 0
    }

    /// Bitwise OR of `other` into `self`.
    ///
    /// # Panics
    ///
    /// Panics if the two vectors differ in length.
    pub fn union_in_place(&mut self, other: &BitVector) {
        self.assert_same_len(other);
        for (word, other_word) in self.words.iter_mut().zip(other.words.iter()) {
            *word |= *other_word;
        }
    }

    /// Bitwise AND of `other` into `self`.
    ///
    /// # Panics
    ///
    /// Panics if the two vectors differ in length.
    pub fn intersect_in_place(&mut self, other: &BitVector) {
        self.assert_same_len(other);
        for (word, other_word) in self.words.iter_mut().zip(other.words.iter()) {
            *word &= *other_word;
        }
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> u64 {
        self.words.iter().map(|word| u64::from(word.count_ones())).sum()
    }

    fn locate(&self, index: u64) -> (usize, u64) {
        assert!(
            index < self.num_bits,
            "bit index {index} out of range for length {}",
            self.num_bits
        );
        ((index / 64) as usize, 1u64 << (index % 64))
    }

    fn assert_same_len(&self, other: &BitVector) {
        assert_eq!(
            self.num_bits, other.num_bits,
            "bit vectors must have the same length"
        );
    }
}
