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

use std::fmt;
use std::marker::PhantomData;

use byteorder::ByteOrder;
use byteorder::LE;

use super::BloomFilter;
use crate::error::Error;
use crate::hash::Hash128;
use crate::hash::MurmurHash3;

/// A fixed-size value with a canonical byte encoding.
///
/// Equal values must encode to equal bytes. The implementations in this crate are
/// little-endian on every platform, so a filter built on one machine answers the same way on
/// another.
///
/// Floating-point values are encoded by their IEEE-754 bit pattern: `0.0` and `-0.0` are
/// distinct items, and a NaN only matches a NaN with the same payload.
pub trait ByteView {
    /// The encoded form, typically a byte array.
    type Bytes: AsRef<[u8]>;

    /// Encodes the value.
    fn to_bytes(&self) -> Self::Bytes;
}

macro_rules! impl_byte_view {
    ($($ty:ty => $write:ident, $len:literal;)*) => {
        $(
            impl ByteView for $ty {
                type Bytes = [u8; $len];

                fn to_bytes(&self) -> [u8; $len] {
                    let mut bytes = [0u8; $len];
                    LE::$write(&mut bytes, *self);
                    bytes
                }
            }
        )*
    };
}

impl_byte_view! {
    u16 => write_u16, 2;
    u32 => write_u32, 4;
    u64 => write_u64, 8;
    u128 => write_u128, 16;
    i16 => write_i16, 2;
    i32 => write_i32, 4;
    i64 => write_i64, 8;
    i128 => write_i128, 16;
    f32 => write_f32, 4;
    f64 => write_f64, 8;
}

impl ByteView for u8 {
    type Bytes = [u8; 1];

    fn to_bytes(&self) -> [u8; 1] {
        [*self]
    }
}

impl ByteView for i8 {
    type Bytes = [u8; 1];

    fn to_bytes(&self) -> [u8; 1] {
        self.to_le_bytes()
    }
}

impl ByteView for bool {
    type Bytes = [u8; 1];

    fn to_bytes(&self) -> [u8; 1] {
        [u8::from(*self)]
    }
}

impl ByteView for char {
    type Bytes = [u8; 4];

    fn to_bytes(&self) -> [u8; 4] {
        u32::from(*self).to_bytes()
    }
}

// Pointer-sized integers are widened so 32- and 64-bit targets agree.
impl ByteView for usize {
    type Bytes = [u8; 8];

    fn to_bytes(&self) -> [u8; 8] {
        (*self as u64).to_bytes()
    }
}

impl ByteView for isize {
    type Bytes = [u8; 8];

    fn to_bytes(&self) -> [u8; 8] {
        (*self as i64).to_bytes()
    }
}

impl<const N: usize> ByteView for [u8; N] {
    type Bytes = [u8; N];

    fn to_bytes(&self) -> [u8; N] {
        *self
    }
}

/// A Bloom filter over values of a single fixed-size type.
///
/// Wraps a byte-oriented [`BloomFilter`] and encodes every value with [`ByteView`] before
/// handing it over, so callers never deal with raw bytes.
///
/// # Examples
///
/// ```
/// use bloomset::bloom::TypedBloomFilter;
///
/// let mut filter = TypedBloomFilter::<u64>::new(1000, 500);
/// filter.insert(&123);
///
/// assert!(filter.contains(&123));
/// assert_eq!(filter.num_hashes(), 1);
/// ```
pub struct TypedBloomFilter<T, H = MurmurHash3> {
    filter: BloomFilter<H>,
    _item: PhantomData<fn(&T)>,
}

impl<T: ByteView> TypedBloomFilter<T, MurmurHash3> {
    /// Creates a filter of `capacity_bits` bits sized for `expected_items` values.
    ///
    /// # Panics
    ///
    /// Panics if `capacity_bits` is out of range; see [`BloomFilter::new`].
    pub fn new(capacity_bits: u64, expected_items: u64) -> Self {
        Self::from_filter(BloomFilter::new(capacity_bits, expected_items))
    }

    /// Creates a filter of `capacity_bits` bits sized for `expected_items` values.
    ///
    /// # Errors
    ///
    /// See [`BloomFilter::try_new`].
    pub fn try_new(capacity_bits: u64, expected_items: u64) -> Result<Self, Error> {
        BloomFilter::try_new(capacity_bits, expected_items).map(Self::from_filter)
    }
}

impl<T: ByteView, H: Hash128> TypedBloomFilter<T, H> {
    /// Wraps an existing, typically builder-configured, filter.
    ///
    /// The filter should only ever have seen values encoded from `T`.
    pub fn from_filter(filter: BloomFilter<H>) -> Self {
        TypedBloomFilter {
            filter,
            _item: PhantomData,
        }
    }

    /// Inserts a value.
    pub fn insert(&mut self, item: &T) {
        self.filter.insert(item.to_bytes());
    }

    /// Tests whether a value is possibly in the set.
    pub fn contains(&self, item: &T) -> bool {
        self.filter.contains(item.to_bytes())
    }

    /// Tests and inserts a value, returning whether it was possibly present before.
    pub fn contains_and_insert(&mut self, item: &T) -> bool {
        self.filter.contains_and_insert(item.to_bytes())
    }

    /// Merges another filter into this one via bitwise OR.
    ///
    /// # Errors
    ///
    /// See [`BloomFilter::union`].
    pub fn union(&mut self, other: &TypedBloomFilter<T, H>) -> Result<(), Error>
    where
        H: PartialEq,
    {
        self.filter.union(&other.filter)
    }

    /// Intersects this filter with another via bitwise AND.
    ///
    /// # Errors
    ///
    /// See [`BloomFilter::intersect`].
    pub fn intersect(&mut self, other: &TypedBloomFilter<T, H>) -> Result<(), Error>
    where
        H: PartialEq,
    {
        self.filter.intersect(&other.filter)
    }

    /// Returns the number of hash functions used.
    pub fn num_hashes(&self) -> u16 {
        self.filter.num_hashes()
    }

    /// Returns the total number of bits in the filter.
    pub fn capacity(&self) -> u64 {
        self.filter.capacity()
    }

    /// Returns whether no bits are set.
    pub fn is_empty(&self) -> bool {
        self.filter.is_empty()
    }

    /// Returns the wrapped byte-oriented filter.
    pub fn as_filter(&self) -> &BloomFilter<H> {
        &self.filter
    }

    /// Unwraps into the byte-oriented filter.
    pub fn into_inner(self) -> BloomFilter<H> {
        self.filter
    }
}

impl<T, H: Clone> Clone for TypedBloomFilter<T, H> {
    fn clone(&self) -> Self {
        TypedBloomFilter {
            filter: self.filter.clone(),
            _item: PhantomData,
        }
    }
}

impl<T, H: PartialEq> PartialEq for TypedBloomFilter<T, H> {
    fn eq(&self, other: &Self) -> bool {
        self.filter == other.filter
    }
}

impl<T, H: fmt::Debug> fmt::Debug for TypedBloomFilter<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedBloomFilter")
            .field("item", &std::any::type_name::<T>())
            .field("filter", &self.filter)
            .finish()
    }
}
