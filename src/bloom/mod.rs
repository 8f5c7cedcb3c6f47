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

//! Bloom Filter implementation for probabilistic set membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! an element is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not in set".
//!
//! # Properties
//!
//! - **No false negatives**: If an item was inserted, `contains()` will always return `true`
//! - **Possible false positives**: `contains()` may return `true` for items never inserted
//! - **Fixed size**: The bit array never grows; past the expected load the false positive
//!   rate climbs steadily, but inserts keep succeeding
//! - **No deletion**: Bits are only cleared by intersecting with another filter
//!
//! # Usage
//!
//! ```rust
//! use bloomset::bloom::BloomFilter;
//!
//! // 2500 bits for about 500 items: 5 bits per item, 3 hash functions
//! let mut filter = BloomFilter::new(2500, 500);
//! assert_eq!(filter.num_hashes(), 3);
//!
//! // Insert items
//! filter.insert("apple");
//! filter.insert(42_u64.to_le_bytes());
//!
//! // Check membership
//! assert!(filter.contains("apple")); // true - definitely inserted
//!
//! // Get statistics
//! println!("Capacity: {} bits", filter.capacity());
//! println!("Bits used: {}", filter.bits_used());
//! println!("Est. FPP: {:.4}%", filter.estimated_fpp() * 100.0);
//! ```
//!
//! # Creating Filters
//!
//! The capacity is fixed when the filter is built. The number of hash functions is either
//! derived from the expected item count or given explicitly:
//!
//! ```rust
//! # use bloomset::bloom::BloomFilterBuilder;
//! let derived = BloomFilterBuilder::with_capacity(3600)
//!     .expected_items(300) // 12 bits per item
//!     .build();
//! assert_eq!(derived.num_hashes(), 8);
//!
//! let explicit = BloomFilterBuilder::with_capacity(3600)
//!     .expected_items(300)
//!     .num_hashes(4) // wins over expected_items
//!     .seed(7)
//!     .build();
//! assert_eq!(explicit.num_hashes(), 4);
//! ```
//!
//! # Set Operations
//!
//! Filters with the same capacity, hash count and hash engine can be combined in place:
//!
//! ```rust
//! # use bloomset::bloom::BloomFilter;
//! let mut filter1 = BloomFilter::new(1000, 100);
//! let mut filter2 = BloomFilter::new(1000, 100);
//!
//! filter1.insert("a");
//! filter2.insert("b");
//!
//! // Union: recognizes items from either filter
//! filter1.union(&filter2).unwrap();
//! assert!(filter1.contains("a"));
//! assert!(filter1.contains("b"));
//!
//! // Mismatched filters are rejected without being modified
//! let other = BloomFilter::new(1000, 10);
//! assert!(filter1.intersect(&other).is_err());
//! ```
//!
//! # Typed Values
//!
//! [`TypedBloomFilter`] accepts fixed-size values such as integers and floats, encoding them
//! to little-endian bytes first:
//!
//! ```rust
//! # use bloomset::bloom::TypedBloomFilter;
//! let mut filter = TypedBloomFilter::<i32>::new(1000, 100);
//! filter.insert(&-17);
//! assert!(filter.contains(&-17));
//! ```
//!
//! # Implementation Details
//!
//! - Uses MurmurHash3 x64/128 for hashing by default; see [`Hash128`](crate::hash::Hash128)
//! - Implements double hashing (Kirsch-Mitzenmacher method) for k hash functions
//! - Bits packed efficiently in `u64` words
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/time trade-offs in hash coding with allowable errors"
//! - Kirsch and Mitzenmacher (2008). "Less Hashing, Same Performance: Building a Better Bloom
//!   Filter"

mod bit_vector;
mod builder;
mod sketch;
mod typed;

pub use self::bit_vector::BitVector;
pub use self::builder::BloomFilterBuilder;
pub use self::builder::MAX_NUM_BITS;
pub use self::builder::MAX_NUM_HASHES;
pub use self::builder::MIN_NUM_BITS;
pub use self::builder::MIN_NUM_HASHES;
pub use self::sketch::BitIndices;
pub use self::sketch::BloomFilter;
pub use self::typed::ByteView;
pub use self::typed::TypedBloomFilter;
