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

use std::collections::HashSet;

use bloomset::bloom::BloomFilter;
use bloomset::bloom::BloomFilterBuilder;
use bloomset::error::ErrorKind;
use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::eq;
use googletest::prelude::lt;

fn filled_filter(range: std::ops::Range<u64>) -> BloomFilter {
    let mut filter = BloomFilter::new(10_000, 1000);
    for i in range {
        filter.insert(i.to_le_bytes());
    }
    filter
}

/// Finds an item none of whose bit positions overlap with `item`'s.
fn disjoint_item(filter: &BloomFilter, item: &[u8]) -> [u8; 8] {
    let taken: HashSet<u64> = filter.bit_indices(item).collect();
    (0_u64..)
        .map(u64::to_le_bytes)
        .find(|candidate| filter.bit_indices(candidate).all(|i| !taken.contains(&i)))
        .unwrap()
}

#[test]
fn test_no_false_negatives() {
    let mut filter = filled_filter(0..1000);
    for i in 0..1000_u64 {
        assert!(filter.contains(i.to_le_bytes()), "missing {i}");
    }

    // still present after more inserts and a union
    for i in 5000..5500_u64 {
        filter.insert(i.to_le_bytes());
    }
    filter.union(&filled_filter(2000..2500)).unwrap();
    for i in (0..1000_u64).chain(2000..2500).chain(5000..5500) {
        assert!(filter.contains(i.to_le_bytes()), "missing {i}");
    }
}

#[test]
fn test_empty_filter_has_no_members() {
    let filter = BloomFilter::new(10_000, 1000);
    assert!(filter.is_empty());
    for i in 0..10_000_u64 {
        assert!(!filter.contains(i.to_le_bytes()));
    }
    assert!(!filter.contains(b""));
    assert!(!filter.contains("anything"));
}

#[test]
fn test_empty_item() {
    let mut filter = BloomFilter::new(1000, 10);
    filter.insert(b"");
    assert!(filter.contains(b""));
    assert!(filter.contains(""));
}

#[test]
fn test_hash_count_derivation() {
    assert_that!(BloomFilter::new(2500, 500).num_hashes(), eq(3));
    // 6.93 rounds down
    assert_that!(BloomFilter::new(1000, 100).num_hashes(), eq(6));
    assert_that!(BloomFilter::new(3600, 300).num_hashes(), eq(8));
    assert_that!(BloomFilter::new(3600, 0).num_hashes(), eq(1));

    let filter = BloomFilterBuilder::with_capacity(3600)
        .expected_items(300)
        .num_hashes(11)
        .build();
    assert_that!(filter.num_hashes(), eq(11));
}

#[test]
fn test_union() {
    let mut f1 = BloomFilter::new(1000, 100);
    let mut f2 = BloomFilter::new(1000, 100);
    f1.insert("a");
    f2.insert("b");
    let f2_before = f2.clone();

    f1.union(&f2).unwrap();
    assert!(f1.contains("a"));
    assert!(f1.contains("b"));
    assert_eq!(f2, f2_before);
}

#[test]
fn test_intersect_is_conservative() {
    let mut f1 = BloomFilter::new(1000, 100);
    let mut f2 = BloomFilter::new(1000, 100);
    let a = 7_u64.to_le_bytes();
    let b = disjoint_item(&f1, &a);
    f1.insert(a);
    f2.insert(b);

    f1.intersect(&f2).unwrap();
    assert!(!f1.contains(a));
    assert!(!f1.contains(b));
    assert!(f1.is_empty());
}

#[test]
fn test_intersect_keeps_common_items() {
    let mut f1 = filled_filter(0..600);
    let f2 = filled_filter(400..1000);

    f1.intersect(&f2).unwrap();
    for i in 400..600_u64 {
        assert!(f1.contains(i.to_le_bytes()), "missing {i}");
    }
}

#[test]
fn test_incompatible_merge_rejected() {
    let mut f1 = BloomFilterBuilder::with_capacity(1000).num_hashes(3).build();
    let mut f2 = BloomFilterBuilder::with_capacity(1000).num_hashes(4).build();
    f1.insert("a");
    f2.insert("b");
    let (f1_before, f2_before) = (f1.clone(), f2.clone());

    let err = f1.union(&f2).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::IncompatibleFilter));
    assert_that!(err.message(), contains_substring("hash counts differ"));
    assert_that!(err.context("self_num_hashes"), eq(Some("3")));
    assert_that!(err.context("other_num_hashes"), eq(Some("4")));

    let err = f1.intersect(&f2).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::IncompatibleFilter));
    assert_that!(err.to_string().as_str(), contains_substring("cannot intersect"));

    assert_eq!(f1, f1_before);
    assert_eq!(f2, f2_before);
}

#[test]
fn test_copy_independence() {
    let original = filled_filter(0..100);
    let mut copy = original.clone();
    for i in 100..1000_u64 {
        copy.insert(i.to_le_bytes());
    }

    let fresh = filled_filter(0..100);
    assert_eq!(original, fresh);
    for i in 0..20_000_u64 {
        assert_eq!(
            original.contains(i.to_le_bytes()),
            fresh.contains(i.to_le_bytes())
        );
    }
}

#[test]
fn test_insert_is_idempotent() {
    let mut once = BloomFilter::new(1000, 100);
    let mut twice = BloomFilter::new(1000, 100);
    once.insert("x");
    twice.insert("x");
    twice.insert("x");

    assert_eq!(once, twice);
    assert_eq!(once.bit_vector(), twice.bit_vector());
}

#[test]
fn test_false_positive_rate() {
    let filter = filled_filter(0..1000);
    let expected = filter.expected_fpp(1000);

    let probes = 100_000_u64;
    let false_positives = (1_000_000..1_000_000 + probes)
        .filter(|i: &u64| filter.contains(i.to_le_bytes()))
        .count();
    let rate = false_positives as f64 / probes as f64;

    assert_that!(rate, lt(expected * 2.0));
    assert_that!(filter.estimated_fpp(), lt(expected * 2.0));
}

#[test]
fn test_overfilled_filter_keeps_accepting() {
    let mut filter = BloomFilter::new(1000, 100);
    for i in 0..5000_u64 {
        filter.insert(i.to_le_bytes());
    }
    for i in 0..5000_u64 {
        assert!(filter.contains(i.to_le_bytes()));
    }
    assert!(filter.load_factor() > 0.99);
    assert!(filter.estimated_fpp() > 0.9);
}

#[test]
fn test_with_accuracy_reports_invalid_arguments() {
    for (max_items, fpp) in [(100, f64::NAN), (100, 0.0), (100, 1.0), (0, 0.01)] {
        let err = BloomFilterBuilder::with_accuracy(max_items, fpp)
            .try_build()
            .unwrap_err();
        assert_that!(err.kind(), eq(ErrorKind::InvalidArgument));
    }
    assert!(BloomFilterBuilder::with_accuracy(100, 0.01).try_build().is_ok());
}
