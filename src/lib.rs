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

//! # bloomset
//!
//! A fixed-capacity Bloom filter: a constant-size bit array that answers "possibly present" or
//! "definitely absent" for a stream of items, with a tunable false positive rate and no false
//! negatives.
//!
//! - [`bloom`] holds the filter, its bit vector, the builder and the typed wrapper.
//! - [`hash`] holds the 128-bit hash engines that feed the filter's double hashing.
//! - [`error`] holds the error type returned by fallible operations.
//!
//! Filters log construction and rejected merges through [`tracing`]; install a subscriber to
//! see them.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub mod bloom;
pub mod error;
pub mod hash;
