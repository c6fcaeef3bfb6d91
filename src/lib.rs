// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! N-gram feature extraction and a size-bucketed feature index for
//! approximate string matching.
//!
//! Strings are turned into ordinal-disambiguated n-gram features and
//! registered in a store under the bucket equal to their feature count. A
//! search for strings similar to a query then only reads the few buckets
//! whose sizes can possibly reach the similarity threshold.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  ngram/     │────▶│  index.rs    │────▶│  search.rs  │
//! │ (character, │     │ (add, lookup,│     │ (CPMerge,   │
//! │  word)      │     │  buckets)    │     │  similarity)│
//! └─────────────┘     └──────────────┘     └─────────────┘
//!        │                   │                    │
//!        ▼                   ▼                    ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                    store/                           │
//! │  KeyValueStore: MemoryStore, FileStore (checksummed │
//! │  single-file format)                                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! | Module        | Role                                              |
//! |---------------|---------------------------------------------------|
//! | `ngram`       | Extraction, ordinal disambiguation, trimming      |
//! | `index`       | `FeatureIndex`: bucket registration and lookup    |
//! | `store`       | The key-value capability and two engines          |
//! | `similarity`  | Measures and the size/overlap bounds they imply   |
//! | `search`      | Approximate search built on `lookup`              |
//! | `config`      | Persistable extractor configuration               |
//! | `contracts`   | Debug-only invariant checks                       |
//!
//! # Usage
//!
//! ```
//! use simgram::{FeatureIndex, MemoryStore, Measure, Searcher, WordNgramExtractor};
//!
//! let index = FeatureIndex::new(WordNgramExtractor::default(), MemoryStore::new());
//! let size = index.add("the quick brown fox jumps").unwrap();
//! assert_eq!(size, 3);
//!
//! let hits = index.lookup(3, "quick brown fox1").unwrap();
//! assert!(hits.contains("the quick brown fox jumps"));
//!
//! let mut searcher = Searcher::new(&index, Measure::Cosine);
//! let matches = searcher.search("the quick brown fox jumps", 0.8).unwrap();
//! assert_eq!(matches[0].string, "the quick brown fox jumps");
//! ```

pub mod config;
pub mod contracts;
pub mod error;
pub mod index;
pub mod input;
pub mod ngram;
pub mod search;
pub mod similarity;
pub mod store;
pub mod testing;
pub mod types;
pub mod utils;

pub use config::{Extractor, ExtractorKind, IndexConfig, Normalization};
pub use error::{IndexError, Result, StoreError, StoreResult};
pub use index::FeatureIndex;
pub use input::{parse_bucket, parse_terms, TermFormat};
pub use ngram::{CharacterNgramExtractor, FeatureExtractor, NgramExtractor, WordNgramExtractor};
pub use search::{Match, Searcher};
pub use similarity::Measure;
pub use store::{FileStore, KeyValueStore, MemoryStore, OpenMode};
pub use types::{AddSummary, Bucket, BucketStats, Feature, FeatureMap, IndexStats, StringSet};
pub use utils::fold;
