// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication.

#![doc(hidden)]

use std::io;

use crate::error::{StoreError, StoreResult};
use crate::index::FeatureIndex;
use crate::ngram::{CharacterNgramExtractor, WordNgramExtractor};
use crate::store::{KeyValueStore, MemoryStore};
use crate::types::{Bucket, Feature, FeatureMap, StringSet};

/// The worked example: five words, word trigrams, three features.
pub const QUICK_BROWN_FOX: &str = "the quick brown fox jumps";

/// Small medical vocabulary for search tests.
pub const VOCABULARY: &[&str] = &[
    "heart attack",
    "heart attacks",
    "heart failure",
    "cardiac arrest",
    "diabetes",
    "diabetes mellitus",
    "diabetic",
    "kidney",
    "kidney failure",
    "kidneys",
];

/// Word trigram index over a fresh memory store.
pub fn word_index() -> FeatureIndex<WordNgramExtractor, MemoryStore> {
    FeatureIndex::new(WordNgramExtractor::default(), MemoryStore::new())
}

/// Character trigram index over a fresh memory store.
pub fn char_index() -> FeatureIndex<CharacterNgramExtractor, MemoryStore> {
    FeatureIndex::new(CharacterNgramExtractor::default(), MemoryStore::new())
}

/// Character trigram index preloaded with `strings`.
pub fn char_index_with(strings: &[&str]) -> FeatureIndex<CharacterNgramExtractor, MemoryStore> {
    let index = char_index();
    for s in strings {
        if let Err(e) = index.add(s) {
            panic!("adding {s:?} to a memory store failed: {e}");
        }
    }
    index
}

/// Feature texts as plain strings, for assertions.
pub fn texts(features: &[Feature]) -> Vec<String> {
    features.iter().map(|f| f.as_str().to_string()).collect()
}

/// Which store operation a [`FailingStore`] breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Read,
    Write,
    Sync,
}

/// Memory store that fails one kind of operation with an I/O error.
///
/// `healthy_writes` lets that many `set` calls through before write
/// failures start, to leave an index part way through an `add`.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_on: Option<FailOn>,
    healthy_writes: usize,
    pub sync_calls: usize,
}

impl FailingStore {
    pub fn new(fail_on: FailOn) -> Self {
        Self {
            fail_on: Some(fail_on),
            ..Self::default()
        }
    }

    pub fn failing_writes_after(healthy_writes: usize) -> Self {
        Self {
            fail_on: Some(FailOn::Write),
            healthy_writes,
            ..Self::default()
        }
    }

    /// Stop failing.
    pub fn heal(&mut self) {
        self.fail_on = None;
    }

    fn check(&self, op: FailOn) -> StoreResult<()> {
        if self.fail_on == Some(op) {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::Other,
                format!("injected {op:?} failure"),
            )));
        }
        Ok(())
    }
}

impl KeyValueStore for FailingStore {
    fn exists(&self, bucket: Bucket) -> StoreResult<bool> {
        self.check(FailOn::Read)?;
        self.inner.exists(bucket)
    }

    fn keys(&self, bucket: Bucket) -> StoreResult<Vec<String>> {
        self.check(FailOn::Read)?;
        self.inner.keys(bucket)
    }

    fn get(&self, bucket: Bucket, feature: &str) -> StoreResult<Option<StringSet>> {
        self.check(FailOn::Read)?;
        self.inner.get(bucket, feature)
    }

    fn set(&mut self, bucket: Bucket, entries: FeatureMap) -> StoreResult<()> {
        if self.healthy_writes > 0 {
            self.healthy_writes -= 1;
        } else {
            self.check(FailOn::Write)?;
        }
        self.inner.set(bucket, entries)
    }

    fn sync(&mut self) -> StoreResult<()> {
        self.sync_calls += 1;
        self.check(FailOn::Sync)?;
        self.inner.sync()
    }

    fn buckets(&self) -> StoreResult<Vec<Bucket>> {
        self.check(FailOn::Read)?;
        self.inner.buckets()
    }

    fn clear(&mut self) -> StoreResult<()> {
        self.check(FailOn::Write)?;
        self.inner.clear()
    }
}
