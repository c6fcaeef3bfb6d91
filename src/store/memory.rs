// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! In-memory store.

use std::collections::HashMap;

use super::KeyValueStore;
use crate::error::StoreResult;
use crate::types::{Bucket, FeatureMap, StringSet};

/// Hash-map backed store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    buckets: HashMap<Bucket, HashMap<String, StringSet>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of (bucket, feature) pairs.
    pub fn entry_count(&self) -> usize {
        self.buckets.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn exists(&self, bucket: Bucket) -> StoreResult<bool> {
        Ok(self.buckets.contains_key(&bucket))
    }

    fn keys(&self, bucket: Bucket) -> StoreResult<Vec<String>> {
        Ok(self
            .buckets
            .get(&bucket)
            .map(|features| features.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn get(&self, bucket: Bucket, feature: &str) -> StoreResult<Option<StringSet>> {
        Ok(self
            .buckets
            .get(&bucket)
            .and_then(|features| features.get(feature))
            .cloned())
    }

    fn set(&mut self, bucket: Bucket, entries: FeatureMap) -> StoreResult<()> {
        // An empty write still creates the bucket.
        self.buckets.entry(bucket).or_default().extend(entries);
        Ok(())
    }

    fn sync(&mut self) -> StoreResult<()> {
        Ok(())
    }

    fn buckets(&self) -> StoreResult<Vec<Bucket>> {
        let mut sizes: Vec<Bucket> = self.buckets.keys().copied().collect();
        sizes.sort_unstable();
        Ok(sizes)
    }

    fn clear(&mut self) -> StoreResult<()> {
        self.buckets.clear();
        Ok(())
    }

    fn len(&self, bucket: Bucket) -> StoreResult<usize> {
        Ok(self.buckets.get(&bucket).map_or(0, HashMap::len))
    }
}
