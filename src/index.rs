// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Size-bucketed feature index.
//!
//! Every string is registered under the bucket equal to its feature count,
//! once per feature: `(size, feature) → {strings}`. Two strings can only be
//! similar if their feature counts are close, so a search reads a narrow band
//! of buckets and never the whole index.
//!
//! # Concurrency
//!
//! The store sits behind a reader-writer lock. `add`, `add_all` and `clear`
//! hold the write lock across the whole read-modify-write and the sync, so
//! concurrent adds never lose each other's membership. Reads share the lock.
//!
//! A store failure part way through `add` can leave some features registered
//! and others not. Re-issuing the same `add` completes it.

use std::collections::HashSet;

use parking_lot::RwLock;
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::contracts::check_bucket_write;
use crate::error::Result;
use crate::ngram::FeatureExtractor;
use crate::store::KeyValueStore;
use crate::types::{AddSummary, Bucket, BucketStats, Feature, FeatureMap, IndexStats, StringSet};

/// Feature index over a key-value store.
pub struct FeatureIndex<E, S> {
    extractor: E,
    store: RwLock<S>,
}

impl<E: FeatureExtractor, S: KeyValueStore> FeatureIndex<E, S> {
    pub fn new(extractor: E, store: S) -> Self {
        Self {
            extractor,
            store: RwLock::new(store),
        }
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Feature sequence the index would register `text` under.
    pub fn features(&self, text: &str) -> Vec<Feature> {
        self.extractor.features(text)
    }

    /// Register `string` and sync. Returns the bucket it went into.
    ///
    /// A string with no features lands in bucket 0 with no feature entries,
    /// so no lookup will ever return it. Adding the same string twice leaves
    /// the index unchanged.
    pub fn add(&self, string: &str) -> Result<Bucket> {
        let features = self.extractor.features(string);

        let mut store = self.store.write();
        let size = register(&mut *store, &self.extractor, string, &features)?;
        store.sync()?;

        debug!(size, features = features.len(), "added string");
        Ok(size)
    }

    /// Register many strings with a single sync at the end.
    pub fn add_all<T>(&self, strings: &[T]) -> Result<AddSummary>
    where
        T: AsRef<str> + Sync,
    {
        self.add_all_with(strings, |_, _| {})
    }

    /// [`add_all`](Self::add_all), calling `progress` after each string is
    /// registered.
    ///
    /// Extraction runs in parallel when the `parallel` feature is on;
    /// registration is always serialized under the write lock.
    pub fn add_all_with<T, F>(&self, strings: &[T], mut progress: F) -> Result<AddSummary>
    where
        T: AsRef<str> + Sync,
        F: FnMut(&str, Bucket),
    {
        // Borrow only the extractor: the store need not be Send or Sync.
        let extractor = &self.extractor;

        #[cfg(feature = "parallel")]
        let extracted: Vec<Vec<Feature>> = strings
            .par_iter()
            .map(|s| extractor.features(s.as_ref()))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let extracted: Vec<Vec<Feature>> = strings
            .iter()
            .map(|s| extractor.features(s.as_ref()))
            .collect();

        let mut summary = AddSummary::default();
        let mut store = self.store.write();
        for (string, features) in strings.iter().zip(&extracted) {
            let string = string.as_ref();
            let size = register(&mut *store, extractor, string, features)?;
            summary.added += 1;
            if features.is_empty() {
                summary.unsearchable += 1;
            } else {
                summary.buckets.insert(size);
            }
            progress(string, size);
        }
        store.sync()?;

        debug!(
            added = summary.added,
            unsearchable = summary.unsearchable,
            buckets = summary.buckets.len(),
            "bulk add finished"
        );
        Ok(summary)
    }

    /// Strings registered under `(size, feature)`. Empty when nothing is.
    pub fn lookup(&self, size: Bucket, feature: &str) -> Result<StringSet> {
        let store = self.store.read();
        Ok(store.get(size, feature)?.unwrap_or_default())
    }

    /// Every indexed string that produced at least one feature.
    pub fn strings(&self) -> Result<StringSet> {
        let store = self.store.read();
        let mut all = StringSet::new();
        for size in store.buckets()? {
            for feature in store.keys(size)? {
                if let Some(set) = store.get(size, &feature)? {
                    all.extend(set);
                }
            }
        }
        Ok(all)
    }

    /// Per-bucket feature and string counts.
    pub fn stats(&self) -> Result<IndexStats> {
        let store = self.store.read();
        let mut stats = IndexStats::default();
        let mut all: HashSet<String> = HashSet::new();

        for size in store.buckets()? {
            let keys = store.keys(size)?;
            let mut in_bucket: HashSet<String> = HashSet::new();
            for feature in &keys {
                if let Some(set) = store.get(size, feature)? {
                    in_bucket.extend(set);
                }
            }
            stats.total_features += keys.len();
            stats.buckets.push(BucketStats {
                size,
                features: keys.len(),
                strings: in_bucket.len(),
            });
            all.extend(in_bucket);
        }

        stats.total_strings = all.len();
        Ok(stats)
    }

    /// Drop everything and sync.
    pub fn clear(&self) -> Result<()> {
        let mut store = self.store.write();
        store.clear()?;
        store.sync()?;
        debug!("cleared index");
        Ok(())
    }

    /// Run `f` with shared access to the store.
    pub fn with_store<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.store.read())
    }

    /// Run `f` with exclusive access to the store.
    pub fn with_store_mut<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.store.write())
    }

    pub fn into_store(self) -> S {
        self.store.into_inner()
    }
}

/// Read-modify-write of one string's features into its bucket.
fn register<E: FeatureExtractor + ?Sized, S: KeyValueStore + ?Sized>(
    store: &mut S,
    extractor: &E,
    string: &str,
    features: &[Feature],
) -> Result<Bucket> {
    let size = features.len();
    if features.is_empty() {
        debug!(string, "string has no features, registered as unsearchable");
        store.set(size, FeatureMap::new())?;
        return Ok(size);
    }

    let mut entries = FeatureMap::new();
    if store.exists(size)? {
        let registered: HashSet<String> = store.keys(size)?.into_iter().collect();
        for feature in features {
            let mut set = if registered.contains(feature.as_str()) {
                store.get(size, feature.as_str())?.unwrap_or_default()
            } else {
                StringSet::new()
            };
            set.insert(string.to_string());
            entries.insert(feature.to_string(), set);
        }
    } else {
        for feature in features {
            entries.insert(feature.to_string(), StringSet::from([string.to_string()]));
        }
    }

    check_bucket_write(size, string, &entries, |s| extractor.features(s).len());
    trace!(size, writes = entries.len(), "writing bucket entries");
    store.set(size, entries)?;
    Ok(size)
}
