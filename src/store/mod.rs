// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The key-value capability the feature index is built on.
//!
//! A store is a two-level map, bucket → feature text → string set. The index
//! only needs existence checks, key enumeration, point reads, writes and a
//! durability barrier, so any engine that can do those is substitutable:
//!
//! - [`MemoryStore`]: hash maps, `sync` is a no-op. Tests and throwaway indexes.
//! - [`FileStore`]: one checksummed file, writes buffered until `sync`.
//!
//! Stores take `&mut self` for writes and make no concurrency promises of
//! their own; [`crate::FeatureIndex`] serializes writers in front of them.

pub mod encoding;
pub mod file;
pub mod header;
pub mod memory;

pub use file::{FileStore, OpenMode};
pub use memory::MemoryStore;

use crate::error::StoreResult;
use crate::types::{Bucket, FeatureMap, StringSet};

/// Persistent mapping `(bucket, feature) → string set`.
pub trait KeyValueStore {
    /// Whether anything is registered under `bucket`.
    fn exists(&self, bucket: Bucket) -> StoreResult<bool>;

    /// Feature identifiers registered under `bucket` (empty if none).
    fn keys(&self, bucket: Bucket) -> StoreResult<Vec<String>>;

    /// The stored set, or `None` when the pair is not registered.
    fn get(&self, bucket: Bucket, feature: &str) -> StoreResult<Option<StringSet>>;

    /// Write every `feature → set` entry under `bucket`, replacing existing sets.
    /// An empty `entries` still creates the bucket.
    fn set(&mut self, bucket: Bucket, entries: FeatureMap) -> StoreResult<()>;

    /// Make previous writes durable.
    fn sync(&mut self) -> StoreResult<()>;

    /// All bucket sizes present, ascending.
    fn buckets(&self) -> StoreResult<Vec<Bucket>>;

    /// Remove every bucket.
    fn clear(&mut self) -> StoreResult<()>;

    /// Number of features registered under `bucket`.
    fn len(&self, bucket: Bucket) -> StoreResult<usize> {
        Ok(self.keys(bucket)?.len())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn exists(&self, bucket: Bucket) -> StoreResult<bool> {
        (**self).exists(bucket)
    }

    fn keys(&self, bucket: Bucket) -> StoreResult<Vec<String>> {
        (**self).keys(bucket)
    }

    fn get(&self, bucket: Bucket, feature: &str) -> StoreResult<Option<StringSet>> {
        (**self).get(bucket, feature)
    }

    fn set(&mut self, bucket: Bucket, entries: FeatureMap) -> StoreResult<()> {
        (**self).set(bucket, entries)
    }

    fn sync(&mut self) -> StoreResult<()> {
        (**self).sync()
    }

    fn buckets(&self) -> StoreResult<Vec<Bucket>> {
        (**self).buckets()
    }

    fn clear(&mut self) -> StoreResult<()> {
        (**self).clear()
    }

    fn len(&self, bucket: Bucket) -> StoreResult<usize> {
        (**self).len(bucket)
    }
}
