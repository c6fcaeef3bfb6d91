// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Core value types shared by the extractors, stores and the index.
//!
//! A [`Feature`] is the text of one n-length window with its ordinal suffix
//! attached. Features are what the stores key on, so they are plain strings
//! underneath; the newtype only exists to keep "window text" and "indexed
//! string" from being mixed up at call sites.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Index partition key: the number of features a string produced.
pub type Bucket = usize;

/// Set of indexed strings attached to one (bucket, feature) pair.
///
/// Ordered so that persisted stores encode deterministically and lookups
/// print in a stable order.
pub type StringSet = BTreeSet<String>;

/// Feature text → string set, the unit a store writes in one call.
pub type FeatureMap = BTreeMap<String, StringSet>;

/// One disambiguated n-gram: raw window text followed by its ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feature(String);

impl Feature {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Feature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Feature {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Feature {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Feature {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for Feature {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Feature {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Per-bucket counts reported by [`crate::FeatureIndex::stats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketStats {
    pub size: Bucket,
    pub features: usize,
    pub strings: usize,
}

/// Whole-index counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub buckets: Vec<BucketStats>,
    pub total_strings: usize,
    pub total_features: usize,
}

/// Outcome of a bulk [`crate::FeatureIndex::add_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddSummary {
    /// Strings that went through registration, including unsearchable ones.
    pub added: usize,
    /// Strings that produced zero features and are therefore never returned.
    pub unsearchable: usize,
    /// Distinct bucket sizes written during the call.
    pub buckets: BTreeSet<Bucket>,
}
