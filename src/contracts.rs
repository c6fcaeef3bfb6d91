// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime contracts for extraction and index writes.
//!
//! Debug-mode assertions only: they cost nothing in release builds and fail
//! loudly while tests run. Each one states an invariant the rest of the crate
//! relies on.
//!
//! | Contract                     | Invariant                                              |
//! |------------------------------|--------------------------------------------------------|
//! | `check_features_distinct`    | one extraction never emits the same feature twice      |
//! | `check_feature_count`        | produced ≤ max(0, raw windows − 2(n−1))                |
//! | `check_bucket_write`         | a written set holds the string and only bucket members |

use std::collections::HashSet;

use crate::types::{Bucket, Feature, FeatureMap};

/// Check that a feature sequence has no duplicates.
///
/// # Panics (debug builds only)
/// Panics if two features share the same text.
#[inline]
pub fn check_features_distinct(features: &[Feature]) {
    if cfg!(debug_assertions) {
        let mut seen: HashSet<&str> = HashSet::with_capacity(features.len());
        for (i, feature) in features.iter().enumerate() {
            debug_assert!(
                seen.insert(feature.as_str()),
                "Contract violation: duplicate feature {:?} at position {}",
                feature.as_str(),
                i
            );
        }
    }
}

/// Check the trimmed feature count against the raw window count.
#[inline]
pub fn check_feature_count(raw_windows: usize, n: usize, produced: usize) {
    let bound = raw_windows.saturating_sub(2 * n.saturating_sub(1));
    debug_assert!(
        produced <= bound,
        "Contract violation: {} features from {} windows (n = {}), bound is {}",
        produced,
        raw_windows,
        n,
        bound
    );
}

/// Check a pending write before it reaches the store.
///
/// `bucket_of` recomputes a member's feature count.
///
/// # Panics (debug builds only)
/// Panics if any set lacks `string` or holds a string whose feature count is
/// not `bucket`.
#[inline]
pub fn check_bucket_write(
    bucket: Bucket,
    string: &str,
    entries: &FeatureMap,
    bucket_of: impl Fn(&str) -> Bucket,
) {
    if cfg!(debug_assertions) {
        for (feature, strings) in entries {
            debug_assert!(
                strings.contains(string),
                "Contract violation: write to ({}, {:?}) does not contain {:?}",
                bucket,
                feature,
                string
            );
            for member in strings {
                let size = bucket_of(member);
                debug_assert!(
                    size == bucket,
                    "Contract violation: {:?} has {} features but sits in bucket {}",
                    member,
                    size,
                    bucket
                );
            }
        }
    }
}
