// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! N-gram feature extraction with ordinal disambiguation.
//!
//! A string becomes a sequence of units (characters or words), padded by the
//! caller, and every contiguous window of `n` units becomes one raw window.
//! Repeated raw windows would collapse into a single set element and make
//! set-similarity coefficients undercount, so each window gets an ordinal
//! suffix: the first occurrence of `ab` is `ab1`, the second `ab2`, and so on
//! (Chaudhuri et al. 2006). Finally the `n-1` windows at each end are dropped,
//! since those are mostly boundary padding.
//!
//! ```text
//! units    ␣ ␣ t h e ␣ ␣          (n = 3, boundary ␣)
//! windows  ␣␣t ␣th the he␣ e␣␣
//! ordinal  ␣␣t1 ␣th1 the1 he␣1 e␣␣1
//! trimmed            the1
//! ```
//!
//! The extractor variants share the algorithm through [`NgramExtractor`] and
//! are used through the [`FeatureExtractor`] capability trait.

pub mod character;
pub mod word;

pub use character::CharacterNgramExtractor;
pub use word::WordNgramExtractor;

use std::collections::HashSet;

use crate::contracts::{check_feature_count, check_features_distinct};
use crate::error::{IndexError, Result};
use crate::types::Feature;

/// Window length used when none is configured.
pub const DEFAULT_N: usize = 3;

/// Padding unit used when none is configured.
pub const DEFAULT_BOUNDARY: &str = " ";

/// Anything that turns text into an ordered feature sequence.
///
/// Implementations are pure: same input and configuration, same output, no
/// shared state between calls. That makes extraction safe to fan out across
/// threads.
pub trait FeatureExtractor: Send + Sync {
    /// Window length.
    fn n(&self) -> usize;

    /// Extract the disambiguated, trimmed feature sequence of `text`.
    fn features(&self, text: &str) -> Vec<Feature>;
}

impl<E: FeatureExtractor + ?Sized> FeatureExtractor for Box<E> {
    fn n(&self) -> usize {
        (**self).n()
    }

    fn features(&self, text: &str) -> Vec<Feature> {
        (**self).features(text)
    }
}

/// Number of length-`n` windows over a sequence of `len` units.
#[inline]
pub fn raw_window_count(len: usize, n: usize) -> usize {
    if n == 0 || len < n {
        0
    } else {
        len - n + 1
    }
}

/// The shared windowing, disambiguation and trimming algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NgramExtractor {
    n: usize,
    boundary: String,
}

impl NgramExtractor {
    pub fn new(n: usize, boundary: impl Into<String>) -> Result<Self> {
        if n == 0 {
            return Err(IndexError::InvalidConfig(
                "n-gram window length must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            n,
            boundary: boundary.into(),
        })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Padding unit for callers that pad their sequence. Not applied here.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Copies of the boundary each side needs (`n - 1`).
    pub fn padding(&self) -> usize {
        self.n - 1
    }

    /// Extract features from an already padded unit sequence.
    ///
    /// Each raw window is the concatenation of its units separated by
    /// `joiner` (empty for characters). Never fails: a sequence shorter than
    /// `n`, or one with at most `2(n-1)` windows, yields no features.
    pub fn extract<U: AsRef<str>>(&self, units: &[U], joiner: &str) -> Vec<Feature> {
        let n = self.n;
        let window_count = raw_window_count(units.len(), n);
        if window_count == 0 {
            return Vec::new();
        }

        // Working set is local to this call; nothing is shared across calls.
        let mut seen: HashSet<String> = HashSet::with_capacity(window_count);
        let mut features: Vec<Feature> = Vec::with_capacity(window_count);

        for window in units.windows(n) {
            let raw = join_window(window, joiner);
            for ordinal in 1..window_count {
                let candidate = format!("{}{}", raw, ordinal);
                if !seen.contains(&candidate) {
                    seen.insert(candidate.clone());
                    features.push(Feature::new(candidate));
                    break;
                }
            }
        }

        let trim = n - 1;
        if features.len() < 2 * trim {
            return Vec::new();
        }
        features.truncate(features.len() - trim);
        features.drain(..trim);

        check_features_distinct(&features);
        check_feature_count(window_count, n, features.len());

        features
    }
}

fn join_window<U: AsRef<str>>(window: &[U], joiner: &str) -> String {
    let mut raw = String::new();
    for (i, unit) in window.iter().enumerate() {
        if i > 0 {
            raw.push_str(joiner);
        }
        raw.push_str(unit.as_ref());
    }
    raw
}
