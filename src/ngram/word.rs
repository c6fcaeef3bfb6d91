// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Word-level n-grams: each feature is a window of `n` words.

use super::{FeatureExtractor, NgramExtractor, DEFAULT_BOUNDARY, DEFAULT_N};
use crate::error::{IndexError, Result};
use crate::types::Feature;

/// Delimiter used by [`FeatureExtractor::features`].
pub const DEFAULT_DELIMITER: &str = " ";

/// Splits text into words, pads with `n-1` boundary words on each side and
/// runs the shared algorithm. Window words are joined with the delimiter, so
/// a feature reads like the slice of padded text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordNgramExtractor {
    base: NgramExtractor,
    delimiter: String,
}

impl WordNgramExtractor {
    pub fn new(n: usize, boundary: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base: NgramExtractor::new(n, boundary)?,
            delimiter: DEFAULT_DELIMITER.to_string(),
        })
    }

    /// Replace the delimiter used when none is passed per call.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Result<Self> {
        let delimiter = delimiter.into();
        if delimiter.is_empty() {
            return Err(IndexError::InvalidConfig(
                "word delimiter must not be empty".to_string(),
            ));
        }
        self.delimiter = delimiter;
        Ok(self)
    }

    pub fn boundary(&self) -> &str {
        self.base.boundary()
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Extract with an explicit delimiter for this call.
    ///
    /// Consecutive delimiters produce empty words, which count as units. An
    /// empty delimiter does not split at all: the whole text is one word.
    pub fn features_with_delimiter(&self, text: &str, delimiter: &str) -> Vec<Feature> {
        let pad = self.base.padding();
        let boundary = self.base.boundary();

        let mut units: Vec<&str> = Vec::with_capacity(2 * pad + 8);
        units.extend(std::iter::repeat(boundary).take(pad));
        if delimiter.is_empty() {
            units.push(text);
        } else {
            units.extend(text.split(delimiter));
        }
        units.extend(std::iter::repeat(boundary).take(pad));

        self.base.extract(&units, delimiter)
    }
}

impl Default for WordNgramExtractor {
    fn default() -> Self {
        Self {
            base: NgramExtractor {
                n: DEFAULT_N,
                boundary: DEFAULT_BOUNDARY.to_string(),
            },
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

impl FeatureExtractor for WordNgramExtractor {
    fn n(&self) -> usize {
        self.base.n()
    }

    fn features(&self, text: &str) -> Vec<Feature> {
        self.features_with_delimiter(text, &self.delimiter)
    }
}
