// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Character-level n-grams over Unicode scalar values.

use super::{FeatureExtractor, NgramExtractor, DEFAULT_N};
use crate::error::{IndexError, Result};
use crate::types::Feature;

/// Pads the text with `n-1` boundary characters on each side and windows
/// over its chars. Each raw window is an n-character substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterNgramExtractor {
    base: NgramExtractor,
    boundary: char,
}

impl CharacterNgramExtractor {
    pub fn new(n: usize, boundary: char) -> Result<Self> {
        Ok(Self {
            base: NgramExtractor::new(n, boundary.to_string())?,
            boundary,
        })
    }

    /// Build from a textual boundary, which must be exactly one character.
    pub fn from_boundary_str(n: usize, boundary: &str) -> Result<Self> {
        let mut chars = boundary.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::new(n, c),
            _ => Err(IndexError::InvalidConfig(format!(
                "character boundary must be a single character, got {:?}",
                boundary
            ))),
        }
    }

    pub fn boundary(&self) -> char {
        self.boundary
    }
}

impl Default for CharacterNgramExtractor {
    fn default() -> Self {
        Self {
            base: NgramExtractor {
                n: DEFAULT_N,
                boundary: " ".to_string(),
            },
            boundary: ' ',
        }
    }
}

impl FeatureExtractor for CharacterNgramExtractor {
    fn n(&self) -> usize {
        self.base.n()
    }

    fn features(&self, text: &str) -> Vec<Feature> {
        let pad = self.base.padding();
        let mut buf = [0u8; 4];
        let boundary: &str = self.boundary.encode_utf8(&mut buf);

        let mut units: Vec<&str> = Vec::with_capacity(text.len() + 2 * pad);
        units.extend(std::iter::repeat(boundary).take(pad));
        units.extend(text.char_indices().map(|(i, c)| &text[i..i + c.len_utf8()]));
        units.extend(std::iter::repeat(boundary).take(pad));

        self.base.extract(&units, "")
    }
}
