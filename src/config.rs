// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index configuration and the extractor it describes.
//!
//! The configuration is persisted next to an index (see
//! [`crate::FileStore::metadata`]) so the index can be reopened with the
//! extractor that built it. Features from one configuration are meaningless
//! to another.
//!
//! ```json
//! { "kind": "word", "n": 2, "boundary": "#", "delimiter": ",", "normalization": "fold" }
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};
use crate::ngram::word::DEFAULT_DELIMITER;
use crate::ngram::{
    CharacterNgramExtractor, FeatureExtractor, WordNgramExtractor, DEFAULT_BOUNDARY, DEFAULT_N,
};
use crate::types::Feature;
use crate::utils::fold;

/// Unit the n-grams are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    #[default]
    Character,
    Word,
}

impl FromStr for ExtractorKind {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "character" | "char" => Ok(ExtractorKind::Character),
            "word" => Ok(ExtractorKind::Word),
            other => Err(IndexError::InvalidConfig(format!(
                "unknown extractor kind {:?} (expected character or word)",
                other
            ))),
        }
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExtractorKind::Character => "character",
            ExtractorKind::Word => "word",
        })
    }
}

/// Text transformation applied before extraction.
///
/// Only features see the normalized text. Stored and returned strings are
/// always the caller's originals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    #[default]
    None,
    Lowercase,
    /// Lowercase, strip diacritics, collapse whitespace.
    Fold,
}

impl Normalization {
    pub fn apply<'a>(self, text: &'a str) -> Cow<'a, str> {
        match self {
            Normalization::None => Cow::Borrowed(text),
            Normalization::Lowercase => Cow::Owned(text.to_lowercase()),
            Normalization::Fold => Cow::Owned(fold(text)),
        }
    }
}

impl FromStr for Normalization {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Normalization::None),
            "lowercase" | "lower" => Ok(Normalization::Lowercase),
            "fold" => Ok(Normalization::Fold),
            other => Err(IndexError::InvalidConfig(format!(
                "unknown normalization {:?} (expected none, lowercase or fold)",
                other
            ))),
        }
    }
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Normalization::None => "none",
            Normalization::Lowercase => "lowercase",
            Normalization::Fold => "fold",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexConfig {
    pub kind: ExtractorKind,
    pub n: usize,
    pub boundary: String,
    /// Word splitting delimiter. Ignored by character extraction.
    pub delimiter: String,
    pub normalization: Normalization,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            kind: ExtractorKind::default(),
            n: DEFAULT_N,
            boundary: DEFAULT_BOUNDARY.to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            normalization: Normalization::default(),
        }
    }
}

impl IndexConfig {
    pub fn character(n: usize) -> Self {
        Self {
            kind: ExtractorKind::Character,
            n,
            ..Self::default()
        }
    }

    pub fn word(n: usize) -> Self {
        Self {
            kind: ExtractorKind::Word,
            n,
            ..Self::default()
        }
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Reject settings no extractor can be built from.
    pub fn validate(&self) -> Result<()> {
        self.build_extractor().map(|_| ())
    }

    pub fn build_extractor(&self) -> Result<Extractor> {
        let ngrams = match self.kind {
            ExtractorKind::Character => Ngrams::Character(
                CharacterNgramExtractor::from_boundary_str(self.n, &self.boundary)?,
            ),
            ExtractorKind::Word => Ngrams::Word(
                WordNgramExtractor::new(self.n, self.boundary.clone())?
                    .with_delimiter(self.delimiter.clone())?,
            ),
        };
        Ok(Extractor {
            ngrams,
            normalization: self.normalization,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone)]
enum Ngrams {
    Character(CharacterNgramExtractor),
    Word(WordNgramExtractor),
}

/// Extractor chosen by an [`IndexConfig`], with its normalization applied.
#[derive(Debug, Clone)]
pub struct Extractor {
    ngrams: Ngrams,
    normalization: Normalization,
}

impl Extractor {
    pub fn kind(&self) -> ExtractorKind {
        match self.ngrams {
            Ngrams::Character(_) => ExtractorKind::Character,
            Ngrams::Word(_) => ExtractorKind::Word,
        }
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }
}

impl FeatureExtractor for Extractor {
    fn n(&self) -> usize {
        match &self.ngrams {
            Ngrams::Character(ex) => ex.n(),
            Ngrams::Word(ex) => ex.n(),
        }
    }

    fn features(&self, text: &str) -> Vec<Feature> {
        let text = self.normalization.apply(text);
        match &self.ngrams {
            Ngrams::Character(ex) => ex.features(&text),
            Ngrams::Word(ex) => ex.features(&text),
        }
    }
}
