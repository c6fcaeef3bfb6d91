// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text folding applied before extraction.

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Fold text so accented and unaccented spellings share features:
/// "Café  au lait" → "cafe au lait".
///
/// NFD-decompose, drop combining marks, lowercase, collapse runs of
/// whitespace to one space and trim the ends.
#[cfg(feature = "unicode-normalization")]
pub fn fold(value: &str) -> String {
    let stripped: String = value.nfd().filter(|c| !is_combining_mark(*c)).collect();
    collapse_whitespace(&stripped.to_lowercase())
}

/// Without `unicode-normalization` only case and whitespace are folded.
#[cfg(not(feature = "unicode-normalization"))]
pub fn fold(value: &str) -> String {
    collapse_whitespace(&value.to_lowercase())
}

/// Replace every whitespace run with a single space, trimming both ends.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
