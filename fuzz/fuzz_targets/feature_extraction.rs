// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for feature extraction and the index built on it.
//!
//! Emoji, combining marks, null bytes, delimiters everywhere. Extraction has
//! no failure mode, so none of it may panic, and the structural guarantees
//! must hold for every input.

#![no_main]

use std::collections::HashSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use simgram::{
    CharacterNgramExtractor, FeatureExtractor, FeatureIndex, MemoryStore, WordNgramExtractor,
};

#[derive(Debug, Arbitrary)]
struct Input {
    text: String,
    n: u8,
    word: bool,
}

fuzz_target!(|input: Input| {
    let n = (input.n % 6) as usize + 1;
    let mut end = input.text.len().min(256);
    while !input.text.is_char_boundary(end) {
        end -= 1;
    }
    let text = &input.text[..end];

    let extractor: Box<dyn FeatureExtractor> = if input.word {
        Box::new(WordNgramExtractor::new(n, "#").expect("n >= 1"))
    } else {
        Box::new(CharacterNgramExtractor::new(n, ' ').expect("n >= 1"))
    };

    let features = extractor.features(text);

    // Features within one extraction are pairwise distinct
    let distinct: HashSet<&str> = features.iter().map(|f| f.as_str()).collect();
    assert_eq!(distinct.len(), features.len());

    // Same input, same output
    assert_eq!(features, extractor.features(text));

    // Round-trip through the index
    let index = FeatureIndex::new(extractor, MemoryStore::new());
    let size = index.add(text).expect("memory store cannot fail");
    assert_eq!(size, features.len());
    for feature in &features {
        assert!(index
            .lookup(size, feature.as_str())
            .expect("memory store cannot fail")
            .contains(text));
    }
});
