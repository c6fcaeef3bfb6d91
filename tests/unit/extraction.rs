//! Feature extraction: windows, ordinals, padding and trimming.

use crate::common::{texts, QUICK_BROWN_FOX};
use simgram::{
    CharacterNgramExtractor, FeatureExtractor, IndexConfig, Normalization, WordNgramExtractor,
};
use std::collections::HashSet;

// ============================================================================
// WORD N-GRAMS
// ============================================================================

#[test]
fn test_worked_example_keeps_the_middle_windows() {
    let ex = WordNgramExtractor::new(3, " ").unwrap();
    assert_eq!(
        texts(&ex.features(QUICK_BROWN_FOX)),
        vec!["the quick brown1", "quick brown fox1", "brown fox jumps1"]
    );
}

#[test]
fn test_repeated_pairs_count_every_repetition() {
    let ex = WordNgramExtractor::new(2, " ").unwrap();
    let features = texts(&ex.features("a b a b a b"));
    assert_eq!(features, vec!["a b1", "b a1", "a b2", "b a2", "a b3"]);
}

#[test]
fn test_text_shorter_than_n_has_no_features() {
    let ex = WordNgramExtractor::new(3, " ").unwrap();
    // Two words padded to six units: four windows, all trimmed.
    assert!(ex.features("heart attack").is_empty());
    assert!(ex.features("heart").is_empty());
}

#[test]
fn test_exactly_n_words_yields_one_feature() {
    let ex = WordNgramExtractor::new(3, " ").unwrap();
    assert_eq!(texts(&ex.features("acute heart attack")), vec!["acute heart attack1"]);
}

#[test]
fn test_windows_touching_the_boundary_are_trimmed() {
    let ex = WordNgramExtractor::new(2, "<s>").unwrap();
    assert_eq!(texts(&ex.features("a b c")), vec!["a b1", "b c1"]);
}

#[test]
fn test_per_call_delimiter() {
    let ex = WordNgramExtractor::new(2, "#").unwrap();
    let comma = texts(&ex.features_with_delimiter("a,b,c", ","));
    assert_eq!(comma, vec!["a,b1", "b,c1"]);
    // Same text split on spaces is a single word.
    assert!(ex.features_with_delimiter("a,b,c", " ").is_empty());
}

#[test]
fn test_empty_delimiter_is_rejected_at_construction() {
    assert!(WordNgramExtractor::new(2, " ").unwrap().with_delimiter("").is_err());
}

// ============================================================================
// CHARACTER N-GRAMS
// ============================================================================

#[test]
fn test_character_trigrams_of_a_word() {
    let ex = CharacterNgramExtractor::default();
    assert_eq!(texts(&ex.features("kidney")), vec!["kid1", "idn1", "dne1", "ney1"]);
}

#[test]
fn test_character_feature_count_is_length_minus_n_plus_one() {
    let ex = CharacterNgramExtractor::default();
    for word in ["abc", "abcd", "diabetes", "cardiac arrest"] {
        let chars = word.chars().count();
        assert_eq!(ex.features(word).len(), chars - 2, "{word}");
    }
}

#[test]
fn test_unigrams_trim_nothing() {
    let ex = CharacterNgramExtractor::new(1, ' ').unwrap();
    assert_eq!(texts(&ex.features("aab")), vec!["a1", "a2", "b1"]);
}

#[test]
fn test_multi_character_boundary_is_rejected() {
    assert!(CharacterNgramExtractor::from_boundary_str(3, "$$").is_err());
    assert!(CharacterNgramExtractor::from_boundary_str(3, "").is_err());
    assert!(CharacterNgramExtractor::from_boundary_str(3, "$").is_ok());
}

#[test]
fn test_features_are_distinct_for_highly_repetitive_text() {
    let ex = CharacterNgramExtractor::new(2, ' ').unwrap();
    let features = ex.features("aaaaaaaaaa");
    let distinct: HashSet<_> = features.iter().collect();
    assert_eq!(distinct.len(), features.len());
    assert_eq!(features.len(), 9);
}

#[test]
fn test_extraction_is_deterministic() {
    let ex = CharacterNgramExtractor::default();
    assert_eq!(ex.features("heart failure"), ex.features("heart failure"));
}

// ============================================================================
// CONFIGURED EXTRACTORS
// ============================================================================

#[test]
fn test_configured_word_extractor_matches_direct_one() {
    let configured = IndexConfig::word(3).build_extractor().unwrap();
    let direct = WordNgramExtractor::default();
    assert_eq!(configured.features(QUICK_BROWN_FOX), direct.features(QUICK_BROWN_FOX));
}

#[test]
fn test_lowercase_normalization_merges_case_variants() {
    let ex = IndexConfig::character(3)
        .with_normalization(Normalization::Lowercase)
        .build_extractor()
        .unwrap();
    assert_eq!(ex.features("Kidney"), ex.features("kidney"));
}

#[test]
fn test_no_normalization_keeps_case_distinct() {
    let ex = IndexConfig::character(3).build_extractor().unwrap();
    assert_ne!(ex.features("Kidney"), ex.features("kidney"));
}

#[test]
fn test_boxed_extractor_delegates() {
    let boxed: Box<dyn FeatureExtractor> = Box::new(CharacterNgramExtractor::default());
    assert_eq!(boxed.n(), 3);
    assert_eq!(texts(&boxed.features("abcd")), vec!["abc1", "bcd1"]);
}
