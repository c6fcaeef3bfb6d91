//! The five-word trigram example, end to end.

use crate::common::{assert_index_well_formed, set, word_index, QUICK_BROWN_FOX};
use simgram::KeyValueStore;

#[test]
fn test_worked_example_round_trip() {
    let index = word_index();
    let bucket = index.add(QUICK_BROWN_FOX).unwrap();
    assert_eq!(bucket, 3);

    for feature in index.features(QUICK_BROWN_FOX) {
        assert_eq!(index.lookup(3, feature.as_str()).unwrap(), set(&[QUICK_BROWN_FOX]));
    }
    assert_index_well_formed(&index);
}

#[test]
fn test_worked_example_lives_in_one_bucket_only() {
    let index = word_index();
    index.add(QUICK_BROWN_FOX).unwrap();

    for size in [0, 1, 2, 4, 7] {
        assert!(index.lookup(size, "quick brown fox1").unwrap().is_empty(), "bucket {size}");
    }
    let stats = index.stats().unwrap();
    assert_eq!(stats.buckets.len(), 1);
    assert_eq!(stats.buckets[0].size, 3);
    assert_eq!(stats.buckets[0].features, 3);
}

#[test]
fn test_sentences_sharing_a_window_share_a_set() {
    let index = word_index();
    index.add(QUICK_BROWN_FOX).unwrap();
    index.add("a quick brown fox sleeps").unwrap();
    index.add("the quick brown fox jumps high").unwrap();

    // Both five-word sentences have "quick brown fox" as their middle window.
    assert_eq!(
        index.lookup(3, "quick brown fox1").unwrap(),
        set(&["a quick brown fox sleeps", QUICK_BROWN_FOX])
    );
    // The six-word sentence has four features and lives elsewhere.
    assert_eq!(
        index.lookup(4, "quick brown fox1").unwrap(),
        set(&["the quick brown fox jumps high"])
    );
    assert_index_well_formed(&index);
}

#[test]
fn test_repeated_phrase_is_found_under_each_ordinal() {
    let index = word_index();
    let text = "to be or not to be or not";
    let bucket = index.add(text).unwrap();
    assert_eq!(bucket, 6);

    assert_eq!(index.lookup(6, "to be or1").unwrap(), set(&[text]));
    assert_eq!(index.lookup(6, "to be or2").unwrap(), set(&[text]));
    assert!(index.lookup(6, "to be or3").unwrap().is_empty());
}

#[test]
fn test_short_text_is_stored_but_unsearchable() {
    let index = word_index();
    assert_eq!(index.add("heart attack").unwrap(), 0);
    assert!(index.strings().unwrap().is_empty());
    index.with_store(|store| {
        assert!(store.exists(0).unwrap());
        assert!(store.keys(0).unwrap().is_empty());
        assert_eq!(store.buckets().unwrap(), vec![0]);
    });
}
