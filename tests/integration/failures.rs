//! Store failures surface as errors; a retried add completes the index.

use crate::common::{assert_index_well_formed, char_index, set, snapshot};
use simgram::testing::{FailOn, FailingStore};
use simgram::{
    parse_terms, CharacterNgramExtractor, FeatureIndex, IndexError, KeyValueStore, Measure,
    Searcher, StoreError, TermFormat,
};

fn failing_index(store: FailingStore) -> FeatureIndex<CharacterNgramExtractor, FailingStore> {
    FeatureIndex::new(CharacterNgramExtractor::default(), store)
}

fn is_io(err: &IndexError) -> bool {
    matches!(err, IndexError::Store(StoreError::Io(_)))
}

#[test]
fn test_write_failure_propagates_from_add() {
    let index = failing_index(FailingStore::new(FailOn::Write));
    let err = index.add("kidney").unwrap_err();
    assert!(is_io(&err), "{err}");
    assert!(err.to_string().contains("injected"), "{err}");
}

#[test]
fn test_read_failure_is_an_error_not_an_empty_result() {
    let index = failing_index(FailingStore::new(FailOn::Read));
    assert!(is_io(&index.lookup(4, "kid1").unwrap_err()));
    assert!(is_io(&index.add("kidney").unwrap_err()));
    assert!(is_io(&index.strings().unwrap_err()));

    let mut searcher = Searcher::new(&index, Measure::Cosine);
    assert!(is_io(&searcher.search("kidney", 0.5).unwrap_err()));
}

#[test]
fn test_sync_failure_reports_after_the_write() {
    let index = failing_index(FailingStore::new(FailOn::Sync));
    assert!(is_io(&index.add("kidney").unwrap_err()));

    // The write landed before the barrier failed.
    assert_eq!(index.lookup(4, "kid1").unwrap(), set(&["kidney"]));
    assert_eq!(index.with_store(|store| store.sync_calls), 1);
}

#[test]
fn test_bulk_add_syncs_once() {
    let index = failing_index(FailingStore::default());
    index.add_all(&["kidney", "kidneys", "diabetes"]).unwrap();
    assert_eq!(index.with_store(|store| store.sync_calls), 1);
}

#[test]
fn test_failure_mid_bulk_add_leaves_a_prefix() {
    let index = failing_index(FailingStore::failing_writes_after(1));
    let terms = ["kidney", "kidneys", "diabetes"];

    assert!(is_io(&index.add_all(&terms).unwrap_err()));
    assert_eq!(index.strings().unwrap(), set(&["kidney"]));
    // The barrier never ran.
    assert_eq!(index.with_store(|store| store.sync_calls), 0);
}

#[test]
fn test_retry_after_failure_completes_the_index() {
    let index = failing_index(FailingStore::failing_writes_after(2));
    let terms = ["kidney", "kidneys", "kidney failure", "diabetes"];
    assert!(index.add_all(&terms).is_err());

    index.with_store_mut(|store| store.heal());
    index.add_all(&terms).unwrap();

    let clean = char_index();
    clean.add_all(&terms).unwrap();
    assert_eq!(snapshot(&index), snapshot(&clean));
    assert_index_well_formed(&index);
}

#[test]
fn test_malformed_input_never_reaches_the_store() {
    let index = failing_index(FailingStore::new(FailOn::Write));
    let err = parse_terms(r#"["kidney", null]"#, TermFormat::Json).unwrap_err();
    assert!(matches!(err, IndexError::TypeMismatch { .. }), "{err}");
    assert!(index.strings().unwrap().is_empty());
}

#[test]
fn test_featureless_add_registers_an_empty_bucket_zero() {
    let index = failing_index(FailingStore::default());
    assert_eq!(index.add("ab").unwrap(), 0);

    index.with_store(|store| {
        assert!(store.exists(0).unwrap());
        assert!(store.keys(0).unwrap().is_empty());
    });
    for feature in [" a1", "ab1", "b 1", "ab"] {
        assert!(index.lookup(0, feature).unwrap().is_empty());
    }
    assert!(index.strings().unwrap().is_empty());
}

#[test]
fn test_featureless_add_propagates_write_failure() {
    let index = failing_index(FailingStore::new(FailOn::Write));
    assert!(is_io(&index.add("ab").unwrap_err()));
    assert!(!index.with_store(|store| store.exists(0).unwrap()));
}
