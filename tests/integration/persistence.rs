//! File store persistence: reopen, metadata, read-only mode, damage.

use crate::common::{
    assert_index_well_formed, build_file_index, reopen_file_index, set, StoreFixture, VOCABULARY,
};
use simgram::store::header::MAX_FILE_SIZE;
use simgram::{
    CharacterNgramExtractor, FeatureIndex, FileStore, IndexConfig, IndexError, KeyValueStore,
    OpenMode, StoreError,
};
use std::fs;

#[test]
fn test_index_survives_reopen() {
    let fixture = StoreFixture::new();
    build_file_index(&fixture, VOCABULARY);

    let index = reopen_file_index(&fixture);
    assert_eq!(index.lookup(4, "kid1").unwrap(), set(&["kidney"]));
    assert_eq!(index.strings().unwrap().len(), VOCABULARY.len());
    assert_index_well_formed(&index);
}

#[test]
fn test_reopened_index_accepts_more_strings() {
    let fixture = StoreFixture::new();
    build_file_index(&fixture, &["kidney"]);
    {
        let store = FileStore::open(fixture.path()).unwrap();
        let index = FeatureIndex::new(CharacterNgramExtractor::default(), store);
        index.add("kidnap").unwrap();
    }

    let index = reopen_file_index(&fixture);
    assert_eq!(index.lookup(4, "kid1").unwrap(), set(&["kidnap", "kidney"]));
}

#[test]
fn test_open_creates_missing_file_on_first_sync() {
    let fixture = StoreFixture::new();
    let mut store = FileStore::open(fixture.path()).unwrap();
    assert!(!fixture.path().exists());
    assert!(store.is_dirty());

    store.sync().unwrap();
    assert!(fixture.path().exists());
    assert!(!store.is_dirty());
    assert!(FileStore::open_read_only(fixture.path()).unwrap().buckets().unwrap().is_empty());
}

#[test]
fn test_create_discards_existing_contents() {
    let fixture = StoreFixture::new();
    build_file_index(&fixture, VOCABULARY);

    let mut store = FileStore::create(fixture.path()).unwrap();
    assert!(store.buckets().unwrap().is_empty());
    store.sync().unwrap();
    assert!(reopen_file_index(&fixture).strings().unwrap().is_empty());
}

#[test]
fn test_nested_directories_are_created() {
    let fixture = StoreFixture::new();
    let path = fixture.dir.path().join("a").join("b").join("index.sgrm");
    let index = FeatureIndex::new(CharacterNgramExtractor::default(), FileStore::create(&path).unwrap());
    index.add("kidney").unwrap();
    assert!(path.exists());
}

#[test]
fn test_sync_leaves_no_temp_file() {
    let fixture = StoreFixture::new();
    build_file_index(&fixture, VOCABULARY);
    let names: Vec<String> = fs::read_dir(fixture.dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["index.sgrm"]);
}

#[test]
fn test_clean_sync_does_not_rewrite() {
    let fixture = StoreFixture::new();
    build_file_index(&fixture, &["kidney"]);
    let before = fs::read(fixture.path()).unwrap();

    let mut store = FileStore::open(fixture.path()).unwrap();
    assert!(!store.is_dirty());
    fs::remove_file(fixture.path()).unwrap();
    store.sync().unwrap();
    assert!(!fixture.path().exists(), "clean store wrote on sync");

    fs::write(fixture.path(), &before).unwrap();
    assert_eq!(FileStore::open(fixture.path()).unwrap().encoded_len(), before.len());
}

// ============================================================================
// METADATA
// ============================================================================

#[test]
fn test_metadata_is_persisted() {
    let fixture = StoreFixture::new();
    let config = IndexConfig::word(2);
    {
        let mut store = FileStore::create(fixture.path()).unwrap();
        store.set_metadata(config.to_json().unwrap()).unwrap();
        store.sync().unwrap();
    }

    let store = FileStore::open_read_only(fixture.path()).unwrap();
    let stored = IndexConfig::from_json(store.metadata().unwrap()).unwrap();
    assert_eq!(stored, config);
}

#[test]
fn test_store_without_metadata_reports_none() {
    let fixture = StoreFixture::new();
    build_file_index(&fixture, &["kidney"]);
    assert_eq!(FileStore::open_read_only(fixture.path()).unwrap().metadata(), None);
}

// ============================================================================
// READ-ONLY MODE
// ============================================================================

#[test]
fn test_read_only_store_refuses_writes() {
    let fixture = StoreFixture::new();
    build_file_index(&fixture, &["kidney"]);

    let index = reopen_file_index(&fixture);
    assert_eq!(index.with_store(|store| store.mode()), OpenMode::ReadOnly);
    assert!(matches!(
        index.add("kidneys"),
        Err(IndexError::Store(StoreError::ReadOnly))
    ));
    assert!(matches!(index.clear(), Err(IndexError::Store(StoreError::ReadOnly))));

    index.with_store_mut(|store| {
        assert!(matches!(store.set_metadata("{}"), Err(StoreError::ReadOnly)));
        // Nothing to write, nothing attempted.
        store.sync().unwrap();
    });
    assert_eq!(index.lookup(4, "kid1").unwrap(), set(&["kidney"]));
}

#[test]
fn test_read_only_open_of_missing_file_fails() {
    let fixture = StoreFixture::new();
    assert!(matches!(
        FileStore::open_read_only(fixture.path()),
        Err(StoreError::Io(_))
    ));
}

#[test]
fn test_featureless_add_is_refused_on_read_only_store() {
    let fixture = StoreFixture::new();
    build_file_index(&fixture, &["kidney"]);
    // Bucket 0 still has to be written.
    let err = reopen_file_index(&fixture).add("k").unwrap_err();
    assert!(
        matches!(err, IndexError::Store(StoreError::ReadOnly)),
        "{err}"
    );
}

#[test]
fn test_featureless_string_persists_in_bucket_zero() {
    let fixture = StoreFixture::new();
    build_file_index(&fixture, &["kidney", "k"]);

    let index = reopen_file_index(&fixture);
    index.with_store(|store| {
        assert!(store.exists(0).unwrap());
        assert!(store.keys(0).unwrap().is_empty());
        assert_eq!(store.buckets().unwrap(), vec![0, 4]);
    });
    assert_eq!(index.strings().unwrap(), set(&["kidney"]));
}

// ============================================================================
// DAMAGED FILES
// ============================================================================

#[test]
fn test_flipped_byte_is_reported_as_corrupt() {
    let fixture = StoreFixture::new();
    build_file_index(&fixture, VOCABULARY);

    let mut bytes = fs::read(fixture.path()).unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0x20;
    fs::write(fixture.path(), &bytes).unwrap();

    let err = FileStore::open_read_only(fixture.path()).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }), "{err}");
    assert!(err.to_string().contains("checksum"), "{err}");
}

#[test]
fn test_truncated_file_is_reported_as_corrupt() {
    let fixture = StoreFixture::new();
    build_file_index(&fixture, VOCABULARY);

    let bytes = fs::read(fixture.path()).unwrap();
    fs::write(fixture.path(), &bytes[..bytes.len() - 3]).unwrap();
    assert!(matches!(
        FileStore::open(fixture.path()),
        Err(StoreError::Corrupt { .. })
    ));
}

#[test]
fn test_foreign_file_is_rejected() {
    let fixture = StoreFixture::new();
    fs::write(fixture.path(), b"{\"terms\": [\"not an index\"]}").unwrap();
    assert!(matches!(
        FileStore::open_read_only(fixture.path()),
        Err(StoreError::Corrupt { .. })
    ));
}

#[test]
fn test_oversized_file_is_refused_before_reading() {
    let fixture = StoreFixture::new();
    let file = fs::File::create(fixture.path()).unwrap();
    // Sparse on most filesystems, so this costs no disk.
    file.set_len(MAX_FILE_SIZE + 1).unwrap();
    drop(file);

    match FileStore::open_read_only(fixture.path()) {
        Err(StoreError::TooLarge { size, limit }) => {
            assert_eq!(size, MAX_FILE_SIZE + 1);
            assert_eq!(limit, MAX_FILE_SIZE);
        }
        other => panic!("expected TooLarge, got {other:?}"),
    }
}
