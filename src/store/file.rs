// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Single-file persistent store.
//!
//! The whole index lives in memory while the store is open. Writes mark it
//! dirty and `sync` rewrites the file in one go: encode, write to a sibling
//! temp file, fsync, rename over the original. A crash mid-sync leaves the
//! previous file intact.
//!
//! # File layout
//!
//! ```text
//! ┌──────────────┐
//! │ HEADER (16B) │  magic, version, flags, bucket_count, string_count
//! ├──────────────┤
//! │ METADATA     │  length-prefixed text (only if HAS_METADATA)
//! ├──────────────┤
//! │ STRING TABLE │  every distinct indexed string, sorted
//! ├──────────────┤
//! │ BUCKETS      │  ascending by size:
//! │              │    size, feature_count,
//! │              │    { feature text, delta-coded string ids } × feature_count
//! ├──────────────┤
//! │ FOOTER (8B)  │  CRC32 of everything above + "MRGS"
//! └──────────────┘
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::encoding::{
    decode_bounded, decode_id_set, decode_str, decode_string_table, encode_id_set,
    encode_str, encode_string_table, encode_varint,
};
use super::header::{FormatFlags, StoreFooter, StoreHeader, MAX_FILE_SIZE};
use super::KeyValueStore;
use crate::error::{StoreError, StoreResult};
use crate::types::{Bucket, FeatureMap, StringSet};

/// How a [`FileStore`] treats the file it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Load an existing file; every write fails with [`StoreError::ReadOnly`].
    ReadOnly,
    /// Load the file if present, start empty otherwise.
    ReadWrite,
    /// Ignore any existing file and start empty; the next sync replaces it.
    Create,
}

/// Decoded contents of a store file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreImage {
    pub metadata: Option<String>,
    pub buckets: BTreeMap<Bucket, FeatureMap>,
}

impl StoreImage {
    /// Encode to the on-disk format, footer included.
    pub fn encode(&self) -> Vec<u8> {
        let strings: BTreeSet<&str> = self
            .buckets
            .values()
            .flat_map(|features| features.values())
            .flat_map(|set| set.iter().map(String::as_str))
            .collect();
        let table: Vec<&str> = strings.into_iter().collect();
        let ids: HashMap<&str, u32> = table
            .iter()
            .enumerate()
            .map(|(id, s)| (*s, id as u32))
            .collect();

        let mut flags = FormatFlags::new();
        if self.metadata.is_some() {
            flags = flags.with_metadata();
        }
        let header = StoreHeader::new(flags, self.buckets.len() as u32, table.len() as u32);

        let mut buf = Vec::with_capacity(StoreHeader::SIZE + 64 * table.len());
        header.write_to(&mut buf);

        if let Some(metadata) = &self.metadata {
            encode_str(metadata, &mut buf);
        }
        encode_string_table(&table, &mut buf);

        for (&size, features) in &self.buckets {
            encode_varint(size as u64, &mut buf);
            encode_varint(features.len() as u64, &mut buf);
            for (feature, set) in features {
                encode_str(feature, &mut buf);
                // Table and sets share string order, so ids come out sorted.
                let set_ids: Vec<u32> = set.iter().map(|s| ids[s.as_str()]).collect();
                encode_id_set(&set_ids, &mut buf);
            }
        }

        let footer = StoreFooter::new(StoreFooter::compute_crc32(&buf));
        footer.write_to(&mut buf);
        buf
    }

    /// Decode and validate a store file.
    pub fn decode(bytes: &[u8]) -> StoreResult<Self> {
        if bytes.len() as u64 > MAX_FILE_SIZE {
            return Err(StoreError::TooLarge {
                size: bytes.len() as u64,
                limit: MAX_FILE_SIZE,
            });
        }
        if bytes.len() < StoreHeader::SIZE + StoreFooter::SIZE {
            return Err(StoreError::corrupt(format!(
                "file is {} bytes, smaller than header and footer",
                bytes.len()
            )));
        }

        let footer = StoreFooter::read(bytes)?;
        let content = &bytes[..bytes.len() - StoreFooter::SIZE];
        footer.verify(content)?;

        let header = StoreHeader::read(content)?;
        let mut pos = StoreHeader::SIZE;

        let metadata = if header.flags.has_metadata() {
            let (text, consumed) = decode_str(&content[pos..])?;
            pos += consumed;
            Some(text)
        } else {
            None
        };

        let (table, consumed) = decode_string_table(&content[pos..])?;
        pos += consumed;
        if table.len() != header.string_count as usize {
            return Err(StoreError::corrupt(format!(
                "string table has {} entries, header says {}",
                table.len(),
                header.string_count
            )));
        }

        let mut buckets: BTreeMap<Bucket, FeatureMap> = BTreeMap::new();
        let mut previous: Option<Bucket> = None;
        for _ in 0..header.bucket_count {
            let (size, consumed) = decode_bounded(&content[pos..], usize::MAX, "bucket size")?;
            pos += consumed;
            if previous.is_some_and(|p| size <= p) {
                return Err(StoreError::corrupt(format!(
                    "bucket {} out of order",
                    size
                )));
            }
            previous = Some(size);

            let remaining = content.len() - pos;
            let (feature_count, consumed) =
                decode_bounded(&content[pos..], remaining, "feature count")?;
            pos += consumed;

            let mut features = FeatureMap::new();
            for _ in 0..feature_count {
                let (feature, consumed) = decode_str(&content[pos..])?;
                pos += consumed;
                let (ids, consumed) = decode_id_set(&content[pos..], table.len())?;
                pos += consumed;

                let set: StringSet = ids.iter().map(|&id| table[id as usize].clone()).collect();
                if features.insert(feature.clone(), set).is_some() {
                    return Err(StoreError::corrupt(format!(
                        "feature {:?} repeated in bucket {}",
                        feature, size
                    )));
                }
            }
            buckets.insert(size, features);
        }

        if pos != content.len() {
            return Err(StoreError::corrupt(format!(
                "{} trailing bytes after last bucket",
                content.len() - pos
            )));
        }

        Ok(Self { metadata, buckets })
    }
}

/// Store persisted to a single file. See the module docs for the layout.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    mode: OpenMode,
    image: StoreImage,
    dirty: bool,
}

impl FileStore {
    /// Open read-write, creating an empty store if the file is missing.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::with_mode(path, OpenMode::ReadWrite)
    }

    /// Open an existing file read-only.
    pub fn open_read_only(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::with_mode(path, OpenMode::ReadOnly)
    }

    /// Start a new empty store at `path`, replacing any file on the next sync.
    pub fn create(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::with_mode(path, OpenMode::Create)
    }

    pub fn with_mode(path: impl AsRef<Path>, mode: OpenMode) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let (image, dirty) = match mode {
            OpenMode::Create => (StoreImage::default(), true),
            OpenMode::ReadWrite if !path.exists() => (StoreImage::default(), true),
            OpenMode::ReadWrite | OpenMode::ReadOnly => (load(&path)?, false),
        };

        debug!(
            path = %path.display(),
            ?mode,
            buckets = image.buckets.len(),
            "opened file store"
        );

        Ok(Self {
            path,
            mode,
            image,
            dirty,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Whether there are writes not yet synced to disk.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Opaque text stored alongside the index (the CLI keeps its config here).
    pub fn metadata(&self) -> Option<&str> {
        self.image.metadata.as_deref()
    }

    pub fn set_metadata(&mut self, metadata: impl Into<String>) -> StoreResult<()> {
        self.ensure_writable()?;
        self.image.metadata = Some(metadata.into());
        self.dirty = true;
        Ok(())
    }

    /// Encoded size the next sync would write.
    pub fn encoded_len(&self) -> usize {
        self.image.encode().len()
    }

    fn ensure_writable(&self) -> StoreResult<()> {
        if self.mode == OpenMode::ReadOnly {
            return Err(StoreError::ReadOnly);
        }
        Ok(())
    }

    fn persist(&self) -> StoreResult<()> {
        let bytes = self.image.encode();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut tmp_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        debug!(
            path = %self.path.display(),
            bytes = bytes.len(),
            buckets = self.image.buckets.len(),
            "synced file store"
        );
        Ok(())
    }
}

fn load(path: &Path) -> StoreResult<StoreImage> {
    let size = fs::metadata(path)?.len();
    if size > MAX_FILE_SIZE {
        return Err(StoreError::TooLarge {
            size,
            limit: MAX_FILE_SIZE,
        });
    }
    let bytes = fs::read(path)?;
    StoreImage::decode(&bytes)
}

impl KeyValueStore for FileStore {
    fn exists(&self, bucket: Bucket) -> StoreResult<bool> {
        Ok(self.image.buckets.contains_key(&bucket))
    }

    fn keys(&self, bucket: Bucket) -> StoreResult<Vec<String>> {
        Ok(self
            .image
            .buckets
            .get(&bucket)
            .map(|features| features.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn get(&self, bucket: Bucket, feature: &str) -> StoreResult<Option<StringSet>> {
        Ok(self
            .image
            .buckets
            .get(&bucket)
            .and_then(|features| features.get(feature))
            .cloned())
    }

    fn set(&mut self, bucket: Bucket, entries: FeatureMap) -> StoreResult<()> {
        self.ensure_writable()?;
        let created = !self.image.buckets.contains_key(&bucket);
        if !created && entries.is_empty() {
            return Ok(());
        }
        self.image.buckets.entry(bucket).or_default().extend(entries);
        self.dirty = true;
        Ok(())
    }

    fn sync(&mut self) -> StoreResult<()> {
        if self.mode == OpenMode::ReadOnly || !self.dirty {
            return Ok(());
        }
        self.persist()?;
        self.dirty = false;
        Ok(())
    }

    fn buckets(&self) -> StoreResult<Vec<Bucket>> {
        Ok(self.image.buckets.keys().copied().collect())
    }

    fn clear(&mut self) -> StoreResult<()> {
        self.ensure_writable()?;
        self.image.buckets.clear();
        self.dirty = true;
        Ok(())
    }

    fn len(&self, bucket: Bucket) -> StoreResult<usize> {
        Ok(self.image.buckets.get(&bucket).map_or(0, BTreeMap::len))
    }
}
