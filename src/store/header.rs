// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! File store header and footer.
//!
//! The header is 16 bytes of fixed-size fields read before anything else.
//! The footer is 8 bytes: a CRC32 over everything before it, plus a magic
//! number ("MRGS", the header magic reversed). A wrong footer means the file
//! was truncated or damaged, and nothing in it is trusted.
//!
//! ```text
//! ┌────────┬─────────┬───────┬──────────┬──────────────┬──────────────┐
//! │ "SGRM" │ version │ flags │ reserved │ bucket_count │ string_count │
//! │ 4 B    │ 1 B     │ 1 B   │ 2 B      │ u32 LE       │ u32 LE       │
//! └────────┴─────────┴───────┴──────────┴──────────────┴──────────────┘
//! ```

use crc32fast::Hasher as Crc32Hasher;

use crate::error::{StoreError, StoreResult};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Magic bytes: "SGRM" in ASCII (header)
pub const MAGIC: [u8; 4] = [0x53, 0x47, 0x52, 0x4D];

/// Footer magic: "MRGS" (reversed, marks valid file end)
pub const FOOTER_MAGIC: [u8; 4] = [0x4D, 0x52, 0x47, 0x53];

/// Current format version
pub const VERSION: u8 = 1;

// ============================================================================
// LIMITS (prevent resource exhaustion from damaged files)
// ============================================================================

/// Maximum store file size: 1 GiB
pub const MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Maximum varint bytes (u64 needs at most 10 bytes)
pub const MAX_VARINT_BYTES: usize = 10;

/// Maximum number of distinct strings in one store
pub const MAX_STRING_COUNT: u32 = 100_000_000;

/// Maximum number of buckets in one store
pub const MAX_BUCKET_COUNT: u32 = 10_000_000;

// ============================================================================
// FLAGS
// ============================================================================

/// Format flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags(pub(crate) u8);

impl FormatFlags {
    pub const HAS_METADATA: u8 = 0b0000_0001;

    pub fn new() -> Self {
        Self(0)
    }

    pub fn with_metadata(mut self) -> Self {
        self.0 |= Self::HAS_METADATA;
        self
    }

    pub fn has_metadata(self) -> bool {
        self.0 & Self::HAS_METADATA != 0
    }
}

// ============================================================================
// HEADER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreHeader {
    pub version: u8,
    pub flags: FormatFlags,
    pub bucket_count: u32,
    pub string_count: u32,
}

impl StoreHeader {
    pub const SIZE: usize = 16;

    pub fn new(flags: FormatFlags, bucket_count: u32, string_count: u32) -> Self {
        Self {
            version: VERSION,
            flags,
            bucket_count,
            string_count,
        }
    }

    /// Append the 16 header bytes to `buf`.
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&MAGIC);
        buf.extend_from_slice(&[self.version, self.flags.0, 0, 0]);
        buf.extend_from_slice(&self.bucket_count.to_le_bytes());
        buf.extend_from_slice(&self.string_count.to_le_bytes());
    }

    pub fn read(bytes: &[u8]) -> StoreResult<Self> {
        if bytes.len() < Self::SIZE {
            return Err(StoreError::corrupt("file too short for header"));
        }
        if bytes[0..4] != MAGIC {
            return Err(StoreError::corrupt(format!(
                "invalid magic: expected SGRM, got {:?}",
                &bytes[0..4]
            )));
        }

        let version = bytes[4];
        if version != VERSION {
            return Err(StoreError::corrupt(format!(
                "unsupported version {} (expected {})",
                version, VERSION
            )));
        }

        let bucket_count = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let string_count = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
        if bucket_count > MAX_BUCKET_COUNT {
            return Err(StoreError::corrupt(format!(
                "bucket count {} exceeds limit {}",
                bucket_count, MAX_BUCKET_COUNT
            )));
        }
        if string_count > MAX_STRING_COUNT {
            return Err(StoreError::corrupt(format!(
                "string count {} exceeds limit {}",
                string_count, MAX_STRING_COUNT
            )));
        }

        Ok(Self {
            version,
            flags: FormatFlags(bytes[5]),
            bucket_count,
            string_count,
        })
    }
}

// ============================================================================
// FOOTER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreFooter {
    pub crc32: u32,
}

impl StoreFooter {
    pub const SIZE: usize = 8; // 4 bytes CRC32 + 4 bytes magic

    pub fn new(crc32: u32) -> Self {
        Self { crc32 }
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.crc32.to_le_bytes());
        buf.extend_from_slice(&FOOTER_MAGIC);
    }

    pub fn read(bytes: &[u8]) -> StoreResult<Self> {
        if bytes.len() < Self::SIZE {
            return Err(StoreError::corrupt("file too short for footer"));
        }

        let footer_start = bytes.len() - Self::SIZE;
        let magic = &bytes[footer_start + 4..];
        if magic != FOOTER_MAGIC {
            return Err(StoreError::corrupt(format!(
                "invalid footer magic: expected MRGS, got {:?}",
                magic
            )));
        }

        let crc32 = u32::from_le_bytes([
            bytes[footer_start],
            bytes[footer_start + 1],
            bytes[footer_start + 2],
            bytes[footer_start + 3],
        ]);

        Ok(Self { crc32 })
    }

    /// Check the stored checksum against the content before the footer.
    pub fn verify(&self, content: &[u8]) -> StoreResult<()> {
        let actual = Self::compute_crc32(content);
        if actual != self.crc32 {
            return Err(StoreError::corrupt(format!(
                "checksum mismatch: stored {:08x}, computed {:08x}",
                self.crc32, actual
            )));
        }
        Ok(())
    }

    /// Compute CRC32 over the given bytes
    pub fn compute_crc32(data: &[u8]) -> u32 {
        let mut hasher = Crc32Hasher::new();
        hasher.update(data);
        hasher.finalize()
    }
}
