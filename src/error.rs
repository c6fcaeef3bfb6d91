// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types for the index and its stores.
//!
//! Absence is never an error here: a missing bucket or feature is an empty
//! lookup result. What remains is store I/O failure (propagated as-is, never
//! retried), corrupt persisted data, and malformed input rejected before it
//! reaches the store.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors raised by a [`crate::KeyValueStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying read/write failure.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted bytes failed validation (magic, checksum, varint, UTF-8, limits).
    #[error("corrupt store: {reason}")]
    Corrupt { reason: String },

    /// Write attempted on a store opened read-only.
    #[error("store is read-only")]
    ReadOnly,

    /// Store file exceeds the configured size limit.
    #[error("store file is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },

    /// Backend-specific failure that has no better classification.
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn corrupt(reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            reason: reason.into(),
        }
    }
}

/// Errors raised by extraction setup, the index and the searcher.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Store failure surfaced from `add`, `lookup` or `sync`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Input of the wrong shape, rejected before touching the store.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// Extractor or index settings that cannot work.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Similarity threshold outside (0, 1].
    #[error("similarity threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),

    /// Index metadata could not be encoded or decoded.
    #[error("metadata error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IndexError {
    pub fn type_mismatch(expected: &'static str, found: impl Into<String>) -> Self {
        IndexError::TypeMismatch {
            expected,
            found: found.into(),
        }
    }
}
