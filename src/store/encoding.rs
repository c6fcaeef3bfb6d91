// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary encoding primitives for the file store: varint, length-prefixed
//! strings, the string table, and delta-coded id sets.
//!
//! Every indexed string is written once into the string table and string sets
//! refer to it by id. Ids inside a set are sorted and delta-coded, so dense
//! sets cost about a byte per member.
//!
//! Decoders take untrusted bytes. They return `(value, bytes_consumed)` and
//! fail with [`StoreError::Corrupt`] on truncation, overflow, counts larger
//! than the remaining input, or invalid UTF-8. They never panic.
//!
//! # References
//!
//! - **Varint (LEB128)**: little-endian base-128 variable-length integers, as
//!   in DWARF and Protocol Buffers.

use crate::error::{StoreError, StoreResult};

use super::header::MAX_VARINT_BYTES;

// ============================================================================
// VARINT ENCODING
// ============================================================================

/// Encode a varint to bytes
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        }
        buf.push(byte | 0x80);
    }
}

/// Decode a varint from bytes, returning (value, bytes_consumed)
pub fn decode_varint(bytes: &[u8]) -> StoreResult<(u64, usize)> {
    if bytes.is_empty() {
        return Err(StoreError::corrupt("empty buffer for varint"));
    }

    let mut result: u64 = 0;
    let mut shift = 0;
    let mut i = 0;

    while i < bytes.len() && i < MAX_VARINT_BYTES {
        let byte = bytes[i];
        let low = (byte & 0x7F) as u64;
        // The tenth byte may only carry the top bit of a u64.
        if shift == 63 && low > 1 {
            return Err(StoreError::corrupt("varint overflows u64"));
        }
        result |= low << shift;
        i += 1;
        if byte & 0x80 == 0 {
            return Ok((result, i));
        }
        shift += 7;
    }

    if i >= MAX_VARINT_BYTES {
        Err(StoreError::corrupt("varint exceeds maximum length"))
    } else {
        Err(StoreError::corrupt("incomplete varint"))
    }
}

/// Decode a varint that must fit a `usize` and not exceed `limit`.
pub fn decode_bounded(bytes: &[u8], limit: usize, what: &str) -> StoreResult<(usize, usize)> {
    let (value, consumed) = decode_varint(bytes)?;
    if value > limit as u64 {
        return Err(StoreError::corrupt(format!(
            "{} {} exceeds available {}",
            what, value, limit
        )));
    }
    Ok((value as usize, consumed))
}

// ============================================================================
// STRINGS
// ============================================================================

/// Encode a length-prefixed UTF-8 string
pub fn encode_str(value: &str, buf: &mut Vec<u8>) {
    encode_varint(value.len() as u64, buf);
    buf.extend_from_slice(value.as_bytes());
}

/// Decode a length-prefixed UTF-8 string
pub fn decode_str(bytes: &[u8]) -> StoreResult<(String, usize)> {
    let (len, mut pos) = decode_varint(bytes)?;
    let len = usize::try_from(len)
        .map_err(|_| StoreError::corrupt(format!("string length {} overflows", len)))?;
    let end = pos
        .checked_add(len)
        .ok_or_else(|| StoreError::corrupt(format!("string length {} causes overflow", len)))?;
    if end > bytes.len() {
        return Err(StoreError::corrupt(format!(
            "truncated string (expected {} bytes, {} available)",
            len,
            bytes.len() - pos
        )));
    }

    let value = std::str::from_utf8(&bytes[pos..end])
        .map_err(|e| StoreError::corrupt(format!("invalid UTF-8 in string: {}", e)))?
        .to_string();
    pos = end;
    Ok((value, pos))
}

// ============================================================================
// STRING TABLE
// ============================================================================

/// Encode the string table (count, then length-prefixed strings)
pub fn encode_string_table(strings: &[&str], buf: &mut Vec<u8>) {
    encode_varint(strings.len() as u64, buf);
    for s in strings {
        encode_str(s, buf);
    }
}

/// Decode the string table
pub fn decode_string_table(bytes: &[u8]) -> StoreResult<(Vec<String>, usize)> {
    let (count, mut pos) = decode_varint(bytes)?;

    // Each entry needs at least one byte for its length, so the count can
    // never exceed the remaining input.
    let remaining = bytes.len().saturating_sub(pos);
    if count > remaining as u64 {
        return Err(StoreError::corrupt(format!(
            "string table count {} exceeds available bytes {}",
            count, remaining
        )));
    }

    let mut table = Vec::with_capacity(count as usize);
    for i in 0..count {
        if pos >= bytes.len() {
            return Err(StoreError::corrupt(format!(
                "truncated string table at entry {}",
                i
            )));
        }
        let (s, consumed) = decode_str(&bytes[pos..])?;
        pos += consumed;
        table.push(s);
    }

    Ok((table, pos))
}

// ============================================================================
// ID SETS (delta-coded)
// ============================================================================

/// Encode a set of string ids. `ids` must be sorted ascending and unique.
pub fn encode_id_set(ids: &[u32], buf: &mut Vec<u8>) {
    encode_varint(ids.len() as u64, buf);
    let mut prev = 0u32;
    for (i, &id) in ids.iter().enumerate() {
        let delta = if i == 0 { id } else { id - prev };
        encode_varint(delta as u64, buf);
        prev = id;
    }
}

/// Decode a delta-coded id set, checking every id against `table_len`.
pub fn decode_id_set(bytes: &[u8], table_len: usize) -> StoreResult<(Vec<u32>, usize)> {
    let remaining = bytes.len();
    let (count, mut pos) = decode_bounded(bytes, remaining, "id set count")?;

    let mut ids = Vec::with_capacity(count);
    let mut current: u64 = 0;
    for i in 0..count {
        if pos >= bytes.len() {
            return Err(StoreError::corrupt(format!("truncated id set at entry {}", i)));
        }
        let (delta, consumed) = decode_varint(&bytes[pos..])?;
        pos += consumed;

        if i > 0 && delta == 0 {
            return Err(StoreError::corrupt("duplicate id in set"));
        }
        current = current
            .checked_add(delta)
            .ok_or_else(|| StoreError::corrupt("id set delta overflow"))?;
        if current >= table_len as u64 {
            return Err(StoreError::corrupt(format!(
                "string id {} out of range (table has {})",
                current, table_len
            )));
        }
        ids.push(current as u32);
    }

    Ok((ids, pos))
}
