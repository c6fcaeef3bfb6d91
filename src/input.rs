// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Parsing of caller-supplied terms and bucket sizes.
//!
//! This is where input of the wrong shape is turned away with
//! [`IndexError::TypeMismatch`], before anything reaches an index or store.

use serde_json::Value;

use crate::error::{IndexError, Result};
use crate::types::Bucket;

/// Shape of a term list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TermFormat {
    /// One term per non-empty line.
    #[default]
    Lines,
    /// `["a", "b"]` or `{"terms": ["a", "b"]}`.
    Json,
}

pub fn parse_terms(text: &str, format: TermFormat) -> Result<Vec<String>> {
    match format {
        TermFormat::Lines => Ok(text
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()),
        TermFormat::Json => parse_json_terms(text),
    }
}

fn parse_json_terms(text: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(text)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("terms") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(IndexError::type_mismatch(
                    "array of terms",
                    json_type(&other),
                ))
            }
            None => {
                return Err(IndexError::type_mismatch(
                    "object with a \"terms\" array",
                    "object without \"terms\"",
                ))
            }
        },
        other => return Err(IndexError::type_mismatch("array of terms", json_type(&other))),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(term) => Ok(term),
            other => Err(IndexError::type_mismatch(
                "string term",
                format!("{} at position {}", json_type(&other), i),
            )),
        })
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse a bucket size written as a non-negative integer.
pub fn parse_bucket(text: &str) -> Result<Bucket> {
    text.trim()
        .parse::<Bucket>()
        .map_err(|_| IndexError::type_mismatch("bucket size (non-negative integer)", text))
}
