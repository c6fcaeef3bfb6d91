// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Set-similarity measures and the bounds they imply.
//!
//! For a query with `q` features and threshold `α`, each measure bounds the
//! feature count `c` of any string that can reach `α`, and the number `τ` of
//! features the two must share. Those bounds are what make the size buckets
//! useful: a search only visits buckets in `[min_features, max_features]`
//! and only accepts candidates sharing at least `τ` features.
//!
//! | Measure | sim(X, Y)             | c range                    | τ                    |
//! |---------|-----------------------|----------------------------|----------------------|
//! | cosine  | \|X∩Y\| / √(\|X\|\|Y\|) | ⌈α²q⌉ ..= ⌊q/α²⌋          | ⌈α√(qc)⌉             |
//! | dice    | 2\|X∩Y\| / (\|X\|+\|Y\|) | ⌈αq/(2−α)⌉ ..= ⌊(2−α)q/α⌋ | ⌈α(q+c)/2⌉           |
//! | jaccard | \|X∩Y\| / \|X∪Y\|       | ⌈αq⌉ ..= ⌊q/α⌋            | ⌈α(q+c)/(1+α)⌉       |
//! | overlap | \|X∩Y\| / min(\|X\|,\|Y\|) | 1 ..= largest bucket     | ⌈α·min(q,c)⌉         |
//! | exact   | X = Y                 | q ..= q                    | q                    |
//!
//! # References
//!
//! - Okazaki, Tsujii. "Simple and Efficient Algorithm for Approximate
//!   Dictionary Matching" (COLING 2010)

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IndexError;
use crate::types::{Bucket, Feature};

/// Slack for float rounding, so that e.g. 0.7 × 10 rounds up to 7, not 8.
pub(crate) const EPSILON: f64 = 1e-9;

fn ceil(x: f64) -> usize {
    (x - EPSILON).ceil().max(0.0) as usize
}

fn floor(x: f64) -> usize {
    (x + EPSILON).floor().max(0.0) as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    #[default]
    Cosine,
    Dice,
    Jaccard,
    Overlap,
    Exact,
}

impl Measure {
    pub const ALL: [Measure; 5] = [
        Measure::Cosine,
        Measure::Dice,
        Measure::Jaccard,
        Measure::Overlap,
        Measure::Exact,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Measure::Cosine => "cosine",
            Measure::Dice => "dice",
            Measure::Jaccard => "jaccard",
            Measure::Overlap => "overlap",
            Measure::Exact => "exact",
        }
    }

    /// Smallest candidate feature count that can reach `alpha`. Never below 1.
    pub fn min_features(self, q: usize, alpha: f64) -> Bucket {
        let q = q as f64;
        let min = match self {
            Measure::Cosine => ceil(alpha * alpha * q),
            Measure::Dice => ceil(alpha * q / (2.0 - alpha)),
            Measure::Jaccard => ceil(alpha * q),
            Measure::Overlap => 1,
            Measure::Exact => q as usize,
        };
        min.max(1)
    }

    /// Largest candidate feature count that can reach `alpha`, or `None`
    /// when the measure does not bound it.
    pub fn max_features(self, q: usize, alpha: f64) -> Option<Bucket> {
        let qf = q as f64;
        match self {
            Measure::Cosine => Some(floor(qf / (alpha * alpha))),
            Measure::Dice => Some(floor((2.0 - alpha) * qf / alpha)),
            Measure::Jaccard => Some(floor(qf / alpha)),
            Measure::Overlap => None,
            Measure::Exact => Some(q),
        }
    }

    /// Minimum shared features (τ) between a `q`-feature query and a
    /// `c`-feature candidate. Never below 1.
    pub fn min_common_features(self, q: usize, c: usize, alpha: f64) -> usize {
        let (qf, cf) = (q as f64, c as f64);
        let tau = match self {
            Measure::Cosine => ceil(alpha * (qf * cf).sqrt()),
            Measure::Dice => ceil(alpha * (qf + cf) / 2.0),
            Measure::Jaccard => ceil(alpha * (qf + cf) / (1.0 + alpha)),
            Measure::Overlap => ceil(alpha * qf.min(cf)),
            Measure::Exact => q,
        };
        tau.max(1)
    }

    /// Similarity of two feature sequences, in `[0, 1]`.
    pub fn similarity(self, a: &[Feature], b: &[Feature]) -> f64 {
        let x: HashSet<&str> = a.iter().map(Feature::as_str).collect();
        let y: HashSet<&str> = b.iter().map(Feature::as_str).collect();
        if x.is_empty() || y.is_empty() {
            return 0.0;
        }

        let common = x.intersection(&y).count() as f64;
        let (nx, ny) = (x.len() as f64, y.len() as f64);
        match self {
            Measure::Cosine => common / (nx * ny).sqrt(),
            Measure::Dice => 2.0 * common / (nx + ny),
            Measure::Jaccard => common / (nx + ny - common),
            Measure::Overlap => common / nx.min(ny),
            Measure::Exact => {
                if x == y {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Measure {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Measure::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                IndexError::InvalidConfig(format!(
                    "unknown measure {:?} (expected cosine, dice, jaccard, overlap or exact)",
                    s
                ))
            })
    }
}
