// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Approximate string search over a [`FeatureIndex`].
//!
//! The searcher only uses the index's `lookup` and its extractor:
//!
//! 1. Extract the query's `q` features.
//! 2. For every existing bucket inside the measure's size band, compute `τ`
//!    and run an overlap join (CPMerge) over that bucket's posting sets.
//! 3. Re-score the surviving candidates and keep those reaching `α`.
//!
//! The join reads the rarest query features first. Any string sharing `τ`
//! features with the query must appear in at least one of the first
//! `q − τ + 1` rarest postings, so those generate the candidates, and the
//! remaining postings are only probed per candidate until it either reaches
//! `τ` or can no longer reach it.
//!
//! Posting sets are cached per searcher. A searcher does not see strings
//! added after a bucket was cached; call [`Searcher::clear_cache`] or make a
//! new one.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{IndexError, Result};
use crate::index::FeatureIndex;
use crate::ngram::FeatureExtractor;
use crate::similarity::{Measure, EPSILON};
use crate::store::KeyValueStore;
use crate::types::{Bucket, Feature, StringSet};

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub string: String,
    pub similarity: f64,
}

pub struct Searcher<'a, E, S> {
    index: &'a FeatureIndex<E, S>,
    measure: Measure,
    cache: HashMap<Bucket, HashMap<String, StringSet>>,
}

impl<'a, E: FeatureExtractor, S: KeyValueStore> Searcher<'a, E, S> {
    pub fn new(index: &'a FeatureIndex<E, S>, measure: Measure) -> Self {
        Self {
            index,
            measure,
            cache: HashMap::new(),
        }
    }

    pub fn measure(&self) -> Measure {
        self.measure
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Strings whose similarity to `query` is at least `alpha`, best first.
    ///
    /// Ties are broken by string order. A query with no features matches
    /// nothing.
    pub fn search(&mut self, query: &str, alpha: f64) -> Result<Vec<Match>> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(IndexError::InvalidThreshold(alpha));
        }

        let features = self.index.features(query);
        let q = features.len();
        if q == 0 {
            debug!(query, "query has no features");
            return Ok(Vec::new());
        }

        let min = self.measure.min_features(q, alpha);
        let max = self.measure.max_features(q, alpha).unwrap_or(usize::MAX);
        let sizes: Vec<Bucket> = self
            .index
            .with_store(|store| store.buckets())?
            .into_iter()
            .filter(|size| (min..=max).contains(size))
            .collect();

        let mut candidates: BTreeSet<String> = BTreeSet::new();
        for size in sizes {
            let tau = self.measure.min_common_features(q, size, alpha);
            if tau > q || tau > size {
                continue;
            }
            let found = self.overlap_join(&features, tau, size)?;
            trace!(size, tau, found = found.len(), "overlap join");
            candidates.extend(found);
        }

        let mut matches: Vec<Match> = candidates
            .into_iter()
            .filter_map(|string| {
                let similarity = self
                    .measure
                    .similarity(&features, &self.index.features(&string));
                (similarity + EPSILON >= alpha).then_some(Match { string, similarity })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.string.cmp(&b.string))
        });

        debug!(
            query,
            alpha,
            measure = %self.measure,
            matches = matches.len(),
            "search finished"
        );
        Ok(matches)
    }

    /// [`search`](Self::search), keeping at most `limit` matches.
    pub fn search_limit(&mut self, query: &str, alpha: f64, limit: usize) -> Result<Vec<Match>> {
        let mut matches = self.search(query, alpha)?;
        matches.truncate(limit);
        Ok(matches)
    }

    /// Candidates in bucket `size` sharing at least `tau` of `features`.
    ///
    /// Requires `1 <= tau <= features.len()`.
    fn overlap_join(&mut self, features: &[Feature], tau: usize, size: Bucket) -> Result<Vec<String>> {
        self.fill_cache(features, size)?;
        let Some(bucket) = self.cache.get(&size) else {
            return Ok(Vec::new());
        };

        let mut postings: Vec<&StringSet> = features
            .iter()
            .filter_map(|f| bucket.get(f.as_str()))
            .collect();
        postings.sort_by_key(|set| set.len());

        let q = postings.len();
        let split = q + 1 - tau;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for set in &postings[..split] {
            for string in set.iter() {
                *counts.entry(string.as_str()).or_default() += 1;
            }
        }

        let mut results = Vec::new();
        for (string, mut count) in counts {
            if count >= tau {
                results.push(string.to_string());
                continue;
            }
            for (i, set) in postings.iter().enumerate().skip(split) {
                if set.contains(string) {
                    count += 1;
                }
                if count >= tau {
                    results.push(string.to_string());
                    break;
                }
                if count + (q - i - 1) < tau {
                    break;
                }
            }
        }
        Ok(results)
    }

    fn fill_cache(&mut self, features: &[Feature], size: Bucket) -> Result<()> {
        let bucket = self.cache.entry(size).or_default();
        for feature in features {
            if !bucket.contains_key(feature.as_str()) {
                let set = self.index.lookup(size, feature.as_str())?;
                bucket.insert(feature.to_string(), set);
            }
        }
        Ok(())
    }
}
