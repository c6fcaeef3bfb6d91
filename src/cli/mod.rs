// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the simgram command-line interface.
//!
//! `index` bulk-loads terms into a store file, `features` shows what a text
//! extracts to, `lookup` reads one (bucket, feature) pair, `search` runs an
//! approximate query and `inspect` summarizes a store file.

pub mod commands;
pub mod display;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use simgram::{ExtractorKind, IndexConfig, Measure, Normalization};

#[derive(Parser)]
#[command(
    name = "simgram",
    about = "N-gram feature index for approximate string matching",
    version
)]
pub struct Cli {
    /// Log library events at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Extractor settings. Only used when a new index is created or for
/// `features`; an existing index keeps the settings it was built with.
#[derive(Args, Debug, Default, Clone)]
pub struct ExtractorArgs {
    /// Unit to build n-grams from: character or word
    #[arg(long)]
    pub kind: Option<ExtractorKind>,

    /// Window length
    #[arg(short, long)]
    pub n: Option<usize>,

    /// Padding unit added n-1 times on each side
    #[arg(long)]
    pub boundary: Option<String>,

    /// Word delimiter (word kind only)
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Text normalization before extraction: none, lowercase or fold
    #[arg(long)]
    pub normalization: Option<Normalization>,
}

impl ExtractorArgs {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.n.is_none()
            && self.boundary.is_none()
            && self.delimiter.is_none()
            && self.normalization.is_none()
    }

    /// Overlay the given flags on `base`.
    pub fn apply(&self, base: IndexConfig) -> IndexConfig {
        IndexConfig {
            kind: self.kind.unwrap_or(base.kind),
            n: self.n.unwrap_or(base.n),
            boundary: self.boundary.clone().unwrap_or(base.boundary),
            delimiter: self.delimiter.clone().unwrap_or(base.delimiter),
            normalization: self.normalization.unwrap_or(base.normalization),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add terms from a file to an index, creating it if needed
    Index {
        /// Index store file
        #[arg(short, long)]
        store: PathBuf,

        /// Term list: one term per line, or JSON with --json
        #[arg(short, long)]
        input: PathBuf,

        /// Read the input as a JSON array of strings
        #[arg(long)]
        json: bool,

        /// Discard any existing index at --store first
        #[arg(long)]
        fresh: bool,

        #[command(flatten)]
        extractor: ExtractorArgs,
    },

    /// Print the features a text extracts to
    Features {
        text: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        extractor: ExtractorArgs,
    },

    /// Print the strings registered under one bucket and feature
    Lookup {
        /// Index store file
        #[arg(short, long)]
        store: PathBuf,

        /// Bucket size (feature count)
        size: String,

        /// Feature text, ordinal included (e.g. "abc1")
        feature: String,
    },

    /// Find indexed strings similar to a query
    Search {
        /// Index store file
        #[arg(short, long)]
        store: PathBuf,

        query: String,

        /// Similarity threshold in (0, 1]
        #[arg(short, long, default_value = "0.7")]
        alpha: f64,

        /// cosine, dice, jaccard, overlap or exact
        #[arg(short, long, default_value = "cosine")]
        measure: Measure,

        /// Maximum number of results to return
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize an index store file
    Inspect {
        /// Index store file
        file: PathBuf,
    },
}
