// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Subcommand implementations.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};

use simgram::{
    parse_bucket, parse_terms, Extractor, ExtractorKind, FeatureExtractor, FeatureIndex, FileStore,
    IndexConfig, Measure, OpenMode, Searcher, StoreError, TermFormat,
};

use super::display::{
    bar, field, format_size, pad_left, row, section_bot, section_mid, section_top, similarity,
    themed, BOLD, GRAY, GREEN,
};
use super::{Commands, ExtractorArgs};

type FileIndex = FeatureIndex<Extractor, FileStore>;

pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Index {
            store,
            input,
            json,
            fresh,
            extractor,
        } => run_index(&store, &input, json, fresh, &extractor),
        Commands::Features {
            text,
            json,
            extractor,
        } => run_features(&text, json, &extractor),
        Commands::Lookup {
            store,
            size,
            feature,
        } => run_lookup(&store, &size, &feature),
        Commands::Search {
            store,
            query,
            alpha,
            measure,
            limit,
            json,
        } => run_search(&store, &query, alpha, measure, limit, json),
        Commands::Inspect { file } => run_inspect(&file),
    }
}

/// Open a store and rebuild the extractor recorded in its metadata.
fn open_index(path: &Path, mode: OpenMode) -> Result<(FileIndex, IndexConfig)> {
    let store = FileStore::with_mode(path, mode)
        .with_context(|| format!("failed to open index {}", path.display()))?;
    let config = match store.metadata() {
        Some(json) => IndexConfig::from_json(json)
            .with_context(|| format!("invalid configuration stored in {}", path.display()))?,
        None => IndexConfig::default(),
    };
    let extractor = config.build_extractor()?;
    Ok((FeatureIndex::new(extractor, store), config))
}

#[cfg(feature = "parallel")]
fn create_progress_style() -> Result<ProgressStyle> {
    Ok(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}",
        )?
        .progress_chars("━━╸"),
    )
}

fn run_index(
    store_path: &Path,
    input: &Path,
    json: bool,
    fresh: bool,
    args: &ExtractorArgs,
) -> Result<()> {
    let start = Instant::now();
    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read terms from {}", input.display()))?;
    let format = if json {
        TermFormat::Json
    } else {
        TermFormat::Lines
    };
    let terms = parse_terms(&text, format)
        .with_context(|| format!("failed to parse terms in {}", input.display()))?;

    let existing = store_path.exists() && !fresh;
    let (index, config) = if existing {
        if !args.is_empty() {
            warn!("extractor flags ignored: index already exists (use --fresh to rebuild)");
            eprintln!("⚠️  Extractor flags ignored for existing index; pass --fresh to rebuild");
        }
        open_index(store_path, OpenMode::ReadWrite)?
    } else {
        let config = args.apply(IndexConfig::default());
        let extractor = config.build_extractor()?;
        let mut store = FileStore::create(store_path)
            .with_context(|| format!("failed to create index {}", store_path.display()))?;
        store.set_metadata(config.to_json()?)?;
        (FeatureIndex::new(extractor, store), config)
    };
    debug!(?config, existing, terms = terms.len(), "indexing");

    #[cfg(feature = "parallel")]
    let pb = {
        let pb = ProgressBar::new(terms.len() as u64);
        pb.set_style(create_progress_style()?);
        pb.set_prefix("Indexing");
        pb.set_message("terms...");
        pb
    };

    #[cfg(feature = "parallel")]
    let summary = index.add_all_with(&terms, |_, _| pb.inc(1))?;
    #[cfg(not(feature = "parallel"))]
    let summary = index.add_all(&terms)?;

    #[cfg(feature = "parallel")]
    pb.finish_with_message(format!("indexed {} terms", summary.added));

    let bytes = fs::metadata(store_path).map(|m| m.len()).unwrap_or(0);
    eprintln!(
        "✓ Indexed {} terms into {} buckets ({} unsearchable) in {:.2?}",
        summary.added,
        summary.buckets.len(),
        summary.unsearchable,
        start.elapsed()
    );
    eprintln!("✅ Wrote {} ({})", store_path.display(), format_size(bytes));
    Ok(())
}

#[derive(Serialize)]
struct FeaturesOutput<'a> {
    text: &'a str,
    bucket: usize,
    features: Vec<String>,
}

fn run_features(text: &str, json: bool, args: &ExtractorArgs) -> Result<()> {
    let extractor = args.apply(IndexConfig::default()).build_extractor()?;
    let features = extractor.features(text);

    if json {
        let output = FeaturesOutput {
            text,
            bucket: features.len(),
            features: features.into_iter().map(|f| f.into_string()).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for feature in &features {
        println!("{}", feature);
    }
    eprintln!("{} features (bucket {})", features.len(), features.len());
    Ok(())
}

fn run_lookup(store_path: &Path, size: &str, feature: &str) -> Result<()> {
    let size = parse_bucket(size)?;
    let (index, _) = open_index(store_path, OpenMode::ReadOnly)?;
    let strings = index.lookup(size, feature)?;
    for s in &strings {
        println!("{}", s);
    }
    eprintln!("{} strings under ({}, {:?})", strings.len(), size, feature);
    Ok(())
}

fn run_search(
    store_path: &Path,
    query: &str,
    alpha: f64,
    measure: Measure,
    limit: usize,
    json: bool,
) -> Result<()> {
    let (index, _) = open_index(store_path, OpenMode::ReadOnly)?;
    let mut searcher = Searcher::new(&index, measure);

    let start = Instant::now();
    let matches = searcher.search_limit(query, alpha, limit)?;
    let elapsed = start.elapsed();

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        eprintln!("No matches for {:?} at {} ≥ {}", query, measure, alpha);
        return Ok(());
    }
    for m in &matches {
        println!("{}  {}", similarity(m.similarity), m.string);
    }
    eprintln!(
        "{} matches ({} ≥ {}) in {:.2?}",
        matches.len(),
        measure,
        alpha,
        elapsed
    );
    Ok(())
}

fn run_inspect(path: &Path) -> Result<()> {
    let file_size = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) => bail!("cannot read {}: {}", path.display(), e),
    };
    let (index, config) = match open_index(path, OpenMode::ReadOnly) {
        Ok(opened) => opened,
        Err(e) => {
            if let Some(StoreError::Corrupt { reason }) = e.downcast_ref::<StoreError>() {
                bail!("{} is not a valid index: {}", path.display(), reason);
            }
            return Err(e);
        }
    };
    let stats = index.stats()?;
    let has_metadata = index.with_store(|store| store.metadata().is_some());

    section_top("INDEX");
    field("File", &path.display().to_string());
    field("Size", &format_size(file_size));
    field("Checksum", &themed(GREEN, &[BOLD], "CRC32 ok"));
    section_mid("EXTRACTOR");
    field("Kind", &config.kind.to_string());
    field("n", &config.n.to_string());
    field("Boundary", &format!("{:?}", config.boundary));
    if config.kind == ExtractorKind::Word {
        field("Delimiter", &format!("{:?}", config.delimiter));
    }
    field("Normalization", &config.normalization.to_string());
    if !has_metadata {
        row(&themed(GRAY, &[], "  (no stored config, defaults assumed)"));
    }

    section_mid("BUCKETS");
    let widest = stats.buckets.iter().map(|b| b.strings).max().unwrap_or(0);
    if stats.buckets.is_empty() {
        row(&themed(GRAY, &[], "  (empty)"));
    }
    for bucket in &stats.buckets {
        row(&format!(
            "  {} {} {} {}",
            pad_left(&bucket.size.to_string(), 5),
            pad_left(&format!("{} feat", bucket.features), 12),
            pad_left(&format!("{} str", bucket.strings), 11),
            bar(bucket.strings, widest, 28)
        ));
    }

    section_mid("TOTALS");
    field("Buckets", &stats.buckets.len().to_string());
    field("Features", &stats.total_features.to_string());
    field("Strings", &stats.total_strings.to_string());
    section_bot();
    Ok(())
}
