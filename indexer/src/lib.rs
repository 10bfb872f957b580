//! Corpus directory traversal and index building.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use watson_core::{DocumentStats, IndexBuilder, InvertedIndex, Lemmatizer, Normalizer};

/// Every regular file under `input` whose name starts with `prefix`, in path order.
/// A single file path is returned as-is.
pub fn corpus_files(input: &Path, prefix: Option<&str>) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        bail!("corpus location {} does not exist", input.display());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if prefix.map_or(true, |p| name.starts_with(p)) {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

/// Index one file into `builder`. Each file is its own record stream.
pub fn index_file<L: Lemmatizer>(path: &Path, normalizer: &Normalizer<L>, builder: &mut IndexBuilder) -> Result<usize> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let added = builder
        .index_reader(normalizer, BufReader::new(f))
        .with_context(|| format!("reading {}", path.display()))?;
    tracing::info!(file = %path.display(), docs = added, total = builder.num_docs(), "indexed file");
    Ok(added)
}

/// Build an index over `files`, spreading contiguous runs of files over `jobs`
/// workers. Shards are merged in file order, so the result matches a
/// sequential build.
pub fn build_from_files<L: Lemmatizer>(
    files: &[PathBuf],
    normalizer: &Normalizer<L>,
    jobs: usize,
) -> Result<(InvertedIndex, DocumentStats)> {
    let jobs = jobs.max(1).min(files.len().max(1));
    let chunk = files.len().div_ceil(jobs).max(1);

    let shards: Vec<Result<IndexBuilder>> = std::thread::scope(|s| {
        let handles: Vec<_> = files
            .chunks(chunk)
            .map(|run| {
                s.spawn(move || -> Result<IndexBuilder> {
                    let mut builder = IndexBuilder::new();
                    for path in run {
                        index_file(path, normalizer, &mut builder)?;
                    }
                    Ok(builder)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|_| Err(anyhow::anyhow!("indexing worker panicked"))))
            .collect()
    });

    let mut merged = IndexBuilder::new();
    for shard in shards {
        merged.merge(shard?);
    }
    let (index, stats) = merged.finish();
    tracing::info!(num_docs = index.num_docs(), num_terms = index.num_terms(), "ingested documents");
    Ok((index, stats))
}

pub fn build_from_dir<L: Lemmatizer>(
    input: &Path,
    prefix: Option<&str>,
    normalizer: &Normalizer<L>,
    jobs: usize,
) -> Result<(InvertedIndex, DocumentStats)> {
    let files = corpus_files(input, prefix)?;
    if files.is_empty() {
        bail!("no corpus files found under {}", input.display());
    }
    build_from_files(&files, normalizer, jobs)
}
