use crate::error::{Error, Result};
use crate::index::{Document, DocumentStats, InvertedIndex, Posting, TermId};
use crate::normalize::NormalizerConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, create_dir_all, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: u32,
    pub created_at: String,
    pub version: u32,
    /// How document text was normalized. Queries against this index must match it.
    pub normalization: NormalizerConfig,
}

/// An index read back from disk together with its `meta.json`.
#[derive(Debug)]
pub struct LoadedIndex {
    pub index: InvertedIndex,
    pub stats: DocumentStats,
    pub meta: MetaFile,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn dictionary(&self) -> PathBuf { self.root.join("dictionary.bin") }
    fn postings(&self) -> PathBuf { self.root.join("postings.bin") }
    fn docs(&self) -> PathBuf { self.root.join("docs.bin") }
    fn stats(&self) -> PathBuf { self.root.join("stats.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }

    /// Whether a completed index appears to live here. `meta.json` is written last.
    pub fn exists(&self) -> bool {
        self.meta().is_file()
    }
}

fn write_bin<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut w, value)?;
    w.flush()?;
    Ok(())
}

fn read_bin<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let f = File::open(path).map_err(|e| unavailable(path, e))?;
    Ok(bincode::deserialize_from(BufReader::new(f))?)
}

fn unavailable(path: &Path, e: io::Error) -> Error {
    Error::IndexUnavailable(format!("{}: {e}", path.display()))
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let path = paths.meta();
    let mut f = File::open(&path).map_err(|e| unavailable(&path, e))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Persist an index and its statistics. Existing files are overwritten.
///
/// Any previous `meta.json` is removed first, so an interrupted save never
/// leaves a directory that [`IndexPaths::exists`] reports as complete.
pub fn save_index(
    paths: &IndexPaths,
    index: &InvertedIndex,
    stats: &DocumentStats,
    normalization: NormalizerConfig,
) -> Result<MetaFile> {
    create_dir_all(&paths.root)?;
    match fs::remove_file(paths.meta()) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
        _ => {}
    }
    write_bin(&paths.dictionary(), &index.dictionary)?;
    write_bin(&paths.postings(), &index.postings)?;
    write_bin(&paths.docs(), &index.docs)?;
    write_bin(&paths.stats(), stats)?;
    let meta = MetaFile {
        num_docs: index.num_docs(),
        num_terms: index.num_terms() as u32,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
        version: FORMAT_VERSION,
        normalization,
    };
    save_meta(paths, &meta)?;
    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, num_terms = meta.num_terms, "index saved");
    Ok(meta)
}

/// Load an index written by [`save_index`], checking it against `meta.json`
/// and checking that the statistics are the ones the index derives.
pub fn load_index(paths: &IndexPaths) -> Result<LoadedIndex> {
    let meta = load_meta(paths)?;
    if meta.version != FORMAT_VERSION {
        return Err(Error::IndexUnavailable(format!(
            "index format version {} is not supported (expected {FORMAT_VERSION})",
            meta.version
        )));
    }
    let dictionary: HashMap<String, TermId> = read_bin(&paths.dictionary())?;
    let postings: Vec<Vec<Posting>> = read_bin(&paths.postings())?;
    let docs: Vec<Document> = read_bin(&paths.docs())?;
    let stats: DocumentStats = read_bin(&paths.stats())?;
    let index = InvertedIndex { dictionary, postings, docs };

    let consistent = index.num_docs() == meta.num_docs
        && stats.num_docs == meta.num_docs
        && index.num_terms() == meta.num_terms as usize
        && index.postings.len() == index.num_terms()
        && stats.df.len() == index.num_terms();
    if !consistent {
        return Err(Error::IndexUnavailable(format!("index at {} is inconsistent with its meta.json", paths.root.display())));
    }
    if stats != DocumentStats::from_index(&index) {
        return Err(Error::IndexUnavailable(format!("statistics at {} do not match the index", paths.root.display())));
    }
    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, "index loaded");
    Ok(LoadedIndex { index, stats, meta })
}
