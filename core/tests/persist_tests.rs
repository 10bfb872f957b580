use tempfile::tempdir;
use watson_core::persist::{load_index, load_meta, save_index, save_meta, IndexPaths, FORMAT_VERSION};
use watson_core::{rank, Error, IndexBuilder, Normalizer, NormalizerConfig};

const CORPUS: &str = "[[Rust]]\nA systems programming language.\n[[Go]]\nA programming language with goroutines.\n";

#[test]
fn index_round_trips() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    let mut builder = IndexBuilder::new();
    builder.index_reader(&Normalizer::new(), CORPUS.as_bytes()).unwrap();
    let (index, stats) = builder.finish();

    let meta = save_index(&paths, &index, &stats, NormalizerConfig::default()).unwrap();
    assert_eq!(meta.num_docs, 2);
    assert_eq!(meta.version, FORMAT_VERSION);
    assert!(paths.exists());

    let loaded = load_index(&paths).unwrap();
    assert_eq!(loaded.index, index);
    assert_eq!(loaded.stats, stats);
    assert_eq!(loaded.meta, meta);
}

#[test]
fn missing_index_is_unavailable() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path().join("nowhere"));
    assert!(!paths.exists());
    assert!(matches!(load_index(&paths), Err(Error::IndexUnavailable(_))));
}

#[test]
fn mismatched_meta_is_rejected() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    let mut builder = IndexBuilder::new();
    builder.index_reader(&Normalizer::new(), CORPUS.as_bytes()).unwrap();
    let (index, stats) = builder.finish();
    save_index(&paths, &index, &stats, NormalizerConfig::default()).unwrap();

    let mut meta = load_meta(&paths).unwrap();
    meta.num_docs += 1;
    save_meta(&paths, &meta).unwrap();
    assert!(matches!(load_index(&paths), Err(Error::IndexUnavailable(_))));

    meta.num_docs -= 1;
    meta.version = FORMAT_VERSION + 1;
    save_meta(&paths, &meta).unwrap();
    assert!(matches!(load_index(&paths), Err(Error::IndexUnavailable(_))));
}

#[test]
fn normalization_settings_travel_with_the_index() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    let unstemmed = NormalizerConfig { stem: false, lemmatize: true };
    let mut builder = IndexBuilder::new();
    builder
        .index_reader(&Normalizer::with_config(unstemmed), "[[Marathon]]\nrunning races\n".as_bytes())
        .unwrap();
    let (index, stats) = builder.finish();
    save_index(&paths, &index, &stats, unstemmed).unwrap();

    let loaded = load_index(&paths).unwrap();
    assert_eq!(loaded.meta.normalization, unstemmed);

    let query = Normalizer::with_config(loaded.meta.normalization).normalize_query("running");
    let results = rank(&query, &loaded.index, &loaded.stats, 10);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Marathon");

    // the stemming default would miss it
    let stemmed = Normalizer::new().normalize_query("running");
    assert!(rank(&stemmed, &loaded.index, &loaded.stats, 10).is_empty());
}

fn two_doc_index(first: &str, second: &str) -> (watson_core::InvertedIndex, watson_core::DocumentStats) {
    let toks = |s: &str| s.split_whitespace().map(String::from).collect::<Vec<_>>();
    let mut builder = IndexBuilder::new();
    builder.add_document("One", toks(first));
    builder.add_document("Two", toks(second));
    builder.finish()
}

#[test]
fn foreign_statistics_are_rejected() {
    let dir = tempdir().unwrap();
    let (a, b) = (IndexPaths::new(dir.path().join("a")), IndexPaths::new(dir.path().join("b")));
    // same document and term counts, different lengths
    let (index, stats) = two_doc_index("alpha beta", "gamma");
    save_index(&a, &index, &stats, NormalizerConfig::default()).unwrap();
    let (index, stats) = two_doc_index("alpha", "beta gamma");
    save_index(&b, &index, &stats, NormalizerConfig::default()).unwrap();

    std::fs::copy(b.root.join("stats.bin"), a.root.join("stats.bin")).unwrap();
    assert!(matches!(load_index(&a), Err(Error::IndexUnavailable(_))));
}

#[test]
fn failed_save_does_not_look_complete() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    let (index, stats) = two_doc_index("alpha beta", "gamma");
    save_index(&paths, &index, &stats, NormalizerConfig::default()).unwrap();
    assert!(paths.exists());

    // make the postings file unwritable so the rebuild fails midway
    std::fs::remove_file(dir.path().join("postings.bin")).unwrap();
    std::fs::create_dir(dir.path().join("postings.bin")).unwrap();
    assert!(save_index(&paths, &index, &stats, NormalizerConfig::default()).is_err());
    assert!(!paths.exists());
    assert!(matches!(load_index(&paths), Err(Error::IndexUnavailable(_))));
}
