use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex =
        Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*|\p{N}+(?:[.,]\p{N}+)*|[^\s\p{L}\p{N}]").expect("valid regex");
    static ref IRREGULAR: HashMap<&'static str, &'static str> = {
        let pairs: &[(&str, &str)] = &[
            ("am", "be"), ("is", "be"), ("are", "be"), ("was", "be"), ("were", "be"), ("been", "be"), ("being", "be"),
            ("has", "have"), ("had", "have"), ("having", "have"),
            ("does", "do"), ("did", "do"), ("done", "do"),
            ("goes", "go"), ("went", "go"), ("gone", "go"),
            ("children", "child"), ("men", "man"), ("women", "woman"), ("people", "person"),
            ("mice", "mouse"), ("feet", "foot"), ("teeth", "tooth"), ("geese", "goose"),
        ];
        pairs.iter().copied().collect()
    };
}

/// One token produced by a [`Lemmatizer`]: the text as written and its dictionary form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub surface: String,
    pub lemma: String,
}

impl Annotation {
    pub fn new(surface: impl Into<String>, lemma: impl Into<String>) -> Self {
        Self { surface: surface.into(), lemma: lemma.into() }
    }
}

/// Tokenization and lemmatization capability consumed by the normalizer.
///
/// Called once per normalized text. Implementations must be deterministic.
pub trait Lemmatizer: Send + Sync {
    fn annotate(&self, text: &str) -> Vec<Annotation>;
}

/// Rule-based lemmatizer: NFKC + lowercase, word/number/punctuation tokens,
/// an irregular-form table and regular plural rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleLemmatizer;

impl SimpleLemmatizer {
    pub fn new() -> Self {
        Self
    }
}

impl Lemmatizer for SimpleLemmatizer {
    fn annotate(&self, text: &str) -> Vec<Annotation> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        let mut out = Vec::new();
        for mat in RE.find_iter(&normalized) {
            let raw = mat.as_str();
            let word = raw.strip_suffix("'s").unwrap_or(raw).trim_end_matches('\'');
            if word.is_empty() {
                continue;
            }
            out.push(Annotation::new(word, lemma_of(word)));
        }
        out
    }
}

fn lemma_of(word: &str) -> String {
    if let Some(lemma) = IRREGULAR.get(word) {
        return (*lemma).to_string();
    }
    if !word.chars().all(char::is_alphabetic) {
        return word.to_string();
    }
    let len = word.chars().count();
    if len > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if ["sses", "xes", "ches", "shes"].iter().any(|s| word.ends_with(s)) {
        return word[..word.len() - 2].to_string();
    }
    if len > 3 && word.ends_with('s') && !["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}
