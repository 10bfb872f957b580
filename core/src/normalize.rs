//! Text normalization shared by the indexer and the query path.
//!
//! Pipeline: annotate (tokenize + lemma) → optional stem → drop pure
//! punctuation → stop-word removal bounded by a four-token floor.

use crate::stemmer;
use crate::stopwords::StopWords;
use crate::tokenizer::{Lemmatizer, SimpleLemmatizer};
use crate::Token;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref PUNCT: Regex = Regex::new(r"^[[:punct:]\p{P}]+$").expect("valid regex");
}

/// Texts at or below this many tokens keep all of their stop words.
pub const STOP_WORD_FLOOR: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Query,
    Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    pub stem: bool,
    pub lemmatize: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self { stem: true, lemmatize: true }
    }
}

/// Immutable normalizer. Query and document texts go through the same policy;
/// only their [`NormalizerConfig`] may differ.
pub struct Normalizer<L = SimpleLemmatizer> {
    lemmatizer: L,
    stop_words: StopWords,
    query: NormalizerConfig,
    document: NormalizerConfig,
}

impl Normalizer<SimpleLemmatizer> {
    pub fn new() -> Self {
        Self::with_lemmatizer(SimpleLemmatizer)
    }

    /// A normalizer applying `config` to both queries and documents, e.g. the
    /// configuration recorded with a saved index.
    pub fn with_config(config: NormalizerConfig) -> Self {
        Self::new().query_config(config).document_config(config)
    }
}

impl Default for Normalizer<SimpleLemmatizer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Lemmatizer> Normalizer<L> {
    pub fn with_lemmatizer(lemmatizer: L) -> Self {
        Self {
            lemmatizer,
            stop_words: StopWords::english(),
            query: NormalizerConfig::default(),
            document: NormalizerConfig::default(),
        }
    }

    pub fn stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    pub fn query_config(mut self, config: NormalizerConfig) -> Self {
        self.query = config;
        self
    }

    pub fn document_config(mut self, config: NormalizerConfig) -> Self {
        self.document = config;
        self
    }

    pub fn config(&self, kind: TextKind) -> NormalizerConfig {
        match kind {
            TextKind::Query => self.query,
            TextKind::Document => self.document,
        }
    }

    pub fn normalize(&self, text: &str, kind: TextKind) -> Vec<Token> {
        let config = self.config(kind);
        let tokens: Vec<Token> = self
            .lemmatizer
            .annotate(text)
            .into_iter()
            .map(|a| {
                let base = if config.lemmatize { a.lemma } else { a.surface };
                if config.stem {
                    stemmer::stem(&base)
                } else {
                    base
                }
            })
            .filter(|t| !t.is_empty() && !PUNCT.is_match(t))
            .collect();
        self.remove_stop_words(tokens)
    }

    pub fn normalize_query(&self, text: &str) -> Vec<Token> {
        self.normalize(text, TextKind::Query)
    }

    pub fn normalize_document(&self, text: &str) -> Vec<Token> {
        self.normalize(text, TextKind::Document)
    }

    /// Skip stop words only while fewer than `n - 4` have been skipped.
    fn remove_stop_words(&self, tokens: Vec<Token>) -> Vec<Token> {
        let budget = tokens.len().saturating_sub(STOP_WORD_FLOOR);
        let mut removed = 0;
        tokens
            .into_iter()
            .filter(|t| {
                if removed < budget && self.stop_words.contains(t) {
                    removed += 1;
                    false
                } else {
                    true
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Normalizer {
        let config = NormalizerConfig { stem: false, lemmatize: false };
        Normalizer::new().query_config(config).document_config(config)
    }

    #[test]
    fn floor_bounds_stop_word_removal() {
        let n = plain();
        assert_eq!(n.normalize_query("the a an of cat"), vec!["a", "an", "of", "cat"]);
    }

    #[test]
    fn removal_stops_once_budget_is_spent() {
        let n = plain();
        // six tokens, budget of two
        assert_eq!(
            n.normalize_document("the cat and the hat of"),
            vec!["cat", "the", "hat", "of"]
        );
    }

    #[test]
    fn configs_are_independent_per_kind() {
        let n = Normalizer::new().query_config(NormalizerConfig { stem: false, lemmatize: false });
        assert_eq!(n.normalize_query("Cities"), vec!["cities"]);
        assert_eq!(n.normalize_document("Cities"), vec!["citi"]);
    }
}
