//! Clue answering over a title-delimited text corpus: normalization, inverted
//! indexing, TF-IDF ranking and answer-key evaluation.

pub mod answers;
pub mod corpus;
pub mod error;
pub mod eval;
pub mod index;
pub mod normalize;
pub mod persist;
pub mod query;
pub mod rank;
pub mod stemmer;
pub mod stopwords;
pub mod tokenizer;

pub use answers::AnswerKey;
pub use error::{Error, Result};
pub use eval::{evaluate, EvalSummary, Verdict};
pub use index::{DocId, Document, DocumentStats, IndexBuilder, InvertedIndex, Posting, TermId};
pub use normalize::{Normalizer, NormalizerConfig, TextKind};
pub use rank::{rank, rank_with, IdfVariant, ScoredResult, ScoringParams, TfVariant, DEFAULT_TOP_K};
pub use stopwords::StopWords;
pub use tokenizer::{Annotation, Lemmatizer, SimpleLemmatizer};

/// A normalized lexical unit. Never empty, never pure punctuation.
pub type Token = String;
