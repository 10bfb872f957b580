use crate::corpus::{self, RawRecord};
use crate::normalize::{Normalizer, TextKind};
use crate::tokenizer::Lemmatizer;
use crate::Token;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, BufRead};

pub type TermId = u32;
pub type DocId = u32;

/// A finalized corpus entry. `title` is the external id, brackets removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub body: Vec<Token>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_frequency: u32,
}

/// Term → postings, plus the document store the postings point into.
///
/// Postings for a term are kept in document insertion order and hold at most
/// one entry per document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvertedIndex {
    pub dictionary: HashMap<String, TermId>,
    pub postings: Vec<Vec<Posting>>, // indexed by TermId
    pub docs: Vec<Document>,         // indexed by DocId
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_docs(&self) -> u32 {
        self.docs.len() as u32
    }

    pub fn num_terms(&self) -> usize {
        self.dictionary.len()
    }

    pub fn term_id(&self, term: &str) -> Option<TermId> {
        self.dictionary.get(term).copied()
    }

    pub fn postings(&self, term_id: TermId) -> &[Posting] {
        self.postings.get(term_id as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        self.docs.get(doc_id as usize)
    }

    /// Terms in id order.
    fn terms_by_id(&self) -> Vec<&str> {
        let mut terms = vec![""; self.dictionary.len()];
        for (term, &tid) in &self.dictionary {
            terms[tid as usize] = term.as_str();
        }
        terms
    }
}

/// Length and document-frequency statistics derived from an [`InvertedIndex`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub doc_lengths: Vec<u32>, // indexed by DocId
    pub df: Vec<u32>,          // indexed by TermId
    pub num_docs: u32,
}

impl DocumentStats {
    /// Recompute statistics from scratch.
    pub fn from_index(index: &InvertedIndex) -> Self {
        Self {
            doc_lengths: index.docs.iter().map(|d| d.body.len() as u32).collect(),
            df: index.postings.iter().map(|p| p.len() as u32).collect(),
            num_docs: index.num_docs(),
        }
    }

    pub fn doc_length(&self, doc_id: DocId) -> u32 {
        self.doc_lengths.get(doc_id as usize).copied().unwrap_or(0)
    }

    pub fn doc_frequency(&self, term_id: TermId) -> u32 {
        self.df.get(term_id as usize).copied().unwrap_or(0)
    }

    pub fn average_doc_length(&self) -> f32 {
        if self.num_docs == 0 {
            return 0.0;
        }
        self.doc_lengths.iter().map(|&l| l as u64).sum::<u64>() as f32 / self.num_docs as f32
    }
}

/// Accumulates documents into an index. A document's postings are committed
/// in a single step once its whole body is known.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    index: InvertedIndex,
    stats: DocumentStats,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_docs(&self) -> u32 {
        self.index.num_docs()
    }

    /// Add a finalized document. Documents with an empty title are dropped.
    pub fn add_document(&mut self, title: impl Into<String>, body: Vec<Token>) -> Option<DocId> {
        let title = title.into();
        if title.is_empty() {
            return None;
        }
        // term frequencies in first-occurrence order
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(&str, u32)> = Vec::new();
        for token in &body {
            match slots.get(token.as_str()) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    slots.insert(token.as_str(), counts.len());
                    counts.push((token.as_str(), 1));
                }
            }
        }

        let doc_id = self.index.num_docs();
        for (term, term_frequency) in counts {
            let tid = self.intern(term);
            self.index.postings[tid as usize].push(Posting { doc_id, term_frequency });
            self.stats.df[tid as usize] += 1;
        }
        self.stats.doc_lengths.push(body.len() as u32);
        self.stats.num_docs += 1;
        self.index.docs.push(Document { title, body });
        tracing::debug!(doc_id, "document indexed");
        Some(doc_id)
    }

    /// Normalize every body line of `record` as document text and add it.
    pub fn add_record<L: Lemmatizer>(&mut self, normalizer: &Normalizer<L>, record: RawRecord) -> Option<DocId> {
        let body: Vec<Token> = record
            .lines
            .iter()
            .flat_map(|line| normalizer.normalize(line, TextKind::Document))
            .collect();
        self.add_document(record.title, body)
    }

    /// Consume a title-delimited line source. Returns the number of documents added.
    pub fn index_reader<L: Lemmatizer, R: BufRead>(&mut self, normalizer: &Normalizer<L>, reader: R) -> io::Result<usize> {
        let mut added = 0;
        for record in corpus::records(reader) {
            if self.add_record(normalizer, record?).is_some() {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Append a shard built independently. Its documents are re-based after
    /// ours; term and document frequencies add up.
    pub fn merge(&mut self, other: IndexBuilder) {
        let offset = self.index.num_docs();
        let (other_index, other_stats) = other.finish();
        for (other_tid, term) in other_index.terms_by_id().into_iter().enumerate() {
            let tid = self.intern(term);
            let postings = &other_index.postings[other_tid];
            self.index.postings[tid as usize].extend(
                postings.iter().map(|p| Posting { doc_id: p.doc_id + offset, term_frequency: p.term_frequency }),
            );
            self.stats.df[tid as usize] += other_stats.doc_frequency(other_tid as TermId);
        }
        self.stats.doc_lengths.extend(other_stats.doc_lengths);
        self.stats.num_docs += other_stats.num_docs;
        self.index.docs.extend(other_index.docs);
    }

    pub fn finish(self) -> (InvertedIndex, DocumentStats) {
        (self.index, self.stats)
    }

    fn intern(&mut self, term: &str) -> TermId {
        if let Some(&tid) = self.index.dictionary.get(term) {
            return tid;
        }
        let tid = self.index.dictionary.len() as TermId;
        self.index.dictionary.insert(term.to_string(), tid);
        self.index.postings.push(Vec::new());
        self.stats.df.push(0);
        tid
    }
}
