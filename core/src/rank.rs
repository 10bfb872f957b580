//! TF-IDF ranking over an immutable [`InvertedIndex`].
//!
//! Ranking only reads the index and statistics, so any number of queries may
//! be ranked concurrently against the same snapshot.

use crate::index::{DocId, DocumentStats, InvertedIndex};
use crate::query;
use crate::Token;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_TOP_K: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub doc_id: DocId,
    pub title: String,
    pub score: f32,
}

/// Term-frequency transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TfVariant {
    /// `tf`
    Linear,
    /// `sqrt(tf)`
    Sqrt,
    /// `1 + ln(tf)`
    LogScaled,
}

/// Inverse-document-frequency transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdfVariant {
    /// `ln(N / df)`; zero for terms present in every document.
    Standard,
    /// `1 + ln((N + 1) / (df + 1))`; always positive.
    Classic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringParams {
    pub tf: TfVariant,
    pub idf: IdfVariant,
    /// Divide each contribution by `sqrt(doc_length)`.
    pub length_norm: bool,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self { tf: TfVariant::Sqrt, idf: IdfVariant::Classic, length_norm: false }
    }
}

impl ScoringParams {
    pub fn tf(&self, tf: u32) -> f32 {
        if tf == 0 {
            return 0.0;
        }
        match self.tf {
            TfVariant::Linear => tf as f32,
            TfVariant::Sqrt => (tf as f32).sqrt(),
            TfVariant::LogScaled => 1.0 + (tf as f32).ln(),
        }
    }

    pub fn idf(&self, num_docs: u32, df: u32) -> f32 {
        match self.idf {
            IdfVariant::Standard => (num_docs.max(1) as f32 / df.max(1) as f32).ln(),
            IdfVariant::Classic => 1.0 + ((num_docs as f32 + 1.0) / (df as f32 + 1.0)).ln(),
        }
    }
}

/// Rank with the default [`ScoringParams`].
pub fn rank(query: &[Token], index: &InvertedIndex, stats: &DocumentStats, top_k: usize) -> Vec<ScoredResult> {
    rank_with(query, index, stats, top_k, &ScoringParams::default())
}

/// Score every document that shares a term with `query` and return the best
/// `top_k`, highest score first. Equal scores keep the order in which their
/// documents were first met while scanning postings.
pub fn rank_with(
    query: &[Token],
    index: &InvertedIndex,
    stats: &DocumentStats,
    top_k: usize,
    params: &ScoringParams,
) -> Vec<ScoredResult> {
    let parsed = match query::parse(query) {
        Ok(q) => q,
        Err(e) => {
            tracing::warn!(error = %e, "treating unparsable query as no results");
            return Vec::new();
        }
    };
    if parsed.is_empty() || top_k == 0 {
        return Vec::new();
    }

    let excluded: HashSet<DocId> = parsed
        .excluded
        .iter()
        .filter_map(|t| index.term_id(t))
        .flat_map(|tid| index.postings(tid).iter().map(|p| p.doc_id))
        .collect();

    // documents holding each required term; a required term nobody has matches nothing
    let mut required: Vec<HashSet<DocId>> = Vec::with_capacity(parsed.required.len());
    for term in &parsed.required {
        let Some(tid) = index.term_id(term) else { return Vec::new() };
        required.push(index.postings(tid).iter().map(|p| p.doc_id).collect());
    }

    let mut slots: HashMap<DocId, usize> = HashMap::new();
    let mut scored: Vec<(DocId, f32)> = Vec::new();
    for (term, qtf) in &parsed.terms {
        let Some(tid) = index.term_id(term) else { continue };
        let idf = params.idf(stats.num_docs, stats.doc_frequency(tid));
        for p in index.postings(tid) {
            if excluded.contains(&p.doc_id) || !required.iter().all(|docs| docs.contains(&p.doc_id)) {
                continue;
            }
            let mut w = *qtf as f32 * params.tf(p.term_frequency) * idf;
            if params.length_norm {
                w /= (stats.doc_length(p.doc_id).max(1) as f32).sqrt();
            }
            match slots.get(&p.doc_id) {
                Some(&i) => scored[i].1 += w,
                None => {
                    slots.insert(p.doc_id, scored.len());
                    scored.push((p.doc_id, w));
                }
            }
        }
    }

    // stable: ties keep discovery order
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);
    tracing::debug!(candidates = slots.len(), returned = scored.len(), "query ranked");
    scored
        .into_iter()
        .filter_map(|(doc_id, score)| {
            index.document(doc_id).map(|d| ScoredResult { doc_id, title: d.title.clone(), score })
        })
        .collect()
}
