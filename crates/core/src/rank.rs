//! Dual-mode ranking engine.
//!
//! A [`Ranker`] is constructed once at startup, in one of two modes:
//! fingerprint mode (cosine similarity against stored fingerprints, queries
//! encoded on the fly) or lexical mode (word-overlap scoring straight off the
//! body text, for deployments with no encoder). Handlers hold the ranker as
//! an opaque strategy and never branch on the mode themselves.
//!
//! Both modes order results identically: score descending, ties broken by the
//! candidates' insertion order so repeated queries are deterministic.

use crate::document::ProposalDoc;
use crate::embedding::Encoder;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;

/// A ranked document with its relevance score.
///
/// Score semantics depend on the ranker mode: cosine similarity in
/// fingerprint mode (documents without a stored fingerprint score 0.0),
/// query-word coverage in `[0, 1]` in lexical mode.
#[derive(Debug, Clone)]
pub struct ScoredDoc {
    /// The document id (store key).
    pub id: String,
    /// The matched document (shared reference).
    pub doc: Arc<ProposalDoc>,
    /// Relevance score (interpretation depends on the ranker mode).
    pub score: f32,
}

#[derive(Clone)]
enum Mode {
    Semantic(Arc<dyn Encoder>),
    Lexical,
}

/// Ranking strategy selected once at startup.
#[derive(Clone)]
pub struct Ranker {
    mode: Mode,
}

impl Ranker {
    /// Fingerprint mode: queries are encoded and scored by cosine similarity.
    pub fn semantic(encoder: Arc<dyn Encoder>) -> Self {
        Self {
            mode: Mode::Semantic(encoder),
        }
    }

    /// Lexical mode: word-overlap scoring, no encoder involved.
    pub fn lexical() -> Self {
        Self { mode: Mode::Lexical }
    }

    /// The encoder, or `None` in lexical mode.
    ///
    /// Callers gate fingerprint-only operations (document add, raw embed) on
    /// this returning `Some`.
    pub fn encoder(&self) -> Option<&dyn Encoder> {
        match &self.mode {
            Mode::Semantic(encoder) => Some(encoder.as_ref()),
            Mode::Lexical => None,
        }
    }

    /// Model identifier for health introspection; `"disabled"` in lexical mode.
    pub fn model_id(&self) -> String {
        match &self.mode {
            Mode::Semantic(encoder) => encoder.model_id(),
            Mode::Lexical => "disabled".to_string(),
        }
    }

    /// Short mode name for logs.
    pub fn mode_name(&self) -> &'static str {
        match &self.mode {
            Mode::Semantic(_) => "semantic",
            Mode::Lexical => "lexical",
        }
    }

    /// Scores and orders `candidates` against `query`, returning at most
    /// `top_k` results, best first.
    ///
    /// Candidates must arrive in the store's insertion order; that order is
    /// the tie-break for equal scores. An empty candidate set or `top_k == 0`
    /// yields an empty result. In lexical mode a blank query also yields an
    /// empty result (in fingerprint mode a blank query encodes to the zero
    /// vector and every candidate scores 0.0).
    pub fn rank(
        &self,
        query: &str,
        candidates: Vec<(String, Arc<ProposalDoc>)>,
        top_k: usize,
    ) -> Vec<ScoredDoc> {
        if candidates.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<ScoredDoc> = match &self.mode {
            Mode::Semantic(encoder) => {
                let query_fp = encoder.encode(query);
                candidates
                    .into_iter()
                    .map(|(id, doc)| {
                        let score = doc
                            .fingerprint
                            .as_ref()
                            .map_or(0.0, |fp| query_fp.cosine(fp));
                        ScoredDoc { id, doc, score }
                    })
                    .collect()
            }
            Mode::Lexical => {
                let query_terms = term_set(query);
                if query_terms.is_empty() {
                    return Vec::new();
                }
                candidates
                    .into_iter()
                    .map(|(id, doc)| {
                        let doc_terms = term_set(&doc.text);
                        let overlap = query_terms.intersection(&doc_terms).count();
                        // Asymmetric on purpose: rewards covering the query's
                        // words regardless of document length (not Jaccard).
                        let score = overlap as f32 / query_terms.len().max(1) as f32;
                        ScoredDoc { id, doc, score }
                    })
                    .collect()
            }
        };

        // Stable sort: equal scores keep insertion order
        scored.sort_by_key(|s| Reverse(OrderedFloat(s.score)));
        scored.truncate(top_k);
        scored
    }
}

/// Distinct lowercased whitespace-separated words (duplicates collapse).
fn term_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}
