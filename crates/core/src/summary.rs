//! Extractive summarization: TextRank with a leading-sentences fallback.
//!
//! [`summarize`] never fails. It runs TextRank over the input's sentence
//! graph (sentences as nodes, shared-word counts as edge weights, PageRank
//! power iteration) and picks the highest-ranked sentences in document order.
//! When TextRank cannot produce a summary, the input degrades to
//! [`leading_sentences`], a named fallback rather than a catch-all: the first
//! few sentence fragments rejoined with their punctuation.

use crate::config::{
    SUMMARY_FALLBACK_SENTENCES, SUMMARY_MAX_SENTENCES, SUMMARY_MIN_SENTENCES,
    SUMMARY_WORDS_PER_SENTENCE, TEXTRANK_DAMPING, TEXTRANK_EPSILON, TEXTRANK_MAX_ITERATIONS,
    TEXTRANK_MAX_SENTENCES,
};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::HashSet;

/// Summarizes `text`, always producing a result.
///
/// The sentence budget scales with input length: one sentence per
/// [`SUMMARY_WORDS_PER_SENTENCE`] words, clamped to
/// [`SUMMARY_MIN_SENTENCES`]..=[`SUMMARY_MAX_SENTENCES`].
pub fn summarize(text: &str) -> String {
    let budget = sentence_budget(text);
    textrank_summary(text, budget)
        .unwrap_or_else(|| leading_sentences(text, SUMMARY_FALLBACK_SENTENCES))
}

fn sentence_budget(text: &str) -> usize {
    let words = text.split_whitespace().count();
    (words / SUMMARY_WORDS_PER_SENTENCE).clamp(SUMMARY_MIN_SENTENCES, SUMMARY_MAX_SENTENCES)
}

/// TextRank over the sentence similarity graph.
///
/// Returns `None` when the input has fewer than two sentences (ranking needs
/// at least two nodes) or more than [`TEXTRANK_MAX_SENTENCES`] (the graph is
/// a dense n × n matrix, so the cap bounds both memory and CPU per call).
/// Selected sentences are emitted in document order.
pub fn textrank_summary(text: &str, num_sentences: usize) -> Option<String> {
    let sentences = split_sentences(text);
    let n = sentences.len();
    if !(SUMMARY_MIN_SENTENCES..=TEXTRANK_MAX_SENTENCES).contains(&n) {
        return None;
    }

    let word_sets: Vec<HashSet<String>> = sentences.iter().map(|s| word_set(s)).collect();

    // Row-stochastic transition matrix: normalized edge weights damped
    // toward the uniform distribution
    let mut matrix = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in 0..n {
            matrix[i][j] = edge_weight(&word_sets[i], &word_sets[j]);
        }
    }
    for row in &mut matrix {
        // epsilon keeps all-zero rows finite
        let denom = row.iter().sum::<f64>() + 1e-7;
        for v in row.iter_mut() {
            *v = TEXTRANK_DAMPING * (*v / denom) + (1.0 - TEXTRANK_DAMPING) / n as f64;
        }
    }

    // Power iteration: p <- M^T p until the update falls below epsilon
    let mut p = vec![1.0 / n as f64; n];
    for _ in 0..TEXTRANK_MAX_ITERATIONS {
        let mut next = vec![0.0f64; n];
        for (i, row) in matrix.iter().enumerate() {
            for (j, weight) in row.iter().enumerate() {
                next[j] += weight * p[i];
            }
        }
        let delta = next
            .iter()
            .zip(p.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt();
        p = next;
        if delta <= TEXTRANK_EPSILON {
            break;
        }
    }

    // Top sentences by rank (stable: equal ranks keep document order),
    // re-sorted into document order for output
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| Reverse(OrderedFloat(p[i])));
    let mut selected: Vec<usize> = order.into_iter().take(num_sentences.min(n)).collect();
    selected.sort_unstable();

    let summary = selected
        .iter()
        .map(|&i| sentences[i])
        .collect::<Vec<_>>()
        .join(" ");
    Some(summary)
}

/// Naive fallback: the first `n` sentence fragments, rejoined.
///
/// Splits on `.`, keeps the first `n` fragments, drops blanks, and rejoins
/// with a trailing period. Empty input yields `"."`.
pub fn leading_sentences(text: &str, n: usize) -> String {
    let fragments: Vec<&str> = text
        .split('.')
        .take(n)
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();
    format!("{}.", fragments.join(". "))
}

/// Sentence slices including their terminal punctuation.
///
/// Fragments with no word characters (stray punctuation, as in `"..."`)
/// are dropped.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if matches!(c, '.' | '!' | '?') {
            let end = i + c.len_utf8();
            let sentence = text[start..end].trim();
            if sentence.chars().any(char::is_alphanumeric) {
                sentences.push(sentence);
            }
            start = end;
        }
    }
    let tail = text[start..].trim();
    if tail.chars().any(char::is_alphanumeric) {
        sentences.push(tail);
    }
    sentences
}

/// Distinct lowercased words of one sentence, split on non-alphanumeric
/// boundaries so punctuation does not stick to words.
fn word_set(sentence: &str) -> HashSet<String> {
    sentence
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Shared-word count between two sentences, normalized by the log of both
/// lengths so long sentences do not dominate. Single-word pairs skip the
/// normalization (both logs are zero).
fn edge_weight(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let overlap = a.intersection(b).count();
    if overlap == 0 {
        return 0.0;
    }
    let norm = (a.len() as f64).ln() + (b.len() as f64).ln();
    if norm == 0.0 {
        overlap as f64
    } else {
        overlap as f64 / norm
    }
}
