//! Core document type for daorag.
//!
//! A [`ProposalDoc`] is one stored record: DAO-scoped governance text with
//! optional metadata and an optional fingerprint. The document id is not a
//! field of the record; it is the key under which the store holds the record,
//! mirroring the snapshot layout (a JSON map from id to record).

use crate::embedding::Fingerprint;
use serde::{Deserialize, Serialize};

fn default_doc_type() -> String {
    "proposal".to_string()
}

/// A stored document scoped to one DAO.
///
/// Serde field names match the snapshot format on disk: `daoId`, `type`, and
/// `embedding` rather than their Rust names. Optional metadata fields default
/// to empty (or `"proposal"` for the type), so snapshots written before a
/// field existed remain readable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalDoc {
    /// Owning DAO; partitions the store into independent retrieval scopes.
    #[serde(rename = "daoId")]
    pub dao_id: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// Full body text, stored verbatim.
    pub text: String,
    /// Outcome label (e.g. `"passed"`, `"rejected"`).
    #[serde(default)]
    pub outcome: String,
    /// Document kind, defaulting to `"proposal"`.
    #[serde(rename = "type", default = "default_doc_type")]
    pub doc_type: String,
    /// Fingerprint vector, present when an encoder was available at add time.
    #[serde(rename = "embedding", default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Fingerprint>,
}

impl ProposalDoc {
    /// Returns the first `max_chars` characters of the body text.
    ///
    /// Character-based (not byte-based), so multibyte text never splits
    /// inside a code point. The stored text is never mutated.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => &self.text[..byte_idx],
            None => &self.text,
        }
    }
}
