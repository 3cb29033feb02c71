//! Request and response data transfer objects for the REST API.
//!
//! All types derive `Serialize` and/or `Deserialize` for JSON marshalling via
//! Axum. Field names on the wire are camelCase where clients expect them
//! (`daoId`, `topK`); the JSON key `type` maps to `doc_type` because `type`
//! is a Rust keyword.

use daorag_core::config;
use daorag_core::document::ProposalDoc;
use daorag_core::rank::ScoredDoc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request body for `POST /embed` and `POST /summarize`.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Request body for `POST /add_doc`.
#[derive(Debug, Deserialize)]
pub struct AddDocumentRequest {
    pub id: String,
    #[serde(rename = "daoId")]
    pub dao_id: String,
    #[serde(default)]
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub outcome: String,
    #[serde(rename = "type", default = "default_doc_type")]
    pub doc_type: String,
}

fn default_doc_type() -> String {
    "proposal".to_string()
}

impl AddDocumentRequest {
    /// Split the request into the storage key and the document record.
    /// The id lives outside the record; the fingerprint is attached later.
    pub fn into_parts(self) -> (String, ProposalDoc) {
        let doc = ProposalDoc {
            dao_id: self.dao_id,
            title: self.title,
            text: self.text,
            outcome: self.outcome,
            doc_type: self.doc_type,
            fingerprint: None,
        };
        (self.id, doc)
    }
}

/// Request body for `POST /search`.
///
/// `top_k` is signed so that clients sending `"topK": -1` get the documented
/// empty-result behavior instead of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "daoId")]
    pub dao_id: String,
    pub text: String,
    #[serde(rename = "topK", default = "default_top_k")]
    pub top_k: i64,
}

fn default_top_k() -> i64 {
    config::DEFAULT_TOP_K as i64
}

/// A single ranked document in a search response.
#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub text: String,
    pub outcome: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub score: f32,
}

impl SearchHit {
    /// Build a wire hit from a ranked document, truncating the body to the
    /// preview length. Truncation is presentation-only; the stored document
    /// keeps its full text.
    pub fn from_scored(scored: ScoredDoc) -> Self {
        Self {
            id: scored.id,
            title: scored.doc.title.clone(),
            text: scored.doc.preview(config::PREVIEW_LEN).to_string(),
            outcome: scored.doc.outcome.clone(),
            doc_type: scored.doc.doc_type.clone(),
            score: scored.score,
        }
    }
}

/// Response body for `POST /search`.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
}

/// Response body for `POST /add_doc`.
#[derive(Debug, Serialize)]
pub struct AddDocumentResponse {
    pub ok: bool,
    pub id: String,
}

/// Response body for `POST /embed`.
#[derive(Debug, Serialize)]
pub struct EmbedResponse {
    pub embedding: Vec<f32>,
}

/// Response body for `POST /summarize`.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub documents: usize,
    pub model: String,
}

/// Response body for `GET /stats`.
///
/// `by_dao` is a `BTreeMap` so the JSON object keys come out sorted.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_documents: usize,
    pub by_dao: BTreeMap<String, usize>,
}
