//! # daorag-core
//!
//! Embeddable document similarity engine for DAO governance archives:
//! group-scoped storage with synchronous JSON snapshot persistence,
//! dual-mode retrieval (fingerprint cosine or lexical word overlap), and
//! TextRank extractive summarization.
//!
//! This is the core library crate with zero async dependencies, suitable
//! for embedding directly in Rust or behind a server.

/// Global configuration constants: limits, defaults, and tuning parameters.
pub mod config;
/// Core document type: the `ProposalDoc` record.
pub mod document;
/// Fingerprint vectors, cosine similarity, and the `Encoder` boundary.
pub mod embedding;
/// Dual-mode ranking engine: fingerprint cosine or lexical word overlap.
pub mod rank;
/// Document store: insertion-ordered map with synchronous JSON snapshots.
pub mod store;
/// Extractive summarization: TextRank with a leading-sentences fallback.
pub mod summary;

pub use document::ProposalDoc;
pub use embedding::{Encoder, Fingerprint, HashingEncoder};
pub use rank::{Ranker, ScoredDoc};
pub use store::DocumentStore;
