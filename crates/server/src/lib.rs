//! daorag-server — HTTP server for daorag.
//!
//! Provides the REST API over the document store, ranker, and summarizer.
//! Core retrieval logic lives in `daorag-core`.

/// REST API layer: Axum router, HTTP handlers, models, metrics.
pub mod api;
