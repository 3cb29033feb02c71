//! HTTP request handlers and shared application state.

use crate::api::errors::{ApiError, ApiJson};
use crate::api::metrics;
use crate::api::models::*;
use axum::extract::State;
use axum::Json;
use daorag_core::config;
use daorag_core::rank::Ranker;
use daorag_core::store::DocumentStore;
use daorag_core::summary;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state passed to every handler via Axum's `State` extractor.
///
/// The ranking mode (semantic or lexical) is fixed at startup; handlers never
/// re-decide it per request.
#[derive(Clone)]
pub struct AppState {
    pub store: DocumentStore,
    pub ranker: Arc<Ranker>,
    pub prometheus_handle: PrometheusHandle,
    pub start_time: Instant,
}

fn validate_doc_id(id: &str) -> Result<(), ApiError> {
    if id.is_empty() || id.len() > config::MAX_ID_LEN {
        return Err(ApiError::BadRequest(format!(
            "Document id must be 1-{} characters",
            config::MAX_ID_LEN
        )));
    }
    Ok(())
}

fn validate_dao_id(dao_id: &str) -> Result<(), ApiError> {
    if dao_id.is_empty() || dao_id.len() > config::MAX_DAO_ID_LEN {
        return Err(ApiError::BadRequest(format!(
            "daoId must be 1-{} characters",
            config::MAX_DAO_ID_LEN
        )));
    }
    Ok(())
}

fn validate_text_len(text: &str) -> Result<(), ApiError> {
    if text.len() > config::MAX_TEXT_LEN {
        return Err(ApiError::BadRequest(format!(
            "Text exceeds maximum length of {} bytes",
            config::MAX_TEXT_LEN
        )));
    }
    Ok(())
}

fn embeddings_disabled() -> ApiError {
    ApiError::Disabled("Embeddings are disabled on this server".into())
}

/// `POST /embed`
pub async fn embed(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TextRequest>,
) -> Result<Json<EmbedResponse>, ApiError> {
    validate_text_len(&req.text)?;
    let encoder = state.ranker.encoder().ok_or_else(embeddings_disabled)?;
    let fingerprint = encoder.encode(&req.text);
    Ok(Json(EmbedResponse {
        embedding: fingerprint.values().to_vec(),
    }))
}

/// `POST /add_doc`
pub async fn add_doc(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AddDocumentRequest>,
) -> Result<Json<AddDocumentResponse>, ApiError> {
    validate_doc_id(&req.id)?;
    validate_dao_id(&req.dao_id)?;
    if req.text.is_empty() {
        return Err(ApiError::BadRequest("Text must not be empty".into()));
    }
    validate_text_len(&req.text)?;

    let encoder = state.ranker.encoder().ok_or_else(embeddings_disabled)?;

    let (id, mut doc) = req.into_parts();
    doc.fingerprint = Some(encoder.encode(&doc.text));
    let dao_id = doc.dao_id.clone();

    // Same-id writes replace the whole record; the store persists the
    // snapshot before releasing its write lock.
    state.store.upsert(id.clone(), doc).map_err(|e| {
        tracing::error!("Snapshot write failed: {}", e);
        ApiError::Internal("Persist failed".into())
    })?;

    metrics::record_write_operation(&dao_id);
    metrics::update_store_metrics(&state.store);
    tracing::info!(dao = %dao_id, doc_id = %id, "Document upserted");
    Ok(Json(AddDocumentResponse { ok: true, id }))
}

/// `POST /search`
pub async fn search(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    validate_dao_id(&req.dao_id)?;
    validate_text_len(&req.text)?;
    if req.top_k > config::MAX_TOP_K as i64 {
        return Err(ApiError::BadRequest(format!(
            "topK must be at most {}",
            config::MAX_TOP_K
        )));
    }
    // Zero and negative topK rank nothing; that is a valid request.
    let top_k = usize::try_from(req.top_k).unwrap_or(0);

    let candidates = state.store.for_dao(&req.dao_id);
    let hits = state.ranker.rank(&req.text, candidates, top_k);

    metrics::record_search_operation(&req.dao_id, state.ranker.mode_name());
    tracing::info!(
        dao = %req.dao_id,
        top_k,
        mode = state.ranker.mode_name(),
        results = hits.len(),
        "Search completed"
    );
    Ok(Json(SearchResponse {
        results: hits.into_iter().map(SearchHit::from_scored).collect(),
    }))
}

/// `POST /summarize`
///
/// Summarization itself is infallible: when the graph summarizer cannot run
/// (too few sentences, or more than the ranking cap), the leading-sentences
/// fallback answers instead. Only an oversized body is rejected, under the
/// same length bound as the other text endpoints.
pub async fn summarize(
    ApiJson(req): ApiJson<TextRequest>,
) -> Result<Json<SummaryResponse>, ApiError> {
    validate_text_len(&req.text)?;
    Ok(Json(SummaryResponse {
        summary: summary::summarize(&req.text),
    }))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: config::SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        documents: state.store.len(),
        model: state.ranker.model_id(),
    })
}

/// `GET /stats`
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        total_documents: state.store.len(),
        by_dao: state.store.counts_by_dao(),
    })
}

/// `GET /metrics`
pub async fn metrics_endpoint(State(state): State<AppState>) -> String {
    state.prometheus_handle.render()
}

/// Fallback for unknown routes, so 404s carry the same error body shape
/// as every other failure.
pub async fn not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
