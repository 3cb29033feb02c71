//! Prometheus metrics recording.
//!
//! Provides functions to record per-request HTTP metrics (counters and
//! histograms) and to refresh store-level gauges. Gauges are updated on the
//! write path rather than by a background task, since the store only changes
//! through `add_doc`.

use daorag_core::store::DocumentStore;
use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Records HTTP request metrics: increments `http_requests_total` and records
/// `http_request_duration_seconds`, labeled by method, path, and status code.
pub fn record_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Records a document upsert, labeled by DAO id.
pub fn record_write_operation(dao_id: &str) {
    counter!(
        "daorag_documents_upserted_total",
        "dao" => dao_id.to_string()
    )
    .increment(1);
}

/// Records a search, labeled by DAO id and ranking mode.
///
/// Ranking modes: `"semantic"`, `"lexical"`.
pub fn record_search_operation(dao_id: &str, mode: &str) {
    counter!(
        "daorag_searches_total",
        "dao" => dao_id.to_string(),
        "mode" => mode.to_string()
    )
    .increment(1);
}

/// Updates store-level Prometheus gauges: total document count and
/// per-DAO document counts.
pub fn update_store_metrics(store: &DocumentStore) {
    gauge!("daorag_documents_total").set(store.len() as f64);
    for (dao_id, count) in store.counts_by_dao() {
        gauge!("daorag_dao_documents", "dao" => dao_id).set(count as f64);
    }
}
