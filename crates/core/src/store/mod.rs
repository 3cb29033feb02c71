//! Document store: insertion-ordered id → record map with synchronous
//! JSON snapshot persistence.
//!
//! A [`DocumentStore`] wraps the in-memory map in an `RwLock` and owns the
//! snapshot path. Every mutation persists the full store to disk before
//! returning, holding the write lock across the read-modify-persist sequence
//! so concurrent upserts can never produce a snapshot reflecting neither
//! state. Reads run concurrently and see the store either before or after a
//! given upsert, never mid-write.

/// Snapshot save/load with atomic writes.
pub mod snapshot;

use crate::document::ProposalDoc;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Internal data for the store, protected by an `RwLock`.
///
/// Serializes as the bare id → record map, which is exactly the snapshot
/// layout on disk.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreData {
    /// id → record in insertion order. Replacing an id keeps its position.
    pub documents: IndexMap<String, Arc<ProposalDoc>>,
}

/// A thread-safe document store bound to one snapshot file.
///
/// Cloning produces a new handle to the same shared data.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    data: Arc<RwLock<StoreData>>,
    snapshot_path: PathBuf,
}

impl DocumentStore {
    /// Opens the store, loading the snapshot at `path` if one exists.
    ///
    /// A missing snapshot is not an error; the store starts empty. A present
    /// but unreadable or malformed snapshot is a startup fault and is
    /// returned to the caller.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let snapshot_path = path.into();
        let data = if snapshot_path.exists() {
            snapshot::load(&snapshot_path)?
        } else {
            tracing::info!("No snapshot at {:?}, starting empty", snapshot_path);
            StoreData::default()
        };
        Ok(Self {
            data: Arc::new(RwLock::new(data)),
            snapshot_path,
        })
    }

    /// Inserts or fully replaces the record stored under `id`, then persists
    /// the whole store.
    ///
    /// Replacing an existing id keeps its original insertion position. The
    /// write lock is held across the persist, so the snapshot always reflects
    /// a complete before-or-after state. An I/O failure is returned to the
    /// caller; the in-memory insert is not rolled back, so memory may run
    /// ahead of disk until the next successful persist.
    pub fn upsert(&self, id: String, doc: ProposalDoc) -> io::Result<()> {
        let mut data = self.data.write();
        data.documents.insert(id, Arc::new(doc));
        snapshot::save(&data, &self.snapshot_path)
    }

    /// Retrieves a record by id, or `None` if not found.
    pub fn get(&self, id: &str) -> Option<Arc<ProposalDoc>> {
        self.data.read().documents.get(id).cloned()
    }

    /// All (id, record) pairs belonging to `dao_id`, in insertion order.
    pub fn for_dao(&self, dao_id: &str) -> Vec<(String, Arc<ProposalDoc>)> {
        self.data
            .read()
            .documents
            .iter()
            .filter(|(_, doc)| doc.dao_id == dao_id)
            .map(|(id, doc)| (id.clone(), Arc::clone(doc)))
            .collect()
    }

    /// Total number of stored documents.
    pub fn len(&self) -> usize {
        self.data.read().documents.len()
    }

    /// Returns `true` if the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.data.read().documents.is_empty()
    }

    /// Document counts per DAO, keyed by DAO id.
    pub fn counts_by_dao(&self) -> BTreeMap<String, usize> {
        let data = self.data.read();
        let mut counts = BTreeMap::new();
        for doc in data.documents.values() {
            *counts.entry(doc.dao_id.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Path of the snapshot file this store persists to.
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{Encoder, HashingEncoder};
    use tempfile::TempDir;

    fn make_doc(dao_id: &str, title: &str, text: &str) -> ProposalDoc {
        ProposalDoc {
            dao_id: dao_id.to_string(),
            title: title.to_string(),
            text: text.to_string(),
            outcome: String::new(),
            doc_type: "proposal".to_string(),
            fingerprint: None,
        }
    }

    fn store_in(dir: &TempDir) -> DocumentStore {
        DocumentStore::open(dir.path().join("vecstore.json")).unwrap()
    }

    // ── Open and basic CRUD ────────────────────────────────────────────

    #[test]
    fn test_open_missing_snapshot_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .upsert("p1".to_string(), make_doc("dao1", "Treasury", "vote on treasury"))
            .unwrap();

        assert_eq!(store.len(), 1);
        let fetched = store.get("p1").unwrap();
        assert_eq!(fetched.dao_id, "dao1");
        assert_eq!(fetched.title, "Treasury");
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_upsert_replaces_entirely() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut original = make_doc("dao1", "Old title", "old body");
        original.outcome = "passed".to_string();
        store.upsert("p1".to_string(), original).unwrap();

        store
            .upsert("p1".to_string(), make_doc("dao1", "New title", "new body"))
            .unwrap();

        assert_eq!(store.len(), 1);
        let fetched = store.get("p1").unwrap();
        assert_eq!(fetched.title, "New title");
        assert_eq!(fetched.text, "new body");
        // Full replace: the old outcome does not survive
        assert_eq!(fetched.outcome, "");
    }

    #[test]
    fn test_upsert_keeps_insertion_position() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.upsert("a".to_string(), make_doc("dao1", "", "first")).unwrap();
        store.upsert("b".to_string(), make_doc("dao1", "", "second")).unwrap();
        store.upsert("c".to_string(), make_doc("dao1", "", "third")).unwrap();

        // Overwrite the middle record
        store.upsert("b".to_string(), make_doc("dao1", "", "second v2")).unwrap();

        let ids: Vec<String> = store.for_dao("dao1").into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(store.get("b").unwrap().text, "second v2");
    }

    // ── Group scoping and aggregates ───────────────────────────────────

    #[test]
    fn test_for_dao_isolation_and_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.upsert("p1".to_string(), make_doc("dao1", "", "one")).unwrap();
        store.upsert("q1".to_string(), make_doc("dao2", "", "other")).unwrap();
        store.upsert("p2".to_string(), make_doc("dao1", "", "two")).unwrap();

        let dao1: Vec<String> = store.for_dao("dao1").into_iter().map(|(id, _)| id).collect();
        assert_eq!(dao1, vec!["p1", "p2"]);
        assert!(store.for_dao("dao3").is_empty());
    }

    #[test]
    fn test_counts_by_dao() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        for i in 0..3 {
            store
                .upsert(format!("p{i}"), make_doc("dao1", "", "text"))
                .unwrap();
        }
        for i in 0..2 {
            store
                .upsert(format!("q{i}"), make_doc("dao2", "", "text"))
                .unwrap();
        }

        assert_eq!(store.len(), 5);
        let counts = store.counts_by_dao();
        assert_eq!(counts.get("dao1"), Some(&3));
        assert_eq!(counts.get("dao2"), Some(&2));
        assert_eq!(counts.len(), 2);
    }

    // ── Snapshot round-trip ────────────────────────────────────────────

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vecstore.json");
        let encoder = HashingEncoder::new(32);

        {
            let store = DocumentStore::open(&path).unwrap();
            let mut doc = make_doc("dao1", "Treasury", "vote on treasury allocation");
            doc.fingerprint = Some(encoder.encode(&doc.text));
            store.upsert("p1".to_string(), doc).unwrap();
            store.upsert("p2".to_string(), make_doc("dao2", "", "no fingerprint")).unwrap();
        }

        let reloaded = DocumentStore::open(&path).unwrap();
        assert_eq!(reloaded.len(), 2);

        let p1 = reloaded.get("p1").unwrap();
        assert_eq!(p1.title, "Treasury");
        let fp = p1.fingerprint.as_ref().unwrap();
        assert_eq!(fp.values(), encoder.encode("vote on treasury allocation").values());
        assert!((fp.norm() - 1.0).abs() < 1e-5, "norm is rebuilt on load");

        assert!(reloaded.get("p2").unwrap().fingerprint.is_none());
    }

    #[test]
    fn test_round_trip_preserves_insertion_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vecstore.json");

        {
            let store = DocumentStore::open(&path).unwrap();
            for id in ["z", "a", "m"] {
                store.upsert(id.to_string(), make_doc("dao1", "", "text")).unwrap();
            }
        }

        let reloaded = DocumentStore::open(&path).unwrap();
        let ids: Vec<String> = reloaded.for_dao("dao1").into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_load_fills_missing_fields_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vecstore.json");
        std::fs::write(&path, r#"{"p1": {"daoId": "dao1", "text": "body"}}"#).unwrap();

        let store = DocumentStore::open(&path).unwrap();
        let doc = store.get("p1").unwrap();
        assert_eq!(doc.title, "");
        assert_eq!(doc.doc_type, "proposal");
        assert!(doc.fingerprint.is_none());
    }

    #[test]
    fn test_open_malformed_snapshot_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vecstore.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = DocumentStore::open(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_open_wrong_root_shape_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vecstore.json");
        std::fs::write(&path, r#"["not", "a", "map"]"#).unwrap();

        assert!(DocumentStore::open(&path).is_err());
    }

    // ── Persistence failure ────────────────────────────────────────────

    #[test]
    fn test_upsert_surfaces_io_failure() {
        let dir = TempDir::new().unwrap();
        // Parent of the snapshot path is a regular file, so the directory
        // cannot be created and the persist must fail.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file").unwrap();
        let store = DocumentStore::open(blocker.join("sub").join("vecstore.json")).unwrap();

        let err = store.upsert("p1".to_string(), make_doc("dao1", "", "text"));
        assert!(err.is_err());
        // Known gap: memory runs ahead of disk after a failed persist
        assert_eq!(store.len(), 1);
    }
}
