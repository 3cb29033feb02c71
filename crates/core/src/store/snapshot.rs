//! Snapshot persistence for the document store.
//!
//! The snapshot is a single JSON file: a map from document id to record,
//! with fingerprints as plain arrays of numbers. It is rewritten in full
//! after every mutation and reloaded verbatim at startup. Writes use atomic
//! temp-file + rename to prevent corruption on crash.

use super::StoreData;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

/// Serialize the store to `path` with an atomic write.
pub fn save(data: &StoreData, path: &Path) -> io::Result<()> {
    let bytes = serde_json::to_vec(data).map_err(|e| io::Error::other(e.to_string()))?;

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }

    // Atomic write: write to temp, then rename
    let tmp = tmp_path(path);
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;

    tracing::info!(
        "Saved {} documents ({} bytes) to {:?}",
        data.documents.len(),
        bytes.len(),
        path
    );
    Ok(())
}

/// Deserialize the store from `path`.
///
/// Unparseable content is an `InvalidData` error; per-record optional fields
/// missing from older snapshots deserialize to their defaults.
pub fn load(path: &Path) -> io::Result<StoreData> {
    let bytes = fs::read(path)?;
    let data: StoreData = serde_json::from_slice(&bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

    tracing::info!("Loaded {} documents from {:?}", data.documents.len(), path);
    Ok(data)
}
