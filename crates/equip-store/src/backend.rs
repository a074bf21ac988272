//! Durable storage behind the in-memory history.
//!
//! One JSON snapshot per scope:
//!
//! ```text
//! <data-dir>/
//!   anonymous.json
//!   user-<hex(user id)>.json
//! ```
//!
//! Snapshots are rewritten whole on every change using an atomic write
//! (temp file, fsync, rename), so a reader never sees a half-written history.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use equip_model::{Dataset, HistoryScope};

use crate::error::{Result, StoreError};

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Persistence hook used by [`crate::DatasetStore`].
///
/// `persist` is called with the full, already-trimmed history of one scope
/// while that scope's lock is held.
pub trait HistoryBackend: Send + Sync {
    /// Load every stored scope history.
    fn load_all(&self) -> Result<Vec<ScopeSnapshot>>;

    /// Replace the stored history of `scope` with `datasets` (oldest first).
    fn persist(&self, scope: &HistoryScope, datasets: &[Arc<Dataset>]) -> Result<()>;
}

/// On-disk history of one scope, oldest dataset first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeSnapshot {
    pub version: u32,
    pub scope: HistoryScope,
    pub datasets: Vec<Dataset>,
}

#[derive(Serialize)]
struct ScopeSnapshotRef<'a> {
    version: u32,
    scope: &'a HistoryScope,
    datasets: Vec<&'a Dataset>,
}

/// Snapshot files in a single directory.
#[derive(Debug, Clone)]
pub struct JsonDirectoryBackend {
    dir: PathBuf,
}

impl JsonDirectoryBackend {
    /// Use `dir` for snapshots, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io("create directory", &dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snapshot path for a scope.
    pub fn snapshot_path(&self, scope: &HistoryScope) -> PathBuf {
        self.dir.join(snapshot_file_name(scope))
    }
}

/// File name of a scope snapshot; user ids are hex-encoded so any id is a
/// safe file name.
pub fn snapshot_file_name(scope: &HistoryScope) -> String {
    match scope {
        HistoryScope::Anonymous => "anonymous.json".to_string(),
        HistoryScope::User(user_id) => format!("user-{}.json", hex::encode(user_id.as_str())),
    }
}

impl HistoryBackend for JsonDirectoryBackend {
    fn load_all(&self) -> Result<Vec<ScopeSnapshot>> {
        let entries =
            fs::read_dir(&self.dir).map_err(|e| StoreError::io("read directory", &self.dir, e))?;
        let mut snapshots = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io("read directory", &self.dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let bytes = fs::read(&path).map_err(|e| StoreError::io("read", &path, e))?;
            let snapshot: ScopeSnapshot =
                serde_json::from_slice(&bytes).map_err(|source| StoreError::Serialization {
                    operation: "decode",
                    path: path.clone(),
                    source,
                })?;
            if snapshot.version > SNAPSHOT_VERSION {
                return Err(StoreError::UnsupportedSnapshotVersion {
                    path,
                    found: snapshot.version,
                    max_supported: SNAPSHOT_VERSION,
                });
            }
            tracing::debug!(
                path = %path.display(),
                scope = %snapshot.scope,
                datasets = snapshot.datasets.len(),
                "loaded history snapshot"
            );
            snapshots.push(snapshot);
        }
        Ok(snapshots)
    }

    fn persist(&self, scope: &HistoryScope, datasets: &[Arc<Dataset>]) -> Result<()> {
        let path = self.snapshot_path(scope);
        if datasets.is_empty() {
            return match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StoreError::io("remove", &path, e)),
            };
        }

        let snapshot = ScopeSnapshotRef {
            version: SNAPSHOT_VERSION,
            scope,
            datasets: datasets.iter().map(AsRef::as_ref).collect(),
        };
        let bytes = serde_json::to_vec(&snapshot).map_err(|source| StoreError::Serialization {
            operation: "encode",
            path: path.clone(),
            source,
        })?;
        write_atomic(&path, &bytes)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");

    let mut file = File::create(&temp_path).map_err(|e| StoreError::io("create", &temp_path, e))?;
    let written = file
        .write_all(bytes)
        .map_err(|e| StoreError::io("write", &temp_path, e))
        .and_then(|()| {
            file.sync_all()
                .map_err(|e| StoreError::io("sync", &temp_path, e))
        });
    drop(file);

    let result = written
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| StoreError::io("rename", path, e)));
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use equip_model::UserId;

    #[test]
    fn user_snapshot_names_are_hex_encoded() {
        let scope = HistoryScope::user(UserId::new("../etc").unwrap());
        assert_eq!(snapshot_file_name(&scope), "user-2e2e2f657463.json");
        assert_eq!(snapshot_file_name(&HistoryScope::Anonymous), "anonymous.json");
    }

    #[test]
    fn empty_history_removes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonDirectoryBackend::new(dir.path()).unwrap();
        let path = backend.snapshot_path(&HistoryScope::Anonymous);
        fs::write(&path, b"{}").unwrap();

        backend.persist(&HistoryScope::Anonymous, &[]).unwrap();
        assert!(!path.exists());
        // Removing an already-missing snapshot is fine.
        backend.persist(&HistoryScope::Anonymous, &[]).unwrap();
    }

    #[test]
    fn failed_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("anonymous.json");
        // A non-empty directory in place of the snapshot makes the rename fail.
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"x").unwrap();

        assert!(write_atomic(&target, b"{}").is_err());
        assert!(!dir.path().join("anonymous.json.tmp").exists());

        write_atomic(&dir.path().join("user-61.json"), b"{}").unwrap();
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .filter(|name| name.to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
