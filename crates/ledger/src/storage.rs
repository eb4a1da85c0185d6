//! Snapshot persistence for the ledger.
//!
//! The ledger persists its whole group collection as one serialized blob
//! under a single well-known key. There is no partial or incremental
//! persistence; every mutation rewrites the snapshot. The blob carries a
//! version number so a future shape change can be detected instead of being
//! misread.

use std::{collections::HashMap, io, path::PathBuf, sync::Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::groups::Group;

/// The one key the ledger reads and writes.
pub const SNAPSHOT_KEY: &str = "groups";

const SNAPSHOT_VERSION: u32 = 1;

/// Errors from the snapshot store or the snapshot codec.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),
    #[error("storage lock poisoned")]
    Poisoned,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    groups: Vec<Group>,
}

/// Scoped key-value capability the ledger persists through.
///
/// `get` returns `None` for an absent key. Implementations decide where the
/// bytes live; the ledger only ever uses [`SNAPSHOT_KEY`].
#[allow(async_fn_in_trait)]
pub trait SnapshotStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    async fn set(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// File-backed store: one file per key under a root directory.
///
/// Writes go through a temp file plus rename so a crash mid-write leaves the
/// previous snapshot intact.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl SnapshotStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

/// Serializes the group collection into the versioned snapshot blob.
///
/// Groups are ordered by id so identical state always produces identical
/// bytes.
pub(crate) fn encode_snapshot(groups: &HashMap<String, Group>) -> Result<Vec<u8>, StorageError> {
    let mut ordered: Vec<Group> = groups.values().cloned().collect();
    ordered.sort_by(|a, b| a.id.cmp(&b.id));
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        groups: ordered,
    };
    Ok(serde_json::to_vec(&snapshot)?)
}

/// Decodes a snapshot blob, rejecting unknown versions.
pub(crate) fn decode_snapshot(bytes: &[u8]) -> Result<Vec<Group>, StorageError> {
    let snapshot: Snapshot = serde_json::from_slice(bytes)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(StorageError::UnsupportedVersion(snapshot.version));
    }
    Ok(snapshot.groups)
}

#[cfg(test)]
mod tests {
    use crate::Currency;

    use super::*;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get(SNAPSHOT_KEY).await.unwrap().is_none());

        store.set(SNAPSHOT_KEY, b"blob").await.unwrap();
        assert_eq!(store.get(SNAPSHOT_KEY).await.unwrap(), Some(b"blob".to_vec()));
    }

    #[tokio::test]
    async fn file_store_missing_key_is_none() {
        let store = FileStore::new("/nonexistent/romana-test");
        assert!(store.get(SNAPSHOT_KEY).await.unwrap().is_none());
    }

    #[test]
    fn snapshot_round_trip() {
        let mut groups = HashMap::new();
        let group = Group::new(String::from("Trip"), Currency::Eur);
        groups.insert(group.id.clone(), group.clone());

        let bytes = encode_snapshot(&groups).unwrap();
        let decoded = decode_snapshot(&bytes).unwrap();
        assert_eq!(decoded, vec![group]);
    }

    #[test]
    fn snapshot_rejects_unknown_version() {
        let bytes = br#"{"version":99,"groups":[]}"#;
        let err = decode_snapshot(bytes).unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedVersion(99)));
    }
}
